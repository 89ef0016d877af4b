use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

catalog_id!(DeviceId);

/// Augmentative and alternative communication device. Weight drives every
/// weight-band decision downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub make: String,
    pub model: String,
    pub weight_kg: f64,
    pub eyegaze: bool,
}

impl Device {
    pub fn label(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

pub fn validate_weight(weight_kg: f64) -> Result<f64, DomainError> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(DomainError::InvalidRecord(format!(
            "device weight must be a non-negative number of kilograms, got {weight_kg}"
        )));
    }
    Ok(weight_kg)
}
