use serde::{Deserialize, Serialize};

use crate::domain::manufacturer::Manufacturer;

catalog_id!(ClampId);
catalog_id!(MountId);
catalog_id!(AdapterRingId);

/// Frame clamp attaching a mount arm to a wheelchair frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clamp {
    pub id: ClampId,
    pub name: String,
    pub manufacturer: Manufacturer,
    pub description: String,
    pub url: Option<String>,
}

/// Articulated arm between a clamp and the device. `weight_capacity_kg` is an
/// inclusive lower bound on what the arm can carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mount {
    pub id: MountId,
    pub name: String,
    pub manufacturer: Manufacturer,
    pub weight_capacity_kg: f64,
    pub description: String,
    pub url: Option<String>,
}

impl Mount {
    pub fn supports(&self, device_weight_kg: f64) -> bool {
        self.weight_capacity_kg >= device_weight_kg
    }
}

/// Bridging hardware for pairing one manufacturer's clamp with another's mount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterRing {
    pub id: AdapterRingId,
    pub name: String,
    pub manufacturer: Manufacturer,
    pub description: String,
    pub url: Option<String>,
}
