use thiserror::Error;

use crate::domain::{ClampId, DeviceId, Manufacturer, WheelchairId};

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("invalid selection: {0}")]
    InvalidSelection(SelectionFault),
    #[error("no {manufacturer} mount supports a device weighing {device_weight_kg} kg")]
    NoSuitableMount { manufacturer: Manufacturer, device_weight_kg: f64 },
    #[error("wheelchair {wheelchair_id} references unknown frame clamps {missing:?}")]
    UnresolvedFrameClamps { wheelchair_id: WheelchairId, missing: Vec<ClampId> },
    #[error("invalid catalog record: {0}")]
    InvalidRecord(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionFault {
    UnknownWheelchair(WheelchairId),
    UnknownDevice(DeviceId),
    UnknownDeviceModel { make: String, model: String },
}

impl std::fmt::Display for SelectionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownWheelchair(id) => write!(f, "wheelchair {id} does not exist"),
            Self::UnknownDevice(id) => write!(f, "device {id} does not exist"),
            Self::UnknownDeviceModel { make, model } => {
                write!(f, "device `{make} {model}` does not exist")
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable label used by callers for exit codes and structured output.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::InvalidSelection(_)) => "invalid_selection",
            Self::Domain(DomainError::NoSuitableMount { .. }) => "no_suitable_mount",
            Self::Domain(DomainError::UnresolvedFrameClamps { .. })
            | Self::Domain(DomainError::InvalidRecord(_)) => "data_integrity",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Configuration(_) => "configuration",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The selection could not be matched. Re-select the wheelchair and device and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The catalog is currently unavailable. The request was not completed."
            }
            Self::Internal { .. } => {
                "The catalog contains inconsistent data. Please report this to the catalog maintainer."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = value.to_string();
        match value {
            ApplicationError::Domain(DomainError::InvalidSelection(_))
            | ApplicationError::Domain(DomainError::NoSuitableMount { .. }) => {
                Self::BadRequest { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::StoreUnavailable(_) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Domain(DomainError::UnresolvedFrameClamps { .. })
            | ApplicationError::Domain(DomainError::InvalidRecord(_))
            | ApplicationError::Configuration(_) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
