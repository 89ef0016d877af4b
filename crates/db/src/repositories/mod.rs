use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use mountfinder_core::domain::{
    Accessory, AccessoryKind, AdapterRing, AdapterRingId, Clamp, ClampId, Device, DeviceId,
    Mount, MountId, Wheelchair, WheelchairId,
};
use mountfinder_core::errors::{ApplicationError, DomainError};

pub mod catalog;
pub mod memory;

pub use catalog::SqlCatalogStore;
pub use memory::{CatalogSnapshot, InMemoryCatalogStore};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Database(error) => Self::StoreUnavailable(error.to_string()),
            RepositoryError::Decode(message) => Self::Domain(DomainError::InvalidRecord(message)),
        }
    }
}

/// Read-only view of the reference catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_wheelchair(&self, id: WheelchairId)
        -> Result<Option<Wheelchair>, RepositoryError>;

    async fn find_device(&self, id: DeviceId) -> Result<Option<Device>, RepositoryError>;

    async fn find_device_by_make_model(
        &self,
        make: &str,
        model: &str,
    ) -> Result<Option<Device>, RepositoryError>;

    /// Ordered by model name.
    async fn list_wheelchairs(&self) -> Result<Vec<Wheelchair>, RepositoryError>;

    /// Ordered by make, then model.
    async fn list_devices(&self) -> Result<Vec<Device>, RepositoryError>;

    async fn find_clamps_by_ids(
        &self,
        ids: &BTreeSet<ClampId>,
    ) -> Result<Vec<Clamp>, RepositoryError>;

    /// Mounts with capacity at or above `weight_kg`, ascending by capacity.
    async fn find_mounts_by_weight_at_least(
        &self,
        weight_kg: f64,
    ) -> Result<Vec<Mount>, RepositoryError>;

    async fn find_mounts_by_ids(
        &self,
        ids: &BTreeSet<MountId>,
    ) -> Result<Vec<Mount>, RepositoryError>;

    async fn find_adapter_ring(
        &self,
        id: AdapterRingId,
    ) -> Result<Option<AdapterRing>, RepositoryError>;

    /// Accessories of `kind` with capacity at or above `weight_kg`, ascending by capacity.
    async fn find_accessories_by_weight(
        &self,
        kind: AccessoryKind,
        weight_kg: f64,
    ) -> Result<Vec<Accessory>, RepositoryError>;
}
