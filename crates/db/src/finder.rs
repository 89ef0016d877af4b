use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use mountfinder_core::accessories::{find_accessories, AccessoryReport};
use mountfinder_core::domain::{
    AccessoryKind, AdapterRingId, ClampId, Device, DeviceId, MountId, WheelchairId,
};
use mountfinder_core::errors::{ApplicationError, DomainError, SelectionFault};
use mountfinder_core::recommendation::tables::tabled_mount_ids;
use mountfinder_core::recommendation::{
    Bundle, DeterministicRecommendationEngine, MountSelection, RecommendationEngine,
    RecommendationInput, RecommendationOptions,
};

use crate::repositories::{CatalogStore, RepositoryError};

/// Resolves a selection against the catalog and hands the records to the engine.
pub struct MountFinder<S> {
    store: S,
    engine: DeterministicRecommendationEngine,
    adapter_ring_id: AdapterRingId,
}

impl<S: CatalogStore> MountFinder<S> {
    pub fn new(store: S, adapter_ring_id: AdapterRingId) -> Self {
        Self { store, engine: DeterministicRecommendationEngine, adapter_ring_id }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn recommend(
        &self,
        wheelchair_id: WheelchairId,
        device_id: DeviceId,
        options: RecommendationOptions,
    ) -> Result<Bundle, ApplicationError> {
        info!(
            event_name = "recommendation.start",
            wheelchair_id = %wheelchair_id,
            device_id = %device_id,
            left_hand_side = options.left_hand_side,
            uses_eyegaze = options.uses_eyegaze,
            "building mount recommendation"
        );

        let wheelchair = self
            .store
            .find_wheelchair(wheelchair_id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| invalid_selection(SelectionFault::UnknownWheelchair(wheelchair_id)))?;
        let device = self
            .store
            .find_device(device_id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| invalid_selection(SelectionFault::UnknownDevice(device_id)))?;

        let clamps = self
            .store
            .find_clamps_by_ids(&wheelchair.frame_clamp_ids)
            .await
            .map_err(store_failure)?;
        let mounts = self
            .store
            .find_mounts_by_weight_at_least(device.weight_kg)
            .await
            .map_err(store_failure)?;
        let adapter_ring =
            self.store.find_adapter_ring(self.adapter_ring_id).await.map_err(store_failure)?;

        let bundle = self
            .engine
            .recommend(RecommendationInput {
                wheelchair: &wheelchair,
                device: &device,
                clamps: &clamps,
                mounts: &mounts,
                adapter_ring: adapter_ring.as_ref(),
                options,
            })
            .map_err(|error| {
                warn!(
                    event_name = "recommendation.rejected",
                    wheelchair_id = %wheelchair_id,
                    device_id = %device_id,
                    error = %error,
                    "recommendation refused by engine"
                );
                ApplicationError::from(error)
            })?;

        for section in &bundle.sections {
            if let MountSelection::NoSuitableMount { device_weight_kg } = &section.mounts {
                warn!(
                    event_name = "recommendation.no_suitable_mount",
                    manufacturer = %section.manufacturer,
                    device_weight_kg = *device_weight_kg,
                    "no mount from this manufacturer carries the device"
                );
            }
        }

        info!(
            event_name = "recommendation.finished",
            wheelchair_id = %wheelchair_id,
            device_id = %device_id,
            sections = bundle.sections.len(),
            cross_manufacturer = bundle.cross_manufacturer.eligible,
            "mount recommendation built"
        );
        Ok(bundle)
    }

    /// Resolves a device from its make and model as shown to the caller.
    pub async fn resolve_device(&self, make: &str, model: &str) -> Result<Device, ApplicationError> {
        self.store
            .find_device_by_make_model(make.trim(), model.trim())
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                invalid_selection(SelectionFault::UnknownDeviceModel {
                    make: make.trim().to_string(),
                    model: model.trim().to_string(),
                })
            })
    }

    pub async fn find_accessories(
        &self,
        device_id: DeviceId,
        kind: AccessoryKind,
    ) -> Result<AccessoryReport, ApplicationError> {
        let device = self
            .store
            .find_device(device_id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| invalid_selection(SelectionFault::UnknownDevice(device_id)))?;

        let candidates = self
            .store
            .find_accessories_by_weight(kind, device.weight_kg)
            .await
            .map_err(store_failure)?;
        let report = find_accessories(&device, kind, &candidates)?;

        info!(
            event_name = "accessories.finished",
            device_id = %device_id,
            kind = ?kind,
            items = report.groups.item_count(),
            "accessory search complete"
        );
        Ok(report)
    }
}

fn invalid_selection(fault: SelectionFault) -> ApplicationError {
    warn!(
        event_name = "recommendation.invalid_selection",
        fault = %fault,
        "selection not in catalog"
    );
    ApplicationError::Domain(DomainError::InvalidSelection(fault))
}

fn store_failure(error: RepositoryError) -> ApplicationError {
    warn!(event_name = "catalog.store_failure", error = %error, "catalog store query failed");
    error.into()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnresolvedClamps {
    pub wheelchair_id: WheelchairId,
    pub model: String,
    pub missing: Vec<ClampId>,
}

/// Referential problems found in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub wheelchairs_checked: usize,
    pub unresolved_clamps: Vec<UnresolvedClamps>,
    pub missing_tabled_mounts: Vec<MountId>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved_clamps.is_empty() && self.missing_tabled_mounts.is_empty()
    }
}

pub async fn check_integrity<S: CatalogStore + ?Sized>(
    store: &S,
) -> Result<IntegrityReport, RepositoryError> {
    let wheelchairs = store.list_wheelchairs().await?;

    let referenced: BTreeSet<ClampId> = wheelchairs
        .iter()
        .flat_map(|wheelchair| wheelchair.frame_clamp_ids.iter().copied())
        .collect();
    let resolved: BTreeSet<ClampId> =
        store.find_clamps_by_ids(&referenced).await?.into_iter().map(|clamp| clamp.id).collect();

    let unresolved_clamps = wheelchairs
        .iter()
        .filter_map(|wheelchair| {
            let missing: Vec<ClampId> = wheelchair
                .frame_clamp_ids
                .iter()
                .filter(|id| !resolved.contains(id))
                .copied()
                .collect();
            (!missing.is_empty()).then(|| UnresolvedClamps {
                wheelchair_id: wheelchair.id,
                model: wheelchair.model.clone(),
                missing,
            })
        })
        .collect();

    let tabled = tabled_mount_ids();
    let present: BTreeSet<MountId> =
        store.find_mounts_by_ids(&tabled).await?.into_iter().map(|mount| mount.id).collect();
    let missing_tabled_mounts = tabled.difference(&present).copied().collect();

    Ok(IntegrityReport {
        wheelchairs_checked: wheelchairs.len(),
        unresolved_clamps,
        missing_tabled_mounts,
    })
}
