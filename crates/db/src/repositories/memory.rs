use std::collections::BTreeSet;

use mountfinder_core::domain::{
    Accessory, AccessoryKind, AdapterRing, AdapterRingId, Clamp, ClampId, Device, DeviceId,
    Mount, MountId, Wheelchair, WheelchairId,
};

use super::{CatalogStore, RepositoryError};

/// Whole-catalog value used to back the in-memory store.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    pub wheelchairs: Vec<Wheelchair>,
    pub devices: Vec<Device>,
    pub clamps: Vec<Clamp>,
    pub mounts: Vec<Mount>,
    pub adapter_rings: Vec<AdapterRing>,
    pub accessories: Vec<Accessory>,
}

#[derive(Default)]
pub struct InMemoryCatalogStore {
    snapshot: CatalogSnapshot,
}

impl InMemoryCatalogStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_wheelchair(
        &self,
        id: WheelchairId,
    ) -> Result<Option<Wheelchair>, RepositoryError> {
        let snapshot = &self.snapshot;
        Ok(snapshot.wheelchairs.iter().find(|wheelchair| wheelchair.id == id).cloned())
    }

    async fn find_device(&self, id: DeviceId) -> Result<Option<Device>, RepositoryError> {
        let snapshot = &self.snapshot;
        Ok(snapshot.devices.iter().find(|device| device.id == id).cloned())
    }

    async fn find_device_by_make_model(
        &self,
        make: &str,
        model: &str,
    ) -> Result<Option<Device>, RepositoryError> {
        let snapshot = &self.snapshot;
        Ok(snapshot
            .devices
            .iter()
            .find(|device| device.make == make && device.model == model)
            .cloned())
    }

    async fn list_wheelchairs(&self) -> Result<Vec<Wheelchair>, RepositoryError> {
        let mut wheelchairs = self.snapshot.wheelchairs.clone();
        wheelchairs.sort_by(|left, right| left.model.cmp(&right.model));
        Ok(wheelchairs)
    }

    async fn list_devices(&self) -> Result<Vec<Device>, RepositoryError> {
        let mut devices = self.snapshot.devices.clone();
        devices.sort_by(|left, right| {
            left.make.cmp(&right.make).then_with(|| left.model.cmp(&right.model))
        });
        Ok(devices)
    }

    async fn find_clamps_by_ids(
        &self,
        ids: &BTreeSet<ClampId>,
    ) -> Result<Vec<Clamp>, RepositoryError> {
        let snapshot = &self.snapshot;
        let mut clamps: Vec<Clamp> =
            snapshot.clamps.iter().filter(|clamp| ids.contains(&clamp.id)).cloned().collect();
        clamps.sort_by_key(|clamp| clamp.id);
        Ok(clamps)
    }

    async fn find_mounts_by_weight_at_least(
        &self,
        weight_kg: f64,
    ) -> Result<Vec<Mount>, RepositoryError> {
        let snapshot = &self.snapshot;
        let mut mounts: Vec<Mount> =
            snapshot.mounts.iter().filter(|mount| mount.supports(weight_kg)).cloned().collect();
        mounts.sort_by(|left, right| {
            left.weight_capacity_kg
                .total_cmp(&right.weight_capacity_kg)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(mounts)
    }

    async fn find_mounts_by_ids(
        &self,
        ids: &BTreeSet<MountId>,
    ) -> Result<Vec<Mount>, RepositoryError> {
        let snapshot = &self.snapshot;
        let mut mounts: Vec<Mount> =
            snapshot.mounts.iter().filter(|mount| ids.contains(&mount.id)).cloned().collect();
        mounts.sort_by_key(|mount| mount.id);
        Ok(mounts)
    }

    async fn find_adapter_ring(
        &self,
        id: AdapterRingId,
    ) -> Result<Option<AdapterRing>, RepositoryError> {
        let snapshot = &self.snapshot;
        Ok(snapshot.adapter_rings.iter().find(|ring| ring.id == id).cloned())
    }

    async fn find_accessories_by_weight(
        &self,
        kind: AccessoryKind,
        weight_kg: f64,
    ) -> Result<Vec<Accessory>, RepositoryError> {
        let snapshot = &self.snapshot;
        let mut accessories: Vec<Accessory> = snapshot
            .accessories
            .iter()
            .filter(|accessory| accessory.kind() == kind && accessory.capacity_kg() >= weight_kg)
            .cloned()
            .collect();
        accessories.sort_by(|left, right| left.capacity_kg().total_cmp(&right.capacity_kg()));
        Ok(accessories)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use mountfinder_core::domain::{
        ClampId, Device, DeviceId, Manufacturer, Mount, MountId, Wheelchair, WheelchairId,
    };

    use super::{CatalogSnapshot, InMemoryCatalogStore};
    use crate::repositories::CatalogStore;

    fn mount(id: i64, capacity: f64) -> Mount {
        Mount {
            id: MountId(id),
            name: format!("mount {id}"),
            manufacturer: Manufacturer::Rehadapt,
            weight_capacity_kg: capacity,
            description: String::new(),
            url: None,
        }
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            wheelchairs: vec![
                Wheelchair {
                    id: WheelchairId(2),
                    model: "Zeta".to_string(),
                    frame_clamp_ids: BTreeSet::from([ClampId(1)]),
                    mount_location: None,
                },
                Wheelchair {
                    id: WheelchairId(1),
                    model: "Alpha".to_string(),
                    frame_clamp_ids: BTreeSet::from([ClampId(2)]),
                    mount_location: Some("Rear upright".to_string()),
                },
            ],
            devices: vec![Device {
                id: DeviceId(1),
                make: "Tobii Dynavox".to_string(),
                model: "I-13".to_string(),
                weight_kg: 2.6,
                eyegaze: true,
            }],
            mounts: vec![mount(1, 3.0), mount(2, 1.1), mount(3, 2.6), mount(4, 2.6)],
            ..CatalogSnapshot::default()
        }
    }

    #[tokio::test]
    async fn mounts_by_weight_match_sql_ordering() {
        let store = InMemoryCatalogStore::new(snapshot());

        let ids: Vec<MountId> = store
            .find_mounts_by_weight_at_least(2.6)
            .await
            .expect("query")
            .into_iter()
            .map(|mount| mount.id)
            .collect();

        assert_eq!(ids, vec![MountId(3), MountId(4), MountId(1)]);
    }

    #[tokio::test]
    async fn lookups_and_listings() {
        let store = InMemoryCatalogStore::new(snapshot());

        assert!(store.find_device(DeviceId(1)).await.expect("query").is_some());
        assert!(store
            .find_device_by_make_model("Tobii Dynavox", "I-13")
            .await
            .expect("query")
            .is_some());
        assert!(store.find_wheelchair(WheelchairId(9)).await.expect("query").is_none());

        let models: Vec<String> = store
            .list_wheelchairs()
            .await
            .expect("list")
            .into_iter()
            .map(|wheelchair| wheelchair.model)
            .collect();
        assert_eq!(models, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }
}
