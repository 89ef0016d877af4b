use serde::{Deserialize, Serialize};

use crate::domain::{
    validate_weight, Accessory, AccessoryKind, Device, FloorStand, Manufacturer, TableMount,
    TableMountStyle,
};
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorStandGroup {
    pub manufacturer: Manufacturer,
    pub stands: Vec<FloorStand>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableMountGroup {
    pub manufacturer: Manufacturer,
    pub style: TableMountStyle,
    pub mounts: Vec<TableMount>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "groups", rename_all = "snake_case")]
pub enum AccessoryGroups {
    FloorStand(Vec<FloorStandGroup>),
    TableMount(Vec<TableMountGroup>),
}

impl AccessoryGroups {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::FloorStand(groups) => groups.is_empty(),
            Self::TableMount(groups) => groups.is_empty(),
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            Self::FloorStand(groups) => groups.iter().map(|group| group.stands.len()).sum(),
            Self::TableMount(groups) => groups.iter().map(|group| group.mounts.len()).sum(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessoryReport {
    pub device: Device,
    pub groups: AccessoryGroups,
}

/// Keeps accessories of `kind` that carry the device, lightest sufficient first,
/// grouped by manufacturer (floor stands) or manufacturer and style (table mounts).
/// Candidates of another kind are ignored.
pub fn find_accessories(
    device: &Device,
    kind: AccessoryKind,
    candidates: &[Accessory],
) -> Result<AccessoryReport, DomainError> {
    let weight = validate_weight(device.weight_kg)?;

    let mut eligible: Vec<&Accessory> = candidates
        .iter()
        .filter(|accessory| accessory.kind() == kind && accessory.capacity_kg() >= weight)
        .collect();
    eligible.sort_by(|left, right| left.capacity_kg().total_cmp(&right.capacity_kg()));

    let groups = match kind {
        AccessoryKind::FloorStand => {
            let mut groups: Vec<FloorStandGroup> = Vec::new();
            for accessory in eligible {
                let Accessory::FloorStand(stand) = accessory else { continue };
                match groups.iter_mut().find(|group| group.manufacturer == stand.manufacturer) {
                    Some(group) => group.stands.push(stand.clone()),
                    None => groups.push(FloorStandGroup {
                        manufacturer: stand.manufacturer.clone(),
                        stands: vec![stand.clone()],
                    }),
                }
            }
            groups.sort_by(|left, right| left.manufacturer.cmp(&right.manufacturer));
            AccessoryGroups::FloorStand(groups)
        }
        AccessoryKind::TableMount => {
            let mut groups: Vec<TableMountGroup> = Vec::new();
            for accessory in eligible {
                let Accessory::TableMount(mount) = accessory else { continue };
                match groups.iter_mut().find(|group| {
                    group.manufacturer == mount.manufacturer && group.style == mount.style
                }) {
                    Some(group) => group.mounts.push(mount.clone()),
                    None => groups.push(TableMountGroup {
                        manufacturer: mount.manufacturer.clone(),
                        style: mount.style.clone(),
                        mounts: vec![mount.clone()],
                    }),
                }
            }
            groups.sort_by(|left, right| {
                left.manufacturer.cmp(&right.manufacturer).then_with(|| left.style.cmp(&right.style))
            });
            AccessoryGroups::TableMount(groups)
        }
    };

    Ok(AccessoryReport { device: device.clone(), groups })
}
