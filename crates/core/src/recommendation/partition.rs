use serde::{Deserialize, Serialize};

use crate::domain::{Mount, MountId};

/// Mounts able to carry `device_weight_kg`, lightest sufficient first. Equal
/// capacities keep catalog id order so results are deterministic.
pub fn compatible_mounts(mounts: &[Mount], device_weight_kg: f64) -> Vec<Mount> {
    let mut compatible: Vec<Mount> =
        mounts.iter().filter(|mount| mount.supports(device_weight_kg)).cloned().collect();
    compatible.sort_by(|left, right| {
        left.weight_capacity_kg
            .total_cmp(&right.weight_capacity_kg)
            .then_with(|| left.id.cmp(&right.id))
    });
    compatible
}

/// One manufacturer's compatible mounts split into the recommended arm and the rest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedMounts {
    pub primary: Mount,
    /// Id the weight table asked for, if the manufacturer has a table.
    pub table_primary_id: Option<MountId>,
    /// True when `table_primary_id` was not among the compatible mounts and the
    /// lightest sufficient mount was promoted instead.
    pub fallback: bool,
    pub other: Vec<Mount>,
}

impl RankedMounts {
    pub fn iter(&self) -> impl Iterator<Item = &Mount> {
        std::iter::once(&self.primary).chain(self.other.iter())
    }
}

/// Splits an ascending, single-manufacturer compatible list by id. Returns `None`
/// when nothing is compatible.
pub fn partition(compatible: Vec<Mount>, table_primary_id: Option<MountId>) -> Option<RankedMounts> {
    if compatible.is_empty() {
        return None;
    }

    let position = table_primary_id
        .and_then(|wanted| compatible.iter().position(|mount| mount.id == wanted));
    let fallback = position.is_none();
    let mut other = compatible;
    let primary = other.remove(position.unwrap_or(0));

    Some(RankedMounts {
        primary,
        table_primary_id,
        fallback: fallback && table_primary_id.is_some(),
        other,
    })
}
