use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Manufacturer, MountId};

/// Which side of the wheelchair the arm is fitted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountingSide {
    #[default]
    Right,
    Left,
}

impl MountingSide {
    pub fn from_left_hand_side(left_hand_side: bool) -> Self {
        if left_hand_side {
            Self::Left
        } else {
            Self::Right
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            Self::Right => {
                "Standard right-hand mounting: the recommended arm positions the device from the user's right side."
            }
            Self::Left => {
                "Left-hand mounting: sturdier rotation-locking hardware is recommended so the device holds its position."
            }
        }
    }
}

/// A band covers every weight at or above `min_kg` that no heavier band claimed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightBand {
    pub min_kg: f64,
    pub mount_id: MountId,
}

const fn band(min_kg: f64, mount_id: i64) -> WeightBand {
    WeightBand { min_kg, mount_id: MountId(mount_id) }
}

/// Bands are ordered heaviest first and end with an unbounded band, so every
/// weight resolves to exactly one mount id.
pub const REHADAPT_RIGHT: &[WeightBand] =
    &[band(2.6, 3), band(1.6, 1), band(1.1, 4), band(f64::NEG_INFINITY, 6)];

/// Left-hand fitting swaps in rotation-locking arms.
pub const REHADAPT_LEFT: &[WeightBand] =
    &[band(2.8, 3), band(1.7, 2), band(f64::NEG_INFINITY, 13)];

pub const DAESSY: &[WeightBand] = &[band(2.6, 7), band(f64::NEG_INFINITY, 10)];

pub fn lookup(bands: &[WeightBand], weight_kg: f64) -> Option<MountId> {
    bands.iter().find(|band| weight_kg >= band.min_kg).map(|band| band.mount_id)
}

pub fn table_for(manufacturer: &Manufacturer, side: MountingSide) -> Option<&'static [WeightBand]> {
    match (manufacturer, side) {
        (Manufacturer::Rehadapt, MountingSide::Right) => Some(REHADAPT_RIGHT),
        (Manufacturer::Rehadapt, MountingSide::Left) => Some(REHADAPT_LEFT),
        (Manufacturer::Daessy, _) => Some(DAESSY),
        (Manufacturer::Other(_), _) => None,
    }
}

/// Tabled primary mount id for a manufacturer. Depends only on weight and side,
/// never on catalog contents; `None` for manufacturers without a table.
pub fn primary_mount_id(
    manufacturer: &Manufacturer,
    weight_kg: f64,
    side: MountingSide,
) -> Option<MountId> {
    table_for(manufacturer, side).and_then(|bands| lookup(bands, weight_kg))
}

/// Every mount id any table can name; the catalog is expected to contain them all.
pub fn tabled_mount_ids() -> BTreeSet<MountId> {
    [REHADAPT_RIGHT, REHADAPT_LEFT, DAESSY]
        .into_iter()
        .flat_map(|bands| bands.iter().map(|band| band.mount_id))
        .collect()
}
