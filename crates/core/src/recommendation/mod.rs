pub mod partition;
pub mod tables;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    validate_weight, AdapterRing, Clamp, ClampId, Device, Manufacturer, Mount, Wheelchair,
    WheelchairId,
};
use crate::errors::DomainError;

use self::{
    partition::{compatible_mounts, partition, RankedMounts},
    tables::{primary_mount_id, MountingSide},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationOptions {
    pub left_hand_side: bool,
    pub uses_eyegaze: bool,
}

impl RecommendationOptions {
    pub fn side(&self) -> MountingSide {
        MountingSide::from_left_hand_side(self.left_hand_side)
    }

    pub fn emphasis(&self) -> Manufacturer {
        if self.uses_eyegaze {
            Manufacturer::Daessy
        } else {
            Manufacturer::Rehadapt
        }
    }
}

/// Catalog records already resolved by the caller. `clamps` are the wheelchair's
/// frame clamps; `mounts` may be any superset of the compatible mounts.
#[derive(Clone, Debug)]
pub struct RecommendationInput<'a> {
    pub wheelchair: &'a Wheelchair,
    pub device: &'a Device,
    pub clamps: &'a [Clamp],
    pub mounts: &'a [Mount],
    pub adapter_ring: Option<&'a AdapterRing>,
    pub options: RecommendationOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MountSelection {
    Ranked(RankedMounts),
    NoSuitableMount { device_weight_kg: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerSection {
    pub manufacturer: Manufacturer,
    pub tagline: Option<String>,
    pub clamps: Vec<Clamp>,
    pub mounts: MountSelection,
}

impl ManufacturerSection {
    pub fn primary(&self) -> Option<&Mount> {
        match &self.mounts {
            MountSelection::Ranked(ranked) => Some(&ranked.primary),
            MountSelection::NoSuitableMount { .. } => None,
        }
    }

    pub fn other(&self) -> &[Mount] {
        match &self.mounts {
            MountSelection::Ranked(ranked) => &ranked.other,
            MountSelection::NoSuitableMount { .. } => &[],
        }
    }

    /// Complete solution: at least one clamp and a primary mount from the same maker.
    pub fn is_complete(&self) -> bool {
        !self.clamps.is_empty() && self.primary().is_some()
    }

    pub fn mount_error(&self) -> Option<DomainError> {
        match self.mounts {
            MountSelection::NoSuitableMount { device_weight_kg } => {
                Some(DomainError::NoSuitableMount {
                    manufacturer: self.manufacturer.clone(),
                    device_weight_kg,
                })
            }
            MountSelection::Ranked(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossCombination {
    pub clamp: Clamp,
    pub mount: Mount,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossManufacturer {
    pub eligible: bool,
    pub combinations: Vec<CrossCombination>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub wheelchair_id: WheelchairId,
    pub wheelchair_model: String,
    pub device: Device,
    pub options: RecommendationOptions,
    pub emphasis: Manufacturer,
    pub sections: Vec<ManufacturerSection>,
    pub adapter_ring: Option<AdapterRing>,
    pub cross_manufacturer: CrossManufacturer,
    pub mount_location: Option<String>,
    pub side_note: String,
    pub hints: Vec<String>,
}

impl Bundle {
    pub fn section(&self, manufacturer: &Manufacturer) -> Option<&ManufacturerSection> {
        self.sections.iter().find(|section| &section.manufacturer == manufacturer)
    }

    pub fn clamps_by_manufacturer(&self) -> Vec<(&Manufacturer, &[Clamp])> {
        self.sections
            .iter()
            .filter(|section| !section.clamps.is_empty())
            .map(|section| (&section.manufacturer, section.clamps.as_slice()))
            .collect()
    }

    pub fn mounts_by_manufacturer(&self) -> Vec<(&Manufacturer, &MountSelection)> {
        self.sections.iter().map(|section| (&section.manufacturer, &section.mounts)).collect()
    }

    pub fn mount_errors(&self) -> Vec<DomainError> {
        self.sections.iter().filter_map(ManufacturerSection::mount_error).collect()
    }
}

/// Clamp maker / mount maker pairs the adapter ring can join.
pub fn adapter_bridges() -> [(Manufacturer, Manufacturer); 1] {
    [(Manufacturer::Daessy, Manufacturer::Rehadapt)]
}

pub trait RecommendationEngine: Send + Sync {
    fn recommend(&self, input: RecommendationInput<'_>) -> Result<Bundle, DomainError>;
}

#[derive(Default)]
pub struct DeterministicRecommendationEngine;

impl RecommendationEngine for DeterministicRecommendationEngine {
    fn recommend(&self, input: RecommendationInput<'_>) -> Result<Bundle, DomainError> {
        recommend(input)
    }
}

pub fn recommend(input: RecommendationInput<'_>) -> Result<Bundle, DomainError> {
    let RecommendationInput { wheelchair, device, clamps, mounts, adapter_ring, options } = input;

    let resolved: BTreeSet<ClampId> = clamps.iter().map(|clamp| clamp.id).collect();
    let missing: Vec<ClampId> =
        wheelchair.frame_clamp_ids.iter().filter(|id| !resolved.contains(id)).copied().collect();
    if !missing.is_empty() {
        return Err(DomainError::UnresolvedFrameClamps { wheelchair_id: wheelchair.id, missing });
    }

    let weight = validate_weight(device.weight_kg)?;
    let side = options.side();
    let compatible = compatible_mounts(mounts, weight);

    let mut manufacturers: Vec<Manufacturer> = Vec::new();
    let fitted_clamps = clamps.iter().filter(|clamp| wheelchair.frame_clamp_ids.contains(&clamp.id));
    for manufacturer in fitted_clamps
        .clone()
        .map(|clamp| &clamp.manufacturer)
        .chain(compatible.iter().map(|mount| &mount.manufacturer))
    {
        if !manufacturers.contains(manufacturer) {
            manufacturers.push(manufacturer.clone());
        }
    }
    manufacturers.sort_by(|left, right| {
        left.presentation_rank(options.uses_eyegaze)
            .cmp(&right.presentation_rank(options.uses_eyegaze))
            .then_with(|| left.cmp(right))
    });

    let mut hints = Vec::new();
    let sections: Vec<ManufacturerSection> = manufacturers
        .into_iter()
        .map(|manufacturer| {
            let mut section_clamps: Vec<Clamp> = fitted_clamps
                .clone()
                .filter(|clamp| clamp.manufacturer == manufacturer)
                .cloned()
                .collect();
            section_clamps.sort_by_key(|clamp| clamp.id);

            let section_mounts: Vec<Mount> = compatible
                .iter()
                .filter(|mount| mount.manufacturer == manufacturer)
                .cloned()
                .collect();
            let table_id = primary_mount_id(&manufacturer, weight, side);

            let mounts = match partition(section_mounts, table_id) {
                Some(ranked) => {
                    if let (true, Some(wanted)) = (ranked.fallback, ranked.table_primary_id) {
                        hints.push(format!(
                            "{manufacturer}: the recommended mount (id {wanted}) is not available for this weight; showing the lightest suitable {manufacturer} mount instead."
                        ));
                    }
                    MountSelection::Ranked(ranked)
                }
                None => MountSelection::NoSuitableMount { device_weight_kg: weight },
            };

            ManufacturerSection {
                tagline: manufacturer.tagline().map(str::to_string),
                manufacturer,
                clamps: section_clamps,
                mounts,
            }
        })
        .collect();

    let mut cross_manufacturer = CrossManufacturer::default();
    for (clamp_maker, mount_maker) in adapter_bridges() {
        let clamp_section = sections.iter().find(|section| section.manufacturer == clamp_maker);
        let primary = sections
            .iter()
            .find(|section| section.manufacturer == mount_maker)
            .and_then(ManufacturerSection::primary);
        if let (Some(clamp_section), Some(primary)) = (clamp_section, primary) {
            for clamp in &clamp_section.clamps {
                cross_manufacturer
                    .combinations
                    .push(CrossCombination { clamp: clamp.clone(), mount: primary.clone() });
            }
        }
    }
    cross_manufacturer.eligible = !cross_manufacturer.combinations.is_empty();

    if cross_manufacturer.eligible {
        match adapter_ring {
            Some(ring) => hints.push(format!(
                "A Daessy clamp can carry the recommended Rehadapt mount using the {}.",
                ring.name
            )),
            None => hints.push(
                "Cross-manufacturer combinations need an adapter ring, but none is listed in the catalog."
                    .to_string(),
            ),
        }
    }

    if options.uses_eyegaze && !device.eyegaze {
        hints.push(format!(
            "The {} is not listed as eye gaze capable; Daessy is shown first because eye gaze positioning was requested.",
            device.label()
        ));
    }

    Ok(Bundle {
        wheelchair_id: wheelchair.id,
        wheelchair_model: wheelchair.model.clone(),
        device: device.clone(),
        options,
        emphasis: options.emphasis(),
        sections,
        adapter_ring: adapter_ring.cloned(),
        cross_manufacturer,
        mount_location: wheelchair.mount_location.clone(),
        side_note: side.note().to_string(),
        hints,
    })
}
