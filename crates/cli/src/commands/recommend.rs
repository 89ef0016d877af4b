use mountfinder_core::domain::{DeviceId, WheelchairId};
use mountfinder_core::recommendation::{Bundle, MountSelection, RecommendationOptions};
use mountfinder_db::{MountFinder, SqlCatalogStore};

use crate::commands::{application_failure, new_correlation_id, open_pool, prepare, CommandResult};

const COMMAND: &str = "recommend";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceSelector {
    Id(DeviceId),
    MakeModel { make: String, model: String },
}

#[derive(Clone, Debug)]
pub struct RecommendArgs {
    pub wheelchair: WheelchairId,
    pub device: DeviceSelector,
    pub options: RecommendationOptions,
    pub json: bool,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let (config, runtime) = match prepare(COMMAND) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };
    let correlation_id = new_correlation_id();

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let finder =
            MountFinder::new(SqlCatalogStore::new(pool.clone()), config.catalog.adapter_ring_id);

        let bundle = async {
            let device_id = match &args.device {
                DeviceSelector::Id(id) => *id,
                DeviceSelector::MakeModel { make, model } => {
                    finder.resolve_device(make, model).await?.id
                }
            };
            finder.recommend(args.wheelchair, device_id, args.options).await
        }
        .await;

        pool.close().await;
        bundle
    });

    match result {
        Ok(bundle) if args.json => CommandResult::success_with_data(
            COMMAND,
            summary(&bundle),
            serde_json::to_value(&bundle).ok(),
        ),
        Ok(bundle) => CommandResult::text(render_human(&bundle)),
        Err(error) => application_failure(COMMAND, error, &correlation_id, args.json),
    }
}

fn summary(bundle: &Bundle) -> String {
    format!(
        "{} ({} kg) on {}: {} manufacturer sections",
        bundle.device.label(),
        bundle.device.weight_kg,
        bundle.wheelchair_model,
        bundle.sections.len()
    )
}

pub(crate) fn render_human(bundle: &Bundle) -> String {
    let mut lines = vec![format!(
        "Mounting solutions for the {} ({} kg) on the {}",
        bundle.device.label(),
        bundle.device.weight_kg,
        bundle.wheelchair_model
    )];
    if let Some(location) = &bundle.mount_location {
        lines.push(format!("Mounting location: {location}"));
    }
    lines.push(bundle.side_note.clone());

    for section in &bundle.sections {
        lines.push(String::new());
        match &section.tagline {
            Some(tagline) => lines.push(format!("{}: {tagline}", section.manufacturer)),
            None => lines.push(section.manufacturer.to_string()),
        }

        if section.clamps.is_empty() {
            lines.push("  Clamps: none fitted to this wheelchair".to_string());
        } else {
            lines.push("  Clamps:".to_string());
            for clamp in &section.clamps {
                lines.push(format!("    - [{}] {}", clamp.id, clamp.name));
            }
        }

        match &section.mounts {
            MountSelection::Ranked(ranked) => {
                lines.push(format!(
                    "  Recommended mount: [{}] {} (up to {} kg)",
                    ranked.primary.id, ranked.primary.name, ranked.primary.weight_capacity_kg
                ));
                if !ranked.other.is_empty() {
                    lines.push("  Other suitable mounts:".to_string());
                    for mount in &ranked.other {
                        lines.push(format!(
                            "    - [{}] {} (up to {} kg)",
                            mount.id, mount.name, mount.weight_capacity_kg
                        ));
                    }
                }
            }
            MountSelection::NoSuitableMount { device_weight_kg } => lines.push(format!(
                "  No {} mount is rated for {device_weight_kg} kg",
                section.manufacturer
            )),
        }
    }

    if bundle.cross_manufacturer.eligible {
        lines.push(String::new());
        match &bundle.adapter_ring {
            Some(ring) => {
                lines.push(format!("Cross-manufacturer options (with the {}):", ring.name))
            }
            None => lines.push("Cross-manufacturer options:".to_string()),
        }
        for combination in &bundle.cross_manufacturer.combinations {
            lines.push(format!(
                "  - [{}] {} + [{}] {}",
                combination.clamp.id,
                combination.clamp.name,
                combination.mount.id,
                combination.mount.name
            ));
        }
    }

    if !bundle.hints.is_empty() {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        for hint in &bundle.hints {
            lines.push(format!("  - {hint}"));
        }
    }

    lines.join("\n")
}

/// `--device` takes precedence over `--make`/`--model`.
pub fn device_selector(
    device: Option<i64>,
    make: Option<String>,
    model: Option<String>,
) -> Result<DeviceSelector, String> {
    match (device, make, model) {
        (Some(id), _, _) => Ok(DeviceSelector::Id(DeviceId(id))),
        (None, Some(make), Some(model)) => Ok(DeviceSelector::MakeModel { make, model }),
        _ => Err("select a device with --device <ID> or --make <MAKE> --model <MODEL>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use mountfinder_core::domain::{
        Clamp, ClampId, Device, DeviceId, Manufacturer, Mount, MountId, Wheelchair, WheelchairId,
    };
    use mountfinder_core::recommendation::{
        DeterministicRecommendationEngine, RecommendationEngine, RecommendationInput,
        RecommendationOptions,
    };

    use super::{device_selector, render_human, DeviceSelector};

    #[test]
    fn device_id_wins_over_make_and_model() {
        let selector =
            device_selector(Some(4), Some("Smartbox".into()), Some("Grid Pad 12".into()))
                .expect("selector");
        assert_eq!(selector, DeviceSelector::Id(DeviceId(4)));

        let selector =
            device_selector(None, Some("Smartbox".into()), Some("Grid Pad 12".into()))
                .expect("selector");
        assert!(matches!(selector, DeviceSelector::MakeModel { .. }));

        assert!(device_selector(None, Some("Smartbox".into()), None).is_err());
    }

    #[test]
    fn human_rendering_lists_sections_and_no_suitable_mount() {
        let wheelchair = Wheelchair {
            id: WheelchairId(1),
            model: "Quickie Q500 M".to_string(),
            frame_clamp_ids: BTreeSet::from([ClampId(1), ClampId(3)]),
            mount_location: Some("Rear upright".to_string()),
        };
        let device = Device {
            id: DeviceId(8),
            make: "Smartbox".to_string(),
            model: "Grid Pad 18".to_string(),
            weight_kg: 6.5,
            eyegaze: true,
        };
        let clamps = vec![
            Clamp {
                id: ClampId(1),
                name: "Universal Frame Clamp".to_string(),
                manufacturer: Manufacturer::Rehadapt,
                description: String::new(),
                url: None,
            },
            Clamp {
                id: ClampId(3),
                name: "Inner Clamp".to_string(),
                manufacturer: Manufacturer::Daessy,
                description: String::new(),
                url: None,
            },
        ];
        let mounts = vec![Mount {
            id: MountId(12),
            name: "Telescopic HD Mount".to_string(),
            manufacturer: Manufacturer::Rehadapt,
            weight_capacity_kg: 7.0,
            description: String::new(),
            url: None,
        }];

        let bundle = DeterministicRecommendationEngine
            .recommend(RecommendationInput {
                wheelchair: &wheelchair,
                device: &device,
                clamps: &clamps,
                mounts: &mounts,
                adapter_ring: None,
                options: RecommendationOptions::default(),
            })
            .expect("bundle");

        let rendered = render_human(&bundle);
        assert!(rendered.starts_with("Mounting solutions for the Smartbox Grid Pad 18"));
        assert!(rendered.contains("Recommended mount: [12] Telescopic HD Mount"));
        assert!(rendered.contains("No Daessy mount is rated for 6.5 kg"));
        assert!(rendered.contains("Mounting location: Rear upright"));
    }
}
