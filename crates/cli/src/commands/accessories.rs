use mountfinder_core::accessories::{AccessoryGroups, AccessoryReport};
use mountfinder_core::domain::{AccessoryKind, DeviceId};
use mountfinder_db::{MountFinder, SqlCatalogStore};

use crate::commands::{application_failure, new_correlation_id, open_pool, prepare, CommandResult};

const COMMAND: &str = "accessories";

pub fn run(device: DeviceId, kind: AccessoryKind, json_output: bool) -> CommandResult {
    let (config, runtime) = match prepare(COMMAND) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };
    let correlation_id = new_correlation_id();

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let finder =
            MountFinder::new(SqlCatalogStore::new(pool.clone()), config.catalog.adapter_ring_id);
        let report = finder.find_accessories(device, kind).await;
        pool.close().await;
        report
    });

    match result {
        Ok(report) if json_output => CommandResult::success_with_data(
            COMMAND,
            format!("{} suitable accessories", report.groups.item_count()),
            serde_json::to_value(&report).ok(),
        ),
        Ok(report) => CommandResult::text(render_human(&report)),
        Err(error) => application_failure(COMMAND, error, &correlation_id, json_output),
    }
}

fn render_human(report: &AccessoryReport) -> String {
    let noun = match report.groups {
        AccessoryGroups::FloorStand(_) => "floor stands",
        AccessoryGroups::TableMount(_) => "table mounts",
    };
    let mut lines = vec![format!(
        "{noun} for the {} ({} kg)",
        report.device.label(),
        report.device.weight_kg
    )];

    if report.groups.is_empty() {
        lines.push(format!("  No {noun} in the catalog carry {} kg", report.device.weight_kg));
        return lines.join("\n");
    }

    match &report.groups {
        AccessoryGroups::FloorStand(groups) => {
            for group in groups {
                lines.push(format!("{}:", group.manufacturer));
                for stand in &group.stands {
                    let height = stand
                        .max_height_cm
                        .map(|height| format!(", max height {height} cm"))
                        .unwrap_or_default();
                    lines.push(format!(
                        "  - [{}] {} (up to {} kg{height})",
                        stand.id, stand.name, stand.weight_capacity_kg
                    ));
                }
            }
        }
        AccessoryGroups::TableMount(groups) => {
            for group in groups {
                lines.push(format!("{} ({}):", group.manufacturer, group.style));
                for mount in &group.mounts {
                    lines.push(format!(
                        "  - [{}] {} (up to {} kg)",
                        mount.id, mount.name, mount.max_weight_kg
                    ));
                }
            }
        }
    }

    lines.join("\n")
}
