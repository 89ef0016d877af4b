use mountfinder_core::domain::{Device, Wheelchair};
use mountfinder_core::errors::ApplicationError;
use mountfinder_db::{CatalogStore, SqlCatalogStore};

use crate::commands::{application_failure, new_correlation_id, open_pool, prepare, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Listing {
    Wheelchairs,
    Devices,
}

impl Listing {
    fn command(self) -> &'static str {
        match self {
            Self::Wheelchairs => "catalog wheelchairs",
            Self::Devices => "catalog devices",
        }
    }
}

enum Listed {
    Wheelchairs(Vec<Wheelchair>),
    Devices(Vec<Device>),
}

pub fn run(listing: Listing, json_output: bool) -> CommandResult {
    let command = listing.command();
    let (config, runtime) = match prepare(command) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };
    let correlation_id = new_correlation_id();

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let store = SqlCatalogStore::new(pool.clone());
        let listed = match listing {
            Listing::Wheelchairs => store.list_wheelchairs().await.map(Listed::Wheelchairs),
            Listing::Devices => store.list_devices().await.map(Listed::Devices),
        };
        pool.close().await;
        Ok::<Listed, ApplicationError>(listed?)
    });

    match result {
        Ok(listed) if json_output => {
            let (count, data) = match &listed {
                Listed::Wheelchairs(rows) => (rows.len(), serde_json::to_value(rows)),
                Listed::Devices(rows) => (rows.len(), serde_json::to_value(rows)),
            };
            CommandResult::success_with_data(command, format!("{count} entries"), data.ok())
        }
        Ok(listed) => CommandResult::text(render_human(&listed)),
        Err(error) => application_failure(command, error, &correlation_id, json_output),
    }
}

fn render_human(listed: &Listed) -> String {
    match listed {
        Listed::Wheelchairs(rows) => {
            let mut lines = vec![format!("{} wheelchairs:", rows.len())];
            for wheelchair in rows {
                let clamps: Vec<String> =
                    wheelchair.frame_clamp_ids.iter().map(ToString::to_string).collect();
                lines.push(format!(
                    "  [{}] {} (frame clamps: {})",
                    wheelchair.id,
                    wheelchair.model,
                    clamps.join(", ")
                ));
            }
            lines.join("\n")
        }
        Listed::Devices(rows) => {
            let mut lines = vec![format!("{} devices:", rows.len())];
            for device in rows {
                let eyegaze = if device.eyegaze { ", eye gaze" } else { "" };
                lines.push(format!(
                    "  [{}] {} ({} kg{eyegaze})",
                    device.id,
                    device.label(),
                    device.weight_kg
                ));
            }
            lines.join("\n")
        }
    }
}
