pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use mountfinder_core::config::{AppConfig, LoadOptions, LogFormat};
use mountfinder_core::domain::{AccessoryKind, DeviceId, WheelchairId};
use mountfinder_core::recommendation::RecommendationOptions;
use std::process::ExitCode;

use crate::commands::catalog::Listing;
use crate::commands::recommend::{device_selector, RecommendArgs};
use crate::commands::{CommandResult, EXIT_USAGE};

#[derive(Debug, Parser)]
#[command(
    name = "mountfinder",
    about = "AAC device mount finder",
    long_about = "Recommend wheelchair mounting solutions and accessories for AAC devices from the reference catalog.",
    after_help = "Examples:\n  mountfinder migrate\n  mountfinder seed\n  mountfinder recommend --wheelchair 1 --device 1\n  mountfinder recommend --wheelchair 2 --make Smartbox --model \"Grid Pad 12\" --left-hand-side\n  mountfinder accessories --device 4 --kind table-mount --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending catalog migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic reference catalog and verify it")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, DB connectivity and catalog integrity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List catalog entries available for selection")]
    Catalog {
        #[arg(value_enum)]
        listing: ListingArg,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Recommend clamps and mounts for a wheelchair and AAC device")]
    Recommend {
        #[arg(long, help = "Wheelchair id")]
        wheelchair: i64,
        #[arg(
            long,
            help = "AAC device id",
            conflicts_with_all = ["make", "model"],
            required_unless_present = "make"
        )]
        device: Option<i64>,
        #[arg(long, requires = "model", help = "AAC device make")]
        make: Option<String>,
        #[arg(long, requires = "make", help = "AAC device model")]
        model: Option<String>,
        #[arg(long, help = "Mount on the left-hand side of the wheelchair")]
        left_hand_side: bool,
        #[arg(long, help = "The user accesses the device with eye gaze")]
        eyegaze: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Find floor stands or table mounts able to carry a device")]
    Accessories {
        #[arg(long, help = "AAC device id")]
        device: i64,
        #[arg(long, help = "floor-stand or table-mount")]
        kind: AccessoryKind,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ListingArg {
    Wheelchairs,
    Devices,
}

impl From<ListingArg> for Listing {
    fn from(value: ListingArg) -> Self {
        match value {
            ListingArg::Wheelchairs => Self::Wheelchairs,
            ListingArg::Devices => Self::Devices,
        }
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(config: &AppConfig) -> Result<(), String> {
    use tracing::Level;

    let log_level = config
        .logging
        .level
        .trim()
        .parse::<Level>()
        .map_err(|error| format!("logging.level `{}`: {error}", config.logging.level))?;
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| error.to_string())
}

pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => error.exit(),
        Err(error) => {
            eprint!("{error}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    // Commands report config failures themselves; logging just stays off.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("warning: logging disabled: {error}");
        }
    }

    let result = dispatch(cli.command);

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn dispatch(command: Command) -> CommandResult {
    match command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Catalog { listing, json } => commands::catalog::run(listing.into(), json),
        Command::Recommend { wheelchair, device, make, model, left_hand_side, eyegaze, json } => {
            match device_selector(device, make, model) {
                Ok(device) => commands::recommend::run(RecommendArgs {
                    wheelchair: WheelchairId(wheelchair),
                    device,
                    options: RecommendationOptions { left_hand_side, uses_eyegaze: eyegaze },
                    json,
                }),
                Err(message) => CommandResult::failure("recommend", "usage", message, EXIT_USAGE),
            }
        }
        Command::Accessories { device, kind, json } => {
            commands::accessories::run(DeviceId(device), kind, json)
        }
    }
}
