use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use mountfinder_cli::commands::recommend::{DeviceSelector, RecommendArgs};
use mountfinder_cli::commands::{accessories, catalog, doctor, migrate, recommend, seed};
use mountfinder_core::domain::{AccessoryKind, DeviceId, WheelchairId};
use mountfinder_core::recommendation::RecommendationOptions;
use serde_json::Value;

#[test]
fn migrate_returns_success_with_valid_env() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_malformed_env() {
    with_env(&[("MOUNTFINDER_DATABASE_MAX_CONNECTIONS", "many")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed success: {}", first.output);
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["command"], "seed");
        assert!(first_payload["message"].as_str().unwrap_or("").contains("  - mounts: 13 rows"));

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

#[test]
fn recommend_json_returns_bundle_for_seeded_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = recommend::run(RecommendArgs {
            wheelchair: WheelchairId(1),
            device: DeviceSelector::Id(DeviceId(1)),
            options: RecommendationOptions::default(),
            json: true,
        });
        assert_eq!(result.exit_code, 0, "expected bundle: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        let sections = payload["data"]["sections"].as_array().expect("sections array");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["manufacturer"], "rehadapt");
        assert_eq!(sections[0]["mounts"]["status"], "ranked");
        assert_eq!(sections[0]["mounts"]["primary"]["id"], 3);
        assert_eq!(sections[1]["mounts"]["primary"]["id"], 7);
        assert_eq!(payload["data"]["cross_manufacturer"]["eligible"], true);
    });
}

#[test]
fn recommend_by_make_and_model_renders_left_hand_solution() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = recommend::run(RecommendArgs {
            wheelchair: WheelchairId(2),
            device: DeviceSelector::MakeModel {
                make: "Smartbox".to_string(),
                model: "Grid Pad 12".to_string(),
            },
            options: RecommendationOptions { left_hand_side: true, uses_eyegaze: false },
            json: false,
        });

        assert_eq!(result.exit_code, 0, "{}", result.output);
        assert!(result.output.contains("Recommended mount: [2]"), "{}", result.output);
        assert!(result.output.contains("Left-hand mounting"));
    });
}

#[test]
fn recommend_unknown_wheelchair_is_a_warning_with_correlation_id() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = recommend::run(RecommendArgs {
            wheelchair: WheelchairId(99),
            device: DeviceSelector::Id(DeviceId(1)),
            options: RecommendationOptions::default(),
            json: true,
        });

        assert_eq!(result.exit_code, 7);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_selection");
        assert!(!payload["data"]["correlation_id"].as_str().unwrap_or("").is_empty());
        assert!(payload.get("data").and_then(|data| data.get("sections")).is_none());
    });
}

#[test]
fn recommend_against_unmigrated_catalog_reports_store_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        let result = recommend::run(RecommendArgs {
            wheelchair: WheelchairId(1),
            device: DeviceSelector::Id(DeviceId(1)),
            options: RecommendationOptions::default(),
            json: true,
        });

        assert_eq!(result.exit_code, 4);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "store_unavailable");
    });
}

#[test]
fn accessories_and_catalog_listing_use_seeded_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let stands = accessories::run(DeviceId(1), AccessoryKind::FloorStand, true);
        assert_eq!(stands.exit_code, 0, "{}", stands.output);
        let payload = parse_payload(&stands.output);
        assert_eq!(payload["message"], "2 suitable accessories");
        assert_eq!(payload["data"]["groups"]["kind"], "floor_stand");

        let devices = catalog::run(catalog::Listing::Devices, true);
        assert_eq!(devices.exit_code, 0);
        assert_eq!(parse_payload(&devices.output)["message"], "8 entries");
    });
}

#[test]
fn doctor_passes_on_seeded_catalog() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = database_url(dir.path());
    with_env(&[("MOUNTFINDER_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = doctor::run(true);
        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass", "{}", result.output);
        assert_eq!(result.exit_code, 0);
        let names: Vec<&str> = report["checks"]
            .as_array()
            .expect("checks array")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(names, vec!["config_validation", "database_connectivity", "catalog_integrity"]);
    });
}

fn database_url(dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", dir.join("catalog.db").display())
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "MOUNTFINDER_DATABASE_URL",
        "MOUNTFINDER_DATABASE_MAX_CONNECTIONS",
        "MOUNTFINDER_DATABASE_TIMEOUT_SECS",
        "MOUNTFINDER_CATALOG_ADAPTER_RING_ID",
        "MOUNTFINDER_LOGGING_LEVEL",
        "MOUNTFINDER_LOGGING_FORMAT",
        "MOUNTFINDER_LOG_LEVEL",
        "MOUNTFINDER_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
