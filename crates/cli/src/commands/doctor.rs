use mountfinder_core::config::{AppConfig, LoadOptions};
use mountfinder_db::{check_integrity, connect_with_settings, IntegrityReport, SqlCatalogStore};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_catalog_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["database_connectivity", "catalog_integrity"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![
                DoctorCheck {
                    name: "database_connectivity",
                    status: CheckStatus::Fail,
                    details: format!("failed to initialize async runtime: {error}"),
                },
                skipped_integrity(),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to connect to database: {error}"),
                    },
                    skipped_integrity(),
                ];
            }
        };

        let connectivity = DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        };
        let integrity = match check_integrity(&SqlCatalogStore::new(pool.clone())).await {
            Ok(report) => integrity_check(&report),
            Err(error) => DoctorCheck {
                name: "catalog_integrity",
                status: CheckStatus::Fail,
                details: format!("catalog could not be read (run `mountfinder migrate`): {error}"),
            },
        };

        pool.close().await;
        vec![connectivity, integrity]
    })
}

fn integrity_check(report: &IntegrityReport) -> DoctorCheck {
    if report.is_clean() {
        return DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Pass,
            details: format!(
                "{} wheelchairs checked; frame clamps and tabled mounts resolve",
                report.wheelchairs_checked
            ),
        };
    }

    let mut problems = Vec::new();
    for unresolved in &report.unresolved_clamps {
        let ids: Vec<String> = unresolved.missing.iter().map(ToString::to_string).collect();
        problems.push(format!(
            "wheelchair {} ({}) references missing clamps [{}]",
            unresolved.wheelchair_id,
            unresolved.model,
            ids.join(", ")
        ));
    }
    if !report.missing_tabled_mounts.is_empty() {
        let ids: Vec<String> =
            report.missing_tabled_mounts.iter().map(ToString::to_string).collect();
        problems.push(format!("decision-table mounts missing from catalog [{}]", ids.join(", ")));
    }

    DoctorCheck { name: "catalog_integrity", status: CheckStatus::Fail, details: problems.join("; ") }
}

fn skipped_integrity() -> DoctorCheck {
    DoctorCheck {
        name: "catalog_integrity",
        status: CheckStatus::Skipped,
        details: "skipped because the database is unreachable".to_string(),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
