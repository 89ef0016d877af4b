use crate::commands::{
    prepare, CommandResult, EXIT_MIGRATION, EXIT_SEED_VERIFICATION, EXIT_STORE_UNAVAILABLE,
};
use mountfinder_db::{connect_with_settings, migrations, CatalogSeedDataset, TableSeedInfo};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), EXIT_STORE_UNAVAILABLE))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), EXIT_MIGRATION))?;

        let seed_result = CatalogSeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_MIGRATION))?;

        let verification = CatalogSeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), EXIT_SEED_VERIFICATION))?;

        let failed_checks = verification
            .checks
            .iter()
            .filter_map(|(check, passed)| (!passed).then_some(*check))
            .collect::<Vec<_>>();
        let run_result = if verification.all_present {
            Ok(seed_result.tables_seeded)
        } else {
            Err((
                "seed_verification",
                verification_failure_message(&failed_checks),
                EXIT_SEED_VERIFICATION,
            ))
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(tables) => CommandResult::success("seed", seed_summary(&tables)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn seed_summary(tables: &[TableSeedInfo]) -> String {
    let lines: Vec<String> = tables
        .iter()
        .map(|table| format!("  - {}: {} rows", table.table, table.expected_rows))
        .collect();
    format!("catalog seed dataset loaded:\n{}", lines.join("\n"))
}

fn verification_failure_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}
