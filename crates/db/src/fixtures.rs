use sqlx::Executor;

use crate::connection::DbPool;
use crate::finder::check_integrity;
use crate::repositories::{RepositoryError, SqlCatalogStore};

/// Row counts the seed catalog is expected to contain, per table.
const SEED_TABLES: &[SeedTableContract] = &[
    SeedTableContract { table: "clamps", label: "seed-clamps", expected_rows: 5 },
    SeedTableContract { table: "mounts", label: "seed-mounts", expected_rows: 13 },
    SeedTableContract { table: "adaptors", label: "seed-adapter-rings", expected_rows: 1 },
    SeedTableContract { table: "wheelchairs", label: "seed-wheelchairs", expected_rows: 5 },
    SeedTableContract { table: "aac_devices", label: "seed-devices", expected_rows: 8 },
    SeedTableContract { table: "floorstands", label: "seed-floor-stands", expected_rows: 3 },
    SeedTableContract { table: "table_mounts", label: "seed-table-mounts", expected_rows: 4 },
];

/// Deterministic reference catalog covering every weight band, both mounting sides,
/// a cross-manufacturer wheelchair and a device too heavy for every Daessy mount.
pub struct CatalogSeedDataset;

impl CatalogSeedDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/catalog_seed.sql");

    /// Load the seed catalog. Re-running replaces rows in place.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let tables_seeded = SEED_TABLES
            .iter()
            .map(|contract| TableSeedInfo {
                table: contract.table,
                expected_rows: contract.expected_rows,
            })
            .collect();

        Ok(SeedResult { tables_seeded })
    }

    /// Verify seed rows exist and every wheelchair's frame clamps resolve.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for contract in SEED_TABLES {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(1) FROM {}", contract.table))
                .fetch_one(pool)
                .await?;
            checks.push((contract.label, count >= contract.expected_rows));
        }

        // A wheelchair row that no longer decodes cannot have resolvable clamps.
        match check_integrity(&SqlCatalogStore::new(pool.clone())).await {
            Ok(report) => {
                checks.push(("seed-tabled-mounts", report.missing_tabled_mounts.is_empty()));
                checks.push(("seed-frame-clamps-resolve", report.unresolved_clamps.is_empty()));
            }
            Err(RepositoryError::Decode(_)) => {
                checks.push(("seed-frame-clamps-resolve", false));
            }
            Err(error) => return Err(error),
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedTableContract {
    table: &'static str,
    label: &'static str,
    expected_rows: i64,
}

#[derive(Debug)]
pub struct SeedResult {
    pub tables_seeded: Vec<TableSeedInfo>,
}

#[derive(Debug)]
pub struct TableSeedInfo {
    pub table: &'static str,
    pub expected_rows: i64,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect_with_settings, migrations};

    #[test]
    fn sql_fixture_is_valid() {
        assert!(CatalogSeedDataset::SQL.contains("INSERT OR REPLACE INTO mounts"));
    }

    #[tokio::test]
    async fn verify_seed_contract_and_idempotency() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30)
            .await
            .expect("connect to test database");

        migrations::run_pending(&pool).await.expect("run migrations");

        let before = CatalogSeedDataset::verify(&pool).await.expect("verify empty catalog");
        assert!(!before.all_present);

        let first = CatalogSeedDataset::load(&pool).await.expect("load seed fixtures");
        let first_verification =
            CatalogSeedDataset::verify(&pool).await.expect("verify seed fixtures");
        assert!(first_verification.all_present, "{:?}", first_verification.checks);
        assert_eq!(first.tables_seeded.len(), SEED_TABLES.len());

        CatalogSeedDataset::load(&pool).await.expect("reload seed fixtures");
        let second_verification =
            CatalogSeedDataset::verify(&pool).await.expect("re-verify seed fixtures");
        assert_eq!(first_verification.checks, second_verification.checks);

        let mounts: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM mounts")
            .fetch_one(&pool)
            .await
            .expect("count mounts");
        assert_eq!(mounts, 13, "reloading must not duplicate rows");
    }

    #[tokio::test]
    async fn dangling_frame_clamp_fails_verification() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        CatalogSeedDataset::load(&pool).await.expect("seed");

        sqlx::query("UPDATE wheelchairs SET frame_clamps = '1, 99' WHERE id = 5")
            .execute(&pool)
            .await
            .expect("break reference");

        let verification = CatalogSeedDataset::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);
        assert!(verification.checks.contains(&("seed-frame-clamps-resolve", false)));
        assert!(verification.checks.contains(&("seed-tabled-mounts", true)));
    }

    #[tokio::test]
    async fn malformed_frame_clamp_list_fails_verification() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        CatalogSeedDataset::load(&pool).await.expect("seed");

        sqlx::query("UPDATE wheelchairs SET frame_clamps = '1,,x' WHERE id = 2")
            .execute(&pool)
            .await
            .expect("corrupt row");

        let verification = CatalogSeedDataset::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);
        assert!(verification.checks.contains(&("seed-frame-clamps-resolve", false)));
    }

    #[tokio::test]
    async fn removing_a_decision_table_mount_fails_verification() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");
        CatalogSeedDataset::load(&pool).await.expect("seed");

        sqlx::query("DELETE FROM mounts WHERE id = 13")
            .execute(&pool)
            .await
            .expect("delete mount");

        let verification = CatalogSeedDataset::verify(&pool).await.expect("verify");
        assert!(!verification.all_present);
        assert!(verification.checks.contains(&("seed-tabled-mounts", false)));
    }
}
