use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::{connect_with_settings, migrations::MIGRATOR};

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &[
        "clamps",
        "mounts",
        "adaptors",
        "wheelchairs",
        "aac_devices",
        "floorstands",
        "table_mounts",
        "idx_mounts_weight_capacity",
        "idx_floorstands_weight_capacity",
        "idx_table_mounts_max_weight",
    ];

    #[tokio::test]
    async fn migrations_create_catalog_tables() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for object in MANAGED_SCHEMA_OBJECTS {
            let count = sqlx::query("SELECT COUNT(*) AS count FROM sqlite_master WHERE name = ?")
                .bind(object)
                .fetch_one(&pool)
                .await
                .expect("check schema object")
                .get::<i64, _>("count");
            assert_eq!(count, 1, "missing schema object `{object}`");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent_and_recorded() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .expect("count applied migrations");
        assert_eq!(applied as usize, MIGRATOR.iter().count());
    }

    #[tokio::test]
    async fn negative_mount_capacity_is_rejected() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let result = sqlx::query(
            "INSERT INTO mounts (id, name, manufacturer, weight_capacity) VALUES (1, 'x', 'Rehadapt', -1)",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err(), "check constraint should reject negative capacity");
    }
}
