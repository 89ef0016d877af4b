use std::collections::BTreeSet;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use mountfinder_core::domain::{
    parse_frame_clamp_ids, Accessory, AccessoryKind, AdapterRing, AdapterRingId, Clamp, ClampId,
    Device, DeviceId, FloorStand, FloorStandId, Manufacturer, Mount, MountId, TableMount,
    TableMountId, TableMountStyle, Wheelchair, WheelchairId,
};

use super::{CatalogStore, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogStore {
    pool: DbPool,
}

impl SqlCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode<T>(result: Result<T, sqlx::Error>) -> Result<T, RepositoryError> {
    result.map_err(|e| RepositoryError::Decode(e.to_string()))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn row_to_wheelchair(row: &SqliteRow) -> Result<Wheelchair, RepositoryError> {
    let id: i64 = decode(row.try_get("id"))?;
    let model: String = decode(row.try_get("model"))?;
    let frame_clamps: String = decode(row.try_get("frame_clamps"))?;
    let mount_location: Option<String> = decode(row.try_get("mount_location"))?;

    let frame_clamp_ids = parse_frame_clamp_ids(&frame_clamps)
        .map_err(|e| RepositoryError::Decode(format!("wheelchair {id}: {e}")))?;

    Ok(Wheelchair {
        id: WheelchairId(id),
        model,
        frame_clamp_ids,
        mount_location: mount_location.filter(|location| !location.trim().is_empty()),
    })
}

fn row_to_device(row: &SqliteRow) -> Result<Device, RepositoryError> {
    Ok(Device {
        id: DeviceId(decode(row.try_get("id"))?),
        make: decode(row.try_get("make"))?,
        model: decode(row.try_get("model"))?,
        weight_kg: decode(row.try_get("weight"))?,
        eyegaze: decode(row.try_get::<i64, _>("eyegaze"))? != 0,
    })
}

fn row_to_clamp(row: &SqliteRow) -> Result<Clamp, RepositoryError> {
    let manufacturer: String = decode(row.try_get("manufacturer"))?;
    Ok(Clamp {
        id: ClampId(decode(row.try_get("id"))?),
        name: decode(row.try_get("name"))?,
        manufacturer: Manufacturer::parse(&manufacturer),
        description: decode(row.try_get("description"))?,
        url: decode(row.try_get("url"))?,
    })
}

fn row_to_mount(row: &SqliteRow) -> Result<Mount, RepositoryError> {
    let manufacturer: String = decode(row.try_get("manufacturer"))?;
    Ok(Mount {
        id: MountId(decode(row.try_get("id"))?),
        name: decode(row.try_get("name"))?,
        manufacturer: Manufacturer::parse(&manufacturer),
        weight_capacity_kg: decode(row.try_get("weight_capacity"))?,
        description: decode(row.try_get("description"))?,
        url: decode(row.try_get("url"))?,
    })
}

fn row_to_adapter_ring(row: &SqliteRow) -> Result<AdapterRing, RepositoryError> {
    let manufacturer: String = decode(row.try_get("manufacturer"))?;
    Ok(AdapterRing {
        id: AdapterRingId(decode(row.try_get("id"))?),
        name: decode(row.try_get("name"))?,
        manufacturer: Manufacturer::parse(&manufacturer),
        description: decode(row.try_get("description"))?,
        url: decode(row.try_get("url"))?,
    })
}

fn row_to_floor_stand(row: &SqliteRow) -> Result<Accessory, RepositoryError> {
    let manufacturer: String = decode(row.try_get("manufacturer"))?;
    Ok(Accessory::FloorStand(FloorStand {
        id: FloorStandId(decode(row.try_get("id"))?),
        name: decode(row.try_get("name"))?,
        manufacturer: Manufacturer::parse(&manufacturer),
        description: decode(row.try_get("description"))?,
        url: decode(row.try_get("url"))?,
        weight_capacity_kg: decode(row.try_get("weight_capacity"))?,
        max_height_cm: decode(row.try_get("max_height"))?,
    }))
}

fn row_to_table_mount(row: &SqliteRow) -> Result<Accessory, RepositoryError> {
    let manufacturer: String = decode(row.try_get("manufacturer"))?;
    let style: String = decode(row.try_get("style"))?;
    Ok(Accessory::TableMount(TableMount {
        id: TableMountId(decode(row.try_get("id"))?),
        name: decode(row.try_get("name"))?,
        manufacturer: Manufacturer::parse(&manufacturer),
        description: decode(row.try_get("description"))?,
        url: decode(row.try_get("url"))?,
        max_weight_kg: decode(row.try_get("max_weight"))?,
        style: TableMountStyle::parse(&style),
    }))
}

#[async_trait::async_trait]
impl CatalogStore for SqlCatalogStore {
    async fn find_wheelchair(
        &self,
        id: WheelchairId,
    ) -> Result<Option<Wheelchair>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, model, frame_clamps, mount_location FROM wheelchairs WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_wheelchair).transpose()
    }

    async fn find_device(&self, id: DeviceId) -> Result<Option<Device>, RepositoryError> {
        let row =
            sqlx::query("SELECT id, make, model, weight, eyegaze FROM aac_devices WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(row_to_device).transpose()
    }

    async fn find_device_by_make_model(
        &self,
        make: &str,
        model: &str,
    ) -> Result<Option<Device>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, make, model, weight, eyegaze FROM aac_devices WHERE make = ? AND model = ?",
        )
        .bind(make)
        .bind(model)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_device).transpose()
    }

    async fn list_wheelchairs(&self) -> Result<Vec<Wheelchair>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, model, frame_clamps, mount_location FROM wheelchairs ORDER BY model",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_wheelchair).collect()
    }

    async fn list_devices(&self) -> Result<Vec<Device>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, make, model, weight, eyegaze FROM aac_devices ORDER BY make, model",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_device).collect()
    }

    async fn find_clamps_by_ids(
        &self,
        ids: &BTreeSet<ClampId>,
    ) -> Result<Vec<Clamp>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, manufacturer, description, url FROM clamps WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.0);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(row_to_clamp).collect()
    }

    async fn find_mounts_by_weight_at_least(
        &self,
        weight_kg: f64,
    ) -> Result<Vec<Mount>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, manufacturer, weight_capacity, description, url
             FROM mounts
             WHERE weight_capacity >= ?
             ORDER BY weight_capacity ASC, id ASC",
        )
        .bind(weight_kg)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_mount).collect()
    }

    async fn find_mounts_by_ids(
        &self,
        ids: &BTreeSet<MountId>,
    ) -> Result<Vec<Mount>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, manufacturer, weight_capacity, description, url
             FROM mounts WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.0);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(row_to_mount).collect()
    }

    async fn find_adapter_ring(
        &self,
        id: AdapterRingId,
    ) -> Result<Option<AdapterRing>, RepositoryError> {
        let row =
            sqlx::query("SELECT id, name, manufacturer, description, url FROM adaptors WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(row_to_adapter_ring).transpose()
    }

    async fn find_accessories_by_weight(
        &self,
        kind: AccessoryKind,
        weight_kg: f64,
    ) -> Result<Vec<Accessory>, RepositoryError> {
        match kind {
            AccessoryKind::FloorStand => {
                let rows = sqlx::query(
                    "SELECT id, name, manufacturer, description, url, weight_capacity, max_height
                     FROM floorstands
                     WHERE weight_capacity >= ?
                     ORDER BY weight_capacity ASC, id ASC",
                )
                .bind(weight_kg)
                .fetch_all(&self.pool)
                .await?;

                rows.iter().map(row_to_floor_stand).collect()
            }
            AccessoryKind::TableMount => {
                let rows = sqlx::query(
                    "SELECT id, name, manufacturer, description, url, max_weight, style
                     FROM table_mounts
                     WHERE max_weight >= ?
                     ORDER BY max_weight ASC, id ASC",
                )
                .bind(weight_kg)
                .fetch_all(&self.pool)
                .await?;

                rows.iter().map(row_to_table_mount).collect()
            }
        }
    }
}
