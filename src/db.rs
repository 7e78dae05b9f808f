use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;
use tracing::info;

use crate::models::DeliveryRow;

pub type DbConn = Surreal<Db>;

const NAMESPACE: &str = "courier";
const DATABASE: &str = "deliveries";

/// Open the delivery store with the RocksDB backend
pub async fn connect(path: &Path) -> Result<DbConn> {
    let location = path.to_string_lossy().into_owned();
    let db = Surreal::new::<RocksDb>(location)
        .await
        .with_context(|| format!("Failed to open delivery store at {}", path.display()))?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    Ok(db)
}

/// In-memory store, used by tests and dry runs
pub async fn connect_memory() -> Result<DbConn> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    Ok(db)
}

/// Delete an existing on-disk store so a fresh dataset can be written
pub fn reset(path: &Path) -> Result<()> {
    if path.exists() {
        info!("Removing existing delivery store at {}", path.display());
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub async fn init_schema(db: &DbConn) -> Result<()> {
    db.query(
        r#"
        DEFINE TABLE delivery SCHEMAFULL;
        DEFINE FIELD delivery_id ON delivery TYPE int;
        DEFINE FIELD pickup_datetime ON delivery TYPE string;
        DEFINE FIELD package_type ON delivery TYPE string;
        DEFINE FIELD delivery_zone ON delivery TYPE string;
        DEFINE FIELD recipient_id ON delivery TYPE int;
        DEFINE INDEX idx_delivery_id ON delivery FIELDS delivery_id UNIQUE;
        "#,
    )
    .await?
    .check()?;

    Ok(())
}

pub async fn insert_deliveries(db: &DbConn, rows: &[DeliveryRow]) -> Result<usize> {
    for row in rows {
        db.query(
            r#"
            CREATE delivery CONTENT {
                delivery_id: $delivery_id,
                pickup_datetime: $pickup_datetime,
                package_type: $package_type,
                delivery_zone: $delivery_zone,
                recipient_id: $recipient_id
            };
            "#,
        )
        .bind(("delivery_id", row.delivery_id))
        .bind(("pickup_datetime", row.pickup_datetime.clone()))
        .bind(("package_type", row.package_type.clone()))
        .bind(("delivery_zone", row.delivery_zone.clone()))
        .bind(("recipient_id", row.recipient_id))
        .await?
        .check()
        .with_context(|| format!("Failed to insert delivery {}", row.delivery_id))?;
    }

    Ok(rows.len())
}

/// All delivery rows, ordered by id
pub async fn fetch_deliveries(db: &DbConn) -> Result<Vec<DeliveryRow>> {
    let rows: Vec<DeliveryRow> = db
        .query(
            r#"
            SELECT delivery_id, pickup_datetime, package_type, delivery_zone, recipient_id
            FROM delivery
            ORDER BY delivery_id
            "#,
        )
        .await?
        .take(0)?;
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: i64,
}

pub async fn count_deliveries(db: &DbConn) -> Result<i64> {
    let count: Option<CountResult> = db
        .query("SELECT count() AS count FROM delivery GROUP ALL")
        .await?
        .take(0)?;
    Ok(count.map(|c| c.count).unwrap_or(0))
}
