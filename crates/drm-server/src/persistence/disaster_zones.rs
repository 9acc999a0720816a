//! Disaster zone reads from the incident store.
//!
//! Zones are derived from incidents: the centre is the incident location and
//! the radius grows with severity.

use anyhow::Result;
use drm_core::DisasterZone;
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Meters of avoidance radius per severity level.
pub const RADIUS_PER_SEVERITY_M: f64 = 18.0;

/// Incident status treated as "currently active".
pub const ACTIVE_STATUS_ID: i64 = 3;

const ZONE_SELECT: &str = r#"
    SELECT i.incident_id, t.type_name, i.latitude, i.longitude, i.severity_id
    FROM incident i
    JOIN incident_type t ON i.type_id = t.type_id
"#;

/// An incident row that could not be turned into a zone.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub incident_id: Option<i64>,
    pub reason: String,
}

/// Zones read from the store plus rows that were left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ZoneScan {
    pub zones: Vec<DisasterZone>,
    pub skipped: Vec<SkippedRow>,
}

/// Load every incident as a disaster zone.
pub async fn load_all_zones(pool: &SqlitePool) -> Result<ZoneScan> {
    let sql = format!("{ZONE_SELECT} ORDER BY i.incident_id");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(scan_rows(&rows))
}

/// Load only incidents that are currently active.
pub async fn load_active_zones(pool: &SqlitePool) -> Result<ZoneScan> {
    let sql = format!("{ZONE_SELECT} WHERE i.status_id = ?1 ORDER BY i.incident_id");
    let rows = sqlx::query(&sql)
        .bind(ACTIVE_STATUS_ID)
        .fetch_all(pool)
        .await?;
    Ok(scan_rows(&rows))
}

fn scan_rows(rows: &[SqliteRow]) -> ZoneScan {
    let mut scan = ZoneScan::default();
    for row in rows {
        match zone_from_row(row) {
            Ok(zone) => scan.zones.push(zone),
            Err(err) => {
                let incident_id = row.try_get::<i64, _>("incident_id").ok();
                tracing::warn!("Skipping incident {:?}: {}", incident_id, err);
                scan.skipped.push(SkippedRow {
                    incident_id,
                    reason: err.to_string(),
                });
            }
        }
    }
    scan
}

fn zone_from_row(row: &SqliteRow) -> Result<DisasterZone, sqlx::Error> {
    let severity: i64 = row.try_get("severity_id")?;
    Ok(DisasterZone {
        id: row.try_get("incident_id")?,
        name: row.try_get("type_name")?,
        lat: row.try_get("latitude")?,
        lon: row.try_get("longitude")?,
        radius_m: severity as f64 * RADIUS_PER_SEVERITY_M,
    })
}

/// Register an incident category. Existing ids are renamed.
pub async fn upsert_incident_type(pool: &SqlitePool, type_id: i64, type_name: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO incident_type (type_id, type_name) VALUES (?1, ?2)
        ON CONFLICT(type_id) DO UPDATE SET type_name = ?2
        "#,
    )
    .bind(type_id)
    .bind(type_name)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record an incident; returns its id. Used to seed the store.
pub async fn insert_incident(
    pool: &SqlitePool,
    type_id: i64,
    lat: f64,
    lon: f64,
    severity_id: i64,
    status_id: i64,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO incident (type_id, latitude, longitude, severity_id, status_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(type_id)
    .bind(lat)
    .bind(lon)
    .bind(severity_id)
    .bind(status_id)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}
