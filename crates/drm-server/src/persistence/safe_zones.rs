//! Safe zone registry persistence.

use anyhow::Result;
use drm_core::{nearest_safe_zone, GeoPoint, NewSafeZone, RoutingError, RoutingResult, SafeZone};
use sqlx::SqlitePool;

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct SafeZoneRow {
    zone_id: i64,
    zone_name: String,
    zone_lat: f64,
    zone_lon: f64,
    incident_type_id: i64,
}

impl From<SafeZoneRow> for SafeZone {
    fn from(row: SafeZoneRow) -> Self {
        SafeZone {
            id: row.zone_id,
            name: row.zone_name,
            lat: row.zone_lat,
            lon: row.zone_lon,
            incident_type_id: row.incident_type_id,
        }
    }
}

/// Insert a safe zone and return its id.
pub async fn insert_safe_zone(pool: &SqlitePool, zone: &NewSafeZone) -> Result<i64> {
    let (zone_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO safe_zone (zone_name, zone_lat, zone_lon, incident_type_id)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING zone_id
        "#,
    )
    .bind(&zone.zone_name)
    .bind(zone.zone_lat)
    .bind(zone.zone_lon)
    .bind(zone.incident_type_id)
    .fetch_one(pool)
    .await?;

    Ok(zone_id)
}

/// Load all safe zones.
pub async fn load_all_safe_zones(pool: &SqlitePool) -> Result<Vec<SafeZone>> {
    let rows = sqlx::query_as::<_, SafeZoneRow>(
        "SELECT zone_id, zone_name, zone_lat, zone_lon, incident_type_id FROM safe_zone ORDER BY zone_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SafeZone::from).collect())
}

/// Load safe zones registered for one incident category, ordered by id.
pub async fn load_safe_zones_by_category(
    pool: &SqlitePool,
    incident_type_id: i64,
) -> Result<Vec<SafeZone>> {
    let rows = sqlx::query_as::<_, SafeZoneRow>(
        r#"
        SELECT zone_id, zone_name, zone_lat, zone_lon, incident_type_id
        FROM safe_zone
        WHERE incident_type_id = ?1
        ORDER BY zone_id
        "#,
    )
    .bind(incident_type_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SafeZone::from).collect())
}

/// Find the registered safe zone of a category closest to `danger_point`.
///
/// Candidates are ranked by great-circle distance; on equal distance the
/// lowest zone id wins.
pub async fn find_nearest_safe_zone(
    pool: &SqlitePool,
    danger_point: GeoPoint,
    incident_type_id: i64,
) -> RoutingResult<SafeZone> {
    let zones = load_safe_zones_by_category(pool, incident_type_id)
        .await
        .map_err(|err| RoutingError::Storage(format!("failed to query safe zones: {err}")))?;

    nearest_safe_zone(danger_point, incident_type_id, &zones).cloned()
}
