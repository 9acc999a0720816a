//! Nearest safe zone selection.

use crate::error::{RoutingError, RoutingResult};
use crate::geodesy::distance_between;
use crate::models::{GeoPoint, SafeZone};

/// Pick the safe zone of `incident_type_id` closest to `danger_point`.
///
/// Distance is the haversine great-circle distance. On an exact tie the
/// zone that comes first in `zones` wins, so callers that need a stable
/// answer should pass zones in a stable order (the store sorts by id).
pub fn nearest_safe_zone(
    danger_point: GeoPoint,
    incident_type_id: i64,
    zones: &[SafeZone],
) -> RoutingResult<&SafeZone> {
    zones
        .iter()
        .filter(|zone| zone.incident_type_id == incident_type_id)
        .map(|zone| (distance_between(danger_point, zone.location()), zone))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, zone)| zone)
        .ok_or(RoutingError::NotFound { incident_type_id })
}
