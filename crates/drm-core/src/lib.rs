pub mod avoidance;
pub mod error;
pub mod geodesy;
pub mod models;
pub mod route;
pub mod safe_zone;

pub use avoidance::{
    build_avoidance_model, build_avoidance_outcome, feature_id_for_zone, rasterize_circle,
    zone_id_from_feature_id, AvoidanceModel, AvoidanceOutcome, CircleRasterizer, Feature,
    FeatureCollection, GeoJsonType, Polygon, PolygonRing, PriorityRule, SkippedZone,
    DEFAULT_CIRCLE_SEGMENTS,
};
pub use error::{RoutingError, RoutingResult};
pub use geodesy::{destination_point, distance_between, haversine_distance, EARTH_RADIUS_M};
pub use models::{DisasterZone, GeoPoint, NewSafeZone, SafeZone};
pub use route::{
    Instruction, Profile, RoutePath, RouteRequest, RouteResponse, EVACUATION_SNAP_PREVENTIONS,
};
pub use safe_zone::nearest_safe_zone;
