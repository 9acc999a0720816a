use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use crate::{
    api,
    config::Config,
    persistence::{self, disaster_zones},
    routing_service::RoutingService,
    state::AppState,
    traffic::TrafficClient,
};
use drm_graphhopper::GraphHopperClient;

/// Stand-in for the routing engine and the traffic provider.
#[derive(Clone)]
struct MockUpstream {
    route_requests: Arc<Mutex<Vec<Value>>>,
    route_status: Arc<Mutex<StatusCode>>,
}

impl MockUpstream {
    fn route_requests(&self) -> Vec<Value> {
        self.route_requests.lock().unwrap().clone()
    }

    fn fail_routes_with(&self, status: StatusCode) {
        *self.route_status.lock().unwrap() = status;
    }
}

async fn mock_route(State(mock): State<MockUpstream>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    mock.route_requests.lock().unwrap().push(body);
    let status = *mock.route_status.lock().unwrap();
    if !status.is_success() {
        return (status, Json(json!({"message": "engine unavailable"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "hints": {"visited_nodes.sum": 100},
            "info": {"took": 3},
            "paths": [{
                "distance": 1060.843,
                "time": 780435,
                "points": {"type": "LineString", "coordinates": [[-6.26031, 53.349805], [-6.267, 53.344]]},
                "instructions": [{"distance": 661.29, "sign": 0, "interval": [0, 1], "text": "Continue", "time": 238065, "street_name": ""}]
            }]
        })),
    )
}

async fn mock_traffic(Query(query): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if query.get("key").map(String::as_str) != Some("tomtom-key") {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "Developer Inactive"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "flowSegmentData": {
                "currentSpeed": 31,
                "freeFlowSpeed": 45,
                "point": query.get("point").cloned().unwrap_or_default()
            }
        })),
    )
}

async fn spawn_upstream() -> (String, MockUpstream) {
    let mock = MockUpstream {
        route_requests: Arc::new(Mutex::new(Vec::new())),
        route_status: Arc::new(Mutex::new(StatusCode::OK)),
    };
    let app = Router::new()
        .route("/route", post(mock_route))
        .route("/traffic", get(mock_traffic))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), mock)
}

async fn setup_app() -> (Router, Arc<AppState>, MockUpstream) {
    let (upstream_url, mock) = spawn_upstream().await;
    let mut config = Config::from_lookup(|_| None);
    config.database_path = ":memory:".to_string();
    config.graphhopper_url = format!("{upstream_url}/route");
    config.graphhopper_key = "gh-key".to_string();
    config.tomtom_url = format!("{upstream_url}/traffic");
    config.tomtom_api_key = "tomtom-key".to_string();

    let db = persistence::init_database(&config.database_path, 1)
        .await
        .expect("init db");
    let engine = GraphHopperClient::new(
        &config.graphhopper_url,
        &config.graphhopper_key,
        Duration::from_secs(5),
    )
    .expect("engine client");
    let routing = RoutingService::new(engine, db.pool().clone());
    let traffic = TrafficClient::new(
        reqwest::Client::new(),
        &config.tomtom_url,
        &config.tomtom_api_key,
    );
    let state = Arc::new(AppState::with_services(db, routing, traffic));

    (api::app(state.clone()), state, mock)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seed_incidents(state: &AppState) {
    let pool = state.pool();
    disaster_zones::upsert_incident_type(pool, 1, "Flood").await.unwrap();
    disaster_zones::upsert_incident_type(pool, 2, "Fire").await.unwrap();
    // active, severity 2 -> 36 m
    disaster_zones::insert_incident(pool, 1, 53.349805, -6.26031, 2, 3)
        .await
        .unwrap();
    // resolved, ignored by routing
    disaster_zones::insert_incident(pool, 2, 53.36, -6.27, 4, 1)
        .await
        .unwrap();
    // active, severity 0 -> degenerate
    disaster_zones::insert_incident(pool, 2, 53.37, -6.28, 0, 3)
        .await
        .unwrap();
}

#[tokio::test]
async fn health_and_request_id() {
    let (app, _state, _mock) = setup_app().await;

    let response = app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn create_and_list_safe_zones() {
    let (app, _state, _mock) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/safe-zones",
            json!({"zone_name": "Safe Zone 1", "zone_lat": 53.12345, "zone_lon": -6.98765, "incident_type_id": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["zone_name"], "Safe Zone 1");
    let zone_id = body["zone_id"].as_i64().unwrap();

    let response = app.oneshot(get_request("/safe-zones")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body[0]["zone_id"], zone_id);
    assert_eq!(body[0]["incident_type_id"], 3);
}

#[tokio::test]
async fn create_safe_zone_rejects_bad_input() {
    let (app, _state, _mock) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/safe-zones",
            json!({"zone_name": "Nowhere", "zone_lat": 123.0, "zone_lon": 0.0, "incident_type_id": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json("/safe-zones", json!({"zone_name": 5})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_zones_reports_every_incident() {
    let (app, state, _mock) = setup_app().await;
    seed_incidents(&state).await;

    let response = app.oneshot(get_request("/zones")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let zones = body.as_array().unwrap();
    assert_eq!(zones.len(), 3);
    assert_eq!(zones[0]["incident_name"], "Flood");
    assert_eq!(zones[0]["radius"], 36.0);
}

#[tokio::test]
async fn safe_route_avoids_active_zones() {
    let (app, state, mock) = setup_app().await;
    seed_incidents(&state).await;

    let response = app
        .oneshot(get_request(
            "/routing?origin=53.35,-6.26&destination=53.34,-6.25",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["paths"][0]["distance"], 1060.843);

    let requests = mock.route_requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent["profile"], "car");
    assert_eq!(sent["ch.disable"], true);
    assert_eq!(sent["points"], json!([[-6.26, 53.35], [-6.25, 53.34]]));
    let features = sent["custom_model"]["areas"]["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["id"], "disaster_zone_1");
    assert_eq!(
        sent["custom_model"]["priority"],
        json!([{"if": "in_disaster_zone_1", "multiply_by": 0.0}])
    );
}

#[tokio::test]
async fn safe_route_validates_parameters_before_calling_engine() {
    let (app, _state, mock) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/routing?origin=53.35,-6.26"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["hint"].as_str().unwrap().starts_with("Example"));

    let response = app
        .oneshot(get_request(
            "/routing?origin=not,a,point&destination=53.34,-6.25",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("invalid coordinate"));
    assert!(body["hint"].is_string());

    assert!(mock.route_requests().is_empty());
}

#[tokio::test]
async fn engine_failure_is_bad_gateway() {
    let (app, _state, mock) = setup_app().await;
    mock.fail_routes_with(StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .oneshot(get_request(
            "/routing?origin=53.35,-6.26&destination=53.34,-6.25",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert_eq!(body["upstream_status"], 503);
}

#[tokio::test]
async fn evacuation_uses_nearest_safe_zone() {
    let (app, state, mock) = setup_app().await;
    let pool = state.pool();
    for (name, lat, lon) in [("Far", 53.50, -6.10), ("Near", 53.344, -6.267)] {
        persistence::safe_zones::insert_safe_zone(
            pool,
            &drm_core::NewSafeZone {
                zone_name: name.to_string(),
                zone_lat: lat,
                zone_lon: lon,
                incident_type_id: 3,
            },
        )
        .await
        .unwrap();
    }

    let response = app
        .oneshot(post_json(
            "/evacuation",
            json!({"danger_point": [53.349805, -6.26031], "incident_type_id": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = mock.route_requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent["profile"], "foot");
    assert_eq!(sent["points"], json!([[-6.26031, 53.349805], [-6.267, 53.344]]));
    assert_eq!(sent["snap_preventions"], json!(["motorway", "ferry", "tunnel"]));
    assert_eq!(sent["instructions"], true);
}

#[tokio::test]
async fn evacuation_with_explicit_destination_skips_lookup() {
    let (app, _state, mock) = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/evacuation",
            json!({
                "danger_point": [53.349805, -6.26031],
                "incident_type_id": 3,
                "safe_point": [53.3440, -6.2670]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mock.route_requests()[0]["points"][1], json!([-6.267, 53.344]));
}

#[tokio::test]
async fn evacuation_without_safe_zone_is_not_found() {
    let (app, _state, mock) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/evacuation",
            json!({"danger_point": [53.349805, -6.26031], "incident_type_id": 9}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(mock.route_requests().is_empty());

    let response = app
        .oneshot(post_json("/evacuation", json!({"danger_point": "here"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn avoidance_model_lists_skipped_zones() {
    let (app, state, _mock) = setup_app().await;
    seed_incidents(&state).await;

    let response = app.oneshot(get_request("/avoidance-model")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(body["model"]["areas"]["features"].as_array().unwrap().len(), 1);
    assert_eq!(body["skipped"][0]["zone_id"], 3);
    assert!(body["unreadable_rows"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn traffic_is_passed_through() {
    let (app, _state, _mock) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/traffic?lat=53.35&lon=-6.26"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["flowSegmentData"]["point"], "53.35,-6.26");

    let response = app.oneshot(get_request("/traffic?lat=53.35")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
