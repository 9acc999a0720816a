//! Shared application state.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::persistence::Database;
use crate::routing_service::RoutingService;
use crate::traffic::TrafficClient;

/// Read-only handles shared by every request.
pub struct AppState {
    db: Database,
    routing: RoutingService,
    traffic: TrafficClient,
}

impl AppState {
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let routing = RoutingService::from_config(config, db.pool().clone())
            .context("Failed to create routing service")?;
        let traffic = TrafficClient::from_config(config)?;
        Ok(Self::with_services(db, routing, traffic))
    }

    pub fn with_services(db: Database, routing: RoutingService, traffic: TrafficClient) -> Self {
        Self {
            db,
            routing,
            traffic,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn routing(&self) -> &RoutingService {
        &self.routing
    }

    pub fn traffic(&self) -> &TrafficClient {
        &self.traffic
    }
}
