mod access_log;
mod auth;
mod error;
mod handlers;
mod types;

pub use auth::BearerAuth;
pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::middleware;
use axum::routing::{MethodRouter, get};
use log::{info, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::conf::{Config, CorsConfig};
use crate::core::RestplateError;
use crate::resource;
use crate::service::ResourceService;
use crate::store::Store;

pub struct RestplateApi {
    services: Vec<Arc<ResourceService>>,
    auth: Option<BearerAuth>,
    cors: CorsConfig,
}

impl RestplateApi {
    pub fn new(services: Vec<ResourceService>) -> Self {
        Self {
            services: services.into_iter().map(Arc::new).collect(),
            auth: None,
            cors: CorsConfig::default(),
        }
    }

    /// Requires `Authorization: Bearer <token>` on every resource route.
    pub fn with_auth(mut self, token: Option<&str>) -> Self {
        self.auth = token.map(BearerAuth::new);
        self
    }

    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    /// Initializes every configured resource against `store`.
    pub async fn from_config(config: &Config, store: Arc<dyn Store>) -> Result<Self, RestplateError> {
        let mut services = Vec::new();
        for def in resource::load_resources(config)? {
            let service = ResourceService::new(def, Arc::clone(&store));
            service.init().await?;
            services.push(service);
        }
        Ok(Self::new(services)
            .with_auth(config.auth.api_token.as_deref())
            .with_cors(config.cors.clone()))
    }

    pub fn router(&self) -> Router {
        let mut resources = Router::new();
        for service in &self.services {
            resources = resources.merge(resource_router(Arc::clone(service)));
        }
        if let (Some(auth), false) = (&self.auth, self.services.is_empty()) {
            resources = resources.route_layer(middleware::from_fn_with_state(
                auth.clone(),
                auth::auth_middleware,
            ));
        }

        Router::new()
            .route(resource::HEALTH_PATH, get(handlers::health))
            .merge(resources)
            .layer(build_cors_layer(&self.cors))
            .layer(middleware::from_fn(access_log::log_requests))
    }

    pub async fn serve(self, addr: &str) -> Result<(), RestplateError> {
        if self.auth.is_none() {
            warn!("No API token configured, resource routes are open");
        }
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RestplateError::IoError(format!("binding to {addr}: {e}")))?;
        info!("Listening on {addr}");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RestplateError::IoError(format!("serving: {e}")))?;
        Ok(())
    }
}

fn resource_router(service: Arc<ResourceService>) -> Router {
    let def = service.def();
    let mut item: MethodRouter<Arc<ResourceService>> =
        get(handlers::get_one).delete(handlers::delete);
    if def.updatable {
        item = item.patch(handlers::update);
    }

    Router::new()
        .route(&def.path, get(handlers::list).post(handlers::create))
        .route(&format!("{}/{{id}}", def.path), item)
        .with_state(Arc::clone(&service))
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.iter().any(|o| o == "*") => cors.allow_origin(Any),
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = o.as_str(); "Dropping unparsable CORS origin");
                        None
                    }
                })
                .collect();
            cors.allow_origin(parsed)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
