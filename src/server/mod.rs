//! HTTP front end.
//!
//! Serves a help page, a health check and two JSON endpoints that drive the
//! same [`Pusher`] workflow as the CLI. Push output is streamed back as
//! `text/plain`, one line per docker output line, ending with a `SUCCESS:` or
//! `ERROR:` line.

mod handlers;

use crate::adapters::{DockerCli, EcrRegistry};
use crate::core::pusher::Pusher;
use crate::core::{ContainerEngine, RegistryClient, RegistryTarget};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub type DynPusher = Pusher<dyn RegistryClient, dyn ContainerEngine>;

/// Builds a workflow for the registry named in each request.
#[async_trait]
pub trait PusherFactory: Send + Sync + 'static {
    async fn create(&self, target: RegistryTarget) -> Result<DynPusher>;
}

/// Real AWS + docker CLI wiring.
#[derive(Debug, Clone)]
pub struct AwsPusherFactory {
    docker: DockerCli,
}

impl AwsPusherFactory {
    pub fn new(docker_binary: impl Into<String>) -> Self {
        Self {
            docker: DockerCli::new(docker_binary),
        }
    }
}

#[async_trait]
impl PusherFactory for AwsPusherFactory {
    async fn create(&self, target: RegistryTarget) -> Result<DynPusher> {
        let registry: Arc<dyn RegistryClient> = Arc::new(EcrRegistry::connect(&target.region).await);
        let engine: Arc<dyn ContainerEngine> = Arc::new(self.docker.clone());
        Ok(Pusher::new(target, registry, engine))
    }
}

#[derive(Clone)]
pub struct AppState {
    factory: Arc<dyn PusherFactory>,
}

impl AppState {
    pub fn new(factory: impl PusherFactory) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/connect", post(handlers::connect))
        .route("/api/push", post(handlers::push))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub async fn serve(state: AppState, address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| AppError::ServerError {
            message: format!("failed to bind {}: {}", address, e),
        })?;

    tracing::info!("🌐 Listening on http://{}", address);

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| AppError::ServerError {
            message: e.to_string(),
        })
}
