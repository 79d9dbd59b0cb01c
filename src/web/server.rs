use axum::{routing::delete, routing::get, routing::post, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::fetch::{ElementFetcher, ElementSource, FetchError};
use crate::predict::{GeodeticProjector, Sgp4Propagator};
use crate::tracker::{
    shared_registry, LatestFrame, PositionPipeline, SimulatedClock, Ticker, TrackerError,
    TrackingController,
};

use super::api::tracking as tracking_handlers;
use super::api_doc::ApiDoc;
use super::config::{Config, ConfigError};
use super::state::AppState;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("element source error: {0}")]
    Source(#[from] FetchError),
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

pub async fn run_server(config: Config) -> Result<(), ServeError> {
    let bind_addr = config.web.bind.clone();
    let source = ElementSource::from_config(&config.source)?;
    let registry = shared_registry();
    let controller = Arc::new(TrackingController::new(registry.clone(), source));

    let clock = SimulatedClock::starting_now(config.clock_step()?)?;
    let pipeline = PositionPipeline::new(
        Sgp4Propagator,
        GeodeticProjector::new(config.projection.reference_radius_km),
    );
    let latest = LatestFrame::default();
    let ticker = Ticker::new(clock, pipeline, registry).with_sink(latest.clone());
    let clock_rx = ticker.subscribe_time();
    let ticker = ticker.spawn(config.clock.tick_interval);

    spawn_initial_adds(&controller, &config.initial);

    let state = AppState {
        controller,
        clock: clock_rx,
        latest,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/tracked", post(tracking_handlers::add_tracked))
        .route("/api/tracked", get(tracking_handlers::list_tracked))
        .route(
            "/api/tracked/{id}",
            delete(tracking_handlers::remove_tracked),
        )
        .route("/api/clock", get(tracking_handlers::clock))
        .route("/api/positions", get(tracking_handlers::positions))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let ticks = ticker.stop().await;
    log::info!("Server stopped after {} ticks", ticks);
    Ok(())
}

/// Requests each id in the background; failures are logged, not fatal.
pub fn spawn_initial_adds<F>(controller: &Arc<TrackingController<F>>, ids: &[String])
where
    F: ElementFetcher + Send + Sync + 'static,
{
    for id in ids {
        let controller = controller.clone();
        let id = id.clone();
        tokio::spawn(async move {
            if let Err(e) = controller.request_add(&id).await {
                log::warn!("Initial satellite {} not added: {}", id, e);
            }
        });
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
