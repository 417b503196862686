//! Jowar Harvest & Price Prediction Service - Backend Server
//!
//! Estimates a sorghum harvest date from a sowing date and coordinates via
//! growing-degree-day accumulation over a weather forecast, then predicts the
//! mandi price at that date with a pre-trained regression model fed by two
//! lagged historical price observations.

use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod model;
mod routes;
mod services;

pub use config::Config;

use external::{market::MarketClient, weather::WeatherClient};
use model::LinearPriceModel;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherClient,
    pub market: MarketClient,
    pub model: Arc<LinearPriceModel>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jpp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Jowar Harvest & Price Prediction Server");
    tracing::info!("Environment: {}", config.environment);

    // Load the price regression artifact once; shared read-only afterwards
    tracing::info!(
        "Loading price model artifact from {}",
        config.model.artifact_path
    );
    let price_model = LinearPriceModel::load(&config.model.artifact_path)?;
    tracing::info!("Price model artifact loaded");

    let weather = WeatherClient::new(
        config.weather.api_key.clone(),
        config.weather.api_endpoint.clone(),
    );
    let market = MarketClient::new(
        config.market.api_key.clone(),
        config.market.resource_id.clone(),
        config.market.api_endpoint.clone(),
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        weather,
        market,
        model: Arc::new(price_model),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid server bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Jowar Harvest & Price Prediction API v1.0"
}
