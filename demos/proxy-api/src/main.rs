mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use btc_social_pulse::async_client::AsyncSocialPulseBuilder;
use btc_social_pulse::Settings;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        fallback = %settings.fallback,
        trend_rule = %settings.trend_rule,
        metric = %settings.metric,
        "starting social proxy"
    );

    let pulse = AsyncSocialPulseBuilder::from_settings(&settings).build().await?;

    let cors = cors_layer(&settings.allowed_origins)?;
    let addr = format!("0.0.0.0:{}", settings.port);
    let state = Arc::new(AppState { pulse, settings });

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/social-data", get(routes::social::get_social_data))
        .route("/api/btc-data", get(routes::posts::get_posts))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// CORS restricted to the configured frontend origins. Requests without an
/// `Origin` header (server-to-server) are served without CORS headers.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS]))
}
