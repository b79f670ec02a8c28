use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    classify::ServerErrorsFailureClass, limit::RequestBodyLimitLayer, trace::TraceLayer,
};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
mod handlers;
pub mod naming;
pub mod staging;
pub mod upload_reply;

#[cfg(test)] // <-- not needed in integration tests
extern crate rstest;

use crate::config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::upload, handlers::health),
    components(schemas(kernel::FileReport)),
    tags(
        (name = "uploads", description = "Upload receiving API")
    )
)]
struct ApiDoc;

pub async fn run() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "upsave=debug,server=debug,kernel=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if let Err(e) = tokio::fs::create_dir_all(&config.save_dir).await {
        tracing::error!(
            "save directory {} cannot be created: {e}",
            config.save_dir.display()
        );
        return;
    }

    let socket = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match TcpListener::bind(socket).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("cannot listen on {socket}: {e}");
            return;
        }
    };
    tracing::debug!("listening on {socket}");
    tracing::debug!("saving files into {}", config.save_dir.display());

    let app = create_routes(config);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {e}");
    }
}

pub fn create_routes(config: Config) -> Router {
    let body_limit = config.body_limit;
    Router::new()
        .route("/api/upload", post(handlers::upload))
        .route("/api/health", get(handlers::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        tracing::error!("Server error: {error}");
                    },
                ))
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(body_limit))
                .into_inner(),
        )
        .with_state(Arc::new(config))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, starting graceful shutdown");
}
