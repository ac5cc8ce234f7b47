use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use reqwest::Client;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    Res, api,
    config::Config,
    error::Error,
    gemini::{GeminiClient, TextGenerator},
    session::SessionCodec,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Immutable per-process state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
    pub codec: SessionCodec,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Wires the production components from `config`.
    pub fn new(config: Config) -> Res<Self> {
        let http = build_http_client(&config)?;
        let generator = Arc::new(GeminiClient::from_config(&config, http.clone()));

        Ok(Self::with_generator(config, http, generator))
    }

    pub fn with_generator(config: Config, http: Client, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            codec: SessionCodec::new(&config.session_secret),
            config: Arc::new(config),
            http,
            generator,
        }
    }
}

/// HTTP client shared by all outbound calls; every request is bounded by
/// the configured upstream timeout.
pub fn build_http_client(config: &Config) -> Res<Client> {
    Client::builder()
        .timeout(config.upstream_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(config.upstream_timeout))
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))
}

pub fn router(state: AppState) -> Res<Router> {
    if state.config.frontend_origin.trim() == "*" {
        return Err(Error::Config(
            "FRONTEND_ORIGIN: '*' cannot be combined with credentialed requests".into(),
        ));
    }
    let origin = HeaderValue::from_str(&state.config.frontend_origin)
        .map_err(|e| Error::Config(format!("FRONTEND_ORIGIN: {e}")))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/auth/spotify/login", get(api::login))
        .route("/auth/spotify/callback", get(api::callback))
        .route("/auth/spotify/refresh", post(api::refresh))
        .route("/auth/session", get(api::session))
        .route("/recommendations", get(api::recommendations))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| Error::Config(format!("Failed to parse server address: {e}")))?;

    let app = router(AppState::new(config)?)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "SoundShift API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SoundShift API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
