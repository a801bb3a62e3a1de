use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::FatooraError;
use crate::crm::KommoClient;
use crate::mail::Mailer;
use crate::pdf::PdfConverter;
use crate::store::ProformaStore;

use super::auth::require_token;
use super::config::Config;
use super::handlers;

/// Everything the handlers and the poller share. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: ProformaStore,
    pub crm: KommoClient,
    pub mailer: Mailer,
    pub pdf: PdfConverter,
}

pub struct Application {
    port: u16,
    server: std::pin::Pin<Box<dyn std::future::Future<Output = std::io::Result<()>> + Send>>,
    state: AppState,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, FatooraError> {
        let store = ProformaStore::connect(&config.mongo.uri, &config.mongo.database).await?;
        store.initialize_indexes().await?;

        let crm = KommoClient::new(&config.kommo.subdomain, config.kommo.access_token.clone())?;
        let mailer = Mailer::new(config.mail.api_key.clone(), config.mail.from_email.clone())?;
        let pdf = config.pdf.converter();

        let state = AppState {
            config: Arc::new(config),
            store,
            crm,
            mailer,
            pdf,
        };

        let generation_routes = Router::new()
            .route("/generate-proforma-invoice", post(handlers::generate_proforma))
            .route("/generate-tax-invoice", post(handlers::generate_tax))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

        let app = Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .merge(generation_routes)
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| FatooraError::Config(format!("cannot bind {addr}: {e}")))?;
        let port = listener
            .local_addr()
            .map_err(|e| FatooraError::Config(e.to_string()))?
            .port();

        tracing::info!(port, "listening");

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
            state,
        })
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
