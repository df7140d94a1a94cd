use std::sync::Arc;

use axum::http::Method;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::classifier::BulletinClassifier;
use crate::config::Config;
use crate::fetcher::AlertaClient;
use crate::pdf_text::PdfExtractLoader;
use crate::services::{AlertService, BulletinService};

/// Application with the spawned HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Wire the services for a configuration into application state.
pub fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let client = AlertaClient::new(config)?;
    let classifier = BulletinClassifier::new(config.target_localities.as_slice());
    info!("Target localities: {:?}", classifier.localities());

    Ok(AppState {
        alert_service: AlertService::new(client.clone()),
        bulletin_service: BulletinService::new(client, Arc::new(PdfExtractLoader), classifier),
    })
}

impl Application {
    /// Build the services and spawn the HTTP API server (Axum)
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");
        let app_state = build_state(&config)?;

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers(Any);

        let app = create_router(app_state)
            .layer(cors)
            .layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
