mod config;
mod handlers;
mod models;
mod services;
#[cfg(feature = "web-server")]
mod web; // Browser UI: profile sidebar + three task panels

#[cfg(feature = "web-server")]
use web::server::{create_router, AppState};

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::SessionSweeper;
use services::SessionRegistry;
#[cfg(feature = "web-server")]
use handlers::CompanionHandler;
#[cfg(feature = "web-server")]
use services::{GeminiService, SessionSigner};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting AI Health Companion...");

    let config = Config::from_env()?;

    let sessions = Arc::new(SessionRegistry::new());

    let mut sweeper = SessionSweeper::new(sessions.clone(), config.session_idle).await?;
    sweeper.start().await?;

    #[cfg(feature = "web-server")]
    {
        let gemini = Arc::new(GeminiService::new(
            config.api_key.clone(),
            config.model.clone(),
            config.api_base.clone(),
            config.model_timeout,
        )?);
        log::info!(
            "✅ Gemini service initialized with model: {} (timeout: {}s)",
            config.model,
            config.model_timeout.as_secs()
        );

        let state = Arc::new(AppState {
            sessions: sessions.clone(),
            signer: SessionSigner::new(config.session_secret.clone())?,
            companion: Arc::new(CompanionHandler::new(gemini)),
        });
        let app = create_router(state, &config.static_dir);

        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
        log::info!("🌐 Web server listening on http://{}", config.bind_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("❌ Web server stopped: {}", e);
            }
        });
    }

    #[cfg(not(feature = "web-server"))]
    {
        log::warn!("⚠️ Built without the web-server feature; nothing to serve");
    }

    log::info!("🎉 Health companion is ready!");

    tokio::signal::ctrl_c().await?;

    log::info!("🛑 Shutting down...");
    sweeper.stop().await?;

    Ok(())
}
