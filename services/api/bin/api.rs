//! Main Entrypoint for the Debate API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading prompt templates.
//! 3. Building the opener and responder agents and the turn scheduler.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use debate_api::{
    config::{Config, load_prompts},
    router::create_router,
    state::{AppState, DebateScheduler, OpenerPort, ResponderPort},
};
use debate_core::{
    DebatePrompts, TurnScheduler,
    providers::{GeminiOpener, OpenAIResponder},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal. Shutting down gracefully..."),
        Err(e) => error!(error = %e, "Failed to install Ctrl+C handler"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load Prompts ---
    let prompts = match load_prompts(&config.prompts_path) {
        Ok(templates) => DebatePrompts::from_templates(&templates),
        Err(e) => {
            warn!(
                path = %config.prompts_path.display(),
                error = %e,
                "Prompts directory unavailable, using built-in prompts"
            );
            DebatePrompts::default()
        }
    };

    // --- 4. Build Agents and Scheduler ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.openai_api_key)
        .with_api_base(&config.openai_api_base);
    let responder: ResponderPort = Arc::new(
        OpenAIResponder::new(
            openai_config,
            config.openai_model.clone(),
            prompts.opening.clone(),
        )
        .with_max_tokens(config.responder_max_tokens),
    );
    let opener: OpenerPort = Arc::new(
        GeminiOpener::new(
            config.gemini_api_key.clone(),
            &config.gemini_model,
            prompts.opening.clone(),
        )
        .with_base_url(config.gemini_api_base.clone()),
    );

    let mut scheduler: DebateScheduler = TurnScheduler::new(opener, responder, &prompts)
        .with_partial_failure_policy(config.partial_failure_policy);
    if let Some(timeout) = config.agent_timeout {
        scheduler = scheduler.with_timeout(timeout);
    }

    info!(
        policy = ?scheduler.policy(),
        timeout = ?config.agent_timeout,
        "Turn scheduler configured"
    );

    let app_state = Arc::new(AppState::new(scheduler));

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        opener_model = %config.gemini_model,
        responder_model = %config.openai_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
