//! ISL Gloss Server Entry Point

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use isl_gloss_config::{load_settings, Settings};
use isl_gloss_pipeline::GlossTranslator;
use isl_gloss_server::{create_router, init_metrics, AppState};
use isl_gloss_text_processing::{default_rules, load_rules, GlossPipeline, GlossRules};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ISL_GLOSS_ENV selects config/{env}.yaml on top of config/default.yaml
    let env = std::env::var("ISL_GLOSS_ENV").ok();
    let config = load_settings(env.as_deref())?;

    init_tracing(&config);

    tracing::info!("Starting ISL Gloss Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        env = ?env,
        port = config.server.port,
        strategy = %config.gloss.strategy,
        "Loaded configuration"
    );

    if config.observability.metrics_enabled {
        init_metrics()?;
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    let rules = load_gloss_rules(config.gloss.rules_path.as_deref());
    let pipeline = GlossPipeline::new(Arc::new(rules));

    // Collaborators are connected once; failures are cached, never retried
    let translator = GlossTranslator::connect(&config, pipeline).await;
    if let Some(reason) = translator.annotator().reason() {
        tracing::warn!(reason = %reason, "Text translation will fail until restart");
    }
    if let Some(reason) = translator.transcriber().reason() {
        tracing::warn!(reason = %reason, "Audio translation will fail until restart");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config, translator);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("isl_gloss={},tower_http=debug", level).into()
    });

    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Load gloss rules from file, falling back to the built-in defaults
fn load_gloss_rules(path: Option<&str>) -> GlossRules {
    let Some(path) = path.map(Path::new) else {
        tracing::info!("No gloss rules file configured. Using defaults.");
        return default_rules();
    };

    if !path.exists() {
        tracing::info!("Gloss rules not found at {}. Using defaults.", path.display());
        return default_rules();
    }

    match load_rules(path) {
        Ok(rules) => {
            tracing::info!(
                synonyms = rules.synonyms.len(),
                "Gloss rules loaded from: {}",
                path.display()
            );
            rules
        }
        Err(e) => {
            tracing::warn!(
                "Failed to load gloss rules from {}: {}. Using defaults.",
                path.display(),
                e
            );
            default_rules()
        }
    }
}
