mod advice;
mod analysis;
mod config;
mod documents;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod skills;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::classifier::FitClassifier;
use crate::routes::build_router;
use crate::skills::extraction::SkillExtraction;
use crate::skills::lexicon::SkillLexicon;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillFit API v{}", env!("CARGO_PKG_VERSION"));

    let lexicon = SkillLexicon::global();
    info!(entries = lexicon.len(), "Skill lexicon loaded");

    // Annotated extraction is attempted once; failure pins keyword mode for the process
    let annotator_path = config
        .enable_annotated_extraction
        .then_some(config.annotator_resource_path.as_path());
    let extraction = SkillExtraction::initialize(lexicon.clone(), annotator_path)?;

    // Load the fit classifier artifact, training and persisting it if needed
    let classifier_path = config.classifier_artifact_path.clone();
    let classifier =
        tokio::task::spawn_blocking(move || FitClassifier::shared(&classifier_path)).await?;
    info!(
        source = ?classifier.source(),
        trained_at = %classifier.trained_at(),
        "Fit classifier ready"
    );

    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("ANTHROPIC_API_KEY not set; advice endpoints will report a service failure");
    }

    let state = AppState {
        config: config.clone(),
        lexicon,
        engine: AnalysisEngine::new(Arc::new(extraction), classifier),
        llm: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
