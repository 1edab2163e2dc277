pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advice::handlers as advice;
use crate::analysis::handlers as analysis;
use crate::state::AppState;

/// Room for multipart framing on top of the two documents.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Skills and matching
        .route("/api/v1/skills", get(analysis::handle_list_skills))
        .route("/api/v1/skills/:skill", get(analysis::handle_lookup_skill))
        .route("/api/v1/skills/extract", post(analysis::handle_extract_skills))
        .route("/api/v1/match", post(analysis::handle_match))
        .route("/api/v1/fit/predict", post(analysis::handle_predict_fit))
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        // Resources and LLM advice
        .route("/api/v1/resources", post(advice::handle_resources))
        .route("/api/v1/advice/resume", post(advice::handle_enhance_resume))
        .route("/api/v1/advice/projects", post(advice::handle_project_ideas))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
