//! Axum route handlers for learning resources and LLM-backed advice.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::advice::generator::{enhance_resume_section, generate_project_ideas};
use crate::advice::resources::{get_learning_resources, skills_without_resources};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResourcesRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub resources: BTreeMap<String, String>,
    pub skills_without_resources: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceResumeRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResumeResponse {
    pub suggestions: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectIdeasRequest {
    pub resume_text: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectIdeasResponse {
    pub ideas: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resources
///
/// Looks up a course link for each skill. Skills without one are listed
/// separately so the caller can show them as plain text.
pub async fn handle_resources(
    Json(request): Json<ResourcesRequest>,
) -> Json<ResourcesResponse> {
    let resources = get_learning_resources(&request.skills);
    let skills_without_resources = skills_without_resources(&request.skills, &resources);

    Json(ResourcesResponse {
        resources,
        skills_without_resources,
    })
}

/// POST /api/v1/advice/resume
pub async fn handle_enhance_resume(
    State(state): State<AppState>,
    Json(request): Json<EnhanceResumeRequest>,
) -> Result<Json<EnhanceResumeResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("jd_text", &request.jd_text)?;

    let suggestions = enhance_resume_section(
        state.llm.as_ref(),
        &request.resume_text,
        &request.jd_text,
        &request.missing_skills,
    )
    .await?;

    Ok(Json(EnhanceResumeResponse { suggestions }))
}

/// POST /api/v1/advice/projects
pub async fn handle_project_ideas(
    State(state): State<AppState>,
    Json(request): Json<ProjectIdeasRequest>,
) -> Result<Json<ProjectIdeasResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;

    let ideas =
        generate_project_ideas(state.llm.as_ref(), &request.resume_text, &request.skills).await?;

    Ok(Json(ProjectIdeasResponse { ideas }))
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
