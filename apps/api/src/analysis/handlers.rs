//! Axum route handlers for skill extraction, matching and document analysis.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advice::handlers::require_text;
use crate::analysis::report::{AnalysisReport, MatchAnalysis};
use crate::documents::{extract_document, Document, DocumentKind};
use crate::errors::AppError;
use crate::matching::classifier::FitPrediction;
use crate::skills::extraction::ExtractionMode;
use crate::skills::SkillSet;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
    pub count: usize,
    pub extraction_mode: ExtractionMode,
    pub extraction_method: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SkillLookupResponse {
    pub skill: String,
    pub known: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub skills: SkillSet,
    pub extraction_mode: ExtractionMode,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub resume_skills: SkillSet,
    pub jd_skills: SkillSet,
    pub analysis: MatchAnalysis,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub match_score: f64,
    pub matched_count: usize,
    pub missing_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills
pub async fn handle_list_skills(State(state): State<AppState>) -> Json<SkillsResponse> {
    let mode = state.engine.extraction_mode();
    let skills: Vec<String> = state.lexicon.iter().map(str::to_string).collect();

    Json(SkillsResponse {
        count: skills.len(),
        skills,
        extraction_mode: mode,
        extraction_method: mode.label(),
    })
}

/// GET /api/v1/skills/:skill
///
/// Case-insensitive lexicon membership check.
pub async fn handle_lookup_skill(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Json<SkillLookupResponse> {
    let known = state.lexicon.contains(&skill);
    Json(SkillLookupResponse { skill, known })
}

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    require_text("text", &request.text)?;

    let outcome = state.engine.extract_skills(&request.text);

    Ok(Json(ExtractResponse {
        skills: outcome.skills,
        extraction_mode: outcome.mode,
        warnings: outcome.warning.into_iter().collect(),
    }))
}

/// POST /api/v1/match
///
/// Text-only variant of the analysis: extracts both skill sets, scores the
/// overlap and predicts fit.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("jd_text", &request.jd_text)?;

    let resume = state.engine.extract_skills(&request.resume_text);
    let jd = state.engine.extract_skills(&request.jd_text);
    let analysis = state.engine.assess_match(&resume.skills, &jd.skills);
    let warnings = resume.warning.into_iter().chain(jd.warning).collect();

    Ok(Json(MatchResponse {
        resume_skills: resume.skills,
        jd_skills: jd.skills,
        analysis,
        warnings,
    }))
}

/// POST /api/v1/fit/predict
pub async fn handle_predict_fit(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<FitPrediction>, AppError> {
    if !request.match_score.is_finite() || !(0.0..=100.0).contains(&request.match_score) {
        return Err(AppError::Validation(
            "match_score must be between 0 and 100".to_string(),
        ));
    }

    let prediction = state.engine.classifier().predict(
        request.match_score,
        request.matched_count,
        request.missing_count,
    );
    Ok(Json(prediction))
}

/// POST /api/v1/analysis
///
/// Multipart upload with optional `resume` and `job_description` file parts.
/// Unreadable or unsupported files become warnings; the other document is
/// still analyzed.
pub async fn handle_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut resume = None;
    let mut job_description = None;
    let mut received = 0usize;
    let mut warnings = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let kind = match field.name() {
            Some("resume") => DocumentKind::Resume,
            Some("job_description") => DocumentKind::JobDescription,
            other => {
                debug!(field = ?other, "Ignoring unknown multipart field");
                continue;
            }
        };

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read {} upload: {e}", kind.label())))?;
        received += 1;

        let max_bytes = state.config.max_upload_bytes;
        match read_upload(kind, file_name, content_type, data, max_bytes).await {
            Ok(doc) => match kind {
                DocumentKind::Resume => resume = Some(doc),
                DocumentKind::JobDescription => job_description = Some(doc),
            },
            Err(warning) => warnings.push(warning),
        }
    }

    if received == 0 {
        return Err(AppError::Validation(
            "Upload a resume and/or a job description".to_string(),
        ));
    }

    let report = state
        .engine
        .analyze(resume.as_ref(), job_description.as_ref(), warnings);
    Ok(Json(report))
}

/// Parses one upload on the blocking pool. A parser error or a panicking
/// parser comes back as the warning for that document.
async fn read_upload(
    kind: DocumentKind,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
    max_bytes: usize,
) -> Result<Document, String> {
    let parsed = tokio::task::spawn_blocking(move || {
        extract_document(
            kind,
            file_name.as_deref(),
            content_type.as_deref(),
            &data,
            max_bytes,
        )
    })
    .await;

    match parsed {
        Ok(Ok(doc)) => Ok(doc),
        Ok(Err(e)) => {
            warn!(kind = kind.label(), error = %e, "Document could not be read");
            Err(format!("{} skipped: {e}", capitalize(kind.label())))
        }
        Err(e) => {
            warn!(
                kind = kind.label(),
                error = %e,
                "spawn_blocking failed in document parsing"
            );
            Err(format!(
                "{} skipped: document parser failed: {e}",
                capitalize(kind.label())
            ))
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
