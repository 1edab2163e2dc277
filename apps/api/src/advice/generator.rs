//! Advice generators: resume rewording and project ideas via the LLM.
//!
//! Both are single prompt-template calls. Any LLM failure is surfaced as
//! `AppError::ExternalService`; there is no local fallback for generated text.

use tracing::info;

use crate::advice::prompts::{
    ENHANCE_PROMPT_TEMPLATE, ENHANCE_TEMPERATURE, PROJECT_IDEAS_PROMPT_TEMPLATE,
    PROJECT_IDEAS_TEMPERATURE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::{CompletionRequest, TextGenerator};

/// Suggests improved wording for `resume_text` that targets `jd_text` and
/// addresses `missing_skills`.
pub async fn enhance_resume_section(
    llm: &dyn TextGenerator,
    resume_text: &str,
    jd_text: &str,
    missing_skills: &[String],
) -> Result<String, AppError> {
    let missing = missing_skills.join(", ");
    let prompt = render(
        ENHANCE_PROMPT_TEMPLATE,
        &[
            ("resume", resume_text),
            ("jd", jd_text),
            ("missing_skills", &missing),
        ],
    );

    let suggestions = llm
        .complete(CompletionRequest {
            system: PLAIN_TEXT_SYSTEM,
            prompt: &prompt,
            temperature: ENHANCE_TEMPERATURE,
        })
        .await
        .map_err(|e| AppError::ExternalService(format!("Resume enhancement failed: {e}")))?;

    info!(missing_skills = missing_skills.len(), "Resume enhancement generated");
    Ok(suggestions)
}

/// Suggests three portfolio projects aligned with the resume and `skills`.
pub async fn generate_project_ideas(
    llm: &dyn TextGenerator,
    resume_text: &str,
    skills: &[String],
) -> Result<String, AppError> {
    let skills = skills.join(", ");
    let prompt = render(
        PROJECT_IDEAS_PROMPT_TEMPLATE,
        &[("resume", resume_text), ("skills", &skills)],
    );

    let ideas = llm
        .complete(CompletionRequest {
            system: PLAIN_TEXT_SYSTEM,
            prompt: &prompt,
            temperature: PROJECT_IDEAS_TEMPERATURE,
        })
        .await
        .map_err(|e| AppError::ExternalService(format!("Project idea generation failed: {e}")))?;

    info!("Project ideas generated");
    Ok(ideas)
}

/// Fills `{name}` placeholders in one pass over the template, so braces inside
/// substituted values are never re-expanded.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let placeholder = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match placeholder {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the last request and answers with a canned reply.
    struct RecordingGenerator {
        reply: Result<String, u16>,
        seen: Mutex<Option<(String, f32)>>,
    }

    impl RecordingGenerator {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(None),
            }
        }

        fn seen(&self) -> (String, f32) {
            self.seen.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = Some((request.prompt.to_string(), request.temperature));
            self.reply.clone().map_err(|status| LlmError::Api {
                status,
                message: "overloaded".to_string(),
            })
        }
    }

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_enhance_fills_template() {
        let llm = RecordingGenerator::ok("Reworded section");
        let out = enhance_resume_section(
            &llm,
            "Built ETL jobs in Python",
            "Needs Kubernetes and AWS",
            &skills(&["aws", "kubernetes"]),
        )
        .await
        .unwrap();

        assert_eq!(out, "Reworded section");
        let (prompt, temperature) = llm.seen();
        assert!(prompt.contains("Resume Section:\nBuilt ETL jobs in Python\n"));
        assert!(prompt.contains("Job Description:\nNeeds Kubernetes and AWS\n"));
        assert!(prompt.contains("Missing Skills:\naws, kubernetes\n"));
        assert!(prompt.ends_with("Improved Resume Section:"));
        assert!((temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_project_ideas_fills_template() {
        let llm = RecordingGenerator::ok("1. Build a thing");
        generate_project_ideas(&llm, "Data engineer", &skills(&["python", "sql"]))
            .await
            .unwrap();

        let (prompt, temperature) = llm.seen();
        assert!(prompt.contains("suggest 3"));
        assert!(prompt.contains("Skills:\npython, sql\n"));
        assert!((temperature - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_llm_failure_surfaces_as_external_service_error() {
        let llm = RecordingGenerator::failing(529);
        let err = enhance_resume_section(&llm, "r", "j", &[]).await.unwrap_err();
        match err {
            AppError::ExternalService(msg) => {
                assert!(msg.contains("Resume enhancement failed"));
                assert!(msg.contains("529"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = generate_project_ideas(&llm, "r", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(_)));
    }

    #[test]
    fn test_render_does_not_reexpand_values() {
        let out = render("A={a} B={b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(out, "A={b} B=x");
    }

    #[test]
    fn test_render_keeps_unknown_braces() {
        let out = render("{unknown} {a}", &[("a", "1")]);
        assert_eq!(out, "{unknown} 1");
    }
}
