use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent means the resume/project generators report a service failure.
    pub anthropic_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    pub classifier_artifact_path: PathBuf,
    pub annotator_resource_path: PathBuf,
    pub enable_annotated_extraction: bool,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            llm_timeout_secs: 60,
            classifier_artifact_path: PathBuf::from("data/fit_classifier.json"),
            annotator_resource_path: PathBuf::from("data/annotator.json"),
            enable_annotated_extraction: true,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            classifier_artifact_path: std::env::var("CLASSIFIER_ARTIFACT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.classifier_artifact_path),
            annotator_resource_path: std::env::var("ANNOTATOR_RESOURCE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.annotator_resource_path),
            enable_annotated_extraction: parse_bool_env(
                "ENABLE_ANNOTATED_EXTRACTION",
                defaults.enable_annotated_extraction,
            )?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(&raw)
            .with_context(|| format!("Environment variable '{key}' must be true/false, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
