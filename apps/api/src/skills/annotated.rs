//! Annotated Skill Extractor: phrase matching over a token stream.
//!
//! The text is tokenized with Unicode word boundaries, tokens are lowercased
//! and passed through the annotator's inflection map, and lexicon entries
//! (tokenized the same way) are matched as contiguous token sequences.
//! Punctuation survives as tokens, so "machine. learning" is not a phrase.
//! Segments are further split at possessive apostrophes and at inner `.` and
//! `:` ("python's", "skills:python"), except lexicon tokens such as "node.js".
//!
//! The annotator resource is a JSON file loaded once. If it is missing or
//! malformed the extractor is constructed in an unavailable state and every
//! call fails with `ExtractorError::ModelUnavailable`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use unicode_segmentation::UnicodeSegmentation;

use super::lexicon::SkillLexicon;
use super::{ExtractorError, SkillExtractor, SkillSet};

/// On-disk annotator resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorResource {
    pub name: String,
    pub version: String,
    /// Longest input (in characters) the annotator accepts.
    pub max_length: usize,
    /// Multi-segment spellings kept as a single token, e.g. "c++".
    #[serde(default)]
    pub special_cases: Vec<String>,
    /// Token → canonical token, e.g. "apis" → "api".
    #[serde(default)]
    pub lemmas: BTreeMap<String, String>,
}

impl AnnotatorResource {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read annotator resource {}: {e}", path.display()))?;
        let resource: AnnotatorResource = serde_json::from_str(&raw)
            .map_err(|e| format!("malformed annotator resource {}: {e}", path.display()))?;
        resource.validate()?;
        Ok(resource)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("annotator resource has no name".to_string());
        }
        if self.max_length == 0 {
            return Err("annotator max_length must be positive".to_string());
        }
        Ok(())
    }
}

/// Characters that Unicode word segmentation keeps inside a word but that
/// separate skills in resume text ("skills:python", "team.aws").
const INNER_SEPARATORS: [char; 2] = ['.', ':'];

fn is_inner_separator(c: char) -> bool {
    INNER_SEPARATORS.contains(&c)
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Tokenizer plus compiled phrase patterns.
struct Annotator {
    name: String,
    max_length: usize,
    /// Special cases sorted longest first so "c++" wins over "c".
    special_cases: Vec<String>,
    lemmas: HashMap<String, String>,
    /// Lexicon segments that contain a separator and must stay whole, e.g. "node.js".
    whole_tokens: HashSet<String>,
    /// First token → (pattern tokens, canonical entry).
    patterns: HashMap<String, Vec<(Vec<String>, String)>>,
}

impl Annotator {
    fn build(resource: AnnotatorResource, lexicon: &SkillLexicon) -> Self {
        let mut special_cases: Vec<String> = resource
            .special_cases
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        special_cases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        special_cases.dedup();

        let lemmas = resource
            .lemmas
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
            .collect();

        let whole_tokens = lexicon
            .iter()
            .flat_map(|entry| entry.split_word_bounds())
            .filter(|seg| seg.contains(|c: char| is_inner_separator(c) || is_apostrophe(c)))
            .map(str::to_string)
            .collect();

        let mut annotator = Self {
            name: resource.name,
            max_length: resource.max_length,
            special_cases,
            lemmas,
            whole_tokens,
            patterns: HashMap::new(),
        };

        for entry in lexicon.iter() {
            let tokens = annotator.tokenize(entry);
            if let Some(first) = tokens.first().cloned() {
                annotator
                    .patterns
                    .entry(first)
                    .or_default()
                    .push((tokens, entry.to_string()));
            }
        }
        annotator
    }

    /// Lowercased, lemmatized tokens; whitespace is dropped, punctuation kept.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut chunk_start = 0usize;
        let mut skip_until = 0usize;

        // Special cases may start mid-segment ("skills:c++"), so they are
        // found on the raw text before word segmentation runs.
        for (offset, _) in lowered.char_indices() {
            if offset < skip_until {
                continue;
            }
            if let Some(special) = self.special_case_at(&lowered, offset) {
                self.push_segments(&lowered[chunk_start..offset], &mut tokens);
                tokens.push(special.to_string());
                skip_until = offset + special.len();
                chunk_start = skip_until;
            }
        }
        self.push_segments(&lowered[chunk_start..], &mut tokens);
        tokens
    }

    fn push_segments(&self, chunk: &str, tokens: &mut Vec<String>) {
        for segment in chunk.split_word_bounds() {
            if !segment.chars().all(char::is_whitespace) {
                self.split_segment(segment, tokens);
            }
        }
    }

    /// Splits a word segment at possessive apostrophes and inner `.`/`:`
    /// unless the segment is a known whole token.
    fn split_segment(&self, segment: &str, tokens: &mut Vec<String>) {
        if segment.is_empty() {
            return;
        }
        if self.whole_tokens.contains(segment) || self.lemmas.contains_key(segment) {
            tokens.push(self.lemma(segment));
            return;
        }
        if let Some(idx) = segment.find(is_apostrophe) {
            // "python's" → "python", "'s"
            self.split_segment(&segment[..idx], tokens);
            tokens.push(segment[idx..].to_string());
            return;
        }
        if let Some(idx) = segment.find(is_inner_separator) {
            let sep_len = segment[idx..].chars().next().map_or(1, char::len_utf8);
            self.split_segment(&segment[..idx], tokens);
            tokens.push(segment[idx..idx + sep_len].to_string());
            self.split_segment(&segment[idx + sep_len..], tokens);
            return;
        }
        tokens.push(self.lemma(segment));
    }

    fn lemma(&self, token: &str) -> String {
        self.lemmas
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }

    /// A special case starting at `offset` and not embedded in a longer word.
    fn special_case_at<'a>(&'a self, text: &str, offset: usize) -> Option<&'a str> {
        let rest = &text[offset..];
        let preceded_by_word = text[..offset]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        if preceded_by_word {
            return None;
        }
        self.special_cases
            .iter()
            .find(|special| {
                rest.starts_with(special.as_str())
                    && !rest[special.len()..]
                        .chars()
                        .next()
                        .is_some_and(char::is_alphanumeric)
            })
            .map(String::as_str)
    }

    fn annotate(&self, text: &str) -> Result<SkillSet, ExtractorError> {
        let length = text.chars().count();
        if length > self.max_length {
            return Err(ExtractorError::Annotation(format!(
                "text of {length} characters exceeds {} max_length of {}",
                self.name, self.max_length
            )));
        }

        let tokens = self.tokenize(text);
        let mut found = SkillSet::new();
        for start in 0..tokens.len() {
            let Some(candidates) = self.patterns.get(&tokens[start]) else {
                continue;
            };
            for (pattern, entry) in candidates {
                let end = start + pattern.len();
                if end <= tokens.len() && tokens[start..end] == pattern[..] {
                    found.insert(entry.clone());
                }
            }
        }
        Ok(found)
    }
}

enum AnnotatorState {
    Ready(Annotator),
    Unavailable(String),
}

pub struct AnnotatedSkillExtractor {
    state: AnnotatorState,
}

impl AnnotatedSkillExtractor {
    /// Loads the annotator resource at `path`. Never fails: a load failure
    /// leaves the extractor unavailable and is logged once here.
    pub fn load(path: &Path, lexicon: Arc<SkillLexicon>) -> Self {
        match AnnotatorResource::from_file(path) {
            Ok(resource) => {
                info!(
                    annotator = %resource.name,
                    version = %resource.version,
                    "Annotator resource loaded"
                );
                Self::from_resource(resource, lexicon)
            }
            Err(reason) => {
                warn!(%reason, "Annotator resource unavailable");
                Self {
                    state: AnnotatorState::Unavailable(reason),
                }
            }
        }
    }

    pub fn from_resource(resource: AnnotatorResource, lexicon: Arc<SkillLexicon>) -> Self {
        match resource.validate() {
            Ok(()) => Self {
                state: AnnotatorState::Ready(Annotator::build(resource, &lexicon)),
            },
            Err(reason) => Self {
                state: AnnotatorState::Unavailable(reason),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, AnnotatorState::Ready(_))
    }
}

impl SkillExtractor for AnnotatedSkillExtractor {
    fn name(&self) -> &'static str {
        "annotated"
    }

    fn extract(&self, text: &str) -> Result<SkillSet, ExtractorError> {
        match &self.state {
            AnnotatorState::Ready(annotator) => annotator.annotate(text),
            AnnotatorState::Unavailable(reason) => {
                Err(ExtractorError::ModelUnavailable(reason.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn resource() -> AnnotatorResource {
        AnnotatorResource {
            name: "test-annotator".to_string(),
            version: "1.0.0".to_string(),
            max_length: 10_000,
            special_cases: vec!["c++".to_string(), "c#".to_string()],
            lemmas: [("apis", "api"), ("k8s", "kubernetes"), ("postgres", "postgresql")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn extractor() -> AnnotatedSkillExtractor {
        AnnotatedSkillExtractor::from_resource(resource(), SkillLexicon::global())
    }

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_phrase_match_single_and_multi_token() {
        let skills = extractor()
            .extract("Built Machine Learning pipelines in Python with scikit-learn.")
            .unwrap();
        assert_eq!(skills, set(&["machine learning", "python", "scikit-learn"]));
    }

    #[test]
    fn test_lemmas_normalize_inflections() {
        let skills = extractor()
            .extract("Designed public APIs on k8s backed by Postgres")
            .unwrap();
        assert_eq!(skills, set(&["api", "kubernetes", "postgresql"]));
    }

    #[test]
    fn test_special_cases_stay_whole() {
        let skills = extractor().extract("Shipped C++ and C# services").unwrap();
        assert!(skills.contains("c++"));
        assert!(skills.contains("c#"));
    }

    #[test]
    fn test_punctuation_breaks_phrases() {
        let skills = extractor().extract("We value the machine. Learning is fun").unwrap();
        assert!(!skills.contains("machine learning"));
    }

    #[test]
    fn test_java_not_inside_javascript() {
        let skills = extractor().extract("JavaScript only").unwrap();
        assert_eq!(skills, set(&["javascript"]));
    }

    #[test]
    fn test_input_over_max_length_is_annotation_error() {
        let mut small = resource();
        small.max_length = 5;
        let extractor = AnnotatedSkillExtractor::from_resource(small, SkillLexicon::global());
        let err = extractor.extract("python and rust").unwrap_err();
        assert!(matches!(err, ExtractorError::Annotation(_)));
    }

    #[test]
    fn test_missing_resource_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let extractor =
            AnnotatedSkillExtractor::load(&dir.path().join("absent.json"), SkillLexicon::global());
        assert!(!extractor.is_available());
        let err = extractor.extract("python").unwrap_err();
        assert!(matches!(err, ExtractorError::ModelUnavailable(_)));
    }

    #[test]
    fn test_malformed_resource_is_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let extractor = AnnotatedSkillExtractor::load(file.path(), SkillLexicon::global());
        assert!(!extractor.is_available());
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let mut bad = resource();
        bad.max_length = 0;
        let extractor = AnnotatedSkillExtractor::from_resource(bad, SkillLexicon::global());
        assert!(!extractor.is_available());
    }

    #[test]
    fn test_resource_file_round_trip_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&resource()).unwrap()).unwrap();
        let extractor = AnnotatedSkillExtractor::load(file.path(), SkillLexicon::global());
        assert!(extractor.is_available());
        assert_eq!(extractor.extract("Rust").unwrap(), set(&["rust"]));
    }

    fn shipped_extractor() -> AnnotatedSkillExtractor {
        let resource: AnnotatorResource =
            serde_json::from_str(include_str!("../../data/annotator.json")).unwrap();
        AnnotatedSkillExtractor::from_resource(resource, SkillLexicon::global())
    }

    fn capitalized(entry: &str) -> String {
        let mut chars = entry.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    #[test]
    fn test_possessive_and_glued_punctuation_split() {
        let extractor = shipped_extractor();
        assert_eq!(extractor.extract("Python's ecosystem").unwrap(), set(&["python"]));
        assert_eq!(extractor.extract("AWS\u{2019}s console").unwrap(), set(&["aws"]));
        assert_eq!(extractor.extract("Skills:Python").unwrap(), set(&["python"]));
        assert_eq!(
            extractor.extract("Led the team.Kubernetes rollout").unwrap(),
            set(&["kubernetes"])
        );
    }

    #[test]
    fn test_dotted_entries_stay_whole() {
        let extractor = shipped_extractor();
        assert_eq!(extractor.extract("Wrote Node.js services").unwrap(), set(&["node.js"]));
        assert_eq!(
            extractor.extract("Stack:node.js's runtime").unwrap(),
            set(&["node.js"])
        );
    }

    #[test]
    fn test_every_entry_found_next_to_punctuation() {
        let extractor = shipped_extractor();
        for entry in SkillLexicon::global().iter() {
            for text in [
                format!("Experienced with {entry} in production."),
                format!("{entry}'s"),
                format!("Skills:{entry}"),
                format!("done.{}", capitalized(entry)),
            ] {
                assert!(
                    extractor.extract(&text).unwrap().contains(entry),
                    "entry {entry:?} not found in {text:?}"
                );
            }
        }
    }

    #[test]
    fn test_no_lexicon_entries_yields_empty_set() {
        let extractor = shipped_extractor();
        assert!(extractor
            .extract("Enjoys hiking, cooking and long walks.")
            .unwrap()
            .is_empty());
        assert!(extractor.extract("").unwrap().is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = shipped_extractor();
        let text = "Rust, Redis, PostgreSQL's planner and Terraform on AWS; skills:Docker";
        let first = extractor.extract(text).unwrap();
        assert_eq!(first, extractor.extract(text).unwrap());
        assert_eq!(
            first,
            set(&["aws", "docker", "postgresql", "redis", "rust", "terraform"])
        );
    }
}
