//! Keyword Skill Extractor: whole-phrase regex scan of raw text.
//!
//! Each lexicon entry becomes one pattern delimited by non-word characters (or
//! the ends of the text), so "java" never fires inside "javascript" while
//! symbol-terminated entries like "c++" still match before punctuation.
//! Multi-word entries tolerate any run of whitespace between words, which
//! covers line breaks introduced by PDF extraction.

use std::sync::Arc;

use regex::RegexSet;
use tracing::warn;

use super::lexicon::SkillLexicon;
use super::{ExtractorError, SkillExtractor, SkillSet};

pub struct KeywordSkillExtractor {
    patterns: RegexSet,
    /// Canonical entry for each pattern index in `patterns`.
    entries: Vec<String>,
}

impl KeywordSkillExtractor {
    pub fn new(lexicon: Arc<SkillLexicon>) -> Result<Self, ExtractorError> {
        if lexicon.is_empty() {
            warn!("Skill lexicon is empty; no skills will be detected");
        }
        let entries: Vec<String> = lexicon.iter().map(str::to_string).collect();
        let patterns = RegexSet::new(entries.iter().map(|entry| phrase_pattern(entry)))?;
        Ok(Self { patterns, entries })
    }

    pub fn pattern_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns every lexicon entry present in `text` as a whole phrase.
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        let lowered = text.to_lowercase();
        self.patterns
            .matches(&lowered)
            .into_iter()
            .map(|idx| self.entries[idx].clone())
            .collect()
    }
}

impl SkillExtractor for KeywordSkillExtractor {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn extract(&self, text: &str) -> Result<SkillSet, ExtractorError> {
        Ok(self.extract_skills(text))
    }
}

/// `(?:^|\W)` + escaped words joined by `\s+` + `(?:\W|$)`.
fn phrase_pattern(entry: &str) -> String {
    let body = entry
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!(r"(?:^|[^\w]){body}(?:[^\w]|$)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> KeywordSkillExtractor {
        KeywordSkillExtractor::new(SkillLexicon::global()).unwrap()
    }

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extracts_comma_separated_skills() {
        let skills = extractor().extract_skills("Python, SQL, Docker");
        assert_eq!(skills, set(&["docker", "python", "sql"]));
    }

    #[test]
    fn test_java_does_not_match_inside_javascript() {
        let skills = extractor().extract_skills("Frontend work in JavaScript and TypeScript.");
        assert!(skills.contains("javascript"));
        assert!(skills.contains("typescript"));
        assert!(!skills.contains("java"));
    }

    #[test]
    fn test_java_and_javascript_both_present() {
        let skills = extractor().extract_skills("Java backend, JavaScript frontend");
        assert!(skills.contains("java"));
        assert!(skills.contains("javascript"));
    }

    #[test]
    fn test_symbol_terminated_entries_match() {
        let skills = extractor().extract_skills("Languages: C++, C#; runtime: Node.js.");
        assert!(skills.contains("c++"));
        assert!(skills.contains("c#"));
        assert!(skills.contains("node.js"));
    }

    #[test]
    fn test_multi_word_entry_spans_line_break() {
        let skills = extractor().extract_skills("Applied Machine\nLearning to fraud detection");
        assert!(skills.contains("machine learning"));
    }

    #[test]
    fn test_case_insensitive_match_uses_canonical_casing() {
        let skills = extractor().extract_skills("KUBERNETES and Aws");
        assert_eq!(skills, set(&["aws", "kubernetes"]));
    }

    #[test]
    fn test_no_lexicon_entries_yields_empty_set() {
        let skills = extractor().extract_skills("Enjoys hiking, cooking and long walks.");
        assert!(skills.is_empty());
        assert!(extractor().extract_skills("").is_empty());
    }

    #[test]
    fn test_every_entry_found_as_whole_word() {
        let extractor = extractor();
        for entry in SkillLexicon::global().iter() {
            let text = format!("Experienced with {entry} in production.");
            assert!(
                extractor.extract_skills(&text).contains(entry),
                "entry {entry:?} not found"
            );
        }
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = extractor();
        let text = "Rust, Redis, PostgreSQL and Terraform on AWS";
        assert_eq!(extractor.extract_skills(text), extractor.extract_skills(text));
    }

    #[test]
    fn test_trait_extract_never_fails() {
        let result = SkillExtractor::extract(&extractor(), "git");
        assert_eq!(result.unwrap(), set(&["git"]));
    }
}
