//! Skill Lexicon: the static vocabulary every extractor matches against.
//!
//! Entries are stored lowercase; that lowercase form is the canonical spelling
//! reported in every `SkillSet`. Editing the vocabulary is a code change.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// Default vocabulary of recognised technical skills.
const DEFAULT_SKILLS: &[&str] = &[
    "agile",
    "airflow",
    "angular",
    "ansible",
    "api",
    "aws",
    "azure",
    "bash",
    "c#",
    "c++",
    "ci/cd",
    "computer vision",
    "css",
    "data analysis",
    "data science",
    "data visualization",
    "deep learning",
    "django",
    "docker",
    "elasticsearch",
    "excel",
    "fastapi",
    "flask",
    "gcp",
    "git",
    "golang",
    "graphql",
    "hadoop",
    "html",
    "java",
    "javascript",
    "jenkins",
    "jira",
    "keras",
    "kotlin",
    "kubernetes",
    "linux",
    "machine learning",
    "matlab",
    "mongodb",
    "mysql",
    "natural language processing",
    "nlp",
    "node.js",
    "numpy",
    "opencv",
    "pandas",
    "postgresql",
    "power bi",
    "pytorch",
    "python",
    "react",
    "redis",
    "rest api",
    "ruby",
    "rust",
    "scala",
    "scikit-learn",
    "spark",
    "spring boot",
    "sql",
    "swift",
    "tableau",
    "tensorflow",
    "terraform",
    "typescript",
];

static GLOBAL_LEXICON: OnceLock<Arc<SkillLexicon>> = OnceLock::new();

/// Immutable, case-insensitive set of canonical skill strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLexicon {
    entries: BTreeSet<String>,
}

impl SkillLexicon {
    /// Process-wide lexicon built from the default vocabulary on first use.
    pub fn global() -> Arc<SkillLexicon> {
        GLOBAL_LEXICON
            .get_or_init(|| Arc::new(SkillLexicon::from_entries(DEFAULT_SKILLS.iter().copied())))
            .clone()
    }

    /// Builds a lexicon from arbitrary entries. Entries are trimmed and lowercased;
    /// blanks are dropped and duplicates collapse.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { entries }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, skill: &str) -> bool {
        self.entries.contains(&skill.trim().to_lowercase())
    }

    /// Entries in canonical (lowercase, sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_case_insensitive() {
        let lexicon = SkillLexicon::global();
        assert!(lexicon.contains("Python"));
        assert!(lexicon.contains("  KUBERNETES "));
        assert!(lexicon.contains("c++"));
        assert!(!lexicon.contains("basket weaving"));
    }

    #[test]
    fn test_entries_are_lowercase_and_sorted() {
        let lexicon = SkillLexicon::global();
        let entries: Vec<&str> = lexicon.iter().collect();
        let mut sorted = entries.clone();
        sorted.sort_unstable();
        assert_eq!(entries, sorted);
        assert!(entries.iter().all(|e| *e == e.to_lowercase()));
    }

    #[test]
    fn test_from_entries_normalizes_and_dedups() {
        let lexicon = SkillLexicon::from_entries(["Rust", "rust ", "", "  ", "Go Lang"]);
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("go lang"));
    }

    #[test]
    fn test_global_is_shared() {
        let a = SkillLexicon::global();
        let b = SkillLexicon::global();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), DEFAULT_SKILLS.len());
    }
}
