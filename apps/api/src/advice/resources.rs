//! Learning resources: static skill → course URL table.
//!
//! The table is kept as an ordered list of pairs and folded into a map once.
//! A skill listed more than once resolves to its LAST entry ("excel" is listed
//! twice; the second URL is the one served).

use std::collections::BTreeMap;
use std::sync::OnceLock;

const SKILL_RESOURCES: &[(&str, &str)] = &[
    ("python", "https://www.coursera.org/specializations/python"),
    (
        "excel",
        "https://www.coursera.org/professional-certificates/microsoft-excel-skills",
    ),
    ("machine learning", "https://www.coursera.org/learn/machine-learning"),
    (
        "deep learning",
        "https://www.deeplearning.ai/deep-learning-specialization/",
    ),
    ("data science", "https://www.coursera.org/specializations/jhu-data-science"),
    ("rest api", "https://www.udemy.com/course/rest-api/"),
    (
        "api",
        "https://www.codecademy.com/learn/paths/designing-apis-with-swagger-and-openapi",
    ),
    (
        "c++",
        "https://www.coursera.org/specializations/c-plus-plus-modern-development",
    ),
    ("java", "https://www.coursera.org/specializations/java-programming"),
    ("excel", "https://www.coursera.org/learn/excel"),
    ("react", "https://www.codecademy.com/learn/react-101"),
    ("aws", "https://www.coursera.org/specializations/aws-fundamentals"),
    ("sql", "https://www.coursera.org/learn/sql-for-data-science"),
    (
        "scikit-learn",
        "https://scikit-learn.org/stable/tutorial/index.html",
    ),
    (
        "tensorflow",
        "https://www.coursera.org/professional-certificates/tensorflow-in-practice",
    ),
    ("pandas", "https://www.coursera.org/learn/data-analysis-with-python"),
    (
        "numpy",
        "https://www.datacamp.com/courses/intro-to-python-for-data-science",
    ),
    (
        "jira",
        "https://www.udemy.com/course/jira-tutorial-a-comprehensive-guide-for-jira/",
    ),
    ("git", "https://www.codecademy.com/learn/learn-git"),
    ("docker", "https://www.coursera.org/learn/docker"),
    (
        "kubernetes",
        "https://www.coursera.org/learn/google-kubernetes-engine",
    ),
];

static RESOURCE_TABLE: OnceLock<BTreeMap<&'static str, &'static str>> = OnceLock::new();

fn resource_table() -> &'static BTreeMap<&'static str, &'static str> {
    RESOURCE_TABLE.get_or_init(|| {
        let mut table = BTreeMap::new();
        for (skill, url) in SKILL_RESOURCES {
            table.insert(*skill, *url);
        }
        table
    })
}

/// Course URL for each skill that has one. Unknown skills are omitted.
pub fn get_learning_resources<I, S>(skills: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let table = resource_table();
    skills
        .into_iter()
        .filter_map(|skill| {
            let key = skill.as_ref().trim().to_lowercase();
            table.get(key.as_str()).map(|url| (key, url.to_string()))
        })
        .collect()
}

/// Skills from `skills` that `resources` has no entry for, sorted.
pub fn skills_without_resources<I, S>(skills: I, resources: &BTreeMap<String, String>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut missing: Vec<String> = skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !resources.contains_key(s))
        .collect();
    missing.sort();
    missing.dedup();
    missing
}
