use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One discrete achievement tier within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringLevel {
    /// 1-based ordinal; not required to be contiguous.
    pub level: u32,
    /// Score ceiling awarded at this level.
    pub score: f64,
    #[serde(default)]
    pub description: String,
}

/// One weighted dimension of a rubric, e.g. "Skills".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Join key against `CategoryEvaluation::category`.
    pub name: String,
    /// Fraction of the overall score, 0.0 to 1.0.
    pub weight: f64,
    #[serde(default)]
    pub scoring_levels: Vec<ScoringLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RubricContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display order. Matching against evaluations is by name, never by index.
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub id: i64,
    pub job_posting: i64,
    #[serde(default)]
    pub content: RubricContent,
    #[serde(default)]
    pub human_approved: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Rubric {
    /// First category whose name matches exactly.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.content.categories.iter().find(|c| c.name == name)
    }
}
