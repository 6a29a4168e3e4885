use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-produced raw score for one rubric category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEvaluation {
    pub category: String,
    pub score: f64,
    #[serde(default)]
    pub justification: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContent {
    #[serde(default)]
    pub evaluations: Vec<CategoryEvaluation>,
    #[serde(default)]
    pub overall_assessment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: i64,
    /// Absent while the backend is still processing the resume.
    #[serde(default)]
    pub content: Option<EvaluationContent>,
    /// Score as stored by the backend. Not used for ranking.
    #[serde(default)]
    pub overall_score: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub human_approved: bool,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Evaluation {
    /// Per-category entries, empty when content is missing.
    pub fn entries(&self) -> &[CategoryEvaluation] {
        self.content
            .as_ref()
            .map(|c| c.evaluations.as_slice())
            .unwrap_or(&[])
    }

    /// Raw score recorded for `category`, if the evaluation covers it.
    pub fn category_score(&self, category: &str) -> Option<f64> {
        self.entries()
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.score)
    }
}
