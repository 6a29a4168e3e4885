use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::evaluation::Evaluation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    Applied,
    Evaluated,
    Review,
    Interview,
    Offer,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantStatus::Applied => "applied",
            ApplicantStatus::Evaluated => "evaluated",
            ApplicantStatus::Review => "review",
            ApplicantStatus::Interview => "interview",
            ApplicantStatus::Offer => "offer",
            ApplicantStatus::Hired => "hired",
            ApplicantStatus::Rejected => "rejected",
            ApplicantStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: i64,
    pub job_posting: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicantStatus,
    /// Present once the backend has finished processing the resume.
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    pub current_position: Option<String>,
}

impl Applicant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Raw score for `category`, or 0 when unevaluated or not covered.
    pub fn category_score_or_zero(&self, category: &str) -> f64 {
        self.evaluation
            .as_ref()
            .and_then(|e| e.category_score(category))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unevaluated_applicant_deserializes() {
        let applicant: Applicant = serde_json::from_value(json!({
            "id": 11,
            "job_posting": 3,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "applied_at": "2024-05-01T12:00:00Z",
            "status": "applied",
            "evaluation": null,
            "current_position": null
        }))
        .unwrap();

        assert_eq!(applicant.status, ApplicantStatus::Applied);
        assert!(applicant.evaluation.is_none());
        assert_eq!(applicant.full_name(), "Ada Lovelace");
        assert_eq!(applicant.category_score_or_zero("Skills"), 0.0);
    }

    #[test]
    fn test_status_labels_match_wire_format() {
        let status: ApplicantStatus = serde_json::from_value(json!("withdrawn")).unwrap();
        assert_eq!(status.as_str(), "withdrawn");
        assert_eq!(
            serde_json::to_value(ApplicantStatus::Interview).unwrap(),
            json!("interview")
        );
    }
}
