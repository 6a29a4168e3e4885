//! Roster - the filtered, sorted and ranked applicant list of one posting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Applicant, Rubric};
use crate::scoring::stats::FULL_SCORE;
use crate::scoring::{percentile, score_color, ScoreAggregator, ScoreColor, ScoringError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    AppliedAt,
    Status,
    #[default]
    Score,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterQuery {
    /// Case-insensitive substring of full name or email. Empty keeps everyone.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl RosterQuery {
    pub fn matches(&self, applicant: &Applicant) -> bool {
        let needle = self.search.to_lowercase();
        needle.is_empty()
            || applicant.full_name().to_lowercase().contains(&needle)
            || applicant.email.to_lowercase().contains(&needle)
    }
}

/// One row of the ranked roster.
#[derive(Debug, Clone, Serialize)]
pub struct RankedApplicant<'a> {
    pub applicant: &'a Applicant,
    /// `None` until the applicant has an evaluation.
    pub score: Option<f64>,
    pub color: ScoreColor,
    /// Rank percentile of this row's position in the sorted list.
    pub percentile: u32,
}

impl RankedApplicant<'_> {
    /// Score rendered the way the list shows it; unevaluated reads as 0.
    pub fn display_percent(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Filters and sorts `applicants` per `query`, scoring each against `rubric`.
///
/// Sorting is stable. Unevaluated applicants order as if they scored 0.
pub fn rank<'a>(
    applicants: &'a [Applicant],
    rubric: &Rubric,
    query: &RosterQuery,
) -> Result<Vec<RankedApplicant<'a>>, ScoringError> {
    let aggregator = ScoreAggregator::new(rubric)?;

    let mut rows: Vec<(&Applicant, Option<f64>)> = applicants
        .iter()
        .filter(|a| query.matches(a))
        .map(|a| {
            let score = a
                .evaluation
                .as_ref()
                .map(|e| aggregator.weighted_score(Some(e)));
            (a, score)
        })
        .collect();

    rows.sort_by(|(a, a_score), (b, b_score)| {
        let ordering = match query.sort_by {
            SortKey::Name => a.full_name().to_lowercase().cmp(&b.full_name().to_lowercase()),
            SortKey::AppliedAt => a.applied_at.cmp(&b.applied_at),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::Score => a_score
                .unwrap_or(0.0)
                .partial_cmp(&b_score.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal),
        };
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = rows.len();
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, (applicant, score))| RankedApplicant {
            applicant,
            score,
            color: score_color(score.unwrap_or(0.0), FULL_SCORE),
            percentile: percentile(index, total),
        })
        .collect())
}
