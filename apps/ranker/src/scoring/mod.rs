//! Rubric-weighted applicant scoring.
//!
//! Every view that needs an applicant's score (roster, statistics, report)
//! goes through `ScoreAggregator`; nothing else normalizes or weights raw
//! category scores.

pub mod aggregator;
pub mod stats;

use thiserror::Error;

pub use aggregator::{
    category_max_score, score_color, weighted_score, CategoryContribution, ScoreAggregator,
    ScoreColor,
};
pub use stats::{
    bucket_scores, category_averages, category_percentile, percentile, score_distribution,
    CategoryAverage, ScoreSummary, DEFAULT_BUCKET_COUNT,
};

/// Why a rubric category cannot be scored against.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RubricDefect {
    #[error("category has no scoring levels")]
    NoScoringLevels,

    #[error("weight {0} is outside 0.0 to 1.0")]
    WeightOutOfRange(f64),

    #[error("scoring level {level} has a non-finite score")]
    NonFiniteScore { level: u32 },

    #[error("maximum score {0} is not positive")]
    NonPositiveMaxScore(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The rubric is unusable as a whole; callers should not attempt partial scoring.
    #[error("Invalid rubric category '{category}': {defect}")]
    InvalidRubric {
        category: String,
        defect: RubricDefect,
    },
}
