use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::models::{Applicant, Rubric};
use crate::scoring::aggregator::ScoreAggregator;
use crate::scoring::ScoringError;

pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Ceiling of a weighted score: 100% of the achievable total.
pub const FULL_SCORE: f64 = 100.0;

/// Histogram of weighted scores over `[0, overall_max_score]` in
/// `bucket_count` equal-width buckets, lowest range first.
///
/// Unevaluated applicants are left out entirely. A score at or above the
/// ceiling lands in the last bucket; a negative score lands in the first.
pub fn score_distribution(
    applicants: &[Applicant],
    rubric: &Rubric,
    overall_max_score: f64,
    bucket_count: usize,
) -> Result<Vec<usize>, ScoringError> {
    if bucket_count == 0 {
        return Ok(Vec::new());
    }

    let aggregator = ScoreAggregator::new(rubric)?;
    let scores = applicants
        .iter()
        .filter_map(|a| a.evaluation.as_ref())
        .map(|e| aggregator.weighted_score(Some(e)));
    Ok(bucket_scores(scores, overall_max_score, bucket_count))
}

/// Buckets already-computed weighted scores the same way `score_distribution` does.
pub fn bucket_scores(
    scores: impl IntoIterator<Item = f64>,
    overall_max_score: f64,
    bucket_count: usize,
) -> Vec<usize> {
    let mut distribution = vec![0; bucket_count];
    if bucket_count == 0 {
        return distribution;
    }
    for score in scores {
        // Float-to-int casts saturate: negatives and NaN become 0.
        let bucket = (score / overall_max_score * bucket_count as f64).floor() as usize;
        distribution[bucket.min(bucket_count - 1)] += 1;
    }
    distribution
}

/// Rank-position percentile for row `rank_index` of a list sorted by score,
/// highest first. Tied scores get different values depending on sort order.
pub fn percentile(rank_index: usize, total_count: usize) -> u32 {
    if total_count == 0 {
        return 0;
    }
    let above = total_count.saturating_sub(rank_index) as f64;
    (above / total_count as f64 * 100.0).round() as u32
}

/// Share of `peers` scoring strictly below `applicant` in `category`, as a
/// rounded percentage. Missing scores count as 0. If `peers` contains the
/// applicant it counts toward the denominator only.
pub fn category_percentile<A: Borrow<Applicant>>(
    applicant: &Applicant,
    category: &str,
    peers: &[A],
) -> u32 {
    if peers.is_empty() {
        return 0;
    }
    let subject = applicant.category_score_or_zero(category);
    let lower = peers
        .iter()
        .map(Borrow::<Applicant>::borrow)
        .filter(|p| p.category_score_or_zero(category) < subject)
        .count();
    (lower as f64 / peers.len() as f64 * 100.0).round() as u32
}

/// Aggregate weighted scores over the evaluated applicants of a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_applicants: usize,
    pub evaluated: usize,
    pub average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
}

impl ScoreSummary {
    pub fn compute<A: Borrow<Applicant>>(
        applicants: &[A],
        rubric: &Rubric,
    ) -> Result<Self, ScoringError> {
        let aggregator = ScoreAggregator::new(rubric)?;
        let scores: Vec<f64> = applicants
            .iter()
            .filter_map(|a| Borrow::<Applicant>::borrow(a).evaluation.as_ref())
            .map(|e| aggregator.weighted_score(Some(e)))
            .collect();

        let evaluated = scores.len();
        let average = (evaluated > 0).then(|| scores.iter().sum::<f64>() / evaluated as f64);

        Ok(Self {
            total_applicants: applicants.len(),
            evaluated,
            average,
            highest: scores.iter().copied().reduce(f64::max),
            lowest: scores.iter().copied().reduce(f64::min),
        })
    }
}

/// Mean raw score of one category as a percentage of its maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category: String,
    pub weight: f64,
    pub max_score: f64,
    /// `None` when no applicant has been evaluated yet.
    pub average_percent: Option<f64>,
}

/// Per-category averages in rubric display order. Evaluated applicants that
/// lack an entry for a category count as 0 for it.
pub fn category_averages<A: Borrow<Applicant>>(
    applicants: &[A],
    rubric: &Rubric,
) -> Result<Vec<CategoryAverage>, ScoringError> {
    let aggregator = ScoreAggregator::new(rubric)?;
    let evaluated: Vec<_> = applicants
        .iter()
        .filter_map(|a| Borrow::<Applicant>::borrow(a).evaluation.as_ref())
        .collect();

    Ok(rubric
        .content
        .categories
        .iter()
        .map(|category| {
            // Validated above; duplicate names share the first category's maximum.
            let max_score = aggregator.max_score(&category.name).unwrap_or(0.0);
            let average_percent = (!evaluated.is_empty()).then(|| {
                let sum: f64 = evaluated
                    .iter()
                    .map(|e| e.category_score(&category.name).unwrap_or(0.0))
                    .sum();
                sum / (evaluated.len() as f64 * max_score) * 100.0
            });
            CategoryAverage {
                category: category.name.clone(),
                weight: category.weight,
                max_score,
                average_percent,
            }
        })
        .collect())
}
