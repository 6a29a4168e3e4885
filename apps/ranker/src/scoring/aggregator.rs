use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Category, Evaluation, Rubric};
use crate::scoring::{RubricDefect, ScoringError};

/// Display tier for a score, relative to its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColor {
    High,
    MediumHigh,
    MediumLow,
    Low,
}

impl ScoreColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreColor::High => "high",
            ScoreColor::MediumHigh => "medium_high",
            ScoreColor::MediumLow => "medium_low",
            ScoreColor::Low => "low",
        }
    }
}

/// Classifies `score` out of `max_score`: ≥80% high, ≥60% medium-high,
/// ≥40% medium-low, otherwise low. Boundaries belong to the higher tier.
pub fn score_color(score: f64, max_score: f64) -> ScoreColor {
    let percentage = score / max_score * 100.0;
    if percentage >= 80.0 {
        ScoreColor::High
    } else if percentage >= 60.0 {
        ScoreColor::MediumHigh
    } else if percentage >= 40.0 {
        ScoreColor::MediumLow
    } else {
        ScoreColor::Low
    }
}

/// Largest `score` among the category's levels. Levels need not be sorted.
pub fn category_max_score(category: &Category) -> Result<f64, ScoringError> {
    category
        .scoring_levels
        .iter()
        .map(|l| l.score)
        .reduce(f64::max)
        .ok_or_else(|| ScoringError::InvalidRubric {
            category: category.name.clone(),
            defect: RubricDefect::NoScoringLevels,
        })
}

/// Weighted percentage score (0 to 100 when weights sum to 1) for one evaluation.
///
/// Degenerate input yields `Ok(0.0)`: no evaluation, an evaluation without
/// entries, no rubric, or a rubric without categories. Callers that must tell
/// "not yet evaluated" apart from "scored zero" check the evaluation first.
pub fn weighted_score(
    rubric: Option<&Rubric>,
    evaluation: Option<&Evaluation>,
) -> Result<f64, ScoringError> {
    let Some(evaluation) = evaluation.filter(|e| !e.entries().is_empty()) else {
        return Ok(0.0);
    };
    let Some(rubric) = rubric.filter(|r| !r.content.categories.is_empty()) else {
        return Ok(0.0);
    };
    Ok(ScoreAggregator::new(rubric)?.weighted_score(Some(evaluation)))
}

/// One matched evaluation entry, as shown in an applicant's score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryContribution {
    pub category: String,
    pub raw_score: f64,
    pub max_score: f64,
    pub weight: f64,
    /// `raw_score / max_score`
    pub normalized: f64,
    /// `normalized * weight`, a fraction of the overall score.
    pub contribution: f64,
}

/// A validated rubric with each category's maximum score resolved up front.
///
/// Construction fails with `ScoringError::InvalidRubric` when any category has
/// no levels, a non-finite level score, a non-positive maximum, or a weight
/// outside 0.0 to 1.0. Once built, scoring cannot fail.
#[derive(Debug, Clone)]
pub struct ScoreAggregator<'a> {
    rubric: &'a Rubric,
    categories: HashMap<&'a str, (&'a Category, f64)>,
}

impl<'a> ScoreAggregator<'a> {
    pub fn new(rubric: &'a Rubric) -> Result<Self, ScoringError> {
        let mut categories = HashMap::with_capacity(rubric.content.categories.len());

        for category in &rubric.content.categories {
            let max_score = validate_category(category)?;
            // Duplicate names resolve to the first category, like a linear lookup would.
            categories
                .entry(category.name.as_str())
                .or_insert((category, max_score));
        }

        Ok(Self { rubric, categories })
    }

    pub fn rubric(&self) -> &'a Rubric {
        self.rubric
    }

    /// Maximum score of the named category, if the rubric has it.
    pub fn max_score(&self, category: &str) -> Option<f64> {
        self.categories.get(category).map(|(_, max)| *max)
    }

    /// Matched entries of `evaluation`, in evaluation order. Entries naming a
    /// category the rubric no longer has are skipped.
    pub fn contributions(&self, evaluation: &Evaluation) -> Vec<CategoryContribution> {
        evaluation
            .entries()
            .iter()
            .filter_map(|entry| {
                let Some((category, max_score)) = self.categories.get(entry.category.as_str())
                else {
                    debug!(
                        "Skipping evaluation entry for unknown category '{}' (rubric {})",
                        entry.category, self.rubric.id
                    );
                    return None;
                };

                let normalized = entry.score / max_score;
                let contribution = normalized * category.weight;
                debug!(
                    "Category: {}, score: {}, max: {}, weight: {}, contribution: {}",
                    category.name, entry.score, max_score, category.weight, contribution
                );

                Some(CategoryContribution {
                    category: category.name.clone(),
                    raw_score: entry.score,
                    max_score: *max_score,
                    weight: category.weight,
                    normalized,
                    contribution,
                })
            })
            .collect()
    }

    /// Sum of contributions scaled to a percentage. Unrounded.
    pub fn weighted_score(&self, evaluation: Option<&Evaluation>) -> f64 {
        let Some(evaluation) = evaluation else {
            return 0.0;
        };
        let total: f64 = self
            .contributions(evaluation)
            .iter()
            .map(|c| c.contribution)
            .sum();
        total * 100.0
    }
}

fn validate_category(category: &Category) -> Result<f64, ScoringError> {
    let invalid = |defect| ScoringError::InvalidRubric {
        category: category.name.clone(),
        defect,
    };

    if !category.weight.is_finite() || !(0.0..=1.0).contains(&category.weight) {
        return Err(invalid(RubricDefect::WeightOutOfRange(category.weight)));
    }
    if let Some(level) = category.scoring_levels.iter().find(|l| !l.score.is_finite()) {
        return Err(invalid(RubricDefect::NonFiniteScore { level: level.level }));
    }

    let max_score = category_max_score(category)?;
    if max_score <= 0.0 {
        return Err(invalid(RubricDefect::NonPositiveMaxScore(max_score)));
    }
    Ok(max_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryEvaluation, EvaluationContent, RubricContent, ScoringLevel};

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn make_category(name: &str, weight: f64, scores: &[f64]) -> Category {
        Category {
            name: name.to_string(),
            weight,
            scoring_levels: scores
                .iter()
                .enumerate()
                .map(|(i, s)| ScoringLevel {
                    level: i as u32 + 1,
                    score: *s,
                    description: format!("Level {}", i + 1),
                })
                .collect(),
        }
    }

    fn make_rubric(categories: Vec<Category>) -> Rubric {
        Rubric {
            id: 1,
            job_posting: 1,
            content: RubricContent {
                title: "Rubric".to_string(),
                description: String::new(),
                categories,
            },
            human_approved: true,
            created_at: None,
            approved_by: None,
            approved_at: None,
        }
    }

    fn make_evaluation(entries: &[(&str, f64)]) -> Evaluation {
        Evaluation {
            id: 1,
            content: Some(EvaluationContent {
                evaluations: entries
                    .iter()
                    .map(|(c, s)| CategoryEvaluation {
                        category: c.to_string(),
                        score: *s,
                        justification: String::new(),
                    })
                    .collect(),
                overall_assessment: String::new(),
            }),
            overall_score: None,
            created_at: None,
            human_approved: false,
            approved_by: None,
            approved_at: None,
        }
    }

    fn skills_culture() -> Rubric {
        make_rubric(vec![
            make_category("Skills", 0.6, &[0.0, 10.0]),
            make_category("Culture", 0.4, &[0.0, 5.0]),
        ])
    }

    #[test]
    fn test_full_marks_score_one_hundred() {
        let rubric = skills_culture();
        let evaluation = make_evaluation(&[("Skills", 10.0), ("Culture", 5.0)]);
        let score = weighted_score(Some(&rubric), Some(&evaluation)).unwrap();
        assert!(approx(score, 100.0), "Score was {score}");
    }

    #[test]
    fn test_missing_category_lowers_score() {
        let rubric = skills_culture();
        let evaluation = make_evaluation(&[("Skills", 5.0)]);
        let score = weighted_score(Some(&rubric), Some(&evaluation)).unwrap();
        assert!(approx(score, 30.0), "Score was {score}");
    }

    #[test]
    fn test_absent_evaluation_is_zero() {
        let rubric = skills_culture();
        assert_eq!(weighted_score(Some(&rubric), None).unwrap(), 0.0);
        let empty = make_evaluation(&[]);
        assert_eq!(weighted_score(Some(&rubric), Some(&empty)).unwrap(), 0.0);

        let mut no_content = make_evaluation(&[]);
        no_content.content = None;
        assert_eq!(weighted_score(Some(&rubric), Some(&no_content)).unwrap(), 0.0);
    }

    #[test]
    fn test_absent_rubric_is_zero() {
        let evaluation = make_evaluation(&[("Skills", 10.0)]);
        assert_eq!(weighted_score(None, Some(&evaluation)).unwrap(), 0.0);
        let empty = make_rubric(vec![]);
        assert_eq!(weighted_score(Some(&empty), Some(&evaluation)).unwrap(), 0.0);
    }

    #[test]
    fn test_unmatched_category_is_skipped() {
        let rubric = skills_culture();
        let evaluation = make_evaluation(&[("Skills", 10.0), ("Leadership", 9.0)]);
        let score = weighted_score(Some(&rubric), Some(&evaluation)).unwrap();
        assert!(approx(score, 60.0), "Score was {score}");
    }

    #[test]
    fn test_category_name_match_is_exact() {
        let rubric = skills_culture();
        let evaluation = make_evaluation(&[("skills", 10.0)]);
        assert_eq!(weighted_score(Some(&rubric), Some(&evaluation)).unwrap(), 0.0);
    }

    #[test]
    fn test_unsorted_levels_use_max() {
        let category = make_category("Skills", 1.0, &[4.0, 10.0, 2.0]);
        assert_eq!(category_max_score(&category).unwrap(), 10.0);
    }

    #[test]
    fn test_empty_levels_is_invalid_rubric() {
        let category = make_category("Skills", 1.0, &[]);
        let err = category_max_score(&category).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InvalidRubric {
                category: "Skills".to_string(),
                defect: RubricDefect::NoScoringLevels,
            }
        );
    }

    #[test]
    fn test_empty_levels_fails_weighted_score() {
        let rubric = make_rubric(vec![
            make_category("Skills", 0.6, &[0.0, 10.0]),
            make_category("Culture", 0.4, &[]),
        ]);
        let evaluation = make_evaluation(&[("Skills", 10.0)]);
        assert!(matches!(
            weighted_score(Some(&rubric), Some(&evaluation)),
            Err(ScoringError::InvalidRubric { .. })
        ));
    }

    #[test]
    fn test_percentage_weight_is_rejected() {
        let rubric = make_rubric(vec![make_category("Skills", 60.0, &[0.0, 10.0])]);
        let err = ScoreAggregator::new(&rubric).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InvalidRubric {
                category: "Skills".to_string(),
                defect: RubricDefect::WeightOutOfRange(60.0),
            }
        );
    }

    #[test]
    fn test_zero_max_score_is_rejected() {
        let rubric = make_rubric(vec![make_category("Skills", 0.5, &[0.0, 0.0])]);
        assert!(matches!(
            ScoreAggregator::new(&rubric),
            Err(ScoringError::InvalidRubric {
                defect: RubricDefect::NonPositiveMaxScore(_),
                ..
            })
        ));
    }

    #[test]
    fn test_zero_weight_category_contributes_nothing() {
        let rubric = make_rubric(vec![
            make_category("Skills", 1.0, &[0.0, 10.0]),
            make_category("Hobbies", 0.0, &[0.0, 5.0]),
        ]);
        let evaluation = make_evaluation(&[("Skills", 5.0), ("Hobbies", 5.0)]);
        let score = weighted_score(Some(&rubric), Some(&evaluation)).unwrap();
        assert!(approx(score, 50.0), "Score was {score}");
    }

    #[test]
    fn test_contribution_bounded_by_weight() {
        let category = make_category("Skills", 0.35, &[0.0, 3.0, 7.0]);
        let rubric = make_rubric(vec![category]);
        let aggregator = ScoreAggregator::new(&rubric).unwrap();
        for raw in [0.0, 1.5, 3.0, 6.9, 7.0] {
            let score = aggregator.weighted_score(Some(&make_evaluation(&[("Skills", raw)])));
            assert!((0.0..=35.0 + EPS).contains(&score), "Score was {score}");
        }
    }

    #[test]
    fn test_unit_weights_stay_within_bounds() {
        let rubric = make_rubric(vec![
            make_category("A", 0.2, &[1.0, 4.0]),
            make_category("B", 0.3, &[0.0, 2.0, 9.0]),
            make_category("C", 0.5, &[0.0, 10.0]),
        ]);
        let aggregator = ScoreAggregator::new(&rubric).unwrap();
        for (a, b, c) in [(0.0, 0.0, 0.0), (4.0, 9.0, 10.0), (2.0, 4.5, 7.0)] {
            let evaluation = make_evaluation(&[("A", a), ("B", b), ("C", c)]);
            let score = aggregator.weighted_score(Some(&evaluation));
            assert!((0.0..=100.0 + EPS).contains(&score), "Score was {score}");
        }
    }

    #[test]
    fn test_duplicate_category_uses_first() {
        let rubric = make_rubric(vec![
            make_category("Skills", 0.5, &[0.0, 10.0]),
            make_category("Skills", 0.5, &[0.0, 20.0]),
        ]);
        let aggregator = ScoreAggregator::new(&rubric).unwrap();
        assert_eq!(aggregator.max_score("Skills"), Some(10.0));
    }

    #[test]
    fn test_contributions_breakdown() {
        let rubric = skills_culture();
        let aggregator = ScoreAggregator::new(&rubric).unwrap();
        let evaluation = make_evaluation(&[("Culture", 2.5), ("Ghost", 1.0), ("Skills", 10.0)]);
        let breakdown = aggregator.contributions(&evaluation);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Culture");
        assert!(approx(breakdown[0].normalized, 0.5));
        assert!(approx(breakdown[0].contribution, 0.2));
        assert_eq!(breakdown[1].max_score, 10.0);
    }

    #[test]
    fn test_score_color_boundaries() {
        assert_eq!(score_color(79.0, 100.0), ScoreColor::MediumHigh);
        assert_eq!(score_color(80.0, 100.0), ScoreColor::High);
        assert_eq!(score_color(60.0, 100.0), ScoreColor::MediumHigh);
        assert_eq!(score_color(59.9, 100.0), ScoreColor::MediumLow);
        assert_eq!(score_color(40.0, 100.0), ScoreColor::MediumLow);
        assert_eq!(score_color(39.9, 100.0), ScoreColor::Low);
        assert_eq!(score_color(4.0, 5.0), ScoreColor::High);
    }
}
