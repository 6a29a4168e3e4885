//! Posting report - pulls a posting's rubric and applicants from a backend
//! and assembles everything the applicant list and statistics views show.
//!
//! The backend sits behind `RecruitingBackend` so the report can be built from
//! the live API or from in-memory fixtures.

use std::io::{self, Write};

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::api_client::{ApiClient, ApiError};
use crate::errors::AppError;
use crate::models::{Applicant, ApplicantStatus, JobPosting, Rubric};
use crate::roster::{rank, RosterQuery};
use crate::scoring::stats::FULL_SCORE;
use crate::scoring::{
    bucket_scores, category_averages, category_percentile, CategoryAverage, ScoreColor,
    ScoreSummary,
};

// ────────────────────────────────────────────────────────────────────────────
// Backend seam
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait RecruitingBackend: Send + Sync {
    async fn job_posting(&self, job_id: i64) -> Result<JobPosting, ApiError>;
    async fn rubric(&self, job_id: i64) -> Result<Rubric, ApiError>;
    async fn applicants(&self, job_id: i64) -> Result<Vec<Applicant>, ApiError>;
}

#[async_trait]
impl RecruitingBackend for ApiClient {
    async fn job_posting(&self, job_id: i64) -> Result<JobPosting, ApiError> {
        ApiClient::job_posting(self, job_id).await
    }

    async fn rubric(&self, job_id: i64) -> Result<Rubric, ApiError> {
        self.rubric_for_posting(job_id).await
    }

    async fn applicants(&self, job_id: i64) -> Result<Vec<Applicant>, ApiError> {
        self.all_applicants(job_id).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub applicant_id: i64,
    pub name: String,
    pub email: String,
    pub status: ApplicantStatus,
    pub score: Option<f64>,
    pub color: ScoreColor,
    pub percentile: u32,
    /// Category percentile against the other rows of the roster, in rubric order.
    pub category_percentiles: Vec<(String, u32)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostingReport {
    pub posting: JobPosting,
    pub rubric_title: String,
    pub rubric_approved: bool,
    /// Filtered and sorted roster.
    pub rows: Vec<ReportRow>,
    /// Histogram of the roster's evaluated applicants, lowest bucket first.
    pub distribution: Vec<usize>,
    /// Like every other statistic here, computed over the filtered roster.
    pub summary: ScoreSummary,
    pub category_averages: Vec<CategoryAverage>,
}

pub async fn build_posting_report(
    backend: &dyn RecruitingBackend,
    job_id: i64,
    query: &RosterQuery,
    bucket_count: usize,
) -> Result<PostingReport, AppError> {
    let posting = backend.job_posting(job_id).await?;
    let rubric = backend.rubric(job_id).await?;
    let applicants = backend.applicants(job_id).await?;

    let ranked = rank(&applicants, &rubric, query)?;
    let visible: Vec<&Applicant> = ranked.iter().map(|r| r.applicant).collect();
    let rows: Vec<ReportRow> = ranked
        .iter()
        .map(|row| ReportRow {
            applicant_id: row.applicant.id,
            name: row.applicant.full_name(),
            email: row.applicant.email.clone(),
            status: row.applicant.status,
            score: row.score,
            color: row.color,
            percentile: row.percentile,
            category_percentiles: rubric
                .content
                .categories
                .iter()
                .map(|c| {
                    (
                        c.name.clone(),
                        category_percentile(row.applicant, &c.name, &visible),
                    )
                })
                .collect(),
        })
        .collect();

    let distribution = bucket_scores(
        ranked.iter().filter_map(|r| r.score),
        FULL_SCORE,
        bucket_count,
    );
    let summary = ScoreSummary::compute(&visible, &rubric)?;
    let category_averages = category_averages(&visible, &rubric)?;

    info!(
        "Built report for posting {job_id}: {} of {} applicants shown, {} evaluated",
        rows.len(),
        applicants.len(),
        summary.evaluated
    );

    Ok(PostingReport {
        posting,
        rubric_title: rubric.content.title.clone(),
        rubric_approved: rubric.human_approved,
        rows,
        distribution,
        summary,
        category_averages,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn render_report(report: &PostingReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{} (posting {})", report.posting.title, report.posting.id)?;
    let approval = if report.rubric_approved {
        "approved"
    } else {
        "pending approval"
    };
    writeln!(out, "Rubric: {} ({approval})", report.rubric_title)?;

    writeln!(out, "\nApplicants")?;
    if report.rows.is_empty() {
        writeln!(out, "- none")?;
    }
    for row in &report.rows {
        let score = match row.score {
            Some(score) => format!("{score:.0}%"),
            None => "not evaluated".to_string(),
        };
        writeln!(
            out,
            "- {} <{}> | {} | {} [{}] | {}th percentile",
            row.name,
            row.email,
            row.status.as_str(),
            score,
            row.color.as_str(),
            row.percentile
        )?;
    }

    let summary = &report.summary;
    writeln!(out, "\nStatistics")?;
    writeln!(
        out,
        "- Evaluated: {} of {}",
        summary.evaluated, summary.total_applicants
    )?;
    if let (Some(average), Some(highest), Some(lowest)) =
        (summary.average, summary.highest, summary.lowest)
    {
        writeln!(out, "- Average score: {average:.2}%")?;
        writeln!(out, "- Highest score: {highest:.2}%")?;
        writeln!(out, "- Lowest score: {lowest:.2}%")?;
    }

    writeln!(out, "\nCategory averages")?;
    for average in &report.category_averages {
        let value = average
            .average_percent
            .map(|p| format!("{p:.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "- {} (weight {:.0}%): {value}",
            average.category,
            average.weight * 100.0
        )?;
    }

    writeln!(out, "\nScore distribution")?;
    let width = FULL_SCORE / report.distribution.len().max(1) as f64;
    for (index, count) in report.distribution.iter().enumerate() {
        let low = index as f64 * width;
        writeln!(out, "- {:.0}-{:.0}%: {count}", low, low + width)?;
    }

    Ok(())
}
