pub mod applicant;
pub mod evaluation;
pub mod posting;
pub mod rubric;
pub mod user;

pub use applicant::{Applicant, ApplicantStatus};
pub use evaluation::{CategoryEvaluation, Evaluation, EvaluationContent};
pub use posting::{JobPosting, Paginated};
pub use rubric::{Category, Rubric, RubricContent, ScoringLevel};
pub use user::User;
