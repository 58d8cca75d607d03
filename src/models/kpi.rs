//! Performance review (KPI) model.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::KpiScoreResult;
use crate::error::{EngineError, EngineResult};

/// Length of a review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPeriodType {
    /// One calendar month.
    Monthly,
    /// One quarter.
    Quarterly,
    /// One calendar year.
    Yearly,
}

/// Identifies the cycle a review belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPeriod {
    /// Cycle length.
    #[serde(rename = "type")]
    pub period_type: ReviewPeriodType,
    /// Month (1-12), required for monthly reviews.
    #[serde(default)]
    pub month: Option<u32>,
    /// Quarter (1-4), required for quarterly reviews.
    #[serde(default)]
    pub quarter: Option<u32>,
    /// Calendar year.
    pub year: i32,
}

impl ReviewPeriod {
    /// Checks that the descriptor carries the fields its type needs.
    pub fn validate(&self) -> EngineResult<()> {
        match self.period_type {
            ReviewPeriodType::Monthly => match self.month {
                Some(month) if (1..=12).contains(&month) => Ok(()),
                Some(month) => Err(EngineError::validation(
                    "period.month",
                    format!("must be between 1 and 12, got {}", month),
                )),
                None => Err(EngineError::validation(
                    "period.month",
                    "monthly reviews require a month",
                )),
            },
            ReviewPeriodType::Quarterly => match self.quarter {
                Some(quarter) if (1..=4).contains(&quarter) => Ok(()),
                Some(quarter) => Err(EngineError::validation(
                    "period.quarter",
                    format!("must be between 1 and 4, got {}", quarter),
                )),
                None => Err(EngineError::validation(
                    "period.quarter",
                    "quarterly reviews require a quarter",
                )),
            },
            ReviewPeriodType::Yearly => Ok(()),
        }
    }
}

/// A single scored goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal name.
    pub name: String,
    /// Target value; must be positive.
    pub target: Decimal,
    /// Achieved value, if measured yet.
    #[serde(default)]
    pub actual: Option<Decimal>,
    /// Relative weight in [0, 100].
    pub weight: Decimal,
    /// Unit of measure.
    #[serde(default)]
    pub unit: Option<String>,
}

/// Rating band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Score of 90 or above.
    Excellent,
    /// Score in [80, 90).
    Good,
    /// Score in [70, 80).
    Average,
    /// Score in [60, 70).
    BelowAverage,
    /// Score below 60.
    Poor,
}

/// Review workflow state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Being drafted.
    #[default]
    Draft,
    /// Submitted for review.
    Submitted,
    /// Reviewed by a manager.
    Reviewed,
    /// Approved; goals are frozen.
    Approved,
}

/// A performance review with its derived score and rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReview {
    /// Review identifier.
    pub id: Uuid,
    /// Employee reference in the directory.
    pub employee_id: String,
    /// Review cycle.
    pub period: ReviewPeriod,
    /// Ordered goals.
    pub goals: Vec<Goal>,
    overall_score: Decimal,
    rating: Rating,
    /// Workflow state.
    pub status: ReviewStatus,
    /// Employee's own comment.
    #[serde(default)]
    pub employee_comment: Option<String>,
    /// Manager's review comment.
    #[serde(default)]
    pub manager_comment: Option<String>,
    /// Who reviewed the goals.
    #[serde(default)]
    pub reviewed_by: Option<String>,
    /// When the review happened.
    #[serde(default)]
    pub reviewed_at: Option<NaiveDateTime>,
    /// Creation time.
    pub created_at: NaiveDateTime,
    /// Last modification time.
    pub updated_at: NaiveDateTime,
}

impl PerformanceReview {
    /// Builds a draft review from scored goals.
    pub fn new(
        employee_id: impl Into<String>,
        period: ReviewPeriod,
        goals: Vec<Goal>,
        score: &KpiScoreResult,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            period,
            goals,
            overall_score: score.overall_score,
            rating: score.rating,
            status: ReviewStatus::Draft,
            employee_comment: None,
            manager_comment: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the goal list together with the score derived from it.
    pub fn replace_goals(&mut self, goals: Vec<Goal>, score: &KpiScoreResult) {
        self.goals = goals;
        self.overall_score = score.overall_score;
        self.rating = score.rating;
    }

    /// Derived overall score in [0, 100].
    pub fn overall_score(&self) -> Decimal {
        self.overall_score
    }

    /// Derived rating band.
    pub fn rating(&self) -> Rating {
        self.rating
    }
}
