//! Performance review write paths and workflow.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::calculation::score_goals;
use crate::clock::Clock;
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Goal, PerformanceReview, ReviewPeriod, ReviewStatus};
use crate::store::RecordStore;

use super::require_employee_id;

/// Input for a new performance review.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    /// Employee reference in the directory.
    pub employee_id: String,
    /// Review period descriptor.
    pub period: ReviewPeriod,
    /// Ordered goal list.
    pub goals: Vec<Goal>,
    /// Optional self-assessment.
    #[serde(default)]
    pub employee_comment: Option<String>,
}

/// Scores reviews and moves them through draft, submitted, reviewed and
/// approved.
#[derive(Clone)]
pub struct KpiScorer {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl KpiScorer {
    /// Creates a scorer over the given store.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a draft review with its goals scored.
    pub async fn create(&self, request: NewReview) -> EngineResult<PerformanceReview> {
        require_employee_id(&request.employee_id)?;
        request.period.validate()?;
        let score = score_goals(&request.goals)?;

        let mut review = PerformanceReview::new(
            request.employee_id,
            request.period,
            request.goals,
            &score,
            self.clock.now(),
        );
        review.employee_comment = request.employee_comment;

        let review = self.store.insert_review(review).await?;
        info!(
            review_id = %review.id,
            employee_id = %review.employee_id,
            overall_score = %review.overall_score(),
            rating = ?review.rating(),
            counted_goals = score.counted_goals,
            "Performance review created"
        );
        Ok(review)
    }

    /// Fetches a review.
    pub async fn get(&self, id: Uuid) -> EngineResult<PerformanceReview> {
        self.store
            .get_review(id)
            .await?
            .ok_or_else(|| EngineError::not_found("performance review", id))
    }

    /// Replaces the whole goal list and rescores.
    ///
    /// Goals of an approved review are frozen.
    pub async fn replace_goals(&self, id: Uuid, goals: Vec<Goal>) -> EngineResult<PerformanceReview> {
        let mut review = self.get(id).await?;
        if review.status == ReviewStatus::Approved {
            return Err(EngineError::conflict(
                "performance review",
                format!("review {} is approved and its goals are frozen", id),
            ));
        }

        let score = score_goals(&goals)?;
        review.replace_goals(goals, &score);
        review.updated_at = self.clock.now();

        let review = self.store.update_review(review).await?;
        info!(
            review_id = %review.id,
            overall_score = %review.overall_score(),
            rating = ?review.rating(),
            "Performance review rescored"
        );
        Ok(review)
    }

    /// Submits a draft for review.
    pub async fn submit(&self, id: Uuid, employee_comment: Option<String>) -> EngineResult<PerformanceReview> {
        let mut review = self.get(id).await?;
        expect_status(&review, ReviewStatus::Draft, "submitted")?;

        review.status = ReviewStatus::Submitted;
        if employee_comment.is_some() {
            review.employee_comment = employee_comment;
        }
        review.updated_at = self.clock.now();

        let review = self.store.update_review(review).await?;
        info!(review_id = %review.id, "Performance review submitted");
        Ok(review)
    }

    /// Records the manager's review, forcing the status to reviewed.
    ///
    /// Any status other than approved can be reviewed.
    pub async fn review(
        &self,
        id: Uuid,
        actor: &Actor,
        manager_comment: Option<String>,
    ) -> EngineResult<PerformanceReview> {
        let mut review = self.get(id).await?;
        if review.status == ReviewStatus::Approved {
            return Err(EngineError::conflict(
                "performance review",
                format!("review {} is already approved", id),
            ));
        }

        let now = self.clock.now();
        review.status = ReviewStatus::Reviewed;
        review.manager_comment = manager_comment;
        review.reviewed_by = Some(actor.label());
        review.reviewed_at = Some(now);
        review.updated_at = now;

        let review = self.store.update_review(review).await?;
        info!(
            review_id = %review.id,
            reviewed_by = %actor.label(),
            "Performance review reviewed"
        );
        Ok(review)
    }

    /// Approves a reviewed review.
    pub async fn approve(&self, id: Uuid, actor: &Actor) -> EngineResult<PerformanceReview> {
        let mut review = self.get(id).await?;
        expect_status(&review, ReviewStatus::Reviewed, "approved")?;

        review.status = ReviewStatus::Approved;
        review.updated_at = self.clock.now();

        let review = self.store.update_review(review).await?;
        info!(review_id = %review.id, approved_by = %actor.label(), "Performance review approved");
        Ok(review)
    }
}

fn expect_status(review: &PerformanceReview, expected: ReviewStatus, action: &str) -> EngineResult<()> {
    if review.status == expected {
        return Ok(());
    }
    Err(EngineError::conflict(
        "performance review",
        format!(
            "only {:?} reviews can be {}, review {} is {:?}",
            expected, action, review.id, review.status
        ),
    ))
}
