//! Weighted-goal scoring for performance reviews.
//!
//! Each measured goal contributes its achievement (actual as a percentage
//! of target, capped at 100) weighted by its weight. Goals without an
//! actual value are left out of both the numerator and the weight total.
//! The same rule applies when a review is created and when its goals are
//! replaced.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Goal, Rating};

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// The result of scoring a goal list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiScoreResult {
    /// Weighted score in [0, 100], rounded to two decimals.
    pub overall_score: Decimal,
    /// Rating band for the score.
    pub rating: Rating,
    /// Number of goals that had an actual value and counted.
    pub counted_goals: usize,
    /// The audit step recording this derivation.
    pub audit_step: AuditStep,
}

/// Checks every goal: non-empty name, positive target, weight in [0, 100].
pub fn validate_goals(goals: &[Goal]) -> EngineResult<()> {
    for (index, goal) in goals.iter().enumerate() {
        if goal.name.trim().is_empty() {
            return Err(EngineError::validation(
                format!("goals[{}].name", index),
                "must not be empty",
            ));
        }
        if goal.target <= Decimal::ZERO {
            return Err(EngineError::validation(
                format!("goals[{}].target", index),
                format!("must be greater than 0, got {}", goal.target),
            ));
        }
        if goal.weight < Decimal::ZERO || goal.weight > ONE_HUNDRED {
            return Err(EngineError::validation(
                format!("goals[{}].weight", index),
                format!("must be between 0 and 100, got {}", goal.weight),
            ));
        }
    }
    Ok(())
}

/// A goal's achievement percentage, capped at 100.
///
/// Returns `None` when the goal has no actual value yet, or when an actual
/// far below target puts the percentage outside the `Decimal` range.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::goal_achievement;
/// use workforce_engine::models::Goal;
/// use rust_decimal::Decimal;
///
/// let goal = Goal {
///     name: "Tickets closed".to_string(),
///     target: Decimal::from(100),
///     actual: Some(Decimal::from(200)),
///     weight: Decimal::from(100),
///     unit: None,
/// };
/// assert_eq!(goal_achievement(&goal), Some(Decimal::from(100)));
/// ```
pub fn goal_achievement(goal: &Goal) -> Option<Decimal> {
    let actual = goal.actual?;
    if goal.target <= Decimal::ZERO {
        return None;
    }
    if actual >= goal.target {
        return Some(ONE_HUNDRED);
    }
    actual.checked_div(goal.target)?.checked_mul(ONE_HUNDRED)
}

/// Maps a score onto its rating band.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::classify_rating;
/// use workforce_engine::models::Rating;
/// use rust_decimal::Decimal;
///
/// assert_eq!(classify_rating(Decimal::from(90)), Rating::Excellent);
/// assert_eq!(classify_rating(Decimal::new(8999, 2)), Rating::Good);
/// assert_eq!(classify_rating(Decimal::from(59)), Rating::Poor);
/// ```
pub fn classify_rating(score: Decimal) -> Rating {
    if score >= Decimal::from(90) {
        Rating::Excellent
    } else if score >= Decimal::from(80) {
        Rating::Good
    } else if score >= Decimal::from(70) {
        Rating::Average
    } else if score >= Decimal::from(60) {
        Rating::BelowAverage
    } else {
        Rating::Poor
    }
}

/// Scores an ordered goal list.
///
/// ```text
/// score = clamp(Σ(achievement_i × weight_i) / Σ(weight_i of counted goals), 0, 100)
/// ```
///
/// A list with no counted weight scores 0.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] if any goal fails [`validate_goals`].
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::score_goals;
/// use workforce_engine::models::{Goal, Rating};
/// use rust_decimal::Decimal;
///
/// let goal = |target: i64, actual: i64| Goal {
///     name: "goal".to_string(),
///     target: Decimal::from(target),
///     actual: Some(Decimal::from(actual)),
///     weight: Decimal::from(50),
///     unit: None,
/// };
///
/// let result = score_goals(&[goal(100, 100), goal(50, 25)]).unwrap();
/// assert_eq!(result.overall_score, Decimal::from(75));
/// assert_eq!(result.rating, Rating::Average);
/// ```
pub fn score_goals(goals: &[Goal]) -> EngineResult<KpiScoreResult> {
    validate_goals(goals)?;

    let mut weighted_sum = Decimal::ZERO;
    let mut counted_weight = Decimal::ZERO;
    let mut counted_goals = 0;

    for (index, goal) in goals.iter().enumerate() {
        if goal.actual.is_none() {
            continue;
        }
        weighted_sum = goal_achievement(goal)
            .and_then(|achievement| achievement.checked_mul(goal.weight))
            .and_then(|weighted| weighted_sum.checked_add(weighted))
            .ok_or_else(|| {
                EngineError::validation(format!("goals[{}].actual", index), "amount out of range")
            })?;
        counted_weight += goal.weight;
        counted_goals += 1;
    }

    let raw_score = if counted_weight > Decimal::ZERO {
        weighted_sum / counted_weight
    } else {
        Decimal::ZERO
    };
    let overall_score = raw_score
        .clamp(Decimal::ZERO, ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let rating = classify_rating(overall_score);

    let audit_step = AuditStep {
        rule_id: "kpi_weighted_score".to_string(),
        rule_name: "KPI Weighted Score".to_string(),
        formula: "clamp(sum(min(actual / target, 1) * 100 * weight) / sum(weight), 0, 100)"
            .to_string(),
        input: serde_json::json!({
            "goals": goals.len(),
            "counted_goals": counted_goals,
            "counted_weight": counted_weight.normalize().to_string()
        }),
        output: serde_json::json!({
            "overall_score": overall_score.normalize().to_string(),
            "rating": rating
        }),
        reasoning: format!(
            "{} of {} goals measured with total weight {}, scoring {} ({:?})",
            counted_goals,
            goals.len(),
            counted_weight.normalize(),
            overall_score.normalize(),
            rating
        ),
    };

    Ok(KpiScoreResult {
        overall_score,
        rating,
        counted_goals,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn goal(target: &str, actual: Option<&str>, weight: &str) -> Goal {
        Goal {
            name: "goal".to_string(),
            target: dec(target),
            actual: actual.map(dec),
            weight: dec(weight),
            unit: None,
        }
    }

    #[test]
    fn test_two_equal_weight_goals_score_75() {
        let goals = vec![goal("100", Some("100"), "50"), goal("50", Some("25"), "50")];
        let result = score_goals(&goals).unwrap();
        assert_eq!(result.overall_score, dec("75"));
        assert_eq!(result.rating, Rating::Average);
        assert_eq!(result.counted_goals, 2);
    }

    #[test]
    fn test_overachievement_is_capped_at_100() {
        let result = score_goals(&[goal("100", Some("200"), "100")]).unwrap();
        assert_eq!(result.overall_score, dec("100"));
        assert_eq!(result.rating, Rating::Excellent);
    }

    #[test]
    fn test_unmeasured_goals_are_left_out() {
        let goals = vec![goal("100", Some("80"), "30"), goal("100", None, "70")];
        let result = score_goals(&goals).unwrap();
        assert_eq!(result.overall_score, dec("80"));
        assert_eq!(result.rating, Rating::Good);
        assert_eq!(result.counted_goals, 1);
    }

    #[test]
    fn test_no_measured_goals_scores_zero() {
        let result = score_goals(&[goal("100", None, "100")]).unwrap();
        assert_eq!(result.overall_score, Decimal::ZERO);
        assert_eq!(result.rating, Rating::Poor);

        let result = score_goals(&[]).unwrap();
        assert_eq!(result.overall_score, Decimal::ZERO);
    }

    #[test]
    fn test_zero_weight_goals_only_score_zero() {
        let result = score_goals(&[goal("100", Some("100"), "0")]).unwrap();
        assert_eq!(result.overall_score, Decimal::ZERO);
    }

    #[test]
    fn test_negative_actual_clamps_to_zero() {
        let result = score_goals(&[goal("100", Some("-50"), "100")]).unwrap();
        assert_eq!(result.overall_score, Decimal::ZERO);
    }

    #[test]
    fn test_huge_actual_over_tiny_target_is_capped() {
        let goals = vec![Goal {
            name: "goal".to_string(),
            target: Decimal::new(1, 28),
            actual: Some(Decimal::MAX),
            weight: dec("100"),
            unit: None,
        }];
        let result = score_goals(&goals).unwrap();
        assert_eq!(result.overall_score, dec("100"));
    }

    #[test]
    fn test_huge_negative_actual_is_validation_error() {
        let goals = vec![
            goal("100", Some("100"), "50"),
            Goal {
                name: "goal".to_string(),
                target: Decimal::new(1, 28),
                actual: Some(Decimal::MIN),
                weight: dec("50"),
                unit: None,
            },
        ];
        match score_goals(&goals) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "goals[1].actual"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_score_rounds_to_two_decimals() {
        // 1/3 achievement = 33.333...
        let result = score_goals(&[goal("3", Some("1"), "100")]).unwrap();
        assert_eq!(result.overall_score, dec("33.33"));
    }

    #[test]
    fn test_rating_boundaries() {
        assert_eq!(classify_rating(dec("100")), Rating::Excellent);
        assert_eq!(classify_rating(dec("90")), Rating::Excellent);
        assert_eq!(classify_rating(dec("89.99")), Rating::Good);
        assert_eq!(classify_rating(dec("80")), Rating::Good);
        assert_eq!(classify_rating(dec("79.99")), Rating::Average);
        assert_eq!(classify_rating(dec("70")), Rating::Average);
        assert_eq!(classify_rating(dec("69.99")), Rating::BelowAverage);
        assert_eq!(classify_rating(dec("60")), Rating::BelowAverage);
        assert_eq!(classify_rating(dec("59.99")), Rating::Poor);
        assert_eq!(classify_rating(dec("0")), Rating::Poor);
    }

    #[test]
    fn test_zero_target_is_validation_error() {
        match score_goals(&[goal("0", Some("5"), "100")]) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "goals[0].target"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_weight_over_100_is_validation_error() {
        let goals = vec![goal("10", Some("5"), "50"), goal("10", Some("5"), "101")];
        match score_goals(&goals) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "goals[1].weight"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_step_counts_goals() {
        let goals = vec![goal("100", Some("100"), "50"), goal("100", None, "50")];
        let result = score_goals(&goals).unwrap();
        assert_eq!(result.audit_step.input["counted_goals"], 1);
        assert_eq!(result.audit_step.output["rating"], "excellent");
    }

    proptest! {
        #[test]
        fn prop_score_stays_within_bounds(
            raw in prop::collection::vec((1i64..10_000, -5_000i64..20_000, 0i64..=100), 0..8)
        ) {
            let goals: Vec<Goal> = raw
                .into_iter()
                .map(|(target, actual, weight)| Goal {
                    name: "g".to_string(),
                    target: Decimal::from(target),
                    actual: Some(Decimal::from(actual)),
                    weight: Decimal::from(weight),
                    unit: None,
                })
                .collect();

            let result = score_goals(&goals).unwrap();
            prop_assert!(result.overall_score >= Decimal::ZERO);
            prop_assert!(result.overall_score <= ONE_HUNDRED);
            prop_assert_eq!(result.rating, classify_rating(result.overall_score));
        }
    }
}
