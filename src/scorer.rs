use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::LTV_RATIO;
use crate::error::{AppError, Result};
use crate::types::ScoreSnapshot;

/// Derive borrow capacity and the utilization-based credit score from one
/// user's balances. Pure arithmetic, deterministic given its inputs.
///
/// Utilization is 1 - debt / (collateral + underlying). An account with no
/// exposure at all (zero denominator) counts as fully unutilized, ratio 1,
/// rather than propagating a non-finite value. The percentage score is the
/// floored ratio times 100, deliberately unclamped: debt larger than the
/// denominator yields a negative score and the attestation records it as-is.
pub fn compute_score(collateral: f64, debt: f64, underlying: f64) -> Result<ScoreSnapshot> {
    check_balance("collateral", collateral)?;
    check_balance("debt", debt)?;
    check_balance("underlying", underlying)?;

    let borrow_capacity = collateral * LTV_RATIO - debt;

    let denominator = collateral + underlying;
    let utilization_ratio = if denominator == 0.0 {
        1.0
    } else {
        1.0 - debt / denominator
    };

    let percentage_score = (utilization_ratio * 100.0).floor() as i64;

    Ok(ScoreSnapshot {
        collateral,
        debt,
        underlying,
        borrow_capacity,
        utilization_ratio,
        percentage_score,
        computed_at_secs: now_secs(),
    })
}

fn check_balance(label: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::InvalidBalance { label, value });
    }
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario() {
        // collateral=1000, debt=200, underlying=50
        let s = compute_score(1000.0, 200.0, 50.0).unwrap();
        assert!((s.utilization_ratio - (1.0 - 200.0 / 1050.0)).abs() < 1e-9);
        assert_eq!(s.percentage_score, 80);
        assert!((s.borrow_capacity - 570.0).abs() < 1e-9);
    }

    #[test]
    fn zero_denominator_counts_as_fully_unutilized() {
        let s = compute_score(0.0, 0.0, 0.0).unwrap();
        assert!(s.utilization_ratio.is_finite());
        assert_eq!(s.utilization_ratio, 1.0);
        assert_eq!(s.percentage_score, 100);
    }

    #[test]
    fn debt_with_zero_denominator_still_defined() {
        // No collateral or underlying but outstanding debt: the ratio stays
        // at the defined edge value instead of going non-finite.
        let s = compute_score(0.0, 25.0, 0.0).unwrap();
        assert_eq!(s.utilization_ratio, 1.0);
        assert!((s.borrow_capacity - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn borrow_capacity_may_be_negative() {
        let s = compute_score(100.0, 200.0, 0.0).unwrap();
        assert!((s.borrow_capacity - (100.0 * 0.77 - 200.0)).abs() < 1e-9);
        assert!(s.borrow_capacity < 0.0);
    }

    #[test]
    fn score_is_not_clamped_below_zero() {
        // debt five times the denominator: ratio 1 - 5 = -4
        let s = compute_score(100.0, 500.0, 0.0).unwrap();
        assert!((s.utilization_ratio - (-4.0)).abs() < 1e-9);
        assert_eq!(s.percentage_score, -400);
    }

    #[test]
    fn no_debt_scores_one_hundred() {
        let s = compute_score(1000.0, 0.0, 0.0).unwrap();
        assert_eq!(s.percentage_score, 100);
        assert!((s.borrow_capacity - 770.0).abs() < 1e-9);
    }

    #[test]
    fn score_floors_rather_than_rounds() {
        // 1 - 1/3 = 0.666...; score must floor to 66, not round to 67
        let s = compute_score(3.0, 1.0, 0.0).unwrap();
        assert_eq!(s.percentage_score, 66);
    }

    #[test]
    fn negative_balance_is_rejected() {
        let err = compute_score(-1.0, 0.0, 0.0).unwrap_err();
        match err {
            AppError::InvalidBalance { label, value } => {
                assert_eq!(label, "collateral");
                assert_eq!(value, -1.0);
            }
            other => panic!("expected InvalidBalance, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_balance_is_rejected() {
        assert!(compute_score(1.0, f64::NAN, 0.0).is_err());
        assert!(compute_score(1.0, 0.0, f64::INFINITY).is_err());
    }
}
