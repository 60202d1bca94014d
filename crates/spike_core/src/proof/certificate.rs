//! Radii polynomial check.
//!
//! With bounds `Y₀, Z₁, Z₂` and trial radius `s₀`, the fixed-point map is a
//! contraction on the ball of radius `s₀` when `Z₁ + Z₂ s₀ < 1` and
//! `p(s₀) = ½Z₂s₀² − (1 − Z₁)s₀ + Y₀ < 0`. Decisions use the upper ends of the
//! enclosures, so a success holds for every value they contain.

use crate::traits::Scalar;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    /// `Z₁ > 1`.
    ZOneTooLarge,
    /// `Z₁ ≤ 1` but `Z₁ + Z₂s₀ ≥ 1`.
    NonContractive,
    /// `p(s₀) ≥ 0`.
    Discriminant,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::ZOneTooLarge => "Z₁ too large",
            FailureReason::NonContractive => "linear term non-contractive",
            FailureReason::Discriminant => "2Y₀Z₂ ≥ (1−Z₁)²",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Verdict {
    /// A unique solution exists within `trial_radius`; `[s_min, s_max]` is an
    /// inner enclosure of the admissible radii.
    Success {
        trial_radius: f64,
        s_min: f64,
        s_max: f64,
    },
    Failure(FailureReason),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success {
                trial_radius,
                s_min,
                s_max,
            } => write!(
                f,
                "proof successful for s₀ = {trial_radius:e} (radii in [{s_min:.6e}, {s_max:.6e}])"
            ),
            Verdict::Failure(reason) => write!(f, "proof failed: {reason}"),
        }
    }
}

pub fn check_certificate<T: Scalar>(y0: T, z1: T, z2: T, trial_radius: f64) -> Verdict {
    let one = T::one();
    let s0 = T::from_real(trial_radius);

    if (z1 + z2 * s0).sup() >= 1.0 {
        return if z1.sup() > 1.0 {
            Verdict::Failure(FailureReason::ZOneTooLarge)
        } else {
            Verdict::Failure(FailureReason::NonContractive)
        };
    }

    let half = T::from_real(0.5);
    let margin = one - z1;
    let p = half * z2 * s0.sqr() - margin * s0 + y0;
    if !(p.sup() < 0.0) {
        return Verdict::Failure(FailureReason::Discriminant);
    }

    // p(s₀) < 0 places s₀ strictly between the two roots.
    let two = T::from_real(2.0);
    let root = (margin.sqr() - two * y0 * z2).max(T::zero()).sqrt();
    let small = two * y0 / (margin + root);
    let s_min = small.sup().min(trial_radius);
    let s_max = if z2.sup() <= 0.0 {
        f64::INFINITY
    } else {
        ((margin + root) / z2).inf().max(trial_radius)
    };
    Verdict::Success {
        trial_radius,
        s_min,
        s_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    #[test]
    fn succeeds_with_comfortable_margins() {
        let verdict = check_certificate(2.8e-4, 0.13, 5.8, 5e-4);
        match verdict {
            Verdict::Success { s_min, s_max, .. } => {
                assert!(s_min > 0.0 && s_min < 5e-4);
                assert!(s_max > 5e-4);
                // Roots of ½Z₂s² − (1 − Z₁)s + Y₀.
                let small = (0.87 - (0.87f64.powi(2) - 2.0 * 2.8e-4 * 5.8).sqrt()) / 5.8;
                assert!((s_min - small).abs() < 1e-12);
            }
            other => panic!("expected success, got {other}"),
        }
    }

    #[test]
    fn reports_each_failure_branch() {
        assert_eq!(
            check_certificate(1e-6, 1.2, 1.0, 1e-3),
            Verdict::Failure(FailureReason::ZOneTooLarge)
        );
        assert_eq!(
            check_certificate(1e-6, 0.9, 300.0, 5e-4),
            Verdict::Failure(FailureReason::NonContractive)
        );
        assert_eq!(
            check_certificate(1e-3, 0.5, 10.0, 5e-4),
            Verdict::Failure(FailureReason::Discriminant)
        );
        assert_eq!(
            FailureReason::Discriminant.to_string(),
            "2Y₀Z₂ ≥ (1−Z₁)²"
        );
    }

    #[test]
    fn contraction_is_monotone_in_trial_radius() {
        let (y0, z1, z2) = (1e-4, 0.4, 20.0);
        let mut contractive = true;
        for step in 1..200 {
            let s0 = step as f64 * 5e-4;
            let verdict = check_certificate(y0, z1, z2, s0);
            let now = !matches!(
                verdict,
                Verdict::Failure(FailureReason::NonContractive | FailureReason::ZOneTooLarge)
            );
            assert!(contractive || !now, "feasibility regained at s₀ = {s0}");
            contractive = now;
        }
        assert!(!contractive);
    }

    #[test]
    fn zero_quadratic_term_gives_unbounded_radius() {
        match check_certificate(1e-4, 0.5, 0.0, 1e-3) {
            Verdict::Success { s_min, s_max, .. } => {
                assert!((s_min - 2e-4).abs() < 1e-15);
                assert_eq!(s_max, f64::INFINITY);
            }
            other => panic!("expected success, got {other}"),
        }
    }

    #[test]
    fn interval_decision_uses_upper_ends() {
        // The lower end of Y₀ would pass, the upper end does not.
        let y0 = Interval::new(1e-4, 1e-3);
        let verdict = check_certificate(y0, Interval::point(0.5), Interval::point(10.0), 5e-4);
        assert_eq!(verdict, Verdict::Failure(FailureReason::Discriminant));
    }
}
