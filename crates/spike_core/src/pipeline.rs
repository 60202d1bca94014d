//! One complete proof run.
//!
//! The floating-point stage (bootstrap, Newton, compatibility projection and the
//! approximate inverse) only produces a candidate; everything after
//! [`enclose_zero_trace`] is interval arithmetic.

use crate::bootstrap::initial_guess;
use crate::interval::Interval;
use crate::newton::solve_spike;
use crate::params::ProofConfig;
use crate::proof::bounds::{approximate_inverse, compute_bounds, ProofBounds};
use crate::proof::certificate::{check_certificate, Verdict};
use crate::spectral::series::SymSeries;
use crate::trace::{enclose_zero_trace, project_zero_trace};
use crate::traits::Scalar;
use anyhow::{Context, Result};
use log::info;
use nalgebra::DMatrix;
use serde::Serialize;
use std::fmt;

/// Approximate solution with vanishing trace.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Floating-point projection of the Newton solution.
    pub centre: SymSeries<f64>,
    /// Enclosure of the exact projection of the Newton solution.
    pub enclosure: SymSeries<Interval>,
    pub newton_residual: f64,
    pub newton_iterations: usize,
}

impl Candidate {
    pub fn midpoint(&self) -> SymSeries<f64> {
        self.enclosure.map(|c| c.mid())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProofReport {
    pub order: usize,
    pub half_width: f64,
    pub lambda1: f64,
    pub trial_radius: f64,
    pub newton_iterations: usize,
    pub newton_residual: f64,
    /// `u(0, 0)` of the candidate.
    pub peak: f64,
    pub bounds: ProofBounds<Interval>,
    pub finite: Verdict,
    pub periodic: Verdict,
}

impl ProofReport {
    pub fn is_success(&self) -> bool {
        self.finite.is_success() && self.periodic.is_success()
    }
}

impl fmt::Display for ProofReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bounds;
        writeln!(
            f,
            "N = {}, d = {}, λ₁ = {:.6}, s₀ = {:e}",
            self.order, self.half_width, self.lambda1, self.trial_radius
        )?;
        writeln!(
            f,
            "Newton: {} steps, ‖F‖∞ = {:.3e}, u(0) = {:.8}",
            self.newton_iterations, self.newton_residual, self.peak
        )?;
        writeln!(f, "Y₀  = {:.6e}", b.y0.sup())?;
        writeln!(f, "Z₂  = {:.6e}", b.z2.sup())?;
        writeln!(f, "Ẑ₂  = {:.6e}", b.z2_periodic.sup())?;
        writeln!(f, "Zᵤ₂ = {:.6e}", b.tail.zu2.sup())?;
        writeln!(f, "Zᵤ  = {:.6e}", b.tail.zu.sup())?;
        writeln!(f, "Z₁  = {:.6e}", b.z1.sup())?;
        writeln!(f, "finite domain: {}", self.finite)?;
        write!(f, "periodic extension: {}", self.periodic)
    }
}

/// Bootstrap, Newton solve and compatibility projection.
pub fn approximate_solution(config: &ProofConfig) -> Result<Candidate> {
    config.validate()?;
    let guess = initial_guess(config).context("Failed to bootstrap the initial guess.")?;
    let (solution, newton_residual, newton_iterations) =
        solve_spike(&guess, config.lambda1, config.newton)?.into_solution()?;
    info!(
        "Newton converged in {newton_iterations} steps (‖F‖∞ = {newton_residual:.3e}), u(0) = {:.8}",
        solution.evaluate(0.0, 0.0)
    );

    let centre = project_zero_trace(&solution, config.lambda1)
        .context("Failed to project the Newton solution onto zero trace.")?;
    let enclosure = enclose_zero_trace(&solution.map(Interval::point), config.lambda1)
        .context("Failed to enclose the zero-trace projection.")?;
    Ok(Candidate {
        centre,
        enclosure,
        newton_residual,
        newton_iterations,
    })
}

/// The bound pipeline evaluated in floating point at the candidate's midpoint.
pub fn shadow_bounds(
    candidate: &Candidate,
    inverse: &DMatrix<f64>,
    config: &ProofConfig,
) -> ProofBounds<f64> {
    compute_bounds(&candidate.midpoint(), inverse, config)
}

pub fn run_proof(config: &ProofConfig) -> Result<ProofReport> {
    let candidate = approximate_solution(config)?;
    let inverse = approximate_inverse(&candidate.midpoint(), config.lambda1)
        .context("Failed to build the approximate inverse.")?;
    let bounds = compute_bounds(&candidate.enclosure, &inverse, config);

    let finite = check_certificate(bounds.y0, bounds.z1, bounds.z2, config.trial_radius);
    let periodic = check_certificate(bounds.y0, bounds.z1, bounds.z2_periodic, config.trial_radius);
    info!("finite domain: {finite}");
    info!("periodic extension: {periodic}");

    Ok(ProofReport {
        order: config.order,
        half_width: config.half_width,
        lambda1: config.lambda1,
        trial_radius: config.trial_radius,
        newton_iterations: candidate.newton_iterations,
        newton_residual: candidate.newton_residual,
        peak: candidate.centre.evaluate(0.0, 0.0),
        bounds,
        finite,
        periodic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err:#}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    fn assert_encloses(name: &str, rigorous: Interval, float: f64) {
        assert!(
            rigorous.contains(float),
            "{name}: {rigorous} does not contain {float:e}"
        );
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = ProofConfig {
            lambda1: 0.2,
            ..ProofConfig::default()
        };
        assert_err_contains(run_proof(&config), "lambda1 * gamma = 1");
    }

    #[test]
    fn stalled_newton_is_fatal() {
        let mut config = ProofConfig {
            order: 6,
            ..ProofConfig::default()
        };
        config.newton.max_steps = 1;
        assert_err_contains(approximate_solution(&config), "did not reach tolerance");
    }

    #[test]
    fn interval_bounds_enclose_floating_point_shadow() {
        for (order, half_width) in [(8, 3.0), (10, 4.0), (12, 4.0), (14, 5.0)] {
            let config = ProofConfig {
                order,
                half_width,
                ..ProofConfig::default()
            };
            let candidate = approximate_solution(&config).expect("candidate should compute");
            let inverse = approximate_inverse(&candidate.midpoint(), config.lambda1)
                .expect("inverse should compute");
            let rigorous = compute_bounds(&candidate.enclosure, &inverse, &config);
            let float = shadow_bounds(&candidate, &inverse, &config);

            let at = |name: &str| format!("{name} (N = {order}, d = {half_width})");
            assert_encloses(&at("Y₀"), rigorous.y0, float.y0);
            assert_encloses(&at("Z₁₁"), rigorous.z11, float.z11);
            assert_encloses(&at("Z₁₂"), rigorous.z12, float.z12);
            assert_encloses(&at("Z₁₃"), rigorous.z13, float.z13);
            assert_encloses(&at("Z₁₄"), rigorous.z14, float.z14);
            assert_encloses(&at("‖B‖"), rigorous.inverse_norm, float.inverse_norm);
            assert_encloses(&at("Zᵤ₁"), rigorous.tail.zu1, float.tail.zu1);
            assert_encloses(&at("Zᵤ₂"), rigorous.tail.zu2, float.tail.zu2);
            assert_encloses(&at("Zᵤ"), rigorous.tail.zu, float.tail.zu);
            assert_encloses(&at("Z₁"), rigorous.z1, float.z1);
            assert_encloses(&at("Z₂"), rigorous.z2, float.z2);
            assert_encloses(&at("Ẑ₂"), rigorous.z2_periodic, float.z2_periodic);

            // The enclosures stay tight.
            assert!(rigorous.y0.sup() - rigorous.y0.inf() < 1e-3 * rigorous.y0.sup());
            assert!(rigorous.z1.sup() - rigorous.z1.inf() < 1e-3 * rigorous.z1.sup());
        }
    }

    #[test]
    fn candidate_has_zero_trace() {
        let config = ProofConfig {
            order: 10,
            ..ProofConfig::default()
        };
        let candidate = approximate_solution(&config).expect("candidate should compute");
        for g in candidate.enclosure.boundary_trace() {
            assert!(g.contains(0.0));
        }
        for g in candidate.centre.boundary_trace() {
            assert!(g.abs() < 1e-15);
        }
    }

    #[test]
    fn default_parameters_prove_both_variants() {
        let config = ProofConfig::default();
        let report = run_proof(&config).expect("proof should run");

        assert!(report.newton_iterations <= 30);
        assert!(report.newton_residual < 1e-14);
        let b = &report.bounds;
        assert!(b.z1.sup() < 1.0);
        let margin = 1.0 - b.z1.sup();
        assert!(2.0 * b.y0.sup() * b.z2.sup() < margin * margin);

        for verdict in [report.finite, report.periodic] {
            match verdict {
                Verdict::Success {
                    trial_radius,
                    s_min,
                    s_max,
                } => {
                    assert_eq!(trial_radius, config.trial_radius);
                    assert!(s_min <= trial_radius && trial_radius <= s_max);
                    assert!(s_max > 0.0);
                }
                Verdict::Failure(reason) => panic!("proof failed: {reason}\n{report}"),
            }
        }
        assert!(report.is_success());
        assert!(report.to_string().contains("proof successful"));
    }
}
