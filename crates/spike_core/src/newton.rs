use crate::error::ProofError;
use crate::params::NewtonSettings;
use crate::spectral::convolution::{convolve, square};
use crate::spectral::linear_symbol;
use crate::spectral::operator::{IndexSet, Operator};
use crate::spectral::series::SymSeries;
use crate::traits::Scalar;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// Result of a Newton solve.
#[derive(Debug, Clone)]
pub enum NewtonOutcome {
    /// The sup norm of the residual dropped below the tolerance.
    Converged {
        solution: SymSeries<f64>,
        residual_norm: f64,
        iterations: usize,
    },
    /// The iterate collapsed onto the trivial solution `u = 0`.
    Degenerate {
        iterations: usize,
        solution_norm: f64,
    },
    /// The step budget ran out; the last iterate is returned unverified.
    Stalled {
        solution: SymSeries<f64>,
        residual_norm: f64,
        iterations: usize,
    },
}

impl NewtonOutcome {
    /// The converged series, or the matching [`ProofError`].
    pub fn into_solution(self) -> Result<(SymSeries<f64>, f64, usize), ProofError> {
        match self {
            NewtonOutcome::Converged {
                solution,
                residual_norm,
                iterations,
            } => Ok((solution, residual_norm, iterations)),
            NewtonOutcome::Degenerate { solution_norm, .. } => {
                Err(ProofError::Degenerate { norm: solution_norm })
            }
            NewtonOutcome::Stalled {
                residual_norm,
                iterations,
                ..
            } => Err(ProofError::NotConverged {
                residual: residual_norm,
                iterations,
            }),
        }
    }
}

/// `λ₁ΔU − U + U² − λ₁U³`, projected to `order`.
///
/// The square is kept exactly (order `2N`) before forming the cube, so for
/// `order ≥ 3N` the result is the full image of the truncated series.
pub fn residual<T: Scalar>(u: &SymSeries<T>, lambda1: T, order: usize) -> SymSeries<T> {
    let lap = u.laplacian();
    let u2 = square(u);
    let u3 = convolve(u, &u2, order);
    SymSeries::from_fn(order, u.half_width(), |k1, k2| {
        let (a, b) = (k1 as i64, k2 as i64);
        lambda1 * lap.coeff(a, b) - u.coeff(a, b) + u2.coeff(a, b) - lambda1 * u3.coeff(a, b)
    })
}

/// `DG(U) = 2U − 3λ₁U²`, the multiplier of the linearised nonlinearity.
pub fn linearized_multiplier<T: Scalar>(u: &SymSeries<T>, lambda1: T) -> SymSeries<T> {
    let u2 = square(u);
    let two = T::from_real(2.0);
    let three = T::from_real(3.0);
    SymSeries::from_fn(u2.order(), u.half_width(), |k1, k2| {
        let (a, b) = (k1 as i64, k2 as i64);
        two * u.coeff(a, b) - three * lambda1 * u2.coeff(a, b)
    })
}

/// Truncated Jacobian `diag(L_N) + M_W` on the order-`N` space.
pub fn jacobian(u: &SymSeries<f64>, lambda1: f64) -> DMatrix<f64> {
    let set = IndexSet::up_to(u.order());
    let weight = linearized_multiplier(u, lambda1);
    let f = u.frequency();
    let mut matrix = Operator::multiplication(&weight, &set, &set).matrix().clone();
    for (i, &(k1, k2)) in set.pairs().iter().enumerate() {
        matrix[(i, i)] += linear_symbol(lambda1, f, k1, k2);
    }
    matrix
}

/// Newton iteration on `π^N F(U) = 0` in floating point.
///
/// Non-convergence and collapse onto zero are reported as outcomes, not
/// errors; invalid settings and singular Jacobians are errors.
pub fn solve_spike(
    initial_guess: &SymSeries<f64>,
    lambda1: f64,
    settings: NewtonSettings,
) -> Result<NewtonOutcome> {
    if settings.max_steps == 0 {
        bail!("max_steps must be greater than zero.");
    }
    if settings.damping <= 0.0 {
        bail!("damping must be positive.");
    }
    if settings.tolerance <= 0.0 {
        bail!("tolerance must be positive.");
    }
    if !(lambda1 > 0.0) {
        bail!("lambda1 must be positive.");
    }

    let order = initial_guess.order();
    let mut state = initial_guess.clone();
    let mut iterations = 0usize;

    loop {
        let res = residual(&state, lambda1, order);
        let residual_norm = res.norm_sup();
        let solution_norm = state.norm_sup();
        debug!("newton step {iterations}: ‖F‖∞ = {residual_norm:.3e}, ‖U‖∞ = {solution_norm:.3e}");

        if solution_norm < settings.degeneracy_threshold {
            warn!("Newton iterate collapsed to zero after {iterations} steps.");
            return Ok(NewtonOutcome::Degenerate {
                iterations,
                solution_norm,
            });
        }
        if residual_norm < settings.tolerance {
            return Ok(NewtonOutcome::Converged {
                solution: state,
                residual_norm,
                iterations,
            });
        }
        if iterations >= settings.max_steps {
            warn!(
                "Newton solver stopped after {} steps (‖F‖∞ = {residual_norm:e}).",
                settings.max_steps
            );
            return Ok(NewtonOutcome::Stalled {
                solution: state,
                residual_norm,
                iterations,
            });
        }

        let rhs = DVector::from_iterator(res.coeffs().len(), res.coeffs().iter().map(|v| -v));
        let delta = solve_linear_system(jacobian(&state, lambda1), rhs)
            .context("Failed to solve linear system during Newton iteration.")?;
        for (coeff, step) in state.coeffs_mut().iter_mut().zip(delta.iter()) {
            *coeff += settings.damping * step;
        }
        iterations += 1;
    }
}

fn solve_linear_system(matrix: DMatrix<f64>, rhs: DVector<f64>) -> Result<DVector<f64>> {
    matrix
        .lu()
        .solve(&rhs)
        .ok_or_else(|| anyhow!(ProofError::SingularJacobian))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::initial_guess;
    use crate::params::ProofConfig;

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn rejects_invalid_settings() {
        let guess = SymSeries::zeros(2, 1.0);
        let settings = NewtonSettings {
            max_steps: 0,
            ..NewtonSettings::default()
        };
        assert_err_contains(solve_spike(&guess, 0.1, settings), "max_steps");

        let settings = NewtonSettings {
            damping: 0.0,
            ..NewtonSettings::default()
        };
        assert_err_contains(solve_spike(&guess, 0.1, settings), "damping");

        assert_err_contains(
            solve_spike(&guess, -1.0, NewtonSettings::default()),
            "lambda1",
        );
    }

    #[test]
    fn zero_guess_is_reported_as_degenerate() {
        let guess = SymSeries::zeros(4, 4.0);
        let outcome = solve_spike(&guess, 1.0 / 9.0, NewtonSettings::default())
            .expect("solve should run");
        assert!(matches!(
            outcome,
            NewtonOutcome::Degenerate { iterations: 0, .. }
        ));
        assert!(matches!(
            outcome.into_solution(),
            Err(ProofError::Degenerate { .. })
        ));
    }

    #[test]
    fn residual_vanishes_on_constant_root() {
        // Constant roots of −u + u² − λ₁u³ solve λ₁u² − u + 1 = 0.
        let lambda1 = 0.2;
        let root = (1.0 - (1.0f64 - 4.0 * lambda1).sqrt()) / (2.0 * lambda1);
        let u = SymSeries::from_fn(3, 2.0, |k1, k2| if k1 == 0 && k2 == 0 { root } else { 0.0 });
        let res = residual(&u, lambda1, 9);
        assert!(res.norm_sup() < 1e-14);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let lambda1 = 1.0 / 9.0;
        let u = SymSeries::from_fn(3, 4.0, |k1, k2| 0.05 / (1.0 + (k1 + k2) as f64));
        let jac = jacobian(&u, lambda1);
        let h = 1e-5;
        for column in 0..u.coeffs().len() {
            let mut forward = u.clone();
            forward.coeffs_mut()[column] += h;
            let mut backward = u.clone();
            backward.coeffs_mut()[column] -= h;
            let plus = residual(&forward, lambda1, 3);
            let minus = residual(&backward, lambda1, 3);
            for row in 0..u.coeffs().len() {
                let fd = (plus.coeffs()[row] - minus.coeffs()[row]) / (2.0 * h);
                assert!(
                    (fd - jac[(row, column)]).abs() < 1e-5,
                    "entry ({row}, {column}): {fd} vs {}",
                    jac[(row, column)]
                );
            }
        }
    }

    #[test]
    fn converges_from_the_spike_profile() {
        let config = ProofConfig {
            order: 10,
            ..ProofConfig::default()
        };
        let guess = initial_guess(&config).expect("bootstrap should compute");
        let outcome = solve_spike(&guess, config.lambda1, config.newton).expect("solve should run");
        let (solution, residual_norm, iterations) =
            outcome.into_solution().expect("Newton should converge");
        assert!(residual_norm < 1e-14);
        assert!(iterations <= 30);
        assert!((solution.evaluate(0.0, 0.0) - 2.813503).abs() < 1e-4);
    }
}
