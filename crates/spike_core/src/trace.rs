//! Boundary trace and the zero-trace compatibility projection.
//!
//! The trace operator `𝒯` maps a symmetric series to the cosine coefficients of
//! its restriction to the edge `x₁ = d`. Admissible approximate solutions have
//! vanishing trace; the projection
//!
//! ```text
//! U ← U − L⁻¹𝒯ᵀ(𝒯L⁻¹𝒯ᵀ)⁻¹𝒯U
//! ```
//!
//! removes the offending component along the range of `L⁻¹𝒯ᵀ`.

use crate::error::ProofError;
use crate::interval::Interval;
use crate::spectral::layout::{canonical, multiplicity, D4Layout};
use crate::spectral::linear_symbol;
use crate::spectral::series::SymSeries;
use crate::traits::Scalar;
use anyhow::{anyhow, Result};
use log::debug;
use nalgebra::{DMatrix, DVector};
use num_traits::{One, Zero};

/// `𝒯` as an `(N+1) × dim` matrix: row `n` collects `(−1)^{k₁} α(k₁, n)` at the
/// canonical slot of every `(k₁, n)`, `k₁ = 0..=N`.
pub fn trace_operator<T: Scalar>(order: usize) -> DMatrix<T> {
    let layout = D4Layout::new(order);
    let mut matrix = DMatrix::from_element(order + 1, layout.dim(), T::zero());
    for n in 0..=order {
        for k1 in 0..=order {
            let (c1, c2) = canonical(k1 as i64, n as i64);
            let Some(column) = layout.offset(c1, c2) else {
                continue;
            };
            let weight = T::from_count(multiplicity(k1, n));
            if k1 % 2 == 0 {
                matrix[(n, column)] += weight;
            } else {
                matrix[(n, column)] -= weight;
            }
        }
    }
    matrix
}

fn inverse_symbol<T: Scalar>(order: usize, half_width: f64, lambda1: T) -> Vec<T> {
    let f = T::pi() / T::from_real(half_width);
    D4Layout::new(order)
        .pairs()
        .map(|(k1, k2)| linear_symbol(lambda1, f, k1, k2).recip())
        .collect()
}

/// `G = 𝒯 L⁻¹ 𝒯ᵀ`.
fn trace_gram<T: Scalar>(trace: &DMatrix<T>, inverse: &[T]) -> DMatrix<T> {
    let rows = trace.nrows();
    DMatrix::from_fn(rows, rows, |r, s| {
        inverse
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (j, &l)| acc + trace[(r, j)] * l * trace[(s, j)])
    })
}

fn apply<T: Scalar>(matrix: &DMatrix<T>, input: &[T]) -> Vec<T> {
    (0..matrix.nrows())
        .map(|r| {
            input
                .iter()
                .enumerate()
                .fold(T::zero(), |acc, (j, &x)| acc + matrix[(r, j)] * x)
        })
        .collect()
}

/// `U − L⁻¹𝒯ᵀz`.
fn subtract_correction<T: Scalar>(
    u: &SymSeries<T>,
    trace: &DMatrix<T>,
    inverse: &[T],
    z: &[T],
) -> SymSeries<T> {
    let mut out = u.clone();
    for (j, coeff) in out.coeffs_mut().iter_mut().enumerate() {
        let back = z
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (r, &zr)| acc + trace[(r, j)] * zr);
        *coeff -= inverse[j] * back;
    }
    out
}

/// Floating-point compatibility projection.
pub fn project_zero_trace(u: &SymSeries<f64>, lambda1: f64) -> Result<SymSeries<f64>> {
    let order = u.order();
    let trace = trace_operator::<f64>(order);
    let inverse = inverse_symbol(order, u.half_width(), lambda1);
    let gram = trace_gram(&trace, &inverse);
    let z = solve_gram(gram, apply(&trace, u.coeffs()))?;
    Ok(subtract_correction(u, &trace, &inverse, z.as_slice()))
}

fn solve_gram(gram: DMatrix<f64>, rhs: Vec<f64>) -> Result<DVector<f64>> {
    gram.lu()
        .solve(&DVector::from_vec(rhs))
        .ok_or_else(|| anyhow!(ProofError::SingularTraceSystem))
}

/// Rigorous compatibility projection.
///
/// The small system `G z = 𝒯U` is solved with a floating-point inverse `R` of
/// `mid(G)`; with `δ = ‖I − RG‖∞ < 1` the exact solution lies within
/// `δ ‖R𝒯U‖∞ / (1 − δ)` of `R𝒯U` in every component. The returned series
/// encloses the exact projection of every member of `u`.
pub fn enclose_zero_trace(u: &SymSeries<Interval>, lambda1: f64) -> Result<SymSeries<Interval>> {
    let order = u.order();
    let trace = trace_operator::<Interval>(order);
    let inverse = inverse_symbol(order, u.half_width(), Interval::point(lambda1));
    let gram = trace_gram(&trace, &inverse);
    let z = enclose_gram_solution(&gram, &apply(&trace, u.coeffs()))?;
    Ok(subtract_correction(u, &trace, &inverse, &z))
}

/// Enclosure of the solutions of `G z = t` for every `G` and `t` in the given
/// interval data.
fn enclose_gram_solution(gram: &DMatrix<Interval>, rhs: &[Interval]) -> Result<Vec<Interval>> {
    let approx = gram
        .map(|v| v.mid())
        .try_inverse()
        .ok_or_else(|| anyhow!(ProofError::SingularTraceSystem))?;
    let approx = approx.map(Interval::point);

    let size = gram.nrows();
    let mut contraction = Interval::zero();
    for r in 0..size {
        let mut row = Interval::zero();
        for s in 0..size {
            let product = (0..size).fold(Interval::zero(), |acc, k| {
                acc + approx[(r, k)] * gram[(k, s)]
            });
            let identity = if r == s {
                Interval::one()
            } else {
                Interval::zero()
            };
            row += Scalar::abs(identity - product);
        }
        contraction = Scalar::max(contraction, row);
    }
    if !(contraction.sup() < 1.0) {
        return Err(anyhow!(ProofError::TraceEnclosure {
            contraction: contraction.sup(),
        }));
    }

    let centre = apply(&approx, rhs);
    let spread = contraction * sup_of(&centre) / (Interval::one() - contraction);
    let radius = spread.sup();
    debug!(
        "trace enclosure: ‖I − RG‖∞ ≤ {:.3e}, correction radius {radius:.3e}",
        contraction.sup()
    );
    Ok(centre
        .iter()
        .map(|c| *c + Interval::new(-radius, radius))
        .collect())
}

fn sup_of(values: &[Interval]) -> Interval {
    values
        .iter()
        .fold(Interval::zero(), |acc, &v| Scalar::max(acc, Scalar::abs(v)))
}
