//! Radii polynomial bounds `Y₀`, `Z₁` and `Z₂`.
//!
//! The fixed-point operator is built from `A = L⁻¹B`, where `B` acts as the
//! floating-point matrix `B^N ≈ (I + M_V L⁻¹)⁻¹` on the order-`N` modes and as
//! the identity beyond. With the norm `‖u‖ = ‖Lu‖₂`, every bound reduces to
//! ℓ² quantities in the orbit-weighted coefficient space:
//!
//! ```text
//! Y₀  = 2d √(‖B^N F_N‖² + ‖F_{>N}‖²)
//! Z₁₁ = ‖I − B^N(I + M_V L_N⁻¹)‖           Z₁₂ = ‖B^N M_V^{N←tail} L_tail⁻¹‖
//! Z₁₃ = ‖M_V^{tail←N} L_N⁻¹‖                Z₁₄ = ‖V‖₁ / (1 + λ₁f²(N+1)²)
//! Z₁  = φ(Z₁₁, Z₁₂, Z₁₃, Z₁₄) + max(1, ‖B^N‖) Zᵤ
//! Z₂  = κ max(2, √(‖B^N M_{V₀}‖² + ‖V₀‖₁²)) + 3λ₁κ² max(1, ‖B^N‖) s₀
//! ```
//!
//! with `V = 2U₀ − 3λ₁U₀²`, `V₀ = 2 − 6λ₁U₀` and `κ = 1/(2√(πλ₁))`. The
//! periodic variant uses `κ̂ = a coth(ad)/2` and drops the outer `max(2, ·)`.

use super::tail::{tail_bounds, TailBounds};
use crate::error::ProofError;
use crate::newton::{linearized_multiplier, residual};
use crate::params::ProofConfig;
use crate::spectral::linear_symbol;
use crate::spectral::operator::{IndexSet, Operator};
use crate::spectral::series::SymSeries;
use crate::traits::Scalar;
use anyhow::{anyhow, Result};
use log::info;
use nalgebra::DMatrix;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProofBounds<T> {
    pub y0: T,
    pub z11: T,
    pub z12: T,
    pub z13: T,
    pub z14: T,
    pub phi: T,
    /// Bound on `‖B^N‖`.
    pub inverse_norm: T,
    pub tail: TailBounds<T>,
    pub z1: T,
    pub z2: T,
    pub z2_periodic: T,
}

/// `min(max(A, D) + max(B, C), √(A² + B² + C² + D²))`: two valid bounds on the
/// norm of the block operator `[[A, B], [C, D]]`, the tighter one kept.
pub fn phi<T: Scalar>(a: T, b: T, c: T, d: T) -> T {
    let blockwise = a.max(d) + b.max(c);
    let frobenius = (a.sqr() + b.sqr() + c.sqr() + d.sqr()).sqrt();
    blockwise.min(frobenius)
}

/// Floating-point inverse of `I + M_V L_N⁻¹`, computed at the centre `u0`.
pub fn approximate_inverse(u0: &SymSeries<f64>, lambda1: f64) -> Result<DMatrix<f64>> {
    let set = IndexSet::up_to(u0.order());
    let v = linearized_multiplier(u0, lambda1);
    let f = u0.frequency();
    let linearized = Operator::multiplication(&v, &set, &set)
        .scale_columns(|k1, k2| linear_symbol(lambda1, f, k1, k2).recip())
        .shift(1.0);
    linearized
        .matrix()
        .clone()
        .try_inverse()
        .ok_or_else(|| anyhow!(ProofError::SingularJacobian))
}

/// Every bound of the radii polynomial at the approximate solution `u0`.
///
/// Generic over the scalar: with `Interval` the results are rigorous, with
/// `f64` they are floating-point estimates of the same quantities.
pub fn compute_bounds<T: Scalar>(
    u0: &SymSeries<T>,
    inverse: &DMatrix<f64>,
    config: &ProofConfig,
) -> ProofBounds<T> {
    let order = u0.order();
    let lambda = T::from_real(config.lambda1);
    let f = u0.frequency();
    let one = T::one();
    let two = T::from_real(2.0);
    let three = T::from_real(3.0);
    let s0 = T::from_real(config.trial_radius);
    let inverse_symbol = |k1: usize, k2: usize| linear_symbol(lambda, f, k1, k2).recip();

    let low = IndexSet::up_to(order);
    let tail = IndexSet::band(order, 3 * order);
    let wide = IndexSet::up_to(2 * order);

    let v = linearized_multiplier(u0, lambda);
    let v0 = SymSeries::from_fn(order, u0.half_width(), |k1, k2| {
        let base = if k1 == 0 && k2 == 0 { two } else { T::zero() };
        base - T::from_real(6.0) * lambda * u0.coeff(k1 as i64, k2 as i64)
    });
    let defect = residual(u0, lambda, 3 * order);
    let b = Operator::<T>::from_point_matrix(&low, &low, inverse);

    let head = low.norm_l2(&b.apply(&low.gather(&defect)));
    let rest = tail.norm_l2(&tail.gather(&defect));
    let y0 = T::from_real(2.0 * config.half_width) * (head.sqr() + rest.sqr()).sqrt();

    let linearized = Operator::multiplication(&v, &low, &low)
        .scale_columns(inverse_symbol)
        .shift(one);
    let z11 = Operator::identity(&low)
        .sum(&b.compose(&linearized).negate())
        .norm();
    let z12 = b
        .compose(&Operator::multiplication(&v, &low, &tail).scale_columns(inverse_symbol))
        .norm();
    let z13 = Operator::multiplication(&v, &tail, &low)
        .scale_columns(inverse_symbol)
        .norm();
    let first_tail = T::from_count((order + 1) * (order + 1));
    let z14 = v.norm_l1() / (one + lambda * f.sqr() * first_tail);
    let phi = phi(z11, z12, z13, z14);

    let inverse_norm = b.norm();
    let amplification = one.max(inverse_norm);
    let tail_bounds = tail_bounds(&v, config.lambda1);
    let z1 = phi + amplification * tail_bounds.zu;

    let quadratic = b.compose(&Operator::multiplication(&v0, &low, &wide)).norm();
    let combined = (quadratic.sqr() + v0.norm_l1().sqr()).sqrt();
    let kappa = (two * (T::pi() * lambda).sqrt()).recip();
    let z2 = kappa * two.max(combined) + three * lambda * kappa.sqr() * amplification * s0;

    let decay = lambda.sqrt().recip();
    let q = (-(two * decay * T::from_real(config.half_width))).exp();
    let coth = (one + q) / (one - q);
    let kappa_periodic = decay * coth / two;
    let z2_periodic =
        kappa_periodic * combined + three * lambda * kappa_periodic.sqr() * amplification * s0;

    info!(
        "bounds: Y₀ ≤ {:.4e}, Z₁ ≤ {:.4e} (Z₁₁ {:.2e}, Z₁₂ {:.2e}, Z₁₃ {:.2e}, Z₁₄ {:.2e}), Z₂ ≤ {:.4e}",
        y0.sup(),
        z1.sup(),
        z11.sup(),
        z12.sup(),
        z13.sup(),
        z14.sup(),
        z2.sup()
    );

    ProofBounds {
        y0,
        z11,
        z12,
        z13,
        z14,
        phi,
        inverse_norm,
        tail: tail_bounds,
        z1,
        z2,
        z2_periodic,
    }
}
