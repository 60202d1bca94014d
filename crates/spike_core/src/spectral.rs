//! Symmetry-reduced spectral space: layouts, series, convolutions and operators.

pub mod convolution;
pub mod layout;
pub mod operator;
pub mod series;

use crate::traits::Scalar;

/// Symbol `L_k = −(1 + λ₁ f² |k|²)` of the linear part `λ₁Δ − I`.
pub fn linear_symbol<T: Scalar>(lambda1: T, frequency: T, k1: usize, k2: usize) -> T {
    -(T::one() + lambda1 * frequency.sqr() * T::from_count(k1 * k1 + k2 * k2))
}
