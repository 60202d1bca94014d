//! Fourier coefficients of the exponential boundary kernels.
//!
//! Both kernels are built from `e^{−bd} cosh(b x)` on `(−d, d)`, whose
//! exponential Fourier coefficients have the closed form
//!
//! ```text
//! c_n(b) = (−1)^n b (1 − e^{−2bd}) / (2d (b² + (n f)²))
//! ```
//!
//! The closed form is evaluated directly in the scalar type, so with
//! [`crate::interval::Interval`] every coefficient is a rigorous enclosure
//! (outward-rounded `exp` and `π`).

use crate::spectral::series::{PlainSeries, SymSeries};
use crate::traits::Scalar;

/// `c_n(b)` on the square of half-width `d`.
pub fn cosh_coefficient<T: Scalar>(rate: T, half_width: f64, n: usize) -> T {
    let d = T::from_real(half_width);
    let f = T::pi() / d;
    let two = T::from_real(2.0);
    let wave = f * T::from_count(n);
    let value = rate * (T::one() - (-(two * rate * d)).exp()) / (two * d * (rate.sqr() + wave.sqr()));
    if n % 2 == 0 {
        value
    } else {
        -value
    }
}

/// Edge kernel: `c_{k₁}(2a)` on the line `k₂ = 0`, zero elsewhere.
pub fn edge_kernel<T: Scalar>(order: usize, half_width: f64, decay: T) -> PlainSeries<T> {
    let rate = T::from_real(2.0) * decay;
    PlainSeries::from_fn(order, half_width, |k1, k2| {
        if k2 == 0 {
            cosh_coefficient(rate, half_width, k1)
        } else {
            T::zero()
        }
    })
}

/// Square kernel: `c_{k₁}(a) c_{k₂}(a)`.
pub fn square_kernel<T: Scalar>(order: usize, half_width: f64, decay: T) -> SymSeries<T> {
    let line: Vec<T> = (0..=order)
        .map(|n| cosh_coefficient(decay, half_width, n))
        .collect();
    SymSeries::from_fn(order, half_width, |k1, k2| line[k1] * line[k2])
}

/// `Ṽ₁`: each coefficient scaled by `|k₁| f`, the symbol of `∂₁` up to a phase.
pub fn weighted_derivative<T: Scalar>(v: &SymSeries<T>) -> PlainSeries<T> {
    let f = v.frequency();
    PlainSeries::from_fn(v.order(), v.half_width(), |k1, k2| {
        f * T::from_count(k1) * v.coeff(k1 as i64, k2 as i64)
    })
}
