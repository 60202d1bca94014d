//! Tail bound `Zᵤ` accounting for the spike outside the periodic square.
//!
//! Two defect quantities of the multiplier `V = DG(U₀)` enter, both as
//! quadratic forms against the exponential kernels of [`super::kernels`]:
//!
//! - the edge defect `CV₀ = |Ω| ⟨V, E * V⟩` (clamped by the gradient estimate
//!   `d ‖Ṽ₁‖₁² / (2a³)`),
//! - the corner defect `I₂ = |Ω| ⟨V, S * V⟩`.

use super::kernels::{edge_kernel, square_kernel, weighted_derivative};
use crate::spectral::convolution::{convolve, convolve_plain};
use crate::spectral::series::SymSeries;
use crate::traits::Scalar;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TailBounds<T> {
    pub edge_defect: T,
    pub corner_defect: T,
    pub zu1: T,
    pub zu2: T,
    pub zu: T,
}

/// `Zᵤ₁`, `Zᵤ₂` and `Zᵤ = √(Zᵤ₁² + Zᵤ₂²)` for the multiplier `v` (order `2N`).
pub fn tail_bounds<T: Scalar>(v: &SymSeries<T>, lambda1: f64) -> TailBounds<T> {
    let d = v.half_width();
    let order = v.order();
    let kernel_order = 2 * order;
    let lambda = T::from_real(lambda1);
    let decay = lambda.sqrt().recip();
    let half = T::from_real(d);
    let area = T::from_real(4.0) * half.sqr();
    let two = T::from_real(2.0);
    let four = T::from_real(4.0);

    let edge = edge_kernel(kernel_order, d, decay);
    let edge_form = area * convolve_plain(v, &edge, order).inner_sym(v);
    let gradient = weighted_derivative(v).norm_l1();
    let fallback = half * gradient.sqr() / (two * decay * decay.sqr());
    let edge_defect = edge_form.max(T::zero()).min(fallback);

    let square = square_kernel(kernel_order, d, decay);
    let corner_defect = (area * v.inner(&convolve(v, &square, order))).max(T::zero());

    let c1 = (T::from_real(8.0) * decay * lambda.sqr()).recip();
    let q = (-(two * decay * half)).exp();
    let images = four + T::from_real(8.0) * ((T::one() - q).sqr().recip() - T::one());

    let zu1 = (two * c1 / decay * edge_defect).sqrt();
    let zu2 = (c1 / (two * decay)).sqrt() * (images * edge_defect.sqrt() + four * corner_defect.sqrt());
    let zu = (zu1.sqr() + zu2.sqr()).sqrt();

    TailBounds {
        edge_defect,
        corner_defect,
        zu1,
        zu2,
        zu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    fn multiplier(order: usize) -> SymSeries<f64> {
        SymSeries::from_fn(order, 4.0, |k1, k2| {
            let r2 = (k1 * k1 + k2 * k2) as f64;
            0.3 * (-0.2 * r2).exp() - if k1 + k2 == 0 { 0.1 } else { 0.0 }
        })
    }

    #[test]
    fn edge_form_agrees_with_line_sum_of_the_square() {
        // ⟨V, E * V⟩ only sees (V * V) on the line k₂ = 0.
        let v = multiplier(4);
        let d = v.half_width();
        let decay = 3.0;
        let edge = edge_kernel(8, d, decay);
        let by_convolution = convolve_plain(&v, &edge, 4).inner_sym(&v);
        let vv = convolve(&v, &v, 8);
        let by_line: f64 = (-8i64..=8)
            .map(|n| vv.coeff(n, 0) * edge.coeff(n, 0))
            .sum();
        assert!((by_convolution - by_line).abs() < 1e-14);
    }

    #[test]
    fn bounds_are_non_negative_and_combine_in_quadrature() {
        let tail = tail_bounds(&multiplier(4), 1.0 / 9.0);
        assert!(tail.edge_defect >= 0.0);
        assert!(tail.corner_defect >= 0.0);
        assert!(tail.zu1 >= 0.0 && tail.zu2 >= 0.0);
        let zu2 = tail.zu.powi(2);
        assert!(zu2 > 0.0);
        assert!((zu2 - tail.zu1.powi(2) - tail.zu2.powi(2)).abs() < 1e-12 * zu2);
    }

    #[test]
    fn vanishing_multiplier_has_no_tail() {
        let tail = tail_bounds(&SymSeries::<f64>::zeros(3, 4.0), 1.0 / 9.0);
        assert_eq!(tail.zu, 0.0);
    }

    #[test]
    fn interval_tail_encloses_float_tail() {
        let v = multiplier(3);
        let float = tail_bounds(&v, 1.0 / 9.0);
        let rigorous = tail_bounds(&v.map(Interval::point), 1.0 / 9.0);
        assert!(rigorous.edge_defect.contains(float.edge_defect));
        assert!(rigorous.corner_defect.contains(float.corner_defect));
        assert!(rigorous.zu.contains(float.zu));
    }
}
