//! Truncated discrete convolutions in symmetry-reduced coordinates.
//!
//! The product of two functions has Fourier coefficients `(a * b)_i = Σ_j a_j b_{i−j}`
//! over `j ∈ Z²`. Both operands vanish beyond their stored orders, so for each
//! target the source offsets are clipped per coordinate to the window where both
//! lookups can be non-zero.

use super::series::{PlainSeries, SymSeries};
use crate::traits::Scalar;

/// Range of `j` with `|j| ≤ oa` and `|i − j| ≤ ob`.
fn window(i: i64, oa: i64, ob: i64) -> std::ops::RangeInclusive<i64> {
    (-oa).max(i - ob)..=oa.min(i + ob)
}

/// Symmetric × symmetric → symmetric, truncated to `order`.
pub fn convolve<T: Scalar>(a: &SymSeries<T>, b: &SymSeries<T>, order: usize) -> SymSeries<T> {
    let oa = a.order() as i64;
    let ob = b.order() as i64;
    SymSeries::from_fn(order, a.half_width(), |k1, k2| {
        let (i1, i2) = (k1 as i64, k2 as i64);
        let mut acc = T::zero();
        for j1 in window(i1, oa, ob) {
            for j2 in window(i2, oa, ob) {
                acc += a.coeff(j1, j2) * b.coeff(i1 - j1, i2 - j2);
            }
        }
        acc
    })
}

/// Symmetric × doubly-even → doubly-even, truncated to `order`.
///
/// The output keeps both triangles since the second factor need not be
/// symmetric under swapping the indices.
pub fn convolve_plain<T: Scalar>(
    a: &SymSeries<T>,
    b: &PlainSeries<T>,
    order: usize,
) -> PlainSeries<T> {
    let oa = a.order() as i64;
    let ob = b.order() as i64;
    PlainSeries::from_fn(order, a.half_width(), |k1, k2| {
        let (i1, i2) = (k1 as i64, k2 as i64);
        let mut acc = T::zero();
        for j1 in window(i1, oa, ob) {
            for j2 in window(i2, oa, ob) {
                acc += a.coeff(j1, j2) * b.coeff(i1 - j1, i2 - j2);
            }
        }
        acc
    })
}

/// `a * a`, kept exactly (order `2 oa` by default).
pub fn square<T: Scalar>(a: &SymSeries<T>) -> SymSeries<T> {
    convolve(a, a, 2 * a.order())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use std::collections::HashMap;

    fn sample(order: usize, seed: f64) -> SymSeries<f64> {
        SymSeries::from_fn(order, 2.0, |k1, k2| {
            ((k1 as f64 + seed) * 0.7 + (k2 as f64) * 1.3).sin() / (1.0 + (k1 + k2) as f64)
        })
    }

    fn brute_force(a: &SymSeries<f64>, b: &SymSeries<f64>) -> HashMap<(i64, i64), f64> {
        let oa = a.order() as i64;
        let ob = b.order() as i64;
        let mut out = HashMap::new();
        for j1 in -oa..=oa {
            for j2 in -oa..=oa {
                for m1 in -ob..=ob {
                    for m2 in -ob..=ob {
                        *out.entry((j1 + m1, j2 + m2)).or_insert(0.0) +=
                            a.coeff(j1, j2) * b.coeff(m1, m2);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn untruncated_convolution_matches_brute_force() {
        let a = sample(3, 0.1);
        let b = sample(4, 0.9);
        let exact = brute_force(&a, &b);
        let folded = convolve(&a, &b, 7);
        for ((k1, k2), value) in folded.pairs() {
            let expected = exact.get(&(k1 as i64, k2 as i64)).copied().unwrap_or(0.0);
            assert!((value - expected).abs() < 1e-13, "mismatch at ({k1}, {k2})");
        }
        // Nothing lives beyond order oa + ob.
        assert!(exact.keys().all(|&(i1, i2)| i1.abs() <= 7 && i2.abs() <= 7));
    }

    #[test]
    fn truncated_convolution_is_restriction_of_exact_one() {
        let a = sample(4, 0.3);
        let exact = convolve(&a, &a, 8);
        let truncated = convolve(&a, &a, 5);
        for ((k1, k2), value) in truncated.pairs() {
            assert!((value - exact.coeff(k1 as i64, k2 as i64)).abs() < 1e-14);
        }
    }

    #[test]
    fn convolution_is_symmetric_under_swap() {
        let a = sample(3, 0.2);
        let b = sample(5, 1.7);
        let ab = convolve(&a, &b, 8);
        let ba = convolve(&b, &a, 8);
        for (x, y) in ab.coeffs().iter().zip(ba.coeffs()) {
            assert!((x - y).abs() < 1e-13);
        }
    }

    #[test]
    fn plain_convolution_agrees_on_symmetric_input() {
        let a = sample(3, 0.4);
        let b = sample(2, 1.1);
        let sym = convolve(&a, &b, 5);
        let plain = convolve_plain(&a, &b.to_plain(), 5);
        for ((k1, k2), value) in plain.pairs() {
            assert!((value - sym.coeff(k1 as i64, k2 as i64)).abs() < 1e-13);
        }
    }

    #[test]
    fn plain_convolution_keeps_asymmetry() {
        let a = SymSeries::from_fn(0, 1.0, |_, _| 2.0);
        let mut b = PlainSeries::zeros(2, 1.0);
        b.set(2, 0, 1.0);
        let c = convolve_plain(&a, &b, 2);
        assert_eq!(c.get(2, 0), 2.0);
        assert_eq!(c.get(0, 2), 0.0);
    }

    #[test]
    fn interval_convolution_encloses_float_convolution() {
        let a = sample(3, 0.5);
        let b = sample(3, 2.5);
        let float = convolve(&a, &b, 6);
        let rigorous = convolve(&a.map(Interval::point), &b.map(Interval::point), 6);
        for (x, enclosure) in float.coeffs().iter().zip(rigorous.coeffs()) {
            assert!(enclosure.contains(*x), "{enclosure} misses {x}");
        }
    }
}
