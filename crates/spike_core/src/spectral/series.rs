use super::layout::{canonical, multiplicity, orbit_size, D4Layout, PlainLayout};
use super::linear_symbol;
use crate::traits::Scalar;
use std::ops::{Add, Sub};

/// Truncated cosine-Fourier series with the full symmetry of the square.
///
/// Coefficients are the exponential Fourier coefficients `c_n`, `n ∈ Z²`, of
/// `u(x) = Σ c_n exp(i f n·x)` with `f = π/d`. Only canonical pairs are stored;
/// every other index reads the value of its canonical representative, and
/// indices beyond the order read zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SymSeries<T: Scalar> {
    layout: D4Layout,
    half_width: f64,
    coeffs: Vec<T>,
}

/// Truncated doubly-even cosine series without diagonal folding.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainSeries<T: Scalar> {
    layout: PlainLayout,
    half_width: f64,
    coeffs: Vec<T>,
}

impl<T: Scalar> SymSeries<T> {
    pub fn zeros(order: usize, half_width: f64) -> Self {
        let layout = D4Layout::new(order);
        Self {
            layout,
            half_width,
            coeffs: vec![T::zero(); layout.dim()],
        }
    }

    pub fn from_fn(order: usize, half_width: f64, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let layout = D4Layout::new(order);
        let coeffs = layout.pairs().map(|(k1, k2)| f(k1, k2)).collect();
        Self {
            layout,
            half_width,
            coeffs,
        }
    }

    pub fn order(&self) -> usize {
        self.layout.order()
    }

    pub fn layout(&self) -> D4Layout {
        self.layout
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Enclosure of the frequency unit π/d.
    pub fn frequency(&self) -> T {
        T::pi() / T::from_real(self.half_width)
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    pub fn coeffs_mut(&mut self) -> &mut [T] {
        &mut self.coeffs
    }

    /// Coefficient of an unordered, signed index pair.
    pub fn coeff(&self, n1: i64, n2: i64) -> T {
        self.layout
            .offset_of(n1, n2)
            .map_or(T::zero(), |offset| self.coeffs[offset])
    }

    /// Sets the coefficient of the orbit of `(k₁, k₂)`; ignored beyond the order.
    pub fn set(&mut self, k1: usize, k2: usize, value: T) {
        let (k1, k2) = canonical(k1 as i64, k2 as i64);
        if let Some(offset) = self.layout.offset(k1, k2) {
            self.coeffs[offset] = value;
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        self.layout.pairs().zip(self.coeffs.iter().copied())
    }

    /// Truncates to, or zero-extends to, the given order.
    pub fn project(&self, order: usize) -> Self {
        Self::from_fn(order, self.half_width, |k1, k2| {
            self.coeff(k1 as i64, k2 as i64)
        })
    }

    pub fn map<S: Scalar>(&self, f: impl Fn(T) -> S) -> SymSeries<S> {
        SymSeries {
            layout: self.layout,
            half_width: self.half_width,
            coeffs: self.coeffs.iter().map(|&c| f(c)).collect(),
        }
    }

    /// Multiplies every coefficient by a symbol of its index.
    pub fn apply_symbol(&self, symbol: impl Fn(usize, usize) -> T) -> Self {
        Self {
            layout: self.layout,
            half_width: self.half_width,
            coeffs: self
                .pairs()
                .map(|((k1, k2), c)| symbol(k1, k2) * c)
                .collect(),
        }
    }

    pub fn laplacian(&self) -> Self {
        let f2 = self.frequency().sqr();
        self.apply_symbol(|k1, k2| -(f2 * T::from_count(k1 * k1 + k2 * k2)))
    }

    /// `λ₁Δu − u`.
    pub fn apply_linear_symbol(&self, lambda1: T) -> Self {
        let f = self.frequency();
        self.apply_symbol(|k1, k2| linear_symbol(lambda1, f, k1, k2))
    }

    pub fn scale(&self, factor: T) -> Self {
        self.map(|c| c * factor)
    }

    /// Weighted ℓ² norm; `2d` times it is the L² norm on the square.
    pub fn norm_l2(&self) -> T {
        self.inner(self).max(T::zero()).sqrt()
    }

    pub fn norm_l1(&self) -> T {
        self.pairs().fold(T::zero(), |acc, ((k1, k2), c)| {
            acc + T::from_count(orbit_size(k1, k2)) * c.abs()
        })
    }

    pub fn norm_sup(&self) -> T {
        self.coeffs
            .iter()
            .fold(T::zero(), |acc, &c| acc.max(c.abs()))
    }

    /// `Σ_{n ∈ Z²} b_n c_n` over the common support.
    pub fn inner(&self, other: &Self) -> T {
        let order = self.order().min(other.order());
        let layout = D4Layout::new(order);
        layout.pairs().fold(T::zero(), |acc, (k1, k2)| {
            let (a, b) = (k1 as i64, k2 as i64);
            acc + T::from_count(orbit_size(k1, k2)) * self.coeff(a, b) * other.coeff(a, b)
        })
    }

    /// Keeps the entries with `k₂ ≤ k₁`; the other half is assumed to mirror them.
    pub fn from_plain(plain: &PlainSeries<T>) -> Self {
        Self::from_fn(plain.order(), plain.half_width(), |k1, k2| plain.get(k1, k2))
    }

    pub fn to_plain(&self) -> PlainSeries<T> {
        PlainSeries::from_fn(self.order(), self.half_width, |k1, k2| {
            self.coeff(k1 as i64, k2 as i64)
        })
    }

    /// Cosine coefficients `g_n`, `n = 0..=N`, of the boundary trace
    /// `u(d, x₂) = Σ_n g_n cos(n f x₂)`.
    ///
    /// On `x₁ = d` the mode `k₁` picks up the sign `(−1)^{k₁}`, and the orbit
    /// multiplicities fold the exponential coefficients into cosine ones.
    pub fn boundary_trace(&self) -> Vec<T> {
        let order = self.order();
        (0..=order)
            .map(|n| {
                (0..=order).fold(T::zero(), |acc, k1| {
                    let weight = T::from_count(multiplicity(k1, n));
                    let term = weight * self.coeff(k1 as i64, n as i64);
                    if k1 % 2 == 0 {
                        acc + term
                    } else {
                        acc - term
                    }
                })
            })
            .collect()
    }
}

impl SymSeries<f64> {
    /// Point value `u(x₁, x₂)`.
    pub fn evaluate(&self, x1: f64, x2: f64) -> f64 {
        let f = std::f64::consts::PI / self.half_width;
        self.pairs()
            .map(|((k1, k2), c)| {
                let weight = multiplicity(k1, k2) as f64;
                let mut value =
                    weight * (k1 as f64 * f * x1).cos() * (k2 as f64 * f * x2).cos();
                if k1 != k2 {
                    value += weight * (k2 as f64 * f * x1).cos() * (k1 as f64 * f * x2).cos();
                }
                c * value
            })
            .sum()
    }
}

fn zip_series<T: Scalar>(
    lhs: &SymSeries<T>,
    rhs: &SymSeries<T>,
    op: impl Fn(T, T) -> T,
) -> SymSeries<T> {
    let order = lhs.order().max(rhs.order());
    SymSeries::from_fn(order, lhs.half_width, |k1, k2| {
        let (a, b) = (k1 as i64, k2 as i64);
        op(lhs.coeff(a, b), rhs.coeff(a, b))
    })
}

impl<T: Scalar> Add for &SymSeries<T> {
    type Output = SymSeries<T>;
    fn add(self, rhs: Self) -> SymSeries<T> {
        zip_series(self, rhs, |a, b| a + b)
    }
}

impl<T: Scalar> Sub for &SymSeries<T> {
    type Output = SymSeries<T>;
    fn sub(self, rhs: Self) -> SymSeries<T> {
        zip_series(self, rhs, |a, b| a - b)
    }
}

impl<T: Scalar> PlainSeries<T> {
    pub fn zeros(order: usize, half_width: f64) -> Self {
        let layout = PlainLayout::new(order);
        Self {
            layout,
            half_width,
            coeffs: vec![T::zero(); layout.dim()],
        }
    }

    pub fn from_fn(order: usize, half_width: f64, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let layout = PlainLayout::new(order);
        let coeffs = layout.pairs().map(|(k1, k2)| f(k1, k2)).collect();
        Self {
            layout,
            half_width,
            coeffs,
        }
    }

    pub fn order(&self) -> usize {
        self.layout.order()
    }

    pub fn layout(&self) -> PlainLayout {
        self.layout
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Coefficient at a non-negative index, zero beyond the order.
    pub fn get(&self, k1: usize, k2: usize) -> T {
        self.layout
            .offset(k1, k2)
            .map_or(T::zero(), |offset| self.coeffs[offset])
    }

    /// Coefficient of a signed index, looked up by `(|n₁|, |n₂|)`.
    pub fn coeff(&self, n1: i64, n2: i64) -> T {
        self.layout
            .offset_of(n1, n2)
            .map_or(T::zero(), |offset| self.coeffs[offset])
    }

    pub fn set(&mut self, k1: usize, k2: usize, value: T) {
        if let Some(offset) = self.layout.offset(k1, k2) {
            self.coeffs[offset] = value;
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = ((usize, usize), T)> + '_ {
        self.layout.pairs().zip(self.coeffs.iter().copied())
    }

    pub fn norm_l1(&self) -> T {
        self.pairs().fold(T::zero(), |acc, ((k1, k2), c)| {
            acc + T::from_count(multiplicity(k1, k2)) * c.abs()
        })
    }

    pub fn norm_l2(&self) -> T {
        self.inner(self).max(T::zero()).sqrt()
    }

    pub fn inner(&self, other: &Self) -> T {
        let order = self.order().min(other.order());
        PlainLayout::new(order)
            .pairs()
            .fold(T::zero(), |acc, (k1, k2)| {
                acc + T::from_count(multiplicity(k1, k2)) * self.get(k1, k2) * other.get(k1, k2)
            })
    }

    /// `Σ_{n ∈ Z²} c_n s_n` against a symmetric series.
    pub fn inner_sym(&self, other: &SymSeries<T>) -> T {
        let order = self.order().min(other.order());
        PlainLayout::new(order)
            .pairs()
            .fold(T::zero(), |acc, (k1, k2)| {
                acc + T::from_count(multiplicity(k1, k2))
                    * self.get(k1, k2)
                    * other.coeff(k1 as i64, k2 as i64)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symmetric_profile(k1: usize, k2: usize) -> f64 {
        let r2 = (k1 * k1 + k2 * k2) as f64;
        (-0.3 * r2).exp() * (1.0 + 0.1 * (k1 * k2) as f64)
    }

    #[test]
    fn symmetric_round_trip_through_plain_is_lossless() {
        let plain = PlainSeries::from_fn(9, 4.0, symmetric_profile);
        let reduced = SymSeries::from_plain(&plain);
        assert_eq!(reduced.coeffs().len(), 55);
        let back = reduced.to_plain();
        for ((k1, k2), value) in plain.pairs() {
            assert_eq!(back.get(k1, k2), value, "coefficient ({k1}, {k2}) changed");
        }
    }

    #[test]
    fn from_plain_discards_the_upper_triangle() {
        let plain = PlainSeries::from_fn(3, 1.0, |k1, k2| (10 * k1 + k2) as f64);
        let reduced = SymSeries::from_plain(&plain);
        assert_eq!(reduced.coeff(2, 1), 21.0);
        assert_eq!(reduced.coeff(1, 2), 21.0);
    }

    #[test]
    fn lookups_fold_and_vanish_outside_order() {
        let series = SymSeries::from_fn(4, 2.0, |k1, k2| (k1 * 10 + k2) as f64);
        assert_eq!(series.coeff(3, 1), 31.0);
        assert_eq!(series.coeff(-1, 3), 31.0);
        assert_eq!(series.coeff(5, 0), 0.0);
        assert_eq!(series.project(2).coeffs().len(), 6);
        assert_eq!(series.project(6).coeff(4, 4), 44.0);
    }

    #[test]
    fn evaluation_matches_orbit_sum() {
        let mut series = SymSeries::zeros(3, 2.0);
        series.set(0, 0, 0.5);
        series.set(2, 1, 0.25);
        let (x1, x2) = (0.3, -0.7);
        let f = std::f64::consts::PI / 2.0;
        let mut expected = 0.5;
        for (m1, m2) in [(2i64, 1i64), (1, 2)] {
            for s1 in [-1.0, 1.0] {
                for s2 in [-1.0, 1.0] {
                    expected += 0.25 * (f * (s1 * m1 as f64 * x1 + s2 * m2 as f64 * x2)).cos();
                }
            }
        }
        assert!((series.evaluate(x1, x2) - expected).abs() < 1e-14);
    }

    #[test]
    fn boundary_trace_matches_point_values() {
        let series = SymSeries::from_fn(5, 3.0, symmetric_profile);
        let trace = series.boundary_trace();
        let f = std::f64::consts::PI / 3.0;
        for x2 in [-2.5, -0.4, 0.0, 1.1, 2.9] {
            let from_trace: f64 = trace
                .iter()
                .enumerate()
                .map(|(n, g)| g * (n as f64 * f * x2).cos())
                .sum();
            assert!((from_trace - series.evaluate(3.0, x2)).abs() < 1e-12);
        }
    }

    #[test]
    fn parseval_weights_match_quadrature() {
        let series = SymSeries::from_fn(4, 1.0, |k1, k2| 1.0 / (1 + k1 + k2) as f64);
        let m = 64;
        let h = 2.0 / m as f64;
        let mut integral = 0.0;
        for i in 0..m {
            for j in 0..m {
                let x1 = -1.0 + (i as f64 + 0.5) * h;
                let x2 = -1.0 + (j as f64 + 0.5) * h;
                integral += series.evaluate(x1, x2).powi(2) * h * h;
            }
        }
        let l2 = 2.0 * series.norm_l2();
        assert!((l2 * l2 - integral).abs() < 1e-10);
    }

    #[test]
    fn laplacian_scales_by_frequency_squared() {
        let series = SymSeries::from_fn(3, 2.0, |_, _| 1.0);
        let lap = series.laplacian();
        let f2 = (std::f64::consts::PI / 2.0).powi(2);
        assert!((lap.coeff(2, 1) + 5.0 * f2).abs() < 1e-12);
        assert_eq!(lap.coeff(0, 0), 0.0);
    }

    #[test]
    fn linear_symbol_combines_laplacian_and_identity() {
        let series = SymSeries::from_fn(4, 3.0, symmetric_profile);
        let lambda1 = 0.25;
        let direct = series.apply_linear_symbol(lambda1);
        let combined = &series.laplacian().scale(lambda1) - &series;
        for (a, b) in direct.coeffs().iter().zip(combined.coeffs()) {
            assert!((a - b).abs() < 1e-15);
        }
    }
}
