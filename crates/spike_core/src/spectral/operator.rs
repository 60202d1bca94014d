//! Dense projections of linear operators between symmetric sequence spaces.
//!
//! Rows and columns are labelled by [`IndexSet`]s of canonical pairs. Norms are
//! taken in ℓ² over Z², so a canonical coefficient carries the weight of its
//! orbit: an operator `M` acts between the weighted spaces, and its norm is the
//! Euclidean norm of `diag(√ω_rows) · M · diag(√ω_cols)⁻¹`.

use super::layout::{orbit, orbit_size, D4Layout};
use super::series::SymSeries;
use crate::traits::Scalar;
use nalgebra::DMatrix;

/// Canonical pairs with `lower < k₁ ≤ upper` (all of them when `lower` is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSet {
    pairs: Vec<(usize, usize)>,
}

impl IndexSet {
    /// Every canonical pair of order at most `order`, in storage order.
    pub fn up_to(order: usize) -> Self {
        Self {
            pairs: D4Layout::new(order).pairs().collect(),
        }
    }

    /// Canonical pairs of order in `(lower, upper]`.
    pub fn band(lower: usize, upper: usize) -> Self {
        Self {
            pairs: D4Layout::new(upper)
                .pairs()
                .filter(|&(k1, _)| k1 > lower)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Coefficients of a series on this index set.
    pub fn gather<T: Scalar>(&self, series: &SymSeries<T>) -> Vec<T> {
        self.pairs
            .iter()
            .map(|&(k1, k2)| series.coeff(k1 as i64, k2 as i64))
            .collect()
    }

    /// Weighted ℓ² norm of a vector indexed by this set.
    pub fn norm_l2<T: Scalar>(&self, values: &[T]) -> T {
        self.pairs
            .iter()
            .zip(values)
            .fold(T::zero(), |acc, (&(k1, k2), &v)| {
                acc + T::from_count(orbit_size(k1, k2)) * v.sqr()
            })
            .max(T::zero())
            .sqrt()
    }

    fn sqrt_weights<T: Scalar>(&self) -> Vec<T> {
        self.pairs
            .iter()
            .map(|&(k1, k2)| T::from_count(orbit_size(k1, k2)).sqrt())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Operator<T: Scalar> {
    rows: IndexSet,
    cols: IndexSet,
    matrix: DMatrix<T>,
}

impl<T: Scalar> Operator<T> {
    pub fn from_fn(
        rows: &IndexSet,
        cols: &IndexSet,
        mut entry: impl FnMut((usize, usize), (usize, usize)) -> T,
    ) -> Self {
        let matrix = DMatrix::from_fn(rows.len(), cols.len(), |i, j| {
            entry(rows.pairs[i], cols.pairs[j])
        });
        Self {
            rows: rows.clone(),
            cols: cols.clone(),
            matrix,
        }
    }

    /// Embeds a floating-point matrix as exact entries.
    pub fn from_point_matrix(rows: &IndexSet, cols: &IndexSet, matrix: &DMatrix<f64>) -> Self {
        Self {
            rows: rows.clone(),
            cols: cols.clone(),
            matrix: matrix.map(T::from_real),
        }
    }

    /// `u ↦ π_rows(w * u)` for symmetric `u` supported on `cols`.
    pub fn multiplication(weight: &SymSeries<T>, rows: &IndexSet, cols: &IndexSet) -> Self {
        let images: Vec<Vec<(i64, i64)>> =
            cols.pairs.iter().map(|&(k1, k2)| orbit(k1, k2)).collect();
        let mut matrix = DMatrix::from_element(rows.len(), cols.len(), T::zero());
        for (j, points) in images.iter().enumerate() {
            for (i, &(r1, r2)) in rows.pairs.iter().enumerate() {
                let mut acc = T::zero();
                for &(m1, m2) in points {
                    acc += weight.coeff(r1 as i64 - m1, r2 as i64 - m2);
                }
                matrix[(i, j)] = acc;
            }
        }
        Self {
            rows: rows.clone(),
            cols: cols.clone(),
            matrix,
        }
    }

    pub fn diagonal(set: &IndexSet, symbol: impl Fn(usize, usize) -> T) -> Self {
        let mut matrix = DMatrix::from_element(set.len(), set.len(), T::zero());
        for (i, &(k1, k2)) in set.pairs.iter().enumerate() {
            matrix[(i, i)] = symbol(k1, k2);
        }
        Self {
            rows: set.clone(),
            cols: set.clone(),
            matrix,
        }
    }

    pub fn identity(set: &IndexSet) -> Self {
        Self::diagonal(set, |_, _| T::one())
    }

    pub fn matrix(&self) -> &DMatrix<T> {
        &self.matrix
    }

    /// Right multiplication by the diagonal operator with the given symbol.
    pub fn scale_columns(&self, symbol: impl Fn(usize, usize) -> T) -> Self {
        let mut matrix = self.matrix.clone();
        for (j, &(k1, k2)) in self.cols.pairs.iter().enumerate() {
            let factor = symbol(k1, k2);
            for i in 0..matrix.nrows() {
                matrix[(i, j)] *= factor;
            }
        }
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            matrix,
        }
    }

    /// `self + scale · I`; rows and columns must coincide.
    pub fn shift(&self, scale: T) -> Self {
        debug_assert_eq!(self.rows, self.cols);
        let mut matrix = self.matrix.clone();
        for i in 0..matrix.nrows().min(matrix.ncols()) {
            matrix[(i, i)] += scale;
        }
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            matrix,
        }
    }

    /// Entrywise sum; both operators must act between the same index sets.
    pub fn sum(&self, rhs: &Operator<T>) -> Self {
        debug_assert_eq!(self.rows, rhs.rows);
        debug_assert_eq!(self.cols, rhs.cols);
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            matrix: self.matrix.zip_map(&rhs.matrix, |a, b| a + b),
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            matrix: self.matrix.map(|v| -v),
        }
    }

    /// Composition `self ∘ rhs`.
    pub fn compose(&self, rhs: &Operator<T>) -> Self {
        debug_assert_eq!(self.cols, rhs.rows);
        let (n, inner, m) = (self.matrix.nrows(), self.matrix.ncols(), rhs.matrix.ncols());
        let mut matrix = DMatrix::from_element(n, m, T::zero());
        for j in 0..m {
            for k in 0..inner {
                let b = rhs.matrix[(k, j)];
                if b.is_zero() {
                    continue;
                }
                for i in 0..n {
                    let product = self.matrix[(i, k)] * b;
                    matrix[(i, j)] += product;
                }
            }
        }
        Self {
            rows: self.rows.clone(),
            cols: rhs.cols.clone(),
            matrix,
        }
    }

    pub fn apply(&self, input: &[T]) -> Vec<T> {
        debug_assert_eq!(input.len(), self.matrix.ncols());
        let mut out = vec![T::zero(); self.matrix.nrows()];
        for (j, &x) in input.iter().enumerate() {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot += self.matrix[(i, j)] * x;
            }
        }
        out
    }

    /// Upper bound on the ℓ²(Z²) operator norm.
    ///
    /// With `M̃` the orbit-weighted matrix, returns the smaller of the Schur test
    /// on the Gram matrix, `√(max_i Σ_k |(M̃M̃ᵀ)_{ik}|)` (using the smaller of the
    /// two Gram matrices), and `√(‖M̃‖₁ ‖M̃‖∞)`.
    pub fn norm(&self) -> T {
        let (n, m) = (self.matrix.nrows(), self.matrix.ncols());
        if n == 0 || m == 0 {
            return T::zero();
        }
        let row_weights = self.rows.sqrt_weights::<T>();
        let col_weights = self.cols.sqrt_weights::<T>();
        let scaled = DMatrix::from_fn(n, m, |i, j| {
            self.matrix[(i, j)] * row_weights[i] / col_weights[j]
        });

        let mut col_sums = vec![T::zero(); m];
        let mut row_sums = vec![T::zero(); n];
        for j in 0..m {
            for i in 0..n {
                let a = scaled[(i, j)].abs();
                col_sums[j] += a;
                row_sums[i] += a;
            }
        }
        let max_of = |values: &[T]| values.iter().fold(T::zero(), |acc, &v| acc.max(v));
        let young = (max_of(&col_sums) * max_of(&row_sums)).sqrt();

        // Vectors whose pairwise dot products form the smaller Gram matrix.
        let vectors: Vec<Vec<T>> = if n <= m {
            (0..n)
                .map(|i| (0..m).map(|j| scaled[(i, j)]).collect())
                .collect()
        } else {
            (0..m).map(|j| scaled.column(j).iter().copied().collect()).collect()
        };
        let mut gram_rows = vec![T::zero(); vectors.len()];
        for a in 0..vectors.len() {
            for b in a..vectors.len() {
                let dot = vectors[a]
                    .iter()
                    .zip(&vectors[b])
                    .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
                    .abs();
                gram_rows[a] += dot;
                if b != a {
                    gram_rows[b] += dot;
                }
            }
        }
        let schur = max_of(&gram_rows).sqrt();
        schur.min(young)
    }
}
