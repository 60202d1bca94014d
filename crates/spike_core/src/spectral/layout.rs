//! Storage layouts of truncated cosine-Fourier index sets.
//!
//! [`D4Layout`] stores one coefficient per orbit of the square's symmetry group
//! (canonical pairs `k₁ ≥ k₂ ≥ 0`), [`PlainLayout`] one per doubly-even index
//! (`k₁, k₂ ≥ 0` with no diagonal folding). Both expose an explicit bijection
//! between index pairs and linear offsets.

/// Folds a signed index pair to its canonical representative `(max, min)` of
/// the absolute values.
pub fn canonical(n1: i64, n2: i64) -> (usize, usize) {
    let a = n1.unsigned_abs() as usize;
    let b = n2.unsigned_abs() as usize;
    if a >= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Number of points of Z² in the D4 orbit of a canonical pair.
pub fn orbit_size(k1: usize, k2: usize) -> usize {
    if k1 == 0 && k2 == 0 {
        1
    } else if k2 == 0 || k1 == k2 || k1 == 0 {
        4
    } else {
        8
    }
}

/// Distinct points of Z² in the D4 orbit of `(k₁, k₂)`.
pub fn orbit(k1: usize, k2: usize) -> Vec<(i64, i64)> {
    let (a, b) = (k1 as i64, k2 as i64);
    let mut points = Vec::with_capacity(8);
    for (p, q) in [(a, b), (b, a)] {
        for sp in [1, -1] {
            for sq in [1, -1] {
                let point = (sp * p, sq * q);
                if !points.contains(&point) {
                    points.push(point);
                }
            }
        }
    }
    points
}

/// Number of points of Z² in the parity orbit `(±k₁, ±k₂)` of a doubly-even index.
pub fn multiplicity(k1: usize, k2: usize) -> usize {
    match (k1 == 0, k2 == 0) {
        (true, true) => 1,
        (true, false) | (false, true) => 2,
        (false, false) => 4,
    }
}

/// Canonical pairs `0 ≤ k₂ ≤ k₁ ≤ N`, enumerated with `k₂` outer and `k₁` inner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct D4Layout {
    order: usize,
}

impl D4Layout {
    pub fn new(order: usize) -> Self {
        Self { order }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn dim(&self) -> usize {
        (self.order + 1) * (self.order + 2) / 2
    }

    /// Storage offset of a canonical pair; `None` outside the layout.
    pub fn offset(&self, k1: usize, k2: usize) -> Option<usize> {
        if k2 > k1 || k1 > self.order {
            return None;
        }
        // Rows k₂ = 0..k₂-1 hold N+1, N, ..., N+2-k₂ entries.
        Some(k2 * (2 * self.order + 3 - k2) / 2 + (k1 - k2))
    }

    /// Offset of any signed pair after folding.
    pub fn offset_of(&self, n1: i64, n2: i64) -> Option<usize> {
        let (k1, k2) = canonical(n1, n2);
        self.offset(k1, k2)
    }

    /// Inverse of [`D4Layout::offset`].
    pub fn pair(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for k2 in 0..=self.order {
            let row = self.order + 1 - k2;
            if offset < start + row {
                return Some((k2 + offset - start, k2));
            }
            start += row;
        }
        None
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..=self.order).flat_map(move |k2| (k2..=self.order).map(move |k1| (k1, k2)))
    }
}

/// Doubly-even indices `0 ≤ k₁, k₂ ≤ N`, row major in `k₁`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainLayout {
    order: usize,
}

impl PlainLayout {
    pub fn new(order: usize) -> Self {
        Self { order }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn dim(&self) -> usize {
        (self.order + 1) * (self.order + 1)
    }

    pub fn offset(&self, k1: usize, k2: usize) -> Option<usize> {
        if k1 > self.order || k2 > self.order {
            return None;
        }
        Some(k1 * (self.order + 1) + k2)
    }

    pub fn offset_of(&self, n1: i64, n2: i64) -> Option<usize> {
        self.offset(n1.unsigned_abs() as usize, n2.unsigned_abs() as usize)
    }

    pub fn pair(&self, offset: usize) -> Option<(usize, usize)> {
        if offset >= self.dim() {
            return None;
        }
        Some((offset / (self.order + 1), offset % (self.order + 1)))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..=self.order).flat_map(move |k1| (0..=self.order).map(move |k2| (k1, k2)))
    }
}
