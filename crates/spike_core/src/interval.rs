use crate::traits::Scalar;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Closed real interval `[lo, hi]` with outward rounding.
///
/// Every arithmetic result is computed in round-to-nearest and then widened by
/// one ulp on each side, so the exact real result of the operation applied to
/// any members of the operands lies inside the returned interval. Library
/// transcendental functions are not correctly rounded and are widened by two
/// ulps instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

/// Smallest float strictly greater than `x`.
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Largest float strictly smaller than `x`.
pub fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

fn round_out(lo: f64, hi: f64) -> Interval {
    Interval {
        lo: next_down(lo),
        hi: next_up(hi),
    }
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi, "inverted interval [{lo}, {hi}]");
        Self { lo, hi }
    }

    pub fn point(value: f64) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    pub fn entire() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    pub fn inf(&self) -> f64 {
        self.lo
    }

    pub fn sup(&self) -> f64 {
        self.hi
    }

    pub fn mid(&self) -> f64 {
        if self.lo == self.hi {
            return self.lo;
        }
        if !self.lo.is_finite() || !self.hi.is_finite() {
            return if self.lo.is_finite() {
                self.lo
            } else if self.hi.is_finite() {
                self.hi
            } else {
                0.0
            };
        }
        0.5 * self.lo + 0.5 * self.hi
    }

    /// Upper bound on the distance from `mid` to either end.
    pub fn radius(&self) -> f64 {
        let m = self.mid();
        next_up((m - self.lo).max(self.hi - m))
    }

    /// Largest absolute value of a member.
    pub fn mag(&self) -> f64 {
        self.lo.abs().max(self.hi.abs())
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn contains_zero(&self) -> bool {
        self.contains(0.0)
    }

    pub fn hull(&self, other: &Interval) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "[{:.*e}, {:.*e}]", p, self.lo, p, self.hi),
            None => write!(f, "[{:e}, {:e}]", self.lo, self.hi),
        }
    }
}

impl Zero for Interval {
    fn zero() -> Self {
        Self::point(0.0)
    }
    fn is_zero(&self) -> bool {
        self.lo == 0.0 && self.hi == 0.0
    }
}

impl One for Interval {
    fn one() -> Self {
        Self::point(1.0)
    }
}

impl Add for Interval {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        round_out(self.lo + rhs.lo, self.hi + rhs.hi)
    }
}

impl Sub for Interval {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        round_out(self.lo - rhs.hi, self.hi - rhs.lo)
    }
}

impl Mul for Interval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        // 0 · ±∞ is taken as 0.
        let product = |a: f64, b: f64| if a == 0.0 || b == 0.0 { 0.0 } else { a * b };
        let p = [
            product(self.lo, rhs.lo),
            product(self.lo, rhs.hi),
            product(self.hi, rhs.lo),
            product(self.hi, rhs.hi),
        ];
        let lo = p.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = p.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        round_out(lo, hi)
    }
}

impl Div for Interval {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        if rhs.contains_zero() {
            return Self::entire();
        }
        let q = [
            self.lo / rhs.lo,
            self.lo / rhs.hi,
            self.hi / rhs.lo,
            self.hi / rhs.hi,
        ];
        let lo = q.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = q.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        round_out(lo, hi)
    }
}

impl Neg for Interval {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            lo: -self.hi,
            hi: -self.lo,
        }
    }
}

impl AddAssign for Interval {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for Interval {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl MulAssign for Interval {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Scalar for Interval {
    fn from_real(value: f64) -> Self {
        Self::point(value)
    }

    fn abs(self) -> Self {
        if self.lo >= 0.0 {
            self
        } else if self.hi <= 0.0 {
            -self
        } else {
            Self {
                lo: 0.0,
                hi: self.mag(),
            }
        }
    }

    fn sqrt(self) -> Self {
        if self.hi < 0.0 {
            return Self {
                lo: f64::NAN,
                hi: f64::NAN,
            };
        }
        let lo = if self.lo <= 0.0 {
            0.0
        } else {
            next_down(self.lo.sqrt()).max(0.0)
        };
        Self {
            lo,
            hi: next_up(self.hi.sqrt()),
        }
    }

    fn exp(self) -> Self {
        Self {
            lo: next_down(next_down(self.lo.exp())).max(0.0),
            hi: next_up(next_up(self.hi.exp())),
        }
    }

    fn max(self, other: Self) -> Self {
        Self {
            lo: self.lo.max(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    fn min(self, other: Self) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.min(other.hi),
        }
    }

    fn pi() -> Self {
        // fl(π) lies below π.
        Self {
            lo: std::f64::consts::PI,
            hi: next_up(std::f64::consts::PI),
        }
    }

    fn inf(self) -> f64 {
        self.lo
    }

    fn sup(self) -> f64 {
        self.hi
    }

    fn mid(self) -> f64 {
        Interval::mid(&self)
    }

    fn sqr(self) -> Self {
        let abs = Scalar::abs(self);
        let hi = next_up(abs.hi * abs.hi);
        let lo = if abs.lo == 0.0 {
            0.0
        } else {
            next_down(abs.lo * abs.lo).max(0.0)
        };
        Self { lo, hi }
    }
}
