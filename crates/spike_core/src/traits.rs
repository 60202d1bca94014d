use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Numeric type the spectral and bound computations are generic over.
///
/// Two implementations exist: `f64` for the approximate (non-rigorous) stage and
/// for shadow evaluations, and [`crate::interval::Interval`] for the certified
/// stage. Every formula written against this trait therefore runs both ways, and
/// the interval result encloses the floating-point one.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + 'static
{
    /// Embeds an exactly known real number.
    fn from_real(value: f64) -> Self;

    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn exp(self) -> Self;
    fn max(self, other: Self) -> Self;
    fn min(self, other: Self) -> Self;

    /// Enclosure of π.
    fn pi() -> Self;

    /// Lower end of the value (the value itself for floats).
    fn inf(self) -> f64;
    /// Upper end of the value (the value itself for floats).
    fn sup(self) -> f64;
    /// Representative floating-point value.
    fn mid(self) -> f64;

    fn sqr(self) -> Self {
        self * self
    }

    fn recip(self) -> Self {
        Self::one() / self
    }

    /// Embeds a small non-negative integer exactly.
    fn from_count(value: usize) -> Self {
        Self::from_real(value as f64)
    }
}

impl Scalar for f64 {
    fn from_real(value: f64) -> Self {
        value
    }
    fn abs(self) -> Self {
        f64::abs(self)
    }
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
    fn exp(self) -> Self {
        f64::exp(self)
    }
    fn max(self, other: Self) -> Self {
        f64::max(self, other)
    }
    fn min(self, other: Self) -> Self {
        f64::min(self, other)
    }
    fn pi() -> Self {
        std::f64::consts::PI
    }
    fn inf(self) -> f64 {
        self
    }
    fn sup(self) -> f64 {
        self
    }
    fn mid(self) -> f64 {
        self
    }
}
