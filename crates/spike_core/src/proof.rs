//! Rigorous bounds and the radii polynomial check.

pub mod bounds;
pub mod certificate;
pub mod kernels;
pub mod tail;
