//! Run parameters of a proof.
//!
//! A [`ProofConfig`] is built once (defaults, or deserialised by the CLI) and
//! passed by reference to every stage. Nothing in the crate keeps parameters in
//! global state.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonSettings {
    pub max_steps: usize,
    pub damping: f64,
    /// Threshold on the sup norm of the truncated residual.
    pub tolerance: f64,
    /// Below this sup norm the iterate is considered to have collapsed to zero.
    pub degeneracy_threshold: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 30,
            damping: 1.0,
            tolerance: 1e-14,
            degeneracy_threshold: 1e-6,
        }
    }
}

/// Shape of the radial profile sampled for the initial guess,
/// `amplitude * sech²(|x| / (2√λ₁))`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    pub amplitude: f64,
    /// Minimal number of FFT samples per dimension; rounded up to a power of two
    /// of at least `4 (N + 1)`.
    pub grid: usize,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            amplitude: 4.0,
            grid: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofConfig {
    /// Truncation order N.
    pub order: usize,
    /// Half-width d of the square (−d, d)².
    pub half_width: f64,
    pub lambda1: f64,
    pub gamma: f64,
    /// Trial radius s₀ of the radii polynomial.
    pub trial_radius: f64,
    pub newton: NewtonSettings,
    pub bootstrap: BootstrapSettings,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            order: 20,
            half_width: 4.0,
            lambda1: 1.0 / 9.0,
            gamma: 9.0,
            trial_radius: 5e-4,
            newton: NewtonSettings::default(),
            bootstrap: BootstrapSettings::default(),
        }
    }
}

impl ProofConfig {
    pub fn validate(&self) -> Result<()> {
        if self.order == 0 {
            bail!("order must be at least 1.");
        }
        if !(self.half_width > 0.0) || !self.half_width.is_finite() {
            bail!("half_width must be positive and finite.");
        }
        if !(self.lambda1 > 0.0) || !self.lambda1.is_finite() {
            bail!("lambda1 must be positive and finite.");
        }
        if !(self.gamma > 0.0) || !self.gamma.is_finite() {
            bail!("gamma must be positive and finite.");
        }
        if (self.lambda1 * self.gamma - 1.0).abs() > 1e-12 {
            bail!(
                "The reduced model requires lambda1 * gamma = 1 (got {}).",
                self.lambda1 * self.gamma
            );
        }
        if !(self.trial_radius > 0.0) || !self.trial_radius.is_finite() {
            bail!("trial_radius must be positive and finite.");
        }
        if self.newton.max_steps == 0 {
            bail!("max_steps must be greater than zero.");
        }
        if self.newton.damping <= 0.0 {
            bail!("damping must be positive.");
        }
        if self.newton.tolerance <= 0.0 {
            bail!("tolerance must be positive.");
        }
        if self.newton.degeneracy_threshold < 0.0 {
            bail!("degeneracy_threshold must be non-negative.");
        }
        if self.bootstrap.amplitude <= 0.0 {
            bail!("bootstrap amplitude must be positive.");
        }
        Ok(())
    }
}
