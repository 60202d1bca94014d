//! Floating-point initial guess for the Newton solver.
//!
//! A radial `sech²` bump is sampled on a uniform periodic grid of the square
//! and transformed with a 2D FFT; the low modes give the exponential Fourier
//! coefficients of the guess.

use crate::params::ProofConfig;
use crate::spectral::series::{PlainSeries, SymSeries};
use anyhow::{bail, Result};
use log::debug;
use num_complex::Complex;
use rustfft::FftPlanner;

/// Grid size used for a given order: a power of two, at least `4 (N + 1)`.
pub fn grid_size(config: &ProofConfig) -> usize {
    config
        .bootstrap
        .grid
        .max(4 * (config.order + 1))
        .next_power_of_two()
}

/// Radial profile `A sech²(|x| / (2√λ₁))`.
pub fn spike_profile(config: &ProofConfig, x1: f64, x2: f64) -> f64 {
    let rate = 0.5 / config.lambda1.sqrt();
    let c = (rate * x1.hypot(x2)).cosh();
    config.bootstrap.amplitude / (c * c)
}

/// Doubly-even coefficients of `samples`, a function sampled at
/// `x_j = −d + 2dj/M` (row index for `x₁`), up to `order`.
pub fn sample_coefficients(
    samples: &[f64],
    grid: usize,
    order: usize,
    half_width: f64,
) -> Result<PlainSeries<f64>> {
    if samples.len() != grid * grid {
        bail!(
            "Sample count mismatch. Expected {}, got {}.",
            grid * grid,
            samples.len()
        );
    }
    if 2 * order >= grid {
        bail!("Grid of {grid} points cannot resolve order {order}.");
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(grid);

    // Transform along x₂ (contiguous rows), transpose, then along x₁.
    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buffer);
    let mut transposed = vec![Complex::new(0.0, 0.0); grid * grid];
    for i in 0..grid {
        for j in 0..grid {
            transposed[j * grid + i] = buffer[i * grid + j];
        }
    }
    fft.process(&mut transposed);

    // The grid starts at −d, so mode k carries the phase e^{ikπ} = (−1)^k.
    let scale = 1.0 / (grid * grid) as f64;
    Ok(PlainSeries::from_fn(order, half_width, |k1, k2| {
        let value = transposed[k2 * grid + k1].re * scale;
        if (k1 + k2) % 2 == 0 {
            value
        } else {
            -value
        }
    }))
}

/// Symmetric initial guess of order `N` from the spike profile.
pub fn initial_guess(config: &ProofConfig) -> Result<SymSeries<f64>> {
    let grid = grid_size(config);
    let d = config.half_width;
    let h = 2.0 * d / grid as f64;
    let mut samples = Vec::with_capacity(grid * grid);
    for i in 0..grid {
        let x1 = -d + h * i as f64;
        for j in 0..grid {
            let x2 = -d + h * j as f64;
            samples.push(spike_profile(config, x1, x2));
        }
    }
    let plain = sample_coefficients(&samples, grid, config.order, d)?;
    debug!(
        "bootstrap: {grid}x{grid} samples, peak coefficient {:.3e}",
        plain.get(0, 0)
    );
    Ok(SymSeries::from_plain(&plain))
}
