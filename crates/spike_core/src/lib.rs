pub mod bootstrap;
pub mod error;
pub mod interval;
pub mod newton;
pub mod params;
pub mod pipeline;
pub mod proof;
pub mod spectral;
pub mod trace;
/// The `spike_core` crate carries out a computer-assisted existence proof for the
/// localized spike of the reduced Gray-Scott model on a square.
/// Every numerical kernel is generic over [`traits::Scalar`], so the same code runs
/// in floating point (to find the candidate) and in interval arithmetic (to bound it).
///
/// Key components:
/// - **Spectral**: D4-symmetric cosine series, folded convolutions and truncated operators.
/// - **Newton**: Floating-point solve of the truncated problem from a `sech²` bootstrap.
/// - **Trace**: Projection onto series whose boundary trace vanishes.
/// - **Proof**: Bounds `Y₀`, `Z₁`, `Z₂`, the tail bound `Zᵤ` and the radii polynomial check.
pub mod traits;
