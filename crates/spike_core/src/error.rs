use thiserror::Error;

/// Conditions that end a proof run without a verdict.
///
/// A failed radii polynomial is not listed here: it is a regular outcome and is
/// reported through [`crate::proof::certificate::Verdict`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProofError {
    #[error("trace compatibility system 𝒯L⁻¹𝒯ᵀ is singular")]
    SingularTraceSystem,
    #[error("trace compatibility solve could not be enclosed (‖I − RG‖∞ = {contraction:e})")]
    TraceEnclosure { contraction: f64 },
    #[error("Newton solver did not reach tolerance after {iterations} steps (‖F‖∞ = {residual:e})")]
    NotConverged { residual: f64, iterations: usize },
    #[error("Newton solver collapsed onto the trivial solution (‖U‖∞ = {norm:e})")]
    Degenerate { norm: f64 },
    #[error("linearised operator could not be inverted")]
    SingularJacobian,
}
