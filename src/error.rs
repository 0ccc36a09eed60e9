//! Error taxonomy for the analysis core
//!
//! Each component validates its own preconditions and fails independently;
//! the pipeline turns component failures into blank record fields instead of
//! aborting the whole galaxy (except `InvalidInput` at recentring, which
//! means no computation is possible at all)

use thiserror::Error;

/// All the ways a per-galaxy analysis step can fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Zero particles, mismatched array lengths, non-positive total mass
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Inertia tensor eigen-decomposition failed or the axes cannot be
    /// disambiguated (near-spherical mass distribution, vanishing momentum)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Binding energies are constant or non-finite across all particles,
    /// so the circularity envelope is flat
    #[error("degenerate binding energies: {0}")]
    DegenerateEnergy(String),

    /// Too few particles for the requested statistic
    #[error("insufficient sample: need at least {needed} particles, got {got}")]
    InsufficientSample { needed: usize, got: usize },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
