//! Core value types for the per-galaxy analysis.
//!
//! Defines:
//! - `ParticleSet` — one galaxy's particle arrays (positions, velocities,
//!   masses, optional binding energies), index-aligned
//! - `KinematicRecord` — the fixed-shape diagnostic record produced per galaxy
//!
//! Units are fixed by the caller: kpc, km/s, solar masses. Nothing in the
//! core converts units.

use nalgebra::Vector3;
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

pub type NVec3 = Vector3<f64>;

/// One galaxy's particle arrays. All sequences have identical length and the
/// same physical particle lives at index i in every array.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    pub position: Vec<NVec3>, // kpc
    pub velocity: Vec<NVec3>, // km/s
    pub mass: Vec<f64>, // Msun
    pub binding_energy: Option<Vec<f64>>, // more negative = more bound
}

impl ParticleSet {
    pub fn new(position: Vec<NVec3>, velocity: Vec<NVec3>, mass: Vec<f64>) -> Self {
        Self {
            position,
            velocity,
            mass,
            binding_energy: None,
        }
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Check the index-alignment invariant: every array has the same length
    /// and there is at least one particle
    pub fn validate(&self) -> AnalysisResult<()> {
        let n = self.position.len();
        if n == 0 {
            return Err(AnalysisError::InvalidInput("empty particle set".into()));
        }
        if self.velocity.len() != n || self.mass.len() != n {
            return Err(AnalysisError::InvalidInput(format!(
                "mismatched array lengths: {} positions, {} velocities, {} masses",
                n,
                self.velocity.len(),
                self.mass.len()
            )));
        }
        if let Some(e) = &self.binding_energy {
            if e.len() != n {
                return Err(AnalysisError::InvalidInput(format!(
                    "mismatched array lengths: {} positions, {} binding energies",
                    n,
                    e.len()
                )));
            }
        }
        Ok(())
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Specific angular momentum r x v per particle
    pub fn specific_angular_momenta(&self) -> Vec<NVec3> {
        self.position
            .iter()
            .zip(self.velocity.iter())
            .map(|(r, v)| r.cross(v))
            .collect()
    }

    /// Total angular momentum sum m_i (r_i x v_i), in Msun kpc km/s
    pub fn total_angular_momentum(&self) -> NVec3 {
        self.position
            .iter()
            .zip(self.velocity.iter())
            .zip(self.mass.iter())
            .map(|((r, v), m)| *m * r.cross(v))
            .sum()
    }
}

/// Per-galaxy diagnostic record. Fields that a component failed to produce
/// are `None` rather than NaN; a failure in one component never blanks the
/// others.
#[derive(Debug, Clone, Serialize)]
pub struct KinematicRecord {
    pub galaxy_mass: f64, // Msun
    pub angular_momentum: f64, // |sum m r x v|, Msun kpc km/s
    pub kappa: Option<f64>, // fraction of kinetic energy in ordered rotation
    pub disc_fraction_angular: Option<f64>, // mass within the opening angle of the density mode
    pub disc_fraction_circularity: Option<f64>, // mass with disc-like circularity
    pub disc_fraction_counter_rot: Option<f64>, // 1 - 2 * counter-rotating mass fraction
    pub rotation_over_dispersion: Option<f64>,
    pub concentration_index: Option<f64>, // R90 / R50
}
