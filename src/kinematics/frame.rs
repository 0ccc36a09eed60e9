//! Rest-frame normalisation
//!
//! Shifts a particle set onto a reference point (typically the host halo's
//! potential minimum) and removes the mass-weighted bulk velocity, so that
//! downstream angular-momentum quantities are measured in the galaxy rest
//! frame

use crate::error::{AnalysisError, AnalysisResult};
use crate::kinematics::states::{NVec3, ParticleSet};

/// Recentre a particle set on `centre` and remove the bulk velocity.
///
/// Positions become `r_i - centre`; velocities become `v_i - <v>` where
/// `<v> = sum(m_i v_i) / sum(m_i)` over all particles, with no spatial cut.
/// Returns a new set; the input is left untouched so the caller can keep the
/// raw arrays around.
pub fn recentre(set: &ParticleSet, centre: &NVec3) -> AnalysisResult<ParticleSet> {
    set.validate()?;

    let total_mass = set.total_mass();
    if !(total_mass > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "non-positive total mass: {total_mass}"
        )));
    }

    // Mass-weighted mean velocity of the whole set
    let bulk: NVec3 = set
        .velocity
        .iter()
        .zip(set.mass.iter())
        .map(|(v, m)| *m * v)
        .sum::<NVec3>()
        / total_mass;

    let position = set.position.iter().map(|r| r - centre).collect();
    let velocity = set.velocity.iter().map(|v| v - bulk).collect();

    Ok(ParticleSet {
        position,
        velocity,
        mass: set.mass.clone(),
        binding_energy: set.binding_energy.clone(),
    })
}
