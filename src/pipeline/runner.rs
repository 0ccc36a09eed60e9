//! Build runtime catalogs from configuration and run the per-galaxy analysis
//!
//! Takes a `CatalogConfig` (YAML-facing) and produces the runtime bundle
//! (`Catalog`) containing:
//! - analysis parameters (`Parameters`) with defaults filled in
//! - one `Galaxy` per catalog entry (name, centre, particle arrays)
//!
//! Galaxies are independent, so the catalog fans out over a rayon worker
//! pool; results come back as an indexed table in catalog order, never
//! through shared accumulators

use rayon::prelude::*;

use crate::configuration::config::{AlignmentConfig, CatalogConfig, GalaxyConfig};
use crate::error::{AnalysisError, AnalysisResult};
use crate::kinematics::alignment::{momentum_frame, principal_axes, AlignAxis};
use crate::kinematics::diagnostics::{
    circularities, circularity_fractions, kappa_rotation, rotation_over_dispersion,
};
use crate::kinematics::frame::recentre;
use crate::kinematics::orientation::orientation_split;
use crate::kinematics::radii::concentration_index;
use crate::kinematics::states::{KinematicRecord, NVec3, ParticleSet};

/// Runtime analysis parameters, defaults filled in from [`AnalysisConfig`]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub nside: u32, // spherical map resolution
    pub disc_opening: f64, // disc/spheroid angular threshold, radians
    pub circularity_disc: f64, // lower circularity bound for disc membership
    pub circularity_cut: f64, // |circularity| reference band half-width
    pub alignment: AlignmentConfig, // frame alignment applied before the map
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            nside: 32,
            disc_opening: 30.0_f64.to_radians(),
            circularity_disc: 0.7,
            circularity_cut: 1.7,
            alignment: AlignmentConfig::None,
        }
    }
}

/// One galaxy ready for analysis
#[derive(Debug, Clone)]
pub struct Galaxy {
    pub name: String,
    pub centre: NVec3, // reference point in the raw coordinate system, kpc
    pub particles: ParticleSet,
}

/// A fully-initialized analysis run: parameters plus the galaxies to process
#[derive(Debug)]
pub struct Catalog {
    pub parameters: Parameters,
    pub galaxies: Vec<Galaxy>,
}

impl Catalog {
    pub fn build_catalog(cfg: CatalogConfig) -> Self {
        // Parameters (runtime) from AnalysisConfig
        let a_cfg = cfg.analysis;
        let parameters = Parameters {
            nside: a_cfg.nside.unwrap_or(32),
            disc_opening: a_cfg.disc_opening_deg.unwrap_or(30.0).to_radians(),
            circularity_disc: a_cfg.circularity_disc.unwrap_or(0.7),
            circularity_cut: a_cfg.circularity_cut.unwrap_or(1.7),
            alignment: a_cfg.alignment.unwrap_or(AlignmentConfig::None),
        };

        let galaxies = cfg.galaxies.into_iter().map(build_galaxy).collect();

        Self {
            parameters,
            galaxies,
        }
    }

    /// Analyse every galaxy on the rayon pool, returning (name, result)
    /// pairs in catalog order
    pub fn analyze(&self) -> Vec<(String, AnalysisResult<KinematicRecord>)> {
        self.galaxies
            .par_iter()
            .map(|g| (g.name.clone(), analyze_galaxy(g, &self.parameters)))
            .collect()
    }
}

/// Galaxies: map `GalaxyConfig` -> runtime `Galaxy` using nalgebra vectors
fn build_galaxy(gc: GalaxyConfig) -> Galaxy {
    let position = gc.particles.iter().map(|p| NVec3::new(p.x[0], p.x[1], p.x[2])).collect();
    let velocity = gc.particles.iter().map(|p| NVec3::new(p.v[0], p.v[1], p.v[2])).collect();
    let mass = gc.particles.iter().map(|p| p.m).collect();

    // Binding energies only count when every particle carries one
    let binding_energy = if !gc.particles.is_empty() && gc.particles.iter().all(|p| p.e_bind.is_some()) {
        Some(gc.particles.iter().filter_map(|p| p.e_bind).collect())
    } else {
        None
    };

    Galaxy {
        name: gc.name,
        centre: NVec3::new(gc.centre[0], gc.centre[1], gc.centre[2]),
        particles: ParticleSet {
            position,
            velocity,
            mass,
            binding_energy,
        },
    }
}

/// Run the full decomposition for one galaxy.
///
/// Recentring failures abort the galaxy (nothing can be computed without a
/// rest frame). Every later component fails independently: its record
/// fields come back `None` and the failure is logged, but the other fields
/// are still produced.
pub fn analyze_galaxy(galaxy: &Galaxy, params: &Parameters) -> AnalysisResult<KinematicRecord> {
    let set = recentre(&galaxy.particles, &galaxy.centre)?;

    let set = align_set(galaxy, &set, params);

    let momentum = set.total_angular_momentum();

    let kappa = log_blank(&galaxy.name, "kappa", kappa_rotation(&set));

    let disc_fraction_angular = log_blank(
        &galaxy.name,
        "orientation split",
        orientation_split(&set, params.nside, params.disc_opening).map(|s| s.disc_fraction),
    );

    let fractions = log_blank(&galaxy.name, "circularity", circularities(&set)).and_then(|eps| {
        circularity_fractions(&eps, &set.mass, params.circularity_disc, params.circularity_cut)
    });

    let rotation_over_dispersion = log_blank(
        &galaxy.name,
        "rotation over dispersion",
        rotation_over_dispersion(&set),
    );

    let concentration = log_blank(&galaxy.name, "concentration index", concentration_index(&set));

    Ok(KinematicRecord {
        galaxy_mass: set.total_mass(),
        angular_momentum: momentum.norm(),
        kappa,
        disc_fraction_angular,
        disc_fraction_circularity: fractions.map(|f| f.disc_fraction_circularity),
        disc_fraction_counter_rot: fractions.map(|f| f.disc_fraction_counter_rot),
        rotation_over_dispersion,
        concentration_index: concentration,
    })
}

/// Apply the configured frame alignment, falling back or skipping (with a
/// warning) when the geometry is degenerate
fn align_set(galaxy: &Galaxy, set: &ParticleSet, params: &Parameters) -> ParticleSet {
    match params.alignment {
        AlignmentConfig::None => set.clone(),
        AlignmentConfig::PrincipalAxes => {
            let momentum = set.total_angular_momentum();
            match principal_axes(set, &momentum) {
                Ok(frame) => frame.rotate(set),
                Err(err) => {
                    // Near-spherical systems: retry with momentum alignment
                    // before giving up on rotating at all
                    log::warn!(
                        "{}: principal axes unavailable ({err}), falling back to momentum alignment",
                        galaxy.name
                    );
                    match momentum_frame(set, AlignAxis::Z) {
                        Ok(frame) => frame.rotate(set),
                        Err(err) => {
                            log::warn!("{}: momentum alignment unavailable ({err}), analysing unrotated", galaxy.name);
                            set.clone()
                        }
                    }
                }
            }
        }
        AlignmentConfig::AngularMomentum => match momentum_frame(set, AlignAxis::Z) {
            Ok(frame) => frame.rotate(set),
            Err(err) => {
                log::warn!("{}: momentum alignment unavailable ({err}), analysing unrotated", galaxy.name);
                set.clone()
            }
        },
    }
}

/// Demote a component failure to a blank field, keeping the galaxy going
fn log_blank<T>(galaxy: &str, what: &str, result: Result<T, AnalysisError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("{galaxy}: {what} unavailable: {err}");
            None
        }
    }
}
