//! Configuration types for loading galaxy catalogs from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of an
//! analysis run. A catalog consists of:
//!
//! - [`AnalysisConfig`] – analysis options (map resolution, thresholds, alignment)
//! - [`GalaxyConfig`]   – one galaxy: name, centre, particle list
//! - [`ParticleConfig`] – one particle's state
//! - [`CatalogConfig`]  – top-level wrapper used to load a catalog from YAML
//!
//! # YAML format
//! An example catalog matching these types:
//!
//! ```yaml
//! analysis:
//!   nside: 32                 # spherical map resolution, npix = 12 * nside^2
//!   disc_opening_deg: 30.0    # disc/spheroid angular threshold
//!   circularity_disc: 0.7     # lower circularity bound for disc membership
//!   circularity_cut: 1.7      # |circularity| reference band half-width
//!   alignment: "none"         # or "principal-axes" / "angular-momentum"
//!
//! galaxies:
//!   - name: "galaxy_1"
//!     centre: [ 12.3, -4.5, 0.8 ]   # kpc
//!     particles:
//!       - x: [ 12.4, -4.5, 0.8 ]    # kpc
//!         v: [ 10.0, 150.0, 2.0 ]   # km/s
//!         m: 1.0e6                  # Msun
//!         e_bind: -1.2e5            # optional, required for circularity
//! ```
//!
//! The pipeline maps this configuration into its runtime representation,
//! filling defaults for any omitted analysis option.

use serde::Deserialize;

/// Which frame alignment the pipeline applies before the orientation map
/// `alignment: "none"`, `"principal-axes"` or `"angular-momentum"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentConfig {
    #[serde(rename = "none")] // analyse in the recentred frame as-is
    None,

    #[serde(rename = "principal-axes")] // inertia-tensor principal axes, falls back to momentum alignment when degenerate
    PrincipalAxes,

    #[serde(rename = "angular-momentum")] // rotate the total angular momentum onto the z axis
    AngularMomentum,
}

/// Analysis options; every field is optional and defaulted at build time
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub nside: Option<u32>, // map resolution, default 32
    pub disc_opening_deg: Option<f64>, // angular disc threshold in degrees, default 30
    pub circularity_disc: Option<f64>, // default 0.7
    pub circularity_cut: Option<f64>, // default 1.7
    pub alignment: Option<AlignmentConfig>, // default "none"
}

/// One particle's state in catalog units (kpc, km/s, Msun)
#[derive(Deserialize, Debug)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // position
    pub v: Vec<f64>, // velocity
    pub m: f64, // mass
    pub e_bind: Option<f64>, // binding energy, more negative = more bound
}

/// One galaxy: identifier, reference centre, and its particles
#[derive(Deserialize, Debug)]
pub struct GalaxyConfig {
    pub name: String,
    pub centre: Vec<f64>, // reference point, typically the potential minimum
    pub particles: Vec<ParticleConfig>,
}

/// Top-level catalog configuration loaded from YAML
#[derive(Deserialize, Debug)]
pub struct CatalogConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub galaxies: Vec<GalaxyConfig>,
}
