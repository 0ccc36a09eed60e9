pub mod kinematics;
pub mod configuration;
pub mod pipeline;
pub mod benchmark;
pub mod error;

pub use kinematics::states::{ParticleSet, KinematicRecord, NVec3};
pub use kinematics::frame::recentre;
pub use kinematics::alignment::{OrientationFrame, AlignAxis, principal_axes, momentum_frame};
pub use kinematics::healpix::RingGrid;
pub use kinematics::orientation::{SkyDensityMap, OrientationSplit, orientation_split};
pub use kinematics::diagnostics::{
    rotation_axis, kappa_rotation, circularities, circularity_fractions,
    rotation_over_dispersion, circularity_distribution, bar_strength_profile,
    CircularityFractions,
};
pub use kinematics::radii::{mass_fraction_radius, concentration_index};

pub use configuration::config::{
    CatalogConfig, AnalysisConfig, GalaxyConfig, ParticleConfig, AlignmentConfig,
};

pub use pipeline::runner::{Catalog, Galaxy, Parameters, analyze_galaxy};

pub use benchmark::benchmark::{bench_map, bench_diagnostics};

pub use error::{AnalysisError, AnalysisResult};
