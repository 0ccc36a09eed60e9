//! Angular-momentum orientation map and disc/spheroid split
//!
//! Projects each particle's specific angular-momentum direction onto the
//! sphere, bins the directions on an equal-area pixelization, finds the
//! occupancy mode, and classifies particles as disc or spheroid by their
//! great-circle separation from the mode direction

use std::f64::consts::PI;

use crate::error::AnalysisResult;
use crate::kinematics::healpix::RingGrid;
use crate::kinematics::states::ParticleSet;

/// Occupancy counts over a [`RingGrid`], built fresh per galaxy.
/// The counts sum to the number of particles with a finite angular-momentum
/// direction (equal to N whenever no particle has exactly zero momentum).
#[derive(Debug, Clone)]
pub struct SkyDensityMap {
    grid: RingGrid,
    pub counts: Vec<u32>,
}

impl SkyDensityMap {
    /// Bin (longitude, latitude) directions at the given resolution
    pub fn build(directions: impl IntoIterator<Item = (f64, f64)>, nside: u32) -> Self {
        let grid = RingGrid::new(nside);
        let mut counts = vec![0u32; grid.npix()];
        for (lon, lat) in directions {
            counts[grid.ang_to_pix(lon, lat)] += 1;
        }
        Self { grid, counts }
    }

    pub fn grid(&self) -> &RingGrid {
        &self.grid
    }

    /// Pixel with the highest occupancy. Ties resolve to the lowest pixel
    /// index so the mode is deterministic.
    pub fn densest_pixel(&self) -> usize {
        let mut best = 0;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > self.counts[best] {
                best = i;
            }
        }
        best
    }

    /// Center of a pixel as (longitude, latitude), longitude wrapped to
    /// (-pi, pi] to match the atan2 convention of the particle directions
    pub fn pixel_center(&self, pix: usize) -> (f64, f64) {
        let (lon, lat) = self.grid.pix_center(pix);
        let lon = (lon + PI).rem_euclid(2.0 * PI) - PI;
        (lon, lat)
    }
}

/// Result of the orientation-based decomposition of one galaxy
#[derive(Debug, Clone)]
pub struct OrientationSplit {
    pub map: SkyDensityMap,
    pub mode_lon: f64, // density mode longitude, radians
    pub mode_lat: f64, // density mode latitude, radians
    pub disc_mask: Vec<bool>, // per-particle, index-aligned with the set
    pub disc_fraction: f64, // disc mass over total mass
}

/// Decompose a recentred particle set by angular-momentum orientation.
///
/// Every particle direction is the unit vector of m (r x v); directions are
/// binned at `nside`, the mode pixel's center defines the disc axis, and a
/// particle belongs to the disc iff its great-circle separation from that
/// axis is below `opening` (radians).
///
/// Particles with zero angular momentum have no direction: they are left out
/// of the map and classified spheroid, but stay in the total mass.
pub fn orientation_split(
    set: &ParticleSet,
    nside: u32,
    opening: f64,
) -> AnalysisResult<OrientationSplit> {
    set.validate()?;

    // Unit angular-momentum directions as (lon, lat); None where |r x v| = 0.
    // The particle mass scales the momentum but not its direction.
    let directions: Vec<Option<(f64, f64)>> = set
        .specific_angular_momenta()
        .iter()
        .map(|l| {
            let norm = l.norm();
            if norm > 0.0 && norm.is_finite() {
                let u = l / norm;
                Some((u.y.atan2(u.x), u.z.clamp(-1.0, 1.0).asin()))
            } else {
                None
            }
        })
        .collect();

    let map = SkyDensityMap::build(directions.iter().flatten().copied(), nside);

    let mode = map.densest_pixel();
    if map.counts[mode] <= 3 {
        // Still computed, but the mode is not statistically meaningful;
        // leave the decision to the caller
        log::warn!(
            "density mode occupancy is only {} of {} particles; low-confidence split",
            map.counts[mode],
            set.len()
        );
    }
    let (mode_lon, mode_lat) = map.pixel_center(mode);

    // Great-circle separation from the mode via the spherical law of cosines
    let mut disc_mass = 0.0;
    let mut disc_mask = vec![false; set.len()];
    for (i, dir) in directions.iter().enumerate() {
        if let Some((lon, lat)) = dir {
            let cos_theta = mode_lat.sin() * lat.sin()
                + mode_lat.cos() * lat.cos() * (mode_lon - lon).cos();
            let theta = cos_theta.clamp(-1.0, 1.0).acos();
            if theta < opening {
                disc_mask[i] = true;
                disc_mass += set.mass[i];
            }
        }
    }

    let disc_fraction = disc_mass / set.total_mass();

    Ok(OrientationSplit {
        map,
        mode_lon,
        mode_lat,
        disc_mask,
        disc_fraction,
    })
}
