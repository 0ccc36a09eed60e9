//! Kinematic diagnostics about the rotation axis
//!
//! All quantities here are measured about the direction of the galaxy's
//! total angular momentum, re-derived from the (recentred) particle set so
//! no pre-rotated input is required:
//! - kappa, the fraction of kinetic energy in ordered rotation
//! - per-particle orbital circularity and the derived disc fractions
//! - the rotation-to-dispersion velocity ratio
//! - the mass-weighted circularity distribution
//! - the bar-strength profile from Fourier modes of the in-plane positions

use crate::error::{AnalysisError, AnalysisResult};
use crate::kinematics::alignment::plane_basis;
use crate::kinematics::states::{NVec3, ParticleSet};

/// Disc fractions derived from the circularity distribution
#[derive(Debug, Clone, Copy)]
pub struct CircularityFractions {
    /// 1 - 2 * (mass with eps < 0) / (mass with |eps| < cut)
    pub disc_fraction_counter_rot: f64,
    /// (mass with disc_threshold < eps < cut) / (mass with |eps| < cut)
    pub disc_fraction_circularity: f64,
}

/// Unit vector of the total angular momentum, the rotation axis every
/// diagnostic in this module is measured about
pub fn rotation_axis(set: &ParticleSet) -> AnalysisResult<NVec3> {
    let momentum = set.total_angular_momentum();
    let norm = momentum.norm();
    if !(norm > 0.0) {
        return Err(AnalysisError::DegenerateGeometry(
            "zero total angular momentum, no rotation axis".into(),
        ));
    }
    Ok(momentum / norm)
}

/// Fraction of kinetic energy in ordered rotation about the momentum axis:
///
///   kappa = sum 0.5 m (L_z / R)^2 / sum 0.5 m |v|^2
///
/// where L_z is the specific angular momentum along the axis and R the
/// cylindrical radius. Particles exactly on the axis (R = 0) have no defined
/// rotation velocity and are excluded from the numerator only.
pub fn kappa_rotation(set: &ParticleSet) -> AnalysisResult<f64> {
    set.validate()?;
    let axis = rotation_axis(set)?;

    let mut ordered = 0.0;
    let mut total = 0.0;
    for ((r, v), m) in set.position.iter().zip(set.velocity.iter()).zip(set.mass.iter()) {
        total += 0.5 * m * v.norm_squared();

        let height = r.dot(&axis);
        let cyl2 = (r.norm_squared() - height * height).max(0.0);
        if cyl2 > 0.0 {
            let lz = r.cross(v).dot(&axis);
            ordered += 0.5 * m * lz * lz / cyl2;
        }
    }

    if !(total > 0.0) {
        return Err(AnalysisError::InvalidInput(
            "zero total kinetic energy".into(),
        ));
    }
    Ok(ordered / total)
}

/// Per-particle orbital circularity eps = L_z / L_z,circ(E), in input order.
///
/// L_z,circ(E) is the maximum |L_z| among all particles at least as bound,
/// built by sorting on binding energy (ascending, most bound first) and
/// taking the running maximum of |L_z|. Particles sharing a binding energy
/// share one envelope value, so the result does not depend on how exact ties
/// are ordered. A zero envelope (least-bound extreme with no angular
/// momentum yet) yields eps = 0 instead of a division by zero.
pub fn circularities(set: &ParticleSet) -> AnalysisResult<Vec<f64>> {
    set.validate()?;

    let energy = set.binding_energy.as_ref().ok_or_else(|| {
        AnalysisError::InvalidInput("binding energies required for circularity".into())
    })?;

    if energy.iter().any(|e| !e.is_finite()) {
        return Err(AnalysisError::DegenerateEnergy(
            "non-finite binding energies".into(),
        ));
    }
    let lo = energy.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = energy.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        // Flat envelope: circularity is undefined for every particle
        return Err(AnalysisError::DegenerateEnergy(
            "constant binding energy across all particles".into(),
        ));
    }

    let axis = rotation_axis(set)?;
    let n = set.len();

    let lz: Vec<f64> = set
        .position
        .iter()
        .zip(set.velocity.iter())
        .map(|(r, v)| r.cross(v).dot(&axis))
        .collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| energy[a].total_cmp(&energy[b]));

    // Monotonic |L_z| envelope over energy rank, one value per tie group
    let mut envelope = vec![0.0f64; n];
    let mut running = 0.0f64;
    let mut start = 0;
    while start < n {
        let e = energy[order[start]];
        let mut end = start;
        while end < n && energy[order[end]] == e {
            running = running.max(lz[order[end]].abs());
            end += 1;
        }
        for &p in &order[start..end] {
            envelope[p] = running;
        }
        start = end;
    }

    Ok(lz
        .iter()
        .zip(envelope.iter())
        .map(|(l, env)| if *env > 0.0 { l / env } else { 0.0 })
        .collect())
}

/// Disc fractions from a circularity distribution, relative to the
/// |eps| < cut reference population. `None` when no particle falls inside
/// the reference band.
pub fn circularity_fractions(
    eps: &[f64],
    masses: &[f64],
    disc_threshold: f64,
    cut: f64,
) -> Option<CircularityFractions> {
    let mut reference = 0.0;
    let mut counter = 0.0;
    let mut disc = 0.0;
    for (e, m) in eps.iter().zip(masses.iter()) {
        if e.abs() < cut {
            reference += m;
        }
        if *e < 0.0 {
            counter += m;
        }
        if *e > disc_threshold && *e < cut {
            disc += m;
        }
    }

    if !(reference > 0.0) {
        return None;
    }
    Some(CircularityFractions {
        disc_fraction_counter_rot: 1.0 - 2.0 * counter / reference,
        disc_fraction_circularity: disc / reference,
    })
}

/// Rotation-to-dispersion velocity ratio about the momentum axis.
///
/// The rotation velocity is the mass-weighted mean of v_rot = L_z / R; the
/// dispersion is the one-dimensional sigma of the three cylindrical velocity
/// residuals (rotational, radial, vertical). Particles on the axis (R = 0)
/// have no in-plane directions and are excluded throughout.
pub fn rotation_over_dispersion(set: &ParticleSet) -> AnalysisResult<f64> {
    set.validate()?;
    let axis = rotation_axis(set)?;

    // Cylindrical velocity components per off-axis particle
    let mut vrot = Vec::with_capacity(set.len());
    let mut vrad = Vec::with_capacity(set.len());
    let mut vhei = Vec::with_capacity(set.len());
    let mut mass = Vec::with_capacity(set.len());
    for ((r, v), m) in set.position.iter().zip(set.velocity.iter()).zip(set.mass.iter()) {
        let height = r.dot(&axis);
        let in_plane = r - height * axis;
        let cyl = in_plane.norm();
        if cyl > 0.0 {
            let radial = in_plane / cyl;
            vrot.push(r.cross(v).dot(&axis) / cyl);
            vrad.push(v.dot(&radial));
            vhei.push(v.dot(&axis));
            mass.push(*m);
        }
    }

    let weight: f64 = mass.iter().sum();
    if !(weight > 0.0) {
        return Err(AnalysisError::DegenerateGeometry(
            "no particles off the rotation axis".into(),
        ));
    }

    let mean = |xs: &[f64]| xs.iter().zip(mass.iter()).map(|(x, m)| x * m).sum::<f64>() / weight;
    let mean_rot = mean(&vrot);
    let mean_rad = mean(&vrad);
    let mean_hei = mean(&vhei);

    let mut variance = 0.0;
    for i in 0..vrot.len() {
        let dr = vrot[i] - mean_rot;
        let dd = vrad[i] - mean_rad;
        let dh = vhei[i] - mean_hei;
        variance += mass[i] * (dr * dr + dd * dd + dh * dh);
    }
    let sigma = (variance / weight / 3.0).sqrt();

    if !(sigma > 0.0) {
        return Err(AnalysisError::InvalidInput(
            "zero velocity dispersion".into(),
        ));
    }
    Ok(mean_rot.abs() / sigma)
}

/// Mass-weighted circularity distribution over [-cut, cut], normalised to a
/// probability density. Returns (bin center, density) pairs; circularities
/// outside the band are ignored.
pub fn circularity_distribution(
    eps: &[f64],
    masses: &[f64],
    bins: usize,
    cut: f64,
) -> Vec<(f64, f64)> {
    let total: f64 = masses.iter().sum();
    let width = 2.0 * cut / bins as f64;

    let mut histogram = vec![0.0f64; bins];
    for (e, m) in eps.iter().zip(masses.iter()) {
        if e.abs() < cut && total > 0.0 {
            let bin = (((e + cut) / width) as usize).min(bins - 1);
            histogram[bin] += m / total;
        }
    }

    histogram
        .iter()
        .enumerate()
        .map(|(i, h)| (-cut + (i as f64 + 0.5) * width, h / width))
        .collect()
}

/// Bar strength from Fourier modes of the in-plane positions.
///
/// In the plane perpendicular to `axis`, particles are split into `bins`
/// radial annuli of `bin_width` (kpc); per annulus the m = 2 mode amplitude
/// is a2 = sqrt(alpha2^2 + beta2^2) / alpha0 with alpha0 the particle count
/// and alpha2, beta2 the cos/sin sums of twice the in-plane angle. Empty
/// annuli report a2 = 0. Returns (annulus midpoint radius, a2) pairs.
pub fn bar_strength_profile(
    set: &ParticleSet,
    axis: &NVec3,
    bins: usize,
    bin_width: f64,
) -> Vec<(f64, f64)> {
    let (e1, e2) = plane_basis(axis);

    let mut alpha0 = vec![0.0f64; bins];
    let mut alpha2 = vec![0.0f64; bins];
    let mut beta2 = vec![0.0f64; bins];

    for r in &set.position {
        let px = r.dot(&e1);
        let py = r.dot(&e2);
        let radius = (px * px + py * py).sqrt();

        let bin = (radius / bin_width) as usize;
        if bin < bins && radius > 0.0 {
            let theta = py.atan2(px);
            alpha0[bin] += 1.0;
            alpha2[bin] += (2.0 * theta).cos();
            beta2[bin] += (2.0 * theta).sin();
        }
    }

    (0..bins)
        .map(|i| {
            let mid = (i as f64 + 0.5) * bin_width;
            let a2 = if alpha0[i] > 0.0 {
                (alpha2[i] * alpha2[i] + beta2[i] * beta2[i]).sqrt() / alpha0[i]
            } else {
                0.0
            };
            (mid, a2)
        })
        .collect()
}
