//! Frame alignment to a rotation axis
//!
//! Two interchangeable strategies, both producing an [`OrientationFrame`]:
//! - principal axes of the mass moment-of-inertia tensor, oriented
//!   consistently with a reference angular-momentum direction
//! - a rotation placing the total angular-momentum vector along a chosen
//!   coordinate axis
//!
//! Applying a frame rotates every position and velocity with one orthogonal
//! 3x3 transform, so vector norms and pairwise distances are preserved

use nalgebra::{Matrix3, SymmetricEigen};

use crate::error::{AnalysisError, AnalysisResult};
use crate::kinematics::states::{NVec3, ParticleSet};

/// Three mutually orthogonal unit vectors defining a rotation from the
/// original coordinate system. Rows of the rotation matrix, in x, y, z order.
#[derive(Debug, Clone)]
pub struct OrientationFrame {
    pub x: NVec3,
    pub y: NVec3,
    pub z: NVec3,
}

/// Which coordinate axis the total angular momentum is rotated onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignAxis {
    X,
    Z,
}

impl OrientationFrame {
    /// The orthogonal transform with the basis vectors as rows, so that
    /// `rotation_matrix() * r` expresses `r` in the new frame
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_rows(&[self.x.transpose(), self.y.transpose(), self.z.transpose()])
    }

    /// Rotate every position and velocity into this frame, returning a new
    /// particle set
    pub fn rotate(&self, set: &ParticleSet) -> ParticleSet {
        let rot = self.rotation_matrix();
        ParticleSet {
            position: set.position.iter().map(|r| rot * r).collect(),
            velocity: set.velocity.iter().map(|v| rot * v).collect(),
            mass: set.mass.clone(),
            binding_energy: set.binding_energy.clone(),
        }
    }
}

/// Principal axes of the mass moment-of-inertia tensor, disambiguated
/// against a reference angular-momentum direction `l_ref`.
///
/// Selection rule (kept exactly for reproducibility with earlier analyses):
/// - x is the eigenvector with the largest |projection| onto `l_ref`,
///   sign-flipped so that x . l_ref > 0
/// - y is the larger-eigenvalue member of the remaining pair, sign-flipped
///   so its first component is non-negative (a deterministic tie-break with
///   no physical meaning)
/// - z = x cross y
pub fn principal_axes(set: &ParticleSet, l_ref: &NVec3) -> AnalysisResult<OrientationFrame> {
    set.validate()?;

    let l_norm = l_ref.norm();
    if !(l_norm > 0.0) {
        return Err(AnalysisError::DegenerateGeometry(
            "zero reference direction for axis disambiguation".into(),
        ));
    }

    // Mass moment-of-inertia tensor:
    //   I_xx = sum m (y^2 + z^2)   (cyclic)
    //   I_xy = -sum m x y          (symmetric off-diagonals)
    let mut tensor = Matrix3::zeros();
    for (r, m) in set.position.iter().zip(set.mass.iter()) {
        tensor[(0, 0)] += m * (r.y * r.y + r.z * r.z);
        tensor[(1, 1)] += m * (r.x * r.x + r.z * r.z);
        tensor[(2, 2)] += m * (r.x * r.x + r.y * r.y);
        tensor[(0, 1)] -= m * r.x * r.y;
        tensor[(0, 2)] -= m * r.x * r.z;
        tensor[(1, 2)] -= m * r.y * r.z;
    }
    tensor[(1, 0)] = tensor[(0, 1)];
    tensor[(2, 0)] = tensor[(0, 2)];
    tensor[(2, 1)] = tensor[(1, 2)];

    let eigen = SymmetricEigen::try_new(tensor, 1.0e-12, 200).ok_or_else(|| {
        AnalysisError::DegenerateGeometry("inertia tensor eigen-decomposition did not converge".into())
    })?;

    let scale = eigen.eigenvalues.iter().fold(0.0f64, |acc, v: &f64| acc.max(v.abs()));
    if !(scale > 0.0) {
        // All particles coincident with the centre: the tensor vanishes and
        // no axes exist
        return Err(AnalysisError::DegenerateGeometry(
            "vanishing inertia tensor".into(),
        ));
    }

    let axes: Vec<NVec3> = (0..3).map(|i| eigen.eigenvectors.column(i).into_owned()).collect();

    // Largest |projection| onto the reference direction picks the x axis
    let projections: Vec<f64> = axes.iter().map(|a| a.dot(l_ref).abs()).collect();
    let ix = (0..3)
        .max_by(|&a, &b| projections[a].total_cmp(&projections[b]))
        .unwrap_or(0);

    let mut x = axes[ix];
    if x.dot(l_ref) < 0.0 {
        x = -x;
    }

    // Remaining pair, ordered by eigenvalue: the larger one becomes y
    let rest: Vec<usize> = (0..3).filter(|&i| i != ix).collect();
    let iy = if eigen.eigenvalues[rest[0]] >= eigen.eigenvalues[rest[1]] {
        rest[0]
    } else {
        rest[1]
    };

    let mut y = axes[iy];
    if y.x < 0.0 {
        y = -y;
    }

    let z = x.cross(&y);

    // Symmetric eigenvectors come out orthonormal; anything else here means
    // the decomposition went numerically bad
    let orthonormal = x.dot(&y).abs() < 1.0e-8
        && (x.norm() - 1.0).abs() < 1.0e-8
        && (y.norm() - 1.0).abs() < 1.0e-8;
    if !orthonormal {
        return Err(AnalysisError::DegenerateGeometry(
            "principal axes are not orthonormal".into(),
        ));
    }

    Ok(OrientationFrame { x, y, z })
}

/// A rotation placing the total angular momentum along the chosen output
/// axis, with the basis completed by Gram-Schmidt against a non-parallel
/// coordinate axis. Used when only momentum alignment (not a full
/// principal-axis decomposition) is needed.
pub fn momentum_frame(set: &ParticleSet, axis: AlignAxis) -> AnalysisResult<OrientationFrame> {
    set.validate()?;

    let momentum = set.total_angular_momentum();
    let norm = momentum.norm();
    if !(norm > 0.0) {
        return Err(AnalysisError::DegenerateGeometry(
            "zero total angular momentum".into(),
        ));
    }

    let target = momentum / norm;
    let (e1, e2) = plane_basis(&target);

    // Both variants are right-handed: e1 x e2 = target by construction
    Ok(match axis {
        AlignAxis::Z => OrientationFrame { x: e1, y: e2, z: target },
        AlignAxis::X => OrientationFrame { x: target, y: e1, z: e2 },
    })
}

/// Complete `axis` to an orthonormal right-handed basis (e1, e2, axis),
/// Gram-Schmidt against whichever coordinate axis is least parallel
pub(crate) fn plane_basis(axis: &NVec3) -> (NVec3, NVec3) {
    let helper = if axis.x.abs() < 0.9 {
        NVec3::new(1.0, 0.0, 0.0)
    } else {
        NVec3::new(0.0, 1.0, 0.0)
    };
    let e1 = (helper - axis * helper.dot(axis)).normalize();
    let e2 = axis.cross(&e1);
    (e1, e2)
}
