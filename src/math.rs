//! Mathematical utilities for laminate calculations

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, Vector3, Vector6};

use crate::error::{CltError, CltResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;
pub type Vec6 = Vector6<f64>;

/// Plane-stress reduced stiffness matrix of an orthotropic ply in its
/// material axes (1 = fibre direction, 2 = transverse, 6 = in-plane shear).
pub fn reduced_stiffness(e_par: f64, e_nor: f64, nu12: f64, g12: f64) -> Mat3 {
    let nu21 = nu12 * e_nor / e_par;
    let denom = 1.0 - nu12 * nu21;

    let q11 = e_par / denom;
    let q22 = e_nor / denom;
    let q12 = nu12 * e_nor / denom;

    Mat3::new(
        q11, q12, 0.0,
        q12, q22, 0.0,
        0.0, 0.0, g12,
    )
}

/// Strain transformation from laminate axes into ply axes for engineering
/// shear strains.
///
/// `angle` is the ply angle in degrees, measured counter-clockwise from the
/// laminate x-axis to the fibre direction.
pub fn strain_transformation(angle: f64) -> Mat3 {
    let (s, c) = angle.to_radians().sin_cos();
    let cs = c * s;

    Mat3::new(
        c * c, s * s, cs,
        s * s, c * c, -cs,
        -2.0 * cs, 2.0 * cs, c * c - s * s,
    )
}

/// Stress transformation from laminate axes into ply axes.
pub fn stress_transformation(angle: f64) -> Mat3 {
    let (s, c) = angle.to_radians().sin_cos();
    let cs = c * s;

    Mat3::new(
        c * c, s * s, 2.0 * cs,
        s * s, c * c, -2.0 * cs,
        -cs, cs, c * c - s * s,
    )
}

/// Rotate a ply stiffness into laminate axes: `Qbar = T_eps^T * Q * T_eps`
pub fn transformed_stiffness(q: &Mat3, angle: f64) -> Mat3 {
    let t = strain_transformation(angle);
    t.transpose() * q * t
}

/// Build the 6x6 ABD matrix from its 3x3 blocks
pub fn assemble_abd(a: &Mat3, b: &Mat3, d: &Mat3) -> Mat6 {
    let mut abd = Mat6::zeros();
    abd.fixed_view_mut::<3, 3>(0, 0).copy_from(a);
    abd.fixed_view_mut::<3, 3>(0, 3).copy_from(b);
    abd.fixed_view_mut::<3, 3>(3, 0).copy_from(&b.transpose());
    abd.fixed_view_mut::<3, 3>(3, 3).copy_from(d);
    abd
}

/// Extract the 3x3 block starting at (`row`, `col`) of a 6x6 matrix
pub fn block(m: &Mat6, row: usize, col: usize) -> Mat3 {
    m.fixed_view::<3, 3>(row, col).into_owned()
}

/// Invert a 6x6 matrix, failing on singular or non-finite results
pub fn invert6(m: &Mat6) -> CltResult<Mat6> {
    let inv = m.try_inverse().ok_or(CltError::SingularMatrix)?;
    if inv.iter().all(|v| v.is_finite()) {
        Ok(inv)
    } else {
        Err(CltError::SingularMatrix)
    }
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone()
        .lu()
        .solve(b)
        .filter(|x| x.iter().all(|v| v.is_finite()))
}

/// Square root that refuses negative arguments instead of returning NaN
pub fn checked_sqrt(value: f64, context: &'static str) -> CltResult<f64> {
    if value < 0.0 || value.is_nan() {
        return Err(CltError::NegativeSqrt { context, value });
    }
    Ok(value.sqrt())
}

/// Check matrix symmetry relative to its largest entry
pub fn is_symmetric(m: &Mat6, rel_tol: f64) -> bool {
    let scale = m.amax().max(f64::MIN_POSITIVE);
    (0..6).all(|i| (0..6).all(|j| (m[(i, j)] - m[(j, i)]).abs() <= rel_tol * scale))
}
