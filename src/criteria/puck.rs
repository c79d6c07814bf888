//! Puck's action-plane criterion for unidirectional plies (plane stress)
//!
//! Fibre failure uses the maximum fibre stress. Inter-fibre failure is split
//! into three modes:
//! - mode A: transverse tension
//! - mode B: moderate transverse compression, fracture plane at 0°
//! - mode C: high transverse compression, inclined fracture plane
//!
//! The matrix effort is weakened when the fibre stress at failure exceeds
//! `a0` times the fibre strength (elliptic weakening down to `lambda_min`).

use super::Criterion;
use crate::composite::{Layer, Material, PUCK_A0, PUCK_LAMBDA_MIN, PUCK_PSPD, PUCK_PSPZ};
use crate::error::CltResult;
use crate::math::checked_sqrt;
use crate::results::{ReserveFactor, StressStrainState};

pub const FF_TENSION: &str = "FF tension";
pub const FF_COMPRESSION: &str = "FF compression";
pub const IFF_MODE_A: &str = "IFF mode A";
pub const IFF_MODE_B: &str = "IFF mode B";
pub const IFF_MODE_C: &str = "IFF mode C";

/// Inclination and weakening parameters of the criterion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuckParameters {
    /// Inclination p⊥∥(+) for transverse tension
    pub pspz: f64,
    /// Inclination p⊥∥(-) for transverse compression
    pub pspd: f64,
    /// Weakening onset as fraction of the fibre strength
    pub a0: f64,
    /// Minimal weakening factor at fibre failure
    pub lambda_min: f64,
}

impl PuckParameters {
    /// Read the parameters from a material, falling back to common CFRP values
    pub fn from_material(material: &Material) -> Self {
        Self {
            pspz: material.parameter_or(PUCK_PSPZ, 0.35),
            pspd: material.parameter_or(PUCK_PSPD, 0.30),
            a0: material.parameter_or(PUCK_A0, 0.5),
            lambda_min: material.parameter_or(PUCK_LAMBDA_MIN, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatrixMode {
    A,
    B,
    C,
}

impl MatrixMode {
    fn name(self) -> &'static str {
        match self {
            Self::A => IFF_MODE_A,
            Self::B => IFF_MODE_B,
            Self::C => IFF_MODE_C,
        }
    }
}

/// Puck failure criterion
#[derive(Debug, Clone, Copy, Default)]
pub struct Puck;

impl Puck {
    pub fn new() -> Self {
        Self
    }

    /// Reserve factor of a plane stress state in ply axes
    pub fn evaluate(
        &self,
        material: &Material,
        sigma_1: f64,
        sigma_2: f64,
        tau_21: f64,
    ) -> CltResult<ReserveFactor> {
        if sigma_1 == 0.0 && sigma_2 == 0.0 && tau_21 == 0.0 {
            return Ok(ReserveFactor::undamaged());
        }

        let p = PuckParameters::from_material(material);
        let r_shear = material.r_shear;
        let r_nor_ten = material.r_nor_ten;
        let r_nor_com = material.r_nor_com;

        // fibre effort
        let (f_fb, r_par) = if sigma_1 >= 0.0 {
            (sigma_1 / material.r_par_ten, material.r_par_ten)
        } else {
            (-sigma_1 / material.r_par_com, material.r_par_com)
        };

        // fracture resistance of the action plane against transverse shear
        let root = checked_sqrt(1.0 + 2.0 * p.pspd * r_nor_com / r_shear, "Puck R⊥⊥A")?;
        let r_a = r_shear / (2.0 * p.pspd) * (root - 1.0);
        let pssd = p.pspd * r_a / r_shear;
        let tau_21c = r_shear * checked_sqrt(1.0 + 2.0 * pssd, "Puck tau21c")?;

        let (mut f_zfb, mode) = if sigma_2 > 0.0 {
            let a = ((1.0 - p.pspz * r_nor_ten / r_shear) / r_nor_ten).powi(2);
            let b = (1.0 / r_shear).powi(2);
            let c = p.pspz / r_shear;
            let root = checked_sqrt(a * sigma_2 * sigma_2 + b * tau_21 * tau_21, "Puck mode A")?;
            (root + c * sigma_2, MatrixMode::A)
        } else if sigma_2 == 0.0 || sigma_2.abs() * tau_21c.abs() <= r_a * tau_21.abs() {
            let a = (p.pspd / r_shear).powi(2);
            let b = (1.0 / r_shear).powi(2);
            let c = p.pspd / r_shear;
            let root = checked_sqrt(a * sigma_2 * sigma_2 + b * tau_21 * tau_21, "Puck mode B")?;
            (root + c * sigma_2, MatrixMode::B)
        } else {
            let a = (1.0 / r_nor_com).powi(2);
            let b = (1.0 / (2.0 * (1.0 + pssd) * r_shear)).powi(2);
            let c = -r_nor_com;
            ((a * sigma_2 * sigma_2 + b * tau_21 * tau_21) * c / sigma_2, MatrixMode::C)
        };

        // weakening of the matrix by high fibre stress
        let rf_temp_min = 1.0 / f_fb.max(f_zfb);
        if rf_temp_min * sigma_1.abs() > p.a0 * r_par
            && f_zfb > 0.0
            && f_fb > 0.0
            && p.lambda_min < 1.0
        {
            let delta = f_zfb / f_fb;
            let a = (1.0 - p.a0)
                / checked_sqrt(1.0 - p.lambda_min * p.lambda_min, "Puck weakening ellipse")?;
            let root = checked_sqrt(
                delta * delta * (a * a - p.a0 * p.a0) + 1.0,
                "Puck weakening factor",
            )?;
            let lambda = delta * (a * root + p.a0) / ((delta * a).powi(2) + 1.0);
            f_zfb /= lambda;
        }

        if f_fb >= f_zfb {
            let name = if sigma_1 >= 0.0 { FF_TENSION } else { FF_COMPRESSION };
            Ok(ReserveFactor::fiber(1.0 / f_fb, name))
        } else {
            Ok(ReserveFactor::matrix(1.0 / f_zfb, mode.name()))
        }
    }

    /// Points of the inter-fibre fracture envelope in the (sigma_2, tau_21)
    /// plane at sigma_1 = 0, obtained by scaling `n` unit stress directions
    /// with their reserve factor
    pub fn iff_envelope(&self, material: &Material, n: usize) -> CltResult<Vec<[f64; 2]>> {
        (0..n)
            .map(|k| {
                let phi = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
                let (s, c) = phi.sin_cos();
                let rf = self.evaluate(material, 0.0, c, s)?.min_reserve_factor;
                Ok([rf * c, rf * s])
            })
            .collect()
    }
}

impl Criterion for Puck {
    fn name(&self) -> &str {
        "Puck"
    }

    fn reserve_factor(
        &self,
        material: &Material,
        _layer: &Layer,
        state: &StressStrainState,
    ) -> CltResult<ReserveFactor> {
        self.evaluate(material, state.sigma_1(), state.sigma_2(), state.tau_12())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CltError;
    use crate::results::FailureType;
    use approx::assert_relative_eq;

    fn material() -> Material {
        Material::cfrp()
    }

    #[test]
    fn test_zero_stress_is_undamaged() {
        let rf = Puck.evaluate(&material(), 0.0, 0.0, 0.0).unwrap();
        assert!(rf.min_reserve_factor.is_infinite());
        assert_eq!(rf.failure_name, "");
        assert_eq!(rf.failure_type, FailureType::Undamaged);
    }

    #[test]
    fn test_fiber_dominance() {
        let mat = material();
        let rf = Puck.evaluate(&mat, 1000.0, 10.0, 5.0).unwrap();
        assert_eq!(rf.failure_type, FailureType::FiberFailure);
        assert_eq!(rf.failure_name, FF_TENSION);
        assert_relative_eq!(rf.min_reserve_factor, mat.r_par_ten / 1000.0, max_relative = 1e-12);

        let rf = Puck.evaluate(&mat, -720.0, -5.0, 2.0).unwrap();
        assert_eq!(rf.failure_name, FF_COMPRESSION);
        assert_relative_eq!(rf.min_reserve_factor, 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pure_transverse_tension_and_shear() {
        let mat = material();
        let rf = Puck.evaluate(&mat, 0.0, mat.r_nor_ten, 0.0).unwrap();
        assert_eq!(rf.failure_name, IFF_MODE_A);
        assert_relative_eq!(rf.min_reserve_factor, 1.0, max_relative = 1e-12);

        let rf = Puck.evaluate(&mat, 0.0, 0.0, mat.r_shear).unwrap();
        assert_eq!(rf.failure_name, IFF_MODE_B);
        assert_relative_eq!(rf.min_reserve_factor, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_pure_transverse_compression_is_mode_c() {
        let mat = material();
        let rf = Puck.evaluate(&mat, 0.0, -mat.r_nor_com, 0.0).unwrap();
        assert_eq!(rf.failure_name, IFF_MODE_C);
        assert_eq!(rf.failure_type, FailureType::MatrixFailure);
        assert_relative_eq!(rf.min_reserve_factor, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_mode_b_to_c_transition() {
        let mat = material();
        let rf_c = Puck.evaluate(&mat, 0.0, -100.0, 20.0).unwrap();
        assert_eq!(rf_c.failure_name, IFF_MODE_C);
        assert_relative_eq!(rf_c.min_reserve_factor, 2.158817, epsilon = 1e-5);

        let rf = Puck.evaluate(&mat, 0.0, -20.0, 60.0).unwrap();
        assert_eq!(rf.failure_name, IFF_MODE_B);
    }

    #[test]
    fn test_reserve_factor_is_continuous_across_mode_boundaries() {
        let mat = material();
        let p = PuckParameters::from_material(&mat);
        let root = (1.0 + 2.0 * p.pspd * mat.r_nor_com / mat.r_shear).sqrt();
        let r_a = mat.r_shear / (2.0 * p.pspd) * (root - 1.0);
        let tau_c = mat.r_shear * (1.0 + 2.0 * p.pspd * r_a / mat.r_shear).sqrt();

        // B/C boundary at tau_21 = 60
        let tau = 60.0;
        let boundary = -r_a * tau / tau_c;
        assert_relative_eq!(boundary, -54.3422, epsilon = 1e-3);
        let inside = Puck.evaluate(&mat, 0.0, boundary * (1.0 - 1e-6), tau).unwrap();
        let outside = Puck.evaluate(&mat, 0.0, boundary * (1.0 + 1e-6), tau).unwrap();
        assert_eq!(inside.failure_name, IFF_MODE_B);
        assert_eq!(outside.failure_name, IFF_MODE_C);
        assert_relative_eq!(
            inside.min_reserve_factor,
            outside.min_reserve_factor,
            max_relative = 1e-5
        );
        assert_relative_eq!(inside.min_reserve_factor, 1.547761, epsilon = 1e-5);

        // A/B boundary at sigma_2 = 0
        let above = Puck.evaluate(&mat, 0.0, 1e-6, tau).unwrap();
        let at = Puck.evaluate(&mat, 0.0, 0.0, tau).unwrap();
        let below = Puck.evaluate(&mat, 0.0, -1e-6, tau).unwrap();
        assert_eq!(above.failure_name, IFF_MODE_A);
        assert_eq!(at.failure_name, IFF_MODE_B);
        assert_eq!(below.failure_name, IFF_MODE_B);
        for rf in [&above, &at, &below] {
            assert_relative_eq!(rf.min_reserve_factor, 71.0 / 60.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_weakening_lowers_matrix_reserve() {
        let mat = material();
        let weakened = Puck.evaluate(&mat, -1108.81, -10.42, -41.04).unwrap();
        assert_eq!(weakened.failure_name, IFF_MODE_B);
        assert_relative_eq!(weakened.min_reserve_factor, 1.217677, epsilon = 1e-5);

        let unweakened = Puck.evaluate(&mat, 0.0, -10.42, -41.04).unwrap();
        assert!(weakened.min_reserve_factor < unweakened.min_reserve_factor);
    }

    #[test]
    fn test_negative_sqrt_is_reported() {
        let mat = material().with_parameter(PUCK_PSPD, -5.0);
        let err = Puck.evaluate(&mat, 0.0, -50.0, 10.0).unwrap_err();
        assert!(matches!(err, CltError::NegativeSqrt { .. }));
        assert!(err.is_numeric_domain());
    }

    #[test]
    fn test_envelope_points_lie_on_fracture_surface() {
        let mat = material();
        let envelope = Puck.iff_envelope(&mat, 36).unwrap();
        assert_eq!(envelope.len(), 36);
        for [s2, t21] in envelope {
            let rf = Puck.evaluate(&mat, 0.0, s2, t21).unwrap();
            assert_relative_eq!(rf.min_reserve_factor, 1.0, max_relative = 1e-9);
        }
    }
}
