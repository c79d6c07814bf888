//! Tsai-Wu tensor polynomial criterion

use super::Criterion;
use crate::composite::{Layer, Material, TSAI_WU_F12_STAR};
use crate::error::CltResult;
use crate::math::checked_sqrt;
use crate::results::{ReserveFactor, StressStrainState};

/// Quadratic interaction criterion; the reserve factor solves
/// `a * R^2 + b * R = 1` for the scaled stress state
#[derive(Debug, Clone, Copy, Default)]
pub struct TsaiWu;

impl Criterion for TsaiWu {
    fn name(&self) -> &str {
        "TsaiWu"
    }

    fn reserve_factor(
        &self,
        material: &Material,
        _layer: &Layer,
        state: &StressStrainState,
    ) -> CltResult<ReserveFactor> {
        let (s1, s2, t12) = (state.sigma_1(), state.sigma_2(), state.tau_12());

        let f1 = 1.0 / material.r_par_ten - 1.0 / material.r_par_com;
        let f2 = 1.0 / material.r_nor_ten - 1.0 / material.r_nor_com;
        let f11 = 1.0 / (material.r_par_ten * material.r_par_com);
        let f22 = 1.0 / (material.r_nor_ten * material.r_nor_com);
        let f66 = 1.0 / (material.r_shear * material.r_shear);
        let f12 = material.parameter_or(TSAI_WU_F12_STAR, -0.5) * checked_sqrt(f11 * f22, "Tsai-Wu F12")?;

        let a = f11 * s1 * s1 + f22 * s2 * s2 + f66 * t12 * t12 + 2.0 * f12 * s1 * s2;
        let b = f1 * s1 + f2 * s2;

        let rf = if a.abs() < f64::EPSILON * (f11 + f22 + f66) {
            if b > 0.0 {
                1.0 / b
            } else {
                return Ok(ReserveFactor::undamaged());
            }
        } else {
            (-b + checked_sqrt(b * b + 4.0 * a, "Tsai-Wu")?) / (2.0 * a)
        };

        // fibre-governed when the fibre term carries most of the quadratic effort
        let fiber_share = f11 * s1 * s1 + f1 * s1;
        let matrix_share = f22 * s2 * s2 + f66 * t12 * t12 + f2 * s2;
        if fiber_share >= matrix_share {
            Ok(ReserveFactor::fiber(rf, "Tsai-Wu fiber"))
        } else {
            Ok(ReserveFactor::matrix(rf, "Tsai-Wu matrix"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::FailureType;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_uniaxial_strengths_are_recovered() {
        let mat = Material::cfrp();
        let layer = Layer::new(Arc::new(mat.clone()), 0.0, 0.125);

        let rf = TsaiWu
            .reserve_factor(&mat, &layer, &StressStrainState::from_stress(mat.r_par_ten, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(rf.min_reserve_factor, 1.0, max_relative = 1e-9);
        assert_eq!(rf.failure_type, FailureType::FiberFailure);

        let rf = TsaiWu
            .reserve_factor(&mat, &layer, &StressStrainState::from_stress(0.0, -mat.r_nor_com, 0.0))
            .unwrap();
        assert_relative_eq!(rf.min_reserve_factor, 1.0, max_relative = 1e-9);
        assert_eq!(rf.failure_type, FailureType::MatrixFailure);

        let rf = TsaiWu
            .reserve_factor(&mat, &layer, &StressStrainState::from_stress(0.0, 0.0, mat.r_shear / 2.0))
            .unwrap();
        assert_relative_eq!(rf.min_reserve_factor, 2.0, max_relative = 1e-9);
    }
}
