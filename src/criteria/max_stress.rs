//! Maximum stress criterion

use super::Criterion;
use crate::composite::{Layer, Material};
use crate::error::CltResult;
use crate::results::{ReserveFactor, StressStrainState};

/// Compares every stress component with its strength independently
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxStress;

impl MaxStress {
    /// Stress exposures (component / strength) for fibre, transverse and shear direction
    fn exposures(material: &Material, state: &StressStrainState) -> [(f64, &'static str); 3] {
        let (s1, s2, t12) = (state.sigma_1(), state.sigma_2(), state.tau_12());
        let fiber = if s1 >= 0.0 {
            (s1 / material.r_par_ten, "fiber tension")
        } else {
            (-s1 / material.r_par_com, "fiber compression")
        };
        let transverse = if s2 >= 0.0 {
            (s2 / material.r_nor_ten, "transverse tension")
        } else {
            (-s2 / material.r_nor_com, "transverse compression")
        };
        [fiber, transverse, (t12.abs() / material.r_shear, "shear")]
    }
}

impl Criterion for MaxStress {
    fn name(&self) -> &str {
        "MaxStress"
    }

    fn reserve_factor(
        &self,
        material: &Material,
        _layer: &Layer,
        state: &StressStrainState,
    ) -> CltResult<ReserveFactor> {
        let exposures = Self::exposures(material, state);
        let (index, (max, name)) = exposures
            .iter()
            .copied()
            .enumerate()
            .fold((0, (0.0, "")), |best, (i, e)| if e.0 > best.1 .0 { (i, e) } else { best });

        if max <= 0.0 {
            return Ok(ReserveFactor::undamaged());
        }
        if index == 0 {
            Ok(ReserveFactor::fiber(1.0 / max, name))
        } else {
            Ok(ReserveFactor::matrix(1.0 / max, name))
        }
    }
}
