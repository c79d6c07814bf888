//! Minimal reserve factor of a laminate over plies, surfaces and load cases

use serde::Serialize;
use std::sync::Arc;

use crate::analysis::{CltCalculator, CltSolution};
use crate::composite::Laminate;
use crate::criteria::Criterion;
use crate::error::CltResult;
use crate::loads::LoadCase;
use crate::results::ReserveFactor;

/// Objective used by the optimizer: the smallest reserve factor of a laminate
pub trait MinimalReserveFactorCalculator: Send + Sync {
    fn minimal_reserve_factor(&self, laminate: &Laminate) -> CltResult<f64>;
}

impl<F> MinimalReserveFactorCalculator for F
where
    F: Fn(&Laminate) -> CltResult<f64> + Send + Sync,
{
    fn minimal_reserve_factor(&self, laminate: &Laminate) -> CltResult<f64> {
        self(laminate)
    }
}

/// Reserve factors at both surfaces of a physical ply
#[derive(Debug, Clone, Serialize)]
pub struct PlyReserveFactors {
    pub ply: usize,
    pub upper: ReserveFactor,
    pub lower: ReserveFactor,
}

impl PlyReserveFactors {
    /// The governing (smaller) of both surfaces
    pub fn governing(&self) -> &ReserveFactor {
        if self.lower.min_reserve_factor < self.upper.min_reserve_factor {
            &self.lower
        } else {
            &self.upper
        }
    }
}

/// Solved load case with reserve factors of every ply
#[derive(Debug, Clone, Serialize)]
pub struct CaseAssessment {
    /// Name of the load case
    pub case: String,
    /// Solver output
    pub solution: CltSolution,
    /// Reserve factors per physical ply, top to bottom
    pub reserve_factors: Vec<PlyReserveFactors>,
}

impl CaseAssessment {
    /// Smallest reserve factor of the case
    pub fn min_reserve_factor(&self) -> f64 {
        self.reserve_factors
            .iter()
            .map(|rf| rf.governing().min_reserve_factor)
            .fold(f64::INFINITY, f64::min)
    }
}

/// Applies one criterion to every ply of every load case
#[derive(Clone)]
pub struct LoadCaseReserveFactorCalculator {
    criterion: Arc<dyn Criterion>,
    load_cases: Vec<LoadCase>,
}

impl LoadCaseReserveFactorCalculator {
    pub fn new(criterion: Arc<dyn Criterion>, load_cases: Vec<LoadCase>) -> Self {
        Self {
            criterion,
            load_cases,
        }
    }

    /// Create a calculator for a single load case
    pub fn single(criterion: Arc<dyn Criterion>, load_case: LoadCase) -> Self {
        Self::new(criterion, vec![load_case])
    }

    pub fn criterion(&self) -> &dyn Criterion {
        self.criterion.as_ref()
    }

    pub fn load_cases(&self) -> &[LoadCase] {
        &self.load_cases
    }

    /// Solve one load case and evaluate the criterion at every ply surface
    pub fn assess(&self, laminate: &Laminate, case: &LoadCase) -> CltResult<CaseAssessment> {
        let clt = laminate.clt()?;
        let solution = CltCalculator::solve(laminate, case)?;

        let reserve_factors = solution
            .layers
            .iter()
            .zip(clt.layers())
            .map(|(result, clt_layer)| {
                let layer = &clt_layer.layer;
                Ok(PlyReserveFactors {
                    ply: result.ply,
                    upper: self.criterion.reserve_factor(&layer.material, layer, &result.upper)?,
                    lower: self.criterion.reserve_factor(&layer.material, layer, &result.lower)?,
                })
            })
            .collect::<CltResult<Vec<_>>>()?;

        Ok(CaseAssessment {
            case: case.name.clone(),
            solution,
            reserve_factors,
        })
    }

    /// Assess all load cases
    pub fn assess_all(&self, laminate: &Laminate) -> CltResult<Vec<CaseAssessment>> {
        self.load_cases
            .iter()
            .map(|case| self.assess(laminate, case))
            .collect()
    }
}

impl MinimalReserveFactorCalculator for LoadCaseReserveFactorCalculator {
    fn minimal_reserve_factor(&self, laminate: &Laminate) -> CltResult<f64> {
        let mut min = f64::INFINITY;
        for case in &self.load_cases {
            min = min.min(self.assess(laminate, case)?.min_reserve_factor());
        }
        Ok(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::Material;
    use crate::criteria::Puck;
    use crate::error::CltError;
    use crate::loads::Loads;
    use approx::assert_relative_eq;

    fn laminate(angles: &[f64]) -> Laminate {
        Laminate::from_angles("L", Arc::new(Material::cfrp()), angles, 0.125)
    }

    #[test]
    fn test_minimum_over_load_cases() {
        let lam = laminate(&[0.0, 90.0, 90.0, 0.0]);
        let light = LoadCase::new("light", Loads::membrane(100.0, 0.0, 0.0));
        let heavy = LoadCase::new("heavy", Loads::membrane(200.0, 0.0, 0.0));

        let calc = LoadCaseReserveFactorCalculator::new(Arc::new(Puck), vec![light.clone(), heavy]);
        let both = calc.minimal_reserve_factor(&lam).unwrap();
        let single = LoadCaseReserveFactorCalculator::single(Arc::new(Puck), light)
            .minimal_reserve_factor(&lam)
            .unwrap();

        // linear response: doubling the load halves the reserve factor
        assert_relative_eq!(both, single / 2.0, max_relative = 1e-6);
    }

    #[test]
    fn test_unloaded_laminate_is_infinitely_safe() {
        let calc = LoadCaseReserveFactorCalculator::single(Arc::new(Puck), LoadCase::default());
        assert!(calc.minimal_reserve_factor(&laminate(&[0.0])).unwrap().is_infinite());
    }

    #[test]
    fn test_empty_laminate_propagates_error() {
        let calc = LoadCaseReserveFactorCalculator::single(
            Arc::new(Puck),
            LoadCase::new("c", Loads::membrane(1.0, 0.0, 0.0)),
        );
        assert!(matches!(
            calc.minimal_reserve_factor(&Laminate::new("empty")),
            Err(CltError::EmptyLaminate)
        ));
    }
}
