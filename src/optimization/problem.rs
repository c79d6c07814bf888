//! Mapping from angle stacks to evaluated laminates

use log::warn;
use std::sync::Arc;

use super::parameter::DomainErrorPolicy;
use crate::composite::{Laminate, Material};
use crate::error::CltResult;
use crate::reserve::MinimalReserveFactorCalculator;

/// Ply material, ply thickness and objective of a stacking-sequence search
#[derive(Clone)]
pub struct OptimizationProblem {
    pub material: Arc<Material>,
    pub ply_thickness: f64,
    pub symmetric: bool,
    pub calculator: Arc<dyn MinimalReserveFactorCalculator>,
}

impl OptimizationProblem {
    pub fn new(
        material: Arc<Material>,
        ply_thickness: f64,
        calculator: Arc<dyn MinimalReserveFactorCalculator>,
    ) -> Self {
        Self {
            material,
            ply_thickness,
            symmetric: false,
            calculator,
        }
    }

    /// Mirror every candidate about its mid-plane
    pub fn with_symmetry(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    /// Laminate built from the problem's material
    pub fn laminate_for(&self, angles: &[f64]) -> Laminate {
        self.laminate_with(Arc::clone(&self.material), angles)
    }

    /// Laminate built from an arbitrary material with the problem's ply
    /// thickness and symmetry
    pub fn laminate_with(&self, material: Arc<Material>, angles: &[f64]) -> Laminate {
        Laminate::from_angles("Optimized laminate", material, angles, self.ply_thickness)
            .with_symmetry(self.symmetric, false)
    }

    /// Minimal reserve factor of a laminate under the given error policy
    pub fn reserve_factor_of(
        &self,
        laminate: &Laminate,
        policy: DomainErrorPolicy,
    ) -> CltResult<f64> {
        match self.calculator.minimal_reserve_factor(laminate) {
            Err(err) if err.is_numeric_domain() && policy == DomainErrorPolicy::TreatAsInfeasible => {
                warn!(
                    "Treating {}-ply candidate as infeasible: {}",
                    laminate.num_layers(),
                    err
                );
                Ok(0.0)
            }
            other => other,
        }
    }

    /// Minimal reserve factor of the stack `angles`
    pub fn evaluate(&self, angles: &[f64], policy: DomainErrorPolicy) -> CltResult<f64> {
        self.reserve_factor_of(&self.laminate_for(angles), policy)
    }
}

impl std::fmt::Debug for OptimizationProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizationProblem")
            .field("material", &self.material.name)
            .field("ply_thickness", &self.ply_thickness)
            .field("symmetric", &self.symmetric)
            .finish_non_exhaustive()
    }
}
