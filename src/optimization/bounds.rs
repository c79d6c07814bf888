//! Ply-count bound searches that seed the genetic optimizer

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::parameter::OptimizationParameter;
use super::problem::OptimizationProblem;
use crate::composite::{Laminate, Material, PUCK_LAMBDA_MIN};
use crate::error::CltResult;

/// Outcome of a bound search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundResult {
    /// Ply count at which the search stopped
    pub num_layers: usize,
    /// Stack found by the search
    pub angles: Vec<f64>,
    /// Minimal reserve factor of that stack
    pub min_reserve_factor: f64,
}

impl BoundResult {
    pub fn is_feasible(&self) -> bool {
        self.min_reserve_factor >= 1.0
    }
}

/// Strategy estimating a ply count bound before the genetic search starts
pub trait BoundSearch: Send + Sync {
    fn name(&self) -> &str;

    fn search(
        &self,
        problem: &OptimizationProblem,
        params: &OptimizationParameter,
    ) -> CltResult<BoundResult>;
}

/// Greedy upper bound: grow the stack one ply at a time, each time picking
/// the allowed angle with the highest reserve factor, until the stack is
/// feasible or the capacity is reached
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialDecisionSearch;

impl BoundSearch for SequentialDecisionSearch {
    fn name(&self) -> &str {
        "Sequential decision"
    }

    fn search(
        &self,
        problem: &OptimizationProblem,
        params: &OptimizationParameter,
    ) -> CltResult<BoundResult> {
        let angles = params.sorted_angles();
        let mut stack: Vec<f64> = Vec::with_capacity(params.layer_capacity);
        let mut best_rf = 0.0;

        while stack.len() < params.layer_capacity {
            let mut best: Option<(f64, f64)> = None;
            for &angle in &angles {
                stack.push(angle);
                let rf = problem.evaluate(&stack, params.domain_error_policy)?;
                stack.pop();
                if best.map_or(true, |(_, b)| rf > b) {
                    best = Some((angle, rf));
                }
            }
            let Some((angle, rf)) = best else { break };
            stack.push(angle);
            best_rf = rf;
            debug!("Sequential decision: {} plies, RF = {:.4}", stack.len(), rf);
            if rf >= 1.0 {
                break;
            }
        }

        Ok(BoundResult {
            num_layers: stack.len(),
            angles: stack,
            min_reserve_factor: best_rf,
        })
    }
}

/// Lower bound from a homogeneous superlayer: plies of the smeared material
/// are added until the reserve factor reaches one
///
/// Without an explicit material, the superlayer is smeared from one ply of the
/// problem material per allowed angle (see [`smeared_superlayer`]).
#[derive(Debug, Clone, Default)]
pub struct SuperlayerSearch {
    pub material: Option<Arc<Material>>,
    pub angle: f64,
}

impl SuperlayerSearch {
    /// Superlayer of a caller-supplied material
    pub fn new(material: Arc<Material>) -> Self {
        Self {
            material: Some(material),
            angle: 0.0,
        }
    }

    /// Superlayer smeared from the allowed angles at search time
    pub fn smeared() -> Self {
        Self::default()
    }

    /// Orientation of the superlayer plies
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

/// Homogeneous material with the in-plane stiffness of a block holding one
/// ply of the problem material per allowed angle
///
/// Every strength is raised to the larger fibre strength of its sign and
/// weakening is switched off, so the superlayer never fails before a real
/// stack of the same thickness.
pub fn smeared_superlayer(problem: &OptimizationProblem, angles: &[f64]) -> CltResult<Material> {
    let block = Laminate::from_angles(
        "Superlayer block",
        Arc::clone(&problem.material),
        angles,
        problem.ply_thickness,
    );
    let constants = block.clt()?.engineering_constants()?;
    let ply = problem.material.as_ref();

    let r_ten = ply.r_par_ten.max(ply.r_nor_ten);
    let r_com = ply.r_par_com.max(ply.r_nor_com);
    let mut material = Material::new(
        &format!("{} superlayer", ply.name),
        constants.e_x,
        constants.e_y,
        constants.nu_xy,
        constants.g_xy,
    )
    .with_strengths(r_ten, r_com, r_ten, r_com, r_ten.min(r_com) / 2.0)
    .with_density(ply.rho);
    material.additional = ply.additional.clone();
    Ok(material.with_parameter(PUCK_LAMBDA_MIN, 1.0))
}

impl BoundSearch for SuperlayerSearch {
    fn name(&self) -> &str {
        "Superlayer"
    }

    fn search(
        &self,
        problem: &OptimizationProblem,
        params: &OptimizationParameter,
    ) -> CltResult<BoundResult> {
        let material = match &self.material {
            Some(material) => Arc::clone(material),
            None => Arc::new(smeared_superlayer(problem, &params.sorted_angles())?),
        };

        let mut rf = 0.0;
        let mut n = 0;
        while n < params.layer_capacity {
            n += 1;
            let laminate = problem.laminate_with(Arc::clone(&material), &vec![self.angle; n]);
            rf = problem.reserve_factor_of(&laminate, params.domain_error_policy)?;
            if rf >= 1.0 {
                break;
            }
        }
        debug!("Superlayer: {} plies, RF = {:.4}", n, rf);

        Ok(BoundResult {
            num_layers: n,
            angles: vec![self.angle; n],
            min_reserve_factor: rf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Puck;
    use crate::loads::{LoadCase, Loads};
    use crate::reserve::LoadCaseReserveFactorCalculator;

    fn problem_with(loads: Loads) -> OptimizationProblem {
        let calc =
            LoadCaseReserveFactorCalculator::single(Arc::new(Puck), LoadCase::new("design", loads));
        OptimizationProblem::new(Arc::new(Material::cfrp()), 0.125, Arc::new(calc))
    }

    fn problem(n_x: f64) -> OptimizationProblem {
        problem_with(Loads::membrane(n_x, 0.0, 0.0))
    }

    fn stacks(angles: &[f64], n: usize) -> Vec<Vec<f64>> {
        (0..n).fold(vec![Vec::new()], |acc, _| {
            acc.iter()
                .flat_map(|stack| {
                    angles.iter().map(move |&a| {
                        let mut next = stack.clone();
                        next.push(a);
                        next
                    })
                })
                .collect()
        })
    }

    #[test]
    fn test_sequential_decision_reaches_feasibility() {
        let params = OptimizationParameter::default().with_layer_capacity(16);
        let result = SequentialDecisionSearch.search(&problem(1000.0), &params).unwrap();

        assert!(result.is_feasible());
        assert_eq!(result.angles.len(), result.num_layers);
        // uniaxial tension favours fibres along the load
        assert!(result.angles.iter().all(|&a| a == 0.0));
        // 0-degree plies of 0.125 carry 2280 * 0.125 = 285 N/mm each
        assert_eq!(result.num_layers, 4);
    }

    #[test]
    fn test_sequential_decision_stops_at_capacity() {
        let params = OptimizationParameter::default().with_layer_capacity(3);
        let result = SequentialDecisionSearch.search(&problem(1.0e5), &params).unwrap();
        assert_eq!(result.num_layers, 3);
        assert!(!result.is_feasible());
    }

    #[test]
    fn test_superlayer_lower_bound() {
        let params = OptimizationParameter::default().with_layer_capacity(16);
        let search = SuperlayerSearch::new(Arc::new(Material::cfrp()));
        let result = search.search(&problem(1000.0), &params).unwrap();

        assert!(result.is_feasible());
        assert_eq!(result.num_layers, 4);

        let calc = |lam: &Laminate| -> CltResult<f64> { Ok(lam.num_layers() as f64 / 3.0) };
        let counting = OptimizationProblem::new(Arc::new(Material::cfrp()), 0.125, Arc::new(calc));
        assert_eq!(search.search(&counting, &params).unwrap().num_layers, 3);
    }

    #[test]
    fn test_smeared_superlayer_is_quasi_isotropic() {
        let params = OptimizationParameter::default();
        let material = smeared_superlayer(&problem(1.0), &params.sorted_angles()).unwrap();

        assert!((material.e_par - material.e_nor).abs() < 1e-6 * material.e_par);
        let g_iso = material.e_par / (2.0 * (1.0 + material.nu12));
        assert!((material.g - g_iso).abs() < 1e-6 * material.g);
        assert_eq!(material.r_nor_ten, 2280.0);
        assert_eq!(material.r_nor_com, 1440.0);
        assert_eq!(material.r_shear, 720.0);
        assert_eq!(material.parameter(PUCK_LAMBDA_MIN), Some(1.0));
    }

    #[test]
    fn test_smeared_superlayer_stays_below_shear_optimum() {
        let params = OptimizationParameter::default().with_layer_capacity(16);
        let problem = problem_with(Loads::membrane(0.0, 0.0, 300.0));
        let lower = SuperlayerSearch::smeared().search(&problem, &params).unwrap();

        // 720 / (300 / 0.5) = 1.2 while three plies reach only 0.9
        assert_eq!(lower.num_layers, 4);
        assert!((lower.min_reserve_factor - 1.2).abs() < 1e-9);

        let angles = params.sorted_angles();
        for n in 1..lower.num_layers {
            for stack in stacks(&angles, n) {
                let rf = problem.evaluate(&stack, params.domain_error_policy).unwrap();
                assert!(rf < 1.0, "{:?} is feasible with RF = {}", stack, rf);
            }
        }
        let feasible = [-45.0, 45.0, 45.0, 45.0, -45.0];
        assert!(problem.evaluate(&feasible, params.domain_error_policy).unwrap() >= 1.0);
    }
}
