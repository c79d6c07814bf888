//! CLT Laminate - Composite laminate analysis and stacking-sequence optimization
//!
//! This library provides:
//! - Classical laminated plate theory (ABD matrix, mixed load/strain solve)
//! - Ply stresses and strains at the upper and lower surface of every ply
//! - Failure criteria (Puck, maximum stress, Tsai-Wu) and reserve factors
//! - A genetic optimizer searching the lightest feasible stacking sequence
//!
//! ## Example
//! ```rust
//! use clt_laminate::prelude::*;
//! use std::sync::Arc;
//!
//! let material = Arc::new(Material::cfrp());
//! let laminate = Laminate::from_angles("L1", material, &[70.0, 90.0, 10.0, 0.0], 0.125);
//!
//! // Nx = 100 N/mm, Mx = 15 N
//! let case = LoadCase::new("Case 1", Loads::new(100.0, 0.0, 0.0, 15.0, 0.0, 0.0));
//! let solution = CltCalculator::solve(&laminate, &case).unwrap();
//! println!("eps_x = {:e}", solution.strains.eps_x);
//!
//! // Minimal Puck reserve factor
//! let calc = LoadCaseReserveFactorCalculator::single(Arc::new(Puck), case);
//! let rf = calc.minimal_reserve_factor(&laminate).unwrap();
//! assert!(rf > 0.0);
//! ```

pub mod analysis;
pub mod composite;
pub mod criteria;
pub mod error;
pub mod loads;
pub mod math;
pub mod optimization;
pub mod report;
pub mod reserve;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{CltCalculator, CltLaminate, CltSolution, EngineeringConstants};
    pub use crate::composite::{Laminate, Layer, Material};
    pub use crate::criteria::{Criterion, MaxStress, Puck, TsaiWu};
    pub use crate::error::{CltError, CltResult};
    pub use crate::loads::{LoadCase, Loads, Strains};
    pub use crate::optimization::{
        DomainErrorPolicy, HauffeOptimizer, Individual, OperatorWeights, OptimizationOutcome,
        OptimizationParameter, OptimizationProblem, OptimizationResult,
    };
    pub use crate::reserve::{LoadCaseReserveFactorCalculator, MinimalReserveFactorCalculator};
    pub use crate::results::{FailureType, LayerResult, ReserveFactor, StressStrainState};
}
