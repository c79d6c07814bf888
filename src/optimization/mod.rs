//! Stacking-sequence optimization
//!
//! [`HauffeOptimizer`] searches the laminate with the fewest plies whose
//! minimal reserve factor reaches one. Ply angles come from a discrete set;
//! candidates are scored by [`objective`], which penalizes infeasible stacks
//! so that any feasible stack ranks ahead of any infeasible one.

mod bounds;
mod gep;
mod individual;
mod optimizer;
mod parameter;
mod problem;

pub use bounds::{
    smeared_superlayer, BoundResult, BoundSearch, SequentialDecisionSearch, SuperlayerSearch,
};
pub use gep::Gep;
pub use individual::{objective, Individual, INFEASIBLE_PENALTY};
pub use optimizer::{
    HauffeOptimizer, OptimizationOutcome, OptimizationProgress, OptimizationResult,
    ProgressObserver,
};
pub use parameter::{DomainErrorPolicy, Operator, OperatorWeights, OptimizationParameter};
pub use problem::OptimizationProblem;
