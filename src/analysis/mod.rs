//! Classical laminated plate theory: stiffness engine and solver

mod solver;
mod stiffness;

pub use solver::{CltCalculator, CltSolution};
pub use stiffness::{CltLaminate, CltLayer, EngineeringConstants};
