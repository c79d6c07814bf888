//! Candidate stacking sequences

use serde::{Deserialize, Serialize};

/// Objective penalty added to infeasible candidates
pub const INFEASIBLE_PENALTY: f64 = 100.0;

/// Objective of a candidate: its ply count, plus the penalty when the
/// minimal reserve factor is below one
pub fn objective(num_layers: usize, min_reserve_factor: f64) -> f64 {
    if min_reserve_factor >= 1.0 {
        num_layers as f64
    } else {
        num_layers as f64 + INFEASIBLE_PENALTY
    }
}

/// One candidate stacking sequence of the genetic search
///
/// `angles` always has the full layer capacity; only the first `num_layers`
/// entries form the stack, the rest is carried along for crossover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub num_layers: usize,
    pub angles: Vec<f64>,
    pub objective: f64,
    pub min_reserve_factor: f64,
}

impl Individual {
    /// Create an unevaluated individual
    pub fn new(num_layers: usize, angles: Vec<f64>) -> Self {
        let num_layers = num_layers.clamp(1, angles.len().max(1));
        Self {
            num_layers,
            angles,
            objective: objective(num_layers, 0.0),
            min_reserve_factor: 0.0,
        }
    }

    /// The active part of the stack
    pub fn stack(&self) -> &[f64] {
        &self.angles[..self.num_layers.min(self.angles.len())]
    }

    /// Store an evaluation result; NaN counts as infeasible
    pub fn set_reserve_factor(&mut self, min_reserve_factor: f64) {
        let rf = if min_reserve_factor.is_nan() { 0.0 } else { min_reserve_factor };
        self.min_reserve_factor = rf;
        self.objective = objective(self.num_layers, rf);
    }

    pub fn is_feasible(&self) -> bool {
        self.min_reserve_factor >= 1.0
    }

    /// Number of differing angles over the shorter stack plus the
    /// difference in ply count
    pub fn distance(&self, other: &Individual) -> usize {
        let differing = self
            .stack()
            .iter()
            .zip(other.stack())
            .filter(|(a, b)| a != b)
            .count();
        differing + self.num_layers.abs_diff(other.num_layers)
    }

    /// Champion ordering: feasible beats infeasible, then fewer plies, then
    /// higher reserve factor
    pub fn is_better_than(&self, other: &Individual) -> bool {
        match (self.is_feasible(), other.is_feasible()) {
            (true, false) => true,
            (false, true) => false,
            _ if self.num_layers != other.num_layers => self.num_layers < other.num_layers,
            _ => self.min_reserve_factor > other.min_reserve_factor,
        }
    }

    /// Replacement ordering used by steady-state selection
    ///
    /// A child replaces a parent only as a strict improvement under
    /// [`Individual::is_better_than`]; between two infeasible candidates the
    /// smaller stack wins and the reserve factor only breaks ply-count ties.
    pub fn replaces(&self, parent: &Individual) -> bool {
        self.is_better_than(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated(angles: &[f64], rf: f64) -> Individual {
        let mut ind = Individual::new(angles.len(), angles.to_vec());
        ind.set_reserve_factor(rf);
        ind
    }

    #[test]
    fn test_penalty() {
        assert_eq!(objective(8, 1.0), 8.0);
        assert_eq!(objective(8, 0.99), 108.0);
        // any infeasible candidate is worse than any feasible one
        assert!(objective(1, 0.5) > objective(60, 1.5));
    }

    #[test]
    fn test_copy_isolation() {
        let original = evaluated(&[0.0, 45.0, 90.0], 1.2);
        let mut copy = original.clone();
        copy.angles[1] = -45.0;
        copy.num_layers = 2;
        assert_eq!(original.angles, vec![0.0, 45.0, 90.0]);
        assert_eq!(original.num_layers, 3);
    }

    #[test]
    fn test_distance() {
        let a = evaluated(&[0.0, 45.0, 90.0, 0.0], 1.0);
        let mut b = evaluated(&[0.0, -45.0, 90.0, 0.0], 1.0);
        assert_eq!(a.distance(&b), 1);
        b.num_layers = 2;
        assert_eq!(a.distance(&b), 1 + 2);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_orderings() {
        let feasible_small = evaluated(&[0.0; 4], 1.1);
        let feasible_large = evaluated(&[0.0; 6], 3.0);
        let infeasible = evaluated(&[0.0; 2], 0.9);
        let infeasible_larger = evaluated(&[0.0; 5], 0.95);

        assert!(feasible_small.is_better_than(&feasible_large));
        assert!(feasible_large.is_better_than(&infeasible));
        assert!(!infeasible.is_better_than(&feasible_large));

        let stronger = evaluated(&[0.0; 4], 1.5);
        assert!(stronger.is_better_than(&feasible_small));
        assert!(!feasible_small.is_better_than(&feasible_small.clone()));

        assert!(!infeasible_larger.replaces(&infeasible));
        assert!(!infeasible_larger.is_better_than(&infeasible));
        let stronger_infeasible = evaluated(&[0.0; 2], 0.95);
        assert!(stronger_infeasible.replaces(&infeasible));
    }

    #[test]
    fn test_larger_infeasible_child_does_not_replace_compact_parent() {
        let parent = evaluated(&[0.0; 3], 0.5);
        let child = evaluated(&[0.0; 10], 0.6);
        assert_eq!(parent.objective, 103.0);
        assert_eq!(child.objective, 110.0);
        assert!(!child.replaces(&parent));
        assert!(parent.replaces(&child));
    }
}
