//! Optimizer configuration

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{CltError, CltResult};

/// Genetic operator producing a share of the offspring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Mutation,
    OnePointCrossover,
    TwoPointCrossover,
    Permutation,
    AngleShift,
}

/// Number of offspring produced per operator and generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorWeights {
    pub mutation: usize,
    pub one_point_crossover: usize,
    pub two_point_crossover: usize,
    pub permutation: usize,
    pub angle_shift: usize,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            mutation: 20,
            one_point_crossover: 10,
            two_point_crossover: 10,
            permutation: 10,
            angle_shift: 10,
        }
    }
}

impl OperatorWeights {
    /// Total number of offspring per generation
    pub fn total(&self) -> usize {
        self.mutation
            + self.one_point_crossover
            + self.two_point_crossover
            + self.permutation
            + self.angle_shift
    }

    /// Disjoint, consecutive index ranges of the offspring array per operator
    pub fn ranges(&self) -> [(Operator, Range<usize>); 5] {
        let counts = [
            (Operator::Mutation, self.mutation),
            (Operator::OnePointCrossover, self.one_point_crossover),
            (Operator::TwoPointCrossover, self.two_point_crossover),
            (Operator::Permutation, self.permutation),
            (Operator::AngleShift, self.angle_shift),
        ];
        let mut start = 0;
        counts.map(|(op, count)| {
            let range = start..start + count;
            start += count;
            (op, range)
        })
    }
}

/// What to do when evaluating a candidate hits a numeric-domain error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainErrorPolicy {
    /// Abort the optimization with the error
    #[default]
    Abort,
    /// Treat the candidate as infeasible and continue
    TreatAsInfeasible,
}

/// Tunable knobs of the stacking-sequence optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationParameter {
    /// Number of parents in the population
    pub population_size: usize,
    /// Offspring per operator
    pub operator_weights: OperatorWeights,
    /// Probability of resampling a ply count or an angle
    pub p_mut: f64,
    /// Probability of shifting an angle to its neighbour
    pub p_shift: f64,
    /// Generation cap
    pub max_generations: usize,
    /// Stop after this many generations without a new champion
    pub stop_gens: usize,
    /// Re-bracket and reseed after this many generations without improvement
    pub stagnation_limit: usize,
    /// Slack around the bound searches and the champion's ply count
    pub delta_max_layer_num: usize,
    /// Smallest ply count of random candidates
    pub min_layer_num: usize,
    /// Largest ply count of random candidates
    pub max_layer_num: usize,
    /// Hard upper limit on the ply count
    pub layer_capacity: usize,
    /// Allowed ply angles in degrees
    pub angles: Vec<f64>,
    /// Handling of numeric-domain errors during evaluation
    pub domain_error_policy: DomainErrorPolicy,
}

impl Default for OptimizationParameter {
    fn default() -> Self {
        Self {
            population_size: 20,
            operator_weights: OperatorWeights::default(),
            p_mut: 0.1,
            p_shift: 0.2,
            max_generations: 500,
            stop_gens: 100,
            stagnation_limit: 30,
            delta_max_layer_num: 4,
            min_layer_num: 1,
            max_layer_num: 48,
            layer_capacity: 64,
            angles: vec![-45.0, 0.0, 45.0, 90.0],
            domain_error_policy: DomainErrorPolicy::Abort,
        }
    }
}

impl OptimizationParameter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parent population size
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the offspring counts per operator
    pub fn with_operator_weights(mut self, weights: OperatorWeights) -> Self {
        self.operator_weights = weights;
        self
    }

    /// Set mutation and shift probabilities
    pub fn with_probabilities(mut self, p_mut: f64, p_shift: f64) -> Self {
        self.p_mut = p_mut;
        self.p_shift = p_shift;
        self
    }

    /// Set the generation cap
    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Set the stop and stagnation limits
    pub fn with_stop_gens(mut self, stop_gens: usize, stagnation_limit: usize) -> Self {
        self.stop_gens = stop_gens;
        self.stagnation_limit = stagnation_limit;
        self
    }

    /// Set the initial ply count bracket
    pub fn with_layer_bracket(mut self, min_layer_num: usize, max_layer_num: usize) -> Self {
        self.min_layer_num = min_layer_num;
        self.max_layer_num = max_layer_num;
        self
    }

    /// Set the hard ply count limit
    pub fn with_layer_capacity(mut self, capacity: usize) -> Self {
        self.layer_capacity = capacity;
        self
    }

    /// Set the slack around bounds
    pub fn with_delta_max_layer_num(mut self, delta: usize) -> Self {
        self.delta_max_layer_num = delta;
        self
    }

    /// Set the allowed ply angles
    pub fn with_angles(mut self, angles: Vec<f64>) -> Self {
        self.angles = angles;
        self
    }

    /// Set the numeric-domain error policy
    pub fn with_domain_error_policy(mut self, policy: DomainErrorPolicy) -> Self {
        self.domain_error_policy = policy;
        self
    }

    /// Allowed angles in ascending order without duplicates
    pub fn sorted_angles(&self) -> Vec<f64> {
        let mut sorted = self.angles.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        sorted
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> CltResult<()> {
        let fail = |msg: String| Err(CltError::InvalidConfiguration(msg));

        if self.population_size < 2 {
            return fail(format!("population size {} < 2", self.population_size));
        }
        if self.operator_weights.total() == 0 {
            return fail("operator weights produce no offspring".to_string());
        }
        for (name, p) in [("p_mut", self.p_mut), ("p_shift", self.p_shift)] {
            if !(0.0..=1.0).contains(&p) {
                return fail(format!("{name} = {p} outside [0, 1]"));
            }
        }
        if self.angles.is_empty() || self.angles.iter().any(|a| !a.is_finite()) {
            return fail("allowed angle set must be non-empty and finite".to_string());
        }
        if self.layer_capacity == 0 {
            return fail("layer capacity must be positive".to_string());
        }
        if self.min_layer_num == 0
            || self.min_layer_num > self.max_layer_num
            || self.max_layer_num > self.layer_capacity
        {
            return fail(format!(
                "layer bracket [{}, {}] invalid for capacity {}",
                self.min_layer_num, self.max_layer_num, self.layer_capacity
            ));
        }
        if self.stop_gens == 0 {
            return fail("stop_gens must be positive".to_string());
        }
        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json_string(&self) -> CltResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> CltResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
