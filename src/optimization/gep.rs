//! Genetic operators of the stacking-sequence search
//!
//! Every operator returns fresh, unevaluated offspring; parents are only read.

use rand::seq::SliceRandom;
use rand::Rng;

use super::individual::Individual;
use super::parameter::{Operator, OperatorWeights, OptimizationParameter};

/// Operator set bound to an allowed angle set and a ply-count bracket
#[derive(Debug, Clone)]
pub struct Gep {
    angles: Vec<f64>,
    weights: OperatorWeights,
    capacity: usize,
    p_mut: f64,
    p_shift: f64,
    min_layers: usize,
    max_layers: usize,
}

impl Gep {
    /// Operators for a validated parameter set
    pub fn new(params: &OptimizationParameter) -> Self {
        let capacity = params.layer_capacity.max(1);
        let max_layers = params.max_layer_num.clamp(1, capacity);
        Self {
            angles: params.sorted_angles(),
            weights: params.operator_weights.clone(),
            capacity,
            p_mut: params.p_mut,
            p_shift: params.p_shift,
            min_layers: params.min_layer_num.clamp(1, max_layers),
            max_layers,
        }
    }

    /// Current ply-count bracket of random candidates
    pub fn bracket(&self) -> (usize, usize) {
        (self.min_layers, self.max_layers)
    }

    /// Move the bracket, clamped to `[1, capacity]`
    pub fn set_bracket(&mut self, min_layers: usize, max_layers: usize) {
        self.max_layers = max_layers.clamp(1, self.capacity);
        self.min_layers = min_layers.clamp(1, self.max_layers);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn random_angle<R: Rng>(&self, rng: &mut R) -> f64 {
        self.angles[rng.gen_range(0..self.angles.len())]
    }

    pub fn random_num_layers<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min_layers..=self.max_layers)
    }

    /// Random ply count inside the bracket and random angles over the full capacity
    pub fn random_individual<R: Rng>(&self, rng: &mut R) -> Individual {
        let angles = (0..self.capacity).map(|_| self.random_angle(rng)).collect();
        Individual::new(self.random_num_layers(rng), angles)
    }

    /// Individual whose active stack is `stack`, padded with random angles
    pub fn seeded_individual<R: Rng>(&self, stack: &[f64], rng: &mut R) -> Individual {
        let mut angles: Vec<f64> = stack.iter().copied().take(self.capacity).collect();
        while angles.len() < self.capacity {
            angles.push(self.random_angle(rng));
        }
        Individual::new(stack.len(), angles)
    }

    /// Resample the ply count and every angle with probability `p_mut`
    pub fn mutate<R: Rng>(&self, parent: &Individual, rng: &mut R) -> Individual {
        let num_layers = if rng.gen_bool(self.p_mut) {
            self.random_num_layers(rng)
        } else {
            parent.num_layers
        };
        let angles = parent
            .angles
            .iter()
            .map(|&angle| {
                if rng.gen_bool(self.p_mut) {
                    self.random_angle(rng)
                } else {
                    angle
                }
            })
            .collect();
        Individual::new(num_layers, angles)
    }

    /// Swap the angle suffixes of two parents behind one random cut
    pub fn one_point_crossover<R: Rng>(
        &self,
        a: &Individual,
        b: &Individual,
        rng: &mut R,
    ) -> (Individual, Individual) {
        let len = a.angles.len().min(b.angles.len());
        let mut first = a.angles.clone();
        let mut second = b.angles.clone();
        if len > 1 {
            let cut = rng.gen_range(1..len);
            first[cut..len].swap_with_slice(&mut second[cut..len]);
        }
        (
            Individual::new(a.num_layers, first),
            Individual::new(b.num_layers, second),
        )
    }

    /// Swap the angle range between two random cuts
    pub fn two_point_crossover<R: Rng>(
        &self,
        a: &Individual,
        b: &Individual,
        rng: &mut R,
    ) -> (Individual, Individual) {
        let len = a.angles.len().min(b.angles.len());
        let mut first = a.angles.clone();
        let mut second = b.angles.clone();
        if len > 1 {
            let mut lo = rng.gen_range(0..len);
            let mut hi = rng.gen_range(0..len);
            if lo > hi {
                std::mem::swap(&mut lo, &mut hi);
            }
            first[lo..=hi].swap_with_slice(&mut second[lo..=hi]);
        }
        (
            Individual::new(a.num_layers, first),
            Individual::new(b.num_layers, second),
        )
    }

    /// Shuffle the active stack
    pub fn permutation<R: Rng>(&self, parent: &Individual, rng: &mut R) -> Individual {
        let mut angles = parent.angles.clone();
        let n = parent.num_layers.min(angles.len());
        angles[..n].shuffle(rng);
        Individual::new(parent.num_layers, angles)
    }

    /// Nudge each angle to a neighbour in the sorted angle list with
    /// probability `p_shift`; the ply count resamples with `p_mut`
    pub fn angle_shift<R: Rng>(&self, parent: &Individual, rng: &mut R) -> Individual {
        let num_layers = if rng.gen_bool(self.p_mut) {
            self.random_num_layers(rng)
        } else {
            parent.num_layers
        };
        let angles = parent
            .angles
            .iter()
            .map(|&angle| {
                if rng.gen_bool(self.p_shift) {
                    self.shifted(angle, rng.gen_bool(0.5))
                } else {
                    angle
                }
            })
            .collect();
        Individual::new(num_layers, angles)
    }

    /// Neighbour of `angle`; at either end of the list the step points inward.
    /// Angles outside the allowed set snap to the nearest allowed one.
    fn shifted(&self, angle: f64, upward: bool) -> f64 {
        let last = self.angles.len() - 1;
        let Some(pos) = self.angles.iter().position(|&a| a == angle) else {
            return self.nearest(angle);
        };
        if last == 0 {
            return self.angles[0];
        }
        let next = match (pos, upward) {
            (0, _) => 1,
            (p, _) if p == last => last - 1,
            (p, true) => p + 1,
            (p, false) => p - 1,
        };
        self.angles[next]
    }

    fn nearest(&self, angle: f64) -> f64 {
        self.angles
            .iter()
            .copied()
            .min_by(|a, b| (a - angle).abs().total_cmp(&(b - angle).abs()))
            .unwrap_or(angle)
    }

    /// Build one generation of offspring, operator by operator over the
    /// configured index ranges
    pub fn build_offspring<R: Rng>(&self, parents: &[Individual], rng: &mut R) -> Vec<Individual> {
        let mut offspring = Vec::with_capacity(self.weights.total());
        if parents.is_empty() {
            return offspring;
        }

        for (operator, range) in self.weights.ranges() {
            let count = range.len();
            let mut produced = Vec::with_capacity(count + 1);
            while produced.len() < count {
                let a = &parents[rng.gen_range(0..parents.len())];
                match operator {
                    Operator::Mutation => produced.push(self.mutate(a, rng)),
                    Operator::Permutation => produced.push(self.permutation(a, rng)),
                    Operator::AngleShift => produced.push(self.angle_shift(a, rng)),
                    Operator::OnePointCrossover | Operator::TwoPointCrossover => {
                        let b = &parents[rng.gen_range(0..parents.len())];
                        let (c1, c2) = if operator == Operator::OnePointCrossover {
                            self.one_point_crossover(a, b, rng)
                        } else {
                            self.two_point_crossover(a, b, rng)
                        };
                        produced.push(c1);
                        produced.push(c2);
                    }
                }
            }
            produced.truncate(count);
            offspring.extend(produced);
        }
        offspring
    }
}
