//! Genetic stacking-sequence optimizer
//!
//! A single population evolves through the operators of [`Gep`]. Offspring
//! replace their closest parent when they are better, the best-so-far
//! individual is kept as champion, and the ply-count bracket of new random
//! candidates follows the champion.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::bounds::{BoundResult, BoundSearch, SequentialDecisionSearch, SuperlayerSearch};
use super::gep::Gep;
use super::individual::Individual;
use super::parameter::OptimizationParameter;
use super::problem::OptimizationProblem;
use crate::composite::Laminate;
use crate::error::{CltError, CltResult};

/// Snapshot published after every generation
#[derive(Debug, Clone)]
pub struct OptimizationProgress {
    pub generation: usize,
    pub champion: Individual,
    pub min_layer_num: usize,
    pub max_layer_num: usize,
    /// Generations since the champion last changed
    pub unchanged_generations: usize,
    pub evaluations: usize,
}

/// Receiver of per-generation progress
pub trait ProgressObserver {
    fn on_generation(&self, progress: &OptimizationProgress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&OptimizationProgress),
{
    fn on_generation(&self, progress: &OptimizationProgress) {
        self(progress)
    }
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best individual found
    pub champion: Individual,
    /// The champion as laminate
    pub laminate: Laminate,
    /// Generations run
    pub generations: usize,
    /// Number of objective evaluations of the genetic search
    pub evaluations: usize,
    /// Champion objective after initialization and after every generation
    pub history: Vec<f64>,
    /// Upper bound search result
    pub upper_bound: BoundResult,
    /// Lower bound search result, if one was configured
    pub lower_bound: Option<BoundResult>,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum OptimizationOutcome {
    Completed(OptimizationResult),
    /// Cancelled through the cancel handle; no result is produced
    Cancelled,
}

impl OptimizationOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OptimizationOutcome::Cancelled)
    }

    pub fn into_result(self) -> Option<OptimizationResult> {
        match self {
            OptimizationOutcome::Completed(result) => Some(result),
            OptimizationOutcome::Cancelled => None,
        }
    }
}

/// Genetic optimizer minimizing the ply count of a feasible laminate
pub struct HauffeOptimizer {
    problem: OptimizationProblem,
    params: OptimizationParameter,
    upper_bound_search: Box<dyn BoundSearch>,
    lower_bound_search: Option<Box<dyn BoundSearch>>,
    cancelled: Arc<AtomicBool>,
}

/// Mutable state of one run
struct Run<'a> {
    optimizer: &'a HauffeOptimizer,
    gep: Gep,
    lower_floor: usize,
    evaluations: usize,
}

impl HauffeOptimizer {
    pub fn new(problem: OptimizationProblem, params: OptimizationParameter) -> Self {
        Self {
            problem,
            params,
            upper_bound_search: Box::new(SequentialDecisionSearch),
            lower_bound_search: Some(Box::new(SuperlayerSearch::smeared())),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the upper bound search
    pub fn with_upper_bound_search(mut self, search: Box<dyn BoundSearch>) -> Self {
        self.upper_bound_search = search;
        self
    }

    /// Replace the lower bound search (a smeared superlayer by default)
    pub fn with_lower_bound_search(mut self, search: Box<dyn BoundSearch>) -> Self {
        self.lower_bound_search = Some(search);
        self
    }

    /// Start the bracket at the configured minimal ply count instead of a
    /// lower bound estimate
    pub fn without_lower_bound_search(mut self) -> Self {
        self.lower_bound_search = None;
        self
    }

    /// Share an existing cancellation flag
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Handle to cancel a running optimization
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn params(&self) -> &OptimizationParameter {
        &self.params
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    /// Run with an entropy-seeded generator
    pub fn run(&self) -> CltResult<OptimizationOutcome> {
        self.run_with_rng(&mut StdRng::from_entropy())
    }

    /// Run with an entropy-seeded generator, reporting progress
    pub fn run_with_progress(
        &self,
        observer: &dyn ProgressObserver,
    ) -> CltResult<OptimizationOutcome> {
        self.run_with_rng_and_progress(&mut StdRng::from_entropy(), observer)
    }

    /// Run with a caller-supplied generator
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> CltResult<OptimizationOutcome> {
        self.run_with_rng_and_progress(rng, &|_: &OptimizationProgress| {})
    }

    /// Run with a caller-supplied generator, reporting progress
    pub fn run_with_rng_and_progress<R: Rng>(
        &self,
        rng: &mut R,
        observer: &dyn ProgressObserver,
    ) -> CltResult<OptimizationOutcome> {
        self.params.validate()?;
        let params = &self.params;
        let mut run = Run {
            optimizer: self,
            gep: Gep::new(params),
            lower_floor: 1,
            evaluations: 0,
        };

        let (upper_bound, lower_bound) = run.bounds()?;
        let (min_layers, max_layers) = run.gep.bracket();
        info!(
            "Starting optimization: bracket [{}, {}], population {}, {} offspring per generation",
            min_layers,
            max_layers,
            params.population_size,
            params.operator_weights.total()
        );

        let mut population = run.initial_population(&upper_bound, rng)?;
        let mut champion = best_of(&population)
            .cloned()
            .ok_or_else(|| CltError::InvalidConfiguration("empty population".to_string()))?;
        let mut history = vec![champion.objective];
        let mut unchanged = 0;
        let mut stagnation = 0;
        let mut generation = 0;

        while generation < params.max_generations {
            if self.cancelled.load(Ordering::Relaxed) {
                info!("Optimization cancelled in generation {}", generation);
                return Ok(OptimizationOutcome::Cancelled);
            }
            generation += 1;

            let mut offspring = run.gep.build_offspring(&population, rng);
            for child in offspring.iter_mut() {
                run.evaluate(child)?;
            }
            replace_closest(&mut population, offspring);

            if let Some(best) = best_of(&population) {
                if best.is_better_than(&champion) {
                    champion = best.clone();
                    unchanged = 0;
                    stagnation = 0;
                } else {
                    unchanged += 1;
                    stagnation += 1;
                }
            }
            history.push(champion.objective);

            let (min_layer_num, max_layer_num) = run.gep.bracket();
            debug!(
                "Generation {}: champion {} plies, RF = {:.4}, bracket [{}, {}]",
                generation,
                champion.num_layers,
                champion.min_reserve_factor,
                min_layer_num,
                max_layer_num
            );
            observer.on_generation(&OptimizationProgress {
                generation,
                champion: champion.clone(),
                min_layer_num,
                max_layer_num,
                unchanged_generations: unchanged,
                evaluations: run.evaluations,
            });

            if unchanged >= params.stop_gens {
                info!("Champion unchanged for {} generations", unchanged);
                break;
            }

            let near_upper = champion.is_feasible()
                && champion.num_layers + params.delta_max_layer_num > max_layer_num
                && max_layer_num < run.gep.capacity();
            let stagnating = params.stagnation_limit > 0 && stagnation >= params.stagnation_limit;
            if near_upper || stagnating {
                run.rebracket(&champion);
                population = run.reseed(&champion, rng)?;
                stagnation = 0;
            }
        }

        info!(
            "Optimization finished after {} generations: {} plies, RF = {:.4}, {} evaluations",
            generation, champion.num_layers, champion.min_reserve_factor, run.evaluations
        );

        Ok(OptimizationOutcome::Completed(OptimizationResult {
            laminate: self.problem.laminate_for(champion.stack()),
            champion,
            generations: generation,
            evaluations: run.evaluations,
            history,
            upper_bound,
            lower_bound,
        }))
    }
}

impl Run<'_> {
    fn evaluate(&mut self, individual: &mut Individual) -> CltResult<()> {
        let optimizer = self.optimizer;
        let rf = optimizer
            .problem
            .evaluate(individual.stack(), optimizer.params.domain_error_policy)?;
        individual.set_reserve_factor(rf);
        self.evaluations += 1;
        Ok(())
    }

    /// Run the bound searches and set the initial bracket from them
    fn bounds(&mut self) -> CltResult<(BoundResult, Option<BoundResult>)> {
        let optimizer = self.optimizer;
        let params = &optimizer.params;
        let delta = params.delta_max_layer_num;
        let capacity = self.gep.capacity();

        let upper = optimizer.upper_bound_search.search(&optimizer.problem, params)?;
        info!(
            "{} bound: {} plies, RF = {:.4}",
            optimizer.upper_bound_search.name(),
            upper.num_layers,
            upper.min_reserve_factor
        );
        let max_layers = (upper.num_layers + delta).min(capacity);

        let lower = match &optimizer.lower_bound_search {
            Some(search) => {
                let lower = search.search(&optimizer.problem, params)?;
                info!(
                    "{} bound: {} plies, RF = {:.4}",
                    search.name(),
                    lower.num_layers,
                    lower.min_reserve_factor
                );
                Some(lower)
            }
            None => None,
        };
        let min_layers = match &lower {
            Some(lower) => lower.num_layers.saturating_sub(delta).max(1),
            None => params.min_layer_num,
        };

        self.lower_floor = min_layers.min(max_layers);
        self.gep.set_bracket(min_layers, max_layers);
        Ok((upper, lower))
    }

    /// Seed individual from the bound search, improved by a sweep, plus
    /// random individuals
    fn initial_population<R: Rng>(
        &mut self,
        upper: &BoundResult,
        rng: &mut R,
    ) -> CltResult<Vec<Individual>> {
        let size = self.optimizer.params.population_size;
        let mut population = Vec::with_capacity(size);

        if !upper.angles.is_empty() {
            let mut seed = self.gep.seeded_individual(&upper.angles, rng);
            self.evaluate(&mut seed)?;
            population.push(self.permute(seed)?);
        }
        while population.len() < size {
            let mut individual = self.gep.random_individual(rng);
            self.evaluate(&mut individual)?;
            population.push(individual);
        }
        Ok(population)
    }

    /// Single pass over the active stack trying every allowed angle at each
    /// position and keeping improvements
    fn permute(&mut self, mut best: Individual) -> CltResult<Individual> {
        let angles = self.gep.angles().to_vec();
        for pos in 0..best.num_layers {
            for &angle in &angles {
                if best.angles[pos] == angle {
                    continue;
                }
                let mut candidate = best.clone();
                candidate.angles[pos] = angle;
                self.evaluate(&mut candidate)?;
                if candidate.is_better_than(&best) {
                    best = candidate;
                }
            }
        }
        Ok(best)
    }

    /// Re-center the bracket on a feasible champion, or widen it upward
    /// while nothing feasible has been found
    fn rebracket(&mut self, champion: &Individual) {
        let delta = self.optimizer.params.delta_max_layer_num;
        let capacity = self.gep.capacity();
        let (min_layers, max_layers) = if champion.is_feasible() {
            (
                champion.num_layers.saturating_sub(delta).max(self.lower_floor),
                (champion.num_layers + delta).min(capacity),
            )
        } else {
            let (min_layers, max_layers) = self.gep.bracket();
            (min_layers, (max_layers + delta).min(capacity))
        };
        info!("Re-bracketing to [{}, {}]", min_layers, max_layers);
        self.gep.set_bracket(min_layers, max_layers);
    }

    /// Champion plus fresh random individuals
    fn reseed<R: Rng>(&mut self, champion: &Individual, rng: &mut R) -> CltResult<Vec<Individual>> {
        let size = self.optimizer.params.population_size;
        let mut population = Vec::with_capacity(size);
        population.push(champion.clone());
        while population.len() < size {
            let mut individual = self.gep.random_individual(rng);
            self.evaluate(&mut individual)?;
            population.push(individual);
        }
        Ok(population)
    }
}

/// Best individual by the champion ordering
fn best_of(population: &[Individual]) -> Option<&Individual> {
    population.iter().fold(None, |best, candidate| match best {
        Some(b) if !candidate.is_better_than(b) => Some(b),
        _ => Some(candidate),
    })
}

/// Steady-state replacement: each child competes against its closest parent
fn replace_closest(population: &mut [Individual], offspring: Vec<Individual>) {
    for child in offspring {
        let closest = population
            .iter()
            .enumerate()
            .min_by_key(|(_, parent)| child.distance(parent))
            .map(|(i, _)| i);
        if let Some(i) = closest {
            if child.replaces(&population[i]) {
                population[i] = child;
            }
        }
    }
}
