use clt_laminate::optimization::{OptimizationProgress, SuperlayerSearch};
use clt_laminate::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn problem(loads: Loads) -> OptimizationProblem {
    let calc = LoadCaseReserveFactorCalculator::single(Arc::new(Puck), LoadCase::new("Design", loads));
    OptimizationProblem::new(Arc::new(Material::cfrp()), 0.125, Arc::new(calc))
}

fn params() -> OptimizationParameter {
    OptimizationParameter::default()
        .with_population_size(10)
        .with_layer_capacity(24)
        .with_layer_bracket(1, 16)
        .with_max_generations(80)
        .with_stop_gens(30, 12)
}

#[test]
fn test_uniaxial_tension_converges_to_minimal_stack() {
    let optimizer = HauffeOptimizer::new(problem(Loads::membrane(1000.0, 0.0, 0.0)), params());
    let result = optimizer
        .run_with_rng(&mut StdRng::seed_from_u64(7))
        .unwrap()
        .into_result()
        .unwrap();

    // three 0-degree plies reach RF = 0.855, four reach 1.14
    assert!(result.champion.is_feasible());
    assert_eq!(result.champion.num_layers, 4);
    assert_eq!(result.champion.objective, 4.0);
    assert_eq!(result.laminate.num_layers(), 4);
    assert!((result.laminate.thickness() - 0.5).abs() < 1e-12);
}

#[test]
fn test_champion_objective_is_monotonic() {
    let optimizer = HauffeOptimizer::new(problem(Loads::membrane(600.0, -150.0, 200.0)), params());
    let champions = Mutex::new(Vec::new());
    let observer = |p: &OptimizationProgress| {
        champions.lock().unwrap().push(p.champion.clone());
    };
    let result = optimizer
        .run_with_rng_and_progress(&mut StdRng::seed_from_u64(21), &observer)
        .unwrap()
        .into_result()
        .unwrap();

    assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
    let champions = champions.into_inner().unwrap();
    assert_eq!(champions.len(), result.generations);
    for pair in champions.windows(2) {
        assert!(!pair[0].is_better_than(&pair[1]));
    }

    assert!(result.upper_bound.is_feasible());
    assert!(result.champion.is_feasible());
    assert!(result.champion.num_layers <= result.upper_bound.num_layers);

    // the reported reserve factor is the one of the returned laminate
    let calc = LoadCaseReserveFactorCalculator::single(
        Arc::new(Puck),
        LoadCase::new("Design", Loads::membrane(600.0, -150.0, 200.0)),
    );
    let rf = calc.minimal_reserve_factor(&result.laminate).unwrap();
    assert!((rf - result.champion.min_reserve_factor).abs() < 1e-9);
}

#[test]
fn test_lower_bound_search_sets_bracket_floor() {
    let optimizer = HauffeOptimizer::new(
        problem(Loads::membrane(1000.0, 0.0, 0.0)),
        params().with_delta_max_layer_num(1),
    );
    let bracket = Mutex::new((0, 0));
    let observer = |p: &OptimizationProgress| {
        if p.generation == 1 {
            *bracket.lock().unwrap() = (p.min_layer_num, p.max_layer_num);
        }
    };
    let result = optimizer
        .run_with_rng_and_progress(&mut StdRng::seed_from_u64(3), &observer)
        .unwrap()
        .into_result()
        .unwrap();

    // the smeared superlayer carries 1000 N/mm with four plies
    let lower = result.lower_bound.unwrap();
    assert_eq!(lower.num_layers, 4);
    assert_eq!(result.upper_bound.num_layers, 4);
    // floor 4 - 1 and ceiling 4 + 1 instead of the configured [1, 16]
    assert_eq!(bracket.into_inner().unwrap(), (3, 5));
    assert_eq!(result.champion.num_layers, 4);
}

#[test]
fn test_explicit_superlayer_material() {
    let cfrp = Arc::new(Material::cfrp());
    let optimizer = HauffeOptimizer::new(problem(Loads::membrane(1000.0, 0.0, 0.0)), params())
        .with_lower_bound_search(Box::new(SuperlayerSearch::new(cfrp)));
    let result = optimizer
        .run_with_rng(&mut StdRng::seed_from_u64(3))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(result.lower_bound.unwrap().num_layers, 4);
    assert_eq!(result.champion.num_layers, 4);
}

#[test]
fn test_shear_floor_stays_below_optimum() {
    let optimizer = HauffeOptimizer::new(problem(Loads::membrane(0.0, 0.0, 300.0)), params());
    let floor = AtomicUsize::new(0);
    let observer = |p: &OptimizationProgress| {
        if p.generation == 1 {
            floor.store(p.min_layer_num, Ordering::Relaxed);
        }
    };
    let result = optimizer
        .run_with_rng_and_progress(&mut StdRng::seed_from_u64(13), &observer)
        .unwrap()
        .into_result()
        .unwrap();

    let lower = result.lower_bound.unwrap();
    assert_eq!(lower.num_layers, 4);
    assert!(floor.load(Ordering::Relaxed) <= lower.num_layers);
    assert!(result.champion.is_feasible());
    // no stack of fewer than five plies carries the shear flow
    assert!(result.champion.num_layers >= 5);
    assert!(lower.num_layers <= result.champion.num_layers);
}

#[test]
fn test_cancellation_from_observer() {
    let optimizer = HauffeOptimizer::new(problem(Loads::membrane(600.0, 0.0, 200.0)), params());
    let handle = optimizer.cancel_handle();
    let observer = move |p: &OptimizationProgress| {
        if p.generation == 3 {
            handle.store(true, Ordering::Relaxed);
        }
    };
    let outcome = optimizer
        .run_with_rng_and_progress(&mut StdRng::seed_from_u64(5), &observer)
        .unwrap();
    assert!(outcome.is_cancelled());
}

#[test]
fn test_shared_cancellation_flag() {
    let flag = Arc::new(AtomicBool::new(true));
    let optimizer = HauffeOptimizer::new(problem(Loads::membrane(600.0, 0.0, 0.0)), params())
        .with_cancellation(Arc::clone(&flag));
    assert!(optimizer.run_with_rng(&mut StdRng::seed_from_u64(1)).unwrap().is_cancelled());
}

#[test]
fn test_domain_errors_can_be_treated_as_infeasible() {
    // odd ply counts fail with a numeric-domain error
    let calc = |lam: &Laminate| -> CltResult<f64> {
        if lam.num_layers() % 2 == 1 {
            Err(CltError::NegativeSqrt {
                context: "test",
                value: -1.0,
            })
        } else {
            Ok(lam.num_layers() as f64 / 6.0)
        }
    };
    let problem = OptimizationProblem::new(Arc::new(Material::cfrp()), 0.125, Arc::new(calc));

    let aborting = HauffeOptimizer::new(problem.clone(), params());
    let err = aborting.run_with_rng(&mut StdRng::seed_from_u64(9)).unwrap_err();
    assert!(matches!(err, CltError::NegativeSqrt { .. }));

    let tolerant = HauffeOptimizer::new(
        problem,
        params().with_domain_error_policy(DomainErrorPolicy::TreatAsInfeasible),
    );
    let result = tolerant
        .run_with_rng(&mut StdRng::seed_from_u64(9))
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(result.champion.num_layers, 6);
    assert!(result.champion.is_feasible());
}
