//! CLT Example - Reference laminate analysis and a short stacking-sequence optimization

use anyhow::Result;
use clt_laminate::prelude::*;
use clt_laminate::report;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== CLT Example: [70/90/10/0] laminate ===\n");

    let material = Arc::new(Material::cfrp());
    let laminate = Laminate::from_angles(
        "Reference",
        Arc::clone(&material),
        &[70.0, 90.0, 10.0, 0.0],
        0.125,
    );

    let case = LoadCase::new("Nx + Mx", Loads::new(100.0, 0.0, 0.0, 15.0, 0.0, 0.0));
    let calculator = LoadCaseReserveFactorCalculator::single(Arc::new(Puck), case.clone());
    let assessment = calculator.assess(&laminate, &case)?;

    let clt = laminate.clt()?;
    println!("A matrix:{}", clt.a());
    println!("B matrix:{}", clt.b());
    println!("D matrix:{}", clt.d());

    let s = &assessment.solution.strains;
    println!("Mid-plane strains [1e-3]:");
    println!(
        "  eps_x = {:8.4}  eps_y = {:8.4}  gamma_xy = {:8.4}",
        s.eps_x * 1e3,
        s.eps_y * 1e3,
        s.gamma_xy * 1e3
    );
    println!(
        "  kap_x = {:8.4}  kap_y = {:8.4}  kap_xy   = {:8.4}\n",
        s.kappa_x * 1e3,
        s.kappa_y * 1e3,
        s.kappa_xy * 1e3
    );

    println!("Ply results (ply axes):");
    println!(
        "{:>4} {:>6} {:>6} {:>10} {:>10} {:>10} {:>8}  mode",
        "ply", "angle", "side", "s1", "s2", "t12", "RF"
    );
    for (layer, rf) in assessment
        .solution
        .layers
        .iter()
        .zip(&assessment.reserve_factors)
    {
        for (side, state, rf) in [
            ("upper", &layer.upper, &rf.upper),
            ("lower", &layer.lower, &rf.lower),
        ] {
            println!(
                "{:>4} {:>6.1} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>8.4}  {}",
                layer.ply + 1,
                layer.angle,
                side,
                state.sigma_1(),
                state.sigma_2(),
                state.tau_12(),
                rf.min_reserve_factor,
                rf.failure_name
            );
        }
    }
    println!(
        "\nMinimal reserve factor: {:.4}",
        assessment.min_reserve_factor()
    );
    println!(
        "Report columns: {}\n",
        report::column_names(laminate.num_plies()).len()
    );

    println!("=== Optimization: Nx = 1500 N/mm, Nxy = 300 N/mm ===\n");

    let design_case = LoadCase::new("Design", Loads::membrane(1500.0, 0.0, 300.0));
    let objective = LoadCaseReserveFactorCalculator::single(Arc::new(Puck), design_case);
    let problem = OptimizationProblem::new(material, 0.125, Arc::new(objective));
    let params = OptimizationParameter::default()
        .with_population_size(12)
        .with_layer_capacity(32)
        .with_layer_bracket(1, 24)
        .with_max_generations(150)
        .with_stop_gens(40, 15);

    let optimizer = HauffeOptimizer::new(problem, params);
    let mut rng = StdRng::seed_from_u64(42);
    match optimizer.run_with_rng(&mut rng)? {
        OptimizationOutcome::Completed(result) => {
            println!(
                "Champion after {} generations ({} evaluations): {} plies, RF = {:.4}",
                result.generations,
                result.evaluations,
                result.champion.num_layers,
                result.champion.min_reserve_factor
            );
            println!("{}", serde_json::to_string_pretty(&result.champion)?);
        }
        OptimizationOutcome::Cancelled => println!("Optimization cancelled"),
    }

    Ok(())
}
