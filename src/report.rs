//! Tabular output of a solved load case
//!
//! Columns come in a fixed order: the six resultants and the six mid-plane
//! strains, then for each ply the upper and the lower surface, each with
//! stresses, strains and reserve factor in ply axes.

use crate::error::{CltError, CltResult};
use crate::loads::{Loads, Strains};
use crate::reserve::PlyReserveFactors;
use crate::results::{LayerResult, StressStrainState};

const RESULTANT_COLUMNS: [&str; 12] = [
    "Nx", "Ny", "Nxy", "Mx", "My", "Mxy", "eps_x", "eps_y", "gamma_xy", "kappa_x", "kappa_y",
    "kappa_xy",
];

const SURFACE_COLUMNS: [&str; 7] = ["s1", "s2", "t12", "e1", "e2", "g12", "RF"];

/// Number of columns for a laminate with `num_plies` physical plies
pub fn column_count(num_plies: usize) -> usize {
    RESULTANT_COLUMNS.len() + num_plies * 2 * SURFACE_COLUMNS.len()
}

/// Column headers for a laminate with `num_plies` physical plies
pub fn column_names(num_plies: usize) -> Vec<String> {
    let mut names: Vec<String> = RESULTANT_COLUMNS.iter().map(|s| s.to_string()).collect();
    for ply in 1..=num_plies {
        for tag in ["upper", "lower"] {
            names.extend(SURFACE_COLUMNS.iter().map(|c| format!("L{ply}_{tag}_{c}")));
        }
    }
    names
}

fn push_surface(row: &mut Vec<f64>, state: &StressStrainState, rf: f64) {
    row.extend(state.stress.iter());
    row.extend(state.strain.iter());
    row.push(rf);
}

/// One row of values matching [`column_names`]
pub fn row(
    loads: &Loads,
    strains: &Strains,
    layers: &[LayerResult],
    reserve_factors: &[PlyReserveFactors],
) -> CltResult<Vec<f64>> {
    if layers.len() != reserve_factors.len() {
        return Err(CltError::InvalidInput(format!(
            "{} layer results but {} reserve factor entries",
            layers.len(),
            reserve_factors.len()
        )));
    }

    let mut row = Vec::with_capacity(column_count(layers.len()));
    row.extend(loads.as_array());
    row.extend(strains.as_array());
    for (layer, rf) in layers.iter().zip(reserve_factors) {
        push_surface(&mut row, &layer.upper, rf.upper.min_reserve_factor);
        push_surface(&mut row, &layer.lower, rf.lower.min_reserve_factor);
    }
    Ok(row)
}
