//! Mixed load/strain solver and ply stress recovery

use log::debug;
use serde::Serialize;

use super::CltLaminate;
use crate::composite::Laminate;
use crate::error::{CltError, CltResult};
use crate::loads::{LoadCase, Loads, Strains};
use crate::math::{self, Mat, Vec as DVec, Vec6};
use crate::results::LayerResult;

/// Fully resolved state of a laminate under one load case
#[derive(Debug, Clone, Serialize)]
pub struct CltSolution {
    /// Mechanical resultants, prescribed and solved
    pub loads: Loads,
    /// Mid-plane strains, prescribed and solved
    pub strains: Strains,
    /// Per-ply stresses and strains from top to bottom
    pub layers: Vec<LayerResult>,
}

/// Solver for the laminate constitutive equation
///
/// `N + N_ht = ABD * eps`, where `N_ht` are the hygrothermal resultants of the
/// uniform temperature/moisture change carried by the loads.
pub struct CltCalculator;

impl CltCalculator {
    /// Resolve the six degrees of freedom.
    ///
    /// For every index where `use_strains` is true the strain is taken as
    /// known, elsewhere the resultant. Returns a new, fully populated pair
    /// consistent with the ABD matrix; the inputs are left untouched.
    pub fn determine_values(
        laminate: &CltLaminate,
        loads: &Loads,
        strains: &Strains,
        use_strains: &[bool; 6],
    ) -> CltResult<(Loads, Strains)> {
        let abd = laminate.abd();
        let hygrothermal = laminate.hygrothermal_loads(loads.delta_t, loads.delta_h);
        let total = loads.as_vector() + hygrothermal;

        let known: Vec<usize> = (0..6).filter(|&i| use_strains[i]).collect();
        let unknown: Vec<usize> = (0..6).filter(|&i| !use_strains[i]).collect();

        let mut eps = Vec6::zeros();
        for &i in &known {
            eps[i] = strains.as_array()[i];
        }

        if !unknown.is_empty() {
            let n = unknown.len();
            let mut k = Mat::zeros(n, n);
            let mut rhs = DVec::zeros(n);

            for (r, &i) in unknown.iter().enumerate() {
                rhs[r] = total[i];
                for (c, &j) in unknown.iter().enumerate() {
                    k[(r, c)] = abd[(i, j)];
                }
                for &j in &known {
                    rhs[r] -= abd[(i, j)] * eps[j];
                }
            }

            let solved = math::solve_linear_system(&k, &rhs).ok_or(CltError::SingularMatrix)?;
            for (r, &i) in unknown.iter().enumerate() {
                eps[i] = solved[r];
            }
        }

        let mut resultants = abd * eps - hygrothermal;
        for &i in &unknown {
            resultants[i] = loads.as_array()[i];
        }

        debug!(
            "resolved laminate state: {} prescribed strains, {} prescribed resultants",
            known.len(),
            unknown.len()
        );

        Ok((loads.with_resultants(&resultants), Strains::from_vector(&eps)))
    }

    /// Recover ply-axis stresses and strains at the upper and lower surface
    /// of every physical ply
    pub fn layer_results(
        laminate: &CltLaminate,
        strains: &Strains,
        delta_t: f64,
        delta_h: f64,
    ) -> Vec<LayerResult> {
        laminate
            .layers()
            .iter()
            .map(|layer| LayerResult {
                ply: layer.ply,
                angle: layer.layer.angle,
                z_upper: layer.z_upper,
                z_lower: layer.z_lower,
                upper: layer.local_state(strains, layer.z_upper, delta_t, delta_h),
                lower: layer.local_state(strains, layer.z_lower, delta_t, delta_h),
            })
            .collect()
    }

    /// Solve a load case on a laminate
    pub fn solve(laminate: &Laminate, case: &LoadCase) -> CltResult<CltSolution> {
        let clt = laminate.clt()?;
        let (loads, strains) =
            Self::determine_values(clt, &case.loads, &case.strains, &case.use_strains)?;
        let layers = Self::layer_results(clt, &strains, loads.delta_t, loads.delta_h);

        Ok(CltSolution {
            loads,
            strains,
            layers,
        })
    }
}
