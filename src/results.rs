//! Result types for laminate analysis

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Stress and strain at one point of a ply, in ply axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressStrainState {
    /// Stresses (sigma_1, sigma_2, tau_12)
    pub stress: Vec3,
    /// Mechanical strains (eps_1, eps_2, gamma_12)
    pub strain: Vec3,
}

impl StressStrainState {
    /// Create from stress and strain components
    pub fn new(stress: Vec3, strain: Vec3) -> Self {
        Self { stress, strain }
    }

    /// Create a pure stress state (strains zero)
    pub fn from_stress(sigma_1: f64, sigma_2: f64, tau_12: f64) -> Self {
        Self::new(Vec3::new(sigma_1, sigma_2, tau_12), Vec3::zeros())
    }

    pub fn sigma_1(&self) -> f64 {
        self.stress[0]
    }

    pub fn sigma_2(&self) -> f64 {
        self.stress[1]
    }

    pub fn tau_12(&self) -> f64 {
        self.stress[2]
    }
}

impl Default for StressStrainState {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }
}

/// Which surface of a ply a state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Upper,
    Lower,
}

/// Ply-level results of a solved laminate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerResult {
    /// Index of the physical ply, counted from the top
    pub ply: usize,
    /// Fibre angle in degrees
    pub angle: f64,
    /// z-coordinate of the upper surface
    pub z_upper: f64,
    /// z-coordinate of the lower surface
    pub z_lower: f64,
    /// State at the upper surface
    pub upper: StressStrainState,
    /// State at the lower surface
    pub lower: StressStrainState,
}

impl LayerResult {
    /// State at the requested surface
    pub fn state(&self, surface: Surface) -> &StressStrainState {
        match surface {
            Surface::Upper => &self.upper,
            Surface::Lower => &self.lower,
        }
    }
}

/// Failure category reported by a criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureType {
    Undamaged,
    FiberFailure,
    MatrixFailure,
}

/// Reserve factor and governing failure mode of a ply state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveFactor {
    /// Load multiplier at which failure is predicted (`+inf` if unloaded)
    pub min_reserve_factor: f64,
    /// Name of the governing failure mode (empty if unloaded)
    pub failure_name: String,
    /// Category of the governing failure mode
    pub failure_type: FailureType,
}

impl ReserveFactor {
    /// Reserve factor of an unloaded ply
    pub fn undamaged() -> Self {
        Self {
            min_reserve_factor: f64::INFINITY,
            failure_name: String::new(),
            failure_type: FailureType::Undamaged,
        }
    }

    /// Fibre-governed reserve factor
    pub fn fiber(min_reserve_factor: f64, failure_name: &str) -> Self {
        Self {
            min_reserve_factor,
            failure_name: failure_name.to_string(),
            failure_type: FailureType::FiberFailure,
        }
    }

    /// Matrix-governed reserve factor
    pub fn matrix(min_reserve_factor: f64, failure_name: &str) -> Self {
        Self {
            min_reserve_factor,
            failure_name: failure_name.to_string(),
            failure_type: FailureType::MatrixFailure,
        }
    }

    /// Whether the state is safe (`rf >= 1`)
    pub fn is_safe(&self) -> bool {
        self.min_reserve_factor >= 1.0
    }
}

impl Default for ReserveFactor {
    fn default() -> Self {
        Self::undamaged()
    }
}
