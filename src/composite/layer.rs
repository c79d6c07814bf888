//! A single ply of a laminate

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::Material;

/// One ply: material, fibre angle and thickness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Ply material
    pub material: Arc<Material>,
    /// Fibre angle in degrees, counter-clockwise from the laminate x-axis
    pub angle: f64,
    /// Ply thickness (must be positive)
    pub thickness: f64,
}

impl Layer {
    /// Create a new layer
    pub fn new(material: Arc<Material>, angle: f64, thickness: f64) -> Self {
        Self {
            material,
            angle,
            thickness,
        }
    }

    /// Areal weight of the ply
    pub fn areal_weight(&self) -> f64 {
        self.material.rho * self.thickness
    }
}
