//! Generalized mid-plane strains

use serde::{Deserialize, Serialize};

use crate::math::{Vec3, Vec6};

/// Mid-plane strains and curvatures of a laminate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Strains {
    pub eps_x: f64,
    pub eps_y: f64,
    pub gamma_xy: f64,
    pub kappa_x: f64,
    pub kappa_y: f64,
    pub kappa_xy: f64,
}

impl Strains {
    pub fn new(
        eps_x: f64,
        eps_y: f64,
        gamma_xy: f64,
        kappa_x: f64,
        kappa_y: f64,
        kappa_xy: f64,
    ) -> Self {
        Self {
            eps_x,
            eps_y,
            gamma_xy,
            kappa_x,
            kappa_y,
            kappa_xy,
        }
    }

    /// Create from vector [eps_x, eps_y, gamma_xy, kappa_x, kappa_y, kappa_xy]
    pub fn from_vector(v: &Vec6) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.eps_x,
            self.eps_y,
            self.gamma_xy,
            self.kappa_x,
            self.kappa_y,
            self.kappa_xy,
        ]
    }

    pub fn as_vector(&self) -> Vec6 {
        Vec6::from_column_slice(&self.as_array())
    }

    /// Laminate-axis strain at height `z`: `eps0 + z * kappa`
    pub fn at_height(&self, z: f64) -> Vec3 {
        Vec3::new(
            self.eps_x + z * self.kappa_x,
            self.eps_y + z * self.kappa_y,
            self.gamma_xy + z * self.kappa_xy,
        )
    }
}
