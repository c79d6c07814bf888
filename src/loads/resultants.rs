//! Force and moment resultants acting on a laminate

use serde::{Deserialize, Serialize};

use crate::math::Vec6;

/// Running force/moment resultants plus a uniform temperature and moisture change
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Loads {
    /// Normal force per unit width in x
    pub n_x: f64,
    /// Normal force per unit width in y
    pub n_y: f64,
    /// Shear force per unit width
    pub n_xy: f64,
    /// Bending moment per unit width about y (acting in x)
    pub m_x: f64,
    /// Bending moment per unit width about x (acting in y)
    pub m_y: f64,
    /// Twisting moment per unit width
    pub m_xy: f64,
    /// Uniform temperature change
    #[serde(default)]
    pub delta_t: f64,
    /// Uniform moisture change
    #[serde(default)]
    pub delta_h: f64,
}

impl Loads {
    /// Create resultants without temperature or moisture change
    pub fn new(n_x: f64, n_y: f64, n_xy: f64, m_x: f64, m_y: f64, m_xy: f64) -> Self {
        Self {
            n_x,
            n_y,
            n_xy,
            m_x,
            m_y,
            m_xy,
            delta_t: 0.0,
            delta_h: 0.0,
        }
    }

    /// Create membrane-only resultants
    pub fn membrane(n_x: f64, n_y: f64, n_xy: f64) -> Self {
        Self::new(n_x, n_y, n_xy, 0.0, 0.0, 0.0)
    }

    /// Create bending-only resultants
    pub fn bending(m_x: f64, m_y: f64, m_xy: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, m_x, m_y, m_xy)
    }

    /// Set the uniform temperature and moisture change
    pub fn with_environment(mut self, delta_t: f64, delta_h: f64) -> Self {
        self.delta_t = delta_t;
        self.delta_h = delta_h;
        self
    }

    /// Resultants as array [Nx, Ny, Nxy, Mx, My, Mxy]
    pub fn as_array(&self) -> [f64; 6] {
        [self.n_x, self.n_y, self.n_xy, self.m_x, self.m_y, self.m_xy]
    }

    /// Resultants as vector [Nx, Ny, Nxy, Mx, My, Mxy]
    pub fn as_vector(&self) -> Vec6 {
        Vec6::from_column_slice(&self.as_array())
    }

    /// Replace the six resultants, keeping temperature and moisture change
    pub fn with_resultants(mut self, v: &Vec6) -> Self {
        self.n_x = v[0];
        self.n_y = v[1];
        self.n_xy = v[2];
        self.m_x = v[3];
        self.m_y = v[4];
        self.m_xy = v[5];
        self
    }

    /// Scale the mechanical resultants (temperature and moisture stay unchanged)
    pub fn scaled(&self, factor: f64) -> Self {
        self.with_resultants(&(self.as_vector() * factor))
    }
}
