//! Orthotropic ply material

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of Puck's inclination parameter for transverse tension
pub const PUCK_PSPZ: &str = "pspz";
/// Key of Puck's inclination parameter for transverse compression
pub const PUCK_PSPD: &str = "pspd";
/// Key of Puck's weakening onset (fraction of fibre strength)
pub const PUCK_A0: &str = "a0";
/// Key of Puck's minimal weakening factor
pub const PUCK_LAMBDA_MIN: &str = "lambda_min";
/// Key of the normalized Tsai-Wu interaction coefficient
pub const TSAI_WU_F12_STAR: &str = "f12star";

/// Material properties of a unidirectional ply
///
/// Indices follow the ply axes: `par` along the fibres, `nor` transverse to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Young's modulus parallel to the fibres
    pub e_par: f64,
    /// Young's modulus transverse to the fibres
    pub e_nor: f64,
    /// Major Poisson's ratio
    pub nu12: f64,
    /// In-plane shear modulus
    pub g: f64,
    /// Transverse shear modulus 1-3
    pub g13: Option<f64>,
    /// Transverse shear modulus 2-3
    pub g23: Option<f64>,
    /// Density
    pub rho: f64,
    /// Thermal expansion coefficient parallel to the fibres
    pub alpha_par: f64,
    /// Thermal expansion coefficient transverse to the fibres
    pub alpha_nor: f64,
    /// Hygral swelling coefficient parallel to the fibres
    pub beta_par: f64,
    /// Hygral swelling coefficient transverse to the fibres
    pub beta_nor: f64,
    /// Tensile strength parallel to the fibres
    pub r_par_ten: f64,
    /// Compressive strength parallel to the fibres (positive value)
    pub r_par_com: f64,
    /// Tensile strength transverse to the fibres
    pub r_nor_ten: f64,
    /// Compressive strength transverse to the fibres (positive value)
    pub r_nor_com: f64,
    /// In-plane shear strength
    pub r_shear: f64,
    /// Named criterion parameters, e.g. Puck's `pspz`, `pspd`, `a0`, `lambda_min`
    #[serde(default)]
    pub additional: BTreeMap<String, f64>,
}

impl Material {
    /// Create a material from its elastic constants; strengths and
    /// expansion coefficients start at zero
    pub fn new(name: &str, e_par: f64, e_nor: f64, nu12: f64, g: f64) -> Self {
        Self {
            name: name.to_string(),
            e_par,
            e_nor,
            nu12,
            g,
            g13: None,
            g23: None,
            rho: 0.0,
            alpha_par: 0.0,
            alpha_nor: 0.0,
            beta_par: 0.0,
            beta_nor: 0.0,
            r_par_ten: 0.0,
            r_par_com: 0.0,
            r_nor_ten: 0.0,
            r_nor_com: 0.0,
            r_shear: 0.0,
            additional: BTreeMap::new(),
        }
    }

    /// Set the five ply strengths (compressive values positive)
    pub fn with_strengths(
        mut self,
        r_par_ten: f64,
        r_par_com: f64,
        r_nor_ten: f64,
        r_nor_com: f64,
        r_shear: f64,
    ) -> Self {
        self.r_par_ten = r_par_ten;
        self.r_par_com = r_par_com;
        self.r_nor_ten = r_nor_ten;
        self.r_nor_com = r_nor_com;
        self.r_shear = r_shear;
        self
    }

    /// Set thermal expansion coefficients
    pub fn with_thermal_expansion(mut self, alpha_par: f64, alpha_nor: f64) -> Self {
        self.alpha_par = alpha_par;
        self.alpha_nor = alpha_nor;
        self
    }

    /// Set hygral swelling coefficients
    pub fn with_hygral_expansion(mut self, beta_par: f64, beta_nor: f64) -> Self {
        self.beta_par = beta_par;
        self.beta_nor = beta_nor;
        self
    }

    /// Set the density
    pub fn with_density(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set the transverse shear moduli
    pub fn with_transverse_shear(mut self, g13: f64, g23: f64) -> Self {
        self.g13 = Some(g13);
        self.g23 = Some(g23);
        self
    }

    /// Add a named criterion parameter
    pub fn with_parameter(mut self, key: &str, value: f64) -> Self {
        self.additional.insert(key.to_string(), value);
        self
    }

    /// Minor Poisson's ratio from reciprocity
    pub fn nu21(&self) -> f64 {
        self.nu12 * self.e_nor / self.e_par
    }

    /// Named parameter, if present
    pub fn parameter(&self, key: &str) -> Option<f64> {
        self.additional.get(key).copied()
    }

    /// Named parameter or the given default
    pub fn parameter_or(&self, key: &str, default: f64) -> f64 {
        self.parameter(key).unwrap_or(default)
    }

    /// Carbon/epoxy prepreg with typical Puck parameters (N, mm, K)
    pub fn cfrp() -> Self {
        Self::new("CFRP", 132700.0, 9300.0, 0.28, 4600.0)
            .with_strengths(2280.0, 1440.0, 57.0, 228.0, 71.0)
            .with_thermal_expansion(-0.3e-6, 28.0e-6)
            .with_hygral_expansion(0.0, 0.4)
            .with_density(1.58e-9)
            .with_parameter(PUCK_PSPZ, 0.35)
            .with_parameter(PUCK_PSPD, 0.30)
            .with_parameter(PUCK_A0, 0.5)
            .with_parameter(PUCK_LAMBDA_MIN, 0.5)
    }

    /// E-glass/epoxy prepreg with typical Puck parameters (N, mm, K)
    pub fn gfrp() -> Self {
        Self::new("GFRP", 45600.0, 16200.0, 0.278, 5830.0)
            .with_strengths(1280.0, 800.0, 40.0, 145.0, 73.0)
            .with_thermal_expansion(8.6e-6, 26.4e-6)
            .with_hygral_expansion(0.0, 0.3)
            .with_density(2.0e-9)
            .with_parameter(PUCK_PSPZ, 0.30)
            .with_parameter(PUCK_PSPD, 0.25)
            .with_parameter(PUCK_A0, 0.5)
            .with_parameter(PUCK_LAMBDA_MIN, 0.5)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::cfrp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reciprocity() {
        let mat = Material::cfrp();
        assert_relative_eq!(mat.nu12 * mat.e_nor, mat.nu21() * mat.e_par, epsilon = 1e-9);
    }

    #[test]
    fn test_parameter_lookup() {
        let mat = Material::new("M", 1.0, 1.0, 0.3, 0.5).with_parameter(PUCK_PSPZ, 0.25);
        assert_eq!(mat.parameter(PUCK_PSPZ), Some(0.25));
        assert_eq!(mat.parameter_or(PUCK_PSPD, 0.3), 0.3);
    }
}
