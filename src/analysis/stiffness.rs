//! Laminate stiffness engine
//!
//! Transforms every physical ply into laminate axes and integrates through the
//! thickness to obtain the ABD matrix, its inverse and the hygrothermal
//! resultants per unit temperature/moisture change.

use serde::Serialize;

use crate::composite::{Laminate, Layer};
use crate::error::{CltError, CltResult};
use crate::loads::Strains;
use crate::math::{self, Mat3, Mat6, Vec3, Vec6};
use crate::results::StressStrainState;

/// A physical ply placed in the laminate, with its derived stiffness
#[derive(Debug, Clone, Serialize)]
pub struct CltLayer {
    /// Index of the physical ply, counted from the top
    pub ply: usize,
    /// The ply definition
    pub layer: Layer,
    /// z-coordinate of the upper surface (z points upwards)
    pub z_upper: f64,
    /// z-coordinate of the lower surface
    pub z_lower: f64,
    q: Mat3,
    q_bar: Mat3,
    t_eps: Mat3,
    alpha: Vec3,
    beta: Vec3,
}

impl CltLayer {
    fn new(ply: usize, layer: &Layer, z_upper: f64) -> Self {
        let mat = &layer.material;
        let q = math::reduced_stiffness(mat.e_par, mat.e_nor, mat.nu12, mat.g);
        let t_eps = math::strain_transformation(layer.angle);
        let q_bar = math::transformed_stiffness(&q, layer.angle);

        // expansion coefficients are strain-like, so they rotate with T_eps^-1 = T_sigma^T
        let t_back = math::stress_transformation(layer.angle).transpose();
        let alpha = t_back * Vec3::new(mat.alpha_par, mat.alpha_nor, 0.0);
        let beta = t_back * Vec3::new(mat.beta_par, mat.beta_nor, 0.0);

        Self {
            ply,
            layer: layer.clone(),
            z_upper,
            z_lower: z_upper - layer.thickness,
            q,
            q_bar,
            t_eps,
            alpha,
            beta,
        }
    }

    /// Reduced stiffness in ply axes
    pub fn q(&self) -> &Mat3 {
        &self.q
    }

    /// Reduced stiffness in laminate axes
    pub fn q_bar(&self) -> &Mat3 {
        &self.q_bar
    }

    /// Thermal expansion coefficients in laminate axes
    pub fn alpha(&self) -> &Vec3 {
        &self.alpha
    }

    /// Hygral swelling coefficients in laminate axes
    pub fn beta(&self) -> &Vec3 {
        &self.beta
    }

    /// Ply-axis stress and mechanical strain at height `z`
    pub fn local_state(&self, strains: &Strains, z: f64, delta_t: f64, delta_h: f64) -> StressStrainState {
        let free = self.alpha * delta_t + self.beta * delta_h;
        let mechanical = strains.at_height(z) - free;
        let local_strain = self.t_eps * mechanical;
        StressStrainState::new(self.q * local_strain, local_strain)
    }
}

/// Effective membrane engineering constants of a laminate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineeringConstants {
    pub e_x: f64,
    pub e_y: f64,
    pub g_xy: f64,
    pub nu_xy: f64,
    pub nu_yx: f64,
}

/// Stiffness engine of one laminate state
#[derive(Debug, Clone, Serialize)]
pub struct CltLaminate {
    layers: Vec<CltLayer>,
    thickness: f64,
    abd: Mat6,
    inv_abd: Mat6,
    thermal_unit: Vec6,
    hygral_unit: Vec6,
}

impl CltLaminate {
    /// Build the stiffness engine for the current stack of `laminate`
    pub fn new(laminate: &Laminate) -> CltResult<Self> {
        if laminate.layers().is_empty() {
            return Err(CltError::EmptyLaminate);
        }
        // stored indices, so the error points at the layer to edit
        for (index, layer) in laminate.layers().iter().enumerate() {
            if !(layer.thickness > 0.0 && layer.thickness.is_finite()) {
                return Err(CltError::InvalidThickness {
                    index,
                    thickness: layer.thickness,
                });
            }
        }

        let plies = laminate.physical_layers();
        let thickness = laminate.thickness();
        let mut z = thickness / 2.0 - laminate.offset();

        let mut a = Mat3::zeros();
        let mut b = Mat3::zeros();
        let mut d = Mat3::zeros();
        let mut thermal_unit = Vec6::zeros();
        let mut hygral_unit = Vec6::zeros();
        let mut layers = Vec::with_capacity(plies.len());

        for (ply, layer) in plies.into_iter().enumerate() {
            let clt_layer = CltLayer::new(ply, layer, z);
            let (zu, zl) = (clt_layer.z_upper, clt_layer.z_lower);

            let dz1 = zu - zl;
            let dz2 = (zu * zu - zl * zl) / 2.0;
            let dz3 = (zu * zu * zu - zl * zl * zl) / 3.0;

            let q_bar = clt_layer.q_bar;
            a += q_bar * dz1;
            b += q_bar * dz2;
            d += q_bar * dz3;

            let q_alpha = q_bar * clt_layer.alpha;
            let q_beta = q_bar * clt_layer.beta;
            for i in 0..3 {
                thermal_unit[i] += q_alpha[i] * dz1;
                thermal_unit[i + 3] += q_alpha[i] * dz2;
                hygral_unit[i] += q_beta[i] * dz1;
                hygral_unit[i + 3] += q_beta[i] * dz2;
            }

            z = zl;
            layers.push(clt_layer);
        }

        let abd = math::assemble_abd(&a, &b, &d);
        let inv_abd = math::invert6(&abd)?;

        Ok(Self {
            layers,
            thickness,
            abd,
            inv_abd,
            thermal_unit,
            hygral_unit,
        })
    }

    /// Physical plies from top to bottom
    pub fn layers(&self) -> &[CltLayer] {
        &self.layers
    }

    /// Total thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// 6x6 ABD matrix
    pub fn abd(&self) -> &Mat6 {
        &self.abd
    }

    /// Inverse of the ABD matrix
    pub fn inv_abd(&self) -> &Mat6 {
        &self.inv_abd
    }

    /// Membrane stiffness
    pub fn a(&self) -> Mat3 {
        math::block(&self.abd, 0, 0)
    }

    /// Coupling stiffness
    pub fn b(&self) -> Mat3 {
        math::block(&self.abd, 0, 3)
    }

    /// Bending stiffness
    pub fn d(&self) -> Mat3 {
        math::block(&self.abd, 3, 3)
    }

    /// Membrane block of the compliance
    pub fn compliance_a(&self) -> Mat3 {
        math::block(&self.inv_abd, 0, 0)
    }

    /// Coupling block of the compliance
    pub fn compliance_b(&self) -> Mat3 {
        math::block(&self.inv_abd, 0, 3)
    }

    /// Bending block of the compliance
    pub fn compliance_d(&self) -> Mat3 {
        math::block(&self.inv_abd, 3, 3)
    }

    /// Hygrothermal resultants [N; M] for a uniform temperature and moisture change
    pub fn hygrothermal_loads(&self, delta_t: f64, delta_h: f64) -> Vec6 {
        self.thermal_unit * delta_t + self.hygral_unit * delta_h
    }

    /// Effective membrane engineering constants from the inverse of A
    pub fn engineering_constants(&self) -> CltResult<EngineeringConstants> {
        let a_inv = self.a().try_inverse().ok_or(CltError::SingularMatrix)?;
        let h = self.thickness;
        Ok(EngineeringConstants {
            e_x: 1.0 / (h * a_inv[(0, 0)]),
            e_y: 1.0 / (h * a_inv[(1, 1)]),
            g_xy: 1.0 / (h * a_inv[(2, 2)]),
            nu_xy: -a_inv[(0, 1)] / a_inv[(0, 0)],
            nu_yx: -a_inv[(0, 1)] / a_inv[(1, 1)],
        })
    }
}
