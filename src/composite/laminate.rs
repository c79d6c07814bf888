//! Laminate - ordered stack of plies

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::sync::Arc;

use super::{Layer, Material};
use crate::analysis::CltLaminate;
use crate::error::{CltError, CltResult};

/// An ordered ply stack, listed from the top surface downwards
///
/// For symmetric laminates only the upper half is stored; the lower half is
/// mirrored about the mid-plane. With `middle_layer` set, the last stored
/// layer sits on the mid-plane and is not duplicated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Laminate {
    /// Laminate name
    #[serde(default)]
    pub name: String,
    layers: Vec<Layer>,
    #[serde(default)]
    symmetric: bool,
    #[serde(default)]
    middle_layer: bool,
    #[serde(default)]
    offset: f64,

    /// Stiffness engine, rebuilt on first use after any structural change
    #[serde(skip)]
    clt: OnceCell<CltLaminate>,
}

impl Laminate {
    /// Create an empty laminate
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Create a laminate of equal-thickness plies of one material
    pub fn from_angles(name: &str, material: Arc<Material>, angles: &[f64], thickness: f64) -> Self {
        let mut laminate = Self::new(name);
        for &angle in angles {
            laminate.add_layer(Layer::new(material.clone(), angle, thickness));
        }
        laminate
    }

    /// Builder: mark the stored stack as the upper half of a symmetric laminate
    pub fn with_symmetry(mut self, symmetric: bool, middle_layer: bool) -> Self {
        self.set_symmetric(symmetric, middle_layer);
        self
    }

    /// Builder: shift the reference plane
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.set_offset(offset);
        self
    }

    // ========================
    // Stack modification
    // ========================

    /// Append a layer at the bottom of the stored stack
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
        self.invalidate();
    }

    /// Insert a layer at position `index`
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> CltResult<()> {
        if index > self.layers.len() {
            return Err(self.out_of_range(index));
        }
        self.layers.insert(index, layer);
        self.invalidate();
        Ok(())
    }

    /// Remove and return the layer at position `index`
    pub fn remove_layer(&mut self, index: usize) -> CltResult<Layer> {
        if index >= self.layers.len() {
            return Err(self.out_of_range(index));
        }
        let layer = self.layers.remove(index);
        self.invalidate();
        Ok(layer)
    }

    /// Remove all layers
    pub fn clear_layers(&mut self) {
        self.layers.clear();
        self.invalidate();
    }

    /// Change the fibre angle of a layer
    pub fn set_angle(&mut self, index: usize, angle: f64) -> CltResult<()> {
        self.layer_mut(index)?.angle = angle;
        self.invalidate();
        Ok(())
    }

    /// Change the thickness of a layer
    pub fn set_thickness(&mut self, index: usize, thickness: f64) -> CltResult<()> {
        self.layer_mut(index)?.thickness = thickness;
        self.invalidate();
        Ok(())
    }

    /// Change the material of a layer
    pub fn set_material(&mut self, index: usize, material: Arc<Material>) -> CltResult<()> {
        self.layer_mut(index)?.material = material;
        self.invalidate();
        Ok(())
    }

    /// Change the symmetry flags
    pub fn set_symmetric(&mut self, symmetric: bool, middle_layer: bool) {
        self.symmetric = symmetric;
        self.middle_layer = symmetric && middle_layer;
        self.invalidate();
    }

    /// Change the reference plane offset
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.invalidate();
    }

    fn layer_mut(&mut self, index: usize) -> CltResult<&mut Layer> {
        let len = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(CltError::LayerIndexOutOfRange { index, len })
    }

    fn out_of_range(&self, index: usize) -> CltError {
        CltError::LayerIndexOutOfRange {
            index,
            len: self.layers.len(),
        }
    }

    fn invalidate(&mut self) {
        self.clt.take();
    }

    // ========================
    // Queries
    // ========================

    /// Stored layers (upper half for symmetric laminates)
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Stored layer at `index`
    pub fn layer(&self, index: usize) -> CltResult<&Layer> {
        self.layers.get(index).ok_or_else(|| self.out_of_range(index))
    }

    /// Number of stored layers
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn has_middle_layer(&self) -> bool {
        self.middle_layer
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// All physical plies from top to bottom, with the mirrored half expanded
    pub fn physical_layers(&self) -> Vec<&Layer> {
        let mut plies: Vec<&Layer> = self.layers.iter().collect();
        if self.symmetric {
            let skip = usize::from(self.middle_layer);
            plies.extend(self.layers.iter().rev().skip(skip));
        }
        plies
    }

    /// Number of physical plies
    pub fn num_plies(&self) -> usize {
        if !self.symmetric {
            return self.layers.len();
        }
        let doubled = 2 * self.layers.len();
        if self.middle_layer && !self.layers.is_empty() {
            doubled - 1
        } else {
            doubled
        }
    }

    /// Total laminate thickness
    pub fn thickness(&self) -> f64 {
        let sum: f64 = self.layers.iter().map(|l| l.thickness).sum();
        if !self.symmetric {
            return sum;
        }
        let middle = match (self.middle_layer, self.layers.last()) {
            (true, Some(layer)) => layer.thickness,
            _ => 0.0,
        };
        2.0 * sum - middle
    }

    /// Areal weight of all physical plies
    pub fn areal_weight(&self) -> f64 {
        self.physical_layers().iter().map(|l| l.areal_weight()).sum()
    }

    /// Stiffness engine for the current stack, built lazily and reused
    /// until the stack changes
    pub fn clt(&self) -> CltResult<&CltLaminate> {
        if let Some(clt) = self.clt.get() {
            return Ok(clt);
        }
        let clt = CltLaminate::new(self)?;
        Ok(self.clt.get_or_init(|| clt))
    }

    /// Serialize to JSON
    pub fn to_json_string(&self) -> CltResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json_str(json: &str) -> CltResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn material() -> Arc<Material> {
        Arc::new(Material::cfrp())
    }

    #[test]
    fn test_symmetric_thickness_and_plies() {
        let lam = Laminate::from_angles("L", material(), &[0.0, 45.0, 90.0], 0.2)
            .with_symmetry(true, false);
        assert_eq!(lam.num_plies(), 6);
        assert_relative_eq!(lam.thickness(), 1.2, epsilon = 1e-12);

        let lam = lam.with_symmetry(true, true);
        assert_eq!(lam.num_plies(), 5);
        assert_relative_eq!(lam.thickness(), 1.0, epsilon = 1e-12);

        let angles: Vec<f64> = lam.physical_layers().iter().map(|l| l.angle).collect();
        assert_eq!(angles, vec![0.0, 45.0, 90.0, 45.0, 0.0]);
    }

    #[test]
    fn test_modification_invalidates_stiffness() {
        let mut lam = Laminate::from_angles("L", material(), &[0.0, 90.0], 0.125);
        let a11_before = lam.clt().unwrap().a()[(0, 0)];

        lam.set_angle(1, 0.0).unwrap();
        let a11_after = lam.clt().unwrap().a()[(0, 0)];
        assert!(a11_after > a11_before);

        lam.set_thickness(0, 0.25).unwrap();
        assert_relative_eq!(lam.clt().unwrap().thickness(), 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetry_and_offset_invalidate_stiffness() {
        let mut lam = Laminate::from_angles("L", material(), &[0.0, 90.0], 0.125);
        assert!(lam.clt().unwrap().b().amax() > 1.0);

        lam.set_symmetric(true, false);
        let clt = lam.clt().unwrap();
        assert_eq!(clt.layers().len(), 4);
        assert!(clt.b().amax() < 1e-9);

        lam.set_symmetric(false, false);
        let b11 = lam.clt().unwrap().b()[(0, 0)];
        lam.set_offset(0.1);
        let a11 = lam.clt().unwrap().a()[(0, 0)];
        // shifting the reference plane down adds -offset * A to B
        assert_relative_eq!(lam.clt().unwrap().b()[(0, 0)], b11 - 0.1 * a11, max_relative = 1e-9);
    }

    #[test]
    fn test_material_change_invalidates_stiffness() {
        let mut lam = Laminate::from_angles("L", material(), &[0.0, 90.0], 0.125);
        let a11_cfrp = lam.clt().unwrap().a()[(0, 0)];
        lam.set_material(0, Arc::new(Material::gfrp())).unwrap();
        assert!(lam.clt().unwrap().a()[(0, 0)] < a11_cfrp);
    }

    #[test]
    fn test_stack_edits_invalidate_stiffness() {
        let mut lam = Laminate::from_angles("L", material(), &[0.0, 90.0], 0.125);
        assert_eq!(lam.clt().unwrap().layers().len(), 2);

        lam.insert_layer(1, Layer::new(material(), 45.0, 0.125)).unwrap();
        let clt = lam.clt().unwrap();
        assert_eq!(clt.layers().len(), 3);
        assert_eq!(clt.layers()[1].layer.angle, 45.0);

        let removed = lam.remove_layer(0).unwrap();
        assert_eq!(removed.angle, 0.0);
        let clt = lam.clt().unwrap();
        assert_eq!(clt.layers().len(), 2);
        assert_relative_eq!(clt.thickness(), 0.25, epsilon = 1e-12);

        lam.clear_layers();
        assert!(matches!(lam.clt(), Err(CltError::EmptyLaminate)));
    }

    #[test]
    fn test_layer_index_errors() {
        let mut lam = Laminate::new("L");
        assert!(matches!(
            lam.set_angle(0, 45.0),
            Err(CltError::LayerIndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(lam.remove_layer(3).is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_stack() {
        let lam = Laminate::from_angles("L", material(), &[0.0, 45.0], 0.125)
            .with_symmetry(true, false);
        let json = lam.to_json_string().unwrap();
        let back = Laminate::from_json_str(&json).unwrap();
        assert_eq!(back.num_plies(), 4);
        assert_eq!(back.layers()[1].angle, 45.0);
        assert!(back.is_symmetric());
    }
}
