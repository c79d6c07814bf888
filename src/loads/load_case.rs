//! Load cases

use serde::{Deserialize, Serialize};

use super::{Loads, Strains};

/// A named boundary condition for one laminate analysis
///
/// For every degree of freedom `use_strains[i]` selects whether the strain
/// (`true`) or the resultant (`false`) is prescribed; the other side is
/// solved for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Name of the load case
    pub name: String,
    /// Resultants (prescribed where `use_strains` is false)
    pub loads: Loads,
    /// Mid-plane strains (prescribed where `use_strains` is true)
    #[serde(default)]
    pub strains: Strains,
    /// Per degree of freedom: strain prescribed instead of resultant
    #[serde(default)]
    pub use_strains: [bool; 6],
}

impl LoadCase {
    /// Create a load case with all six resultants prescribed
    pub fn new(name: &str, loads: Loads) -> Self {
        Self {
            name: name.to_string(),
            loads,
            strains: Strains::default(),
            use_strains: [false; 6],
        }
    }

    /// Create a load case with all six strains prescribed
    pub fn from_strains(name: &str, strains: Strains) -> Self {
        Self {
            name: name.to_string(),
            loads: Loads::default(),
            strains,
            use_strains: [true; 6],
        }
    }

    /// Prescribe the strain of degree of freedom `dof` instead of its resultant
    pub fn with_prescribed_strain(mut self, dof: usize, value: f64) -> Self {
        if dof < 6 {
            let mut strains = self.strains.as_array();
            strains[dof] = value;
            self.strains = Strains::new(
                strains[0], strains[1], strains[2], strains[3], strains[4], strains[5],
            );
            self.use_strains[dof] = true;
        }
        self
    }
}

impl Default for LoadCase {
    fn default() -> Self {
        Self::new("Case 1", Loads::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prescribed_strain_sets_mask() {
        let case = LoadCase::new("C", Loads::membrane(100.0, 0.0, 0.0))
            .with_prescribed_strain(4, 1e-3);
        assert_eq!(case.use_strains, [false, false, false, false, true, false]);
        assert_eq!(case.strains.kappa_y, 1e-3);
    }
}
