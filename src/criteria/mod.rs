//! Ply failure criteria

mod max_stress;
mod puck;
mod tsai_wu;

pub use max_stress::MaxStress;
pub use puck::{
    Puck, PuckParameters, FF_COMPRESSION, FF_TENSION, IFF_MODE_A, IFF_MODE_B, IFF_MODE_C,
};
pub use tsai_wu::TsaiWu;

use crate::composite::{Layer, Material};
use crate::error::CltResult;
use crate::results::{ReserveFactor, StressStrainState};

/// A failure model evaluated on one ply state
pub trait Criterion: Send + Sync {
    /// Display name of the criterion
    fn name(&self) -> &str;

    /// Reserve factor of the given ply-axis state
    fn reserve_factor(
        &self,
        material: &Material,
        layer: &Layer,
        state: &StressStrainState,
    ) -> CltResult<ReserveFactor>;
}
