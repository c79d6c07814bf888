//! Composite building blocks: ply material, layer and laminate

mod laminate;
mod layer;
mod material;

pub use laminate::Laminate;
pub use layer::Layer;
pub use material::{
    Material, PUCK_A0, PUCK_LAMBDA_MIN, PUCK_PSPD, PUCK_PSPZ, TSAI_WU_F12_STAR,
};
