//! Laminate loads, strains and load cases

mod load_case;
mod resultants;
mod strains;

pub use load_case::LoadCase;
pub use resultants::Loads;
pub use strains::Strains;
