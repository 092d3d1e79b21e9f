//! Data loading and validation for game content.

pub mod load;
pub mod validate;

pub use load::*;
pub use validate::*;
