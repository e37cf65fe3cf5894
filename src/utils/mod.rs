//! Display helpers

pub mod helper;

pub use helper::*;
