//! Request and response bodies

pub mod prediction;
pub mod symptoms;

pub use prediction::*;
pub use symptoms::*;
