//! Pipeline module - load, prepare, fit and rank

pub mod error;
pub mod features;
pub mod loader;
pub mod ranking;
pub mod regression;

pub use error::*;
pub use features::*;
pub use loader::*;
pub use ranking::*;
pub use regression::*;
