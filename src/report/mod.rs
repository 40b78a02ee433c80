//! Report module - response shaping, console summary and JSON export

pub mod export;
pub mod response;
pub mod summary;

pub use export::*;
pub use response::*;
pub use summary::*;
