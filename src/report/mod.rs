//! Report module - run summaries and reference exports

pub mod reference_export;
pub mod summary;

pub use reference_export::*;
pub use summary::*;
