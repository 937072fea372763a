//! Books catalogue schema
//!
//! Collection schema modules for the books catalogue and the document
//! models they constrain.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
