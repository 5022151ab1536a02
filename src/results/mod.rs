//! Result types
//!
//! Search hits, extracted documents and completed research runs.

mod types;

pub use types::*;
