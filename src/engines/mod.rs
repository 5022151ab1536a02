//! Search engine module
//!
//! Defines the Engine trait and the HTML engines behind the web search client.

mod loader;
mod traits;

pub mod brave;
pub mod duckduckgo;

pub use loader::EngineLoader;
pub use traits::*;
