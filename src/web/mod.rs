//! Web server module
//!
//! JSON API over the research pipeline and its history.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
