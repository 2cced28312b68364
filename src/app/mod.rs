//! Application state: the course collection, selections, and the
//! controller that drives generation and persistence

pub mod controller;
pub mod state;

pub use controller::{AppController, GenerationRequest};
pub use state::AppState;
