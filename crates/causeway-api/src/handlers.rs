//! Request handlers for the Causeway API.

pub mod health;
pub mod problems;
pub mod triage;

pub use health::*;
pub use problems::*;
pub use triage::*;
