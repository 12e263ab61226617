//! # Application Layer
//!
//! Ports implemented by the connector layer and the use cases every front end
//! goes through.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
