//! # Domain Layer
//!
//! Core models (persona, task requests, generation parameters, transcripts)
//! and the error type. Independent of HTTP, terminals and web frameworks.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
