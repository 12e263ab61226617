//! # Connector Layer
//!
//! External integrations and front ends:
//! - Generation clients (Gemini over HTTP, offline echo)
//! - CLI container, router and controllers
//! - Interactive console menu
//! - Web UI

pub mod adapter;
pub mod api;
pub mod console;
pub mod web;

pub use adapter::*;
pub use console::*;
pub use web::*;
