//! # DiaCheck Library
//!
//! This library exposes the DiaCheck modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod session;
pub mod terminal;

// Re-export diacheck_core for convenience
pub use diacheck_core;
