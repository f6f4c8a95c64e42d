//! Shared utilities for Data Dashboard Studio crates.
//!
//! This crate holds the canonical numeric-literal rule and date recognition
//! used across the workspace.

pub mod date;
pub mod number;

// Re-export commonly used functions at crate root for convenience
pub use date::{is_date, parse_date};
pub use number::{finite, format_number, parse_number};
