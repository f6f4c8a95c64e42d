//! CLI library components for Data Dashboard Studio.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
