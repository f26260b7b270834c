//! Workflex CLI library.
//!
//! This crate provides the command-line interface and the plain-text report
//! renderer for workflex timesheets.

mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{Cli, Commands};
pub use config::Config;
