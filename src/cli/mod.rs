//! CLI module for kyccheck
//!
//! Handles command-line argument parsing.

pub mod args;

pub use args::{Args, Commands, ValidationArgs, Verbosity};
