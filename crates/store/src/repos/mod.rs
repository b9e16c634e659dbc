//! Repository traits for record store operations.

pub mod commands;

pub use commands::{CommandRepo, contains_pattern};
