//! Core domain types and shared logic for the comandos service.
//!
//! This crate defines the data model used across the other crates:
//! - Command records and the input accepted by create/update
//! - The grouped-by-topic view
//! - Configuration types

pub mod command;
pub mod config;
pub mod error;
pub mod grouping;

pub use command::{Command, CommandInput, GroupedCommand};
pub use error::{Error, Result};
pub use grouping::{GroupedCommands, group_by_topic};

/// Header carrying the API key when none is configured.
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
