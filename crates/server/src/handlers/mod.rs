//! HTTP request handlers.

pub mod commands;
pub mod common;
pub mod system;
pub mod topics;

pub use commands::*;
pub use common::*;
pub use system::*;
pub use topics::*;
