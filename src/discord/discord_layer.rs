// Discord layer - the inbound surface. Commands only, no business logic.

#[path = "commands/command_catalog.rs"]
pub mod commands;

// Re-export command types for convenience
pub use commands::highlight::{Data, Error};
