//! # Command System
//!
//! Text command (/) handling for subscriber chat messages.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod context;
pub mod handler;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::CommandHandler;
