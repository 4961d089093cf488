//! # Rotation Feature
//!
//! Non-repeating random phrase selection per subscriber.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod picker;

pub use picker::next_phrase;
