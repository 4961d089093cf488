//! # Phrase Catalog Feature
//!
//! The shared list of affirmation phrases, loaded once at startup.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod phrases;

pub use phrases::PhraseCatalog;
