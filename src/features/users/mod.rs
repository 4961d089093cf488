//! # Users Feature
//!
//! Subscriber records and the shared persistent user store.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Tag timezone resolution outcome (resolved vs fell back to UTC)
//! - 1.0.0: Initial implementation

pub mod record;
pub mod store;

pub use record::{TzResolution, UserRecord};
pub use store::UserStore;
