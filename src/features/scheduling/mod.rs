//! # Scheduling Feature
//!
//! Tick-driven delivery of affirmation phrases to due subscribers.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod scheduler;

pub use scheduler::DeliveryScheduler;
