//! # Features Module
//!
//! All feature modules of the affirmation bot.

pub mod catalog;
pub mod dispatch;
pub mod rate_limiting;
pub mod rotation;
pub mod scheduling;
pub mod users;

// Re-export feature items
pub use catalog::PhraseCatalog;
pub use dispatch::{DiscordDispatch, MessageDispatch};
pub use rate_limiting::RateLimiter;
pub use scheduling::DeliveryScheduler;
pub use users::{TzResolution, UserRecord, UserStore};
