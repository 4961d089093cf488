// Core layer - shared configuration
pub mod core;

// Features layer - all feature modules
pub mod features;

// Application layer
pub mod commands;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items
pub use features::{
    // Catalog
    PhraseCatalog,
    // Dispatch
    DiscordDispatch, MessageDispatch,
    // Rate limiting
    RateLimiter,
    // Scheduling
    DeliveryScheduler,
    // Users
    TzResolution, UserRecord, UserStore,
};
