//! Shared context for command handling
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::sync::Arc;

use crate::features::catalog::PhraseCatalog;
use crate::features::rate_limiting::RateLimiter;
use crate::features::users::UserStore;

/// Shared state for the command handler.
///
/// Explicitly constructed and passed by handle - there is no process-wide
/// singleton - so handlers can be exercised in isolation with their own
/// store and catalog.
#[derive(Clone)]
pub struct CommandContext {
    pub store: Arc<UserStore>,
    pub catalog: Arc<PhraseCatalog>,
    pub rate_limiter: RateLimiter,
}

impl CommandContext {
    pub fn new(
        store: Arc<UserStore>,
        catalog: Arc<PhraseCatalog>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            store,
            catalog,
            rate_limiter,
        }
    }
}
