//! Environment-driven configuration
//!
//! All settings come from environment variables (a `.env` file is loaded by
//! the binary before this runs). Every value has a usable default. A missing
//! `DISCORD_TOKEN` is not an error here; the transport layer surfaces its
//! own failure.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::env;

/// Default scheduler tick period in seconds - the granularity at which
/// per-user due checks are evaluated.
pub const DEFAULT_TICK_SECONDS: u64 = 60;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token. May be empty; the transport layer reports the
    /// failure itself.
    pub discord_token: String,
    /// Path of the persisted user state file.
    pub users_path: String,
    /// Path of the phrase catalog file.
    pub phrases_path: String,
    /// Default log filter when RUST_LOG is not set.
    pub log_level: String,
    /// Scheduler tick period in seconds.
    pub tick_seconds: u64,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        Config {
            discord_token: env::var("DISCORD_TOKEN").unwrap_or_default(),
            users_path: env::var("USERS_PATH").unwrap_or_else(|_| "users.json".to_string()),
            phrases_path: env::var("PHRASES_PATH").unwrap_or_else(|_| "phrases.json".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tick_seconds: env::var("TICK_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TICK_SECONDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so this stays a single test
    #[test]
    fn test_defaults_and_garbage_tick() {
        env::remove_var("USERS_PATH");
        env::remove_var("PHRASES_PATH");
        env::remove_var("TICK_SECONDS");

        let config = Config::from_env();
        assert_eq!(config.users_path, "users.json");
        assert_eq!(config.phrases_path, "phrases.json");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tick_seconds, DEFAULT_TICK_SECONDS);

        env::set_var("TICK_SECONDS", "not-a-number");
        assert_eq!(Config::from_env().tick_seconds, DEFAULT_TICK_SECONDS);

        env::set_var("TICK_SECONDS", "15");
        assert_eq!(Config::from_env().tick_seconds, 15);
        env::remove_var("TICK_SECONDS");
    }
}
