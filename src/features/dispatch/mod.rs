//! # Dispatch Feature
//!
//! The seam between the delivery engine and the chat transport. The
//! scheduler and command layer talk to a [`MessageDispatch`] trait object;
//! the Discord implementation delivers over DM.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::UserId;

/// Sends one phrase to one user over the chat transport.
///
/// A failed send is an error to the caller, never a panic - the scheduler
/// logs it and moves on.
#[async_trait]
pub trait MessageDispatch: Send + Sync {
    async fn send(&self, user_id: u64, text: &str) -> Result<()>;
}

/// Delivery over Discord DMs.
pub struct DiscordDispatch {
    http: Arc<Http>,
}

impl DiscordDispatch {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordDispatch { http }
    }
}

#[async_trait]
impl MessageDispatch for DiscordDispatch {
    async fn send(&self, user_id: u64, text: &str) -> Result<()> {
        let dm = UserId(user_id).create_dm_channel(self.http.as_ref()).await?;
        dm.say(self.http.as_ref(), text).await?;
        Ok(())
    }
}

/// Test double that records every send in memory.
#[cfg(test)]
pub struct RecordingDispatch {
    calls: std::sync::Mutex<Vec<(u64, String)>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingDispatch {
    pub fn new() -> Self {
        RecordingDispatch {
            calls: std::sync::Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        RecordingDispatch {
            calls: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(u64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl MessageDispatch for RecordingDispatch {
    async fn send(&self, user_id: u64, text: &str) -> Result<()> {
        self.calls.lock().unwrap().push((user_id, text.to_string()));
        if self.fail {
            anyhow::bail!("transport unavailable");
        }
        Ok(())
    }
}
