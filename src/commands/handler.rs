//! Text command handler
//!
//! Handles: start, stop, test, settings, time, interval, help
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! Parsing and replies are transport-agnostic: the handler receives the
//! sender's id, display name, and raw message text, and returns the reply
//! text. The gateway layer owns actually sending it. Setting commands
//! validate their arguments before touching the store - rejected input
//! never mutates the record.

use log::{debug, info};

use crate::features::rotation;

use super::context::CommandContext;

const HELP_TEXT: &str = "/start 🚀 - subscribe to messages\n\
/stop 🛑 - stop receiving messages\n\
/test 📩 - get a message right now\n\
/settings ⚙️ - show your current settings\n\
/time start end ⏰ - set the delivery window (hours, 0-23)\n\
/interval minutes ⏳ - set minutes between messages\n\
/help ❓ - show this help";

const NOT_REGISTERED: &str = "You are not registered yet. Use /start to sign up.";

const TIME_USAGE: &str = "Wrong format. Use: /time start end\nFor example: /time 8 22";

const TIME_INVALID: &str =
    "Invalid hours. Use values from 0 to 23 with the start before the end.";

const INTERVAL_USAGE: &str = "Wrong format. Use: /interval minutes\nFor example: /interval 60";

const INTERVAL_INVALID: &str =
    "Invalid interval. Use a value from 1 to 1440 minutes (24 hours).";

const UNKNOWN_COMMAND: &str =
    "I don't understand that command. Send /help for the list of commands.";

const RATE_LIMITED: &str = "⏳ Easy there! Give it a few seconds and try again.";

/// Handler for subscriber text commands.
pub struct CommandHandler {
    ctx: CommandContext,
}

impl CommandHandler {
    pub fn new(ctx: CommandContext) -> Self {
        CommandHandler { ctx }
    }

    /// Process one inbound message and produce the reply text.
    ///
    /// Returns `None` for blank input; everything else gets a reply, with
    /// unrecognized text pointed at /help.
    pub async fn handle(&self, user_id: u64, user_name: &str, text: &str) -> Option<String> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let command = *parts.first()?;
        let args = &parts[1..];

        if !self.ctx.rate_limiter.check(user_id) {
            debug!("Rate limited user {user_id} (@{user_name})");
            return Some(RATE_LIMITED.to_string());
        }

        info!("Processing command {command} from user {user_id} (@{user_name})");

        let reply = match command {
            "/start" => self.handle_start(user_id, user_name).await,
            "/stop" => self.handle_stop(user_id).await,
            "/test" => self.handle_test(user_id).await,
            "/settings" => self.handle_settings(user_id).await,
            "/time" => self.handle_time(user_id, args).await,
            "/interval" => self.handle_interval(user_id, args).await,
            "/help" => HELP_TEXT.to_string(),
            _ => UNKNOWN_COMMAND.to_string(),
        };
        Some(reply)
    }

    /// /start - create-if-absent with defaults and activate.
    async fn handle_start(&self, user_id: u64, user_name: &str) -> String {
        let created = self.ctx.store.subscribe(user_id, user_name).await;
        if created {
            info!("Registered new user {user_id} (@{user_name})");
        } else {
            info!("Reactivated user {user_id} (@{user_name})");
        }

        format!(
            "Hi! Trust me with your day and I'll make it warmer and brighter 💕\n\n\
             Here's everything I understand:\n{HELP_TEXT}"
        )
    }

    /// /stop - deactivate; the record stays in storage.
    async fn handle_stop(&self, user_id: u64) -> String {
        match self.ctx.store.update(user_id, |rec| rec.active = false).await {
            Some(()) => {
                "You are unsubscribed from messages. Use /start whenever you want to resume."
                    .to_string()
            }
            None => "You were not subscribed. Use /start to subscribe.".to_string(),
        }
    }

    /// /test - one phrase right now, through the same rotation state the
    /// scheduler uses.
    async fn handle_test(&self, user_id: u64) -> String {
        let catalog = self.ctx.catalog.clone();
        self.ctx
            .store
            .update(user_id, move |rec| {
                rotation::next_phrase(rec, &catalog, &mut rand::rng())
            })
            .await
            .unwrap_or_else(|| NOT_REGISTERED.to_string())
    }

    /// /settings - render the current record.
    async fn handle_settings(&self, user_id: u64) -> String {
        match self.ctx.store.get(user_id).await {
            Some(rec) => format!(
                "Your current settings:\n\
                 Active: {}\n\
                 Delivery start: {}:00\n\
                 Delivery end: {}:00\n\
                 Interval: {} minutes\n\
                 Timezone: {}",
                rec.active, rec.start_hour, rec.end_hour, rec.interval_minutes, rec.time_zone
            ),
            None => NOT_REGISTERED.to_string(),
        }
    }

    /// /time start end - set the delivery window.
    async fn handle_time(&self, user_id: u64, args: &[&str]) -> String {
        if args.len() < 2 {
            return TIME_USAGE.to_string();
        }

        let parsed = args[0]
            .parse::<u32>()
            .ok()
            .zip(args[1].parse::<u32>().ok());
        let Some((start, end)) = parsed.filter(|&(start, end)| start < end && end <= 23) else {
            return TIME_INVALID.to_string();
        };

        match self
            .ctx
            .store
            .update(user_id, |rec| {
                rec.start_hour = start;
                rec.end_hour = end;
            })
            .await
        {
            Some(()) => format!("Messages will be delivered between {start}:00 and {end}:00"),
            None => NOT_REGISTERED.to_string(),
        }
    }

    /// /interval minutes - set the delivery interval.
    async fn handle_interval(&self, user_id: u64, args: &[&str]) -> String {
        let Some(raw) = args.first() else {
            return INTERVAL_USAGE.to_string();
        };

        let Some(minutes) = raw.parse::<u32>().ok().filter(|m| (1..=1440).contains(m)) else {
            return INTERVAL_INVALID.to_string();
        };

        match self
            .ctx
            .store
            .update(user_id, |rec| rec.interval_minutes = minutes)
            .await
        {
            Some(()) => format!("Message interval set to {minutes} minutes"),
            None => NOT_REGISTERED.to_string(),
        }
    }
}
