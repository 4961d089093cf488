//! Delivery scheduler
//!
//! One global recurring tick drives a per-user due check; there is no
//! per-user timer state. The due rule is stateless (window hours plus a
//! minute-modulo interval check against the user's local clock), so it
//! survives restarts without any catch-up bookkeeping. The tick period is
//! the granularity at which "due" is evaluated - intervals finer than the
//! tick cannot fire more often than the tick does.
//!
//! Each sweep collects all due deliveries under a single store lock, then
//! dispatches with the lock released so a slow transport never blocks
//! command handling. The store is persisted after dispatch whether or not
//! the send succeeded; a failed send is logged and simply retried at the
//! next due tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use log::{debug, error, info};

use crate::features::catalog::PhraseCatalog;
use crate::features::dispatch::MessageDispatch;
use crate::features::rotation;
use crate::features::users::UserStore;

pub struct DeliveryScheduler {
    store: Arc<UserStore>,
    catalog: Arc<PhraseCatalog>,
    tick: Duration,
}

impl DeliveryScheduler {
    pub fn new(store: Arc<UserStore>, catalog: Arc<PhraseCatalog>, tick: Duration) -> Self {
        DeliveryScheduler {
            store,
            catalog,
            tick,
        }
    }

    /// Run forever. Spawn this on its own task; it ends only with the
    /// process.
    pub async fn run(self, dispatch: Arc<dyn MessageDispatch>) {
        info!(
            "Delivery scheduler running with a {}s tick",
            self.tick.as_secs()
        );
        let mut interval = tokio::time::interval(self.tick);
        // The first interval tick completes immediately; consume it so the
        // first sweep happens one full period after startup.
        interval.tick().await;
        loop {
            interval.tick().await;
            self.sweep_at(Utc::now(), dispatch.as_ref()).await;
        }
    }

    /// One sweep over all users, evaluated against `now`.
    pub async fn sweep_at(&self, now: DateTime<Utc>, dispatch: &dyn MessageDispatch) {
        let catalog = &self.catalog;
        let due = self
            .store
            .with_users(|users| {
                let mut rng = rand::rng();
                let mut due = Vec::new();
                for record in users.values_mut().filter(|r| r.active) {
                    let local = now.with_timezone(&record.timezone().tz());
                    if record.is_due_at(local.hour(), local.minute()) {
                        let phrase = rotation::next_phrase(record, catalog, &mut rng);
                        due.push((record.id, record.user_name.clone(), phrase));
                    }
                }
                due
            })
            .await;

        if due.is_empty() {
            debug!("Sweep found no due users");
            return;
        }

        for (id, name, phrase) in due {
            match dispatch.send(id, &phrase).await {
                Ok(()) => info!("Delivered phrase to user {id} (@{name})"),
                Err(e) => error!("Failed to deliver phrase to user {id} (@{name}): {e}"),
            }
            // Persist regardless of the dispatch outcome
            self.store.save().await;
        }
    }
}
