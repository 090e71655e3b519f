//! Poll cycle: fetch, filter, diff against stored state, dispatch, persist.

use crate::client::BountyClient;
use crate::config::Config;
use crate::filter::BountyFilter;
use crate::state::StateStore;
use crate::types::{Bounty, PollSummary, WebhookEvent, WebhookPayload};
use crate::webhook::WebhookDispatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Runs poll cycles against the upstream API.
///
/// Cycles are serialized: the timer and manual triggers share one lock held
/// for the whole load-modify-save sequence, so overlapping triggers never
/// lose each other's state updates.
pub struct Poller {
    source: BountyClient,
    filter: BountyFilter,
    store: StateStore,
    dispatcher: WebhookDispatcher,
    interval: Duration,
    cycle_lock: Mutex<()>,
}

impl Poller {
    pub fn new(
        source: BountyClient,
        filter: BountyFilter,
        store: StateStore,
        dispatcher: WebhookDispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            filter,
            store,
            dispatcher,
            interval,
            cycle_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            BountyClient::new(config),
            BountyFilter::from_config(config),
            StateStore::new(&config.state_file),
            WebhookDispatcher::new(
                config.webhook_urls.clone(),
                Duration::from_secs(config.http_timeout_seconds),
            ),
            Duration::from_secs(config.poll_interval_seconds),
        )
    }

    pub fn source(&self) -> &BountyClient {
        &self.source
    }

    pub fn filter(&self) -> &BountyFilter {
        &self.filter
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Run one full poll cycle and report what it did
    pub async fn poll(&self) -> PollSummary {
        let _guard = self.cycle_lock.lock().await;

        let mut state = self.store.load().await;

        let bounties = match self.source.fetch_all().await {
            Ok(bounties) => bounties,
            Err(e) => {
                error!("Poll failed: {}", e);
                return PollSummary::failed();
            }
        };

        let mut summary = PollSummary::default();

        for bounty in bounties {
            if !self.filter.matches(&bounty) {
                continue;
            }

            match state.status_of(&bounty.id).cloned() {
                None => {
                    // First sighting is always "created", whatever the status
                    state.record(&bounty.id, bounty.status.clone());
                    info!("New bounty {}: {}", bounty.id, bounty.short_title(60));
                    self.notify(WebhookEvent::Created, bounty).await;
                    summary.created += 1;
                }
                Some(previous) if previous == bounty.status => {}
                Some(previous) => {
                    info!(
                        "Bounty {} changed: {} -> {}",
                        bounty.id, previous, bounty.status
                    );
                    state.record(&bounty.id, bounty.status.clone());
                    match bounty.status.event() {
                        Some(event) => self.notify(event, bounty).await,
                        None => debug!("No event for status {}", bounty.status),
                    }
                    summary.changed += 1;
                }
            }
        }

        if let Err(e) = self.store.save(&state).await {
            error!("Failed to persist state: {:#}", e);
            summary.errors += 1;
        }

        info!("Poll complete: {}", summary);
        summary
    }

    async fn notify(&self, event: WebhookEvent, bounty: Bounty) {
        if !self.dispatcher.is_enabled() {
            return;
        }

        let payload = WebhookPayload::new(event, bounty);
        let delivered = self.dispatcher.dispatch(&payload).await;
        debug!(
            "{} delivered to {}/{} webhooks",
            event,
            delivered,
            self.dispatcher.destinations().len()
        );
    }

    /// Poll immediately, then once per interval, forever
    pub async fn run(self: Arc<Self>) {
        loop {
            let cycle_start = Instant::now();

            self.poll().await;

            // Adaptive sleep: account for cycle duration
            if let Some(remaining) = self.interval.checked_sub(cycle_start.elapsed()) {
                tokio::time::sleep(remaining).await;
            }
        }
    }
}
