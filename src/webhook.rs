//! Webhook fan-out for bounty events

use crate::types::WebhookPayload;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, warn};

/// Best-effort webhook client delivering each payload to every destination.
///
/// Deliveries are independent: one destination failing or stalling never
/// affects another, and nothing is retried.
#[derive(Clone)]
pub struct WebhookDispatcher {
    client: Client,
    destinations: Vec<String>,
}

impl WebhookDispatcher {
    pub fn new(destinations: Vec<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            destinations,
        }
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn is_enabled(&self) -> bool {
        !self.destinations.is_empty()
    }

    /// Deliver `payload` to all destinations, returning how many answered 2xx
    pub async fn dispatch(&self, payload: &WebhookPayload) -> usize {
        if self.destinations.is_empty() {
            return 0;
        }

        let deliveries = self
            .destinations
            .iter()
            .map(|url| self.deliver(url, payload));

        join_all(deliveries)
            .await
            .into_iter()
            .filter(|delivered| *delivered)
            .count()
    }

    async fn deliver(&self, url: &str, payload: &WebhookPayload) -> bool {
        match self.client.post(url).json(payload).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!(
                        "Webhook {} sent to {} ({}) for bounty {}",
                        payload.event,
                        url,
                        response.status(),
                        payload.bounty.id
                    );
                    true
                } else {
                    warn!(
                        "Webhook {} to {} failed: {}",
                        payload.event,
                        url,
                        response.status()
                    );
                    false
                }
            }
            Err(e) => {
                error!("Failed to send webhook {} to {}: {}", payload.event, url, e);
                false
            }
        }
    }
}
