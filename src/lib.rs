//! Bounty Bridge Library
//!
//! Polls a bounty marketplace API, diffs the listing against the statuses seen
//! on previous polls, and notifies webhooks about:
//!
//! 1. **New bounties**: any bounty id not seen before fires `bounty.created`,
//!    whatever its current status.
//!
//! 2. **Status changes**: a tracked bounty moving to a new status fires the
//!    event mapped to that status (`bounty.claimed`, `bounty.completed`, ...).
//!
//! A small HTTP surface reports health, triggers polls on demand, and proxies
//! bounty creation to the upstream API.

pub mod api;
pub mod client;
pub mod config;
pub mod filter;
pub mod poller;
pub mod state;
pub mod types;
pub mod webhook;

pub use client::{BountyClient, SourceError, UpstreamResponse};
pub use config::Config;
pub use filter::BountyFilter;
pub use poller::Poller;
pub use state::{StateRecord, StateStore};
pub use types::{Bounty, BountyStatus, PollSummary, WebhookEvent, WebhookPayload};
pub use webhook::WebhookDispatcher;
