//! Core types for the bounty bridge

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Rewards are quoted upstream as integers with six implied decimals
const REWARD_SCALE: Decimal = dec!(1000000);

/// A bounty record as returned by the upstream API.
///
/// The typed fields are a read-only view used for filtering and diffing.
/// Serialization always emits the record exactly as upstream sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounty {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Smallest-unit integer amount, as text
    pub reward: String,
    pub reward_formatted: String,
    pub status: BountyStatus,
    pub creator: String,
    pub created_at: String,
    pub updated_at: String,
    pub claimed_by: Option<String>,
    pub completed_at: Option<String>,
    pub requirements: Option<Vec<String>>,
    raw: Value,
}

/// Typed view of an upstream record; missing and `null` fields both read as empty
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BountyFields {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    reward: String,
    #[serde(default, deserialize_with = "null_as_default")]
    reward_formatted: String,
    status: BountyStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    creator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    updated_at: String,
    #[serde(default)]
    claimed_by: Option<String>,
    #[serde(default)]
    completed_at: Option<String>,
    #[serde(default)]
    requirements: Option<Vec<String>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl TryFrom<Value> for Bounty {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = BountyFields::deserialize(&raw)?;

        Ok(Self {
            id: fields.id,
            title: fields.title,
            description: fields.description,
            tags: fields.tags,
            reward: fields.reward,
            reward_formatted: fields.reward_formatted,
            status: fields.status,
            creator: fields.creator,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
            claimed_by: fields.claimed_by,
            completed_at: fields.completed_at,
            requirements: fields.requirements,
            raw,
        })
    }
}

impl<'de> Deserialize<'de> for Bounty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Bounty::try_from(raw).map_err(de::Error::custom)
    }
}

impl Serialize for Bounty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

impl Bounty {
    /// Reward in human units, or None if the upstream amount is not numeric
    pub fn reward_units(&self) -> Option<Decimal> {
        Decimal::from_str(self.reward.trim())
            .ok()
            .map(|raw| raw / REWARD_SCALE)
    }

    /// The record exactly as upstream sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Shortened title for log lines
    pub fn short_title(&self, max_len: usize) -> String {
        if self.title.chars().count() > max_len {
            format!("{}...", self.title.chars().take(max_len).collect::<String>())
        } else {
            self.title.clone()
        }
    }
}

/// Bounty lifecycle status.
///
/// The upstream domain is open: anything unrecognized is kept verbatim in
/// `Unknown` so it can still be stored and diffed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BountyStatus {
    Open,
    Claimed,
    Submitted,
    Completed,
    PaymentFailed,
    Unknown(String),
}

impl BountyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BountyStatus::Open => "open",
            BountyStatus::Claimed => "claimed",
            BountyStatus::Submitted => "submitted",
            BountyStatus::Completed => "completed",
            BountyStatus::PaymentFailed => "payment_failed",
            BountyStatus::Unknown(raw) => raw,
        }
    }

    /// Event emitted when a tracked bounty moves into this status
    pub fn event(&self) -> Option<WebhookEvent> {
        match self {
            BountyStatus::Open => Some(WebhookEvent::Created),
            BountyStatus::Claimed => Some(WebhookEvent::Claimed),
            BountyStatus::Submitted => Some(WebhookEvent::Submitted),
            BountyStatus::Completed => Some(WebhookEvent::Completed),
            BountyStatus::PaymentFailed => Some(WebhookEvent::PaymentFailed),
            BountyStatus::Unknown(_) => None,
        }
    }
}

impl From<String> for BountyStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "open" => BountyStatus::Open,
            "claimed" => BountyStatus::Claimed,
            "submitted" => BountyStatus::Submitted,
            "completed" => BountyStatus::Completed,
            "payment_failed" => BountyStatus::PaymentFailed,
            _ => BountyStatus::Unknown(raw),
        }
    }
}

impl From<&str> for BountyStatus {
    fn from(raw: &str) -> Self {
        BountyStatus::from(raw.to_string())
    }
}

impl From<BountyStatus> for String {
    fn from(status: BountyStatus) -> Self {
        match status {
            BountyStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Webhook event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "bounty.created")]
    Created,
    #[serde(rename = "bounty.claimed")]
    Claimed,
    #[serde(rename = "bounty.submitted")]
    Submitted,
    #[serde(rename = "bounty.completed")]
    Completed,
    #[serde(rename = "bounty.payment_failed")]
    PaymentFailed,
}

impl WebhookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::Created => "bounty.created",
            WebhookEvent::Claimed => "bounty.claimed",
            WebhookEvent::Submitted => "bounty.submitted",
            WebhookEvent::Completed => "bounty.completed",
            WebhookEvent::PaymentFailed => "bounty.payment_failed",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope POSTed to every webhook destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub bounty: Bounty,
    /// RFC 3339 UTC instant captured when the payload was built
    pub timestamp: String,
}

impl WebhookPayload {
    pub fn new(event: WebhookEvent, bounty: Bounty) -> Self {
        Self::at(event, bounty, Utc::now())
    }

    pub fn at(event: WebhookEvent, bounty: Bounty, at: DateTime<Utc>) -> Self {
        Self {
            event,
            bounty,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Counters returned by one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSummary {
    pub created: u32,
    pub changed: u32,
    pub errors: u32,
}

impl PollSummary {
    pub fn failed() -> Self {
        Self {
            errors: 1,
            ..Default::default()
        }
    }
}

impl fmt::Display for PollSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} changed, {} errors",
            self.created, self.changed, self.errors
        )
    }
}
