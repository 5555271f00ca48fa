//! The log-storage contract and its data model.
//!
//! `LogStore` abstracts the remote service the rest of the crate depends
//! on: stream listing with pagination, event fetching and the push-based
//! live tail. The CloudWatch implementation lives in [`cloudwatch`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, TimeZone};

pub mod cloudwatch;

pub use cloudwatch::CloudWatchStore;

const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A log group after its ARN has been resolved. Read-only for the rest
/// of the run; the ARN is what the live tail session is keyed on.
#[derive(Debug, Clone)]
pub struct ResolvedGroup {
    pub name: String,
    pub arn: String,
}

/// One stream descriptor from a listing page.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub name: String,
    pub first_event_millis: Option<i64>,
    pub last_event_millis: Option<i64>,
}

/// A single page of stream descriptors. A missing cursor ends the listing.
#[derive(Debug, Clone, Default)]
pub struct StreamPage {
    pub streams: Vec<StreamDescriptor>,
    pub next_cursor: Option<String>,
}

/// One log event, from either the historical or the live path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp_millis: i64,
    pub message: String,
}

impl LogEvent {
    pub fn new(timestamp_millis: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp_millis,
            message: message.into(),
        }
    }

    /// Local-time timestamp at second precision, as rendered in the
    /// leading column.
    pub fn display_timestamp(&self) -> String {
        match Local.timestamp_millis_opt(self.timestamp_millis) {
            chrono::LocalResult::Single(instant) => {
                instant.format(DATE_DISPLAY_FORMAT).to_string()
            }
            _ => self.timestamp_millis.to_string(),
        }
    }
}

/// One frame from a live tail session.
#[derive(Debug, Clone)]
pub enum LiveFrame {
    /// Session handshake. Carries nothing worth rendering.
    SessionStart,
    /// Zero or more new events, in the order the service emitted them.
    Update(Vec<LogEvent>),
    /// A frame kind this crate does not know. The payload is the raw
    /// frame text, kept for diagnostics.
    Other(String),
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Resolve a group identifier to its ARN. Fails when the identifier
    /// matches no group.
    async fn resolve_group(&self, identifier: &str) -> Result<ResolvedGroup>;

    /// One page of stream descriptors for the group, ordered by last
    /// event time descending.
    async fn list_streams(&self, group: &str, cursor: Option<&str>) -> Result<StreamPage>;

    /// The most recent page of events for one stream, in chronological
    /// order.
    async fn fetch_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>>;

    /// Open a push-based live tail session for the resolved group.
    async fn open_live_session(&self, group_arn: &str) -> Result<Box<dyn LiveSession>>;
}

/// A live tail session. Pulling the next frame blocks until the service
/// pushes one; `None` means the session ended.
#[async_trait]
pub trait LiveSession: Send {
    async fn next_frame(&mut self) -> Result<Option<LiveFrame>>;
}
