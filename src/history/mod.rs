//! Historical replay of a log group's recent events.
//!
//! Streams are listed newest-last-event-first, one descriptor per page,
//! until one is found whose first event precedes the window start (that
//! stream spans the boundary, so nothing older can still matter) or the
//! listing runs out. Candidates are then replayed oldest-first, with
//! events before the window start skipped.
//!
//! The selection rule is a best-effort heuristic: a stream spanning a
//! wide time range can stop the paging early or drag in events the
//! window does not need. That is the tool's long-standing behavior and
//! is kept as-is.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::debug;

use crate::store::{LogEvent, LogStore};
use crate::window::TimeWindow;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no log events within the requested window")]
    NoLogs,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// A lazy, finite, non-restartable pull over the window's events, in
/// ascending timestamp order.
pub struct HistoryReplay<'a> {
    store: &'a dyn LogStore,
    group: &'a str,
    window: TimeWindow,
    /// Candidate stream names, oldest first. Populated on the first pull.
    candidates: VecDeque<String>,
    pending: VecDeque<LogEvent>,
    listed: bool,
    yielded_any: bool,
}

impl<'a> HistoryReplay<'a> {
    pub fn new(store: &'a dyn LogStore, group: &'a str, window: TimeWindow) -> Self {
        Self {
            store,
            group,
            window,
            candidates: VecDeque::new(),
            pending: VecDeque::new(),
            listed: false,
            yielded_any: false,
        }
    }

    /// The next in-window event, or `Ok(None)` once the replay is done.
    /// Ends with [`HistoryError::NoLogs`] when the whole replay produced
    /// nothing.
    pub async fn next_event(&mut self) -> Result<Option<LogEvent>, HistoryError> {
        if !self.listed {
            self.candidates = self.select_streams().await?;
            self.listed = true;
        }

        loop {
            if let Some(event) = self.pending.pop_front() {
                self.yielded_any = true;
                return Ok(Some(event));
            }

            let Some(stream) = self.candidates.pop_front() else {
                if self.yielded_any {
                    return Ok(None);
                }
                return Err(HistoryError::NoLogs);
            };

            let events = self.store.fetch_events(self.group, &stream).await?;
            self.pending.extend(
                events
                    .into_iter()
                    .filter(|event| self.window.contains(event.timestamp_millis)),
            );
        }
    }

    /// Page through stream descriptors and pick everything that may
    /// overlap the window, returned oldest-first.
    async fn select_streams(&self) -> Result<VecDeque<String>, HistoryError> {
        let mut cursor: Option<String> = None;
        let mut names: Vec<String> = Vec::new();

        loop {
            let page = self
                .store
                .list_streams(self.group, cursor.as_deref())
                .await?;

            let Some(stream) = page.streams.first() else {
                break;
            };
            names.push(stream.name.clone());

            // This stream already covers the window boundary; anything
            // further down the listing ended even earlier.
            let spans_boundary = stream
                .first_event_millis
                .is_some_and(|first| first < self.window.start_millis);
            if spans_boundary {
                break;
            }

            match page.next_cursor {
                Some(token) => cursor = Some(token),
                None => break,
            }
        }

        debug!("Selected {} candidate stream(s)", names.len());
        names.reverse();
        Ok(names.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LiveSession, ResolvedGroup, StreamDescriptor, StreamPage};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Scripted store: listing pages are addressed by cursor index, and
    /// each stream has a fixed event page.
    struct FakeStore {
        pages: Vec<StreamPage>,
        events: HashMap<String, Vec<LogEvent>>,
    }

    impl FakeStore {
        fn page(streams: Vec<StreamDescriptor>, next_cursor: Option<&str>) -> StreamPage {
            StreamPage {
                streams,
                next_cursor: next_cursor.map(str::to_string),
            }
        }

        fn descriptor(name: &str, first: i64, last: i64) -> StreamDescriptor {
            StreamDescriptor {
                name: name.to_string(),
                first_event_millis: Some(first),
                last_event_millis: Some(last),
            }
        }
    }

    #[async_trait]
    impl LogStore for FakeStore {
        async fn resolve_group(&self, identifier: &str) -> Result<ResolvedGroup> {
            Ok(ResolvedGroup {
                name: identifier.to_string(),
                arn: format!("arn:aws:logs:::log-group:{identifier}"),
            })
        }

        async fn list_streams(&self, _group: &str, cursor: Option<&str>) -> Result<StreamPage> {
            let index = match cursor {
                None => 0,
                Some(token) => token.parse::<usize>()?,
            };
            self.pages
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow!("cursor {cursor:?} out of range"))
        }

        async fn fetch_events(&self, _group: &str, stream: &str) -> Result<Vec<LogEvent>> {
            Ok(self.events.get(stream).cloned().unwrap_or_default())
        }

        async fn open_live_session(&self, _group_arn: &str) -> Result<Box<dyn LiveSession>> {
            Err(anyhow!("not a live store"))
        }
    }

    fn window(start: i64) -> TimeWindow {
        TimeWindow {
            start_millis: start,
            now_millis: start + 600_000,
        }
    }

    async fn drain(replay: &mut HistoryReplay<'_>) -> Result<Vec<LogEvent>, HistoryError> {
        let mut events = Vec::new();
        while let Some(event) = replay.next_event().await? {
            events.push(event);
        }
        Ok(events)
    }

    #[tokio::test]
    async fn test_replays_streams_in_chronological_order() {
        // Newest stream listed first; the replay must reverse that.
        let store = FakeStore {
            pages: vec![
                FakeStore::page(vec![FakeStore::descriptor("new", 5_000, 9_000)], Some("1")),
                FakeStore::page(vec![FakeStore::descriptor("old", 500, 4_000)], None),
            ],
            events: HashMap::from([
                (
                    "new".to_string(),
                    vec![LogEvent::new(5_000, "c"), LogEvent::new(9_000, "d")],
                ),
                (
                    "old".to_string(),
                    vec![LogEvent::new(2_000, "a"), LogEvent::new(4_000, "b")],
                ),
            ]),
        };

        let mut replay = HistoryReplay::new(&store, "group", window(1_000));
        let events = drain(&mut replay).await.unwrap();

        let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["a", "b", "c", "d"]);
        assert!(events
            .windows(2)
            .all(|pair| pair[0].timestamp_millis <= pair[1].timestamp_millis));
    }

    #[tokio::test]
    async fn test_skips_events_before_window_start() {
        let store = FakeStore {
            pages: vec![FakeStore::page(
                vec![FakeStore::descriptor("only", 500, 3_000)],
                None,
            )],
            events: HashMap::from([(
                "only".to_string(),
                vec![
                    LogEvent::new(500, "too old"),
                    LogEvent::new(999, "still too old"),
                    LogEvent::new(1_000, "boundary"),
                    LogEvent::new(3_000, "recent"),
                ],
            )]),
        };

        let mut replay = HistoryReplay::new(&store, "group", window(1_000));
        let events = drain(&mut replay).await.unwrap();

        let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["boundary", "recent"]);
    }

    #[tokio::test]
    async fn test_stops_paging_at_boundary_stream() {
        // The second stream's first event precedes the window start, so
        // the listing must not be continued past it even though a cursor
        // is offered. Following it would hit the out-of-range cursor.
        let store = FakeStore {
            pages: vec![
                FakeStore::page(vec![FakeStore::descriptor("new", 5_000, 9_000)], Some("1")),
                FakeStore::page(
                    vec![FakeStore::descriptor("boundary", 100, 4_000)],
                    Some("99"),
                ),
            ],
            events: HashMap::from([
                ("new".to_string(), vec![LogEvent::new(5_000, "b")]),
                ("boundary".to_string(), vec![LogEvent::new(4_000, "a")]),
            ]),
        };

        let mut replay = HistoryReplay::new(&store, "group", window(1_000));
        let events = drain(&mut replay).await.unwrap();

        let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_no_events_in_window_is_no_logs() {
        let store = FakeStore {
            pages: vec![FakeStore::page(
                vec![FakeStore::descriptor("stale", 100, 900)],
                None,
            )],
            events: HashMap::from([(
                "stale".to_string(),
                vec![LogEvent::new(100, "old"), LogEvent::new(900, "old too")],
            )]),
        };

        let mut replay = HistoryReplay::new(&store, "group", window(1_000));
        assert!(matches!(
            replay.next_event().await,
            Err(HistoryError::NoLogs)
        ));
    }

    #[tokio::test]
    async fn test_empty_listing_is_no_logs() {
        let store = FakeStore {
            pages: vec![StreamPage::default()],
            events: HashMap::new(),
        };

        let mut replay = HistoryReplay::new(&store, "group", window(1_000));
        assert!(matches!(
            replay.next_event().await,
            Err(HistoryError::NoLogs)
        ));
    }

    #[tokio::test]
    async fn test_store_failure_passes_through() {
        let store = FakeStore {
            pages: vec![FakeStore::page(
                vec![FakeStore::descriptor("gone", 2_000, 3_000)],
                Some("not a number"),
            )],
            events: HashMap::new(),
        };

        let mut replay = HistoryReplay::new(&store, "group", window(1_000));
        assert!(matches!(
            replay.next_event().await,
            Err(HistoryError::Store(_))
        ));
    }
}
