//! Live tail of a log group, backed by one push session.
//!
//! Session-start frames are skipped, session-update frames are unpacked
//! into individual events, and any frame kind this crate does not know
//! is fatal. The session is never reopened.

use std::collections::VecDeque;

use thiserror::Error;

use crate::store::{LiveFrame, LiveSession, LogEvent, LogStore};

#[derive(Debug, Error)]
pub enum LiveError {
    #[error("unexpected live tail session frame: {0}")]
    UnexpectedFrame(String),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// An unbounded, non-restartable pull over live events. Pulling blocks
/// until the service pushes the next frame.
pub struct LiveTail {
    session: Box<dyn LiveSession>,
    pending: VecDeque<LogEvent>,
}

impl LiveTail {
    pub async fn open(store: &dyn LogStore, group_arn: &str) -> Result<Self, LiveError> {
        let session = store.open_live_session(group_arn).await?;
        Ok(Self {
            session,
            pending: VecDeque::new(),
        })
    }

    /// The next live event, or `Ok(None)` once the session ends.
    pub async fn next_event(&mut self) -> Result<Option<LogEvent>, LiveError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            match self.session.next_frame().await? {
                None => return Ok(None),
                Some(LiveFrame::SessionStart) => continue,
                Some(LiveFrame::Update(events)) => self.pending.extend(events),
                Some(LiveFrame::Other(raw)) => return Err(LiveError::UnexpectedFrame(raw)),
            }
        }
    }
}
