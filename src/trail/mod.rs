//! The two-phase trail: replay history, then follow the live tail.
//!
//! Phases never cycle back. An empty history short-circuits the run
//! before a live session is ever opened; live transport faults end the
//! run after being reported; ctrl-c ends it silently.

use anyhow::Result;
use tracing::{debug, info};

use crate::history::{HistoryError, HistoryReplay};
use crate::live::{LiveError, LiveTail};
use crate::render::Renderer;
use crate::store::LogStore;
use crate::window::TimeWindow;

const HISTORY_STATUS: &str = "retrieving log history...";
const LIVE_STATUS: &str = "waiting for new logs...";

pub async fn run(
    store: &dyn LogStore,
    group: &str,
    window: TimeWindow,
    renderer: &Renderer,
) -> Result<()> {
    let resolved = store.resolve_group(group).await?;
    debug!("Resolved {} to {}", resolved.name, resolved.arn);

    renderer.print_status(HISTORY_STATUS);
    let mut history = HistoryReplay::new(store, group, window);
    loop {
        match history.next_event().await {
            Ok(Some(event)) => renderer.print_event(&event),
            Ok(None) => break,
            Err(HistoryError::NoLogs) => {
                renderer.print_line("no logs");
                return Ok(());
            }
            Err(HistoryError::Store(fault)) => return Err(fault),
        }
    }

    info!("History drained, switching to live tail");
    renderer.print_status(LIVE_STATUS);
    // A transport fault while opening the session gets the same quiet
    // ending as one mid-stream.
    let mut live = match LiveTail::open(store, &resolved.arn).await {
        Ok(live) => live,
        Err(fatal @ LiveError::UnexpectedFrame(_)) => return Err(fatal.into()),
        Err(LiveError::Transport(fault)) => {
            renderer.print_line(&fault.to_string());
            return Ok(());
        }
    };
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = live.next_event() => match next {
                Ok(Some(event)) => {
                    renderer.print_event(&event);
                    renderer.print_status(LIVE_STATUS);
                }
                Ok(None) => break,
                Err(fatal @ LiveError::UnexpectedFrame(_)) => return Err(fatal.into()),
                Err(LiveError::Transport(fault)) => {
                    renderer.print_line(&fault.to_string());
                    break;
                }
            },
        }
    }

    Ok(())
}
