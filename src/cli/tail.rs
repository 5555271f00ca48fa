//! CLI handler for the trail run.
//!
//! This module only wires configuration, window resolution and the
//! CloudWatch client together; the phases themselves live in `trail`.

use anyhow::Result;

use crate::config::TrailConfig;
use crate::render::Renderer;
use crate::store::CloudWatchStore;
use crate::trail;
use crate::window::{self, TimeWindow};

use super::args::Cli;

pub async fn handle_tail_command(args: Cli) -> Result<()> {
    let config = TrailConfig::load()?;

    let token = args
        .window
        .as_deref()
        .unwrap_or(&config.default_window);
    let span = window::parse_window(token)?;
    let time_window = TimeWindow::ending_now(span);

    let region = args.region.or(config.region);
    let store = CloudWatchStore::connect(region).await?;
    let renderer = Renderer::new();

    trail::run(&store, &args.log_group, time_window, &renderer).await
}
