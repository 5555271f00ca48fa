//! CloudWatch Logs implementation of the [`LogStore`] contract.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::primitives::event_stream::EventReceiver;
use aws_sdk_cloudwatchlogs::types::error::StartLiveTailResponseStreamError;
use aws_sdk_cloudwatchlogs::types::{OrderBy, StartLiveTailResponseStream};
use aws_sdk_cloudwatchlogs::Client;
use tracing::{debug, info};

use super::{
    LiveFrame, LiveSession, LogEvent, LogStore, ResolvedGroup, StreamDescriptor, StreamPage,
};

pub struct CloudWatchStore {
    client: Client,
}

impl CloudWatchStore {
    /// Build a client from the default provider chain, optionally pinned
    /// to a region. One store serves the whole run.
    pub async fn connect(region: Option<String>) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            debug!("Using region override: {}", region);
            loader = loader.region(aws_config::Region::new(region));
        }
        let sdk_config = loader.load().await;

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }
}

#[async_trait]
impl LogStore for CloudWatchStore {
    async fn resolve_group(&self, identifier: &str) -> Result<ResolvedGroup> {
        let response = self
            .client
            .describe_log_groups()
            .log_group_name_prefix(identifier)
            .send()
            .await
            .context("DescribeLogGroups failed")?;

        let group = response
            .log_groups()
            .first()
            .ok_or_else(|| anyhow!("log group {identifier:?} not found"))?;

        let arn = group
            .log_group_arn()
            .ok_or_else(|| anyhow!("log group {identifier:?} has no ARN"))?
            .to_string();

        info!("Resolved log group {} to {}", identifier, arn);

        Ok(ResolvedGroup {
            name: group.log_group_name().unwrap_or(identifier).to_string(),
            arn,
        })
    }

    async fn list_streams(&self, group: &str, cursor: Option<&str>) -> Result<StreamPage> {
        let mut request = self
            .client
            .describe_log_streams()
            .log_group_name(group)
            .order_by(OrderBy::LastEventTime)
            .descending(true)
            .limit(1);
        if let Some(cursor) = cursor {
            request = request.next_token(cursor);
        }

        let response = request.send().await.context("DescribeLogStreams failed")?;

        let streams = response
            .log_streams()
            .iter()
            .map(|stream| StreamDescriptor {
                name: stream.log_stream_name().unwrap_or_default().to_string(),
                first_event_millis: stream.first_event_timestamp(),
                last_event_millis: stream.last_event_timestamp(),
            })
            .collect();

        Ok(StreamPage {
            streams,
            next_cursor: response.next_token().map(str::to_string),
        })
    }

    async fn fetch_events(&self, group: &str, stream: &str) -> Result<Vec<LogEvent>> {
        debug!("Fetching events from stream {}", stream);

        let response = self
            .client
            .get_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await
            .with_context(|| format!("GetLogEvents failed for stream {stream:?}"))?;

        Ok(response
            .events()
            .iter()
            .filter_map(|event| {
                let timestamp_millis = event.timestamp()?;
                Some(LogEvent::new(
                    timestamp_millis,
                    event.message().unwrap_or_default(),
                ))
            })
            .collect())
    }

    async fn open_live_session(&self, group_arn: &str) -> Result<Box<dyn LiveSession>> {
        info!("Opening live tail session for {}", group_arn);

        let response = self
            .client
            .start_live_tail()
            .log_group_identifiers(group_arn)
            .send()
            .await
            .context("StartLiveTail failed")?;

        Ok(Box::new(CloudWatchLiveSession {
            frames: response.response_stream,
        }))
    }
}

struct CloudWatchLiveSession {
    frames: EventReceiver<StartLiveTailResponseStream, StartLiveTailResponseStreamError>,
}

#[async_trait]
impl LiveSession for CloudWatchLiveSession {
    async fn next_frame(&mut self) -> Result<Option<LiveFrame>> {
        let frame = self
            .frames
            .recv()
            .await
            .context("live tail transport failed")?;

        Ok(frame.map(|frame| match frame {
            StartLiveTailResponseStream::SessionStart(_) => LiveFrame::SessionStart,
            StartLiveTailResponseStream::SessionUpdate(update) => LiveFrame::Update(
                update
                    .session_results()
                    .iter()
                    .filter_map(|event| {
                        let timestamp_millis = event.timestamp()?;
                        Some(LogEvent::new(
                            timestamp_millis,
                            event.message().unwrap_or_default(),
                        ))
                    })
                    .collect(),
            ),
            other => LiveFrame::Other(format!("{other:?}")),
        }))
    }
}
