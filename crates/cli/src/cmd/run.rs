//! Editor session: read activity events, emit notices

use crate::host::{self, NoticeWriter};
use crate::system_config::SystemConfig;
use activity::Tracker;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn run(config: &SystemConfig) -> Result<()> {
    let tool = config.tool()?;
    info!(
        "Starting session with {} (min interval {:?})",
        tool.program(),
        config.tracker_config().min_interval
    );

    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();

    // Single writer so concurrent gtm calls never interleave partial lines
    let writer = tokio::spawn(async move {
        let mut out = NoticeWriter::new(tokio::io::stdout());
        while let Some(notice) = notice_rx.recv().await {
            if let Err(e) = out.write(&notice).await {
                warn!("Editor stopped reading notices: {}", e);
                break;
            }
        }
    });

    let mut tracker = Tracker::new(tool, config.tracker_config(), notice_tx);
    for source in tracker.sources() {
        debug!("Listening for {} events", source.as_str());
    }
    tracker.start();

    // Raw lines, so one undecodable line is skipped instead of ending the session
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let read_error = loop {
        let bytes = match lines.next_segment().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("Editor closed the event stream");
                break None;
            }
            Err(e) => {
                warn!("Failed to read editor events: {}", e);
                break Some(e);
            }
        };

        match host::decode_line(bytes).and_then(|line| host::parse_event(&line)) {
            Ok(Some(event)) => {
                tracker.on_activity(&event);
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping event: {}", e),
        }
    };

    // Runs on every exit path so accepted record calls are not aborted
    tracker.shutdown(config.shutdown_grace()).await;
    writer.await.context("Notice writer task failed")?;

    match read_error {
        Some(e) => Err(e).context("Failed to read editor events from stdin"),
        None => Ok(()),
    }
}
