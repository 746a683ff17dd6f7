//! Tracker session: throttle + gtm calls + user notices
//!
//! `on_activity` is synchronous and never waits on a process. Accepted
//! events spawn a detached task that runs `gtm record` and forwards its
//! output as a status notice. Calls may overlap; whichever finishes last
//! leaves its text on screen.

use crate::debounce::{Decision, ThrottlePolicy, MIN_INTERVAL};
use crate::{ActivityEvent, ActivitySource, Notice};
use bridge_core::Tool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Tracker behavior knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub min_interval: Duration,
    /// Call gtm for the very first event, when no previous file is known
    pub record_initial: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_interval: MIN_INTERVAL,
            record_initial: true,
        }
    }
}

/// One editor session
pub struct Tracker {
    tool: Arc<Tool>,
    policy: ThrottlePolicy,
    record_initial: bool,
    notices: mpsc::UnboundedSender<Notice>,
    /// Set once a record spawn failure has been shown to the user
    spawn_warned: Arc<AtomicBool>,
    in_flight: JoinSet<()>,
}

impl Tracker {
    /// Create a session whose throttle clock starts now
    pub fn new(tool: Tool, config: TrackerConfig, notices: mpsc::UnboundedSender<Notice>) -> Self {
        Self {
            tool: Arc::new(tool),
            policy: ThrottlePolicy::new(config.min_interval),
            record_initial: config.record_initial,
            notices,
            spawn_warned: Arc::new(AtomicBool::new(false)),
            in_flight: JoinSet::new(),
        }
    }

    /// Sources this tracker listens to
    pub fn sources(&self) -> &'static [ActivitySource] {
        &ActivitySource::ALL
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    /// Number of gtm calls not yet reaped
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Kick off the version probe in the background
    pub fn start(&mut self) {
        let tool = Arc::clone(&self.tool);
        let notices = self.notices.clone();

        self.in_flight.spawn(async move {
            match tool.probe().await {
                Ok(_) => {}
                Err(e) if e.is_unavailable() => {
                    warn!("Version probe failed: {:#}", e);
                    send(&notices, Notice::error(e.user_message()));
                }
                Err(e) => {
                    warn!("{}", e);
                    send(&notices, Notice::warning(e.user_message()));
                }
            }
        });
    }

    /// Handle one editor event
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_activity(&mut self, event: &ActivityEvent) -> Decision {
        self.reap();

        let previous = match self.policy.observe(&event.file) {
            Decision::Reject => return Decision::Reject,
            Decision::Accept { previous } => previous,
        };

        debug!(
            "Accepted {} event for {:?} (previous: {:?})",
            event.source.as_str(),
            event.file,
            previous
        );

        if previous.is_some() || self.record_initial {
            self.spawn_record(previous.clone());
        } else {
            debug!("Skipping record for first event of the session");
        }

        Decision::Accept { previous }
    }

    fn spawn_record(&mut self, previous: Option<String>) {
        let tool = Arc::clone(&self.tool);
        let notices = self.notices.clone();
        let spawn_warned = Arc::clone(&self.spawn_warned);

        self.in_flight.spawn(async move {
            match tool.record(previous.as_deref()).await {
                Ok(result) => {
                    if !result.success() {
                        debug!("{} record exited with {}", tool.program(), result.exit_code);
                    }
                    send(&notices, Notice::status(result.output.trim_end()));
                }
                Err(e) => {
                    warn!("Failed to record activity: {}", e);
                    if !spawn_warned.swap(true, Ordering::Relaxed) {
                        let text =
                            format!("Could not record activity with {}: {}", tool.program(), e);
                        send(&notices, Notice::warning(text));
                    }
                }
            }
        });
    }

    /// Wait up to `grace` for outstanding calls, then drop the session
    ///
    /// Calls still running after `grace` are detached from the session; the
    /// processes themselves are left to finish on their own.
    pub async fn shutdown(mut self, grace: Duration) {
        let pending = self.in_flight.len();
        if pending > 0 {
            info!("Waiting for {} outstanding gtm call(s)", pending);
        }

        let drained = tokio::time::timeout(grace, async {
            while self.in_flight.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!("Gave up on {} gtm call(s) after {:?}", self.in_flight.len(), grace);
        }
    }

    fn reap(&mut self) {
        while let Some(joined) = self.in_flight.try_join_next() {
            if let Err(e) = joined {
                warn!("gtm task ended abnormally: {}", e);
            }
        }
    }
}

fn send(notices: &mpsc::UnboundedSender<Notice>, notice: Notice) {
    if notices.send(notice).is_err() {
        debug!("Notice receiver closed; dropping notice");
    }
}
