//! # Position Tracker
//!
//! Wraps a `LocationSource` and turns its readings into `Action`s:
//!
//! ```text
//! source.watch_position()  →  Subscription  →  [tracker task]  →  Action::PositionUpdated
//!                                                 │ invalid fix  →  Action::WatchFailed
//!                                                 └ source done  →  Action::WatchEnded
//! ```
//!
//! The watch lives exactly as long as the returned `WatchGuard`. Dropping the
//! guard clears the active flag (so a reading already in hand is not
//! forwarded) and aborts the task, which drops the `Subscription` and with it
//! the source's producer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use super::source::{Fix, LocationError, LocationSource, PositionOptions};
use crate::core::action::Action;
use crate::geo::Position;

pub struct PositionTracker {
    source: Arc<dyn LocationSource>,
    options: PositionOptions,
}

impl PositionTracker {
    pub fn new(source: Arc<dyn LocationSource>, options: PositionOptions) -> Self {
        Self { source, options }
    }

    /// One-shot reading, bounded by the configured timeout and maximum age.
    pub async fn current_position(&self) -> Result<Position, LocationError> {
        let fix = tokio::time::timeout(
            self.options.timeout,
            self.source.current_position(&self.options),
        )
        .await
        .map_err(|_| LocationError::Timeout)??;

        let age_ms = (Utc::now() - fix.timestamp).num_milliseconds();
        if age_ms > self.options.maximum_age.as_millis() as i64 {
            return Err(LocationError::Stale { age_ms });
        }
        validate(fix)
    }

    /// Starts the continuous watch. Actions go to `tx` until the guard drops.
    pub fn watch(&self, tx: UnboundedSender<Action>) -> WatchGuard {
        let mut subscription = self.source.watch_position(&self.options);
        let active = Arc::new(AtomicBool::new(true));
        let flag = active.clone();
        info!("Watching position via {}", self.source.name());

        let task = tokio::spawn(async move {
            while let Some(reading) = subscription.next().await {
                if !flag.load(Ordering::Acquire) {
                    return;
                }
                let action = match reading.and_then(validate) {
                    Ok(position) => Action::PositionUpdated(position),
                    Err(e) => {
                        warn!("Discarding watch reading: {}", e);
                        Action::WatchFailed(e)
                    }
                };
                if tx.send(action).is_err() {
                    debug!("Watch receiver dropped");
                    return;
                }
            }
            if flag.load(Ordering::Acquire) && tx.send(Action::WatchEnded).is_err() {
                debug!("Watch receiver dropped before end of watch");
            }
        });

        WatchGuard {
            active,
            task: task.abort_handle(),
        }
    }
}

fn validate(fix: Fix) -> Result<Position, LocationError> {
    Ok(Position::new(fix.latitude, fix.longitude)?)
}

/// Keeps the watch alive. Drop it (or call `cancel`) to release the subscription.
pub struct WatchGuard {
    active: Arc<AtomicBool>,
    task: AbortHandle,
}

impl WatchGuard {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire) && !self.task.is_finished()
    }

    /// Releases the watch now rather than at end of scope.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
        self.task.abort();
        debug!("Position watch released");
    }
}
