//! Background autosave task.
//!
//! One task per editing session owns the latest document snapshot and is
//! the only writer of the session's draft. It writes:
//! - every `interval`, if the document is non-empty;
//! - `debounce` after the last edit of a burst (each edit restarts the wait).
//!
//! Write failures are logged and never end the task.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::model::Draft;
use super::repository::DraftRepository;
use crate::document::Document;
use crate::store::KeyValueStore;

/// Shortest snapshot period; shorter intervals are raised to it.
pub const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(100);

/// Autosave timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Period of the unconditional snapshot. Never below
    /// [`MIN_AUTOSAVE_INTERVAL`] in effect.
    pub interval: Duration,
    /// Quiet time after an edit before the debounced snapshot.
    pub debounce: Duration,
}

impl AutosaveConfig {
    /// Creates a config with explicit timings, raising `interval` to
    /// [`MIN_AUTOSAVE_INTERVAL`] when it is shorter.
    #[must_use]
    pub const fn new(interval: Duration, debounce: Duration) -> Self {
        let interval = if interval.as_nanos() < MIN_AUTOSAVE_INTERVAL.as_nanos() {
            MIN_AUTOSAVE_INTERVAL
        } else {
            interval
        };
        Self { interval, debounce }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(2))
    }
}

enum Command {
    Edited(Document),
    Flush(oneshot::Sender<()>),
    Stop {
        flush: bool,
        done: oneshot::Sender<()>,
    },
}

/// Handle to a running autosave task.
///
/// Dropping the handle ends the task without a final write.
pub struct Autosaver {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Starts the task for `owner`, seeded with the current document.
    #[must_use]
    pub fn spawn<S>(
        repository: DraftRepository<S>,
        owner: impl Into<String>,
        config: AutosaveConfig,
        document: Document,
    ) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(repository, owner.into(), config, document, receiver));
        Self { commands, task }
    }

    /// Records an edit and restarts the debounce timer.
    pub fn record(&self, document: &Document) {
        if self.commands.send(Command::Edited(document.clone())).is_err() {
            warn!("Autosave task is gone; edit not recorded");
        }
    }

    /// Writes any pending edit now and waits for the write to finish.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Cancels both timers and ends the task, optionally writing a pending
    /// edit first.
    pub async fn stop(self, flush: bool) {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Stop { flush, done }).is_ok() {
            let _ = wait.await;
        }
        if let Err(e) = self.task.await {
            warn!("Autosave task ended abnormally: {e}");
        }
    }
}

struct State<S> {
    repository: DraftRepository<S>,
    owner: String,
    latest: Document,
    pending: bool,
}

impl<S: KeyValueStore> State<S> {
    async fn save(&self, reason: &str) {
        let draft = Draft::snapshot(&self.latest, self.owner.as_str());
        match self.repository.save(&draft).await {
            Ok(()) => debug!("Autosaved draft for {} ({reason})", self.owner),
            Err(e) => warn!("Autosave for {} failed ({reason}): {e}", self.owner),
        }
    }
}

async fn run<S: KeyValueStore>(
    repository: DraftRepository<S>,
    owner: String,
    config: AutosaveConfig,
    document: Document,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let mut state = State {
        repository,
        owner,
        latest: document,
        pending: false,
    };

    // The fields are public, so a literal config can still carry a zero period.
    let period = config.interval.max(MIN_AUTOSAVE_INTERVAL);
    let mut periodic = time::interval_at(Instant::now() + period, period);
    periodic.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let debounce = time::sleep(config.debounce);
    tokio::pin!(debounce);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Edited(document)) => {
                    state.latest = document;
                    state.pending = true;
                    debounce.as_mut().reset(Instant::now() + config.debounce);
                }
                Some(Command::Flush(done)) => {
                    if state.pending {
                        state.pending = false;
                        state.save("flush").await;
                    }
                    let _ = done.send(());
                }
                Some(Command::Stop { flush, done }) => {
                    if flush && state.pending {
                        state.save("close").await;
                    }
                    let _ = done.send(());
                    break;
                }
                None => break,
            },
            () = &mut debounce, if state.pending => {
                state.pending = false;
                state.save("debounce").await;
            }
            _ = periodic.tick() => {
                if !state.latest.is_empty() {
                    state.save("interval").await;
                }
            }
        }
    }
    debug!("Autosave task for {} stopped", state.owner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_intervals_are_raised() {
        let zero = AutosaveConfig::new(Duration::ZERO, Duration::from_secs(2));
        assert_eq!(zero.interval, MIN_AUTOSAVE_INTERVAL);
        assert_eq!(zero.debounce, Duration::from_secs(2));

        let tiny = AutosaveConfig::new(Duration::from_millis(1), Duration::ZERO);
        assert_eq!(tiny.interval, MIN_AUTOSAVE_INTERVAL);

        let normal = AutosaveConfig::new(Duration::from_secs(5), Duration::ZERO);
        assert_eq!(normal.interval, Duration::from_secs(5));
    }
}
