use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Canonical form used both for dedup and for matching.
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Turns raw keystrokes into committed search terms.
///
/// An input only commits once `quiet_window` passes with no newer input, so a burst
/// collapses into its last value. A commit equal to the current committed term is
/// dropped. The committed term is held in a watch channel seeded with the initial term,
/// so late subscribers read it straight away.
pub struct SearchPipeline {
    input: mpsc::UnboundedSender<String>,
    committed: watch::Receiver<String>,
}

impl SearchPipeline {
    /// Must be called inside a tokio runtime.
    pub fn spawn(seed: &str, quiet_window: Duration, cancel: CancellationToken) -> Self {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (committed_tx, committed) = watch::channel(normalize_term(seed));
        tokio::spawn(debounce(input_rx, committed_tx, quiet_window, cancel));
        Self { input, committed }
    }

    /// Feed one raw input event.
    pub fn push(&self, raw: impl Into<String>) {
        // Only fails once the pipeline task has stopped.
        let _ = self.input.send(raw.into());
    }

    pub fn committed(&self) -> String {
        self.committed.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed.clone()
    }
}

async fn debounce(
    mut input: mpsc::UnboundedReceiver<String>,
    committed: watch::Sender<String>,
    quiet_window: Duration,
    cancel: CancellationToken,
) {
    loop {
        let mut latest = tokio::select! {
            _ = cancel.cancelled() => return,
            next = input.recv() => match next {
                Some(raw) => raw,
                None => return,
            },
        };

        // every new event restarts the window
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                next = input.recv() => match next {
                    Some(raw) => latest = raw,
                    None => break,
                },
                _ = sleep(quiet_window) => break,
            }
        }

        let term = normalize_term(&latest);
        committed.send_if_modified(|current| {
            if *current == term {
                false
            } else {
                *current = term;
                true
            }
        });
    }
}
