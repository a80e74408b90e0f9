use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::event::Event;

/// Default quiet period before a typed term is applied, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Buffers rapid keystroke values into a single emission after a quiet
/// period, suppressing consecutive duplicate emissions.
///
/// Each keystroke bumps a generation counter and spawns a timer task; when
/// the timer fires it only emits if its generation is still current, so a
/// superseded timer is simply discarded — no cancellation object, matching
/// the single event loop's cooperative model.
pub struct SearchDebouncer {
    event_tx: mpsc::UnboundedSender<Event>,
    quiet: Duration,
    generation: Arc<AtomicU64>,
    last_emitted: Option<String>,
}

impl SearchDebouncer {
    pub fn new(event_tx: mpsc::UnboundedSender<Event>, quiet: Duration) -> Self {
        Self {
            event_tx,
            quiet,
            generation: Arc::new(AtomicU64::new(0)),
            last_emitted: None,
        }
    }

    /// Feed a raw keystroke value. Restarts the quiet-period timer; the
    /// value is forwarded as `Event::SearchReady` only if no newer value
    /// arrives before the timer elapses.
    pub fn push(&self, value: String) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let current = self.generation.clone();
        let tx = self.event_tx.clone();
        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if current.load(Ordering::Relaxed) == generation {
                let _ = tx.send(Event::SearchReady(value));
            }
        });
    }

    /// Deduplicate an emitted value against the previous emission.
    ///
    /// Returns the value when it differs from the last accepted one, `None`
    /// when it is a consecutive duplicate.
    pub fn accept(&mut self, value: String) -> Option<String> {
        if self.last_emitted.as_deref() == Some(value.as_str()) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}
