//! Question narration seam.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

/// Speaks question text aloud before the answer timer starts.
///
/// `speak` cancels any in-flight utterance first, then returns a receiver
/// that resolves exactly once when narration reaches its natural end. A
/// cancelled utterance never resolves; its receiver reports an error when
/// the sender is dropped. Environments with no speech output must still
/// resolve the receiver (immediately is fine) so the session can proceed.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn speak(&self, text: &str, lang: &str) -> oneshot::Receiver<()>;

    /// Stops the current utterance, if any, dropping its receiver unresolved.
    async fn cancel(&self);
}

/// Simulated reading speed for narration pacing, characters per second.
const NARRATION_CHARS_PER_SEC: f64 = 6.0;

/// Narrator for environments without speech output. Pauses roughly as long
/// as reading the text aloud would take, so session pacing stays realistic.
pub struct SilentNarrator {
    chars_per_sec: f64,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl SilentNarrator {
    pub fn new(chars_per_sec: f64) -> Self {
        Self {
            chars_per_sec,
            current: Mutex::new(None),
        }
    }
}

impl Default for SilentNarrator {
    fn default() -> Self {
        Self::new(NARRATION_CHARS_PER_SEC)
    }
}

#[async_trait]
impl Narrator for SilentNarrator {
    async fn speak(&self, text: &str, _lang: &str) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let pause = Duration::from_secs_f64(text.chars().count() as f64 / self.chars_per_sec);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(pause).await;
            let _ = tx.send(());
        });
        if let Some(previous) = self.current.lock().await.replace(handle) {
            previous.abort();
        }
        rx
    }

    async fn cancel(&self) {
        if let Some(handle) = self.current.lock().await.take() {
            handle.abort();
        }
    }
}
