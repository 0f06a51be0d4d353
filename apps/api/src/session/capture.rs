//! Live speech capture with automatic engine restart.
//!
//! Continuous recognition engines stop on their own: silence timeouts,
//! stream drops, transient audio errors. The capture task reopens the
//! engine while the user is still recording, keeping committed transcript
//! text intact across restarts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::session::transcript::TranscriptAccumulator;

/// Delay before reopening the engine after a spontaneous stop.
const RESTART_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("speech recognition is not supported in this environment")]
    Unsupported,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("recognition engine failed: {0}")]
    Engine(String),
}

/// Error classes a recognition engine can report mid-stream. Everything but
/// `NotAllowed` is transient: capture keeps going and lets the engine's own
/// stream end trigger the restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    NoSpeech,
    Aborted,
    AudioCapture,
    NotAllowed,
}

impl RecognitionErrorKind {
    pub fn is_fatal(self) -> bool {
        matches!(self, RecognitionErrorKind::NotAllowed)
    }
}

/// One event from an open recognition stream.
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    Interim(String),
    Final(String),
    Error(RecognitionErrorKind),
    /// The engine closed the stream on its own.
    Ended,
}

/// Device seam for continuous speech recognition.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Opens one recognition stream. The stream is over when the receiver
    /// yields `Ended` or closes.
    async fn open(&self, lang: &str) -> Result<mpsc::Receiver<RecognitionEvent>, CaptureError>;
}

/// What the capture task reports upward.
#[derive(Debug, Clone)]
pub enum CaptureUpdate {
    /// Full transcript so far (finals plus current interim).
    Transcript(String),
    /// Unrecoverable failure; capture has shut itself down.
    Fatal(CaptureError),
}

/// Owns the recognition engine and runs the accumulate/replace/restart
/// algorithm on a background task per recording attempt.
pub struct SpeechCapture {
    engine: Arc<dyn RecognitionEngine>,
    language: String,
}

impl SpeechCapture {
    pub fn new(engine: Arc<dyn RecognitionEngine>, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_supported()
    }

    /// Opens the engine and begins accumulating. Transcript snapshots and
    /// fatal failures flow to `updates`; recoverable stops restart silently.
    pub async fn start(
        &self,
        updates: mpsc::Sender<CaptureUpdate>,
    ) -> Result<CaptureHandle, CaptureError> {
        if !self.engine.is_supported() {
            return Err(CaptureError::Unsupported);
        }

        let mut events = self.engine.open(&self.language).await?;
        let active = Arc::new(AtomicBool::new(true));
        let engine = Arc::clone(&self.engine);
        let language = self.language.clone();
        let task_active = Arc::clone(&active);

        let task = tokio::spawn(async move {
            let mut accumulator = TranscriptAccumulator::new();
            loop {
                match events.recv().await {
                    Some(RecognitionEvent::Final(segment)) => {
                        accumulator.push_final(&segment);
                        if send_snapshot(&updates, &accumulator).await.is_err() {
                            break;
                        }
                    }
                    Some(RecognitionEvent::Interim(segment)) => {
                        accumulator.set_interim(&segment);
                        if send_snapshot(&updates, &accumulator).await.is_err() {
                            break;
                        }
                    }
                    Some(RecognitionEvent::Error(kind)) if kind.is_fatal() => {
                        task_active.store(false, Ordering::SeqCst);
                        let _ = updates
                            .send(CaptureUpdate::Fatal(CaptureError::PermissionDenied))
                            .await;
                        break;
                    }
                    Some(RecognitionEvent::Error(kind)) => {
                        debug!("Transient recognition error: {kind:?}");
                    }
                    Some(RecognitionEvent::Ended) | None => {
                        if !task_active.load(Ordering::SeqCst) {
                            break;
                        }
                        tokio::time::sleep(RESTART_DELAY).await;
                        if !task_active.load(Ordering::SeqCst) {
                            break;
                        }
                        accumulator.on_restart();
                        match engine.open(&language).await {
                            Ok(next) => events = next,
                            Err(e) => {
                                warn!("Recognition engine restart failed: {e}");
                                task_active.store(false, Ordering::SeqCst);
                                let _ = updates.send(CaptureUpdate::Fatal(e)).await;
                                break;
                            }
                        }
                    }
                }
            }
        });

        Ok(CaptureHandle { active, task })
    }
}

async fn send_snapshot(
    updates: &mpsc::Sender<CaptureUpdate>,
    accumulator: &TranscriptAccumulator,
) -> Result<(), mpsc::error::SendError<CaptureUpdate>> {
    updates
        .send(CaptureUpdate::Transcript(accumulator.snapshot()))
        .await
}

/// One live capture attempt.
pub struct CaptureHandle {
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl CaptureHandle {
    /// Stops capturing. Safe to call more than once; the flag blocks any
    /// queued restart from reopening the engine afterwards.
    pub fn stop(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.task.abort();
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use super::*;

    /// Engine that plays one scripted event sequence per `open` call and
    /// then closes the stream.
    struct ScriptedEngine {
        supported: bool,
        scripts: Mutex<VecDeque<Vec<RecognitionEvent>>>,
        opens: AtomicUsize,
    }

    impl ScriptedEngine {
        fn new(scripts: Vec<Vec<RecognitionEvent>>) -> Self {
            Self {
                supported: true,
                scripts: Mutex::new(scripts.into()),
                opens: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RecognitionEngine for ScriptedEngine {
        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn open(&self, _lang: &str) -> Result<mpsc::Receiver<RecognitionEvent>, CaptureError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            let script = self
                .scripts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default();
            let (tx, rx) = mpsc::channel(8);
            tokio::spawn(async move {
                for event in script {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            });
            Ok(rx)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_finals_survive_restart_without_duplication() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            vec![
                RecognitionEvent::Final("안녕하세요 ".to_string()),
                RecognitionEvent::Final("반갑습니다 ".to_string()),
                RecognitionEvent::Interim("반가워".to_string()),
            ],
            vec![RecognitionEvent::Interim("다시".to_string())],
        ]));
        let capture = SpeechCapture::new(Arc::clone(&engine) as Arc<dyn RecognitionEngine>, "ko-KR");

        let (tx, mut rx) = mpsc::channel(32);
        let mut handle = capture.start(tx).await.unwrap();

        let mut transcripts = Vec::new();
        for _ in 0..4 {
            match rx.recv().await.unwrap() {
                CaptureUpdate::Transcript(text) => transcripts.push(text),
                CaptureUpdate::Fatal(e) => panic!("unexpected fatal error: {e}"),
            }
        }

        assert_eq!(transcripts[2], "안녕하세요 반갑습니다 반가워");
        // Restart dropped the interim, kept both finals exactly once
        assert_eq!(transcripts[3], "안녕하세요 반갑습니다 다시");
        assert_eq!(engine.opens.load(Ordering::SeqCst), 2);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_allowed_is_fatal_and_stops_restarts() {
        let engine = Arc::new(ScriptedEngine::new(vec![vec![RecognitionEvent::Error(
            RecognitionErrorKind::NotAllowed,
        )]]));
        let capture = SpeechCapture::new(Arc::clone(&engine) as Arc<dyn RecognitionEngine>, "ko-KR");

        let (tx, mut rx) = mpsc::channel(32);
        let mut handle = capture.start(tx).await.unwrap();

        match rx.recv().await.unwrap() {
            CaptureUpdate::Fatal(CaptureError::PermissionDenied) => {}
            other => panic!("expected permission failure, got {other:?}"),
        }
        // The channel closes with the task; no restart happened
        assert!(rx.recv().await.is_none());
        assert_eq!(engine.opens.load(Ordering::SeqCst), 1);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_engine_refuses_to_start() {
        let mut engine = ScriptedEngine::new(vec![]);
        engine.supported = false;
        let capture = SpeechCapture::new(Arc::new(engine), "ko-KR");

        let (tx, _rx) = mpsc::channel(32);
        assert!(matches!(
            capture.start(tx).await,
            Err(CaptureError::Unsupported)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let engine = Arc::new(ScriptedEngine::new(vec![vec![RecognitionEvent::Interim(
            "안녕".to_string(),
        )]]));
        let capture = SpeechCapture::new(engine as Arc<dyn RecognitionEngine>, "ko-KR");

        let (tx, mut rx) = mpsc::channel(32);
        let mut handle = capture.start(tx).await.unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(CaptureUpdate::Transcript(_))
        ));

        handle.stop();
        handle.stop();
        assert!(rx.recv().await.is_none());
    }
}
