//! The interview session controller.
//!
//! One task owns all session state. Every stimulus, whether a narration
//! completion, a countdown tick, a user command, a capture update, or a
//! scoring result, becomes an `Event` funneled through the single reducer
//! `apply`, which mutates state and hands back effects for the run loop to
//! execute. Adapters and scoring run on helper tasks and report back as
//! events, so there is no lock anywhere in the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;

use crate::evaluation::scoring::{NO_ANSWER_PLACEHOLDER, SKIPPED_PLACEHOLDER};
use crate::models::question::Question;
use crate::models::report::{AnswerResult, SessionReport};
use crate::session::capture::{CaptureHandle, CaptureUpdate, RecognitionEngine, SpeechCapture};
use crate::session::narrator::Narrator;
use crate::session::recorder::{AudioBlob, AudioRecorder, MicSource, RecordingHandle};
use crate::session::scoring::{AnswerSubmission, ScoringClient};

/// Notice shown when recording is requested without a usable engine.
pub const UNSUPPORTED_NOTICE: &str = "이 환경에서는 음성 인식을 지원하지 않습니다.";

/// Notice shown when a recording attempt dies on a device failure.
pub const RECORDING_FAILED_NOTICE: &str = "마이크를 사용할 수 없어 녹음이 중단되었습니다.";

/// Content feedback recorded when the user skips a question.
pub const SKIPPED_FEEDBACK: &str = "답변을 건너뛰었습니다.";

/// Content feedback recorded when every scoring path failed.
pub const EVALUATION_UNAVAILABLE_FEEDBACK: &str =
    "일시적인 오류로 답변 평가를 완료하지 못했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The question is being read aloud.
    Narrating,
    /// Countdown running, waiting for the user to start answering.
    AwaitingStart,
    /// Capture and recorder are live.
    Recording,
    /// Answer frozen, scoring in flight.
    Submitting,
    Complete,
}

/// Mutable core of one running session.
#[derive(Debug)]
pub struct SessionState {
    pub current_index: usize,
    pub phase: Phase,
    pub remaining_secs: u32,
    pub live_transcript: String,
    engine_supported: bool,
}

/// Progress reporting to whoever is rendering the session.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    PhaseChanged { index: usize, phase: Phase },
    CountdownTick { remaining_secs: u32 },
    TranscriptChanged { transcript: String },
    Notice { message: String },
    QuestionResolved { result: AnswerResult },
}

#[derive(Debug)]
enum Command {
    StartRecording,
    StopRecording,
    Skip,
    Shutdown,
}

/// Handle for driving a running session.
#[derive(Clone)]
pub struct SessionControls {
    commands: mpsc::Sender<Command>,
}

impl SessionControls {
    pub async fn start_recording(&self) {
        let _ = self.commands.send(Command::StartRecording).await;
    }

    pub async fn stop_recording(&self) {
        let _ = self.commands.send(Command::StopRecording).await;
    }

    pub async fn skip(&self) {
        let _ = self.commands.send(Command::Skip).await;
    }

    /// Ends the session early; already-resolved questions stay in the report.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }
}

#[derive(Debug)]
enum Event {
    NarrationFinished { index: usize },
    Tick,
    StartRecording,
    StopRecording,
    Skip,
    Transcript(String),
    AttemptFailed { message: String },
    Submitted { index: usize, result: AnswerResult },
}

enum Effect {
    Emit(SessionUpdate),
    Narrate { index: usize },
    BeginRecording,
    StopAdapters,
    StopAndSubmit { index: usize },
}

pub struct InterviewSession {
    questions: Vec<Question>,
    state: SessionState,
    results: Vec<AnswerResult>,
    narrator: Arc<dyn Narrator>,
    capture: SpeechCapture,
    recorder: AudioRecorder,
    scoring: Arc<dyn ScoringClient>,
    language: String,
    commands: mpsc::Receiver<Command>,
    updates: mpsc::UnboundedSender<SessionUpdate>,
    capture_tx: mpsc::Sender<CaptureUpdate>,
    capture_rx: mpsc::Receiver<CaptureUpdate>,
    capture_handle: Option<CaptureHandle>,
    recording_handle: Option<RecordingHandle>,
    recording_started: Option<Instant>,
    narration_task: Option<JoinHandle<()>>,
    submission_task: Option<JoinHandle<()>>,
}

impl InterviewSession {
    pub fn new(
        questions: Vec<Question>,
        narrator: Arc<dyn Narrator>,
        engine: Arc<dyn RecognitionEngine>,
        mic: Arc<dyn MicSource>,
        scoring: Arc<dyn ScoringClient>,
        language: impl Into<String>,
    ) -> (
        Self,
        SessionControls,
        mpsc::UnboundedReceiver<SessionUpdate>,
    ) {
        let language = language.into();
        let (commands_tx, commands_rx) = mpsc::channel(8);
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (capture_tx, capture_rx) = mpsc::channel(32);
        let capture = SpeechCapture::new(engine, language.clone());
        let engine_supported = capture.is_supported();

        let session = Self {
            questions,
            state: SessionState {
                current_index: 0,
                phase: Phase::Narrating,
                remaining_secs: 0,
                live_transcript: String::new(),
                engine_supported,
            },
            results: Vec::new(),
            narrator,
            capture,
            recorder: AudioRecorder::new(mic),
            scoring,
            language,
            commands: commands_rx,
            updates: updates_tx,
            capture_tx,
            capture_rx,
            capture_handle: None,
            recording_handle: None,
            recording_started: None,
            narration_task: None,
            submission_task: None,
        };
        (
            session,
            SessionControls {
                commands: commands_tx,
            },
            updates_rx,
        )
    }

    /// Runs the session to completion and returns the report. The session
    /// ends when the last question resolves or on `shutdown`.
    pub async fn run(mut self) -> SessionReport {
        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Session {session_id}: starting with {} questions",
            self.questions.len()
        );

        let (events_tx, mut events) = mpsc::channel::<Event>(32);

        if self.questions.is_empty() {
            self.state.phase = Phase::Complete;
        } else {
            let kickoff = vec![
                Effect::Emit(SessionUpdate::PhaseChanged {
                    index: 0,
                    phase: Phase::Narrating,
                }),
                Effect::Narrate { index: 0 },
            ];
            self.execute(kickoff, &events_tx).await;
        }

        let mut ticker = time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.state.phase != Phase::Complete {
            let event = tokio::select! {
                biased;

                maybe = self.commands.recv() => match maybe {
                    Some(Command::StartRecording) => Event::StartRecording,
                    Some(Command::StopRecording) => Event::StopRecording,
                    Some(Command::Skip) => Event::Skip,
                    Some(Command::Shutdown) | None => break,
                },
                _ = ticker.tick() => Event::Tick,
                Some(event) = events.recv() => event,
                maybe = self.capture_rx.recv() => match maybe {
                    Some(CaptureUpdate::Transcript(text)) => Event::Transcript(text),
                    Some(CaptureUpdate::Fatal(error)) => Event::AttemptFailed {
                        message: error.to_string(),
                    },
                    None => continue,
                },
            };

            let effects = self.apply(event);
            self.execute(effects, &events_tx).await;
        }

        self.teardown().await;
        info!(
            "Session {session_id}: finished with {} results",
            self.results.len()
        );

        SessionReport {
            session_id,
            started_at,
            finished_at: Utc::now(),
            results: self.results,
        }
    }

    // ──────────────────────────── reducer ────────────────────────────

    /// The only place session state changes. Stale and out-of-phase events
    /// fall through to an empty effect list.
    fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::NarrationFinished { index } => {
                if self.state.phase != Phase::Narrating || index != self.state.current_index {
                    return vec![];
                }
                self.state.phase = Phase::AwaitingStart;
                self.state.remaining_secs = self.questions[index].time_limit_secs;
                self.state.live_transcript.clear();
                vec![
                    Effect::Emit(SessionUpdate::PhaseChanged {
                        index,
                        phase: Phase::AwaitingStart,
                    }),
                    Effect::Emit(SessionUpdate::CountdownTick {
                        remaining_secs: self.state.remaining_secs,
                    }),
                ]
            }

            Event::Tick => {
                let counting = matches!(self.state.phase, Phase::AwaitingStart | Phase::Recording);
                if !counting || self.state.remaining_secs == 0 {
                    return vec![];
                }
                self.state.remaining_secs -= 1;
                let mut effects = vec![Effect::Emit(SessionUpdate::CountdownTick {
                    remaining_secs: self.state.remaining_secs,
                })];
                if self.state.remaining_secs == 0 && self.state.phase == Phase::Recording {
                    effects.extend(self.begin_submission());
                }
                effects
            }

            Event::StartRecording => {
                if self.state.phase != Phase::AwaitingStart {
                    return vec![];
                }
                if !self.state.engine_supported {
                    return vec![Effect::Emit(SessionUpdate::Notice {
                        message: UNSUPPORTED_NOTICE.to_string(),
                    })];
                }
                if self.state.remaining_secs == 0 {
                    return vec![];
                }
                // A fresh attempt starts from an empty transcript, also after
                // a previous attempt failed on this question.
                self.state.live_transcript.clear();
                self.state.phase = Phase::Recording;
                vec![
                    Effect::Emit(SessionUpdate::TranscriptChanged {
                        transcript: String::new(),
                    }),
                    Effect::Emit(SessionUpdate::PhaseChanged {
                        index: self.state.current_index,
                        phase: Phase::Recording,
                    }),
                    Effect::BeginRecording,
                ]
            }

            Event::StopRecording => {
                if self.state.phase != Phase::Recording {
                    return vec![];
                }
                self.begin_submission()
            }

            Event::Skip => {
                if !matches!(self.state.phase, Phase::AwaitingStart | Phase::Recording) {
                    return vec![];
                }
                let index = self.state.current_index;
                let result = AnswerResult {
                    question: self.questions[index].text.clone(),
                    answer_text: SKIPPED_PLACEHOLDER.to_string(),
                    content_feedback: SKIPPED_FEEDBACK.to_string(),
                    delivery_metrics: None,
                };
                let mut effects = vec![Effect::StopAdapters];
                effects.extend(self.resolve(index, result));
                effects
            }

            Event::Transcript(text) => {
                if self.state.phase != Phase::Recording {
                    return vec![];
                }
                self.state.live_transcript = text.clone();
                vec![Effect::Emit(SessionUpdate::TranscriptChanged {
                    transcript: text,
                })]
            }

            Event::AttemptFailed { message } => {
                if self.state.phase != Phase::Recording {
                    return vec![];
                }
                warn!("Recording attempt failed: {message}");
                self.state.phase = Phase::AwaitingStart;
                vec![
                    Effect::StopAdapters,
                    Effect::Emit(SessionUpdate::Notice {
                        message: RECORDING_FAILED_NOTICE.to_string(),
                    }),
                    Effect::Emit(SessionUpdate::PhaseChanged {
                        index: self.state.current_index,
                        phase: Phase::AwaitingStart,
                    }),
                ]
            }

            Event::Submitted { index, result } => {
                if self.state.phase != Phase::Submitting || index != self.state.current_index {
                    return vec![];
                }
                self.resolve(index, result)
            }
        }
    }

    /// Recording (or its timeout) is over: freeze and score.
    fn begin_submission(&mut self) -> Vec<Effect> {
        let index = self.state.current_index;
        self.state.phase = Phase::Submitting;
        vec![
            Effect::Emit(SessionUpdate::PhaseChanged {
                index,
                phase: Phase::Submitting,
            }),
            Effect::StopAndSubmit { index },
        ]
    }

    /// Appends exactly one result and advances to the next question or
    /// completes the session.
    fn resolve(&mut self, index: usize, result: AnswerResult) -> Vec<Effect> {
        self.results.push(result.clone());
        let mut effects = vec![Effect::Emit(SessionUpdate::QuestionResolved { result })];

        if index + 1 < self.questions.len() {
            self.state.current_index = index + 1;
            self.state.phase = Phase::Narrating;
            self.state.live_transcript.clear();
            effects.push(Effect::Emit(SessionUpdate::PhaseChanged {
                index: index + 1,
                phase: Phase::Narrating,
            }));
            effects.push(Effect::Narrate { index: index + 1 });
        } else {
            self.state.phase = Phase::Complete;
            effects.push(Effect::Emit(SessionUpdate::PhaseChanged {
                index,
                phase: Phase::Complete,
            }));
        }
        effects
    }

    // ──────────────────────────── effects ────────────────────────────

    async fn execute(&mut self, effects: Vec<Effect>, events_tx: &mpsc::Sender<Event>) {
        for effect in effects {
            match effect {
                Effect::Emit(update) => {
                    let _ = self.updates.send(update);
                }
                Effect::Narrate { index } => self.narrate(index, events_tx).await,
                Effect::BeginRecording => {
                    if let Err(message) = self.begin_recording().await {
                        let _ = events_tx.send(Event::AttemptFailed { message }).await;
                    }
                }
                Effect::StopAdapters => self.stop_adapters(),
                Effect::StopAndSubmit { index } => self.stop_and_submit(index, events_tx),
            }
        }
    }

    async fn narrate(&mut self, index: usize, events_tx: &mpsc::Sender<Event>) {
        let done = self
            .narrator
            .speak(&self.questions[index].text, &self.language)
            .await;
        let events = events_tx.clone();
        self.narration_task = Some(tokio::spawn(async move {
            if done.await.is_ok() {
                let _ = events.send(Event::NarrationFinished { index }).await;
            }
        }));
    }

    async fn begin_recording(&mut self) -> Result<(), String> {
        let mut capture = self
            .capture
            .start(self.capture_tx.clone())
            .await
            .map_err(|e| e.to_string())?;
        match self.recorder.start().await {
            Ok(recording) => {
                self.capture_handle = Some(capture);
                self.recording_handle = Some(recording);
                self.recording_started = Some(Instant::now());
                Ok(())
            }
            Err(e) => {
                capture.stop();
                Err(e.to_string())
            }
        }
    }

    fn stop_adapters(&mut self) {
        if let Some(mut capture) = self.capture_handle.take() {
            capture.stop();
        }
        self.recording_handle.take();
        self.recording_started = None;
    }

    /// Stops both adapters, freezes the transcript, and runs the scoring
    /// chain on a helper task so the loop stays responsive.
    fn stop_and_submit(&mut self, index: usize, events_tx: &mpsc::Sender<Event>) {
        if let Some(mut capture) = self.capture_handle.take() {
            capture.stop();
        }
        let recording = self.recording_handle.take();
        let elapsed_secs = self
            .recording_started
            .take()
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        let transcript = if self.state.live_transcript.is_empty() {
            NO_ANSWER_PLACEHOLDER.to_string()
        } else {
            self.state.live_transcript.clone()
        };
        let question = self.questions[index].text.clone();
        let scoring = Arc::clone(&self.scoring);
        let events = events_tx.clone();

        self.submission_task = Some(tokio::spawn(async move {
            let audio = match recording {
                Some(handle) => handle.stop().await.ok(),
                None => None,
            };
            let result =
                submit_answer(scoring.as_ref(), question, transcript, audio, elapsed_secs).await;
            let _ = events.send(Event::Submitted { index, result }).await;
        }));
    }

    async fn teardown(&mut self) {
        self.stop_adapters();
        if let Some(task) = self.narration_task.take() {
            task.abort();
        }
        if let Some(task) = self.submission_task.take() {
            task.abort();
        }
        self.narrator.cancel().await;
    }
}

/// The scoring chain: delivery first, content-only on failure, and a local
/// fallback record when both are down. Always produces a result.
async fn submit_answer(
    scoring: &dyn ScoringClient,
    question: String,
    transcript: String,
    audio: Option<AudioBlob>,
    elapsed_secs: f64,
) -> AnswerResult {
    if let Some(audio) = audio {
        let submission = AnswerSubmission {
            question: question.clone(),
            transcript: transcript.clone(),
            audio,
            elapsed_secs,
        };
        match scoring.evaluate_delivery(&submission).await {
            Ok(analysis) => {
                return AnswerResult {
                    question,
                    answer_text: transcript,
                    content_feedback: analysis.content_feedback.advice,
                    delivery_metrics: Some(analysis.delivery_feedback),
                };
            }
            Err(e) => warn!("Delivery evaluation failed, trying content-only: {e}"),
        }
    }

    match scoring.evaluate_content(&question, &transcript).await {
        Ok(evaluation) => AnswerResult {
            question,
            answer_text: transcript,
            content_feedback: evaluation.feedback,
            delivery_metrics: None,
        },
        Err(e) => {
            warn!("Content evaluation failed, recording local fallback: {e}");
            AnswerResult {
                question,
                answer_text: transcript,
                content_feedback: EVALUATION_UNAVAILABLE_FEEDBACK.to_string(),
                delivery_metrics: None,
            }
        }
    }
}
