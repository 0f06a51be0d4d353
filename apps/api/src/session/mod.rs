// Session Engine
//
// Drives one interview rehearsal end to end: narration, countdown, speech
// capture with audio recording, and the scoring chain. The controller owns
// the state machine; the other modules are the pluggable adapters it drives.

pub mod capture;
pub mod controller;
pub mod narrator;
pub mod recorder;
pub mod scoring;
pub mod transcript;

pub use capture::{RecognitionEngine, RecognitionErrorKind, RecognitionEvent, SpeechCapture};
pub use controller::{InterviewSession, Phase, SessionControls, SessionUpdate};
pub use narrator::{Narrator, SilentNarrator};
pub use recorder::{AudioRecorder, MicSource, MicStream};
pub use scoring::{HttpScoringClient, LocalScoringClient, ScoringClient};
pub use transcript::TranscriptAccumulator;
