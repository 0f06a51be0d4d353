//! Transcript assembly for continuous speech recognition.

/// Accumulates recognition results across engine restarts.
///
/// Final segments append permanently. The interim segment is replaced on
/// every update, cleared when a final arrives, and discarded when the engine
/// restarts. The exposed transcript is always finals followed by the current
/// interim, so committed text can never be duplicated or lost by a restart.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    finals: String,
    interim: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finalized segment: committed for good.
    pub fn push_final(&mut self, segment: &str) {
        self.finals.push_str(segment);
        self.interim.clear();
    }

    /// A provisional segment: replaces any previous interim.
    pub fn set_interim(&mut self, segment: &str) {
        self.interim.clear();
        self.interim.push_str(segment);
    }

    /// Engine restart: provisional text is gone, committed text survives.
    pub fn on_restart(&mut self) {
        self.interim.clear();
    }

    pub fn snapshot(&self) -> String {
        let mut text = self.finals.clone();
        text.push_str(&self.interim);
        text
    }

    pub fn is_empty(&self) -> bool {
        self.finals.is_empty() && self.interim.is_empty()
    }
}
