// Voice transcript capture. The device's speech recognizer pushes segments;
// this module only accumulates finalized text and reports failures as advisories.

pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const NO_SPEECH_ADVISORY: &str = "No speech was detected. Please try again.";

/// Upper bound on the accumulated transcript, in characters.
pub const MAX_TRANSCRIPT_CHARS: usize = 4000;

#[derive(Debug, Error, PartialEq)]
pub enum CaptureError {
    #[error("Voice capture is already running")]
    AlreadyListening,

    #[error("Voice capture is not running")]
    NotListening,

    #[error("Transcript is longer than {limit} characters")]
    TranscriptTooLong { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Idle,
    Listening,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Interim hypotheses are superseded by a later final segment.
    #[serde(default)]
    pub is_final: bool,
}

/// Why the recognizer stopped early.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureFailure {
    Unsupported,
    PermissionDenied,
    NoSpeech,
    Platform { message: String },
}

impl CaptureFailure {
    pub fn advisory(&self) -> String {
        match self {
            CaptureFailure::Unsupported => {
                "Voice input is not supported on this device. Please type your description instead."
                    .to_string()
            }
            CaptureFailure::PermissionDenied => {
                "Microphone access was denied. Allow microphone access to use voice input."
                    .to_string()
            }
            CaptureFailure::NoSpeech => NO_SPEECH_ADVISORY.to_string(),
            CaptureFailure::Platform { message } => format!("Voice input failed: {message}"),
        }
    }
}

/// Result of stopping a capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureOutcome {
    pub transcript: Option<String>,
    pub advisory: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranscriptCapture {
    state: CaptureState,
    segments: Vec<String>,
}

impl Default for TranscriptCapture {
    fn default() -> Self {
        Self {
            state: CaptureState::Idle,
            segments: Vec::new(),
        }
    }
}

impl TranscriptCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_listening() {
            return Err(CaptureError::AlreadyListening);
        }
        self.segments.clear();
        self.state = CaptureState::Listening;
        debug!("Voice capture started");
        Ok(())
    }

    /// Appends a finalized segment. Interim segments are dropped.
    pub fn push(&mut self, segment: TranscriptSegment) -> Result<(), CaptureError> {
        if !self.is_listening() {
            return Err(CaptureError::NotListening);
        }
        let text = segment.text.trim();
        if !segment.is_final || text.is_empty() {
            return Ok(());
        }
        let separator = usize::from(!self.segments.is_empty());
        if self.char_count() + separator + text.chars().count() > MAX_TRANSCRIPT_CHARS {
            warn!("Dropping voice segment; transcript would exceed {MAX_TRANSCRIPT_CHARS} characters");
            return Err(CaptureError::TranscriptTooLong {
                limit: MAX_TRANSCRIPT_CHARS,
            });
        }
        self.segments.push(text.to_string());
        Ok(())
    }

    fn char_count(&self) -> usize {
        let text: usize = self.segments.iter().map(|s| s.chars().count()).sum();
        text + self.segments.len().saturating_sub(1)
    }

    pub fn transcript(&self) -> String {
        self.segments.join(" ")
    }

    pub fn stop(&mut self) -> Result<CaptureOutcome, CaptureError> {
        if !self.is_listening() {
            return Err(CaptureError::NotListening);
        }
        self.state = CaptureState::Idle;
        let transcript = self.transcript();
        debug!("Voice capture stopped with {} segments", self.segments.len());

        if transcript.is_empty() {
            return Ok(CaptureOutcome {
                transcript: None,
                advisory: Some(NO_SPEECH_ADVISORY.to_string()),
            });
        }
        Ok(CaptureOutcome {
            transcript: Some(transcript),
            advisory: None,
        })
    }

    /// Resets to idle and returns the advisory to show inline.
    pub fn fail(&mut self, failure: &CaptureFailure) -> String {
        warn!("Voice capture failed: {failure:?}");
        self.state = CaptureState::Idle;
        self.segments.clear();
        failure.advisory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, is_final: bool) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            is_final,
        }
    }

    #[test]
    fn test_final_segments_are_joined_and_interim_dropped() {
        let mut capture = TranscriptCapture::new();
        capture.start().unwrap();
        capture.push(segment("I am a", false)).unwrap();
        capture.push(segment("I am a designer", true)).unwrap();
        capture.push(segment(" with five years of Figma. ", true)).unwrap();

        let outcome = capture.stop().unwrap();

        assert_eq!(
            outcome.transcript.as_deref(),
            Some("I am a designer with five years of Figma.")
        );
        assert!(outcome.advisory.is_none());
        assert_eq!(capture.state(), CaptureState::Idle);
    }

    #[test]
    fn test_empty_capture_reports_no_speech() {
        let mut capture = TranscriptCapture::new();
        capture.start().unwrap();
        capture.push(segment("   ", true)).unwrap();

        let outcome = capture.stop().unwrap();
        assert!(outcome.transcript.is_none());
        assert_eq!(outcome.advisory.as_deref(), Some(NO_SPEECH_ADVISORY));
    }

    #[test]
    fn test_double_start_and_idle_push_are_rejected() {
        let mut capture = TranscriptCapture::new();
        assert_eq!(capture.push(segment("hi", true)), Err(CaptureError::NotListening));
        assert_eq!(capture.stop(), Err(CaptureError::NotListening));

        capture.start().unwrap();
        assert_eq!(capture.start(), Err(CaptureError::AlreadyListening));
    }

    #[test]
    fn test_restart_discards_previous_segments() {
        let mut capture = TranscriptCapture::new();
        capture.start().unwrap();
        capture.push(segment("old words", true)).unwrap();
        capture.stop().unwrap();

        capture.start().unwrap();
        capture.push(segment("new words", true)).unwrap();
        assert_eq!(capture.transcript(), "new words");
    }

    #[test]
    fn test_segment_past_the_cap_is_rejected_and_earlier_text_kept() {
        let mut capture = TranscriptCapture::new();
        capture.start().unwrap();
        let first = "a".repeat(MAX_TRANSCRIPT_CHARS - 6);
        capture.push(segment(&first, true)).unwrap();
        capture.push(segment("bcde", true)).unwrap();
        assert_eq!(capture.transcript().chars().count(), MAX_TRANSCRIPT_CHARS - 1);

        assert_eq!(
            capture.push(segment("fg", true)),
            Err(CaptureError::TranscriptTooLong {
                limit: MAX_TRANSCRIPT_CHARS
            })
        );
        // Interim text never counts toward the cap.
        capture.push(segment(&"z".repeat(10_000), false)).unwrap();

        assert!(capture.is_listening());
        let outcome = capture.stop().unwrap();
        assert_eq!(
            outcome.transcript.map(|t| t.chars().count()),
            Some(MAX_TRANSCRIPT_CHARS - 1)
        );
    }

    #[test]
    fn test_failure_resets_and_explains() {
        let mut capture = TranscriptCapture::new();
        capture.start().unwrap();
        capture.push(segment("partial", true)).unwrap();

        let advisory = capture.fail(&CaptureFailure::PermissionDenied);

        assert!(advisory.contains("Microphone access was denied"));
        assert!(!capture.is_listening());
        assert!(capture.transcript().is_empty());
    }

    #[test]
    fn test_failure_kinds_deserialize() {
        let failure: CaptureFailure =
            serde_json::from_str(r#"{"kind": "platform", "message": "audio-capture"}"#).unwrap();
        assert_eq!(failure.advisory(), "Voice input failed: audio-capture");

        let failure: CaptureFailure = serde_json::from_str(r#"{"kind": "unsupported"}"#).unwrap();
        assert_eq!(failure, CaptureFailure::Unsupported);
        assert_eq!(
            CaptureFailure::NoSpeech.advisory(),
            NO_SPEECH_ADVISORY
        );
    }
}
