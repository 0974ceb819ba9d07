use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recognition hypothesis: a transcript plus the service's
/// confidence that it is correct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    /// Transcript of the recognized speech.
    pub transcript: String,

    /// Confidence score between 0.0 and 1.0.
    pub confidence: f32,
}

impl RecognitionAlternative {
    /// Create an alternative, clamping confidence into [0.0, 1.0].
    pub fn new(transcript: impl Into<String>, confidence: f32) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// One recognition match: an ordered n-best list of alternatives
/// (insertion order = rank). Built once per incoming transcript payload
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResult {
    alternatives: Vec<RecognitionAlternative>,

    /// Whether this result is final (true) or interim (false).
    pub is_final: bool,

    /// When this result was received from the service.
    pub timestamp: DateTime<Utc>,
}

impl RecognitionResult {
    pub fn new(alternatives: Vec<RecognitionAlternative>, is_final: bool) -> Self {
        Self {
            alternatives,
            is_final,
            timestamp: Utc::now(),
        }
    }

    /// Number of alternatives in the result.
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Alternative at the given rank, best first.
    pub fn get(&self, index: usize) -> Option<&RecognitionAlternative> {
        self.alternatives.get(index)
    }

    /// Highest-ranked alternative.
    pub fn best(&self) -> Option<&RecognitionAlternative> {
        self.alternatives.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecognitionAlternative> {
        self.alternatives.iter()
    }
}

/// Ordered list of the results touched by one dispatch. The session
/// controller dispatches one result at a time, so in practice the list
/// always has length 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResultList {
    results: Vec<RecognitionResult>,
}

impl RecognitionResultList {
    pub fn new(results: Vec<RecognitionResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RecognitionResult> {
        self.results.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecognitionResult> {
        self.results.iter()
    }
}

impl From<RecognitionResult> for RecognitionResultList {
    fn from(result: RecognitionResult) -> Self {
        Self::new(vec![result])
    }
}
