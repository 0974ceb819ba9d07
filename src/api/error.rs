use serde::{Deserialize, Serialize};

/// Closed set of error codes carried by `error` events.
///
/// The string forms match the Web Speech API error names, so a client
/// written against the browser interface can switch on them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// No speech was detected in the final transcript.
    NoSpeech,

    /// Speech input was aborted by the client.
    Aborted,

    /// Audio capture failed.
    AudioCapture,

    /// Network communication required to complete the recognition failed.
    Network,

    /// Speech input is not allowed (e.g. microphone permission denied).
    NotAllowed,

    /// The requested speech service is not allowed. In the context of this
    /// bridge it usually means authentication to the ASR server failed.
    ServiceNotAllowed,

    /// The recognition grammar was invalid or its format is unsupported.
    BadGrammar,

    /// No model is available for the requested language.
    LanguageNotSupported,
}

impl ErrorCode {
    /// Web Speech API string form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoSpeech => "no-speech",
            ErrorCode::Aborted => "aborted",
            ErrorCode::AudioCapture => "audio-capture",
            ErrorCode::Network => "network",
            ErrorCode::NotAllowed => "not-allowed",
            ErrorCode::ServiceNotAllowed => "service-not-allowed",
            ErrorCode::BadGrammar => "bad-grammar",
            ErrorCode::LanguageNotSupported => "language-not-supported",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
