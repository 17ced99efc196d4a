//! Error types for the melody-to-score quantizer

use std::fmt;

/// Custom error type for quantization processing
#[derive(Debug, Clone)]
pub enum QuantizeError {
    /// E001: MIDI file I/O error
    MidiFileError(String),
    /// E002: Malformed MIDI data
    MidiParseError(String),
    /// E003: Unsupported MIDI timing mode (e.g., SMPTE timecode)
    UnsupportedTiming(String),
    /// E004: Configuration validation failed
    ConfigValidationFailed(String),
    /// E005: Input validation error (non-finite note timing)
    InputValidationError(String),
    /// E006: MIDI export error
    MidiExportError(String),
    /// E007: Analysis export error
    AnalysisExportError(String),
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::MidiFileError(msg) => {
                write!(f, "E001: MIDI file I/O error - {}", msg)
            }
            QuantizeError::MidiParseError(msg) => {
                write!(f, "E002: Malformed MIDI data - {}", msg)
            }
            QuantizeError::UnsupportedTiming(msg) => {
                write!(f, "E003: Unsupported MIDI timing mode - {}", msg)
            }
            QuantizeError::ConfigValidationFailed(msg) => {
                write!(f, "E004: Configuration validation failed - {}", msg)
            }
            QuantizeError::InputValidationError(msg) => {
                write!(f, "E005: Input validation error - {}", msg)
            }
            QuantizeError::MidiExportError(msg) => {
                write!(f, "E006: MIDI export error - {}", msg)
            }
            QuantizeError::AnalysisExportError(msg) => {
                write!(f, "E007: Analysis export error - {}", msg)
            }
        }
    }
}

impl std::error::Error for QuantizeError {}

// From implementations for common error types
impl From<std::io::Error> for QuantizeError {
    fn from(err: std::io::Error) -> Self {
        QuantizeError::MidiFileError(format!("File I/O error: {}", err))
    }
}

impl From<midly::Error> for QuantizeError {
    fn from(err: midly::Error) -> Self {
        QuantizeError::MidiParseError(format!("SMF parse error: {}", err))
    }
}

impl From<serde_json::Error> for QuantizeError {
    fn from(err: serde_json::Error) -> Self {
        QuantizeError::AnalysisExportError(format!("JSON serialization error: {}", err))
    }
}

impl From<anyhow::Error> for QuantizeError {
    fn from(err: anyhow::Error) -> Self {
        QuantizeError::ConfigValidationFailed(format!("{}", err))
    }
}

/// Result type alias for quantizer operations
pub type Result<T> = std::result::Result<T, QuantizeError>;
