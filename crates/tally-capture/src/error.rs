//! # Capture Error Types
//!
//! Error types for the capture engine.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Capture Error Categories                            │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   Step input     │  │   Navigation     │  │   Configuration      │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Validation      │  │  WrongStep       │  │  InvalidConfig       │  │
//! │  │  Core            │  │  NotOnStep       │  │  ConfigParseFailed   │  │
//! │  │                  │  │  Closed          │  │  ConfigEncodeFailed  │  │
//! │  │                  │  │  UnknownChoice   │  │                      │  │
//! │  │                  │  │  ItemRequired    │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here is fatal. Step input errors leave the wizard on its
//! current step with the draft unchanged.

use tally_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::steps::Step;

/// Result type alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Capture error type covering every failure the engine reports.
#[derive(Debug, Error)]
pub enum CaptureError {
    // =========================================================================
    // Step Input Errors
    // =========================================================================
    /// A step's field failed validation. Shown inline; the user retries.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Unit lookup or ledger math rejected the input.
    #[error("{0}")]
    Core(CoreError),

    // =========================================================================
    // Navigation Errors
    // =========================================================================
    /// Input was sent for a field that does not belong to the active step.
    #[error("Input for step {actual} while on step {expected}")]
    WrongStep { expected: Step, actual: Step },

    /// A step-specific transition was requested on another step.
    #[error("Not on step {required}; current step is {current}")]
    NotOnStep { required: Step, current: Step },

    /// The wizard was already submitted or cancelled.
    #[error("Capture session is closed")]
    Closed,

    /// The top-level flow choice could not be understood.
    #[error("Unknown {what} choice: '{value}'")]
    UnknownChoice { what: String, value: String },

    /// A product sale was started without a stock item.
    #[error("A stock item must be selected before a product sale can start")]
    ItemRequired,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid capture configuration.
    #[error("Invalid capture configuration: {0}")]
    InvalidConfig(String),

    /// The host's TOML text could not be parsed into a config.
    #[error("Failed to parse config: {0}")]
    ConfigParseFailed(String),

    /// The config could not be rendered as TOML.
    #[error("Failed to encode config: {0}")]
    ConfigEncodeFailed(String),
}

/// Validation failures inside `CoreError` surface as plain validation errors
/// so the app shell has one inline-message path.
impl From<CoreError> for CaptureError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => CaptureError::Validation(v),
            other => CaptureError::Core(other),
        }
    }
}

impl From<toml::de::Error> for CaptureError {
    fn from(err: toml::de::Error) -> Self {
        CaptureError::ConfigParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CaptureError {
    fn from(err: toml::ser::Error) -> Self {
        CaptureError::ConfigEncodeFailed(err.to_string())
    }
}

impl CaptureError {
    /// Returns true if the user can fix this by correcting input or
    /// navigating, without restarting the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CaptureError::Validation(_)
                | CaptureError::Core(_)
                | CaptureError::WrongStep { .. }
                | CaptureError::NotOnStep { .. }
                | CaptureError::UnknownChoice { .. }
                | CaptureError::ItemRequired
        )
    }

    /// Returns true for configuration problems.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CaptureError::InvalidConfig(_)
                | CaptureError::ConfigParseFailed(_)
                | CaptureError::ConfigEncodeFailed(_)
        )
    }

    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CaptureError::Validation(v) => Some(v),
            _ => None,
        }
    }
}
