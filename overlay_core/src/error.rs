// Typed errors with thiserror. Surface meaningful messages to the host.
// Engine transitions never fail; only construction and host plumbing do.

use thiserror::Error;

/// Overlay error types.
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown presenter mode: '{0}'")]
    UnknownMode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Overlay surface {width}x{height} rejected: {message}")]
    Surface {
        width: u32,
        height: u32,
        message: String,
    },

    #[error("Input hook queue disconnected")]
    HookDisconnected,
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        OverlayError::Serialization(err.to_string())
    }
}
