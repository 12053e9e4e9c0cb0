//! Typed error enum for the player command surface.
//!
//! Command-level failures are returned to the immediate caller through
//! [`PlayerError`]; state-derivation problems (malformed native metadata)
//! never surface here — snapshot assembly degrades to absent fields instead.

use thiserror::Error;

/// Errors produced by [`crate::PlayerHandle`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// Control thread exited before the command could be delivered.
    #[error("control thread exited before '{operation}' was delivered")]
    ControlThreadExited {
        /// Operation name used for the handle call.
        operation: &'static str,
    },
    /// Control thread dropped the response channel without answering.
    #[error("control thread dropped the response for '{operation}'")]
    ResponseDropped {
        /// Operation name used for the handle call.
        operation: &'static str,
    },
    /// The native engine reported that the media item failed to load.
    #[error("media item failed to load: {reason}")]
    LoadFailed {
        /// Failure reason carried over from the native engine.
        reason: String,
    },
    /// A newer load request replaced this one before it completed.
    #[error("media item load superseded by a newer request")]
    LoadSuperseded,
    /// A command produced a response payload of the wrong shape.
    #[error("unexpected command response payload")]
    UnexpectedResponse,
}
