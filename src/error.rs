//! Error types for the prose2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ProseMdError`] — **Fatal**: the operation cannot proceed at all
//!   (invalid configuration, missing input, server bind failure). Returned as
//!   `Err(ProseMdError)` from the edges of the crate.
//!
//! * [`ServiceError`] — **Recovered**: the external completion call failed
//!   (timeout, non-2xx, transport error). Never propagated to the caller:
//!   the orchestrator logs it, runs the heuristic fallback, and records the
//!   reason in [`crate::output::ConversionOutput::fallback_reason`].
//!
//! The separation is load-bearing: the fallback transcoder is total, so a
//! conversion as a whole cannot fail once its configuration is valid.

use thiserror::Error;

/// All fatal errors returned by the prose2md library.
///
/// Completion-service failures use [`ServiceError`] and are recovered via
/// the heuristic fallback rather than propagated here.
#[derive(Debug, Error)]
pub enum ProseMdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No text was supplied, or it was not a string.
    #[error("テキストが提供されていません")]
    MissingText,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Server errors ─────────────────────────────────────────────────────
    /// The HTTP boundary could not bind or serve.
    #[cfg(feature = "server")]
    #[error("Server error on {addr}: {detail}")]
    Server { addr: String, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A recoverable failure of the external completion service.
///
/// Produced by [`crate::completion::CompletionService::complete`] and
/// consumed inside [`crate::convert::convert`], which falls back to the
/// heuristic transcoder. Callers only ever see the rendered message, via
/// `fallback_reason`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No credential was supplied; the service was never constructed.
    #[error("completion service is not configured (no API key)")]
    NotConfigured,

    /// The endpoint answered with a non-success status.
    #[error("completion API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The call exceeded the configured timeout.
    #[error("completion API timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Connection-level failure (DNS, TLS, refused, ...).
    #[error("completion API transport error: {0}")]
    Transport(String),

    /// A 2xx response that carried no usable completion text.
    #[error("completion API returned an empty response")]
    EmptyCompletion,
}
