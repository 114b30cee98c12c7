//! Output types returned by the conversion entry points.

use serde::{Deserialize, Serialize};

/// Which engine produced the Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    /// The external completion service answered; its output was returned verbatim.
    Model,
    /// The local heuristic transcoder ran (no service configured, or it failed).
    Heuristic,
}

/// The result of a conversion.
///
/// Always represents success: when the completion service fails, the
/// heuristic fallback runs and `fallback_reason` records why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The converted Markdown.
    pub markdown: String,

    /// Which path produced `markdown`.
    pub engine: Engine,

    /// Model identifier, when `engine` is [`Engine::Model`].
    pub model: Option<String>,

    /// Wall-clock duration of the whole conversion, in milliseconds.
    pub duration_ms: u64,

    /// Why the fallback ran, when a service was configured but failed.
    /// `None` when the model answered or no service was configured at all.
    pub fallback_reason: Option<String>,
}
