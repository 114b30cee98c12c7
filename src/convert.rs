//! Conversion entry points: primary model path with guaranteed fallback.
//!
//! ## Two tiers, never both
//!
//! When a completion service is configured it is tried exactly once — no
//! retry, no blending of outputs. Any [`ServiceError`] is logged and silently
//! recovered by the local heuristic transcoder, so a conversion as a whole
//! cannot fail: every caller gets a Markdown string. The recovered reason is
//! surfaced in [`ConversionOutput::fallback_reason`] for observability, not
//! as an error.

use crate::completion::{CompletionService, OpenAiCompletion};
use crate::config::{ConversionConfig, Structuring, DEFAULT_MODEL};
use crate::error::{ProseMdError, ServiceError};
use crate::output::{ConversionOutput, Engine};
use crate::pipeline::{rewrite, structure};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert Japanese prose to Markdown.
///
/// This is the primary entry point for the library. It is infallible: if the
/// external completion service is unavailable or fails, the heuristic
/// fallback produces the result instead.
///
/// # Example
/// ```rust,no_run
/// use prose2md::{convert, ConversionConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = ConversionConfig::default(); // no API key: heuristic path
///     let output = convert("これは重要である。", &config).await;
///     println!("{}", output.markdown);
/// }
/// ```
pub async fn convert(text: &str, config: &ConversionConfig) -> ConversionOutput {
    let started = Instant::now();

    let service = match resolve_service(config) {
        Ok(service) => service,
        Err(e) => {
            // Client construction failed; same recovery as a failed call.
            warn!("Completion service unavailable: {e}");
            return heuristic_output(text, config, started, Some(e.to_string()));
        }
    };

    let Some(service) = service else {
        debug!("No completion service configured; using heuristic transcoder");
        return heuristic_output(text, config, started, None);
    };

    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or_else(|| config.role.system_prompt());

    info!("Requesting completion from model '{}'", service.model());
    match service.complete(system_prompt, text).await {
        Ok(markdown) => {
            let duration_ms = started.elapsed().as_millis() as u64;
            info!("Model conversion complete in {}ms", duration_ms);
            ConversionOutput {
                markdown,
                engine: Engine::Model,
                model: Some(service.model().to_string()),
                duration_ms,
                fallback_reason: None,
            }
        }
        Err(e) => {
            warn!("Completion failed, falling back to heuristics: {e}");
            heuristic_output(text, config, started, Some(e.to_string()))
        }
    }
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    text: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ProseMdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ProseMdError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(async { Ok(convert(text, config).await) })
}

/// Run the heuristic transcoder only, skipping the service entirely.
///
/// Useful when the caller wants deterministic output regardless of
/// configuration (the CLI's `--no-model` flag).
pub fn convert_heuristic(text: &str, config: &ConversionConfig) -> String {
    let rewritten = rewrite::rewrite(text, config.heading_detection);
    match config.structuring {
        Structuring::None => rewritten,
        Structuring::KeywordSectioned => structure(
            &rewritten,
            &config.labels,
            config.influences_template.as_deref(),
        ),
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the completion service, from most-specific to least-specific:
///
/// 1. **Pre-built service** (`config.service`) — the caller constructed it
///    entirely; used as-is. This is the seam tests and middleware use.
/// 2. **API key** (`config.api_key`) — build the OpenAI-compatible client
///    from the config's model/temperature/timeout knobs.
/// 3. Neither — `None`; the heuristic transcoder is the only path.
fn resolve_service(
    config: &ConversionConfig,
) -> Result<Option<Arc<dyn CompletionService>>, ServiceError> {
    if let Some(ref service) = config.service {
        return Ok(Some(Arc::clone(service)));
    }

    if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
        let client = OpenAiCompletion::new(
            &config.api_base_url,
            key,
            config.model.as_deref().unwrap_or(DEFAULT_MODEL),
            config.temperature,
            config.max_tokens,
            config.api_timeout_secs,
        )?;
        return Ok(Some(Arc::new(client)));
    }

    Ok(None)
}

fn heuristic_output(
    text: &str,
    config: &ConversionConfig,
    started: Instant,
    fallback_reason: Option<String>,
) -> ConversionOutput {
    let markdown = convert_heuristic(text, config);
    ConversionOutput {
        markdown,
        engine: Engine::Heuristic,
        model: None,
        duration_ms: started.elapsed().as_millis() as u64,
        fallback_reason,
    }
}
