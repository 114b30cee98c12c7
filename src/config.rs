//! Configuration types for prose-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across requests, serialise the interesting
//! parts for logging, and diff two runs to understand why their outputs differ.
//!
//! # Design choice: explicit credential
//! The API key is a plain `Option<String>` field set at construction time.
//! The library never reads the environment itself — the CLI and server shims
//! read `OPENAI_API_KEY` exactly once at process start and pass it in, which
//! keeps the transcoder pure and trivially testable.

use crate::completion::CompletionService;
use crate::error::ProseMdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default OpenAI-compatible endpoint base.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for a prose-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use prose2md::{ConversionConfig, HeadingDetection, Structuring};
///
/// let config = ConversionConfig::builder()
///     .heading_detection(HeadingDetection::Broadened)
///     .structuring(Structuring::KeywordSectioned)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Which copula pattern the heading rule fires on. Default: [`HeadingDetection::Narrow`].
    ///
    /// `Narrow` only promotes sentences ending in である。 — the conservative
    /// original behaviour. `Broadened` also accepts です。/だ。/でした。 and the
    /// polite ます。/ました。 endings, trading precision for recall.
    pub heading_detection: HeadingDetection,

    /// Whether the fallback runs the keyword-sectioned structuring pass after
    /// the line rewriter. Default: [`Structuring::None`].
    pub structuring: Structuring,

    /// Section heading strings used by the structuring pass.
    /// Default: the generic wording ([`SectionLabels::default`]).
    pub labels: SectionLabels,

    /// Optional trailing "influences" paragraph appended by the structuring
    /// pass when the text mentions 影響 or 発展. Default: `None` (off).
    ///
    /// [`crate::prompts::SAMPLE_INFLUENCES_TEMPLATE`] ships as illustrative
    /// content from the original worked example; it is never used implicitly.
    pub influences_template: Option<String>,

    /// Which built-in system prompt the completion call uses. Default: [`PromptRole::Convert`].
    pub role: PromptRole,

    /// Custom system prompt. If set, takes precedence over `role`.
    pub system_prompt: Option<String>,

    /// API credential for the completion service. `None` means the heuristic
    /// fallback is the only path.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint. Default: [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,

    /// Completion model identifier. If `None`, uses [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Sampling temperature for the completion. Default: 0.3.
    ///
    /// Low temperature keeps the model faithful to the input text — exactly
    /// what you want for format conversion. Higher values introduce
    /// rewording that the user did not ask for.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 2000.
    pub max_tokens: usize,

    /// Per-completion-call timeout in seconds. Default: 30.
    ///
    /// On expiry the call is abandoned and the heuristic fallback runs; the
    /// caller still gets a Markdown string, just a plainer one.
    pub api_timeout_secs: u64,

    /// Pre-constructed completion service. Takes precedence over `api_key`.
    ///
    /// Lets tests inject a mock and lets callers wrap the real client with
    /// middleware (caching, rate-limiting) without this crate knowing.
    pub service: Option<Arc<dyn CompletionService>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            heading_detection: HeadingDetection::default(),
            structuring: Structuring::default(),
            labels: SectionLabels::default(),
            influences_template: None,
            role: PromptRole::default(),
            system_prompt: None,
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: None,
            temperature: 0.3,
            max_tokens: 2000,
            api_timeout_secs: 30,
            service: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("heading_detection", &self.heading_detection)
            .field("structuring", &self.structuring)
            .field("labels", &self.labels)
            .field("influences_template", &self.influences_template)
            .field("role", &self.role)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("service", &self.service.as_ref().map(|_| "<dyn CompletionService>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether a completion service could be resolved (pre-built or via key).
    pub fn has_service(&self) -> bool {
        self.service.is_some() || self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn heading_detection(mut self, d: HeadingDetection) -> Self {
        self.config.heading_detection = d;
        self
    }

    pub fn structuring(mut self, s: Structuring) -> Self {
        self.config.structuring = s;
        self
    }

    pub fn labels(mut self, labels: SectionLabels) -> Self {
        self.config.labels = labels;
        self
    }

    pub fn influences_template(mut self, t: impl Into<String>) -> Self {
        self.config.influences_template = Some(t.into());
        self
    }

    pub fn role(mut self, role: PromptRole) -> Self {
        self.config.role = role;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn service(mut self, service: Arc<dyn CompletionService>) -> Self {
        self.config.service = Some(service);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ProseMdError> {
        let c = &self.config;
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(ProseMdError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if c.api_base_url.is_empty() {
            return Err(ProseMdError::InvalidConfig(
                "api_base_url must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which sentence-final copula patterns the heading rule recognises.
///
/// Two variants exist because the original behaviour was deliberately
/// conservative: promoting every polite sentence to a heading turns ordinary
/// prose into a wall of `#` lines. `Narrow` is safe; `Broadened` is useful
/// for encyclopedic text where definition sentences dominate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeadingDetection {
    /// Only である。 sentence endings become headings. (default)
    #[default]
    Narrow,
    /// である。/です。/だ。/でした。/ます。/ました。 endings become headings.
    Broadened,
}

/// Whether the fallback path runs the keyword-sectioned structuring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Structuring {
    /// Line rewriting only. (default)
    #[default]
    None,
    /// Line rewriting, then section classification and summary assembly.
    KeywordSectioned,
}

/// Which built-in system prompt drives the completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromptRole {
    /// Faithful structural conversion. (default)
    #[default]
    Convert,
    /// Condensing summary.
    Summarize,
    /// Fixed-skeleton structured summary.
    StructuredSummarize,
}

impl PromptRole {
    /// The built-in system prompt for this role.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            PromptRole::Convert => crate::prompts::CONVERT_SYSTEM_PROMPT,
            PromptRole::Summarize => crate::prompts::SUMMARIZE_SYSTEM_PROMPT,
            PromptRole::StructuredSummarize => {
                crate::prompts::STRUCTURED_SUMMARIZE_SYSTEM_PROMPT
            }
        }
    }
}

/// Heading strings emitted by the structuring pass.
///
/// Two presets: [`SectionLabels::default`] (generic wording) and
/// [`SectionLabels::music`] (the wording of the original music-domain
/// variant). Any field can also be set directly for other domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLabels {
    /// `###` heading above feature bullets.
    pub features: String,
    /// `###` heading above development/influence bullets.
    pub development: String,
    /// `###` heading above regional-variation bullets.
    pub regional: String,
    /// `###` heading above the optional influences paragraph.
    pub influences: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            features: "主要な特徴".to_string(),
            development: "発展と影響".to_string(),
            regional: "地域による違い".to_string(),
            influences: "影響を受けた音楽".to_string(),
        }
    }
}

impl SectionLabels {
    /// The music-domain wording used by the original worked example.
    pub fn music() -> Self {
        Self {
            features: "音楽的特徴".to_string(),
            development: "音楽の発展".to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_service() {
        let config = ConversionConfig::default();
        assert!(!config.has_service());
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn builder_clamps_temperature() {
        let config = ConversionConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn empty_api_key_is_not_a_service() {
        let config = ConversionConfig::builder().api_key("").build().unwrap();
        assert!(!config.has_service());
    }

    #[test]
    fn empty_base_url_rejected() {
        let err = ConversionConfig::builder().api_base_url("").build();
        assert!(matches!(err, Err(ProseMdError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ConversionConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn music_labels_override_feature_and_development() {
        let labels = SectionLabels::music();
        assert_eq!(labels.features, "音楽的特徴");
        assert_eq!(labels.development, "音楽の発展");
        assert_eq!(labels.regional, SectionLabels::default().regional);
    }
}
