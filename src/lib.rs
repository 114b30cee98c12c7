//! # prose2md
//!
//! Convert free-form Japanese prose into Markdown, via a hosted language
//! model when one is configured, with a regex-heuristic fallback that can
//! never fail.
//!
//! ## Why this crate?
//!
//! Model-backed conversion produces the best Markdown, but it needs a
//! credential, a network, and a healthy API — three things an interactive
//! request cannot wait on. This crate treats the model as a best-effort
//! primary and keeps a deterministic, line-oriented pattern rewriter as the
//! guaranteed terminal path: every call returns Markdown, the only question
//! is how polished.
//!
//! ## Pipeline Overview
//!
//! ```text
//! prose
//!  │
//!  ├─ 1. Model?    one completion call (OpenAI-compatible), no retry
//!  │      └─ on any failure: fall through, reason recorded
//!  ├─ 2. Rewrite   11 ordered pattern rules (headings, emphasis, bullets…)
//!  └─ 3. Structure optional keyword-sectioned summary (classify + assemble)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prose2md::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // No API key in the config: the heuristic transcoder runs.
//!     let config = ConversionConfig::default();
//!     let output = convert("これは重要である。\n・項目1\n・項目2", &config).await;
//!     println!("{}", output.markdown);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `prose2md` binary (clap + anyhow + tracing-subscriber) |
//! | `server` | on      | Enables the axum HTTP API (`/api/convert`, `/api/check-api-key`) |
//!
//! Disable both when using only the library:
//! ```toml
//! prose2md = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod completion;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use completion::{CompletionService, OpenAiCompletion};
pub use config::{
    ConversionConfig, ConversionConfigBuilder, HeadingDetection, PromptRole, SectionLabels,
    Structuring,
};
pub use convert::{convert, convert_heuristic, convert_sync};
pub use error::{ProseMdError, ServiceError};
pub use output::{ConversionOutput, Engine};
pub use pipeline::rewrite::rewrite;
pub use pipeline::structure;
