//! CLI binary for prose2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, reads prose from a file or stdin, and prints the
//! Markdown (or runs the HTTP API with `--serve`).

use anyhow::{Context, Result};
use clap::Parser;
use prose2md::{
    convert, convert_heuristic, ConversionConfig, HeadingDetection, PromptRole, SectionLabels,
    Structuring,
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a file (stdout); uses OPENAI_API_KEY when set, heuristics otherwise
  prose2md notes.txt

  # Convert stdin, force the local heuristic transcoder
  cat notes.txt | prose2md --no-model

  # Broadened heading detection + keyword-sectioned summary
  prose2md --heading-detection broadened --structure notes.txt -o summary.md

  # Music-domain section headings
  prose2md --structure --music-labels liner-notes.txt

  # Summarise instead of converting
  prose2md --role summarize article.txt

  # Run the HTTP API
  prose2md --serve --listen 127.0.0.1:3000

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY       Completion API credential; absent = heuristic fallback
  OPENAI_BASE_URL      Override the OpenAI-compatible endpoint base
  PROSE2MD_MODEL       Override the completion model (default: gpt-4o-mini)

The heuristic fallback always succeeds: without a key the output comes from
the local pattern rewriter, so this tool works fully offline."#;

/// Convert Japanese prose to Markdown using an LLM, with a guaranteed
/// heuristic fallback.
#[derive(Parser, Debug)]
#[command(
    name = "prose2md",
    version,
    about = "Convert Japanese prose to Markdown (LLM with heuristic fallback)",
    long_about = "Convert free-form Japanese prose to clean Markdown. When an OpenAI-compatible \
API key is configured the text is converted by the model; otherwise (or on any API failure) a \
deterministic pattern-rule transcoder produces the result locally.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input text file. Omit (or use '-') to read from stdin.
    input: Option<String>,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "PROSE2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Heading detection pattern for the heuristic transcoder.
    #[arg(long, value_enum, default_value = "narrow", env = "PROSE2MD_HEADING_DETECTION")]
    heading_detection: HeadingArg,

    /// Run the keyword-sectioned structuring pass after line rewriting.
    #[arg(long, env = "PROSE2MD_STRUCTURE")]
    structure: bool,

    /// Use the music-domain section headings (音楽的特徴 / 音楽の発展).
    #[arg(long, requires = "structure")]
    music_labels: bool,

    /// Append this influences paragraph when the text mentions 影響/発展.
    #[arg(long, requires = "structure")]
    influences_template: Option<String>,

    /// System prompt role for the completion call.
    #[arg(long, value_enum, default_value = "convert", env = "PROSE2MD_ROLE")]
    role: RoleArg,

    /// Completion model ID.
    #[arg(long, env = "PROSE2MD_MODEL")]
    model: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PROSE2MD_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max completion tokens.
    #[arg(long, env = "PROSE2MD_MAX_TOKENS", default_value_t = 2000)]
    max_tokens: usize,

    /// Completion call timeout in seconds.
    #[arg(long, env = "PROSE2MD_API_TIMEOUT", default_value_t = 30)]
    api_timeout: u64,

    /// OpenAI-compatible endpoint base URL.
    #[arg(long, env = "OPENAI_BASE_URL")]
    api_base_url: Option<String>,

    /// Skip the completion service even when an API key is present.
    #[arg(long)]
    no_model: bool,

    /// Output structured JSON (ConversionOutput) instead of plain Markdown.
    #[arg(long, env = "PROSE2MD_JSON")]
    json: bool,

    /// Run the HTTP API instead of converting.
    #[cfg(feature = "server")]
    #[arg(long)]
    serve: bool,

    /// Listen address for --serve.
    #[cfg(feature = "server")]
    #[arg(long, env = "PROSE2MD_LISTEN", default_value = "127.0.0.1:3000")]
    listen: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PROSE2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PROSE2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum HeadingArg {
    Narrow,
    Broadened,
}

impl From<HeadingArg> for HeadingDetection {
    fn from(v: HeadingArg) -> Self {
        match v {
            HeadingArg::Narrow => HeadingDetection::Narrow,
            HeadingArg::Broadened => HeadingDetection::Broadened,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum RoleArg {
    Convert,
    Summarize,
    Structured,
}

impl From<RoleArg> for PromptRole {
    fn from(v: RoleArg) -> Self {
        match v {
            RoleArg::Convert => PromptRole::Convert,
            RoleArg::Summarize => PromptRole::Summarize,
            RoleArg::Structured => PromptRole::StructuredSummarize,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // The credential is read exactly once, here, and passed into the config;
    // the library itself never inspects the environment.
    let api_key = if cli.no_model {
        None
    } else {
        std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())
    };

    let config = build_config(&cli, api_key)?;

    // ── Server mode ──────────────────────────────────────────────────────
    #[cfg(feature = "server")]
    if cli.serve {
        return prose2md::server::bind_and_serve(&cli.listen, config)
            .await
            .context("Server failed");
    }

    // ── Read input ───────────────────────────────────────────────────────
    let text = read_input(cli.input.as_deref())?;
    if text.trim().is_empty() {
        anyhow::bail!("No input text provided");
    }

    // ── Convert ──────────────────────────────────────────────────────────
    let output = if cli.no_model {
        // Deterministic offline path; no service resolution at all.
        let markdown = convert_heuristic(&text, &config);
        prose2md::ConversionOutput {
            markdown,
            engine: prose2md::Engine::Heuristic,
            model: None,
            duration_ms: 0,
            fallback_reason: None,
        }
    } else {
        convert(&text, &config).await
    };

    // ── Write output ─────────────────────────────────────────────────────
    let rendered = if cli.json {
        serde_json::to_string_pretty(&output).context("Failed to serialise output")?
    } else {
        output.markdown.clone()
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        if !cli.quiet {
            eprintln!("Wrote {} bytes to {}", rendered.len(), path.display());
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !cli.json {
        if let Some(ref reason) = output.fallback_reason {
            eprintln!("note: completion service failed, heuristic output shown ({reason})");
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, api_key: Option<String>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .heading_detection(cli.heading_detection.clone().into())
        .structuring(if cli.structure {
            Structuring::KeywordSectioned
        } else {
            Structuring::None
        })
        .role(cli.role.clone().into())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if cli.music_labels {
        builder = builder.labels(SectionLabels::music());
    }
    if let Some(ref template) = cli.influences_template {
        builder = builder.influences_template(template.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref base) = cli.api_base_url {
        builder = builder.api_base_url(base.clone());
    }
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }

    builder.build().context("Invalid configuration")
}

/// Read the input text from a file or stdin.
fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) if path != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input '{path}'")),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
