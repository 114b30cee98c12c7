//! Line rewriting: the ordered pattern-rule set of the heuristic transcoder.
//!
//! ## Why surface patterns?
//!
//! The fallback has no model to lean on, so it reads Japanese prose the way a
//! copy editor skims it: a sentence that ends in a declarative copula is a
//! definition (heading material), 「…」 marks emphasis, ・ marks a list item.
//! These are punctuation cues, not grammar — the rules are deliberately
//! best-effort and must never fail, because this path is the guarantee behind
//! the whole conversion.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: paragraph runs collapse first so
//! the heading and bullet rules see one logical line per line, and the final
//! pass re-expands every newline into a paragraph break. Later rules consume
//! artifacts of earlier ones (a bullet produced from ・ is left alone by the
//! pass-through rules), and every rule leaves already-canonical Markdown
//! unchanged — applying the whole set to its own output is a no-op.

use crate::config::HeadingDetection;
use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all rewrite rules to the input text.
///
/// Runs 11 deterministic passes in a defined order. Each pass is a pure
/// function (`&str → String`) with no shared state, making the pipeline easy
/// to extend or re-order without side effects. Total: any string in, a
/// string out, including the empty string.
///
/// Rules (applied in order):
/// 1. Collapse runs of 2+ newlines to a single paragraph boundary
/// 2. Promote declarative copula sentences to `#` headings (narrow or
///    broadened pattern per `detection`)
/// 3. 「…」 brackets → `**…**` bold spans
/// 4. ・ / `-` / `*` bullet lines → `- …`
/// 5. Numbered-list lines normalised (explicit pass-through)
/// 6. Block-quote lines normalised
/// 7. Inline code spans normalised
/// 8. Bare `http(s)://` URLs → `[url](url)`
/// 9. Italic and bold spans normalised
/// 10. Horizontal-rule lines normalised
/// 11. Re-expand every newline into a blank-line paragraph break
pub fn rewrite(input: &str, detection: HeadingDetection) -> String {
    let s = collapse_paragraph_runs(input);
    let s = promote_headings(&s, detection);
    let s = embolden_brackets(&s);
    let s = normalise_bullets(&s);
    let s = normalise_numbered_lists(&s);
    let s = normalise_block_quotes(&s);
    let s = normalise_inline_code(&s);
    let s = wrap_bare_urls(&s);
    let s = normalise_emphasis(&s);
    let s = normalise_horizontal_rules(&s);
    expand_paragraphs(&s)
}

// ── Rule 1: Collapse paragraph runs ──────────────────────────────────────────
//
// Runs of blank lines collapse to a single newline here; rule 11 re-expands
// every newline into a blank-line break. The two passes compose to "exactly
// one blank line between paragraphs" and make the pipeline a fixpoint.

static RE_PARA_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

fn collapse_paragraph_runs(input: &str) -> String {
    RE_PARA_RUNS.replace_all(input, "\n").to_string()
}

// ── Rule 2: Promote copula sentences to headings ─────────────────────────────
//
// A full line ending in a plain-declarative copula plus 。 reads as a
// definition sentence; strip the 。 and prefix `# `. Lines using other
// sentence-final particles are left alone on purpose — over-promotion turns
// prose into a wall of headings.

static RE_HEADING_NARROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(.+である)。$").unwrap());

static RE_HEADING_BROAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(.+(?:である|です|だ|でした|ます|ました))。$").unwrap()
});

fn promote_headings(input: &str, detection: HeadingDetection) -> String {
    let re: &Regex = match detection {
        HeadingDetection::Narrow => &RE_HEADING_NARROW,
        HeadingDetection::Broadened => &RE_HEADING_BROAD,
    };
    re.replace_all(input, "# $1").to_string()
}

// ── Rule 3: Bracket quotes to bold ───────────────────────────────────────────

static RE_BRACKET_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"「([^」]+)」").unwrap());

fn embolden_brackets(input: &str) -> String {
    RE_BRACKET_QUOTE.replace_all(input, "**$1**").to_string()
}

// ── Rule 4: Normalise bullet markers ─────────────────────────────────────────
//
// ・ needs no following space (Japanese lists rarely have one); `-` and `*`
// require one so `**bold**`, `*italic*` and `---` lines are not re-bulleted.

static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:・[ \t　]*|[-*][ \t　]+)(.+)$").unwrap());

fn normalise_bullets(input: &str) -> String {
    RE_BULLET.replace_all(input, "- $1").to_string()
}

// ── Rule 5: Normalise numbered lists ─────────────────────────────────────────
//
// Structurally a no-op today; the rule exists so ordered-list handling has a
// named slot when a real transformation is needed.

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(\d+)\. +(.+)$").unwrap());

fn normalise_numbered_lists(input: &str) -> String {
    RE_NUMBERED.replace_all(input, "$1. $2").to_string()
}

// ── Rule 6: Normalise block quotes ───────────────────────────────────────────

static RE_BLOCK_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^> ?(.*)$").unwrap());

fn normalise_block_quotes(input: &str) -> String {
    RE_BLOCK_QUOTE.replace_all(input, "> $1").to_string()
}

// ── Rule 7: Normalise inline code ────────────────────────────────────────────

static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

fn normalise_inline_code(input: &str) -> String {
    RE_INLINE_CODE.replace_all(input, "`$1`").to_string()
}

// ── Rule 8: Wrap bare URLs ───────────────────────────────────────────────────
//
// A URL already inside `[…](…)` is preceded by `[` or `(`; excluding those
// lead characters keeps the rule idempotent without lookbehind.

static RE_BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^\[\(])(https?://[^\s\)\]]+)").unwrap());

fn wrap_bare_urls(input: &str) -> String {
    RE_BARE_URL
        .replace_all(input, "${1}[${2}](${2})")
        .to_string()
}

// ── Rule 9: Normalise emphasis spans ─────────────────────────────────────────

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());

fn normalise_emphasis(input: &str) -> String {
    let s = RE_BOLD.replace_all(input, "**$1**").to_string();
    RE_ITALIC.replace_all(&s, "*$1*").to_string()
}

// ── Rule 10: Normalise horizontal rules ──────────────────────────────────────

static RE_HR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^---$").unwrap());

fn normalise_horizontal_rules(input: &str) -> String {
    RE_HR.replace_all(input, "---").to_string()
}

// ── Rule 11: Re-expand paragraphs ────────────────────────────────────────────

fn expand_paragraphs(input: &str) -> String {
    input.replace('\n', "\n\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────
