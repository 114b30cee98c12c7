//! Pipeline stages of the heuristic fallback transcoder.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets the
//! orchestrator run just the rewriter, or the full structuring pipeline,
//! from one configuration switch.
//!
//! ## Data Flow
//!
//! ```text
//! text ──▶ rewrite ──▶ classify ──▶ assemble
//! (prose)  (11 rules)  (sections)   (markdown)
//! ```
//!
//! 1. [`rewrite`]  — ordered pattern rules: headings, emphasis, bullets,
//!    URLs, paragraph spacing
//! 2. [`classify`] — bucket rewritten lines into semantic sections by
//!    keyword presence (overview, features, development, regional)
//! 3. [`assemble`] — render the classified document with fixed section
//!    headers and a synthesised overview sentence
//!
//! Stages 2–3 only run when
//! [`Structuring::KeywordSectioned`](crate::config::Structuring) is selected.

pub mod assemble;
pub mod classify;
pub mod rewrite;

use crate::config::SectionLabels;

/// Classify and assemble in one step: rewritten text in, structured
/// Markdown summary out. Infallible, like every fallback stage.
pub fn structure(
    rewritten: &str,
    labels: &SectionLabels,
    influences_template: Option<&str>,
) -> String {
    let doc = classify::classify(rewritten);
    assemble::assemble(&doc, labels, influences_template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_end_to_end() {
        let rewritten = "# レゲエはジャマイカ発祥の音楽である\n\nテンポの遅さが特徴\n\n音楽の発展は続いた";
        let md = structure(rewritten, &SectionLabels::default(), None);
        assert!(md.starts_with("---"));
        assert!(md.contains("## レゲエの概要と特徴"));
        assert!(md.contains("### 主要な特徴"));
        assert!(md.contains("### 発展と影響"));
    }

    #[test]
    fn structure_without_heading_is_best_effort() {
        let md = structure("ただの文章", &SectionLabels::default(), None);
        assert_eq!(md, "ただの文章");
    }
}
