//! Summary assembly: render a classified [`Document`] into Markdown.
//!
//! The assembler walks sections in input order, emits each kind's heading at
//! its first occurrence, bullets keyword-matched lines, and passes plain
//! lines through untouched. Plain lines are never reordered relative to each
//! other — the assembler only inserts structure *around* them.

use super::classify::{Document, Section, SectionKind};
use crate::config::SectionLabels;

/// Render the document to a single Markdown string.
///
/// `influences_template`, when set, is appended as a final block if the
/// source text mentioned 影響 or 発展. It defaults to off — see
/// [`crate::prompts::SAMPLE_INFLUENCES_TEMPLATE`] for the illustrative text
/// the original worked example used.
pub fn assemble(
    doc: &Document,
    labels: &SectionLabels,
    influences_template: Option<&str>,
) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut seen_features = false;
    let mut seen_development = false;
    let mut seen_regional = false;

    for section in &doc.sections {
        match section.kind {
            SectionKind::Overview => emit_overview(&mut out, section),
            SectionKind::Features => {
                emit_keyword_section(&mut out, section, &labels.features, &mut seen_features)
            }
            SectionKind::Development => emit_keyword_section(
                &mut out,
                section,
                &labels.development,
                &mut seen_development,
            ),
            SectionKind::Regional => {
                emit_keyword_section(&mut out, section, &labels.regional, &mut seen_regional)
            }
            SectionKind::Plain => {
                for line in &section.lines {
                    out.push(line.clone());
                }
            }
        }
    }

    if doc.mentions_influences {
        if let Some(template) = influences_template {
            push_blank(&mut out);
            out.push(format!("### {}", labels.influences));
            out.push(String::new());
            out.push(template.to_string());
        }
    }

    out.join("\n")
}

/// Emit the overview block: rule, `##` heading, synthesised topic sentence.
fn emit_overview(out: &mut Vec<String>, section: &Section) {
    // Classification guarantees exactly one line here.
    let Some(line) = section.lines.first() else {
        return;
    };
    let title = line.trim_start_matches('#').trim();
    let concept = main_concept(title);
    let description = topic_description(title);

    push_blank(out);
    out.push("---".to_string());
    out.push(String::new());
    out.push(format!("## {concept}の概要と特徴"));
    out.push(String::new());
    out.push(format!("**{concept}**は、{description}です。"));
    out.push(String::new());
}

/// Emit a keyword section: heading once, every line as a `*` bullet.
fn emit_keyword_section(
    out: &mut Vec<String>,
    section: &Section,
    label: &str,
    seen: &mut bool,
) {
    if !*seen {
        push_blank(out);
        out.push(format!("### {label}"));
        out.push(String::new());
        *seen = true;
    }
    for line in &section.lines {
        out.push(format!("* {}", strip_markers(line)));
    }
}

/// The main concept of a heading title: the substring before the first
/// Japanese open paren or the topic marker は.
fn main_concept(title: &str) -> &str {
    let cut = match (title.find('（'), title.find('は')) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => title.len(),
    };
    let concept = title[..cut].trim();
    if concept.is_empty() {
        title
    } else {
        concept
    }
}

/// The description after the first は, with surrounding punctuation and a
/// trailing copula stripped so the synthesised `…です。` sentence reads
/// naturally. Falls back to a fixed phrase when no topic marker exists.
fn topic_description(title: &str) -> &str {
    const FALLBACK: &str = "重要な概念";

    let Some(idx) = title.find('は') else {
        return FALLBACK;
    };
    let rest = title[idx + 'は'.len_utf8()..]
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '、' | '，' | '）'));
    let rest = rest.trim_end_matches(['。', '.', '！', '!', '？', '?']);
    let rest = rest
        .trim_end_matches("である")
        .trim_end_matches("です")
        .trim_end_matches('だ');
    let rest = rest.trim_end_matches(['。', '、']);

    if rest.is_empty() {
        FALLBACK
    } else {
        rest
    }
}

/// Strip leading heading/bullet markers before re-bulleting a line.
fn strip_markers(line: &str) -> &str {
    line.trim_start_matches(['#', '-', '*', ' ', '\t', '　'])
}

/// Append a blank separator line unless one is already pending.
fn push_blank(out: &mut Vec<String>) {
    if !out.is_empty() && out.last().is_some_and(|l| !l.is_empty()) {
        out.push(String::new());
    }
}
