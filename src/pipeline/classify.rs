//! Section classification: bucket rewritten lines into semantic sections.
//!
//! A single forward scan over the rewritten text. Each non-blank line is
//! assigned to exactly one [`SectionKind`] by keyword presence; consecutive
//! lines of the same kind are grouped into one [`Section`] so the assembler
//! can emit each kind's heading exactly once while preserving line order.
//!
//! Only the *first* `#` line becomes the Overview — later heading-like lines
//! are plain text, which keeps a document with many promoted sentences from
//! growing several competing overview blocks.

/// Semantic bucket for a run of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// The first heading line; source of the synthesised overview sentence.
    Overview,
    /// Lines mentioning a feature-indicator keyword.
    Features,
    /// Lines mentioning a development/influence keyword.
    Development,
    /// Lines mentioning a regional-variation keyword.
    Regional,
    /// Everything else; passed through untouched, never reordered.
    Plain,
}

/// A run of consecutive same-kind lines, in input order.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

/// The classified document: ordered sections plus the one whole-text flag
/// the assembler needs for the optional influences block.
#[derive(Debug, Clone)]
pub struct Document {
    pub sections: Vec<Section>,
    /// Whether the full pre-scan text mentioned 影響 or 発展.
    pub mentions_influences: bool,
}

/// Feature-indicator keywords.
const FEATURE_KEYWORDS: [&str; 4] = ["特徴", "音楽的", "要素", "特性"];
/// Development-indicator keywords.
const DEVELOPMENT_KEYWORDS: [&str; 4] = ["発展", "影響", "歴史", "変化"];
/// Region-indicator keywords.
const REGIONAL_KEYWORDS: [&str; 2] = ["地域", "場所"];

/// Classify rewritten text into an ordered [`Document`].
///
/// Blank lines are dropped; the assembler reconstructs spacing around the
/// headings it emits.
pub fn classify(text: &str) -> Document {
    let mut sections: Vec<Section> = Vec::new();
    let mut seen_overview = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let kind = if line.starts_with('#') && !seen_overview {
            seen_overview = true;
            SectionKind::Overview
        } else if contains_any(line, &FEATURE_KEYWORDS) {
            SectionKind::Features
        } else if contains_any(line, &DEVELOPMENT_KEYWORDS) {
            SectionKind::Development
        } else if contains_any(line, &REGIONAL_KEYWORDS) {
            SectionKind::Regional
        } else {
            SectionKind::Plain
        };

        match sections.last_mut() {
            // The Overview holds exactly one line; never merge into it.
            Some(last) if last.kind == kind && kind != SectionKind::Overview => {
                last.lines.push(line.to_string());
            }
            _ => sections.push(Section {
                kind,
                lines: vec![line.to_string()],
            }),
        }
    }

    Document {
        sections,
        mentions_influences: text.contains("影響") || text.contains("発展"),
    }
}

fn contains_any(line: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| line.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_heading_is_overview() {
        let doc = classify("# レゲエはジャマイカの音楽\n\n本文です");
        assert_eq!(doc.sections[0].kind, SectionKind::Overview);
        assert_eq!(doc.sections[1].kind, SectionKind::Plain);
    }

    #[test]
    fn second_heading_is_plain() {
        let doc = classify("# 一つ目\n\n# 二つ目");
        let overviews = doc
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::Overview)
            .count();
        assert_eq!(overviews, 1);
        assert_eq!(doc.sections[1].kind, SectionKind::Plain);
        assert_eq!(doc.sections[1].lines[0], "# 二つ目");
    }

    #[test]
    fn keyword_lines_bucketed() {
        let doc = classify("テンポが特徴です\n歴史は古い\n地域によって異なる");
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Features,
                SectionKind::Development,
                SectionKind::Regional
            ]
        );
    }

    #[test]
    fn consecutive_same_kind_lines_grouped() {
        let doc = classify("リズムが特徴\nメロディも特徴");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].lines.len(), 2);
    }

    #[test]
    fn blank_lines_dropped() {
        let doc = classify("一行目\n\n\n二行目");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].lines, vec!["一行目", "二行目"]);
    }

    #[test]
    fn influences_flag_from_whole_text() {
        assert!(classify("音楽の発展について").mentions_influences);
        assert!(classify("外部からの影響").mentions_influences);
        assert!(!classify("ただの文").mentions_influences);
    }

    #[test]
    fn feature_check_wins_over_bullet_passthrough() {
        let doc = classify("- 音楽的な要素が強い");
        assert_eq!(doc.sections[0].kind, SectionKind::Features);
    }
}
