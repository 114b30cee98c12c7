//! System prompts for LLM-based prose-to-Markdown conversion.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the conversion behaviour (e.g.
//!    tightening the "no commentary" rule) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can import and inspect prompts directly
//!    without calling a real model, making prompt regressions easy to catch.
//!
//! Callers can override the selected prompt via
//! [`crate::config::ConversionConfig::system_prompt`]; the constants here are
//! used only when no override is provided. Which constant applies is chosen
//! by [`crate::config::PromptRole`].

/// Default system prompt: faithful structural conversion to Markdown.
///
/// Used when the role is [`crate::config::PromptRole::Convert`] (the default).
pub const CONVERT_SYSTEM_PROMPT: &str = r#"あなたは文章をMarkdown形式に変換する専門家です。
以下の指示に従って変換してください：

1. 入力された文章を適切なMarkdown形式に変換する
2. 見出し、リスト、強調、リンクなどのMarkdown記法を適切に使用する
3. 文章の構造を保ちながら、読みやすいMarkdownにする
4. 不要な装飾は避け、シンプルで実用的なMarkdownを生成する
5. 日本語の文章に適した変換を行う

変換結果のみを返してください。説明やコメントは含めないでください。"#;

/// Summarising prompt: condense the prose before rendering it as Markdown.
pub const SUMMARIZE_SYSTEM_PROMPT: &str = r#"あなたは文章を要約してMarkdown形式で出力する専門家です。
以下の指示に従ってください：

1. 入力された文章の要点を簡潔にまとめる
2. 重要な情報を失わずに、元の文章より短くする
3. 見出しと箇条書きを使って読みやすく整理する
4. 日本語で出力する

要約結果のみを返してください。説明やコメントは含めないでください。"#;

/// Structured-summary prompt: fixed section skeleton (overview, features,
/// development), mirroring what the heuristic
/// [`crate::pipeline::classify`] / [`crate::pipeline::assemble`] stages
/// produce locally.
pub const STRUCTURED_SUMMARIZE_SYSTEM_PROMPT: &str = r#"あなたは文章を構造化された要約に変換する専門家です。
以下の指示に従ってください：

1. 入力された文章を「概要」「主要な特徴」「発展と影響」のセクションに整理する
2. 各セクションにMarkdownの見出し（##、###）を付ける
3. 特徴や変化は箇条書き（*）で列挙する
4. 概要は一文で、主題を**太字**で示す
5. 日本語で出力する

変換結果のみを返してください。説明やコメントは含めないでください。"#;

/// Illustrative "influences" template, from the worked music example the
/// original authors used while developing the structured summary.
///
/// This is sample content, not product behaviour: the assembler emits an
/// influences block only when
/// [`crate::config::ConversionConfig::influences_template`] is explicitly
/// set. Pass this constant (or any domain-appropriate sentence) to opt in.
pub const SAMPLE_INFLUENCES_TEMPLATE: &str =
    "レゲエは、スカ、メント、ロックステディなどのジャンルから影響を受けて発展しました。";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_demand_markdown_only_output() {
        for prompt in [
            CONVERT_SYSTEM_PROMPT,
            SUMMARIZE_SYSTEM_PROMPT,
            STRUCTURED_SUMMARIZE_SYSTEM_PROMPT,
        ] {
            assert!(prompt.contains("のみを返してください"));
            assert!(prompt.contains("日本語"));
        }
    }

    #[test]
    fn convert_prompt_mentions_markdown_syntax() {
        assert!(CONVERT_SYSTEM_PROMPT.contains("Markdown記法"));
    }
}
