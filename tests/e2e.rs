//! End-to-end integration tests for prose2md.
//!
//! Everything here runs offline: the heuristic pipeline is deterministic, the
//! completion service is replaced by in-process mocks, and the HTTP tests
//! bind an ephemeral port on localhost. No API key, no network.

use futures::future::BoxFuture;
use prose2md::{
    convert, ConversionConfig, ConversionOutput, Engine, HeadingDetection, SectionLabels,
    ServiceError, Structuring,
};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A completion service with a canned outcome.
struct MockCompletion {
    response: Result<&'static str, &'static str>,
}

impl prose2md::CompletionService for MockCompletion {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        _user: &'a str,
    ) -> BoxFuture<'a, Result<String, ServiceError>> {
        let outcome = match self.response {
            Ok(s) => Ok(s.to_string()),
            Err(detail) => Err(ServiceError::Transport(detail.to_string())),
        };
        Box::pin(async move { outcome })
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Assert the output passes basic quality checks.
fn assert_markdown_quality(out: &ConversionOutput, context: &str) {
    assert!(
        !out.markdown.trim().is_empty(),
        "[{context}] Markdown is empty"
    );
    assert!(
        !out.markdown.contains("\n\n\n"),
        "[{context}] Output has runs of blank lines"
    );
    println!(
        "[{context}] ✓  {} bytes via {:?}",
        out.markdown.len(),
        out.engine
    );
}

// ── Heuristic pipeline (no service) ──────────────────────────────────────────

#[tokio::test]
async fn heuristic_bracket_emphasis() {
    let out = convert("「重要」", &ConversionConfig::default()).await;
    assert_eq!(out.engine, Engine::Heuristic);
    assert!(out.markdown.contains("**重要**"));
    assert_markdown_quality(&out, "bracket-emphasis");
}

#[tokio::test]
async fn heuristic_bullet_lines() {
    let out = convert("・項目1\n・項目2", &ConversionConfig::default()).await;
    let bullets: Vec<&str> = out.markdown.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(bullets.len(), 2);
    assert!(bullets.iter().all(|l| l.starts_with("- ")));
}

#[tokio::test]
async fn heuristic_narrow_heading() {
    let out = convert("これは重要である。", &ConversionConfig::default()).await;
    assert!(out.markdown.starts_with("# これは重要である"));
}

#[tokio::test]
async fn heuristic_url_wrapping() {
    let out = convert("参照: https://example.com/page", &ConversionConfig::default()).await;
    assert!(out
        .markdown
        .contains("[https://example.com/page](https://example.com/page)"));
}

#[tokio::test]
async fn structured_summary_has_single_overview() {
    let config = ConversionConfig::builder()
        .heading_detection(HeadingDetection::Broadened)
        .structuring(Structuring::KeywordSectioned)
        .labels(SectionLabels::music())
        .build()
        .unwrap();

    let text = "レゲエはジャマイカ発祥の音楽ジャンルである。\n\
                スカは先行する音楽である。\n\
                ゆったりしたテンポとオフビートが特徴。\n\
                1960年代以降、世界中に影響を与えながら発展した。";
    let out = convert(text, &config).await;

    assert_eq!(out.markdown.matches("の概要と特徴").count(), 1);
    assert!(out.markdown.contains("## レゲエの概要と特徴"));
    assert!(out.markdown.contains("**レゲエ**は、"));
    assert!(out.markdown.contains("### 音楽的特徴"));
    assert!(out.markdown.contains("### 音楽の発展"));
    // No influences template configured — no trailing block.
    assert!(!out.markdown.contains("影響を受けた音楽"));
    assert_markdown_quality(&out, "structured-summary");
}

#[tokio::test]
async fn whole_pipeline_is_stable_on_reconversion() {
    let config = ConversionConfig::default();
    let once = convert("「要点」\n・一つ目\n・二つ目", &config).await;
    let twice = convert(&once.markdown, &config).await;
    assert_eq!(once.markdown, twice.markdown);
}

// ── Service orchestration ────────────────────────────────────────────────────

#[tokio::test]
async fn model_output_returned_verbatim() {
    let config = ConversionConfig::builder()
        .service(Arc::new(MockCompletion {
            response: Ok("# モデルが返したMarkdown"),
        }))
        .build()
        .unwrap();

    let out = convert("元のテキスト", &config).await;
    assert_eq!(out.engine, Engine::Model);
    assert_eq!(out.markdown, "# モデルが返したMarkdown");
    assert_eq!(out.model.as_deref(), Some("mock-model"));
    assert!(out.fallback_reason.is_none());
}

#[tokio::test]
async fn failed_service_recovers_to_heuristics() {
    let config = ConversionConfig::builder()
        .service(Arc::new(MockCompletion {
            response: Err("connection refused"),
        }))
        .build()
        .unwrap();

    let out = convert("「重要」", &config).await;
    assert_eq!(out.engine, Engine::Heuristic);
    assert!(out.markdown.contains("**重要**"));
    let reason = out.fallback_reason.expect("fallback reason recorded");
    assert!(reason.contains("connection refused"));
}

// ── HTTP boundary ────────────────────────────────────────────────────────────

#[cfg(feature = "server")]
mod http {
    use super::*;

    /// Spawn the API on an ephemeral port; returns its base URL.
    async fn spawn_server(config: ConversionConfig) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(prose2md::server::serve(listener, config));
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn check_api_key_without_credential() {
        let base = spawn_server(ConversionConfig::default()).await;

        let body: serde_json::Value = reqwest::get(format!("{base}/api/check-api-key"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["hasApiKey"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("設定されていません"));
    }

    #[tokio::test]
    async fn check_api_key_with_credential() {
        let config = ConversionConfig::builder().api_key("sk-test").build().unwrap();
        let base = spawn_server(config).await;

        let body: serde_json::Value = reqwest::get(format!("{base}/api/check-api-key"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["hasApiKey"], true);
    }

    #[tokio::test]
    async fn convert_without_text_is_bad_request() {
        let base = spawn_server(ConversionConfig::default()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/convert"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("テキスト"));
    }

    #[tokio::test]
    async fn convert_with_non_string_text_is_bad_request() {
        let base = spawn_server(ConversionConfig::default()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/convert"))
            .json(&serde_json::json!({ "text": 42 }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn convert_falls_back_without_service() {
        let base = spawn_server(ConversionConfig::default()).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/convert"))
            .json(&serde_json::json!({ "text": "こんにちは" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        let markdown = body["markdown"].as_str().unwrap();
        assert!(!markdown.is_empty());
        assert!(markdown.contains("こんにちは"));
    }

    #[tokio::test]
    async fn convert_recovers_from_failing_service() {
        let config = ConversionConfig::builder()
            .service(Arc::new(MockCompletion {
                response: Err("api down"),
            }))
            .build()
            .unwrap();
        let base = spawn_server(config).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/api/convert"))
            .json(&serde_json::json!({ "text": "「重要」" }))
            .send()
            .await
            .unwrap();

        // The caller never sees the service failure: still a 200 with Markdown.
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["markdown"].as_str().unwrap().contains("**重要**"));
    }
}
