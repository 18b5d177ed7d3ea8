//! Analysis request assembly
//!
//! Language-model analysis is an external capability behind
//! [`TextAnalyzer`]. This module picks the content for a request out of a
//! [`CompanyRecord`], keeps it within the analyzer's context budget and
//! hands it over.

mod source;

pub use source::{available_sources, collect_content, validate_source, DataSource};

use crate::output::CompanyRecord;
use crate::AnalysisError;
use async_trait::async_trait;

/// Content budget in estimated tokens
pub const MAX_CONTENT_TOKENS: usize = 350_000;

/// Characters per token used for estimates
pub const CHARS_PER_TOKEN: usize = 4;

/// Sends a prompt plus content to a text model and returns its answer
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn analyze(&self, prompt: &str, content: &str) -> Result<String, AnalysisError>;
}

/// Rough token count: one token per four characters
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Cuts content that exceeds the token budget
///
/// Over-budget content keeps its first `MAX_CONTENT_TOKENS * 4` characters
/// followed by a note giving the original size. Content within budget is
/// returned unchanged.
pub fn prepare_content(content: &str) -> String {
    let tokens = estimate_tokens(content);
    if tokens <= MAX_CONTENT_TOKENS {
        return content.to_string();
    }

    let max_chars = MAX_CONTENT_TOKENS * CHARS_PER_TOKEN;
    let original_chars = content.chars().count();
    let cut = content
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(content.len());

    tracing::warn!(
        "Content exceeds token limit ({} > {} tokens), truncating",
        tokens,
        MAX_CONTENT_TOKENS
    );

    format!(
        "{}\n\n[Content truncated for analysis - original length: {} characters (~{} tokens)]",
        &content[..cut],
        group_thousands(original_chars),
        group_thousands(tokens)
    )
}

/// Runs one analysis over a company record
///
/// # Arguments
///
/// * `analyzer` - The text model
/// * `record` - Collected company data
/// * `prompt` - The analysis request
/// * `source` - Which pages to include
///
/// # Returns
///
/// * `Ok(String)` - The analyzer's answer
/// * `Err(AnalysisError::NoContent)` - The record has no pages, or the
///   selected pages are empty
/// * `Err(AnalysisError::UnknownSource)` - The source names a missing page
/// * Any error the analyzer itself returns
pub async fn run_analysis<A: TextAnalyzer + ?Sized>(
    analyzer: &A,
    record: &CompanyRecord,
    prompt: &str,
    source: &DataSource,
) -> Result<String, AnalysisError> {
    if available_sources(record).is_empty() {
        return Err(AnalysisError::NoContent(format!(
            "no data available for {}",
            record.company_name
        )));
    }
    validate_source(record, source)?;

    let content = collect_content(record, source);
    if content.is_empty() {
        return Err(AnalysisError::NoContent(format!("no content found in {}", source)));
    }

    tracing::info!(
        "Analyzing {} ({} chars, ~{} tokens) from {}",
        record.company_name,
        content.chars().count(),
        estimate_tokens(&content),
        source
    );

    let content = prepare_content(&content);
    analyzer.analyze(prompt, &content).await
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PageRecord;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Records what it was asked and echoes the content length
    #[derive(Default)]
    struct RecordingAnalyzer {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TextAnalyzer for RecordingAnalyzer {
        async fn analyze(&self, prompt: &str, content: &str) -> Result<String, AnalysisError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), content.to_string()));
            Ok(format!("analyzed {} chars", content.len()))
        }
    }

    struct QuotaAnalyzer;

    #[async_trait]
    impl TextAnalyzer for QuotaAnalyzer {
        async fn analyze(&self, _prompt: &str, _content: &str) -> Result<String, AnalysisError> {
            Err(AnalysisError::Quota("monthly limit reached".to_string()))
        }
    }

    fn record_with_homepage(content: &str) -> CompanyRecord {
        let mut record = CompanyRecord::new("Acme");
        record.set_homepage(PageRecord {
            url: "https://acme.test/".to_string(),
            scraped_at: Utc::now(),
            content: content.to_string(),
            raw_length: 0,
            clean_length: content.chars().count(),
        });
        record
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abc"), 0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_400_000), "1,400,000");
    }

    #[test]
    fn test_prepare_content_within_budget_unchanged() {
        assert_eq!(prepare_content("short text"), "short text");
    }

    #[test]
    fn test_prepare_content_truncates() {
        let content = "a".repeat(MAX_CONTENT_TOKENS * CHARS_PER_TOKEN + 8);
        let prepared = prepare_content(&content);

        assert!(prepared.starts_with(&"a".repeat(MAX_CONTENT_TOKENS * CHARS_PER_TOKEN)));
        assert!(prepared.ends_with(
            "\n\n[Content truncated for analysis - original length: 1,400,008 characters (~350,002 tokens)]"
        ));
    }

    #[tokio::test]
    async fn test_run_analysis_delegates() {
        let analyzer = RecordingAnalyzer::default();
        let record = record_with_homepage("Acme sells widgets");

        let result = run_analysis(&analyzer, &record, "Summarize", &DataSource::All)
            .await
            .unwrap();

        assert!(result.starts_with("analyzed"));
        let calls = analyzer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Summarize");
        assert_eq!(calls[0].1, "HOMEPAGE CONTENT:\nAcme sells widgets\n");
    }

    #[tokio::test]
    async fn test_run_analysis_rejects_empty_record() {
        let analyzer = RecordingAnalyzer::default();
        let err = run_analysis(&analyzer, &CompanyRecord::new("Empty"), "x", &DataSource::All)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoContent(_)));
        assert!(analyzer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_analysis_rejects_unknown_source() {
        let analyzer = RecordingAnalyzer::default();
        let record = record_with_homepage("Acme");
        let err = run_analysis(&analyzer, &record, "x", &DataSource::Feature("sso".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownSource(_)));
    }

    #[tokio::test]
    async fn test_run_analysis_rejects_blank_content() {
        let analyzer = RecordingAnalyzer::default();
        let record = record_with_homepage("");
        let err = run_analysis(&analyzer, &record, "x", &DataSource::Homepage)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoContent(_)));
    }

    #[tokio::test]
    async fn test_analyzer_error_propagates() {
        let record = record_with_homepage("Acme");
        let err = run_analysis(&QuotaAnalyzer, &record, "x", &DataSource::Homepage)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Quota(_)));
    }
}
