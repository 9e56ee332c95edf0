use async_trait::async_trait;

use crate::models::report::{ReportInput, ReportResult};
use crate::services::encoding::EncodingError;
use crate::services::prompt::{render_origin_report_prompt, Prompt};

/// A hosted generative model that turns a multimodal prompt into text.
#[async_trait]
pub trait ReportModel: Send + Sync {
    /// Run one generation. An empty string is a valid (if useless) answer.
    async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Produce a consumer-facing origin report for one herb batch.
///
/// Each call is a single, independent model invocation: no retries, no
/// caching by batch ID or content.
pub async fn generate_herbal_origin_report(
    model: &dyn ReportModel,
    input: &ReportInput,
) -> Result<ReportResult, ReportError> {
    let prompt = render_origin_report_prompt(input);

    tracing::debug!(
        batch_id = %input.batch_id,
        model = model.model_name(),
        "Requesting herbal origin report"
    );

    let report = model.generate(&prompt).await?;

    if report.trim().is_empty() {
        return Err(ReportError::EmptyOutput);
    }

    Ok(ReportResult { report })
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model provider reported an error: {0}")]
    Provider(String),

    #[error("Prompt image could not be decoded: {0}")]
    Image(#[from] EncodingError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report generation failed: {0}")]
    Invocation(#[from] ModelError),

    #[error("Failed to generate report from AI model.")]
    EmptyOutput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedModel {
        reply: Result<&'static str, &'static str>,
        seen: Mutex<Vec<Prompt>>,
    }

    impl FixedModel {
        fn new(reply: Result<&'static str, &'static str>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReportModel for FixedModel {
        async fn generate(&self, prompt: &Prompt) -> Result<String, ModelError> {
            self.seen.lock().unwrap().push(prompt.clone());
            self.reply
                .map(str::to_string)
                .map_err(|e| ModelError::Provider(e.to_string()))
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn input() -> ReportInput {
        ReportInput {
            herb_name: "Ashwagandha".to_string(),
            batch_id: "B-001".to_string(),
            source_location: "18.5204, 73.8567".to_string(),
            collection_timestamp: "2024-01-15T10:30:00.000Z".to_string(),
            photo_data_uri: "data:image/jpeg;base64,/9j/".to_string(),
            processing_details: "Sun-dried for 5 days".to_string(),
            supplier_details: "Local cooperative XYZ".to_string(),
            manufacturer_details: "Herbal Labs Pvt Ltd".to_string(),
        }
    }

    #[tokio::test]
    async fn test_report_text_passed_through() {
        let model = FixedModel::new(Ok("  Harvested near Pune.\n"));
        let result = generate_herbal_origin_report(&model, &input()).await.unwrap();
        assert_eq!(result.report, "  Harvested near Pune.\n");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].media().count(), 1);
    }

    #[tokio::test]
    async fn test_blank_output_is_empty_output() {
        for reply in ["", "   \n\t"] {
            let model = FixedModel::new(Ok(reply));
            let err = generate_herbal_origin_report(&model, &input())
                .await
                .unwrap_err();
            assert!(matches!(err, ReportError::EmptyOutput));
        }
    }

    #[tokio::test]
    async fn test_model_failure_is_invocation_error() {
        let model = FixedModel::new(Err("upstream timeout"));
        let err = generate_herbal_origin_report(&model, &input())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Invocation(ModelError::Provider(_))));
        assert!(err.to_string().contains("upstream timeout"));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_not_cached() {
        let model = FixedModel::new(Ok("report"));
        generate_herbal_origin_report(&model, &input()).await.unwrap();
        generate_herbal_origin_report(&model, &input()).await.unwrap();
        assert_eq!(model.seen.lock().unwrap().len(), 2);
    }
}
