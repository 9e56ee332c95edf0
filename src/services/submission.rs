use std::time::Instant;

use uuid::Uuid;

use crate::config::ReportSettings;
use crate::models::herb::{HerbBatchRecord, HerbBatchSubmission};
use crate::models::report::{ReportInput, ReportResult};
use crate::services::encoding::{encode_data_uri, EncodingError};
use crate::services::report::{generate_herbal_origin_report, ReportError, ReportModel};
use crate::services::transfer;
use crate::services::validation::{validate_submission, ValidationErrors};

/// Process one form submission end to end.
///
/// Returns the report page location on success. Validation happens before
/// anything leaves the process.
pub async fn submit(
    model: &dyn ReportModel,
    settings: &ReportSettings,
    submission: HerbBatchSubmission,
) -> Result<String, SubmissionError> {
    let submission_id = Uuid::new_v4();
    metrics::counter!("report_submissions_total").increment(1);

    let photo_name = submission.photo.file_name.clone().unwrap_or_default();
    let record = validate_submission(submission).map_err(|errors| {
        metrics::counter!("report_validation_failures_total").increment(1);
        tracing::info!(
            %submission_id,
            fields = ?errors.fields().collect::<Vec<_>>(),
            "Submission rejected by validation"
        );
        SubmissionError::Validation(errors)
    })?;

    tracing::info!(
        %submission_id,
        batch_id = %record.batch_id,
        photo_name = %photo_name,
        photo_bytes = record.photo.bytes.len(),
        "Generating origin report"
    );

    let input = report_input(&record);
    let result = generate_report(model, &input, submission_id).await?;

    let photo = settings
        .include_photo_in_shareable_link
        .then_some(input.photo_data_uri.as_str());

    Ok(transfer::report_location(&record, &result.report, photo))
}

/// Run the report contract for a validated input, recording generation
/// metrics and failures.
pub async fn generate_report(
    model: &dyn ReportModel,
    input: &ReportInput,
    submission_id: Uuid,
) -> Result<ReportResult, ReportError> {
    let start = Instant::now();
    let result = generate_herbal_origin_report(model, input).await;
    metrics::histogram!("report_generation_seconds").record(start.elapsed().as_secs_f64());

    match &result {
        Ok(_) => metrics::counter!("reports_generated_total").increment(1),
        Err(e) => {
            metrics::counter!("report_generation_failures_total").increment(1);
            tracing::error!(
                %submission_id,
                batch_id = %input.batch_id,
                error = %e,
                "Report generation failed"
            );
        }
    }

    result
}

/// Build the contract input for a validated record.
pub fn report_input(record: &HerbBatchRecord) -> ReportInput {
    ReportInput {
        herb_name: record.herb_name.clone(),
        batch_id: record.batch_id.clone(),
        source_location: record.source_location.clone(),
        collection_timestamp: record.collection_timestamp(),
        photo_data_uri: encode_data_uri(record.photo.mime.as_ref(), &record.photo.bytes),
        processing_details: record.processing_details.clone(),
        supplier_details: record.supplier_details.clone(),
        manufacturer_details: record.manufacturer_details.clone(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Invalid submission: {0}")]
    Validation(ValidationErrors),

    #[error("Could not read the submission: {0}")]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl SubmissionError {
    /// Plain-text message for the error page. Provider details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::Encoding(_) => "The uploaded photo could not be read.".to_string(),
            Self::Report(ReportError::EmptyOutput) => ReportError::EmptyOutput.to_string(),
            Self::Report(ReportError::Invocation(_)) => {
                "The AI model could not be reached to generate the report. Please try again."
                    .to_string()
            }
        }
    }
}
