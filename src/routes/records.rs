use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::app_state::AppState;
use crate::models::herb::{HerbBatchSubmission, PhotoUpload};
use crate::services::encoding::EncodingError;
use crate::services::submission::{self, SubmissionError};
use crate::services::transfer;
use crate::services::validation::{ValidationErrors, PHOTO_TOO_LARGE};
use crate::views;

/// POST /records — Submit a herb batch form and generate its origin report.
///
/// Redirects (303) to the report page on success and to the error page on
/// any failure past validation. Validation failures re-render the form.
pub async fn create_record(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut submission = HerbBatchSubmission::default();

    match read_submission(multipart, &mut submission).await {
        Ok(()) => {}
        Err(EncodingError::TooLarge) => {
            tracing::info!(batch_id = %submission.batch_id, "Record submission over the body limit");
            metrics::counter!("report_submissions_total").increment(1);
            metrics::counter!("report_validation_failures_total").increment(1);
            let mut errors = ValidationErrors::default();
            errors.add("photo", PHOTO_TOO_LARGE);
            return invalid_form(&submission, &errors);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable record submission");
            let err = SubmissionError::from(e);
            return Redirect::to(&transfer::error_location(&err.user_message())).into_response();
        }
    }

    let form_values = submission.without_photo();

    match submission::submit(state.model.as_ref(), &state.settings, submission).await {
        Ok(location) => Redirect::to(&location).into_response(),
        Err(SubmissionError::Validation(errors)) => invalid_form(&form_values, &errors),
        Err(e) => Redirect::to(&transfer::error_location(&e.user_message())).into_response(),
    }
}

fn invalid_form(values: &HerbBatchSubmission, errors: &ValidationErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::render_record_form(values, errors)),
    )
        .into_response()
}

/// Collect the multipart form into `submission`. Unknown parts are ignored.
///
/// Fields read before a failure stay in `submission` so the form can be
/// shown again.
async fn read_submission(
    mut multipart: Multipart,
    submission: &mut HerbBatchSubmission,
) -> Result<(), EncodingError> {
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let slot = match name.as_str() {
            "photo" => {
                submission.photo = read_photo(field).await?;
                continue;
            }
            "herbName" => &mut submission.herb_name,
            "batchId" => &mut submission.batch_id,
            "sourceLocation" => &mut submission.source_location,
            "collectionTimestamp" => &mut submission.collection_timestamp,
            "processingDetails" => &mut submission.processing_details,
            "supplierDetails" => &mut submission.supplier_details,
            "manufacturerDetails" => &mut submission.manufacturer_details,
            _ => continue,
        };
        *slot = field.text().await.map_err(unreadable)?;
    }

    Ok(())
}

async fn read_photo(field: Field<'_>) -> Result<PhotoUpload, EncodingError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(unreadable)?;

    Ok(PhotoUpload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

fn unreadable(e: MultipartError) -> EncodingError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return EncodingError::TooLarge;
    }
    EncodingError::Unreadable(e.body_text())
}
