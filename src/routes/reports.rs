use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::report::{ReportInput, ReportResult};
use crate::services::report::ReportError;
use crate::services::submission;
use crate::services::validation::{validate_report_input, ValidationErrors};

/// Error body for the JSON API.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

/// POST /api/v1/reports — Run the origin report contract directly.
pub async fn generate_report(
    State(state): State<AppState>,
    Json(input): Json<ReportInput>,
) -> Result<Json<ReportResult>, (StatusCode, Json<ApiError>)> {
    let submission_id = Uuid::new_v4();
    metrics::counter!("report_submissions_total").increment(1);

    if let Err(errors) = validate_report_input(&input) {
        metrics::counter!("report_validation_failures_total").increment(1);
        tracing::info!(
            %submission_id,
            fields = ?errors.fields().collect::<Vec<_>>(),
            "Report request rejected by validation"
        );
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError {
                error: "Invalid report input".to_string(),
                fields: Some(errors),
            }),
        ));
    }

    let result = submission::generate_report(state.model.as_ref(), &input, submission_id)
        .await
        .map_err(|e| {
            let error = match e {
                ReportError::EmptyOutput => e.to_string(),
                ReportError::Invocation(_) => "The AI model could not be reached".to_string(),
            };
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError {
                    error,
                    fields: None,
                }),
            )
        })?;

    Ok(Json(result))
}
