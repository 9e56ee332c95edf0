use axum::extract::{Query, RawQuery, State};
use axum::response::Html;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::models::herb::HerbBatchSubmission;
use crate::services::transfer::{ReportQuery, REPORT_PATH};
use crate::services::validation::ValidationErrors;
use crate::views;

/// GET / — Empty record form, collection time preset to now. The form script
/// shows the instant in the browser's zone.
pub async fn record_form() -> Html<String> {
    let values = HerbBatchSubmission {
        collection_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        ..Default::default()
    };
    Html(views::render_record_form(&values, &ValidationErrors::default()))
}

/// GET /report — Render a report from its query string.
pub async fn report(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let query = query.unwrap_or_default();
    let view = ReportQuery::parse(&query).into_view();
    let timestamp = view.formatted_timestamp(state.settings.display_offset);

    let report_link = format!(
        "{}{REPORT_PATH}?{query}",
        state.settings.public_base_url.trim_end_matches('/')
    );
    let qr_image = views::qr_code_url(&state.settings.qr_service_url, &report_link);

    Html(views::render_report(&view, &timestamp, qr_image.as_deref()))
}

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
    pub message: Option<String>,
}

/// GET /error — Generic failure page.
pub async fn error(Query(params): Query<ErrorParams>) -> Html<String> {
    let message = params
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "An unknown error occurred.".to_string());
    Html(views::render_error(&message))
}

/// GET /scan — Camera capture and reverse image search.
pub async fn scan(State(state): State<AppState>) -> Html<String> {
    Html(views::render_scan(&state.settings.reverse_image_search_url))
}
