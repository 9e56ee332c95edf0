//! Carries a generated report to the stateless display page through the URL.
//!
//! The parameter names here are the only contract between the submit handler
//! and the report page. Renaming one side silently breaks the other.

use chrono::{DateTime, FixedOffset};
use url::form_urlencoded;

use crate::models::herb::HerbBatchRecord;

pub const REPORT_PATH: &str = "/report";
pub const ERROR_PATH: &str = "/error";

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_REPORT: &str = "No report generated.";

/// Query string for the report page.
///
/// The photo is appended as `photoUrl` only when one is passed in.
pub fn report_query(record: &HerbBatchRecord, report: &str, photo_data_uri: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("herbName", &record.herb_name)
        .append_pair("batchId", &record.batch_id)
        .append_pair("sourceLocation", &record.source_location)
        .append_pair("collectionTimestamp", &record.collection_timestamp())
        .append_pair("processingDetails", &record.processing_details)
        .append_pair("supplierDetails", &record.supplier_details)
        .append_pair("manufacturerDetails", &record.manufacturer_details)
        .append_pair("report", report);

    if let Some(uri) = photo_data_uri {
        query.append_pair("photoUrl", uri);
    }

    query.finish()
}

/// Relative location of the report page for a generated report.
pub fn report_location(
    record: &HerbBatchRecord,
    report: &str,
    photo_data_uri: Option<&str>,
) -> String {
    format!(
        "{REPORT_PATH}?{}",
        report_query(record, report, photo_data_uri)
    )
}

/// Relative location of the error page carrying `message`.
pub fn error_location(message: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("message", message)
        .finish();
    format!("{ERROR_PATH}?{query}")
}

/// Report page parameters as found in the URL. Absent means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub herb_name: Option<String>,
    pub batch_id: Option<String>,
    pub source_location: Option<String>,
    pub collection_timestamp: Option<String>,
    pub processing_details: Option<String>,
    pub supplier_details: Option<String>,
    pub manufacturer_details: Option<String>,
    pub report: Option<String>,
    pub photo_url: Option<String>,
}

impl ReportQuery {
    /// Parse a raw query string. The first occurrence of a repeated key wins;
    /// unknown keys are ignored.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "herbName" => &mut parsed.herb_name,
                "batchId" => &mut parsed.batch_id,
                "sourceLocation" => &mut parsed.source_location,
                "collectionTimestamp" => &mut parsed.collection_timestamp,
                "processingDetails" => &mut parsed.processing_details,
                "supplierDetails" => &mut parsed.supplier_details,
                "manufacturerDetails" => &mut parsed.manufacturer_details,
                "report" => &mut parsed.report,
                "photoUrl" => &mut parsed.photo_url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        parsed
    }

    /// Apply display fallbacks.
    pub fn into_view(self) -> ReportView {
        fn or_na(value: Option<String>) -> String {
            present(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }

        ReportView {
            herb_name: or_na(self.herb_name),
            batch_id: or_na(self.batch_id),
            source_location: or_na(self.source_location),
            collection_timestamp: present(self.collection_timestamp),
            processing_details: or_na(self.processing_details),
            supplier_details: or_na(self.supplier_details),
            manufacturer_details: or_na(self.manufacturer_details),
            report: present(self.report).unwrap_or_else(|| NO_REPORT.to_string()),
            photo_url: present(self.photo_url).filter(|url| url.starts_with("data:image/")),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// What the report page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub herb_name: String,
    pub batch_id: String,
    pub source_location: String,
    /// Stored value, untouched. See [`ReportView::formatted_timestamp`].
    pub collection_timestamp: Option<String>,
    pub processing_details: String,
    pub supplier_details: String,
    pub manufacturer_details: String,
    pub report: String,
    pub photo_url: Option<String>,
}

impl ReportView {
    /// Human-friendly collection time in the given zone, e.g.
    /// `15 January 2024, 4:00 pm`. Unparseable values are shown as-is.
    pub fn formatted_timestamp(&self, zone: FixedOffset) -> String {
        let Some(raw) = self.collection_timestamp.as_deref() else {
            return NOT_AVAILABLE.to_string();
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(instant) => instant
                .with_timezone(&zone)
                .format("%-d %B %Y, %-I:%M %P")
                .to_string(),
            Err(_) => raw.to_string(),
        }
    }
}
