use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::services::validation::{validate_data_uri, validate_timestamp};

/// Input to the origin report contract. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[garde(length(min = 1))]
    pub herb_name: String,

    #[garde(length(min = 1))]
    pub batch_id: String,

    #[garde(length(min = 1))]
    pub source_location: String,

    #[garde(custom(validate_timestamp))]
    pub collection_timestamp: String,

    /// `data:<mime>;base64,<payload>`
    #[garde(custom(validate_data_uri))]
    pub photo_data_uri: String,

    #[garde(length(min = 1))]
    pub processing_details: String,

    #[garde(length(min = 1))]
    pub supplier_details: String,

    #[garde(length(min = 1))]
    pub manufacturer_details: String,
}

/// The generated origin report. The text is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    pub report: String,
}
