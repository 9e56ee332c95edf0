use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use garde::Validate;
use serde::Serialize;

use crate::models::herb::{
    BatchPhoto, HerbBatchRecord, HerbBatchSubmission, ImageMime, PhotoUpload, MAX_PHOTO_BYTES,
};
use crate::models::report::ReportInput;
use crate::services::encoding::decode_data_uri;

/// Wire name and user-facing message for each length-checked form field.
const TEXT_FIELD_MESSAGES: &[(&str, &str, &str)] = &[
    ("herb_name", "herbName", "Herb name must be at least 2 characters."),
    ("batch_id", "batchId", "Batch ID must be at least 2 characters."),
    (
        "source_location",
        "sourceLocation",
        "Source location (GPS coordinates) is required.",
    ),
    (
        "processing_details",
        "processingDetails",
        "Processing details must be at least 10 characters.",
    ),
    (
        "supplier_details",
        "supplierDetails",
        "Supplier details must be at least 10 characters.",
    ),
    (
        "manufacturer_details",
        "manufacturerDetails",
        "Manufacturer details must be at least 10 characters.",
    ),
];

const INVALID_TIMESTAMP: &str = "Invalid date and time format.";
const PHOTO_REQUIRED: &str = "Photo is required.";
pub const PHOTO_TOO_LARGE: &str = "Max file size is 5MB.";
const PHOTO_WRONG_TYPE: &str = ".jpg, .jpeg, .png and .webp files are accepted.";

/// Formats accepted from an HTML `datetime-local` input (no offset).
const LOCAL_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"];

/// Human-readable validation messages keyed by camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for one field; empty when the field is valid.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Offending field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Collect a garde report, renaming paths to wire names.
    fn from_report(
        report: &garde::Report,
        rename: impl Fn(&str) -> (String, Option<&'static str>),
    ) -> Self {
        let mut errors = Self::default();
        for (path, error) in report.iter() {
            let (field, fixed_message) = rename(&path.to_string());
            let message = match fixed_message {
                Some(message) => message,
                None => error.message(),
            };
            if !errors.messages(&field).iter().any(|m| m == message) {
                errors.add(field, message);
            }
        }
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a raw submission and turn it into a typed record.
///
/// Either every field is valid and a complete record is returned, or every
/// offending field is reported. Nothing is partially converted.
pub fn validate_submission(
    submission: HerbBatchSubmission,
) -> Result<HerbBatchRecord, ValidationErrors> {
    if let Err(report) = submission.validate() {
        return Err(ValidationErrors::from_report(&report, form_field));
    }

    let collected_at = parse_collection_timestamp(&submission.collection_timestamp);
    let mime = submission.photo.resolve_mime();
    let (Some(collected_at), Some(mime)) = (collected_at, mime) else {
        // Both are guaranteed by the custom rules above.
        let mut errors = ValidationErrors::default();
        if collected_at.is_none() {
            errors.add("collectionTimestamp", INVALID_TIMESTAMP);
        }
        if mime.is_none() {
            errors.add("photo", PHOTO_WRONG_TYPE);
        }
        return Err(errors);
    };

    Ok(HerbBatchRecord {
        herb_name: submission.herb_name,
        batch_id: submission.batch_id,
        source_location: submission.source_location,
        collected_at,
        photo: BatchPhoto {
            mime,
            bytes: submission.photo.bytes,
        },
        processing_details: submission.processing_details,
        supplier_details: submission.supplier_details,
        manufacturer_details: submission.manufacturer_details,
    })
}

/// Check a report contract input received over the JSON API.
pub fn validate_report_input(input: &ReportInput) -> Result<(), ValidationErrors> {
    input.validate().map_err(|report| {
        ValidationErrors::from_report(&report, |path| (snake_to_camel(path), None))
    })
}

/// Parse a collection timestamp into a UTC instant.
///
/// Accepts RFC 3339 with any offset, or a `datetime-local` value which is
/// taken to be UTC.
pub fn parse_collection_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn validate_timestamp(value: &str, _: &()) -> garde::Result {
    match parse_collection_timestamp(value) {
        Some(_) => Ok(()),
        None => Err(garde::Error::new(INVALID_TIMESTAMP)),
    }
}

pub(crate) fn validate_photo(photo: &PhotoUpload, _: &()) -> garde::Result {
    if photo.is_empty() {
        return Err(garde::Error::new(PHOTO_REQUIRED));
    }
    if photo.bytes.len() > MAX_PHOTO_BYTES {
        return Err(garde::Error::new(PHOTO_TOO_LARGE));
    }
    if photo.resolve_mime().is_none() {
        return Err(garde::Error::new(PHOTO_WRONG_TYPE));
    }
    Ok(())
}

/// The photo rules of the form, applied to an embedded image.
pub(crate) fn validate_data_uri(value: &str, _: &()) -> garde::Result {
    let image = decode_data_uri(value).map_err(|e| garde::Error::new(e.to_string()))?;
    if image.bytes.is_empty() {
        return Err(garde::Error::new(PHOTO_REQUIRED));
    }
    if image.bytes.len() > MAX_PHOTO_BYTES {
        return Err(garde::Error::new(PHOTO_TOO_LARGE));
    }
    if image.mime.to_ascii_lowercase().parse::<ImageMime>().is_err() {
        return Err(garde::Error::new(PHOTO_WRONG_TYPE));
    }
    Ok(())
}

fn form_field(path: &str) -> (String, Option<&'static str>) {
    TEXT_FIELD_MESSAGES
        .iter()
        .find(|(rust_name, _, _)| *rust_name == path)
        .map(|(_, wire_name, message)| (wire_name.to_string(), Some(*message)))
        .unwrap_or_else(|| (snake_to_camel(path), None))
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
