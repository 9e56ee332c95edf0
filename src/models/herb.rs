use chrono::{DateTime, SecondsFormat, Utc};
use garde::Validate;
use strum::{AsRefStr, Display, EnumString};

use crate::services::validation::{validate_photo, validate_timestamp};

/// Maximum accepted photo size (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Image content types accepted for batch photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum ImageMime {
    #[strum(serialize = "image/jpeg")]
    Jpeg,
    #[strum(serialize = "image/jpg")]
    Jpg,
    #[strum(serialize = "image/png")]
    Png,
    #[strum(serialize = "image/webp")]
    Webp,
}

impl ImageMime {
    /// Identify an accepted image type from its magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }
}

/// A photo as received from the multipart form, before any checks.
#[derive(Debug, Clone, Default)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// The accepted image type for this upload, if any.
    ///
    /// Browsers that cannot classify a file send `application/octet-stream`
    /// or nothing at all; only then is the type sniffed from the content.
    pub fn resolve_mime(&self) -> Option<ImageMime> {
        let declared = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .unwrap_or_default();

        match declared {
            "" | "application/octet-stream" => ImageMime::sniff(&self.bytes),
            declared => declared.to_ascii_lowercase().parse().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Raw herb batch form submission, exactly as posted.
#[derive(Debug, Clone, Default, Validate)]
pub struct HerbBatchSubmission {
    #[garde(length(chars, min = 2))]
    pub herb_name: String,

    #[garde(length(chars, min = 2))]
    pub batch_id: String,

    #[garde(length(chars, min = 5))]
    pub source_location: String,

    #[garde(custom(validate_timestamp))]
    pub collection_timestamp: String,

    #[garde(custom(validate_photo))]
    pub photo: PhotoUpload,

    #[garde(length(chars, min = 10))]
    pub processing_details: String,

    #[garde(length(chars, min = 10))]
    pub supplier_details: String,

    #[garde(length(chars, min = 10))]
    pub manufacturer_details: String,
}

impl HerbBatchSubmission {
    /// Copy of the text fields, for redisplaying the form.
    pub fn without_photo(&self) -> Self {
        Self {
            herb_name: self.herb_name.clone(),
            batch_id: self.batch_id.clone(),
            source_location: self.source_location.clone(),
            collection_timestamp: self.collection_timestamp.clone(),
            photo: PhotoUpload::default(),
            processing_details: self.processing_details.clone(),
            supplier_details: self.supplier_details.clone(),
            manufacturer_details: self.manufacturer_details.clone(),
        }
    }
}

/// Validated photo payload.
#[derive(Debug, Clone)]
pub struct BatchPhoto {
    pub mime: ImageMime,
    pub bytes: Vec<u8>,
}

/// A fully validated herb batch record. Lives for a single submission.
#[derive(Debug, Clone)]
pub struct HerbBatchRecord {
    pub herb_name: String,
    pub batch_id: String,
    pub source_location: String,
    pub collected_at: DateTime<Utc>,
    pub photo: BatchPhoto,
    pub processing_details: String,
    pub supplier_details: String,
    pub manufacturer_details: String,
}

impl HerbBatchRecord {
    /// Canonical wire form of the collection instant, e.g. `2024-01-15T10:30:00.000Z`.
    pub fn collection_timestamp(&self) -> String {
        self.collected_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>, bytes: &[u8]) -> PhotoUpload {
        PhotoUpload {
            file_name: Some("herb.bin".to_string()),
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_declared_mime_is_used_verbatim() {
        let photo = upload(Some("image/jpg"), b"not really a jpeg");
        assert_eq!(photo.resolve_mime(), Some(ImageMime::Jpg));
        assert_eq!(ImageMime::Jpg.to_string(), "image/jpg");
    }

    #[test]
    fn test_declared_mime_is_case_insensitive() {
        let photo = upload(Some("Image/PNG"), b"");
        assert_eq!(photo.resolve_mime(), Some(ImageMime::Png));
    }

    #[test]
    fn test_unsupported_declared_mime() {
        let photo = upload(Some("image/gif"), b"GIF89a");
        assert_eq!(photo.resolve_mime(), None);
    }

    #[test]
    fn test_octet_stream_falls_back_to_sniffing() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let photo = upload(Some("application/octet-stream"), &png);
        assert_eq!(photo.resolve_mime(), Some(ImageMime::Png));

        let photo = upload(None, &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]);
        assert_eq!(photo.resolve_mime(), Some(ImageMime::Jpeg));
    }

    #[test]
    fn test_collection_timestamp_has_millisecond_precision() {
        let record = HerbBatchRecord {
            herb_name: "Tulsi".to_string(),
            batch_id: "T-9".to_string(),
            source_location: "10.0, 76.0".to_string(),
            collected_at: "2024-01-15T10:30:00Z".parse().unwrap(),
            photo: BatchPhoto {
                mime: ImageMime::Png,
                bytes: vec![1],
            },
            processing_details: "Shade dried".to_string(),
            supplier_details: "Farm collective".to_string(),
            manufacturer_details: "Pressing mill".to_string(),
        };
        assert_eq!(record.collection_timestamp(), "2024-01-15T10:30:00.000Z");
    }
}
