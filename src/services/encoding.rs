use base64::Engine;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Embed raw image bytes as a `data:<mime>;base64,<payload>` URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("{DATA_PREFIX}{mime}{BASE64_MARKER}{payload}")
}

/// Image recovered from a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Split a base64 data URI back into its MIME type and bytes.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage, EncodingError> {
    let rest = uri
        .strip_prefix(DATA_PREFIX)
        .ok_or(EncodingError::MissingPrefix)?;
    let (mime, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or(EncodingError::NotBase64)?;

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;

    Ok(DecodedImage {
        mime: mime.to_string(),
        bytes,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("Data URI must start with \"data:\"")]
    MissingPrefix,

    #[error("Data URI is not base64-encoded")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Upload could not be read: {0}")]
    Unreadable(String),

    #[error("Upload exceeds the request size limit")]
    TooLarge,
}
