use crate::models::report::ReportInput;

/// Placeholder used where a media part sits in a text-only rendering.
pub const MEDIA_PLACEHOLDER: &str = "<image>";

/// One piece of a multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Media reference, usually a `data:` URI.
    Media { url: String },
}

/// An ordered multimodal prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prompt {
    pub parts: Vec<PromptPart>,
}

impl Prompt {
    fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.parts.last_mut() {
            Some(PromptPart::Text(last)) => last.push_str(&text),
            _ => self.parts.push(PromptPart::Text(text)),
        }
    }

    fn push_media(&mut self, url: impl Into<String>) {
        self.parts.push(PromptPart::Media { url: url.into() });
    }

    /// Flatten to plain text, marking each media part with [`MEDIA_PLACEHOLDER`].
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => text.as_str(),
                PromptPart::Media { .. } => MEDIA_PLACEHOLDER,
            })
            .collect()
    }

    /// Media references in prompt order.
    pub fn media(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            PromptPart::Media { url } => Some(url.as_str()),
            PromptPart::Text(_) => None,
        })
    }
}

/// Render the fixed herbal origin report template.
///
/// Field values are substituted verbatim; the photo is carried as a media
/// part at the `Photo:` line rather than inlined as text.
pub fn render_origin_report_prompt(input: &ReportInput) -> Prompt {
    let mut prompt = Prompt::default();

    prompt.push_text(concat!(
        "You are an AI assistant specializing in generating herbal origin reports.\n",
        "\n",
        "Based on the information provided, create a comprehensive report detailing the origin,\n",
        "processing, and supply chain history of the herb.\n",
        "\n",
    ));
    prompt.push_text(format!(
        "Herb Name: {}\nBatch ID: {}\nSource Location: {}\nCollection Timestamp: {}\nPhoto: ",
        input.herb_name, input.batch_id, input.source_location, input.collection_timestamp,
    ));
    prompt.push_media(input.photo_data_uri.as_str());
    prompt.push_text(format!(
        "\nProcessing Details: {}\nSupplier Details: {}\nManufacturer Details: {}\n",
        input.processing_details, input.supplier_details, input.manufacturer_details,
    ));
    prompt.push_text(concat!(
        "\n",
        "Write a detailed report about the herb's journey from origin to manufacturing, ",
        "including all available details.\n",
        "The report should be easy to read and understand by a consumer.\n",
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_prompt_layout() {
        let prompt = render_origin_report_prompt(&input());
        assert_eq!(prompt.parts.len(), 3);
        assert!(matches!(prompt.parts[0], PromptPart::Text(_)));
        assert_eq!(
            prompt.parts[1],
            PromptPart::Media {
                url: "data:image/jpeg;base64,/9j/".to_string()
            }
        );
        assert!(matches!(prompt.parts[2], PromptPart::Text(_)));
    }

    #[test]
    fn test_fields_substituted_verbatim() {
        let text = render_origin_report_prompt(&input()).text();
        assert!(text.contains("Herb Name: Ashwagandha\n"));
        assert!(text.contains("Batch ID: B-001\n"));
        assert!(text.contains("Source Location: 18.5204, 73.8567\n"));
        assert!(text.contains("Collection Timestamp: 2024-01-15T10:30:00.000Z\n"));
        assert!(text.contains("Photo: <image>\nProcessing Details: Sun-dried for 5 days\n"));
        assert!(text.contains("Supplier Details: Local cooperative XYZ\n"));
        assert!(text.contains("Manufacturer Details: Herbal Labs Pvt Ltd\n"));
        assert!(!text.contains("base64"));
    }

    #[test]
    fn test_markup_like_values_are_not_escaped() {
        let mut input = input();
        input.herb_name = "<Brahmi> & \"Gotu Kola\"".to_string();
        let text = render_origin_report_prompt(&input).text();
        assert!(text.contains("Herb Name: <Brahmi> & \"Gotu Kola\"\n"));
    }

    #[test]
    fn test_media_iterator() {
        let prompt = render_origin_report_prompt(&input());
        let media: Vec<&str> = prompt.media().collect();
        assert_eq!(media, vec!["data:image/jpeg;base64,/9j/"]);
    }
}
