//! JSON export of extracted items

use crate::domain::entities::ExtractedItem;

/// File name offered for the downloaded export
pub const EXPORT_FILE_NAME: &str = "extracted_story_data.json";

/// Converts extracted items to and from the export document: a UTF-8 JSON
/// array indented with two spaces, items exactly as held in review
pub struct JsonExporter;

impl JsonExporter {
    pub fn export(items: &[ExtractedItem]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(items)
    }

    /// Parse a previously exported document
    pub fn import(json: &str) -> Result<Vec<ExtractedItem>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// `Content-Disposition` header value for the download
    pub fn content_disposition() -> String {
        format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{extraction_service::extract_items, SAMPLE_CONTENT};
    use crate::domain::value_objects::ItemType;

    #[test]
    fn test_export_reproduces_items() {
        let items = extract_items(SAMPLE_CONTENT, &ItemType::ALL);
        let json = JsonExporter::export(&items).unwrap();
        assert_eq!(JsonExporter::import(&json).unwrap(), items);
    }

    #[test]
    fn test_export_format() {
        let items = extract_items(SAMPLE_CONTENT, &[ItemType::Location]);
        let json = JsonExporter::export(&items).unwrap();

        assert!(json.starts_with("[\n  {\n    \"type\": \"location\""));
        // Field order follows the extracted data, not alphabetical order
        let region = json.find("\"region\"").unwrap();
        let description = json.find("\"description\"").unwrap();
        assert!(region < description);
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(JsonExporter::export(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            JsonExporter::content_disposition(),
            "attachment; filename=\"extracted_story_data.json\""
        );
    }
}
