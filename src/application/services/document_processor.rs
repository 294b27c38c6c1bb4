//! Document processor - Turns stored upload bytes into plain text and XML
//!
//! `.txt` is decoded as text and `.docx` is read from its
//! `word/document.xml` part. `.pdf` and `.doc` produce a fixed placeholder
//! passage naming the stored file.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;

// Opening tag must not be self-closing, otherwise the lazy body would run
// into the next paragraph
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:p(?:\s[^>]*[^/])?>.*?</w:p>").unwrap());
static RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#x[0-9a-fA-F]+);").unwrap());

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Docx,
    Doc,
    Pdf,
}

impl DocumentFormat {
    /// Accepted format for a file name, judged by extension only
    pub fn from_file_name(name: &str) -> Option<Self> {
        match extension(name)?.as_str() {
            "txt" => Some(DocumentFormat::Text),
            "docx" => Some(DocumentFormat::Docx),
            "doc" => Some(DocumentFormat::Doc),
            "pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }
}

/// Lowercased text after the last '.', if any
pub fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub plain: String,
    pub xml: String,
}

impl ExtractedContent {
    fn from_plain(plain: String) -> Self {
        let xml = to_xml(&plain);
        Self { plain, xml }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Invalid DOCX archive: {0}")]
    InvalidArchive(String),
    #[error("DOCX archive has no word/document.xml")]
    MissingDocumentBody,
    #[error("DOCX document body exceeds {limit} bytes once decompressed")]
    DocumentBodyTooLarge { limit: u64 },
}

/// Derive plain text and its XML wrapping from a stored object
///
/// `max_body_bytes` caps the decompressed size of a `.docx` body.
pub fn extract_content(
    bytes: &[u8],
    path: &str,
    max_body_bytes: u64,
) -> Result<ExtractedContent, ProcessingError> {
    let format = DocumentFormat::from_file_name(path)
        .ok_or_else(|| ProcessingError::UnsupportedFileType(path.to_string()))?;

    let plain = match format {
        DocumentFormat::Text => String::from_utf8_lossy(bytes).into_owned(),
        DocumentFormat::Docx => docx_text(bytes, max_body_bytes)?,
        DocumentFormat::Doc | DocumentFormat::Pdf => placeholder_text(path),
    };
    Ok(ExtractedContent::from_plain(plain))
}

fn placeholder_text(path: &str) -> String {
    format!(
        "Extracted content from {}\n\nThis is simulated content that would be extracted from the uploaded file. In a real implementation, this would parse the actual file content using appropriate libraries for each file type.",
        path
    )
}

/// One line per `<w:p>` paragraph of the document body
fn docx_text(bytes: &[u8], max_body_bytes: u64) -> Result<String, ProcessingError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ProcessingError::InvalidArchive(e.to_string()))?;

    let mut entry = archive
        .by_name(DOCX_BODY)
        .map_err(|_| ProcessingError::MissingDocumentBody)?;
    let too_large = ProcessingError::DocumentBodyTooLarge {
        limit: max_body_bytes,
    };
    if entry.size() > max_body_bytes {
        return Err(too_large);
    }

    // The declared size may lie, so the read itself is bounded too
    let mut raw = Vec::new();
    (&mut entry)
        .take(max_body_bytes.saturating_add(1))
        .read_to_end(&mut raw)
        .map_err(|e| ProcessingError::InvalidArchive(e.to_string()))?;
    if raw.len() as u64 > max_body_bytes {
        return Err(too_large);
    }
    let body =
        String::from_utf8(raw).map_err(|e| ProcessingError::InvalidArchive(e.to_string()))?;

    let lines: Vec<String> = PARAGRAPH_RE
        .find_iter(&body)
        .map(|paragraph| {
            RUN_RE
                .captures_iter(paragraph.as_str())
                .map(|run| match run.get(1) {
                    Some(text) => unescape_xml(text.as_str()),
                    None if run[0].starts_with("<w:tab") => "\t".to_string(),
                    None => "\n".to_string(),
                })
                .collect()
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Wrap every non-blank line as a numbered `<paragraph>`
///
/// Paragraph ids are 1-based line numbers, so blank lines leave gaps.
pub fn to_xml(plain: &str) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<document>\n");
    for (index, line) in plain.split('\n').enumerate() {
        let line = line.trim();
        if !line.is_empty() {
            xml.push_str(&format!(
                "  <paragraph id=\"{}\">{}</paragraph>\n",
                index + 1,
                escape_xml(line)
            ));
        }
    }
    xml.push_str("</document>");
    xml
}

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Single pass, so `&amp;lt;` stays `&lt;`. Unknown or invalid references
/// are kept verbatim.
fn unescape_xml(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let code = match name.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => name[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

pub fn word_count(plain: &str) -> i64 {
    plain.split_whitespace().count() as i64
}
