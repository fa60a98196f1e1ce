//! Plain text extraction from uploaded document bytes.

use std::io::Read;

use crate::{Result, WorkerError};

/// Minimum trimmed text length for an extraction to count as meaningful.
///
/// Guards against silently indexing empty or garbage documents.
const MIN_EXTRACTED_CHARS: usize = 10;

/// Maximum decompressed bytes read from a single ZIP entry (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Supported media types, each carrying its own extraction strategy.
///
/// Dispatch is a closed mapping from the declared MIME tag; an unknown tag
/// is rejected before any bytes are touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/pdf`: page-by-page text extraction.
    Pdf,
    /// DOCX/DOC: paragraph extraction from the embedded document XML.
    OfficeDocument,
    /// Any `text/*` type: strict UTF-8 decoding.
    PlainText,
}

impl MediaType {
    /// Maps a declared MIME type to its extraction strategy.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/msword" => Some(Self::OfficeDocument),
            m if m.starts_with("text/") => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Converts raw file bytes plus a declared media type into plain text.
#[derive(Debug, Default, Clone)]
pub struct TextExtractor;

impl TextExtractor {
    /// Creates a new text extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts plain text from the given bytes.
    ///
    /// Fails with [`WorkerError::UnsupportedMediaType`] for unknown tags,
    /// [`WorkerError::Extraction`] for malformed bytes, and
    /// [`WorkerError::EmptyExtraction`] when the trimmed result is shorter
    /// than the minimum meaningful length.
    pub fn extract(&self, data: &[u8], mime_type: &str) -> Result<String> {
        let media_type = MediaType::from_mime(mime_type)
            .ok_or_else(|| WorkerError::UnsupportedMediaType(mime_type.to_string()))?;

        let text = match media_type {
            MediaType::Pdf => extract_pdf(data)?,
            MediaType::OfficeDocument => extract_docx(data)?,
            MediaType::PlainText => decode_text(data)?,
        };

        if text.trim().chars().count() < MIN_EXTRACTED_CHARS {
            return Err(WorkerError::EmptyExtraction);
        }

        Ok(text)
    }
}

/// Extracts text from a PDF, page by page.
///
/// Pages yielding no text contribute nothing; the rest are newline-joined.
fn extract_pdf(data: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| WorkerError::extraction(e.to_string()))?;

    let text = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text)
}

/// Extracts text from a DOCX archive.
///
/// Reads `word/document.xml` and joins non-blank paragraphs with newlines.
fn extract_docx(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))
        .map_err(|e| WorkerError::extraction(e.to_string()))?;

    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| WorkerError::extraction(format!("word/document.xml: {e}")))?;

    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| WorkerError::extraction(e.to_string()))?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(WorkerError::extraction(
            "word/document.xml exceeds size limit",
        ));
    }

    extract_docx_paragraphs(&xml)
}

/// Collects `w:t` runs per paragraph, keeping only non-blank paragraphs.
fn extract_docx_paragraphs(xml: &[u8]) -> Result<String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => {
                in_text_run = true;
            }
            Ok(Event::Text(t)) if in_text_run => {
                current.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    let paragraph = current.trim();
                    if !paragraph.is_empty() {
                        paragraphs.push(paragraph.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(WorkerError::extraction(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

/// Decodes `text/*` bytes as strict UTF-8.
fn decode_text(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|e| WorkerError::extraction(e.to_string()))
}
