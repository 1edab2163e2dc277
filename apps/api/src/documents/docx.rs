//! DOCX body text: paragraphs of `word/document.xml`, one per line.

use std::io::{Cursor, Read};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::DocumentError;

const BODY_PART: &str = "word/document.xml";

pub fn extract_docx_text(data: &[u8]) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(docx_error)?;
    let mut body = archive.by_name(BODY_PART).map_err(docx_error)?;
    let mut xml = String::new();
    body.read_to_string(&mut xml)
        .map_err(|e| DocumentError::Docx(format!("{BODY_PART}: {e}")))?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(docx_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                // Tabs and soft breaks separate words inside a paragraph.
                if matches!(e.name().as_ref(), b"w:tab" | b"w:br") {
                    current.push(' ');
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let line = current.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                current.push_str(&e.xml_content().map_err(docx_error)?);
            }
            Event::GeneralRef(e) if in_text => {
                if let Some(ch) = e.resolve_char_ref().map_err(docx_error)? {
                    current.push(ch);
                } else {
                    let name = e.decode().map_err(docx_error)?;
                    if let Some(value) = resolve_predefined_entity(&name) {
                        current.push_str(value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}

fn docx_error(err: impl std::fmt::Display) -> DocumentError {
    DocumentError::Docx(err.to_string())
}
