use super::{extension_in, ExtractionStrategy};
use crate::error::Doc2TxtError;
use crate::item::FileItem;
use crate::output::Extraction;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::warn;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word-processor documents: paragraph text joined by newlines.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxStrategy;

impl ExtractionStrategy for DocxStrategy {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn matches(&self, extension: &str) -> bool {
        extension_in(extension, &["docx"])
    }

    fn extract(&self, item: &FileItem) -> Result<Extraction, Doc2TxtError> {
        match read_document_xml(item.local_path()).and_then(|xml| {
            paragraphs_from_xml(&xml).map_err(|detail| Doc2TxtError::SourceRead {
                path: item.local_path().to_path_buf(),
                detail,
            })
        }) {
            Ok(paragraphs) => Ok(Extraction::native(paragraphs.join("\n"))),
            Err(e) => {
                warn!("DOCX read failed for {}: {}", item.source(), e);
                Ok(Extraction::degraded("", e.to_string()))
            }
        }
    }
}

fn read_document_xml(path: &Path) -> Result<String, Doc2TxtError> {
    let source_err = |detail: String| Doc2TxtError::SourceRead {
        path: path.to_path_buf(),
        detail,
    };

    let file = std::fs::File::open(path).map_err(|e| source_err(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| source_err(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| source_err(format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| source_err(e.to_string()))?;
    Ok(xml)
}

/// Collect the text of every `w:p` in document order.
///
/// Runs (`w:t`) are concatenated; `w:tab` becomes a tab and `w:br`/`w:cr`
/// a line break inside the paragraph. Table cell paragraphs are included.
/// Paragraphs nested in a run (text boxes) are emitted on their own when
/// they close, and the enclosing paragraph keeps collecting afterwards.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    // tab stops inside w:pPr are also named w:tab
    let mut in_props = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"pPr" => in_props = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" if !in_props => {
                    if let Some(p) = open.last_mut() {
                        p.push('\t');
                    }
                }
                b"br" | b"cr" => {
                    if let Some(p) = open.last_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e.unescape().map_err(|err| err.to_string())?;
                if let Some(p) = open.last_mut() {
                    p.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"pPr" => in_props = false,
                b"p" => {
                    if let Some(p) = open.pop() {
                        paragraphs.push(p);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
