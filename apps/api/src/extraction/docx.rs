use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

const DOCUMENT_PART: &str = "word/document.xml";

/// Raw text of a word-processing document plus non-fatal converter notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxText {
    pub text: String,
    pub messages: Vec<String>,
}

/// Raw-text conversion of a DOCX package.
///
/// Synchronous and CPU-bound; the extractor runs it on the blocking pool.
pub trait DocxConverter: Send + Sync {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<DocxText>;
}

/// Reads `word/document.xml` out of the zip container and keeps only the
/// text runs, one line per paragraph.
pub struct ZipDocxConverter;

impl DocxConverter for ZipDocxConverter {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<DocxText> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).context("File is not a DOCX package")?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .with_context(|| format!("DOCX package has no {DOCUMENT_PART}"))?
            .read_to_string(&mut xml)
            .context("Failed to read document body")?;

        document_xml_to_text(&xml)
    }
}

fn document_xml_to_text(xml: &str) -> Result<DocxText> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_text_run = false;
    // `w:tab` also appears as a tab-stop definition under `w:pPr/w:tabs`; only
    // run content produces characters.
    let mut run_depth = 0usize;
    let mut drawings = 0usize;

    loop {
        match reader.read_event().context("Malformed document XML")? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => run_depth += 1,
                b"w:t" => in_text_run = true,
                b"w:drawing" | b"w:pict" => drawings += 1,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) if run_depth > 0 => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                text.push_str(&t.unescape().context("Bad entity in document text")?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut messages = Vec::new();
    if drawings > 0 {
        messages.push(format!("Ignored {drawings} embedded image(s)"));
    }
    if text.trim().is_empty() {
        messages.push("Document body contains no text runs".to_string());
    }

    Ok(DocxText { text, messages })
}
