//! Text extraction from various file formats
//!
//! Extraction is fail-open: whatever goes wrong while parsing a document, the
//! public [`extract`] entry point hands back an empty string and the document
//! simply scores zero.

use crate::input::file_detector::FileType;
use anyhow::{anyhow, Context};
use log::{debug, warn};
use pdf_extract::{MediaBox, OutputDev, OutputError, PlainTextOutput, Transform};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::cell::RefCell;
use std::io::{self, Cursor, Read};
use std::panic::{self, UnwindSafe};
use std::sync::{Mutex, PoisonError};

const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Serializes panic hook swaps. The hook is process-wide.
static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> anyhow::Result<String>;
}

/// Extract plain text from an in-memory document, sniffing the format from
/// `filename`. Never fails; unreadable documents yield `""`.
pub fn extract(filename: &str, bytes: &[u8]) -> String {
    let result = match FileType::from_filename(filename) {
        FileType::Pdf => PdfExtractor.extract(bytes),
        FileType::WordProcessing => DocxExtractor.extract(bytes),
        FileType::Text => PlainTextExtractor.extract(bytes),
    };

    match result {
        Ok(text) => {
            debug!("Extracted {} characters from '{}'", text.chars().count(), filename);
            text
        }
        Err(e) => {
            warn!("Could not extract text from '{}': {:#}", filename, e);
            String::new()
        }
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> anyhow::Result<String> {
        // pdf-extract panics on some malformed files instead of returning an error
        let pages = catch_unwind_quietly(|| pdf_pages(bytes))
            .map_err(|_| anyhow!("PDF backend panicked while parsing"))??;

        Ok(join_pages(&pages))
    }
}

/// Run `f`, turning a panic into `Err` and logging it at debug level instead
/// of printing it through the default hook.
fn catch_unwind_quietly<F, R>(f: F) -> std::thread::Result<R>
where
    F: FnOnce() -> R + UnwindSafe,
{
    let _guard = PANIC_HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("PDF backend panic: {}", info)));
    let result = panic::catch_unwind(f);
    panic::set_hook(previous);
    result
}

/// Text of each page, in page order.
fn pdf_pages(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
    let document =
        lopdf::Document::load_mem(bytes).map_err(|e| anyhow!("Failed to parse PDF: {}", e))?;

    let buffer = PageBuffer::default();
    let mut writer: &PageBuffer = &buffer;
    {
        let mut collector = PageCollector {
            buffer: &buffer,
            text: PlainTextOutput::new(&mut writer as &mut dyn io::Write),
        };
        pdf_extract::output_doc(&document, &mut collector)
            .map_err(|e| anyhow!("Failed to extract text from PDF: {}", e))?;
    }

    Ok(buffer.pages.into_inner())
}

/// Page layout whitespace is trimmed, pages without text are dropped and the
/// rest are joined with single newlines.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text written by the layout engine, one entry per page.
#[derive(Default)]
struct PageBuffer {
    pages: RefCell<Vec<String>>,
}

impl io::Write for &PageBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let mut pages = self.pages.borrow_mut();
        match pages.last_mut() {
            Some(page) => page.push_str(&text),
            None => pages.push(text.into_owned()),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Delegates layout to pdf-extract's plain text device and starts a new
/// buffer entry on every page.
struct PageCollector<'a> {
    buffer: &'a PageBuffer,
    text: PlainTextOutput<&'a mut dyn io::Write>,
}

impl OutputDev for PageCollector<'_> {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.buffer.pages.borrow_mut().push(String::new());
        self.text.begin_page(page_num, media_box, art_box)
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.text.end_page()
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        self.text.output_character(trm, width, spacing, font_size, char)
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        self.text.begin_word()
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        self.text.end_word()
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.text.end_line()
    }
}

/// Reads `.docx` containers. Legacy binary `.doc` files are not ZIP archives
/// and therefore fail here like any other corrupt upload.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> anyhow::Result<String> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).context("Not a Word document container")?;

        let mut xml = String::new();
        let mut body = archive
            .by_name("word/document.xml")
            .context("Missing word/document.xml")?;
        body.read_to_string(&mut xml)
            .context("Failed to read document body")?;

        Ok(body_paragraphs(&xml)?.join("\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Body,
    /// `w:p` directly under `w:body`
    Paragraph,
    /// `w:p` anywhere else: tables, content controls, text boxes
    NestedParagraph,
    Run,
    Text,
    Other,
}

impl Element {
    fn classify(wordml: bool, local_name: &[u8], parent: Option<Element>) -> Self {
        if !wordml {
            return Element::Other;
        }
        match local_name {
            b"body" => Element::Body,
            b"p" if parent == Some(Element::Body) => Element::Paragraph,
            b"p" => Element::NestedParagraph,
            b"r" => Element::Run,
            b"t" if parent == Some(Element::Run) => Element::Text,
            _ => Element::Other,
        }
    }
}

/// True when the innermost open paragraph is a body paragraph.
fn in_body_paragraph(stack: &[Element]) -> bool {
    stack
        .iter()
        .rev()
        .find(|element| matches!(element, Element::Paragraph | Element::NestedParagraph))
        == Some(&Element::Paragraph)
}

/// Collect the text of every paragraph that is a direct child of `w:body`.
fn body_paragraphs(xml: &str) -> anyhow::Result<Vec<String>> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    loop {
        let (namespace, event) = reader
            .read_resolved_event()
            .context("Malformed document.xml")?;
        let wordml = matches!(namespace, ResolveResult::Bound(Namespace(ns)) if ns == WORDML_NS);

        match event {
            Event::Start(e) => {
                let element = Element::classify(wordml, e.local_name().as_ref(), stack.last().copied());
                if element == Element::Paragraph {
                    current.clear();
                }
                stack.push(element);
            }
            Event::Empty(e) => {
                let parent = stack.last().copied();
                match Element::classify(wordml, e.local_name().as_ref(), parent) {
                    Element::Paragraph => paragraphs.push(String::new()),
                    Element::Other
                        if wordml && parent == Some(Element::Run) && in_body_paragraph(&stack) =>
                    {
                        match e.local_name().as_ref() {
                            b"tab" => current.push('\t'),
                            b"br" | b"cr" => current.push('\n'),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if stack.last() == Some(&Element::Text) && in_body_paragraph(&stack) {
                    current.push_str(&t.unescape().context("Invalid text entity")?);
                }
            }
            Event::End(_) => {
                if stack.pop() == Some(Element::Paragraph) {
                    paragraphs.push(std::mem::take(&mut current));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> anyhow::Result<String> {
        Ok(decode_utf8_ignoring_invalid(bytes))
    }
}

/// Decode UTF-8, silently dropping invalid byte sequences.
fn decode_utf8_ignoring_invalid(mut bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                decoded.push_str(valid);
                return decoded;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                decoded.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let invalid_len = e.error_len().unwrap_or(rest.len());
                bytes = &rest[invalid_len..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Write;
    use zip::write::FileOptions;

    /// Build a PDF with one page per entry; `None` pages carry no text.
    fn pdf_with_pages(pages: &[Option<&str>], with_media_box: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let mut operations = vec![Operation::new("BT", vec![])];
            if let Some(text) = text {
                operations.push(Operation::new("Tf", vec!["F1".into(), 24.into()]));
                operations.push(Operation::new("Td", vec![72.into(), 700.into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            }
            operations.push(Operation::new("ET", vec![]));
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        };
        if with_media_box {
            let media_box: Vec<Object> = [0, 0, 612, 792].into_iter().map(Object::Integer).collect();
            pages_dict.set("MediaBox", media_box);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math" xmlns:v="urn:schemas-microsoft-com:vml"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract("resume.txt", "Senior Rust engineer".as_bytes());
        assert_eq!(text, "Senior Rust engineer");
    }

    #[test]
    fn test_plain_text_drops_invalid_utf8() {
        let bytes = b"Py\xffthon \xe2\x82 SQL";
        assert_eq!(extract("resume.txt", bytes), "Python  SQL");
    }

    #[test]
    fn test_unknown_extension_is_plain_text() {
        assert_eq!(extract("resume", "Kubernetes".as_bytes()), "Kubernetes");
    }

    #[test]
    fn test_invalid_pdf_yields_empty_text() {
        assert_eq!(extract("resume.pdf", b"definitely not a pdf"), "");
        assert_eq!(extract("RESUME.PDF", b""), "");
    }

    #[test]
    fn test_join_pages_skips_empty_pages() {
        let pages = vec!["\nfirst".to_string(), " \n".to_string(), "third".to_string()];
        assert_eq!(join_pages(&pages), "first\nthird");
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn test_pdf_pages_are_joined_and_empty_pages_skipped() {
        let bytes = pdf_with_pages(&[Some("Hello"), None, Some("World")], true);
        assert_eq!(extract("cv.pdf", &bytes), "Hello\nWorld");
    }

    #[test]
    fn test_pdf_backend_panic_yields_empty_text() {
        // No MediaBox anywhere in the page tree
        let bytes = pdf_with_pages(&[Some("Hello")], false);
        assert_eq!(extract("cv.pdf", &bytes), "");
    }

    #[test]
    fn test_docx_paragraphs_are_joined_with_newlines() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">Rust </w:t></w:r><w:r><w:t>&amp; SQL</w:t></w:r></w:p>",
        );
        assert_eq!(extract("cv.docx", &bytes), "Jane Doe\nRust & SQL");
    }

    #[test]
    fn test_docx_tabs_breaks_and_empty_paragraphs() {
        let bytes = docx_with_body(
            "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
             <w:r><w:t>Skills</w:t><w:tab/><w:t>Python</w:t><w:br/><w:t>Go</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>End</w:t></w:r></w:p>",
        );
        assert_eq!(extract("cv.docx", &bytes), "Skills\tPython\nGo\n\nEnd");
    }

    #[test]
    fn test_docx_table_paragraphs_are_not_body_text() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Intro</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>Outro</w:t></w:r></w:p>",
        );
        assert_eq!(extract("cv.docx", &bytes), "Intro\nOutro");
    }

    #[test]
    fn test_docx_content_controls_and_text_boxes_are_not_body_text() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Before</w:t></w:r></w:p>\
             <w:sdt><w:sdtContent><w:p><w:r><w:t>Control</w:t></w:r></w:p></w:sdtContent></w:sdt>\
             <w:p><w:r><w:t>Lead</w:t></w:r><w:r><w:pict><v:shape><v:textbox><w:txbxContent>\
             <w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></v:textbox></v:shape></w:pict></w:r></w:p>",
        );
        assert_eq!(extract("cv.docx", &bytes), "Before\nLead");
    }

    #[test]
    fn test_docx_math_text_is_skipped() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t xml:space=\"preserve\">Area </w:t></w:r>\
             <m:oMath><m:r><m:t>x</m:t></m:r></m:oMath></w:p>",
        );
        assert_eq!(extract("cv.docx", &bytes), "Area ");
    }

    #[test]
    fn test_binary_doc_and_corrupt_docx_yield_empty_text() {
        assert_eq!(extract("legacy.doc", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1]), "");
        assert_eq!(extract("broken.docx", b"PK\x03\x04garbage"), "");
    }

    #[test]
    fn test_docx_without_document_body_yields_empty_text() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("other.xml", FileOptions::default()).unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert_eq!(extract("cv.docx", &bytes), "");
    }
}
