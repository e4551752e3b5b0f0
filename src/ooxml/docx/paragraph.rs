//! Paragraph text of WordprocessingML parts.
use crate::common::Result;
use crate::common::xml::{append_text, attribute};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Qualified name of a paragraph element.
pub(crate) const PARAGRAPH: &[u8] = b"w:p";
/// Qualified name of a run.
pub(crate) const RUN: &[u8] = b"w:r";
/// Qualified name of a text fragment inside a run.
pub(crate) const TEXT: &[u8] = b"w:t";

/// Text stood for by an empty element inside a run.
///
/// `<w:tab/>` reads as `\t`; `<w:cr/>` and text-wrapping `<w:br/>` read as
/// `\n`. Page and column breaks are not text and yield `None`.
pub(crate) fn run_content_char(e: &BytesStart<'_>) -> Result<Option<char>> {
    Ok(match e.name().as_ref() {
        b"w:tab" => Some('\t'),
        b"w:cr" => Some('\n'),
        b"w:br" => match attribute(e, b"w:type")?.as_deref() {
            None | Some("textWrapping") => Some('\n'),
            Some(_) => None,
        },
        _ => None,
    })
}

/// Text collected for one open paragraph.
#[derive(Default)]
struct OpenParagraph {
    text: String,
    run_depth: usize,
}

/// Extract the text of every `<w:p>` in a part, in document order.
///
/// Paragraphs nested in table cells are included. A paragraph's text is the
/// concatenation of its `<w:t>` fragments, with tabs and line breaks inside
/// runs read as `\t` and `\n`; paragraphs without any text are
/// returned as empty strings. A paragraph nested inside another (text boxes)
/// is reported before the one that contains it, since it closes first.
///
/// # Performance
///
/// Uses streaming XML parsing with a reused buffer.
pub fn paragraph_texts(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::with_capacity(1024);
    let mut open: Vec<OpenParagraph> = Vec::new();
    let mut finished = Vec::new();
    let mut in_text_element = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == PARAGRAPH => open.push(OpenParagraph::default()),
            Event::Empty(e) if e.name().as_ref() == PARAGRAPH => finished.push(String::new()),
            Event::End(e) if e.name().as_ref() == PARAGRAPH => {
                if let Some(paragraph) = open.pop() {
                    finished.push(paragraph.text);
                }
            },
            Event::Start(e) if e.name().as_ref() == RUN => {
                if let Some(paragraph) = open.last_mut() {
                    paragraph.run_depth += 1;
                }
            },
            Event::End(e) if e.name().as_ref() == RUN => {
                if let Some(paragraph) = open.last_mut() {
                    paragraph.run_depth = paragraph.run_depth.saturating_sub(1);
                }
            },
            Event::Start(e) if e.name().as_ref() == TEXT => in_text_element = true,
            Event::End(e) if e.name().as_ref() == TEXT => in_text_element = false,
            Event::Empty(e) => {
                if let Some(paragraph) = open.last_mut()
                    && paragraph.run_depth > 0
                    && let Some(c) = run_content_char(&e)?
                {
                    paragraph.text.push(c);
                }
            },
            Event::Eof => break,
            event if in_text_element => {
                if let Some(paragraph) = open.last_mut() {
                    append_text(&mut paragraph.text, &event)?;
                }
            },
            _ => {},
        }
    }

    Ok(finished)
}
