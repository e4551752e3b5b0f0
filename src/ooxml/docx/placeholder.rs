//! `{{TOKEN}}` placeholder substitution in WordprocessingML parts.
//!
//! Substitution works paragraph by paragraph. The text of all `<w:t>`
//! fragments of a paragraph is joined, tabs and line breaks inside its runs
//! included, and the markers are replaced key by key. When anything changed,
//! the whole new text goes into the first fragment while the other fragments
//! are emptied and the old tabs and breaks removed; tabs and breaks of the
//! new text are written as `<w:tab/>` and `<w:br/>` at their new place. Run
//! properties of the first run therefore apply to the entire paragraph
//! afterwards. Other markup (run properties, page breaks, drawings,
//! bookmarks) is untouched.

use super::paragraph::{PARAGRAPH, RUN, TEXT, run_content_char};
use crate::common::xml::append_text;
use crate::common::{Error, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Marker prefix and suffix around a token name.
const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A compiled set of placeholder markers and their replacement values.
///
/// Keys are matched literally and case-sensitively: the key `PLACA` only
/// matches the marker `{{PLACA}}`.
///
/// # Examples
///
/// ```
/// use ordem::ooxml::docx::Placeholders;
///
/// let placeholders = Placeholders::new([("VEICULO", "Gol")]).unwrap();
/// assert_eq!(placeholders.replace("Veiculo: {{VEICULO}}").as_deref(), Some("Veiculo: Gol"));
/// assert_eq!(placeholders.replace("Placa: {{PLACA}}"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Placeholders {
    markers: Vec<String>,
    values: Vec<String>,
    matcher: AhoCorasick,
}

impl Placeholders {
    /// Compile a mapping of token names to values.
    ///
    /// When a key appears twice, the first value wins.
    pub fn new<I, K, V>(mapping: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut markers = Vec::new();
        let mut values = Vec::new();
        for (key, value) in mapping {
            markers.push(format!("{}{}{}", OPEN, key.as_ref(), CLOSE));
            values.push(value.into());
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&markers)
            .map_err(|e| Error::Other(format!("cannot compile placeholders: {}", e)))?;

        Ok(Self {
            markers,
            values,
            matcher,
        })
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether there is no marker at all.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The markers, `{{` and `}}` included.
    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    /// Replace the known markers in `text`, one key after another in
    /// mapping order.
    ///
    /// Returns `None` when `text` holds no known marker. A value containing
    /// the marker of a later key is filled in by that key; markers of earlier
    /// keys stay literal.
    pub fn replace(&self, text: &str) -> Option<String> {
        if self.markers.is_empty() || !self.matcher.is_match(text) {
            return None;
        }

        let mut out = text.to_string();
        for (marker, value) in self.markers.iter().zip(&self.values) {
            if out.contains(marker.as_str()) {
                out = out.replace(marker.as_str(), value);
            }
        }
        Some(out)
    }
}

/// One `<w:t>` element of the paragraph being scanned.
struct Fragment {
    /// Index of the `<w:t>` start (or empty) event
    open: usize,
    self_closing: bool,
    /// Indices of the events carrying its character data
    text_events: SmallVec<[usize; 2]>,
}

#[derive(Default)]
struct ParagraphFrame {
    /// Joined text of the paragraph
    text: String,
    fragments: SmallVec<[Fragment; 4]>,
    /// Indices of the `<w:tab/>`, `<w:br/>` and `<w:cr/>` events
    breaks: SmallVec<[usize; 4]>,
    run_depth: usize,
}

impl ParagraphFrame {
    /// Queue the event replacements for this paragraph when it holds a marker.
    fn rewrite(
        self,
        placeholders: &Placeholders,
        replacements: &mut HashMap<usize, Vec<Event<'static>>>,
    ) -> bool {
        let Some(new_text) = placeholders.replace(&self.text) else {
            return false;
        };

        let mut fragments = self.fragments.into_iter();
        let Some(first) = fragments.next() else {
            return false;
        };

        let mut events = vec![Event::Start(preserved_text_start())];
        events.extend(text_body(&new_text));
        if first.self_closing {
            events.push(Event::End(BytesEnd::new("w:t")));
        }
        replacements.insert(first.open, events);

        for index in first
            .text_events
            .into_iter()
            .chain(fragments.flat_map(|f| f.text_events))
            .chain(self.breaks)
        {
            replacements.insert(index, Vec::new());
        }

        true
    }
}

fn preserved_text_start() -> BytesStart<'static> {
    BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])
}

/// Character data for a `<w:t>`, with tabs turned into `<w:tab/>` and line
/// breaks into `<w:br/>`.
fn text_body(text: &str) -> Vec<Event<'static>> {
    let normalized = text.replace("\r\n", "\n");
    let mut events = Vec::new();
    let mut start = 0;

    for (at, c) in normalized.char_indices() {
        let element = match c {
            '\t' => "w:tab",
            '\n' | '\r' => "w:br",
            _ => continue,
        };
        push_segment(&mut events, &normalized[start..at]);
        events.push(Event::End(BytesEnd::new("w:t")));
        events.push(Event::Empty(BytesStart::new(element)));
        events.push(Event::Start(preserved_text_start()));
        start = at + c.len_utf8();
    }
    push_segment(&mut events, &normalized[start..]);

    events
}

fn push_segment(events: &mut Vec<Event<'static>>, segment: &str) {
    if !segment.is_empty() {
        events.push(Event::Text(BytesText::new(segment).into_owned()));
    }
}

/// Substitute placeholders in one WordprocessingML part.
///
/// Returns the rewritten part and the number of paragraphs that changed.
/// Parts without any marker are returned unchanged in content, though the
/// XML is re-serialized.
pub fn substitute_part(xml: &[u8], placeholders: &Placeholders) -> Result<(Vec<u8>, usize)> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::with_capacity(1024);

    let mut events: Vec<Event<'static>> = Vec::new();
    let mut stack: Vec<ParagraphFrame> = Vec::new();
    let mut replacements: HashMap<usize, Vec<Event<'static>>> = HashMap::new();
    let mut in_text_element = false;
    let mut rewritten = 0;

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?.into_owned();
        let index = events.len();

        match &event {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == PARAGRAPH => {
                stack.push(ParagraphFrame::default());
            },
            Event::End(e) if e.name().as_ref() == PARAGRAPH => {
                if let Some(frame) = stack.pop()
                    && frame.rewrite(placeholders, &mut replacements)
                {
                    rewritten += 1;
                }
            },
            Event::Start(e) if e.name().as_ref() == RUN => {
                if let Some(frame) = stack.last_mut() {
                    frame.run_depth += 1;
                }
            },
            Event::End(e) if e.name().as_ref() == RUN => {
                if let Some(frame) = stack.last_mut() {
                    frame.run_depth = frame.run_depth.saturating_sub(1);
                }
            },
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == TEXT => {
                let self_closing = matches!(event, Event::Empty(_));
                if let Some(frame) = stack.last_mut() {
                    frame.fragments.push(Fragment {
                        open: index,
                        self_closing,
                        text_events: SmallVec::new(),
                    });
                    in_text_element = !self_closing;
                }
            },
            Event::End(e) if e.name().as_ref() == TEXT => in_text_element = false,
            Event::Empty(e) => {
                if let Some(frame) = stack.last_mut()
                    && frame.run_depth > 0
                    && let Some(c) = run_content_char(e)?
                {
                    frame.text.push(c);
                    frame.breaks.push(index);
                }
            },
            other if in_text_element => {
                if let Some(frame) = stack.last_mut()
                    && append_text(&mut frame.text, other)?
                    && let Some(fragment) = frame.fragments.last_mut()
                {
                    fragment.text_events.push(index);
                }
            },
            _ => {},
        }

        events.push(event);
    }

    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    for (index, event) in events.into_iter().enumerate() {
        match replacements.remove(&index) {
            Some(substitute) => {
                for replacement in substitute {
                    writer.write_event(replacement)?;
                }
            },
            None => writer.write_event(event)?,
        }
    }

    Ok((writer.into_inner(), rewritten))
}
