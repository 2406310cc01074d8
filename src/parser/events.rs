/*!
 * Markup event source.
 *
 * Turns ITT text into the flat, ordered stream of start / end / text events
 * the state machine consumes. Names are reduced to their local part
 * (`tts:color` becomes `color`), self-closing elements produce a start and an
 * end event, entity references are resolved in text, and CDATA is delivered
 * as text. Comments, processing instructions and declarations are skipped.
 */

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::errors::ParseError;

/// Attribute with its local name and unescaped value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One step of the markup stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    Start {
        name: String,
        attributes: Vec<Attribute>,
    },
    End {
        name: String,
    },
    /// Character data with entities already resolved
    Text(String),
}

impl ParseEvent {
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        ParseEvent::Start {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(key, value)| Attribute::new(*key, *value))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        ParseEvent::End {
            name: name.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        ParseEvent::Text(text.to_string())
    }
}

/// Look up the first attribute called `name`
pub fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name == name)
        .map(|attr| attr.value.as_str())
}

/// Streaming iterator of [`ParseEvent`]s over a borrowed source
pub struct EventSource<'a> {
    reader: Reader<&'a [u8]>,
    pending_end: Option<String>,
    open: Vec<String>,
    finished: bool,
}

impl<'a> EventSource<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            reader: Reader::from_str(source),
            pending_end: None,
            open: Vec::new(),
            finished: false,
        }
    }

    fn next_event(&mut self) -> Result<Option<ParseEvent>, ParseError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(ParseEvent::End { name }));
        }

        loop {
            match self.reader.read_event()? {
                Event::Start(element) => {
                    let (name, attributes) = read_start(&element)?;
                    self.open.push(name.clone());
                    return Ok(Some(ParseEvent::Start { name, attributes }));
                }
                Event::Empty(element) => {
                    let (name, attributes) = read_start(&element)?;
                    self.pending_end = Some(name.clone());
                    return Ok(Some(ParseEvent::Start { name, attributes }));
                }
                Event::End(element) => {
                    self.open.pop();
                    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                    return Ok(Some(ParseEvent::End { name }));
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    if text.is_empty() {
                        continue;
                    }
                    return Ok(Some(ParseEvent::Text(text.into_owned())));
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    return Ok(Some(ParseEvent::Text(text)));
                }
                Event::Eof => {
                    if let Some(element) = self.open.pop() {
                        return Err(ParseError::Truncated { element });
                    }
                    return Ok(None);
                }
                // comments, declarations, processing instructions, doctype
                _ => {}
            }
        }
    }
}

impl Iterator for EventSource<'_> {
    type Item = Result<ParseEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

// Namespace declarations are not attributes of the element itself
fn read_start(element: &BytesStart<'_>) -> Result<(String, Vec<Attribute>), ParseError> {
    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push(Attribute::new(key, value));
    }
    Ok((name, attributes))
}
