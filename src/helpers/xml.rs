//! Streaming access to the XML parts of a workbook.
//!
//! Workbook parts are read event by event with [`match_xml_events!`]; the
//! traits here cover what the readers need from those events: attribute
//! values by qualified name, and cell text assembled from text runs and
//! entity references.

use crate::error::SheetError;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::BytesRef;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Unknown entity '&{0};'")]
    UnknownEntity(String),

    #[error("Attribute {name}=\"{value}\" has an unexpected value")]
    UnexpectedAttributeValue { name: String, value: String },
}

/// Event reader over one workbook part.
///
/// Empty elements are reported as a start and an end event, so `<c r="A1"/>`
/// and `<c r="A1"></c>` read the same.
pub(crate) struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
}

impl<R: BufRead> XmlReader<R> {
    pub(crate) fn new(source: R) -> XmlReader<R> {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.check_comments = false;
        config.check_end_names = false;
        config.expand_empty_elements = true;
        config.trim_text(false);

        XmlReader {
            reader,
            buffer: Vec::with_capacity(1024),
        }
    }

    /// The next event, `None` once the part is exhausted.
    pub(crate) fn next_event(&'_ mut self) -> Result<Option<Event<'_>>, SheetError> {
        self.buffer.clear();
        match self.reader.read_event_into(&mut self.buffer)? {
            Event::Eof => Ok(None),
            event => Ok(Some(event)),
        }
    }
}

/// Attribute lookup on a start tag, by qualified name such as `"r"` or
/// `"table:name"`.
pub(crate) trait TagAttributes<'a> {
    /// The unescaped attribute value, `None` when the tag lacks it.
    fn attr_text(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetError>;

    /// The attribute value parsed as `T`; an unparsable value is an error.
    fn attr_parsed<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SheetError>;
}

impl<'a> TagAttributes<'a> for BytesStart<'a> {
    fn attr_text(&'a self, name: &str) -> Result<Option<Cow<'a, str>>, SheetError> {
        match self.try_get_attribute(name)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?)),
            None => Ok(None),
        }
    }

    fn attr_parsed<T: FromStr>(&'a self, name: &str) -> Result<Option<T>, SheetError> {
        let Some(value) = self.attr_text(name)? else {
            return Ok(None);
        };
        match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(XmlError::UnexpectedAttributeValue {
                name: name.to_owned(),
                value: value.into_owned(),
            })?,
        }
    }
}

/// Accumulates the text of a cell across text runs and references.
pub(crate) trait CellText {
    fn push_text(&mut self, text: &BytesText) -> Result<(), SheetError>;

    /// Resolves `&amp;`-style entities and `&#65;`/`&#x41;` character references.
    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), SheetError>;
}

impl CellText for String {
    fn push_text(&mut self, text: &BytesText) -> Result<(), SheetError> {
        self.push_str(&text.xml_content()?);
        Ok(())
    }

    fn push_reference(&mut self, reference: &BytesRef) -> Result<(), SheetError> {
        let raw = reference.xml_content()?;
        let character = match raw.strip_prefix('#') {
            Some(hex) if hex.starts_with(['x', 'X']) => Some(u32::from_str_radix(&hex[1..], 16)?),
            Some(decimal) => Some(decimal.parse::<u32>()?),
            None => None,
        };
        match character {
            Some(code) => self.extend(char::from_u32(code)),
            None => self.push_str(resolve_xml_entity(&raw).ok_or_else(|| XmlError::UnknownEntity(raw.to_string()))?),
        }
        Ok(())
    }
}

/// Loops over the events of an [`XmlReader`], ignoring events no arm matches.
#[macro_export]
macro_rules! match_xml_events {
    ($reader:expr => { $($arms:tt)* }) => {
        while let Some(event) = $reader.next_event()? {
            match event {
                Event::Eof => break,
                $($arms)*
                _ => (),
            }
        }
    };
}
