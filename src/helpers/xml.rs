//! XML writing utilities for the Office Open XML package parts.
//! Provides a thin wrapper over the quick-xml writer with element helpers.

use crate::error::DataCleanerError;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;

/// XML writer wrapper for spreadsheet package parts
pub(crate) struct XmlWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    pub(crate) fn new(inner: W) -> XmlWriter<W> {
        XmlWriter {
            writer: Writer::new(inner),
        }
    }

    /// Writes the standalone UTF-8 declaration expected at the top of every part
    pub(crate) fn declaration(&mut self) -> Result<(), DataCleanerError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(())
    }

    /// Opens an element with the given attributes
    pub(crate) fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), DataCleanerError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    /// Closes an element
    pub(crate) fn end(&mut self, tag: &str) -> Result<(), DataCleanerError> {
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Writes a self-closing element
    pub(crate) fn empty(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), DataCleanerError> {
        let element = BytesStart::new(tag).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Writes escaped text content
    pub(crate) fn text(&mut self, content: &str) -> Result<(), DataCleanerError> {
        let content = escape_control_chars(content);
        self.writer.write_event(Event::Text(BytesText::new(&content)))?;
        Ok(())
    }

    /// Writes `<tag ...>text</tag>`
    pub(crate) fn element(&mut self, tag: &str, attributes: &[(&str, &str)], content: &str) -> Result<(), DataCleanerError> {
        self.start(tag, attributes)?;
        self.text(content)?;
        self.end(tag)
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Replaces characters XML 1.0 cannot carry with Excel's `_xHHHH_` escapes.
fn escape_control_chars(content: &str) -> Cow<'_, str> {
    let is_invalid = |character: char| character < ' ' && !matches!(character, '\t' | '\n' | '\r');
    if !content.chars().any(is_invalid) {
        return Cow::Borrowed(content);
    }
    let mut escaped = String::with_capacity(content.len() + 8);
    for character in content.chars() {
        if is_invalid(character) {
            escaped.push_str(&format!("_x{:04X}_", character as u32));
        } else {
            escaped.push(character);
        }
    }
    Cow::Owned(escaped)
}
