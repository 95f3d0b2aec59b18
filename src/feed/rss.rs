//! RSS 2.0 document writer.
//!
//! The document is built in memory: [`RssWriter::header`], one
//! [`RssWriter::entry`] per item, then [`RssWriter::footer`]. Text and
//! attribute values are escaped by the XML writer.
use crate::config::ChannelConfig;
use crate::feed::entry::FeedEntry;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Writer;
use std::io::Result;

const RSS: &str = "rss";
const CHANNEL: &str = "channel";
const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Per-item values that do not come from the worksheet.
#[derive(Clone, Debug)]
pub struct ItemStyle<'a> {
    pub author: &'a str,
    pub category: &'a str,
    pub media_type: &'a str,
    /// Written when the enclosure length is unknown
    pub default_length: u64,
}

pub struct RssWriter {
    writer: Writer<Vec<u8>>,
}

impl RssWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    /// Writes the declaration, opens `rss` and `channel` and writes the channel metadata.
    pub fn header(&mut self, channel: &ChannelConfig) -> Result<()> {
        self.writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        self.writer.write_event(Event::Start(
            BytesStart::new(RSS).with_attributes([("version", "2.0"), ("xmlns:atom", ATOM_NAMESPACE)]),
        ))?;
        self.writer.write_event(Event::Start(BytesStart::new(CHANNEL)))?;
        self.text("title", &channel.title)?;
        self.text("link", &channel.link)?;
        self.text("description", &channel.description)?;
        self.text("language", &channel.language)?;
        self.text("copyright", &channel.copyright)?;
        self.text("managingEditor", &channel.managing_editor)?;
        self.text("webMaster", &channel.web_master)?;
        self.text("category", &channel.category)?;
        self.text("ttl", &channel.ttl.to_string())?;
        if let Some(image) = &channel.image {
            self.writer.write_event(Event::Start(BytesStart::new("image")))?;
            self.text("url", &image.url)?;
            self.text("title", &image.title)?;
            self.text("link", &image.link)?;
            self.writer.write_event(Event::End(BytesEnd::new("image")))?;
        }
        if let Some(href) = &channel.self_link {
            self.writer
                .create_element("atom:link")
                .with_attributes([
                    ("href", href.as_str()),
                    ("rel", "self"),
                    ("type", "application/rss+xml"),
                ])
                .write_empty()?;
        }
        Ok(())
    }

    /// Writes one `item`; the enclosure URL doubles as the `guid`.
    pub fn entry(&mut self, entry: &FeedEntry, pub_date: &str, style: &ItemStyle) -> Result<()> {
        let length = entry.enclosure_length.unwrap_or(style.default_length).to_string();
        self.writer.write_event(Event::Start(BytesStart::new("item")))?;
        self.text("title", &entry.title)?;
        self.text("description", &entry.description)?;
        self.text("author", style.author)?;
        self.text("category", style.category)?;
        self.text("guid", &entry.enclosure_url)?;
        self.text("pubDate", pub_date)?;
        self.writer
            .create_element("enclosure")
            .with_attributes([
                ("url", entry.enclosure_url.as_str()),
                ("length", length.as_str()),
                ("type", style.media_type),
            ])
            .write_empty()?;
        self.writer.write_event(Event::End(BytesEnd::new("item")))?;
        Ok(())
    }

    /// Closes `channel` and `rss`.
    pub fn footer(&mut self) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(CHANNEL)))?;
        self.writer.write_event(Event::End(BytesEnd::new(RSS)))?;
        Ok(())
    }

    /// Returns the document bytes, newline terminated.
    pub fn finish(self) -> Vec<u8> {
        let mut document = self.writer.into_inner();
        document.push(b'\n');
        document
    }

    fn text(&mut self, name: &str, value: &str) -> Result<()> {
        self.writer
            .create_element(name)
            .write_text_content(BytesText::new(value))?;
        Ok(())
    }
}

impl Default for RssWriter {
    fn default() -> Self {
        Self::new()
    }
}
