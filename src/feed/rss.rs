//! RSS 2.0 serialization
//!
//! Writes a [`FeedDocument`] as an RSS 2.0 channel. Text content and
//! attribute values are escaped by the XML writer; output is deterministic
//! for a given document.

use crate::feed::builder::{FeedDocument, ENCLOSURE_LENGTH, ENCLOSURE_TYPE};
use crate::FeedError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Serializes a feed document to an RSS 2.0 XML string
pub fn write_rss(doc: &FeedDocument) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;

    writer.write_event(Event::Start(BytesStart::new("channel")))?;
    text_element(&mut writer, "title", &doc.title)?;
    text_element(&mut writer, "link", &doc.link)?;
    text_element(&mut writer, "description", &doc.description)?;
    text_element(&mut writer, "lastBuildDate", &doc.built_at.to_rfc2822())?;

    for entry in &doc.entries {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &entry.title)?;
        text_element(&mut writer, "link", &entry.link)?;
        text_element(&mut writer, "description", &entry.description)?;

        let mut enclosure = BytesStart::new("enclosure");
        enclosure.push_attribute(("url", entry.enclosure_url.as_str()));
        enclosure.push_attribute(("length", ENCLOSURE_LENGTH));
        enclosure.push_attribute(("type", ENCLOSURE_TYPE));
        writer.write_event(Event::Empty(enclosure))?;

        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
