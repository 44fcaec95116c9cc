// ABOUTME: Feed parsing entry points: drives FeedHandler from quick-xml reader events.
// ABOUTME: The XML tokenizer is the only source of errors; feed data problems are absorbed.

use std::io::BufRead;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::attributes::Attributes;
use crate::error::FeedError;
use crate::handler::FeedHandler;
use crate::models::Feed;
use crate::options::{FeedParserBuilder, ParserOptions};

/// Parses RSS 2.0, Atom or Media-RSS bytes with default options.
///
/// # Returns
/// * `Ok(Feed)` - The parsed feed; a feed with no items is still a feed
/// * `Err(FeedError)` - The XML itself was malformed
pub fn parse_feed_bytes(data: &[u8]) -> Result<Feed, FeedError> {
    FeedParser::default().parse(data)
}

/// Parses a feed held in a string with default options.
pub fn parse_feed_str(xml: &str) -> Result<Feed, FeedError> {
    parse_feed_bytes(xml.as_bytes())
}

/// Parses a feed from any buffered reader with default options.
pub fn parse_feed_reader<R: BufRead>(reader: R) -> Result<Feed, FeedError> {
    FeedParser::default().parse_reader(reader)
}

/// A configured feed parser. Cheap to clone; holds no per-document state.
#[derive(Debug, Clone, Default)]
pub struct FeedParser {
    opts: ParserOptions,
}

impl FeedParser {
    pub fn new(opts: ParserOptions) -> Self {
        Self { opts }
    }

    pub fn builder() -> FeedParserBuilder {
        FeedParserBuilder::new()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.opts
    }

    pub fn parse(&self, data: &[u8]) -> Result<Feed, FeedError> {
        self.parse_reader(data)
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Feed, FeedError> {
        let mut handler = FeedHandler::new().trim_text(self.opts.trim_text);
        self.drive(reader, &mut handler)?;
        let feed = handler.into_feed();
        tracing::debug!(
            items = feed.items().len(),
            title = feed.title(),
            "parsed feed"
        );
        Ok(feed)
    }

    /// Feeds every event of `reader` into `handler`.
    ///
    /// On error the handler keeps everything built up to the failure, which
    /// callers may still inspect through [`FeedHandler::feed`].
    pub fn drive<R: BufRead>(&self, reader: R, handler: &mut FeedHandler) -> Result<(), FeedError> {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().check_end_names = self.opts.check_end_names;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = qualified_name(e);
                    handler.on_start_element(&name, &read_attributes(e));
                }
                Ok(Event::Empty(ref e)) => {
                    let name = qualified_name(e);
                    handler.on_start_element(&name, &read_attributes(e));
                    handler.on_end_element(&name);
                }
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    handler.on_end_element(&name);
                }
                Ok(Event::Text(ref e)) => match e.decode() {
                    Ok(text) => handler.on_text(&text),
                    Err(err) => return Err(FeedError::parse_at(reader.buffer_position(), err)),
                },
                Ok(Event::CData(ref e)) => {
                    handler.on_text(&String::from_utf8_lossy(e));
                }
                Ok(Event::GeneralRef(ref e)) => {
                    let name = e.decode().map(|s| s.into_owned()).unwrap_or_default();
                    handler.on_text(&resolve_reference(&name));
                }
                Ok(Event::Eof) => break,
                Err(quick_xml::Error::Io(err)) => {
                    return Err(FeedError::Io(std::io::Error::new(err.kind(), err.to_string())));
                }
                Err(err) => return Err(FeedError::parse_at(reader.error_position(), err)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Collects attributes with entity references resolved.
/// Malformed attributes are skipped; undecodable escapes keep their raw text.
fn read_attributes(e: &BytesStart) -> Attributes {
    e.attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = match unescape(&raw) {
                Ok(value) => value.into_owned(),
                Err(_) => raw.into_owned(),
            };
            (key, value)
        })
        .collect()
}

/// Resolves `&name;` to its text. Unknown entities are passed through unchanged.
fn resolve_reference(name: &str) -> String {
    let reference = format!("&{name};");
    match unescape(&reference) {
        Ok(text) => text.into_owned(),
        Err(_) => reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp"), "&");
        assert_eq!(resolve_reference("lt"), "<");
        assert_eq!(resolve_reference("#233"), "é");
        assert_eq!(resolve_reference("#x2014"), "\u{2014}");
        assert_eq!(resolve_reference("nbsp"), "&nbsp;");
    }

    #[test]
    fn test_read_attributes_unescapes_values() {
        let xml = r#"<enclosure url="http://x/a.mp3?a=1&amp;b=2" length="100" bad="&bogus;"/>"#;
        let mut reader = Reader::from_str(xml);
        let event = reader.read_event().unwrap();
        let Event::Empty(ref e) = event else {
            panic!("expected empty element, got {event:?}");
        };

        let attrs = read_attributes(e);
        assert_eq!(attrs.get("url"), Some("http://x/a.mp3?a=1&b=2"));
        assert_eq!(attrs.get("length"), Some("100"));
        assert_eq!(attrs.get("bad"), Some("&bogus;"));
    }

    #[test]
    fn test_entities_split_text_is_rejoined() {
        let xml = "<rss><channel><title>Tom &amp; Jerry &#8211; Show</title></channel></rss>";
        let feed = parse_feed_str(xml).unwrap();
        assert_eq!(feed.title(), Some("Tom & Jerry \u{2013} Show"));
    }

    #[test]
    fn test_cdata_is_text() {
        let xml = "<rss><channel><description><![CDATA[<p>Hi</p>]]></description></channel></rss>";
        let feed = parse_feed_str(xml).unwrap();
        assert_eq!(feed.description(), Some("<p>Hi</p>"));
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        let xml = "<rss><channel><title>x</channel></rss>";
        let err = parse_feed_str(xml).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_drive_keeps_partial_feed_on_error() {
        let xml = "<rss><channel><title>Kept</title><item><title>a</title></item><item></channel>";
        let parser = FeedParser::default();
        let mut handler = FeedHandler::new();
        assert!(parser.drive(xml.as_bytes(), &mut handler).is_err());
        assert_eq!(handler.feed().title(), Some("Kept"));
        assert_eq!(handler.feed().items().len(), 1);
    }
}
