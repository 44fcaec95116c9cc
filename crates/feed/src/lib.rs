// ABOUTME: Streaming RSS 2.0 / Atom / Media-RSS feed parsing library.
// ABOUTME: Builds an immutable Feed graph from XML events, with RFC 822 and ISO 8601 date parsing.

pub mod attributes;
pub mod error;
pub mod handler;
pub mod models;
pub mod options;
pub mod parser;
pub mod time_parse;

pub use attributes::Attributes;
pub use error::FeedError;
pub use handler::{Behavior, Element, FeedHandler, Scope};
pub use models::{
    Enclosure, Feed, Item, MediaContent, MediaGroup, MediaPlayer, MediaThumbnail, UNSPECIFIED,
    UNSPECIFIED_RATE,
};
pub use options::{FeedParserBuilder, ParserOptions};
pub use parser::{parse_feed_bytes, parse_feed_reader, parse_feed_str, FeedParser};
pub use time_parse::{parse_iso8601, parse_rfc822};
