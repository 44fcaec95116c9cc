// ABOUTME: Push-based feed builder driven by XML start, end and text events.
// ABOUTME: Routes each recognised element by name and attaches data to the innermost open scope.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::attributes::Attributes;
use crate::models::{
    Enclosure, Feed, Item, MediaContent, MediaGroup, MediaPlayer, MediaThumbnail, UNSPECIFIED,
    UNSPECIFIED_RATE,
};
use crate::time_parse::{parse_iso8601, parse_rfc822};

/// Elements the handler reacts to. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Item,
    PubDate,
    Published,
    LastBuildDate,
    Updated,
    Ttl,
    Title,
    Category,
    Enclosure,
    Description,
    ContentEncoded,
    Link,
    MediaThumbnail,
    MediaGroup,
    MediaContent,
    MediaPlayer,
    MediaDescription,
}

/// Which events an element cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Start and end tags only; data comes from attributes or child scope.
    Tags,
    /// Text content only, delivered when the element closes.
    Content,
    /// Both: attributes at the start tag, then text at the end tag.
    Both,
}

impl Behavior {
    pub fn handles_tags(self) -> bool {
        matches!(self, Behavior::Tags | Behavior::Both)
    }

    pub fn handles_content(self) -> bool {
        matches!(self, Behavior::Content | Behavior::Both)
    }
}

static ELEMENTS: Lazy<HashMap<&'static str, Element>> = Lazy::new(|| {
    HashMap::from([
        ("item", Element::Item),
        ("entry", Element::Item),
        ("pubDate", Element::PubDate),
        ("published", Element::Published),
        ("lastBuildDate", Element::LastBuildDate),
        ("updated", Element::Updated),
        ("ttl", Element::Ttl),
        ("title", Element::Title),
        ("category", Element::Category),
        ("enclosure", Element::Enclosure),
        ("description", Element::Description),
        ("content:encoded", Element::ContentEncoded),
        ("link", Element::Link),
        ("media:thumbnail", Element::MediaThumbnail),
        ("media:group", Element::MediaGroup),
        ("media:content", Element::MediaContent),
        ("media:player", Element::MediaPlayer),
        ("media:description", Element::MediaDescription),
    ])
});

impl Element {
    /// Looks up an element by qualified name (`media:content`, `item`, ...).
    pub fn lookup(qname: &str) -> Option<Element> {
        ELEMENTS.get(qname).copied()
    }

    pub fn behavior(self) -> Behavior {
        match self {
            Element::Item
            | Element::Enclosure
            | Element::MediaThumbnail
            | Element::MediaGroup
            | Element::MediaContent
            | Element::MediaPlayer => Behavior::Tags,
            Element::Link => Behavior::Both,
            Element::PubDate
            | Element::Published
            | Element::LastBuildDate
            | Element::Updated
            | Element::Ttl
            | Element::Title
            | Element::Category
            | Element::Description
            | Element::ContentEncoded
            | Element::MediaDescription => Behavior::Content,
        }
    }
}

/// The currently open item, media group and media content.
///
/// Each slot holds at most one entity; nothing nests inside itself.
#[derive(Debug, Default)]
pub struct Scope {
    item: Option<Item>,
    group: Option<MediaGroup>,
    content: Option<MediaContent>,
}

impl Scope {
    pub fn in_item(&self) -> bool {
        self.item.is_some()
    }

    pub fn in_media_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn in_media_content(&self) -> bool {
        self.content.is_some()
    }
}

/// Character data of the open content element.
#[derive(Debug)]
struct TextBuffer {
    element: Element,
    text: String,
    /// Tag elements opened since the buffer started and not yet closed.
    nested: usize,
}

impl TextBuffer {
    fn new(element: Element) -> Self {
        Self {
            element,
            text: String::new(),
            nested: 0,
        }
    }
}

/// Builds a [`Feed`] from a stream of XML events delivered in document order.
///
/// The handler never fails: unknown elements are skipped, malformed values
/// become defaults and unparsable dates become `None`. Dropping the handler
/// mid-document is fine; [`FeedHandler::feed`] is consistent after every event.
#[derive(Debug, Default)]
pub struct FeedHandler {
    feed: Feed,
    scope: Scope,
    /// Text collected for the content element that is currently open.
    buffer: Option<TextBuffer>,
    trim_text: bool,
}

impl FeedHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim whitespace around element text before it is routed.
    pub fn trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }

    pub fn on_start_element(&mut self, qname: &str, attributes: &Attributes) {
        let Some(element) = Element::lookup(qname) else {
            tracing::trace!(element = qname, "ignoring unrecognised element");
            return;
        };

        let behavior = element.behavior();
        if behavior.handles_tags() {
            if let Some(buffer) = self.buffer.as_mut() {
                buffer.nested += 1;
            }
            start(element, attributes, &mut self.scope, &mut self.feed);
        }
        if behavior.handles_content() {
            self.buffer = Some(TextBuffer::new(element));
        }
    }

    /// Appends a chunk of character data. Chunks of one element are concatenated.
    pub fn on_text(&mut self, text: &str) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.text.push_str(text);
        }
    }

    pub fn on_end_element(&mut self, qname: &str) {
        let Some(element) = Element::lookup(qname) else {
            return;
        };

        if matches!(&self.buffer, Some(open) if open.element == element) {
            if let Some(TextBuffer { mut text, .. }) = self.buffer.take() {
                if self.trim_text {
                    text = text.trim().to_string();
                }
                content(element, text, &mut self.scope, &mut self.feed);
            }
        }
        if element.behavior().handles_tags() {
            // A content element left open inside this one never gets its end tag.
            if let Some(buffer) = self.buffer.as_mut() {
                if buffer.nested > 0 {
                    buffer.nested -= 1;
                } else {
                    self.buffer = None;
                }
            }
            end(element, &mut self.scope, &mut self.feed);
        }
    }

    /// The feed as built so far. Items still open are not included.
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn into_feed(self) -> Feed {
        self.feed
    }
}

fn start(element: Element, attrs: &Attributes, scope: &mut Scope, feed: &mut Feed) {
    match element {
        Element::Item => {
            if scope.item.is_some() {
                tracing::debug!("item opened before the previous one closed; discarding it");
            }
            *scope = Scope {
                item: Some(Item::default()),
                ..Scope::default()
            };
        }
        Element::Enclosure => {
            let Some(item) = scope.item.as_mut() else {
                return;
            };
            match read_enclosure(attrs) {
                Some(enclosure) => item.set_enclosure(enclosure),
                None => tracing::debug!(
                    url = attrs.get("url"),
                    length = attrs.get("length"),
                    mime_type = attrs.get("type"),
                    "dropping enclosure with missing or malformed attributes"
                ),
            }
        }
        Element::Link => {
            if let Some(href) = attrs.string("href") {
                set_link(scope, feed, href);
            }
        }
        Element::MediaThumbnail => {
            let Some(url) = attrs.string("url") else {
                tracing::debug!("dropping media:thumbnail without url");
                return;
            };
            let thumbnail = MediaThumbnail::new(
                url,
                attrs.parse_or("height", UNSPECIFIED),
                attrs.parse_or("width", UNSPECIFIED),
                attrs.string("time"),
            );
            if let Some(content) = scope.content.as_mut() {
                content.add_thumbnail(thumbnail);
            } else if let Some(group) = scope.group.as_mut() {
                group.add_thumbnail(thumbnail);
            } else if let Some(item) = scope.item.as_mut() {
                item.add_thumbnail(thumbnail);
            } else {
                feed.add_thumbnail(thumbnail);
            }
        }
        Element::MediaGroup => {
            if scope.item.is_some() {
                scope.group = Some(MediaGroup::default());
            }
        }
        Element::MediaContent => {
            if scope.item.is_some() {
                scope.content = Some(read_media_content(attrs));
            }
        }
        Element::MediaPlayer => {
            let Some(content) = scope.content.as_mut() else {
                return;
            };
            match attrs.string("url") {
                Some(url) => content.set_player(MediaPlayer::new(
                    url,
                    attrs.parse_or("width", UNSPECIFIED),
                    attrs.parse_or("height", UNSPECIFIED),
                )),
                None => tracing::debug!("dropping media:player without url"),
            }
        }
        _ => {}
    }
}

fn end(element: Element, scope: &mut Scope, feed: &mut Feed) {
    match element {
        Element::Item => {
            scope.group = None;
            scope.content = None;
            if let Some(item) = scope.item.take() {
                feed.add_item(item);
            }
        }
        Element::MediaGroup => {
            let group = scope.group.take();
            if let (Some(group), Some(item)) = (group, scope.item.as_mut()) {
                item.add_media_group(group);
            }
        }
        Element::MediaContent => {
            let content = scope.content.take();
            let (Some(content), Some(item)) = (content, scope.item.as_mut()) else {
                return;
            };
            match scope.group.as_mut() {
                Some(group) => group.add_content(content),
                None => item.add_media_content(content),
            }
        }
        _ => {}
    }
}

fn content(element: Element, text: String, scope: &mut Scope, feed: &mut Feed) {
    match element {
        Element::PubDate | Element::Published => {
            let date = parse_date(element, &text);
            match scope.item.as_mut() {
                Some(item) => item.set_pub_date(date),
                None => feed.set_pub_date(date),
            }
        }
        Element::LastBuildDate | Element::Updated => {
            if scope.item.is_none() {
                feed.set_last_build_date(parse_date(element, &text));
            }
        }
        Element::Ttl => {
            if scope.item.is_none() {
                feed.set_ttl(text.trim().parse().ok());
            }
        }
        Element::Title => match scope.item.as_mut() {
            Some(item) => item.set_title(text),
            None => feed.set_title(text),
        },
        Element::Category => match scope.item.as_mut() {
            Some(item) => item.add_category(text),
            None => feed.add_category(text),
        },
        Element::Description => match scope.item.as_mut() {
            Some(item) => item.set_description(text),
            None => feed.set_description(text),
        },
        Element::ContentEncoded => {
            if let Some(item) = scope.item.as_mut() {
                item.set_content(text);
            }
        }
        Element::Link => {
            let link = text.trim();
            if !link.is_empty() {
                set_link(scope, feed, link.to_string());
            }
        }
        Element::MediaDescription => {
            if let Some(content) = scope.content.as_mut() {
                content.set_description(text);
            } else if let Some(group) = scope.group.as_mut() {
                group.set_description(text);
            } else if let Some(item) = scope.item.as_mut() {
                item.set_description(text);
            }
        }
        _ => {}
    }
}

fn set_link(scope: &mut Scope, feed: &mut Feed, link: String) {
    match scope.item.as_mut() {
        Some(item) => item.set_link(link),
        None => feed.set_link(link),
    }
}

/// RSS elements carry RFC 822 dates, Atom elements ISO 8601.
fn parse_date(element: Element, text: &str) -> Option<DateTime<Utc>> {
    let parsed = match element {
        Element::Published | Element::Updated => parse_iso8601(text),
        _ => parse_rfc822(text),
    };
    if parsed.is_none() {
        tracing::debug!(?element, value = text.trim(), "unparsable date");
    }
    parsed
}

fn read_enclosure(attrs: &Attributes) -> Option<Enclosure> {
    let url = attrs.string("url")?;
    let length = attrs.parse::<u64>("length")?;
    let mime_type = attrs.string("type")?;
    Some(Enclosure::new(url, length, mime_type))
}

fn read_media_content(attrs: &Attributes) -> MediaContent {
    MediaContent {
        url: attrs.string("url"),
        file_size: attrs.parse_or("fileSize", i64::from(UNSPECIFIED)),
        mime_type: attrs.string("type"),
        medium: attrs.string("medium"),
        is_default: attrs.boolean("isDefault", false),
        expression: attrs.string("expression"),
        bitrate: attrs.parse_or("bitrate", UNSPECIFIED_RATE),
        framerate: attrs.parse_or("framerate", UNSPECIFIED_RATE),
        sampling_rate: attrs.parse_or("samplingrate", UNSPECIFIED_RATE),
        channels: attrs.parse_or("channels", UNSPECIFIED),
        duration: attrs.parse_or("duration", UNSPECIFIED),
        height: attrs.parse_or("height", UNSPECIFIED),
        width: attrs.parse_or("width", UNSPECIFIED),
        language: attrs.string("lang"),
        ..MediaContent::default()
    }
}
