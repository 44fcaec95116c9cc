// ABOUTME: Feed object graph produced by the parsing engine (RSS, Atom and Media-RSS).
// ABOUTME: Read-only to callers; mutators are crate-private and driven by the handler.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value stored in numeric media fields whose attribute was absent or malformed.
pub const UNSPECIFIED: i32 = -1;

/// Float counterpart of [`UNSPECIFIED`] for rate attributes.
pub const UNSPECIFIED_RATE: f32 = -1.0;

/// A parsed feed: channel metadata plus its items in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    pub_date: Option<DateTime<Utc>>,
    last_build_date: Option<DateTime<Utc>>,
    ttl: Option<u32>,
    categories: Vec<String>,
    thumbnails: Vec<MediaThumbnail>,
    items: Vec<Item>,
}

impl Feed {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn pub_date(&self) -> Option<DateTime<Utc>> {
        self.pub_date
    }

    /// RSS `lastBuildDate` or Atom `updated` at channel level.
    pub fn last_build_date(&self) -> Option<DateTime<Utc>> {
        self.last_build_date
    }

    /// Time to live in minutes.
    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn thumbnails(&self) -> &[MediaThumbnail] {
        &self.thumbnails
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }

    pub(crate) fn set_link(&mut self, link: String) {
        self.link = Some(link);
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn set_pub_date(&mut self, date: Option<DateTime<Utc>>) {
        self.pub_date = date;
    }

    pub(crate) fn set_last_build_date(&mut self, date: Option<DateTime<Utc>>) {
        self.last_build_date = date;
    }

    pub(crate) fn set_ttl(&mut self, ttl: Option<u32>) {
        self.ttl = ttl;
    }

    pub(crate) fn add_category(&mut self, category: String) {
        self.categories.push(category);
    }

    pub(crate) fn add_thumbnail(&mut self, thumbnail: MediaThumbnail) {
        self.thumbnails.push(thumbnail);
    }

    pub(crate) fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }
}

/// A single RSS `item` or Atom `entry`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    pub_date: Option<DateTime<Utc>>,
    content: Option<String>,
    enclosure: Option<Enclosure>,
    categories: Vec<String>,
    thumbnails: Vec<MediaThumbnail>,
    media_groups: Vec<MediaGroup>,
    media_contents: Vec<MediaContent>,
}

impl Item {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn pub_date(&self) -> Option<DateTime<Utc>> {
        self.pub_date
    }

    /// Long-form body from `content:encoded`.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn enclosure(&self) -> Option<&Enclosure> {
        self.enclosure.as_ref()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn thumbnails(&self) -> &[MediaThumbnail] {
        &self.thumbnails
    }

    pub fn media_groups(&self) -> &[MediaGroup] {
        &self.media_groups
    }

    /// Media content declared directly under the item, outside any group.
    pub fn media_contents(&self) -> &[MediaContent] {
        &self.media_contents
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }

    pub(crate) fn set_link(&mut self, link: String) {
        self.link = Some(link);
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn set_pub_date(&mut self, date: Option<DateTime<Utc>>) {
        self.pub_date = date;
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }

    pub(crate) fn set_enclosure(&mut self, enclosure: Enclosure) {
        self.enclosure = Some(enclosure);
    }

    pub(crate) fn add_category(&mut self, category: String) {
        self.categories.push(category);
    }

    pub(crate) fn add_thumbnail(&mut self, thumbnail: MediaThumbnail) {
        self.thumbnails.push(thumbnail);
    }

    pub(crate) fn add_media_group(&mut self, group: MediaGroup) {
        self.media_groups.push(group);
    }

    pub(crate) fn add_media_content(&mut self, content: MediaContent) {
        self.media_contents.push(content);
    }
}

/// An attached binary resource. Only built when url, length and type are all valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    url: String,
    length: u64,
    mime_type: String,
}

impl Enclosure {
    pub(crate) fn new(url: String, length: u64, mime_type: String) -> Self {
        Self {
            url,
            length,
            mime_type,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Size in bytes as declared by the feed.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// `media:group`: alternative renditions of the same piece of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaGroup {
    description: Option<String>,
    contents: Vec<MediaContent>,
    thumbnails: Vec<MediaThumbnail>,
}

impl MediaGroup {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn contents(&self) -> &[MediaContent] {
        &self.contents
    }

    pub fn thumbnails(&self) -> &[MediaThumbnail] {
        &self.thumbnails
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn add_content(&mut self, content: MediaContent) {
        self.contents.push(content);
    }

    pub(crate) fn add_thumbnail(&mut self, thumbnail: MediaThumbnail) {
        self.thumbnails.push(thumbnail);
    }
}

/// `media:content`: one concrete rendition.
///
/// Numeric fields hold [`UNSPECIFIED`] (or [`UNSPECIFIED_RATE`]) when the
/// attribute was missing or could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaContent {
    pub(crate) url: Option<String>,
    pub(crate) file_size: i64,
    pub(crate) mime_type: Option<String>,
    pub(crate) medium: Option<String>,
    pub(crate) is_default: bool,
    pub(crate) expression: Option<String>,
    pub(crate) bitrate: f32,
    pub(crate) framerate: f32,
    pub(crate) sampling_rate: f32,
    pub(crate) channels: i32,
    pub(crate) duration: i32,
    pub(crate) height: i32,
    pub(crate) width: i32,
    pub(crate) language: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) player: Option<MediaPlayer>,
    pub(crate) thumbnails: Vec<MediaThumbnail>,
}

impl Default for MediaContent {
    fn default() -> Self {
        Self {
            url: None,
            file_size: i64::from(UNSPECIFIED),
            mime_type: None,
            medium: None,
            is_default: false,
            expression: None,
            bitrate: UNSPECIFIED_RATE,
            framerate: UNSPECIFIED_RATE,
            sampling_rate: UNSPECIFIED_RATE,
            channels: UNSPECIFIED,
            duration: UNSPECIFIED,
            height: UNSPECIFIED,
            width: UNSPECIFIED,
            language: None,
            description: None,
            player: None,
            thumbnails: Vec::new(),
        }
    }
}

impl MediaContent {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Size in bytes (`fileSize`).
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// One of image, audio, video, document or executable, as declared.
    pub fn medium(&self) -> Option<&str> {
        self.medium.as_deref()
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// One of sample, full or nonstop, as declared.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Kilobits per second.
    pub fn bitrate(&self) -> f32 {
        self.bitrate
    }

    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    /// Kilosamples per second.
    pub fn sampling_rate(&self) -> f32 {
        self.sampling_rate
    }

    pub fn channels(&self) -> i32 {
        self.channels
    }

    /// Seconds.
    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn player(&self) -> Option<&MediaPlayer> {
        self.player.as_ref()
    }

    pub fn thumbnails(&self) -> &[MediaThumbnail] {
        &self.thumbnails
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub(crate) fn set_player(&mut self, player: MediaPlayer) {
        self.player = Some(player);
    }

    pub(crate) fn add_thumbnail(&mut self, thumbnail: MediaThumbnail) {
        self.thumbnails.push(thumbnail);
    }
}

/// `media:player`: a web player for the enclosing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPlayer {
    url: String,
    width: i32,
    height: i32,
}

impl MediaPlayer {
    pub(crate) fn new(url: String, width: i32, height: i32) -> Self {
        Self { url, width, height }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

/// `media:thumbnail`.
///
/// Two thumbnails are the same thumbnail when their URLs match; height, width
/// and time do not take part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaThumbnail {
    url: String,
    height: i32,
    width: i32,
    time: Option<String>,
}

impl MediaThumbnail {
    pub(crate) fn new(url: String, height: i32, width: i32, time: Option<String>) -> Self {
        Self {
            url,
            height,
            width,
            time,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// NTP-style offset into the media the thumbnail was taken from.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }
}

impl PartialEq for MediaThumbnail {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for MediaThumbnail {}

impl Hash for MediaThumbnail {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_thumbnail_equality_is_url_only() {
        let small = MediaThumbnail::new("https://cdn/a.jpg".to_string(), 90, 120, None);
        let large = MediaThumbnail::new(
            "https://cdn/a.jpg".to_string(),
            720,
            1280,
            Some("12:05:01.123".to_string()),
        );
        let other = MediaThumbnail::new("https://cdn/b.jpg".to_string(), 90, 120, None);

        assert_eq!(small, large);
        assert_ne!(small, other);

        let set: HashSet<MediaThumbnail> = [small, large, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_media_content_defaults_to_sentinels() {
        let content = MediaContent::default();
        assert_eq!(content.url(), None);
        assert_eq!(content.file_size(), -1);
        assert_eq!(content.bitrate(), UNSPECIFIED_RATE);
        assert_eq!(content.channels(), UNSPECIFIED);
        assert_eq!(content.height(), UNSPECIFIED);
        assert!(!content.is_default());
        assert!(content.player().is_none());
    }

    #[test]
    fn test_empty_feed_has_empty_item_list() {
        let feed = Feed::default();
        assert!(feed.items().is_empty());
        assert!(feed.categories().is_empty());
        assert!(feed.ttl().is_none());
    }
}
