// ABOUTME: Integration tests for feed parsing functionality.
// ABOUTME: Tests RSS, Atom and Media-RSS documents end to end through parse_feed_bytes.

use chrono::{Datelike, TimeZone, Timelike, Utc};
use mrss_feed::{
    parse_feed_bytes, parse_feed_reader, parse_feed_str, FeedError, FeedParser, MediaThumbnail,
    UNSPECIFIED,
};
use pretty_assertions::assert_eq;

/// Tests a plain RSS 2.0 channel with two items.
/// - channel and item titles resolve to their own scope
/// - items keep document order
/// - RFC 822 pubDate parsed
#[test]
fn test_rss_feed_basic() {
    let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
    <channel>
        <title>F</title>
        <link>https://example.com</link>
        <description>A tech blog about programming</description>
        <lastBuildDate>Tue, 16 Jan 2024 12:00:00 GMT</lastBuildDate>
        <ttl>60</ttl>
        <category>tech</category>
        <item>
            <title>A</title>
            <link>https://example.com/post1</link>
            <guid>article-1</guid>
            <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
            <description>This is a summary of the first article.</description>
            <content:encoded><![CDATA[<p>This is the full content.</p>]]></content:encoded>
            <category>rust</category>
        </item>
        <item>
            <title>B</title>
            <link>https://example.com/post2</link>
            <pubDate>16 Jan 2024 11:00 EST</pubDate>
        </item>
    </channel>
</rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();

    assert_eq!(feed.title(), Some("F"));
    assert_eq!(feed.link(), Some("https://example.com"));
    assert_eq!(feed.description(), Some("A tech blog about programming"));
    assert_eq!(
        feed.last_build_date(),
        Some(Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap())
    );
    assert_eq!(feed.ttl(), Some(60));
    assert_eq!(feed.categories(), &["tech".to_string()]);
    assert_eq!(feed.items().len(), 2);

    let first = &feed.items()[0];
    assert_eq!(first.title(), Some("A"));
    assert_eq!(first.link(), Some("https://example.com/post1"));
    assert_eq!(first.content(), Some("<p>This is the full content.</p>"));
    assert_eq!(first.categories(), &["rust".to_string()]);
    let published = first.pub_date().unwrap();
    assert_eq!(
        (published.year(), published.month(), published.day(), published.hour()),
        (2024, 1, 15, 10)
    );

    let second = &feed.items()[1];
    assert_eq!(second.title(), Some("B"));
    assert_eq!(
        second.pub_date(),
        Some(Utc.with_ymd_and_hms(2024, 1, 16, 16, 0, 0).unwrap())
    );
}

/// Tests an Atom feed: entries, href links, ISO 8601 dates, feed-only `updated`.
#[test]
fn test_atom_feed_basic() {
    let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Example Feed</title>
    <link href="http://example.org/"/>
    <updated>2003-12-13T18:30:02Z</updated>
    <entry>
        <title>Atom-Powered Robots Run Amok</title>
        <link href="http://example.org/2003/12/13/atom03"/>
        <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
        <published>2003-12-13T08:29:29-04:00</published>
        <updated>2003-12-14T10:20:05.123+00:00</updated>
    </entry>
</feed>"#;

    let feed = parse_feed_str(atom).unwrap();

    assert_eq!(feed.title(), Some("Example Feed"));
    assert_eq!(feed.link(), Some("http://example.org/"));
    assert_eq!(
        feed.last_build_date(),
        Some(Utc.with_ymd_and_hms(2003, 12, 13, 18, 30, 2).unwrap())
    );

    let entry = &feed.items()[0];
    assert_eq!(entry.title(), Some("Atom-Powered Robots Run Amok"));
    assert_eq!(entry.link(), Some("http://example.org/2003/12/13/atom03"));
    assert_eq!(
        entry.pub_date(),
        Some(Utc.with_ymd_and_hms(2003, 12, 13, 12, 29, 29).unwrap())
    );
}

/// Tests podcast-style enclosures.
/// - complete enclosure is attached with exactly its three values
/// - enclosure missing `length` is dropped entirely
#[test]
fn test_enclosures() {
    let rss = r#"<rss version="2.0">
    <channel>
        <title>Podcast</title>
        <item>
            <title>Episode 1</title>
            <enclosure url="http://x/a.mp3" length="100" type="audio/mpeg"/>
        </item>
        <item>
            <title>Episode 2</title>
            <enclosure url="http://x/b.mp3" type="audio/mpeg"/>
        </item>
    </channel>
</rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();

    let enclosure = feed.items()[0].enclosure().expect("enclosure should be set");
    assert_eq!(enclosure.url(), "http://x/a.mp3");
    assert_eq!(enclosure.length(), 100);
    assert_eq!(enclosure.mime_type(), "audio/mpeg");

    assert!(feed.items()[1].enclosure().is_none());
    assert_eq!(feed.items()[1].title(), Some("Episode 2"));
}

/// Tests a Media-RSS item with a group of renditions and a loose content.
#[test]
fn test_media_rss_nesting() {
    let rss = r#"<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
    <channel>
        <title>Videos</title>
        <media:thumbnail url="http://x/channel.jpg"/>
        <item>
            <title>Clip</title>
            <media:thumbnail url="http://x/item.jpg" height="90" width="120"/>
            <media:group>
                <media:description>Two renditions</media:description>
                <media:content url="http://x/hi.mp4" fileSize="2000" type="video/mp4"
                    medium="video" isDefault="true" bitrate="1500" height="720" width="1280">
                    <media:player url="http://x/player?id=1" width="640" height="360"/>
                    <media:thumbnail url="http://x/hi.jpg" time="00:00:05"/>
                    <media:description>High quality</media:description>
                </media:content>
                <media:content url="http://x/lo.mp4" height="tall"/>
            </media:group>
            <media:content url="http://x/trailer.mp4" duration="30"/>
        </item>
    </channel>
</rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();

    assert_eq!(feed.thumbnails().len(), 1);
    assert_eq!(feed.thumbnails()[0].url(), "http://x/channel.jpg");

    let item = &feed.items()[0];
    assert_eq!(item.thumbnails().len(), 1);
    assert_eq!(item.thumbnails()[0].height(), 90);
    assert_eq!(item.media_groups().len(), 1);
    assert_eq!(item.media_contents().len(), 1);
    assert_eq!(item.media_contents()[0].url(), Some("http://x/trailer.mp4"));
    assert_eq!(item.media_contents()[0].duration(), 30);

    let group = &item.media_groups()[0];
    assert_eq!(group.description(), Some("Two renditions"));
    assert_eq!(group.contents().len(), 2);

    let hi = &group.contents()[0];
    assert_eq!(hi.url(), Some("http://x/hi.mp4"));
    assert_eq!(hi.file_size(), 2000);
    assert!(hi.is_default());
    assert_eq!(hi.bitrate(), 1500.0);
    assert_eq!((hi.width(), hi.height()), (1280, 720));
    assert_eq!(hi.description(), Some("High quality"));
    assert_eq!(hi.thumbnails()[0].time(), Some("00:00:05"));
    let player = hi.player().expect("player should be set");
    assert_eq!(player.url(), "http://x/player?id=1");
    assert_eq!((player.width(), player.height()), (640, 360));

    let lo = &group.contents()[1];
    assert_eq!(lo.height(), UNSPECIFIED);
    assert!(!lo.is_default());
    assert!(lo.player().is_none());
}

/// Tests that content nested in a group never leaks to the item's own list.
#[test]
fn test_group_content_stays_in_group() {
    let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
        <media:group><media:content url="http://x/a.mp4"/></media:group>
    </item></channel></rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();
    let item = &feed.items()[0];
    assert!(item.media_contents().is_empty());
    assert_eq!(item.media_groups()[0].contents().len(), 1);
}

/// Tests that thumbnails sharing a URL compare equal regardless of size.
#[test]
fn test_thumbnail_identity_from_document() {
    let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
        <media:thumbnail url="http://x/t.jpg" height="10"/>
        <media:thumbnail url="http://x/t.jpg" height="20"/>
    </item></channel></rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();
    let thumbs: &[MediaThumbnail] = feed.items()[0].thumbnails();
    assert_eq!(thumbs.len(), 2);
    assert_ne!(thumbs[0].height(), thumbs[1].height());
    assert_eq!(thumbs[0], thumbs[1]);
}

/// Tests that a feed without items yields an empty list, not an error.
#[test]
fn test_empty_feed() {
    let rss = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Empty</title></channel></rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();
    assert_eq!(feed.title(), Some("Empty"));
    assert!(feed.items().is_empty());

    let nothing = parse_feed_bytes(b"").unwrap();
    assert!(nothing.items().is_empty());
    assert_eq!(nothing.title(), None);
}

/// Tests that bad dates and unknown elements never abort the parse.
#[test]
fn test_tolerates_bad_data() {
    let rss = r#"<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
    <channel>
        <pubDate>not-a-date</pubDate>
        <dc:creator>Someone</dc:creator>
        <item>
            <pubDate>yesterday</pubDate>
            <title>Still here</title>
            <ttl>5</ttl>
        </item>
    </channel>
</rss>"#;

    let feed = parse_feed_bytes(rss.as_bytes()).unwrap();
    assert_eq!(feed.pub_date(), None);
    assert_eq!(feed.ttl(), None);
    assert_eq!(feed.items()[0].pub_date(), None);
    assert_eq!(feed.items()[0].title(), Some("Still here"));
}

/// Tests that malformed XML surfaces as a parse error.
#[test]
fn test_malformed_xml_is_error() {
    let err = parse_feed_bytes(b"<rss><channel><item></channel></rss>").unwrap_err();
    assert!(matches!(err, FeedError::Parse(_)));
    assert!(err.to_string().starts_with("failed to parse feed"));
}

/// Tests the lenient and trimming options together.
#[test]
fn test_parser_options() {
    let rss = "<rss><channel><title>\n   Spaced Out \n</title><item><title>x</item></channel></rss>";

    assert!(parse_feed_str(rss).is_err());

    let parser = FeedParser::builder()
        .trim_text(true)
        .check_end_names(false)
        .build();
    let feed = parser.parse(rss.as_bytes()).unwrap();
    assert_eq!(feed.title(), Some("Spaced Out"));
}

/// Tests parsing from a buffered reader.
#[test]
fn test_parse_reader() {
    let rss = "<rss><channel><item><title>From reader</title></item></channel></rss>";
    let reader = std::io::BufReader::new(rss.as_bytes());

    let feed = parse_feed_reader(reader).unwrap();
    assert_eq!(feed.items()[0].title(), Some("From reader"));
}
