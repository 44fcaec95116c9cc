// ABOUTME: Configuration options for the feed parser and a fluent builder for FeedParser.
// ABOUTME: Defaults keep element text verbatim and reject mismatched end tags.

use crate::parser::FeedParser;

/// Configuration options for [`FeedParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Trim leading and trailing whitespace from element text before it is stored.
    pub trim_text: bool,
    /// Treat an end tag that does not match the open element as malformed XML.
    pub check_end_names: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            trim_text: false,
            check_end_names: true,
        }
    }
}

/// Builder for constructing FeedParser instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct FeedParserBuilder {
    opts: ParserOptions,
}

impl FeedParserBuilder {
    /// Create a new FeedParserBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim whitespace around element text (titles, descriptions, categories, ...).
    pub fn trim_text(mut self, trim: bool) -> Self {
        self.opts.trim_text = trim;
        self
    }

    /// Reject or tolerate end tags that do not match their start tag.
    pub fn check_end_names(mut self, check: bool) -> Self {
        self.opts.check_end_names = check;
        self
    }

    /// Build the FeedParser with the configured options.
    pub fn build(self) -> FeedParser {
        FeedParser::new(self.opts)
    }
}
