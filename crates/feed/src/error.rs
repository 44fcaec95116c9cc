// ABOUTME: Error types for feed parsing operations.
// ABOUTME: Only the XML tokenizer and the input reader can fail a parse.

use std::fmt;
use thiserror::Error;

/// Errors that can occur during feed parsing.
///
/// Malformed feed *data* (bad dates, bad attributes, unknown elements) never
/// produces an error; it is absorbed as absent or default values.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The XML tokenizer rejected the document.
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// Reading the input failed.
    #[error("failed to read feed: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    /// Creates a Parse error annotated with the byte offset it was raised at.
    pub fn parse_at(position: u64, err: impl fmt::Display) -> Self {
        FeedError::Parse(format!("at byte {position}: {err}"))
    }
}
