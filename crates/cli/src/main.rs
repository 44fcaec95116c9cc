// ABOUTME: CLI for parsing RSS/Atom/Media-RSS feeds with the mrss-feed parser.
// ABOUTME: Reads feeds from files or stdin and prints the parsed graph as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use mrss_feed::FeedParser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Parse one or more feed documents and output JSON.
#[derive(Parser, Debug)]
#[command(name = "mrss-cli")]
#[command(about = "Parse RSS, Atom and Media-RSS feeds and print JSON", long_about = None)]
struct Args {
    /// Local feed file paths. Use "-" to read one feed from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Trim whitespace around element text.
    #[arg(long, default_value_t = false)]
    trim_text: bool,

    /// Accept end tags that do not match their start tag.
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "mrss_feed=trace").
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let parser = FeedParser::builder()
        .trim_text(args.trim_text)
        .check_end_names(!args.lenient)
        .build();

    let mut results = Vec::new();

    for target in &args.targets {
        let parsed = load_bytes(target)
            .and_then(|bytes| parser.parse(&bytes).map_err(anyhow::Error::new));
        match parsed {
            Ok(feed) => results.push(json!({
                "source": target,
                "ok": true,
                "feed": feed,
                "error": null
            })),
            Err(err) => {
                tracing::warn!(source = %target, error = %err, "failed to parse feed");
                results.push(json!({
                    "source": target,
                    "ok": false,
                    "feed": null,
                    "error": err.to_string()
                }))
            }
        }
    }

    // Output format:
    // - Single target and ok => emit the feed object
    // - Otherwise emit an envelope with feeds array and counts
    let parsed = results
        .iter()
        .filter(|r| r.get("ok").and_then(|v| v.as_bool()) == Some(true))
        .count();
    let output = match results.as_slice() {
        [single] if parsed == 1 => single.get("feed").cloned().unwrap_or_else(|| json!({})),
        _ => json!({
            "feeds": results,
            "total_feeds": results.len(),
            "parsed": parsed,
            "failed": results.len() - parsed
        }),
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
