//! JSON-lines position feed.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::geofence::Position;

/// Line reader over a feed file or stdin.
pub type FeedLines = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Opens `input`, or stdin when `None`.
pub async fn open_feed(input: Option<&Path>) -> Result<FeedLines> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open position feed {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => {
            log::info!("Reading positions from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };
    Ok(reader.lines())
}

/// Parses one feed line.
///
/// Returns `None` for blank lines.
pub fn parse_position_line(line: &str) -> Option<Result<Position, serde_json::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}
