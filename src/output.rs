//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## check-storage
//!
//! ```text
//! Storage: file gallery.json
//!     001 {"cid":"bafy1","name":"dance.gif"}
//!     002 {"cid":"bafy2"}
//! Found 2 items
//! ```
//!
//! ```text
//! Storage: url https://example.com/gifs.json
//!     Error: storage responded with HTTP 502
//! ```

use crate::config::AppConfig;
use crate::storage::{GalleryItem, StoreError};

/// Longest item preview before it is cut with an ellipsis.
const PREVIEW_WIDTH: usize = 72;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Compact single-line JSON, cut at [`PREVIEW_WIDTH`] characters.
fn item_preview(item: &GalleryItem) -> String {
    let compact = item.to_string();
    if compact.chars().count() <= PREVIEW_WIDTH {
        compact
    } else {
        let cut: String = compact.chars().take(PREVIEW_WIDTH - 1).collect();
        format!("{cut}…")
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn format_storage_check(
    backend: &str,
    result: &Result<Vec<GalleryItem>, StoreError>,
) -> Vec<String> {
    let mut lines = vec![format!("Storage: {backend}")];
    match result {
        Ok(items) => {
            for (i, item) in items.iter().enumerate() {
                lines.push(format!(
                    "{}{} {}",
                    indent(1),
                    format_index(i + 1),
                    item_preview(item)
                ));
            }
            lines.push(format!("Found {} item{}", items.len(), plural(items.len())));
        }
        Err(e) => lines.push(format!("{}Error: {e}", indent(1))),
    }
    lines
}

pub fn print_storage_check(backend: &str, result: &Result<Vec<GalleryItem>, StoreError>) {
    for line in format_storage_check(backend, result) {
        println!("{}", line);
    }
}

/// Startup summary of the effective configuration. Credentials are not shown.
pub fn format_config_summary(config: &AppConfig) -> Vec<String> {
    let storage = match &config.storage.url {
        Some(url) => format!("url {url}"),
        None => format!("file {}", config.storage.file.display()),
    };
    vec![
        "Config".to_string(),
        format!("{}Listen: {}", indent(1), config.server.address()),
        format!("{}Public URL: {}", indent(1), config.manifest.public_url),
        format!("{}Storage: {storage}", indent(1)),
        format!("{}Readiness delay: {}ms", indent(1), config.readiness.delay_ms),
    ]
}

pub fn print_config_summary(config: &AppConfig) {
    for line in format_config_summary(config) {
        println!("{}", line);
    }
}
