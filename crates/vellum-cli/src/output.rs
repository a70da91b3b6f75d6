//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde_json::{json, Value};
use uuid::Uuid;

use vellum_core::{ItemKind, OutlineTree};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a status line, suppressed in quiet mode
    pub fn message(&self, text: &str) {
        match self.format {
            OutputFormat::Human => println!("{text}"),
            OutputFormat::Json => {
                println!("{}", json!({ "message": text }));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print the handle of a newly created item
    pub fn print_created(&self, kind: ItemKind, handle: Uuid) {
        match self.format {
            OutputFormat::Human => println!("Added {}: {}", kind.label(), handle),
            OutputFormat::Json => {
                println!(
                    "{}",
                    json!({ "created": handle.to_string(), "kind": kind.as_tag() })
                );
            }
            OutputFormat::Quiet => println!("{handle}"),
        }
    }

    /// Print one outline tree as an indented listing
    pub fn print_tree(&self, tree: &OutlineTree) {
        match self.format {
            OutputFormat::Human => {
                println!("{} ({} items)", tree.kind().label(), tree.len() - 1);
                for (depth, id) in tree.walk() {
                    let Some(item) = tree.item(id) else { continue };
                    let indent = "  ".repeat(depth + 1);
                    let handle = item
                        .handle()
                        .map(|h| h.to_string())
                        .unwrap_or_default();
                    println!(
                        "{indent}{} [{}] {} ({} words)",
                        item.name(),
                        item.kind().label(),
                        handle,
                        item.word_count()
                    );
                }
            }
            OutputFormat::Json => println!("{}", tree.to_json()),
            OutputFormat::Quiet => {
                for (_, id) in tree.walk() {
                    if let Some(handle) = tree.item(id).and_then(|item| item.handle()) {
                        println!("{handle}");
                    }
                }
            }
        }
    }

    /// Print an arbitrary JSON payload (Human mode pretty-prints)
    pub fn print_json(&self, value: &Value) {
        match self.format {
            OutputFormat::Human => println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_default()
            ),
            OutputFormat::Json => println!("{value}"),
            OutputFormat::Quiet => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        // Quiet wins over json
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }
}
