//! Rendering of enriched feed items for stdout.
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::feed::EnrichedFeedItem;
use crate::util::{pad_to_width, strip_control_chars};

const VIEWS_WIDTH: usize = 7;
const AUTHOR_WIDTH: usize = 16;
const DEVICE_WIDTH: usize = 16;
const EMPTY_CELL: &str = "-";

/// How enriched items are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!(
                "unknown output format '{other}', expected 'json' or 'table'"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Table => f.write_str("table"),
        }
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serializes items as a JSON array.
pub fn render_json(items: &[EnrichedFeedItem], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(items)
    } else {
        serde_json::to_string(items)
    }
}

/// Table layout options.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Item field shown in the TITLE column.
    pub title_field: String,
    pub title_width: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            title_field: "title".to_string(),
            title_width: 48,
        }
    }
}

/// Renders items as a fixed-width table, one line per item.
///
/// Cell text comes from the feed and is sanitized before printing. Trailing
/// padding is trimmed from each line.
pub fn render_table(items: &[EnrichedFeedItem], options: &TableOptions) -> String {
    let mut out = String::new();
    push_row(&mut out, "VIEWS", "AUTHOR", "DEVICE", "TITLE", options.title_width);

    for item in items {
        let author = item
            .author_info
            .as_ref()
            .and_then(|a| a.display_name())
            .unwrap_or(EMPTY_CELL);
        let device = item
            .author_info
            .as_ref()
            .and_then(|a| a.device_model.as_deref())
            .unwrap_or(EMPTY_CELL);
        let title = item
            .field(&options.title_field)
            .map(cell_text)
            .unwrap_or_else(|| EMPTY_CELL.to_string());

        push_row(
            &mut out,
            &item.formatted_views,
            author,
            device,
            &title,
            options.title_width,
        );
    }

    out
}

fn push_row(out: &mut String, views: &str, author: &str, device: &str, title: &str, title_width: usize) {
    let line = format!(
        "{:>width$}  {}  {}  {}",
        views,
        pad_to_width(&strip_control_chars(author), AUTHOR_WIDTH),
        pad_to_width(&strip_control_chars(device), DEVICE_WIDTH),
        pad_to_width(&strip_control_chars(title), title_width),
        width = VIEWS_WIDTH,
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Single-line text for a JSON value shown in a table cell.
fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => return EMPTY_CELL.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::enrich_items_with_meta;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" Table ".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Table.to_string(), "table");
    }

    #[test]
    fn test_render_json_compact() {
        let items = enrich_items_with_meta(&json!([{ "views": 3 }]));
        let out = render_json(&items, false).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            json!([{ "views": 3, "formattedViews": "3", "authorInfo": null }])
        );
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_render_json_pretty_empty() {
        assert_eq!(render_json(&[], true).unwrap(), "[]");
    }

    #[test]
    fn test_render_table() {
        let items = enrich_items_with_meta(&json!([
            {
                "title": "Weekend\nhike",
                "views": 1500,
                "custom_fields": { "nickname": "Ann", "deviceModel": "iPhone 15" }
            },
            { "views": 12, "phone": "555" },
            { "title": "\u{1b}[31mred\u{1b}[0m" }
        ]));
        let options = TableOptions {
            title_field: "title".to_string(),
            title_width: 12,
        };

        let expected = [
            "  VIEWS  AUTHOR            DEVICE            TITLE",
            "   1.5k  Ann               iPhone 15         Weekend hike",
            "     12  555               -                 -",
            "      0  -                 -                 red",
        ]
        .join("\n")
            + "\n";

        assert_eq!(render_table(&items, &options), expected);
    }

    #[test]
    fn test_render_table_truncates_long_cells() {
        let items = enrich_items_with_meta(&json!([
            { "title": "A very long article title indeed", "nickname": "someone-with-a-long-name" }
        ]));
        let options = TableOptions {
            title_field: "title".to_string(),
            title_width: 10,
        };

        let table = render_table(&items, &options);
        let row = table.lines().nth(1).unwrap();
        assert!(row.contains("someone-with-..."));
        assert!(row.ends_with("A very ..."));
    }

    #[test]
    fn test_non_string_title_cell() {
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(null)), "-");
        assert_eq!(cell_text(&json!("  two   words ")), "two words");
    }
}
