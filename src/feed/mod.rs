//! Feed item enrichment for the waterfall list.
//!
//! Raw items from the content API carry a bare view counter and author data
//! in one of two places. This module turns them into display-ready items:
//!
//! - **Views**: normalized to a non-negative number and formatted for the
//!   card (`"999"`, `"1.5k"`, `"2.5w"`)
//! - **Author**: resolved from `custom_fields` (JSON string or object), with
//!   the legacy top-level fields as fallback
//!
//! # Architecture
//!
//! - [`types`] - Wire-facing item types and the enriched output record
//! - [`views`] - View-count normalization and formatting
//! - [`author`] - Author attribution lookup
//! - [`enrich`] - Single-item and batch enrichment
//!
//! Every function here is pure apart from `tracing` diagnostics: malformed
//! input degrades to defaults and is never reported as an error.
//!
//! # Example
//!
//! ```
//! use feedmeta::feed::enrich_items_with_meta;
//! use serde_json::json;
//!
//! let items = enrich_items_with_meta(&json!([
//!     { "views": 1500, "custom_fields": "{\"nickname\":\"A\"}" }
//! ]));
//! assert_eq!(items[0].formatted_views, "1.5k");
//! assert_eq!(items[0].author_info.as_ref().unwrap().nickname.as_deref(), Some("A"));
//! ```

pub mod author;
pub mod enrich;
pub mod types;
pub mod views;

pub use author::extract_author_info;
pub use enrich::{enrich_item_with_meta, enrich_items, enrich_items_with_meta};
pub use types::{AuthorInfo, CustomFields, EnrichedFeedItem, FeedItem};
pub use views::{format_views, normalize_views};
