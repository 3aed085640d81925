use serde_json::Value;

use super::author::extract_author_info;
use super::types::{json_kind, EnrichedFeedItem, FeedItem, AUTHOR_INFO_KEY, FORMATTED_VIEWS_KEY};
use super::views::{format_views, normalize_views};

/// Adds display metadata to a single feed item.
///
/// All original fields are copied; `views` is replaced by its normalized
/// value and `formattedViews` / `authorInfo` are (re)computed. Feeding the
/// output back in produces the same metadata.
pub fn enrich_item_with_meta(item: &FeedItem) -> EnrichedFeedItem {
    let views = normalize_views(item.views.as_ref());
    let formatted_views = format_views(views.as_f64().unwrap_or(0.0));
    let author_info = extract_author_info(item);

    let mut fields = item.to_fields();
    fields.shift_remove("views");
    fields.shift_remove(FORMATTED_VIEWS_KEY);
    fields.shift_remove(AUTHOR_INFO_KEY);

    EnrichedFeedItem {
        views,
        formatted_views,
        author_info,
        fields,
    }
}

/// Enriches every item of a JSON array, preserving order.
///
/// Anything other than an array yields an empty list; the feed page then
/// simply shows nothing instead of failing.
///
/// # Examples
///
/// ```
/// use feedmeta::feed::enrich_items_with_meta;
/// use serde_json::json;
///
/// assert!(enrich_items_with_meta(&json!("not-an-array")).is_empty());
///
/// let items = enrich_items_with_meta(&json!([{ "views": 12000 }]));
/// assert_eq!(items[0].formatted_views, "1.2w");
/// ```
pub fn enrich_items_with_meta(items: &Value) -> Vec<EnrichedFeedItem> {
    let Some(items) = items.as_array() else {
        tracing::warn!(kind = json_kind(items), "Feed items are not an array, nothing to enrich");
        return Vec::new();
    };

    let enriched: Vec<EnrichedFeedItem> = items
        .iter()
        .map(|value| enrich_item_with_meta(&FeedItem::from_value(value)))
        .collect();

    tracing::debug!(count = enriched.len(), "Enriched feed items");
    enriched
}

/// Typed counterpart of [`enrich_items_with_meta`].
pub fn enrich_items(items: &[FeedItem]) -> Vec<EnrichedFeedItem> {
    items.iter().map(enrich_item_with_meta).collect()
}
