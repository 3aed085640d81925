use std::borrow::Cow;

use serde_json::{Map, Value};

use super::types::{json_kind, AuthorInfo, CustomFields, FeedItem};

/// Resolves who wrote a feed item.
///
/// `custom_fields` wins when it names anyone. A JSON-encoded
/// `custom_fields` that fails to parse is logged at warn level and skipped;
/// the item's legacy top-level `nickname` / `phone` / `deviceModel` are
/// tried next. Returns `None` when neither source has a truthy field.
///
/// # Examples
///
/// ```
/// use feedmeta::feed::{extract_author_info, FeedItem};
/// use serde_json::json;
///
/// let item = FeedItem::from_value(&json!({ "custom_fields": "{\"nickname\":\"A\"}" }));
/// let info = extract_author_info(&item).unwrap();
/// assert_eq!(info.nickname.as_deref(), Some("A"));
/// assert_eq!(info.phone, None);
/// ```
pub fn extract_author_info(item: &FeedItem) -> Option<AuthorInfo> {
    if let Some(fields) = item.custom_fields.as_ref().and_then(resolve_custom_fields) {
        let info = author_from_parts(
            fields.get("nickname"),
            fields.get("phone"),
            fields.get("deviceModel"),
        );
        if info.is_some() {
            return info;
        }
    }

    author_from_parts(
        item.nickname.as_ref(),
        item.phone.as_ref(),
        item.device_model.as_ref(),
    )
}

/// Normalizes `custom_fields` into a mapping, or `None` if it holds none.
fn resolve_custom_fields(custom: &CustomFields) -> Option<Cow<'_, Map<String, Value>>> {
    match custom {
        CustomFields::Parsed(map) => Some(Cow::Borrowed(map)),
        CustomFields::Raw(raw) if raw.is_empty() => None,
        CustomFields::Raw(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(Cow::Owned(map)),
            Ok(other) => {
                tracing::debug!(
                    kind = json_kind(&other),
                    "custom_fields decoded to a non-object, ignoring"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to parse custom_fields, falling back to legacy author fields"
                );
                None
            }
        },
        CustomFields::Other(value) => {
            tracing::debug!(kind = json_kind(value), "Unsupported custom_fields value, ignoring");
            None
        }
    }
}

fn author_from_parts(
    nickname: Option<&Value>,
    phone: Option<&Value>,
    device_model: Option<&Value>,
) -> Option<AuthorInfo> {
    let info = AuthorInfo {
        nickname: nickname.and_then(truthy_text),
        phone: phone.and_then(truthy_text),
        device_model: device_model.and_then(truthy_text),
    };

    if info.nickname.is_none() && info.phone.is_none() && info.device_model.is_none() {
        None
    } else {
        Some(info)
    }
}

/// Text of a truthy scalar: non-empty strings and non-zero numbers.
///
/// Phone numbers often arrive as JSON numbers, hence the numeric arm.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> FeedItem {
        FeedItem::from_value(&value)
    }

    fn author(nickname: Option<&str>, phone: Option<&str>, device: Option<&str>) -> AuthorInfo {
        AuthorInfo {
            nickname: nickname.map(str::to_string),
            phone: phone.map(str::to_string),
            device_model: device.map(str::to_string),
        }
    }

    #[test]
    fn test_custom_fields_string() {
        let info = extract_author_info(&item(json!({ "custom_fields": "{\"nickname\":\"A\"}" })));
        assert_eq!(info, Some(author(Some("A"), None, None)));
    }

    #[test]
    fn test_custom_fields_object() {
        let info = extract_author_info(&item(json!({
            "custom_fields": { "phone": "555", "deviceModel": "Pixel 8" }
        })));
        assert_eq!(info, Some(author(None, Some("555"), Some("Pixel 8"))));
    }

    #[test]
    fn test_invalid_json_without_legacy_is_none() {
        assert_eq!(extract_author_info(&item(json!({ "custom_fields": "{invalid json" }))), None);
    }

    #[test]
    fn test_invalid_json_falls_back_to_legacy() {
        let info = extract_author_info(&item(json!({
            "custom_fields": "{invalid json",
            "nickname": "Legacy"
        })));
        assert_eq!(info, Some(author(Some("Legacy"), None, None)));
    }

    #[test]
    fn test_legacy_fields_only() {
        let info = extract_author_info(&item(json!({ "nickname": "B" })));
        assert_eq!(info, Some(author(Some("B"), None, None)));
    }

    #[test]
    fn test_empty_item_is_none() {
        assert_eq!(extract_author_info(&FeedItem::default()), None);
    }

    #[test]
    fn test_custom_fields_win_over_legacy() {
        let info = extract_author_info(&item(json!({
            "custom_fields": { "nickname": "New" },
            "nickname": "Old",
            "phone": "123"
        })));
        // No merging: the legacy phone is not pulled in.
        assert_eq!(info, Some(author(Some("New"), None, None)));
    }

    #[test]
    fn test_empty_custom_fields_fall_back() {
        let info = extract_author_info(&item(json!({
            "custom_fields": { "nickname": "", "phone": null },
            "deviceModel": "iPad"
        })));
        assert_eq!(info, Some(author(None, None, Some("iPad"))));

        let info = extract_author_info(&item(json!({ "custom_fields": "", "phone": "9" })));
        assert_eq!(info, Some(author(None, Some("9"), None)));
    }

    #[test]
    fn test_non_object_json_is_ignored() {
        let info = extract_author_info(&item(json!({ "custom_fields": "[1,2]" })));
        assert_eq!(info, None);

        let info = extract_author_info(&item(json!({ "custom_fields": "null", "nickname": "C" })));
        assert_eq!(info, Some(author(Some("C"), None, None)));
    }

    #[test]
    fn test_numeric_phone_is_text() {
        let info = extract_author_info(&item(json!({ "custom_fields": { "phone": 13800138000u64 } })));
        assert_eq!(info, Some(author(None, Some("13800138000"), None)));

        assert_eq!(extract_author_info(&item(json!({ "phone": 0 }))), None);
    }

    #[test]
    fn test_non_scalar_fields_are_absent() {
        let info = extract_author_info(&item(json!({
            "custom_fields": { "nickname": true, "phone": ["1"], "deviceModel": {} }
        })));
        assert_eq!(info, None);
    }
}
