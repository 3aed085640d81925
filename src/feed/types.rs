use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Output key for the display string produced by [`format_views`](super::format_views).
pub const FORMATTED_VIEWS_KEY: &str = "formattedViews";
/// Output key for the resolved [`AuthorInfo`].
pub const AUTHOR_INFO_KEY: &str = "authorInfo";

// ============================================================================
// Input Types
// ============================================================================

/// One feed/article entry as delivered by the content API.
///
/// Only the fields the enricher reads are named. Everything else lands in
/// `extra` and is written back untouched by [`FeedItem::to_fields`].
///
/// The named fields hold raw JSON values rather than typed scalars: the
/// upstream API is loose about types (phone numbers arrive as numbers, view
/// counts as strings) and one odd field must not make the item unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFields>,

    /// Legacy top-level author fields, read only when `custom_fields`
    /// carries nothing usable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,

    #[serde(
        default,
        rename = "deviceModel",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_model: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeedItem {
    /// Build an item from an arbitrary JSON value.
    ///
    /// Non-object values yield an empty item, mirroring how the list UI
    /// treats a garbage entry: it still renders, just without metadata.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            tracing::debug!(kind = json_kind(value), "Feed item is not an object, using empty item");
            return Self::default();
        }

        match serde_json::from_value(value.clone()) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read feed item, using empty item");
                Self::default()
            }
        }
    }

    /// Flatten the item back into a field map, named fields first.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::with_capacity(self.extra.len() + 5);

        if let Some(views) = &self.views {
            fields.insert("views".to_string(), views.clone());
        }
        if let Some(custom) = &self.custom_fields {
            fields.insert("custom_fields".to_string(), custom.to_value());
        }
        if let Some(nickname) = &self.nickname {
            fields.insert("nickname".to_string(), nickname.clone());
        }
        if let Some(phone) = &self.phone {
            fields.insert("phone".to_string(), phone.clone());
        }
        if let Some(device_model) = &self.device_model {
            fields.insert("deviceModel".to_string(), device_model.clone());
        }

        fields.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        fields
    }
}

/// The `custom_fields` extension bag, as it arrives on the wire.
///
/// Some API versions send it JSON-encoded, others pre-parsed. `Other`
/// catches anything else so the surrounding item still deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFields {
    Raw(String),
    Parsed(Map<String, Value>),
    Other(Value),
}

impl CustomFields {
    pub fn to_value(&self) -> Value {
        match self {
            CustomFields::Raw(s) => Value::String(s.clone()),
            CustomFields::Parsed(map) => Value::Object(map.clone()),
            CustomFields::Other(value) => value.clone(),
        }
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// Author attribution shown under a feed card.
///
/// At least one field is `Some` whenever this value exists; the enricher
/// reports "no author" as `None` rather than an all-null record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub device_model: Option<String>,
}

impl AuthorInfo {
    /// Name to show for the author: nickname, else phone.
    pub fn display_name(&self) -> Option<&str> {
        self.nickname.as_deref().or(self.phone.as_deref())
    }
}

/// A feed item ready for display.
///
/// `fields` holds every original field except the three the enricher owns,
/// so serializing never emits duplicate keys even when the input already
/// went through enrichment once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedFeedItem {
    pub views: Number,

    #[serde(rename = "formattedViews")]
    pub formatted_views: String,

    #[serde(rename = "authorInfo")]
    pub author_info: Option<AuthorInfo>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EnrichedFeedItem {
    /// Look up a pass-through field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
