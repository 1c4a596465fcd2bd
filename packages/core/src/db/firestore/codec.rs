//! Firestore document codec
//!
//! Firestore's REST surface wraps every field in a typed value
//! (`{"stringValue": "..."}`, `{"arrayValue": {"values": [...]}}`, ...).
//! This module converts between those documents and the crate's models.

use crate::db::error::StoreError;
use crate::models::{ImageChange, NewNode, Node, NodeUpdate, UserProfile};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub type Fields = Map<String, Value>;

/// A document as returned by `GET`, `list` and `commit`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default)]
    pub create_time: Option<String>,
}

/// One page of a collection listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

pub fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

pub fn boolean_value(value: bool) -> Value {
    json!({ "booleanValue": value })
}

pub fn timestamp_value(value: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

pub fn array_value<'a>(items: impl IntoIterator<Item = &'a String>) -> Value {
    let values: Vec<Value> = items.into_iter().map(|s| string_value(s)).collect();
    if values.is_empty() {
        json!({ "arrayValue": {} })
    } else {
        json!({ "arrayValue": { "values": values } })
    }
}

/// Last path segment of a document name
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Fields written when a node is created; `createdAt` is a server transform
pub fn encode_new_node(node: &NewNode) -> Fields {
    let mut fields = Fields::new();
    fields.insert("nodeTitle".to_string(), string_value(&node.title));
    fields.insert("nodeDescription".to_string(), string_value(&node.description));
    if let Some(category) = &node.category {
        fields.insert("category".to_string(), string_value(category));
    }
    fields.insert("tags".to_string(), array_value(&node.tags));
    fields.insert("images".to_string(), array_value(std::iter::empty::<&String>()));
    fields.insert("createdBy".to_string(), string_value(&node.created_by));
    fields
}

/// Encoded form of a node patch
#[derive(Debug, Default, PartialEq)]
pub struct EncodedUpdate {
    pub fields: Fields,
    pub mask: Vec<&'static str>,
    pub transforms: Vec<Value>,
}

/// Split a patch into masked field writes and array transforms.
///
/// A cleared category is listed in the mask with no value, which deletes the
/// field on the server.
pub fn encode_update(update: &NodeUpdate) -> EncodedUpdate {
    let mut fields = Fields::new();
    if let Some(title) = &update.title {
        fields.insert("nodeTitle".to_string(), string_value(title));
    }
    if let Some(description) = &update.description {
        fields.insert("nodeDescription".to_string(), string_value(description));
    }
    if let Some(Some(category)) = &update.category {
        fields.insert("category".to_string(), string_value(category));
    }
    if let Some(tags) = &update.tags {
        fields.insert("tags".to_string(), array_value(tags));
    }

    let mut transforms = Vec::new();
    match &update.images {
        Some(ImageChange::Replace(urls)) => {
            fields.insert("images".to_string(), array_value(urls));
        }
        Some(ImageChange::Append { append }) => transforms.push(json!({
            "fieldPath": "images",
            "appendMissingElements": { "values": [string_value(append)] }
        })),
        Some(ImageChange::Remove { remove }) => transforms.push(json!({
            "fieldPath": "images",
            "removeAllFromArray": { "values": [string_value(remove)] }
        })),
        None => {}
    }

    EncodedUpdate {
        fields,
        mask: update.field_paths(),
        transforms,
    }
}

pub fn encode_profile(profile: &UserProfile) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), string_value(&profile.name));
    fields.insert("email".to_string(), string_value(&profile.email));
    fields.insert("isRecruiter".to_string(), boolean_value(profile.is_recruiter));
    fields.insert("createdAt".to_string(), timestamp_value(&profile.created_at));
    fields
}

pub fn decode_node(document: &Document) -> Result<Node, StoreError> {
    let fields = &document.fields;
    Ok(Node {
        id: document_id(&document.name).to_string(),
        title: required_string(document, "nodeTitle")?,
        description: required_string(document, "nodeDescription")?,
        category: optional_string(fields, "category"),
        tags: string_array(fields, "tags"),
        images: string_array(fields, "images"),
        created_by: required_string(document, "createdBy")?,
        created_at: created_at(document)?,
    })
}

pub fn decode_profile(document: &Document) -> Result<UserProfile, StoreError> {
    Ok(UserProfile {
        name: required_string(document, "name")?,
        email: required_string(document, "email")?,
        is_recruiter: document
            .fields
            .get("isRecruiter")
            .and_then(|v| v.get("booleanValue"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at: created_at(document)?,
    })
}

fn optional_string(fields: &Fields, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(|v| v.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn required_string(document: &Document, key: &str) -> Result<String, StoreError> {
    optional_string(&document.fields, key).ok_or_else(|| {
        StoreError::decode(format!(
            "document {} has no string field '{}'",
            document.name, key
        ))
    })
}

fn string_array(fields: &Fields, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(|v| v.pointer("/arrayValue/values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `createdAt` field, falling back to the document's own create time
fn created_at(document: &Document) -> Result<DateTime<Utc>, StoreError> {
    let raw = document
        .fields
        .get("createdAt")
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
        .or(document.create_time.as_deref())
        .ok_or_else(|| {
            StoreError::decode(format!("document {} has no creation time", document.name))
        })?;

    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::decode(format!("bad timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_document() -> Document {
        serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/nodes/abc123",
            "fields": {
                "nodeTitle": { "stringValue": "Logo Design" },
                "nodeDescription": { "stringValue": "Brand identity" },
                "category": { "stringValue": "Branding" },
                "tags": { "arrayValue": { "values": [
                    { "stringValue": "logo" }, { "stringValue": "vector" }
                ] } },
                "images": { "arrayValue": {} },
                "createdBy": { "stringValue": "user-1" },
                "createdAt": { "timestampValue": "2024-03-01T10:15:30.123456Z" }
            },
            "createTime": "2024-03-01T10:15:30.200000Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_node() {
        let node = decode_node(&node_document()).unwrap();
        assert_eq!(node.id, "abc123");
        assert_eq!(node.title, "Logo Design");
        assert_eq!(node.category.as_deref(), Some("Branding"));
        assert_eq!(node.tags, vec!["logo", "vector"]);
        assert!(node.images.is_empty());
        assert_eq!(node.created_at.to_rfc3339(), "2024-03-01T10:15:30.123456+00:00");
    }

    #[test]
    fn test_decode_falls_back_to_create_time() {
        let mut document = node_document();
        document.fields.remove("createdAt");
        let node = decode_node(&document).unwrap();
        assert_eq!(node.created_at.to_rfc3339(), "2024-03-01T10:15:30.200+00:00");
    }

    #[test]
    fn test_decode_missing_title_is_error() {
        let mut document = node_document();
        document.fields.remove("nodeTitle");
        assert!(matches!(decode_node(&document), Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_encode_new_node_starts_with_empty_images() {
        let fields = encode_new_node(&NewNode::new("t", "d", "u").with_tags(["a"]));
        assert_eq!(fields["images"], json!({ "arrayValue": {} }));
        assert_eq!(fields["tags"]["arrayValue"]["values"][0]["stringValue"], "a");
        assert!(!fields.contains_key("category"));
        assert!(!fields.contains_key("createdAt"));
    }

    #[test]
    fn test_encode_update_clears_category_through_mask() {
        let encoded = encode_update(&NodeUpdate::new().with_title("x").with_category(None));
        assert_eq!(encoded.mask, vec!["nodeTitle", "category"]);
        assert!(encoded.fields.contains_key("nodeTitle"));
        assert!(!encoded.fields.contains_key("category"));
        assert!(encoded.transforms.is_empty());
    }

    #[test]
    fn test_encode_image_append_is_transform() {
        let encoded = encode_update(&NodeUpdate::append_image("https://cdn/a.png"));
        assert!(encoded.mask.is_empty());
        assert!(encoded.fields.is_empty());
        assert_eq!(encoded.transforms[0]["fieldPath"], "images");
        assert_eq!(
            encoded.transforms[0]["appendMissingElements"]["values"][0]["stringValue"],
            "https://cdn/a.png"
        );
    }

    #[test]
    fn test_profile_round_trip_through_fields() {
        let profile = UserProfile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            is_recruiter: false,
            created_at: DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let document = Document {
            name: "projects/p/databases/(default)/documents/users/u1".to_string(),
            fields: encode_profile(&profile),
            create_time: None,
        };
        assert_eq!(decode_profile(&document).unwrap(), profile);
    }
}
