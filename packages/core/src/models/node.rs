//! Node Data Structures
//!
//! This module defines the portfolio item (`Node`) and the shapes used to
//! create and patch it.
//!
//! # Architecture
//!
//! - **Fixed shape**: every field a portfolio item can carry is explicit; there
//!   is no free-form property bag
//! - **Store-assigned identity**: `id` and `created_at` come from the backend
//! - **Immutable ownership**: `created_by` and `created_at` are never patched
//!
//! Wire names follow the stored documents (`nodeTitle`, `nodeDescription`,
//! `createdBy`, `createdAt`), so the same JSON travels between the document
//! store, the HTTP API and the browser.
//!
//! # Examples
//!
//! ```rust
//! use folio_core::models::NewNode;
//!
//! let input = NewNode::new("Logo Design", "Brand identity work", "user-1")
//!     .with_category("Branding")
//!     .with_tags(["logo", "vector", "logo"]);
//!
//! // Duplicate tags collapse, first occurrence wins
//! assert_eq!(input.tags, vec!["logo".to_string(), "vector".to_string()]);
//! assert!(input.validate().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Patch keys that can never be written after creation.
///
/// `NodeUpdate::from_json_patch` strips these before decoding, whatever the
/// caller sent.
pub const IMMUTABLE_FIELDS: [&str; 3] = ["id", "createdAt", "createdBy"];

/// Validation errors for Node operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate tag: {0}")]
    DuplicateTag(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Invalid image reference: {0}")]
    InvalidImage(String),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),
}

/// A single portfolio item.
///
/// # Fields
///
/// - `id`: Opaque identifier assigned by the store on creation
/// - `title` / `description`: Required, non-empty
/// - `category`: Optional single-valued grouping
/// - `tags`: Ordered labels, unique within one node
/// - `images`: Download URLs in upload order; the only record of attached assets
/// - `created_by`: Owning user id, immutable
/// - `created_at`: Server-assigned creation time, immutable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    #[serde(rename = "nodeTitle")]
    pub title: String,

    #[serde(rename = "nodeDescription")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    pub created_by: String,

    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Validate the record shape.
    ///
    /// Used on records coming back from a store as well as before writes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }
        validate_text("nodeTitle", &self.title)?;
        validate_text("nodeDescription", &self.description)?;
        if self.created_by.trim().is_empty() {
            return Err(ValidationError::MissingField("createdBy".to_string()));
        }
        validate_tags(&self.tags)
    }

    /// Whether the node carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Apply a patch in place.
    ///
    /// Mirrors the document store's field-level semantics: untouched fields
    /// stay as they are, image appends skip URLs already present, and image
    /// removal drops every occurrence.
    pub fn apply_update(&mut self, update: &NodeUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        match &update.images {
            Some(ImageChange::Replace(urls)) => self.images = urls.clone(),
            Some(ImageChange::Append { append }) => {
                if !self.images.contains(append) {
                    self.images.push(append.clone());
                }
            }
            Some(ImageChange::Remove { remove }) => self.images.retain(|url| url != remove),
            None => {}
        }
    }
}

/// Input for creating a node.
///
/// The store assigns `id` and `created_at`; the image list always starts
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    #[serde(rename = "nodeTitle")]
    pub title: String,

    #[serde(rename = "nodeDescription")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_by: String,
}

impl NewNode {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: None,
            tags: Vec::new(),
            created_by: created_by.into(),
        }
        .normalized()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self.normalized()
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self.normalized()
    }

    /// Collapse duplicate tags and treat a blank category as unset.
    pub fn normalized(mut self) -> Self {
        self.tags = dedup_tags(std::mem::take(&mut self.tags));
        if self
            .category
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            self.category = None;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("nodeTitle", &self.title)?;
        validate_text("nodeDescription", &self.description)?;
        if self.created_by.trim().is_empty() {
            return Err(ValidationError::MissingField("createdBy".to_string()));
        }
        validate_tags(&self.tags)
    }

    /// Materialize the record once the store has assigned identity and time.
    pub fn into_node(self, id: String, created_at: DateTime<Utc>) -> Node {
        Node {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            tags: self.tags,
            images: Vec::new(),
            created_by: self.created_by,
            created_at,
        }
    }
}

/// Change to a node's image list.
///
/// Serialized untagged so a patch can carry either a full list or a single
/// edit:
///
/// - `["a", "b"]` → `Replace`
/// - `{"append": "url"}` → `Append` (skipped if already present)
/// - `{"remove": "url"}` → `Remove` (every occurrence)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageChange {
    Replace(Vec<String>),
    Append { append: String },
    Remove { remove: String },
}

/// Custom deserializer for optional fields that accepts both plain values and nested Options
///
/// Maps three input formats to the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (clear)
/// - "value" → Some(Some("value")) (set)
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Field-level patch for a node.
///
/// There is no way to express `id`, `createdAt` or `createdBy` here, so the
/// typed path cannot touch them. Untyped JSON goes through
/// [`NodeUpdate::from_json_patch`], which strips them.
///
/// # Examples
///
/// ```rust
/// # use folio_core::models::{ImageChange, NodeUpdate};
/// // Rename and clear the category
/// let update = NodeUpdate {
///     title: Some("New title".to_string()),
///     category: Some(None),
///     ..Default::default()
/// };
/// assert_eq!(update.field_paths(), vec!["nodeTitle", "category"]);
///
/// let append = NodeUpdate::append_image("https://cdn.example/a.png");
/// assert!(matches!(append.images, Some(ImageChange::Append { .. })));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeUpdate {
    #[serde(rename = "nodeTitle", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        rename = "nodeDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Uses double-Option pattern:
    /// - `None`: Don't change category
    /// - `Some(None)`: Remove the category
    /// - `Some(Some(c))`: Set the category
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub category: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageChange>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn append_image(url: impl Into<String>) -> Self {
        Self {
            images: Some(ImageChange::Append { append: url.into() }),
            ..Default::default()
        }
    }

    pub fn remove_image(url: impl Into<String>) -> Self {
        Self {
            images: Some(ImageChange::Remove { remove: url.into() }),
            ..Default::default()
        }
    }

    /// Decode an untyped JSON patch.
    ///
    /// `id`, `createdAt` and `createdBy` are removed first, so a patch that
    /// carries them still applies its other fields and leaves those three
    /// untouched. Any other unknown key is rejected.
    pub fn from_json_patch(patch: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut fields) = patch else {
            return Err(ValidationError::InvalidPatch(
                "patch must be a JSON object".to_string(),
            ));
        };

        for key in IMMUTABLE_FIELDS {
            if fields.remove(key).is_some() {
                tracing::debug!("Stripped immutable field '{}' from node patch", key);
            }
        }

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| ValidationError::InvalidPatch(e.to_string()))
    }

    /// Treat a blank category as a request to clear it, as creation does.
    pub fn normalized(mut self) -> Self {
        if let Some(Some(category)) = &self.category {
            if category.trim().is_empty() {
                self.category = Some(None);
            }
        }
        self
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.images.is_none()
    }

    /// Wire names of the plain fields this patch writes, in a stable order.
    ///
    /// Image appends and removals are array transforms rather than field
    /// writes and are not listed; a full image replacement is.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.title.is_some() {
            paths.push("nodeTitle");
        }
        if self.description.is_some() {
            paths.push("nodeDescription");
        }
        if self.category.is_some() {
            paths.push("category");
        }
        if self.tags.is_some() {
            paths.push("tags");
        }
        if matches!(self.images, Some(ImageChange::Replace(_))) {
            paths.push("images");
        }
        paths
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_text("nodeTitle", title)?;
        }
        if let Some(description) = &self.description {
            validate_text("nodeDescription", description)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        match &self.images {
            Some(ImageChange::Append { append: url }) | Some(ImageChange::Remove { remove: url })
                if url.trim().is_empty() =>
            {
                Err(ValidationError::InvalidImage(
                    "image URL must not be blank".to_string(),
                ))
            }
            Some(ImageChange::Replace(urls)) if urls.iter().any(|u| u.trim().is_empty()) => Err(
                ValidationError::InvalidImage("image URL must not be blank".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

fn validate_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(ValidationError::InvalidTag(
                "tags must not be blank".to_string(),
            ));
        }
        if !seen.insert(tag.as_str()) {
            return Err(ValidationError::DuplicateTag(tag.clone()));
        }
    }
    Ok(())
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(tags.len());
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
