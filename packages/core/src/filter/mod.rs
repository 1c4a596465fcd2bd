//! Node Filter
//!
//! Pure in-memory narrowing of a node list. Three independent dimensions,
//! combined with AND:
//!
//! - **search term**: case-insensitive substring of the title OR the
//!   description; an empty term imposes nothing
//! - **category**: exact match
//! - **tags**: the node must carry every selected tag
//!
//! Results are always recomputed from the full list, so the order of
//! changes to the filter never matters.
//!
//! # Examples
//!
//! ```rust
//! use folio_core::filter::NodeFilter;
//! use folio_core::models::NewNode;
//! use chrono::Utc;
//!
//! let nodes = vec![
//!     NewNode::new("Logo Design", "Brand identity", "u1")
//!         .with_category("Branding")
//!         .with_tags(["logo", "vector"])
//!         .into_node("a".to_string(), Utc::now()),
//!     NewNode::new("Poster", "Concert poster with a logo", "u1")
//!         .with_tags(["print"])
//!         .into_node("b".to_string(), Utc::now()),
//! ];
//!
//! let filter = NodeFilter::new().with_search("logo");
//! assert_eq!(filter.apply(&nodes).len(), 2);
//!
//! let filter = filter.with_tag("vector");
//! assert_eq!(filter.apply(&nodes)[0].id, "a");
//! ```

mod facets;

pub use facets::FilterFacets;

use crate::models::Node;
use serde::{Deserialize, Serialize};

/// Selection state of the filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFilter {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Selected tags in selection order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// `None` clears the category
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    /// Select `tag` if unselected, otherwise deselect it; returns whether it is now selected
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Selected category (1) plus selected tags; the search term is not counted
    pub fn active_count(&self) -> usize {
        usize::from(self.category.is_some()) + self.tags.len()
    }

    /// True when no dimension constrains the result
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.category.is_none() && self.tags.is_empty()
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.matches_search(node) && self.matches_category(node) && self.matches_tags(node)
    }

    /// Matching nodes, in their original order
    pub fn apply(&self, nodes: &[Node]) -> Vec<Node> {
        if self.is_empty() {
            return nodes.to_vec();
        }
        let needle = self.search_term.to_lowercase();
        nodes
            .iter()
            .filter(|node| self.matches_with(node, &needle))
            .cloned()
            .collect()
    }

    /// Like [`apply`](Self::apply) but consumes the list
    pub fn retain(&self, mut nodes: Vec<Node>) -> Vec<Node> {
        let needle = self.search_term.to_lowercase();
        nodes.retain(|node| self.matches_with(node, &needle));
        nodes
    }

    fn matches_with(&self, node: &Node, needle: &str) -> bool {
        (needle.is_empty() || contains_term(node, needle))
            && self.matches_category(node)
            && self.matches_tags(node)
    }

    fn matches_search(&self, node: &Node) -> bool {
        self.search_term.is_empty() || contains_term(node, &self.search_term.to_lowercase())
    }

    fn matches_category(&self, node: &Node) -> bool {
        match &self.category {
            Some(category) => node.category.as_deref() == Some(category.as_str()),
            None => true,
        }
    }

    fn matches_tags(&self, node: &Node) -> bool {
        self.tags.iter().all(|tag| node.has_tag(tag))
    }
}

fn contains_term(node: &Node, needle: &str) -> bool {
    node.title.to_lowercase().contains(needle) || node.description.to_lowercase().contains(needle)
}

/// Query-string form: `?search=logo&category=Branding&tags=logo,vector`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Comma-separated
    #[serde(default)]
    pub tags: Option<String>,
}

impl From<FilterQuery> for NodeFilter {
    fn from(query: FilterQuery) -> Self {
        let mut filter = NodeFilter::new().with_search(query.search.unwrap_or_default());
        if let Some(category) = query.category.filter(|c| !c.is_empty()) {
            filter = filter.with_category(category);
        }
        for tag in query
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            filter = filter.with_tag(tag);
        }
        filter
    }
}
