//! Selectable values derived from a node list

use crate::models::Node;
use serde::Serialize;
use std::collections::HashSet;

/// Distinct categories and tags, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterFacets {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl FilterFacets {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut seen_categories = HashSet::new();
        let mut seen_tags = HashSet::new();
        let mut facets = Self::default();

        for node in nodes {
            if let Some(category) = node.category.as_deref().filter(|c| !c.is_empty()) {
                if seen_categories.insert(category) {
                    facets.categories.push(category.to_string());
                }
            }
            for tag in &node.tags {
                if seen_tags.insert(tag.as_str()) {
                    facets.tags.push(tag.clone());
                }
            }
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewNode;
    use chrono::Utc;

    #[test]
    fn test_first_seen_order_without_duplicates() {
        let nodes = vec![
            NewNode::new("a", "a", "u")
                .with_category("Print")
                .with_tags(["b", "a"])
                .into_node("1".to_string(), Utc::now()),
            NewNode::new("b", "b", "u")
                .with_tags(["c", "a"])
                .into_node("2".to_string(), Utc::now()),
            NewNode::new("c", "c", "u")
                .with_category("Branding")
                .into_node("3".to_string(), Utc::now()),
            NewNode::new("d", "d", "u")
                .with_category("Print")
                .into_node("4".to_string(), Utc::now()),
        ];

        let facets = FilterFacets::from_nodes(&nodes);
        assert_eq!(facets.categories, vec!["Print", "Branding"]);
        assert_eq!(facets.tags, vec!["b", "a", "c"]);
    }
}
