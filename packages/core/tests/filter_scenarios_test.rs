//! Node Filter Scenarios
//!
//! Filter laws checked against nodes that went through the gateway:
//!
//! - an empty filter returns the input unchanged
//! - adding a tag never grows the result (AND)
//! - the search term matches title OR description
//! - the "Logo Design" walkthrough

#[cfg(test)]
mod filter_scenarios_tests {
    use anyhow::Result;
    use folio_core::db::MemoryStore;
    use folio_core::filter::{FilterFacets, FilterQuery, NodeFilter};
    use folio_core::models::{NewNode, Node};
    use folio_core::services::NodeGateway;
    use std::sync::Arc;

    async fn seeded() -> Result<Vec<Node>> {
        let gateway = NodeGateway::new(Arc::new(MemoryStore::new()));
        gateway
            .create(
                NewNode::new("Logo Design", "Brand identity for a bakery", "u1")
                    .with_category("Branding")
                    .with_tags(["logo", "vector"]),
            )
            .await?;
        gateway
            .create(
                NewNode::new("Album Cover", "Hand-drawn logo lettering", "u1")
                    .with_category("Print")
                    .with_tags(["illustration", "logo"]),
            )
            .await?;
        gateway
            .create(
                NewNode::new("Dashboard", "Analytics UI", "u2")
                    .with_category("Web")
                    .with_tags(["ui", "vector"]),
            )
            .await?;
        Ok(gateway.list().await?)
    }

    fn titles(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_identity_law() -> Result<()> {
        let nodes = seeded().await?;
        assert_eq!(NodeFilter::new().apply(&nodes), nodes);
        assert_eq!(NodeFilter::from(FilterQuery::default()).apply(&nodes), nodes);
        Ok(())
    }

    #[tokio::test]
    async fn test_adding_tags_only_narrows() -> Result<()> {
        let nodes = seeded().await?;
        let mut filter = NodeFilter::new();
        let mut previous = nodes.len();

        for tag in ["vector", "logo", "ui"] {
            filter.toggle_tag(tag);
            let count = filter.apply(&nodes).len();
            assert!(count <= previous);
            previous = count;
        }
        assert_eq!(previous, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_or_versus_tag_and() -> Result<()> {
        let nodes = seeded().await?;

        // "logo" is in one title and one description: OR keeps both
        let by_search = NodeFilter::new().with_search("LOGO").apply(&nodes);
        assert_eq!(titles(&by_search), vec!["Logo Design", "Album Cover"]);

        // Both tags required
        let by_tags = NodeFilter::new()
            .with_tag("logo")
            .with_tag("vector")
            .apply(&nodes);
        assert_eq!(titles(&by_tags), vec!["Logo Design"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_logo_design_walkthrough() -> Result<()> {
        let nodes = seeded().await?;
        let facets = FilterFacets::from_nodes(&nodes);
        assert_eq!(facets.categories, vec!["Branding", "Print", "Web"]);
        assert_eq!(facets.tags, vec!["logo", "vector", "illustration", "ui"]);

        let mut filter = NodeFilter::new();
        filter.set_search_term("logo");
        assert_eq!(filter.apply(&nodes).len(), 2);

        filter.set_category(Some("Branding".to_string()));
        assert_eq!(titles(&filter.apply(&nodes)), vec!["Logo Design"]);

        filter.toggle_tag("vector");
        assert_eq!(filter.active_count(), 2);
        assert_eq!(titles(&filter.apply(&nodes)), vec!["Logo Design"]);

        filter.clear();
        assert_eq!(filter.apply(&nodes).len(), 3);
        Ok(())
    }
}
