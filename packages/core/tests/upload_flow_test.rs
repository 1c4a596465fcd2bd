//! Upload Flow Tests
//!
//! The full "bytes → object store → URL → node" path on in-memory backends:
//!
//! - an uploaded URL parses back to the exact stored path and deletes it
//! - oversized or non-image files are refused before anything is stored
//! - a blob whose node link fails stays in storage
//! - deleting a node leaves its images in storage

#[cfg(test)]
mod upload_flow_tests {
    use anyhow::Result;
    use folio_core::config::UploadConfig;
    use folio_core::db::MemoryStore;
    use folio_core::models::{ImageFile, NewNode, MAX_IMAGE_BYTES};
    use folio_core::services::{
        AssetGateway, GatewayError, NodeGateway, UploadError, UploadOrchestrator,
    };
    use folio_core::storage::{object_path_from_url, MemoryObjectStore};
    use std::sync::Arc;

    struct Harness {
        nodes: NodeGateway,
        objects: Arc<MemoryObjectStore>,
        orchestrator: UploadOrchestrator,
    }

    fn harness() -> Harness {
        let nodes = NodeGateway::new(Arc::new(MemoryStore::new()));
        let objects = Arc::new(MemoryObjectStore::default());
        let orchestrator = UploadOrchestrator::new(
            nodes.clone(),
            AssetGateway::new(objects.clone()),
            UploadConfig {
                tick_ms: 5,
                ..Default::default()
            },
        );
        Harness {
            nodes,
            objects,
            orchestrator,
        }
    }

    fn jpeg(name: &str, size: usize) -> ImageFile {
        ImageFile::new(name, "image/jpeg", vec![0xFFu8; size])
    }

    #[tokio::test]
    async fn test_uploaded_url_inverts_to_stored_path() -> Result<()> {
        let h = harness();
        let node_id = h.nodes.create(NewNode::new("t", "d", "u")).await?;

        let uploaded = h
            .orchestrator
            .add_image_and_wait(&node_id, jpeg("café menu #2.jpg", 128))
            .await?;

        let path = object_path_from_url(&uploaded.image_url)?;
        assert!(path.starts_with(&format!("nodes/{}/images/", node_id)));
        assert!(path.ends_with("_café menu #2.jpg"));
        assert!(h.objects.contains(&path).await);

        h.orchestrator
            .remove_image(&node_id, &uploaded.image_url)
            .await?;
        assert!(!h.objects.contains(&path).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_eight_mib_file_rejected_before_any_call() -> Result<()> {
        let h = harness();
        let node_id = h.nodes.create(NewNode::new("t", "d", "u")).await?;

        let result = h
            .orchestrator
            .add_image(&node_id, jpeg("huge.jpg", 8 * 1024 * 1024))
            .await;

        match result {
            Err(UploadError::TooLarge { size, limit }) => {
                assert_eq!(size, 8 * 1024 * 1024);
                assert_eq!(limit, MAX_IMAGE_BYTES);
            }
            Err(other) => panic!("Expected TooLarge, got {:?}", other),
            Ok(_) => panic!("Expected TooLarge, got a ticket"),
        }
        assert!(h.objects.is_empty().await);
        assert!(h.orchestrator.registry().is_empty().await);
        assert!(h.nodes.get_by_id(&node_id).await?.images.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_exactly_five_mib_is_accepted() -> Result<()> {
        let h = harness();
        let node_id = h.nodes.create(NewNode::new("t", "d", "u")).await?;

        h.orchestrator
            .add_image_and_wait(&node_id, jpeg("max.jpg", MAX_IMAGE_BYTES as usize))
            .await?;
        assert_eq!(h.nodes.get_by_id(&node_id).await?.images.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_blob_kept_when_node_link_fails() -> Result<()> {
        let h = harness();

        let err = h
            .orchestrator
            .add_image_and_wait("no-such-node", jpeg("a.jpg", 16))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Gateway(GatewayError::Failed(_))));
        assert_eq!(h.objects.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_node_delete_leaves_images_in_storage() -> Result<()> {
        let h = harness();
        let node_id = h.nodes.create(NewNode::new("t", "d", "u")).await?;
        h.orchestrator
            .add_image_and_wait(&node_id, jpeg("a.jpg", 16))
            .await?;

        h.nodes.delete(&node_id).await?;
        assert_eq!(h.objects.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_ends_at_100_and_inactive() -> Result<()> {
        let h = harness();
        let node_id = h.nodes.create(NewNode::new("t", "d", "u")).await?;

        let ticket = h.orchestrator.add_image(&node_id, jpeg("a.jpg", 16)).await?;
        let mut progress = ticket.progress();
        ticket.finish().await?;

        let last = *progress.borrow_and_update();
        assert_eq!(last.percent, 100);
        assert!(!last.uploading);
        Ok(())
    }
}
