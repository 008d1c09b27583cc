use std::sync::Arc;

use crate::services::{
    session::WorkflowConfig, Catalog, MetadataClient, MetadataProvider, Workflow,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub workflow: Workflow,
}

impl AppState {
    /// Wires the catalog and a metadata provider into the browsing workflow
    pub fn new(
        catalog: Catalog,
        provider: Arc<dyn MetadataProvider>,
        image_base: impl Into<String>,
        fetch_concurrency: usize,
        config: WorkflowConfig,
    ) -> Self {
        let metadata = MetadataClient::new(provider, image_base, fetch_concurrency);
        Self {
            workflow: Workflow::new(Arc::new(catalog), metadata, config),
        }
    }
}
