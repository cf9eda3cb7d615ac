//! Read operations on nodes.

use ogm_core::PropertyMap;

use crate::access::{FindOptions, NodeAccess};
use crate::client::GraphError;
use crate::statements;

impl NodeAccess {
    // ── Single Node Lookups ──────────────────────────────────────

    /// Get a node's properties by `_id`, or `None` if it does not exist.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<PropertyMap>, GraphError> {
        self.lookup(None, id).await
    }

    /// Like [`find_by_id`](Self::find_by_id), but only matches a node
    /// carrying `label`.
    pub async fn find_labeled_by_id(
        &self,
        label: &str,
        id: &str,
    ) -> Result<Option<PropertyMap>, GraphError> {
        self.lookup(Some(label), id).await
    }

    async fn lookup(&self, label: Option<&str>, id: &str) -> Result<Option<PropertyMap>, GraphError> {
        let statement = statements::find_by_id(label, id)?;
        let result = self
            .execute(&statement, None)
            .await
            .map(|r| r.first_properties());
        self.absorb(result, None, || None)
    }

    // ── Filtered Queries ─────────────────────────────────────────

    /// Find nodes by optional label and exact-match filter.
    ///
    /// Never returns `None`: no matches (or an absorbed failure) is an
    /// empty vector.
    pub async fn find_nodes(&self, options: &FindOptions) -> Result<Vec<PropertyMap>, GraphError> {
        let statement = statements::find_nodes(
            options.label.as_deref(),
            &options.filter,
            options.skip,
            options.limit,
        )?;
        let logging = options.logging.as_ref();

        let result = self
            .execute(&statement, logging)
            .await
            .map(|r| r.into_properties());
        self.absorb(result, logging, Vec::new)
    }
}
