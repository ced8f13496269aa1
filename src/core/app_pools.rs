use crate::core::connection::ScopedNode;
use crate::domain::model::NodePath;
use crate::domain::ports::MetabaseStore;
use crate::utils::error::Result;

/// Lookup over the server's pre-existing application pools. Read-only:
/// pool creation and configuration are out of scope.
pub struct AppPoolRegistry<'a> {
    store: &'a dyn MetabaseStore,
    server: &'a str,
}

impl<'a> AppPoolRegistry<'a> {
    pub fn new(store: &'a dyn MetabaseStore, server: &'a str) -> Self {
        Self { store, server }
    }

    /// Trimmed, case-insensitive comparison against the pool container's
    /// children.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.find(name).await?.is_some())
    }

    /// The matched pool's stored name, or `None` if no pool matches.
    pub async fn open(&self, name: &str) -> Result<Option<String>> {
        self.find(name).await
    }

    async fn find(&self, name: &str) -> Result<Option<String>> {
        let wanted = name.trim();
        let pools = ScopedNode::open(self.store, &NodePath::app_pools(self.server)).await?;
        let children = self.store.children(pools.handle()).await?;
        Ok(children
            .into_iter()
            .find(|child| child.name.trim().eq_ignore_ascii_case(wanted))
            .map(|child| child.name))
    }
}
