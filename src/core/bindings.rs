use crate::core::connection::ScopedNode;
use crate::core::site::SiteHandle;
use crate::domain::model::{BindingToken, PropertyKey, PropertyValue};
use crate::domain::ports::MetabaseStore;
use crate::utils::error::Result;

/// Maintains the host-header binding collection on a resolved site.
///
/// Match policy: exact token match, ASCII case-insensitive, applied
/// uniformly to existence checks, duplicate detection on add, and removal.
/// Stored tokens keep the caller's casing.
///
/// Add and remove read the whole collection and write it back wholesale,
/// then commit. Not atomic against concurrent writers on the same site;
/// serialization must be imposed externally.
pub struct BindingManager<'a> {
    store: &'a dyn MetabaseStore,
}

impl<'a> BindingManager<'a> {
    pub fn new(store: &'a dyn MetabaseStore) -> Self {
        Self { store }
    }

    /// Bindings in the store's native collection order. After interleaved
    /// add/remove this need not equal historical add order.
    pub async fn list(&self, site: &SiteHandle) -> Result<Vec<String>> {
        let node = ScopedNode::open(self.store, site.path()).await?;
        self.read_collection(&node).await
    }

    pub async fn exists(&self, site: &SiteHandle, token: &BindingToken) -> Result<bool> {
        let node = ScopedNode::open(self.store, site.path()).await?;
        let bindings = self.read_collection(&node).await?;
        Ok(bindings.iter().any(|b| token.matches(b)))
    }

    /// Append `token` to the site's binding collection. Returns `Ok(false)`
    /// without mutation when the token is already present.
    pub async fn add(&self, site: &SiteHandle, token: &BindingToken) -> Result<bool> {
        let node = ScopedNode::open(self.store, site.path()).await?;
        let mut bindings = self.read_collection(&node).await?;

        if bindings.iter().any(|b| token.matches(b)) {
            tracing::debug!(site = %site.id(), %token, "binding already present");
            return Ok(false);
        }

        bindings.push(token.as_str().to_string());
        self.write_collection(&node, bindings).await?;
        tracing::info!(site = %site.id(), %token, "added binding");
        Ok(true)
    }

    /// Remove `token` from the collection. Returns `Ok(false)` without
    /// mutation when the token is not present.
    pub async fn remove(&self, site: &SiteHandle, token: &BindingToken) -> Result<bool> {
        let node = ScopedNode::open(self.store, site.path()).await?;
        let mut bindings = self.read_collection(&node).await?;

        let Some(position) = bindings.iter().position(|b| token.matches(b)) else {
            tracing::debug!(site = %site.id(), %token, "binding not present");
            return Ok(false);
        };

        bindings.remove(position);
        self.write_collection(&node, bindings).await?;
        tracing::info!(site = %site.id(), %token, "removed binding");
        Ok(true)
    }

    async fn read_collection(&self, node: &ScopedNode<'_>) -> Result<Vec<String>> {
        let value = self
            .store
            .get_property(node.handle(), PropertyKey::ServerBindings)
            .await?;
        Ok(value.map(PropertyValue::into_list).unwrap_or_default())
    }

    async fn write_collection(&self, node: &ScopedNode<'_>, bindings: Vec<String>) -> Result<()> {
        self.store
            .set_property(
                node.handle(),
                PropertyKey::ServerBindings,
                PropertyValue::List(bindings),
            )
            .await?;
        self.store.commit(node.handle()).await
    }
}
