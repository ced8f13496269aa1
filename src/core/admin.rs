use std::sync::Arc;

use crate::core::app_pools::AppPoolRegistry;
use crate::core::bindings::BindingManager;
use crate::core::site::{SiteHandle, SiteResolver};
use crate::core::vdirs::VirtualDirManager;
use crate::domain::model::{BindingToken, SiteId};
use crate::domain::ports::MetabaseStore;
use crate::utils::error::Result;

/// Management facade for one site on one server.
///
/// Keyed by `(server address, site display name)`; the store client is
/// injected so tests can run against a fake. Every public operation
/// re-resolves the site id from the display name before touching the store —
/// nothing is cached across calls, so concurrent external mutation of the
/// store can make consecutive calls observe different ids.
///
/// Operations are blocking with respect to the remote store and are awaited
/// sequentially; no internal locking is done. The binding mutations rewrite
/// the whole collection, so writers to the same site must be serialized
/// externally.
pub struct SiteAdmin {
    store: Arc<dyn MetabaseStore>,
    server: String,
    site_name: String,
}

impl SiteAdmin {
    pub fn new(
        store: Arc<dyn MetabaseStore>,
        server: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            server: server.into(),
            site_name: site_name.into(),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Numeric id of the site, resolved by display name.
    pub async fn resolve_site_id(&self) -> Result<SiteId> {
        Ok(self.resolve().await?.id())
    }

    /// Add a host-header binding. `Ok(false)` if it is already present.
    /// The token is validated before any store contact.
    pub async fn add_binding(&self, token: &str) -> Result<bool> {
        let token = BindingToken::parse(token)?;
        let site = self.resolve().await?;
        BindingManager::new(self.store.as_ref())
            .add(&site, &token)
            .await
    }

    /// Remove a host-header binding. `Ok(false)` if it is not present.
    pub async fn remove_binding(&self, token: &str) -> Result<bool> {
        let token = BindingToken::parse(token)?;
        let site = self.resolve().await?;
        BindingManager::new(self.store.as_ref())
            .remove(&site, &token)
            .await
    }

    /// Bindings in the store's native collection order.
    pub async fn list_bindings(&self) -> Result<Vec<String>> {
        let site = self.resolve().await?;
        BindingManager::new(self.store.as_ref()).list(&site).await
    }

    pub async fn binding_exists(&self, token: &str) -> Result<bool> {
        let token = BindingToken::parse(token)?;
        let site = self.resolve().await?;
        BindingManager::new(self.store.as_ref())
            .exists(&site, &token)
            .await
    }

    /// Virtual-directory names under the site root, in store order.
    pub async fn list_virtual_dirs(&self) -> Result<Vec<String>> {
        let site = self.resolve().await?;
        VirtualDirManager::new(self.store.as_ref()).list(&site).await
    }

    /// Create an isolated virtual-directory application under the site root.
    pub async fn create_virtual_dir(&self, name: &str, physical_path: &str) -> Result<()> {
        let site = self.resolve().await?;
        VirtualDirManager::new(self.store.as_ref())
            .create(&site, name, physical_path)
            .await
    }

    /// Remove a virtual directory by case-insensitive name match.
    /// `Ok(false)` if no such directory exists.
    pub async fn remove_virtual_dir(&self, name: &str) -> Result<bool> {
        let site = self.resolve().await?;
        VirtualDirManager::new(self.store.as_ref())
            .remove(&site, name)
            .await
    }

    pub async fn app_pool_exists(&self, name: &str) -> Result<bool> {
        AppPoolRegistry::new(self.store.as_ref(), &self.server)
            .exists(name)
            .await
    }

    /// Stored name of the matched pool, or `None` if absent.
    pub async fn open_app_pool(&self, name: &str) -> Result<Option<String>> {
        AppPoolRegistry::new(self.store.as_ref(), &self.server)
            .open(name)
            .await
    }

    async fn resolve(&self) -> Result<SiteHandle> {
        SiteResolver::new(self.store.as_ref(), &self.server)
            .resolve(&self.site_name)
            .await
    }
}
