use crate::core::connection::ScopedNode;
use crate::core::site::SiteHandle;
use crate::domain::model::{PropertyKey, PropertyValue, SchemaClass};
use crate::domain::ports::MetabaseStore;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_non_empty_string;

/// Lists, creates and removes virtual directories under a site's root
/// container.
pub struct VirtualDirManager<'a> {
    store: &'a dyn MetabaseStore,
}

impl<'a> VirtualDirManager<'a> {
    pub fn new(store: &'a dyn MetabaseStore) -> Self {
        Self { store }
    }

    /// Names of the root container's children filtered to the
    /// virtual-directory class, in store enumeration order.
    pub async fn list(&self, site: &SiteHandle) -> Result<Vec<String>> {
        let root = ScopedNode::open(self.store, site.root()).await?;
        let children = self.store.children(root.handle()).await?;
        Ok(children
            .into_iter()
            .filter(|child| child.class == SchemaClass::WebVirtualDir)
            .map(|child| child.name)
            .collect())
    }

    /// Create a virtual directory named `name` mapping to `physical_path`,
    /// configured as an isolated application with script access.
    ///
    /// The child node's class comes from the container's class via the
    /// explicit mapping table; a container outside the table is a
    /// `SchemaMismatch`. No duplicate-name check is made here; name
    /// collisions are the store's to reject.
    pub async fn create(
        &self,
        site: &SiteHandle,
        name: &str,
        physical_path: &str,
    ) -> Result<()> {
        validate_non_empty_string("virtual directory name", name)?;
        validate_non_empty_string("physical path", physical_path)?;

        let root = ScopedNode::open(self.store, site.root()).await?;

        let container_class = self.store.node_class(root.handle()).await?;
        let child_class =
            container_class
                .virtual_dir_child()
                .ok_or_else(|| AdminError::SchemaMismatch {
                    path: site.root().to_string(),
                    class: container_class.to_string(),
                })?;

        let handle = self
            .store
            .add_child(root.handle(), name, child_class)
            .await?;
        let vdir = ScopedNode::adopt(self.store, handle);

        let properties = [
            (PropertyKey::Path, PropertyValue::Text(physical_path.to_string())),
            (PropertyKey::AccessScript, PropertyValue::Flag(true)),
            // Required for the directory to be promoted to an application.
            (PropertyKey::AppFriendlyName, PropertyValue::Text(name.to_string())),
            (PropertyKey::AppIsolated, PropertyValue::Text("1".to_string())),
            (PropertyKey::AppRoot, PropertyValue::Text(site.root().app_root())),
        ];
        for (key, value) in properties {
            self.store.set_property(vdir.handle(), key, value).await?;
        }

        self.store.commit(vdir.handle()).await?;
        tracing::info!(site = %site.id(), name, physical_path, "created virtual directory");
        Ok(())
    }

    /// Remove the virtual directory whose name matches `name`
    /// case-insensitively. Returns `Ok(false)` when no such child exists.
    pub async fn remove(&self, site: &SiteHandle, name: &str) -> Result<bool> {
        let root = ScopedNode::open(self.store, site.root()).await?;
        let children = self.store.children(root.handle()).await?;

        let found = children.into_iter().find(|child| {
            child.class == SchemaClass::WebVirtualDir && child.name.eq_ignore_ascii_case(name)
        });
        let Some(child) = found else {
            tracing::debug!(site = %site.id(), name, "virtual directory not present");
            return Ok(false);
        };

        self.store.remove_child(root.handle(), &child.name).await?;
        self.store.commit(root.handle()).await?;
        tracing::info!(site = %site.id(), name = %child.name, "removed virtual directory");
        Ok(true)
    }
}
