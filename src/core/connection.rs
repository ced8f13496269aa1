use crate::domain::model::NodePath;
use crate::domain::ports::{MetabaseStore, StoreHandle};
use crate::utils::error::Result;

/// Scoped connection to one store node.
///
/// Opens a handle on construction and releases it when dropped, so every
/// exit path (including `?` propagation) gives the handle back to the store.
pub struct ScopedNode<'a> {
    store: &'a dyn MetabaseStore,
    handle: Option<StoreHandle>,
}

impl<'a> ScopedNode<'a> {
    pub async fn open(store: &'a dyn MetabaseStore, path: &NodePath) -> Result<ScopedNode<'a>> {
        let handle = store.connect(path).await?;
        tracing::trace!(node = %handle, "opened store node");
        Ok(Self {
            store,
            handle: Some(handle),
        })
    }

    /// Wrap an already-issued handle (e.g. from `add_child`) so it is
    /// released on scope exit.
    pub fn adopt(store: &'a dyn MetabaseStore, handle: StoreHandle) -> ScopedNode<'a> {
        Self {
            store,
            handle: Some(handle),
        }
    }

    pub fn handle(&self) -> &StoreHandle {
        // Only None after Drop has run.
        self.handle.as_ref().unwrap()
    }
}

impl Drop for ScopedNode<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::trace!(node = %handle, "released store node");
            self.store.release(&handle);
        }
    }
}
