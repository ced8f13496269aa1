use crate::domain::model::{ChildNode, NodePath, PropertyKey, PropertyValue, SchemaClass};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Opaque handle to an open node in the store.
///
/// Handles are issued by [`MetabaseStore::connect`] and [`add_child`] and must
/// be given back through [`release`]; `core::connection::ScopedNode` enforces
/// that on every exit path.
///
/// [`add_child`]: MetabaseStore::add_child
/// [`release`]: MetabaseStore::release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreHandle {
    id: u64,
    path: NodePath,
}

impl StoreHandle {
    pub fn new(id: u64, path: NodePath) -> Self {
        Self { id, path }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }
}

impl fmt::Display for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.id)
    }
}

/// Port to the remote hierarchical configuration store.
///
/// The concrete transport (directory-service binding, authentication, RPC) is
/// an external collaborator; implementations of this trait wrap it, and tests
/// inject `adapters::memory::MemoryStore` instead.
#[async_trait]
pub trait MetabaseStore: Send + Sync {
    /// Open a handle to the node at `path`. Fails with
    /// `AdminError::Connection` if the node is unreachable or absent.
    async fn connect(&self, path: &NodePath) -> Result<StoreHandle>;

    /// Give a handle back to the store. Synchronous so it can run in `Drop`.
    fn release(&self, handle: &StoreHandle);

    /// Schema class of the node behind `handle`.
    async fn node_class(&self, handle: &StoreHandle) -> Result<SchemaClass>;

    /// Children of the node, in store enumeration order.
    async fn children(&self, handle: &StoreHandle) -> Result<Vec<ChildNode>>;

    async fn get_property(
        &self,
        handle: &StoreHandle,
        key: PropertyKey,
    ) -> Result<Option<PropertyValue>>;

    async fn set_property(
        &self,
        handle: &StoreHandle,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Result<()>;

    /// Create a child node and return a handle to it. The caller owns the
    /// returned handle and must release it.
    async fn add_child(
        &self,
        parent: &StoreHandle,
        name: &str,
        class: SchemaClass,
    ) -> Result<StoreHandle>;

    async fn remove_child(&self, parent: &StoreHandle, child_name: &str) -> Result<()>;

    /// Flush pending changes on the node. Fails with
    /// `AdminError::StoreWrite` if the store rejects the write.
    async fn commit(&self, handle: &StoreHandle) -> Result<()>;
}
