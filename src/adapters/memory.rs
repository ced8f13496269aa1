//! In-memory store fake.
//!
//! Backs tests and local experimentation with the same contract the real
//! remote transport would implement. Children are kept in insertion order so
//! fixtures pin the enumeration order the resolution logic depends on, and
//! the store counts contacts, open handles and commits so tests can assert
//! the short-circuit and release disciplines.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::model::{
    ChildNode, NodePath, PropertyKey, PropertyValue, SchemaClass, SiteId,
};
use crate::domain::ports::{MetabaseStore, StoreHandle};
use crate::utils::error::{AdminError, Result};

#[derive(Debug, Clone)]
struct Node {
    class: SchemaClass,
    properties: HashMap<String, PropertyValue>,
    children: Vec<(String, Node)>,
}

impl Node {
    fn new(class: SchemaClass) -> Self {
        Self {
            class,
            properties: HashMap::new(),
            children: Vec::new(),
        }
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|(child_name, _)| child_name.eq_ignore_ascii_case(name))
            .map(|(_, node)| node)
    }
}

#[derive(Debug, Default)]
struct Inner {
    servers: HashMap<String, Node>,
    handles: HashMap<u64, NodePath>,
    next_handle: u64,
    contacts: u64,
    commits: u64,
    fail_commits: bool,
}

/// In-memory implementation of [`MetabaseStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a server with an empty site collection and app-pool
    /// container.
    pub fn add_server(&self, address: &str) {
        let mut inner = self.inner.lock().unwrap();
        let mut service = Node::new(SchemaClass::WebService);
        service
            .children
            .push(("AppPools".to_string(), Node::new(SchemaClass::AppPools)));
        let mut computer = Node::new(SchemaClass::Other("IIsComputer".to_string()));
        computer.children.push(("w3svc".to_string(), service));
        inner.servers.insert(address.to_string(), computer);
    }

    /// Register a site with its display name, initial bindings and an empty
    /// root container. Sites appear in registration order.
    pub fn add_site(&self, server: &str, id: SiteId, display_name: &str, bindings: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        let service = inner
            .servers
            .get_mut(server)
            .and_then(|computer| computer.child_mut("w3svc"))
            .expect("server not registered");

        let mut site = Node::new(SchemaClass::WebServer);
        site.properties.insert(
            PropertyKey::ServerComment.as_str().to_string(),
            PropertyValue::Text(display_name.to_string()),
        );
        site.properties.insert(
            PropertyKey::ServerBindings.as_str().to_string(),
            PropertyValue::List(bindings.iter().map(|b| b.to_string()).collect()),
        );
        site.children
            .push(("root".to_string(), Node::new(SchemaClass::WebVirtualDir)));
        service.children.push((id.to_string(), site));
    }

    /// Register a child node under a site's root container with an
    /// arbitrary class, for schema-mismatch and filtering fixtures.
    pub fn add_site_root_child(&self, server: &str, id: SiteId, name: &str, class: SchemaClass) {
        let mut inner = self.inner.lock().unwrap();
        let root = inner
            .servers
            .get_mut(server)
            .and_then(|computer| computer.child_mut("w3svc"))
            .and_then(|service| service.child_mut(&id.to_string()))
            .and_then(|site| site.child_mut("root"))
            .expect("site not registered");
        root.children.push((name.to_string(), Node::new(class)));
    }

    /// Override the class of a site's root container, for schema-mismatch
    /// fixtures.
    pub fn set_site_root_class(&self, server: &str, id: SiteId, class: SchemaClass) {
        let mut inner = self.inner.lock().unwrap();
        let root = inner
            .servers
            .get_mut(server)
            .and_then(|computer| computer.child_mut("w3svc"))
            .and_then(|service| service.child_mut(&id.to_string()))
            .and_then(|site| site.child_mut("root"))
            .expect("site not registered");
        root.class = class;
    }

    pub fn add_app_pool(&self, server: &str, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        let pools = inner
            .servers
            .get_mut(server)
            .and_then(|computer| computer.child_mut("w3svc"))
            .and_then(|service| service.child_mut("AppPools"))
            .expect("server not registered");
        pools
            .children
            .push((name.to_string(), Node::new(SchemaClass::AppPool)));
    }

    /// Make every subsequent commit fail with a write error.
    pub fn fail_commits(&self, fail: bool) {
        self.inner.lock().unwrap().fail_commits = fail;
    }

    /// Number of `connect` calls made against this store.
    pub fn contact_count(&self) -> u64 {
        self.inner.lock().unwrap().contacts
    }

    /// Handles issued but not yet released.
    pub fn open_handles(&self) -> usize {
        self.inner.lock().unwrap().handles.len()
    }

    pub fn commit_count(&self) -> u64 {
        self.inner.lock().unwrap().commits
    }

    fn resolve_handle(inner: &Inner, handle: &StoreHandle) -> Result<NodePath> {
        inner
            .handles
            .get(&handle.id())
            .cloned()
            .ok_or_else(|| AdminError::Protocol {
                message: format!("handle {} is not open", handle),
            })
    }
}

fn node_at<'a>(inner: &'a mut Inner, path: &NodePath) -> Option<&'a mut Node> {
    let mut node = inner.servers.get_mut(path.server())?;
    for segment in path.segments() {
        node = node.child_mut(segment)?;
    }
    Some(node)
}

fn unreachable_error(path: &NodePath) -> AdminError {
    AdminError::Connection {
        path: path.to_string(),
        message: "no such node".to_string(),
    }
}

#[async_trait]
impl MetabaseStore for MemoryStore {
    async fn connect(&self, path: &NodePath) -> Result<StoreHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.contacts += 1;
        if node_at(&mut inner, path).is_none() {
            return Err(unreachable_error(path));
        }
        inner.next_handle += 1;
        let id = inner.next_handle;
        inner.handles.insert(id, path.clone());
        Ok(StoreHandle::new(id, path.clone()))
    }

    fn release(&self, handle: &StoreHandle) {
        self.inner.lock().unwrap().handles.remove(&handle.id());
    }

    async fn node_class(&self, handle: &StoreHandle) -> Result<SchemaClass> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, handle)?;
        let node = node_at(&mut inner, &path).ok_or_else(|| unreachable_error(&path))?;
        Ok(node.class.clone())
    }

    async fn children(&self, handle: &StoreHandle) -> Result<Vec<ChildNode>> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, handle)?;
        let node = node_at(&mut inner, &path).ok_or_else(|| unreachable_error(&path))?;
        Ok(node
            .children
            .iter()
            .map(|(name, child)| ChildNode {
                name: name.clone(),
                class: child.class.clone(),
                properties: child.properties.clone(),
            })
            .collect())
    }

    async fn get_property(
        &self,
        handle: &StoreHandle,
        key: PropertyKey,
    ) -> Result<Option<PropertyValue>> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, handle)?;
        let node = node_at(&mut inner, &path).ok_or_else(|| unreachable_error(&path))?;
        Ok(node.properties.get(key.as_str()).cloned())
    }

    async fn set_property(
        &self,
        handle: &StoreHandle,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, handle)?;
        let node = node_at(&mut inner, &path).ok_or_else(|| unreachable_error(&path))?;
        node.properties.insert(key.as_str().to_string(), value);
        Ok(())
    }

    async fn add_child(
        &self,
        parent: &StoreHandle,
        name: &str,
        class: SchemaClass,
    ) -> Result<StoreHandle> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, parent)?;
        let node = node_at(&mut inner, &path).ok_or_else(|| unreachable_error(&path))?;
        if node.child_mut(name).is_some() {
            return Err(AdminError::StoreWrite {
                path: path.child(name).to_string(),
                message: "child already exists".to_string(),
            });
        }
        node.children.push((name.to_string(), Node::new(class)));

        let child_path = path.child(name);
        inner.next_handle += 1;
        let id = inner.next_handle;
        inner.handles.insert(id, child_path.clone());
        Ok(StoreHandle::new(id, child_path))
    }

    async fn remove_child(&self, parent: &StoreHandle, child_name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, parent)?;
        let node = node_at(&mut inner, &path).ok_or_else(|| unreachable_error(&path))?;
        let position = node
            .children
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(child_name))
            .ok_or_else(|| unreachable_error(&path.child(child_name)))?;
        node.children.remove(position);
        Ok(())
    }

    async fn commit(&self, handle: &StoreHandle) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let path = Self::resolve_handle(&inner, handle)?;
        if inner.fail_commits {
            return Err(AdminError::StoreWrite {
                path: path.to_string(),
                message: "commit rejected".to_string(),
            });
        }
        inner.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_unknown_path_is_connection_error() {
        let store = MemoryStore::new();
        store.add_server("WEB01");

        let err = store
            .connect(&NodePath::service("WEB02"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CONNECTION");
        assert_eq!(store.contact_count(), 1);
    }

    #[tokio::test]
    async fn test_handles_are_tracked_until_released() {
        let store = MemoryStore::new();
        store.add_server("WEB01");

        let handle = store.connect(&NodePath::service("WEB01")).await.unwrap();
        assert_eq!(store.open_handles(), 1);
        store.release(&handle);
        assert_eq!(store.open_handles(), 0);

        let err = store.children(&handle).await.unwrap_err();
        assert_eq!(err.kind(), "PROTOCOL");
    }

    #[tokio::test]
    async fn test_children_keep_registration_order() {
        let store = MemoryStore::new();
        store.add_server("WEB01");
        store.add_site("WEB01", SiteId(1), "First", &[]);
        store.add_site("WEB01", SiteId(2), "Second", &[]);

        let handle = store.connect(&NodePath::service("WEB01")).await.unwrap();
        let names: Vec<String> = store
            .children(&handle)
            .await
            .unwrap()
            .into_iter()
            .map(|child| child.name)
            .collect();
        store.release(&handle);

        assert_eq!(names, vec!["AppPools", "1", "2"]);
    }
}
