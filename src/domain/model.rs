use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::utils::error::{AdminError, Result};

/// Numeric identifier of a site within a server's site collection.
///
/// The store names site nodes by this number; the display name lives in the
/// `ServerComment` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A host-header binding token, `host:port`-shaped.
///
/// Parsing rejects tokens without a `:` separator before any store contact.
/// Comparison is exact-match, ASCII case-insensitive; the original casing is
/// kept for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingToken(String);

impl BindingToken {
    pub fn parse(raw: &str) -> Result<Self> {
        if !raw.contains(':') {
            return Err(AdminError::InvalidBinding {
                token: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for BindingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node classes the facade cares about, plus a catch-all for everything else
/// a real store may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaClass {
    WebService,
    WebServer,
    WebVirtualDir,
    AppPools,
    AppPool,
    Other(String),
}

impl SchemaClass {
    pub fn as_str(&self) -> &str {
        match self {
            Self::WebService => "IIsWebService",
            Self::WebServer => "IIsWebServer",
            Self::WebVirtualDir => "IIsWebVirtualDir",
            Self::AppPools => "IIsApplicationPools",
            Self::AppPool => "IIsApplicationPool",
            Self::Other(name) => name,
        }
    }

    /// Class of a virtual-directory child created under a container of this
    /// class, or `None` if the container cannot hold virtual directories.
    ///
    /// Explicit mapping table; the container check and the child-class
    /// derivation are the same lookup.
    pub fn virtual_dir_child(&self) -> Option<SchemaClass> {
        match self {
            Self::WebServer | Self::WebVirtualDir => Some(Self::WebVirtualDir),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named properties this facade reads or writes on store nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    ServerComment,
    ServerBindings,
    Path,
    AccessScript,
    AppFriendlyName,
    AppIsolated,
    AppRoot,
}

impl PropertyKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServerComment => "ServerComment",
            Self::ServerBindings => "ServerBindings",
            Self::Path => "Path",
            Self::AccessScript => "AccessScript",
            Self::AppFriendlyName => "AppFriendlyName",
            Self::AppIsolated => "AppIsolated",
            Self::AppRoot => "AppRoot",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a store property. Multi-valued properties (the binding
/// collection) are `List`; everything else this facade touches is a single
/// text or flag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Text(s) => vec![s],
            Self::Flag(_) => Vec::new(),
        }
    }
}

/// One child of a store node, as the store enumerates it.
#[derive(Debug, Clone)]
pub struct ChildNode {
    pub name: String,
    pub class: SchemaClass,
    pub properties: HashMap<String, PropertyValue>,
}

impl ChildNode {
    pub fn property(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.properties.get(key.as_str())
    }
}

/// Typed address of a node in the store hierarchy.
///
/// Replaces ad hoc string concatenation: every path the facade touches is
/// built through one of the constructors below.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath {
    server: String,
    segments: Vec<String>,
}

const SERVICE_ROOT: &str = "w3svc";
const APP_POOLS: &str = "AppPools";

impl NodePath {
    /// The server's site-collection container.
    pub fn service(server: &str) -> Self {
        Self {
            server: server.to_string(),
            segments: vec![SERVICE_ROOT.to_string()],
        }
    }

    /// A site node.
    pub fn site(server: &str, id: SiteId) -> Self {
        let mut path = Self::service(server);
        path.segments.push(id.to_string());
        path
    }

    /// A site's root container for virtual directories.
    pub fn site_root(server: &str, id: SiteId) -> Self {
        let mut path = Self::site(server, id);
        path.segments.push("root".to_string());
        path
    }

    /// The server's application-pool container.
    pub fn app_pools(server: &str) -> Self {
        let mut path = Self::service(server);
        path.segments.push(APP_POOLS.to_string());
        path
    }

    pub fn child(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.segments.push(name.to_string());
        path
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Store-relative application-root string for nodes under this path,
    /// e.g. `/LM/w3svc/3/root`.
    pub fn app_root(&self) -> String {
        format!("/LM/{}", self.segments.join("/"))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IIS://{}/{}", self.server, self.segments.join("/"))
    }
}
