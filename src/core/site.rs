use crate::core::connection::ScopedNode;
use crate::domain::model::{NodePath, PropertyKey, SchemaClass, SiteId};
use crate::domain::ports::MetabaseStore;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_non_empty_string;

/// A site resolved once for the duration of one logical operation.
///
/// Carries the numeric id and pre-built paths so the managers never rebuild
/// addressing by hand. Not cached across facade calls: each public operation
/// resolves a fresh handle.
#[derive(Debug, Clone)]
pub struct SiteHandle {
    id: SiteId,
    site_path: NodePath,
    root_path: NodePath,
}

impl SiteHandle {
    pub fn id(&self) -> SiteId {
        self.id
    }

    /// The site node itself (binding collection lives here).
    pub fn path(&self) -> &NodePath {
        &self.site_path
    }

    /// The site's root container for virtual directories.
    pub fn root(&self) -> &NodePath {
        &self.root_path
    }
}

/// Maps a site's display name to its numeric id within a server's site
/// collection.
pub struct SiteResolver<'a> {
    store: &'a dyn MetabaseStore,
    server: &'a str,
}

impl<'a> SiteResolver<'a> {
    pub fn new(store: &'a dyn MetabaseStore, server: &'a str) -> Self {
        Self { store, server }
    }

    /// Linear scan over the server's site collection; the first
    /// case-insensitive match on the `ServerComment` display name wins.
    /// Ties between sites sharing a display name are broken by store
    /// enumeration order. Only `WebServer`-class children are considered.
    pub async fn resolve(&self, site_name: &str) -> Result<SiteHandle> {
        validate_non_empty_string("site name", site_name)?;

        let service = ScopedNode::open(self.store, &NodePath::service(self.server)).await?;

        for child in self.store.children(service.handle()).await? {
            if child.class != SchemaClass::WebServer {
                continue;
            }
            let display_name = child
                .property(PropertyKey::ServerComment)
                .and_then(|value| value.as_text());
            match display_name {
                Some(name) if name.eq_ignore_ascii_case(site_name) => {
                    let id = parse_site_id(&child.name)?;
                    tracing::debug!(site = site_name, %id, "resolved site");
                    return Ok(SiteHandle {
                        id,
                        site_path: NodePath::site(self.server, id),
                        root_path: NodePath::site_root(self.server, id),
                    });
                }
                _ => {}
            }
        }

        Err(AdminError::SiteNotFound {
            name: site_name.to_string(),
        })
    }
}

/// Site nodes are named by their numeric id; anything else is a store
/// protocol breach, not a lookup miss.
fn parse_site_id(node_name: &str) -> Result<SiteId> {
    node_name
        .parse::<u32>()
        .map(SiteId)
        .map_err(|_| AdminError::Protocol {
            message: format!("site node name '{}' is not a numeric id", node_name),
        })
}
