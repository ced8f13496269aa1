pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::MemoryStore;
pub use config::AdminConfig;
pub use core::admin::SiteAdmin;
pub use domain::model::{BindingToken, NodePath, PropertyKey, PropertyValue, SchemaClass, SiteId};
pub use domain::ports::{MetabaseStore, StoreHandle};
pub use utils::error::{AdminError, Result};
