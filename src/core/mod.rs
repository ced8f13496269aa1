pub mod admin;
pub mod app_pools;
pub mod bindings;
pub mod connection;
pub mod site;
pub mod vdirs;

pub use crate::domain::model::{BindingToken, SiteId};
pub use crate::domain::ports::MetabaseStore;
pub use crate::utils::error::Result;
