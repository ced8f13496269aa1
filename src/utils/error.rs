use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("store unreachable at {path}: {message}")]
    Connection { path: String, message: String },

    #[error("site '{name}' not found on server")]
    SiteNotFound { name: String },

    #[error("invalid binding token '{token}': missing host:port separator")]
    InvalidBinding { token: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("container {path} has class {class} and cannot hold virtual directories")]
    SchemaMismatch { path: String, class: String },

    #[error("commit failed at {path}: {message}")]
    StoreWrite { path: String, message: String },

    #[error("malformed store response: {message}")]
    Protocol { message: String },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    /// Stable discriminator so callers can branch on the failure kind
    /// without matching the full variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "CONNECTION",
            Self::SiteNotFound { .. } => "SITE_NOT_FOUND",
            Self::InvalidBinding { .. } => "INVALID_BINDING",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::StoreWrite { .. } => "STORE_WRITE",
            Self::Protocol { .. } => "PROTOCOL",
            Self::ConfigParse(_) => "CONFIG_PARSE",
            Self::Io(_) => "IO",
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
