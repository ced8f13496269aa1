use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_server_address, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-backed configuration for tools embedding the facade.
///
/// The facade itself is constructed from `(server, site)` directly; this
/// exists so deployment tooling can keep those in a TOML file with
/// `${VAR}` environment references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
}

impl AdminConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|logging| logging.verbose)
            .unwrap_or(false)
    }
}

impl Validate for AdminConfig {
    fn validate(&self) -> Result<()> {
        validate_server_address("server.address", &self.server.address)?;
        validate_non_empty_string("site.name", &self.site.name)?;
        Ok(())
    }
}

/// Replace `${VAR_NAME}` references with the environment value; unset
/// variables are left as-is.
fn substitute_env_vars(content: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
