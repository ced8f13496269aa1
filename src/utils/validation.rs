use crate::utils::error::{AdminError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdminError::InvalidArgument {
            field: field_name.to_string(),
            reason: "value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_server_address(field_name: &str, address: &str) -> Result<()> {
    validate_non_empty_string(field_name, address)?;

    if address.contains(char::is_whitespace) || address.contains('/') {
        return Err(AdminError::InvalidArgument {
            field: field_name.to_string(),
            reason: format!("'{}' is not a host address", address),
        });
    }
    Ok(())
}
