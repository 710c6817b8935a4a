//! Configuration validation.

use super::{EndpointConfig, MirrorConfig};
use crate::error::{MirrorError, Result};

/// Validate the configuration.
pub fn validate(config: &MirrorConfig) -> Result<()> {
    validate_endpoint("source", &config.source)?;
    validate_endpoint("target", &config.target)?;

    // Copying a table onto itself would duplicate every key
    if config.source.host == config.target.host
        && config.source.port == config.target.port
        && config.source.database == config.target.database
    {
        return Err(MirrorError::Config(
            "source and target cannot be the same database".into(),
        ));
    }

    if config.batch_size == 0 {
        return Err(MirrorError::Config("batch_size must be at least 1".into()));
    }

    Ok(())
}

fn validate_endpoint(side: &str, endpoint: &EndpointConfig) -> Result<()> {
    if endpoint.host.is_empty() {
        return Err(MirrorError::Config(format!("{}.host is required", side)));
    }
    if endpoint.database.is_empty() {
        return Err(MirrorError::Config(format!("{}.database is required", side)));
    }
    if endpoint.user.is_empty() {
        return Err(MirrorError::Config(format!("{}.user is required", side)));
    }
    Ok(())
}
