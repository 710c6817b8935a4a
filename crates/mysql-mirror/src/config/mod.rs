//! Configuration and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;

impl MirrorConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}
