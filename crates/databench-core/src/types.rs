//! Backend service enumeration.
//!
//! The console talks to a small, fixed set of backend services. Enumerating
//! them keeps service names and default ports consistent across client crates
//! and log output.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Backend services the console integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendService {
    /// Image directory service (owns image records and their sharing state)
    ImageDirectory,
    /// Provisioning service (executes long-running infrastructure actions)
    Provisioning,
}

impl BackendService {
    /// Returns the service name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ImageDirectory => "image-directory",
            Self::Provisioning => "provisioning",
        }
    }

    /// Returns all known services.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::ImageDirectory, Self::Provisioning]
    }

    /// Returns the default port for the service.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        DEFAULT_HTTP_PORT
    }
}

impl FromStr for BackendService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "image-directory" => Ok(Self::ImageDirectory),
            "provisioning" => Ok(Self::Provisioning),
            _ => Err(Error::InvalidRequest(format!("Unknown service: {s}"))),
        }
    }
}

impl std::fmt::Display for BackendService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
