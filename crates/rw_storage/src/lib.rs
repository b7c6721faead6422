use std::sync::Arc;
use std::time::Duration;
use rw_core::{ContentStore, Error, Result};

pub mod backends;

pub use backends::*;

/// Default request timeout for content-store calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Build a content store by backend name (`http` or `memory`).
pub fn create_store(kind: &str, base_url: Option<&str>) -> Result<Arc<dyn ContentStore>> {
    match kind {
        "http" => {
            let url = base_url.ok_or_else(|| {
                Error::Config("the http store needs a content API base URL".to_string())
            })?;
            Ok(Arc::new(HttpStore::new(BackendConfig::new(url))?))
        }
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        other => Err(Error::Config(format!(
            "Unknown store backend: {}. Available: http, memory",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{create_store, BackendConfig};
    pub use super::backends::*;
}
