use std::fmt;

pub mod models;
pub mod rewriter;

pub const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use super::rewriter::{parse_response, ReferencePolicy, Rewriter};
    pub use rw_core::{CompletionModel, CompletionRequest, Error, Result, RewriteResult};
}

pub use models::create_model;
pub use rewriter::{parse_response, ReferencePolicy, Rewriter};
