use std::sync::Arc;
use rw_core::{CompletionModel, Error, Result};
use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Build a completion backend by name (`openai` or `dummy`).
pub fn create_model(kind: &str, config: Config) -> Result<Arc<dyn CompletionModel>> {
    match kind {
        "openai" => Ok(Arc::new(OpenAiModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model backend: {}. Available: openai, dummy",
            other
        ))),
    }
}
