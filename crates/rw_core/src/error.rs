use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::Inference("quota exceeded".to_string());
        assert_eq!(error.to_string(), "Inference error: quota exceeded");

        let error = Error::Storage("HTTP 500 from /articles-latest".to_string());
        assert!(error.to_string().contains("500"));
    }

    #[test]
    fn test_error_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let error: Error = parse.unwrap_err().into();
        assert!(matches!(error, Error::Serialization(_)));
    }
}
