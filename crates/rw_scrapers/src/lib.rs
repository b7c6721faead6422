pub mod collector;
pub mod link_filter;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod scrapers;
pub mod search;

pub use collector::ReferenceCollector;
pub use link_filter::LinkFilter;
pub use logging::{init_logging, Logger};
pub use metadata::{build_published, extract_metadata, ExtractedMetadata};
pub use pipeline::{Abort, PipelineConfig, PipelineRunner, RunReport, Stage};
pub use scrapers::{ContentScraper, HttpPageFetcher};
pub use search::SerperSearch;

pub mod prelude {
    pub use super::pipeline::{Abort, PipelineConfig, PipelineRunner};
    pub use super::{ContentScraper, LinkFilter, ReferenceCollector};
    pub use rw_core::{Error, Result};
}
