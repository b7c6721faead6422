use std::fmt;
use std::sync::Arc;
use rw_core::{ArticleId, ContentStore};
use rw_inference::Rewriter;
use thiserror::Error;

use crate::collector::{ReferenceCollector, DEFAULT_LIMIT};
use crate::logging::Logger;
use crate::metadata::build_published;
use crate::scrapers::ContentScraper;

/// A run needs at least this many reference links to continue.
pub const MIN_REFERENCES: usize = 2;

/// Stages of one run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchArticle,
    CollectLinks,
    ScrapeReferences,
    Rewrite,
    DeriveMetadata,
    Publish,
}

impl Stage {
    fn emoji(&self) -> &'static str {
        match self {
            Stage::FetchArticle => "📰",
            Stage::CollectLinks => "🔍",
            Stage::ScrapeReferences => "🦗",
            Stage::Rewrite => "🤖",
            Stage::DeriveMetadata => "🏷️",
            Stage::Publish => "💾",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchArticle => "fetch-article",
            Stage::CollectLinks => "collect-links",
            Stage::ScrapeReferences => "scrape-references",
            Stage::Rewrite => "rewrite",
            Stage::DeriveMetadata => "derive-metadata",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// Why a run ended without publishing.
#[derive(Debug, Error)]
pub enum Abort {
    #[error("could not fetch the latest article: {0}")]
    FetchArticle(#[source] rw_core::Error),

    #[error("found {found} acceptable reference links, need at least {required}")]
    InsufficientLinks { found: usize, required: usize },

    #[error("the rewrite model call failed")]
    RewriteUnavailable,

    #[error("the rewrite produced no content")]
    EmptyRewrite,

    #[error("could not publish the rewritten article: {0}")]
    Publish(#[source] rw_core::Error),
}

impl Abort {
    pub fn stage(&self) -> Stage {
        match self {
            Abort::FetchArticle(_) => Stage::FetchArticle,
            Abort::InsufficientLinks { .. } => Stage::CollectLinks,
            Abort::RewriteUnavailable | Abort::EmptyRewrite => Stage::Rewrite,
            Abort::Publish(_) => Stage::Publish,
        }
    }

    /// Process exit status for this abort. 0 is success, 1 a startup failure
    /// and 2 a usage error, so aborts start at 3.
    pub fn exit_code(&self) -> u8 {
        match self {
            Abort::FetchArticle(_) => 3,
            Abort::InsufficientLinks { .. } => 4,
            Abort::RewriteUnavailable | Abort::EmptyRewrite => 5,
            Abort::Publish(_) => 6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Reference links kept from the search results
    pub reference_limit: usize,
    /// Fewer links than this aborts the run
    pub min_references: usize,
    /// Log the final record instead of publishing it
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_limit: DEFAULT_LIMIT,
            min_references: MIN_REFERENCES,
            dry_run: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.reference_limit < self.min_references {
            return Err(format!(
                "reference_limit ({}) must be at least {}",
                self.reference_limit, self.min_references
            ));
        }
        Ok(())
    }
}

/// Summary of a run that reached the publish stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub article_id: ArticleId,
    pub title: String,
    pub references: Vec<String>,
    /// False for a dry run
    pub published: bool,
}

pub struct PipelineRunner {
    store: Arc<dyn ContentStore>,
    collector: ReferenceCollector,
    scraper: ContentScraper,
    rewriter: Rewriter,
    config: PipelineConfig,
    logger: Logger,
}

impl PipelineRunner {
    pub fn new(
        store: Arc<dyn ContentStore>,
        collector: ReferenceCollector,
        scraper: ContentScraper,
        rewriter: Rewriter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            collector,
            scraper,
            rewriter,
            config,
            logger: Logger::new(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    fn stage_log(&self, stage: Stage) -> Logger {
        self.logger
            .clone()
            .with_prefix(format!("{} [{}]", stage.emoji(), stage))
    }

    fn abort(&self, abort: Abort) -> Abort {
        self.stage_log(abort.stage())
            .error(&format!("Aborting run: {}", abort));
        abort
    }

    /// Process the newest article end to end. Stages run strictly in order and
    /// the first fatal condition ends the run without publishing.
    pub async fn run(&self) -> Result<RunReport, Abort> {
        let log = self.stage_log(Stage::FetchArticle);
        log.info(&format!("Fetching latest article from {} store", self.store.name()));
        let article = match self.store.fetch_latest().await {
            Ok(article) => article,
            Err(e) => return Err(self.abort(Abort::FetchArticle(e))),
        };
        log.info(&format!(
            "Article {} \"{}\" ({} chars)",
            article.id,
            article.title,
            article.content.chars().count()
        ));

        let log = self.stage_log(Stage::CollectLinks);
        let references = self
            .collector
            .collect(&article.title, self.config.reference_limit)
            .await;
        if references.len() < self.config.min_references {
            return Err(self.abort(Abort::InsufficientLinks {
                found: references.len(),
                required: self.config.min_references,
            }));
        }
        log.info(&format!("Using references: {}", references.joined()));

        let log = self.stage_log(Stage::ScrapeReferences);
        let reference_texts = self.scraper.scrape_all(&references).await;
        for reference in reference_texts.iter().filter(|r| r.is_empty()) {
            log.warn(&format!("No reference text for {}", reference.url));
        }

        let log = self.stage_log(Stage::Rewrite);
        log.info(&format!("Rewriting with {}", self.rewriter.model_name()));
        let original = if article.content.trim().is_empty() {
            &article.title
        } else {
            &article.content
        };
        let rewrite = match self
            .rewriter
            .rewrite(original, &reference_texts, &references)
            .await
        {
            Some(rewrite) => rewrite,
            None => return Err(self.abort(Abort::RewriteUnavailable)),
        };
        if rewrite.content.trim().is_empty() {
            return Err(self.abort(Abort::EmptyRewrite));
        }
        log.info(&format!("Rewrite ready ({} chars of HTML)", rewrite.content.len()));

        let log = self.stage_log(Stage::DeriveMetadata);
        let record = build_published(rewrite, &references);
        log.info(&format!("Title: \"{}\"", record.title));
        log.debug(&format!("Description: \"{}\"", record.description));

        let log = self.stage_log(Stage::Publish);
        let published = if self.config.dry_run {
            match serde_json::to_string_pretty(&record) {
                Ok(json) => log.info(&format!("Dry run, not publishing:\n{}", json)),
                Err(e) => log.warn(&format!("Dry run, could not render record: {}", e)),
            }
            false
        } else {
            if let Err(e) = self.store.publish(&article.id, &record).await {
                return Err(self.abort(Abort::Publish(e)));
            }
            log.info(&format!("✅ Published rewrite of article {}", article.id));
            true
        };

        Ok(RunReport {
            article_id: article.id,
            title: record.title,
            references: record.references,
            published,
        })
    }
}
