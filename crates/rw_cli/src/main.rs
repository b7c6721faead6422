use clap::{CommandFactory, Parser};
use rw_core::ContentStore;
use rw_inference::{create_model, Config, ReferencePolicy, Rewriter};
use rw_scrapers::{
    init_logging, ContentScraper, HttpPageFetcher, LinkFilter, PipelineConfig, PipelineRunner,
    ReferenceCollector, SerperSearch,
};
use rw_storage::{create_store, InMemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{anyhow, Context};
use tracing::{error, info};

/// Rewrite the newest article of a content API using web references and a
/// language model, then publish the result back.
#[derive(Parser, Debug)]
#[command(name = "rewriter", author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the content API
    #[arg(long, env = "CONTENT_API_BASE")]
    api_base: Option<String>,
    /// Content store backend: http, memory
    #[arg(long, env = "CONTENT_STORE", default_value = "http")]
    store: String,
    /// JSON array of articles loaded into the memory store
    #[arg(long, env = "CONTENT_SEED_FILE")]
    seed_file: Option<PathBuf>,
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    search_api_key: String,
    #[arg(long, env = "SEARCH_ENDPOINT")]
    search_endpoint: Option<String>,
    /// Extra domains never used as references (comma separated). The API host
    /// and its parent domain are excluded already; add the public site domain
    /// here when it differs from both.
    #[arg(long = "exclude-domain", env = "EXCLUDED_DOMAINS", value_delimiter = ',')]
    exclude_domains: Vec<String>,
    #[arg(long, env = "REWRITE_BACKEND", default_value = "openai", help = "Model to use for the rewrite. Available models: openai (default), dummy")]
    model: String,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
    #[arg(long, env = "OPENAI_BASE_URL")]
    openai_base_url: Option<String>,
    #[arg(long, env = "REWRITE_MODEL")]
    model_name: Option<String>,
    #[arg(long, env = "REWRITE_MAX_TOKENS", default_value_t = rw_inference::rewriter::DEFAULT_MAX_TOKENS)]
    max_tokens: u32,
    /// Number of reference links to use
    #[arg(long, env = "REFERENCE_LIMIT", default_value_t = rw_scrapers::collector::DEFAULT_LIMIT)]
    reference_limit: usize,
    /// Send the scraped reference texts to the model, not only their URLs
    #[arg(long, env = "INCLUDE_REFERENCE_TEXTS")]
    include_reference_texts: bool,
    /// Run every stage but log the record instead of publishing it
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            reference_limit: self.reference_limit,
            dry_run: self.dry_run,
            ..PipelineConfig::default()
        }
    }

    fn reference_policy(&self) -> ReferencePolicy {
        if self.include_reference_texts {
            ReferencePolicy::UrlsAndTexts
        } else {
            ReferencePolicy::UrlsOnly
        }
    }

    fn link_filter(&self) -> LinkFilter {
        let filter = match self.api_base.as_deref() {
            Some(base) => LinkFilter::for_content_source(base),
            None => LinkFilter::new(),
        };
        self.exclude_domains
            .iter()
            .fold(filter, |filter, domain| filter.with_excluded_domain(domain))
    }
}

async fn create_content_store(cli: &Cli) -> anyhow::Result<Arc<dyn ContentStore>> {
    match (cli.store.as_str(), cli.seed_file.as_ref()) {
        ("memory", Some(path)) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading seed file {}", path.display()))?;
            Ok(Arc::new(InMemoryStore::from_json(&json)?))
        }
        (kind, _) => Ok(create_store(kind, cli.api_base.as_deref())?),
    }
}

async fn build_runner(cli: &Cli) -> anyhow::Result<PipelineRunner> {
    let config = cli.pipeline_config();
    config.validate().map_err(|e| anyhow!(e))?;

    let store = create_content_store(cli).await?;
    info!("🏦 Content store ready (using {})", store.name());

    let search = SerperSearch::new(cli.search_api_key.clone(), cli.search_endpoint.clone())?;
    let collector = ReferenceCollector::new(Arc::new(search), cli.link_filter());

    let scraper = ContentScraper::new(Arc::new(HttpPageFetcher::new()?));

    let model = create_model(
        &cli.model,
        Config {
            api_key: cli.openai_api_key.clone(),
            model_name: cli.model_name.clone(),
            base_url: cli.openai_base_url.clone(),
        },
    )
    .with_context(|| format!("creating {} model", cli.model))?;
    info!("🤖 Using model backend: {}", model.name());
    let rewriter = Rewriter::new(model)
        .with_max_tokens(cli.max_tokens)
        .with_reference_policy(cli.reference_policy());

    Ok(PipelineRunner::new(store, collector, scraper, rewriter, config))
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if cli.store == "http" && cli.api_base.is_none() {
        Cli::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "--api-base (or CONTENT_API_BASE) is required for the http store",
            )
            .exit();
    }

    let logger = init_logging(cli.verbose);

    let runner = match build_runner(&cli).await {
        Ok(runner) => runner.with_logger(logger),
        Err(e) => {
            error!("Startup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    match runner.run().await {
        Ok(report) => {
            info!(
                "Done: article {} \"{}\" with {} references{}",
                report.article_id,
                report.title,
                report.references.len(),
                if report.published { "" } else { " (dry run)" }
            );
        }
        Err(abort) => std::process::exit(i32::from(abort.exit_code())),
    }
}
