use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rw_core::{
    ArticleId, CompletionModel, CompletionRequest, ContentStore, Error, PageFetcher,
    PublishedMetadata, Result, SearchHit, SearchProvider, SourceArticle,
};
use rw_inference::Rewriter;
use rw_scrapers::prelude::*;
use rw_scrapers::RunReport;
use rw_storage::backends::InMemoryStore;

struct FakeSearch {
    links: Vec<&'static str>,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SearchProvider for FakeSearch {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .links
            .iter()
            .map(|link| SearchHit {
                link: link.to_string(),
                title: String::new(),
                snippet: String::new(),
            })
            .collect())
    }
}

#[derive(Default)]
struct FakeFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Scraping(format!("HTTP 404 for {}", url)))
    }
}

#[derive(Debug)]
struct FakeModel {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionModel for FakeModel {
    fn name(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.user.clone());
        self.reply
            .clone()
            .ok_or_else(|| Error::Inference("401 Unauthorized".to_string()))
    }
}

/// Store whose reads work and whose writes always fail.
struct ReadOnlyStore {
    inner: InMemoryStore,
    publish_calls: AtomicUsize,
}

#[async_trait]
impl ContentStore for ReadOnlyStore {
    fn name(&self) -> &str {
        "read-only"
    }

    async fn fetch_latest(&self) -> Result<SourceArticle> {
        self.inner.fetch_latest().await
    }

    async fn publish(&self, _id: &ArticleId, _record: &PublishedMetadata) -> Result<()> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Storage("HTTP 500 from content API".to_string()))
    }
}

const GOOD_REPLY: &str = "TITLE: Floods reshape the valley\n\
DESCRIPTION: A look at the week of heavy rain.\n\
CONTENT: <h1>Floods reshape the valley</h1><p>Rivers rose quickly.</p>";

fn article() -> SourceArticle {
    SourceArticle {
        id: ArticleId::from("42"),
        title: "River floods the valley".to_string(),
        content: "Heavy rain caused the river to burst its banks.".to_string(),
    }
}

fn search(links: Vec<&'static str>) -> Arc<FakeSearch> {
    Arc::new(FakeSearch {
        links,
        queries: Mutex::new(Vec::new()),
    })
}

fn fetcher() -> Arc<FakeFetcher> {
    let mut pages = HashMap::new();
    pages.insert(
        "https://news.example.com/floods".to_string(),
        "<html><body><article>Rain fell for six days.</article></body></html>".to_string(),
    );
    pages.insert(
        "https://weather.example.org/report".to_string(),
        "<html><body><main>Record rainfall in the region.</main></body></html>".to_string(),
    );
    Arc::new(FakeFetcher {
        pages,
        calls: AtomicUsize::new(0),
    })
}

fn runner(
    store: Arc<dyn ContentStore>,
    search: Arc<FakeSearch>,
    fetcher: Arc<FakeFetcher>,
    model: Arc<FakeModel>,
    config: PipelineConfig,
) -> PipelineRunner {
    PipelineRunner::new(
        store,
        ReferenceCollector::new(search, LinkFilter::new()),
        ContentScraper::new(fetcher),
        Rewriter::new(model),
        config,
    )
}

#[tokio::test]
async fn test_publishes_rewrite_with_filtered_references() {
    let store = Arc::new(InMemoryStore::with_articles(vec![article()]));
    let search = search(vec![
        "https://en.wikipedia.org/wiki/Flood",
        "https://news.example.com/floods",
        "https://weather.example.org/report",
    ]);
    let fetcher = fetcher();
    let model = Arc::new(FakeModel::replying(GOOD_REPLY));

    let report = runner(
        store.clone(),
        search.clone(),
        fetcher.clone(),
        model.clone(),
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap();

    let expected_refs = vec![
        "https://news.example.com/floods".to_string(),
        "https://weather.example.org/report".to_string(),
    ];
    assert_eq!(
        report,
        RunReport {
            article_id: ArticleId::from("42"),
            title: "Floods reshape the valley".to_string(),
            references: expected_refs.clone(),
            published: true,
        }
    );

    assert_eq!(
        *search.queries.lock().unwrap(),
        vec!["River floods the valley".to_string()]
    );
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("Heavy rain caused the river"));
    assert!(prompts[0].contains(
        "Reference sources: https://news.example.com/floods, https://weather.example.org/report"
    ));

    let published = store.published().await;
    assert_eq!(published.len(), 1);
    let (id, record) = &published[0];
    assert_eq!(id.as_str(), "42");
    assert_eq!(record.title, "Floods reshape the valley");
    assert_eq!(record.description, "A look at the week of heavy rain.");
    assert_eq!(
        record.content,
        "<h1>Floods reshape the valley</h1><p>Rivers rose quickly.</p>"
    );
    assert_eq!(record.references, expected_refs);
}

#[tokio::test]
async fn test_too_few_links_aborts_before_scraping() {
    let store = Arc::new(InMemoryStore::with_articles(vec![article()]));
    let search = search(vec![
        "https://www.youtube.com/watch?v=flood",
        "https://news.example.com/floods",
    ]);
    let fetcher = fetcher();
    let model = Arc::new(FakeModel::replying(GOOD_REPLY));

    let abort = runner(
        store.clone(),
        search,
        fetcher.clone(),
        model.clone(),
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(abort, Abort::InsufficientLinks { found: 1, required: 2 }));
    assert_eq!(abort.exit_code(), 4);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert!(store.published().await.is_empty());
}

#[tokio::test]
async fn test_model_failure_never_publishes() {
    let store = Arc::new(ReadOnlyStore {
        inner: InMemoryStore::with_articles(vec![article()]),
        publish_calls: AtomicUsize::new(0),
    });
    let model = Arc::new(FakeModel::failing());

    let abort = runner(
        store.clone(),
        search(vec![
            "https://news.example.com/floods",
            "https://weather.example.org/report",
        ]),
        fetcher(),
        model.clone(),
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(abort, Abort::RewriteUnavailable));
    assert_eq!(abort.exit_code(), 5);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.publish_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_rewrite_content_aborts() {
    let store = Arc::new(InMemoryStore::with_articles(vec![article()]));
    let model = Arc::new(FakeModel::replying("   "));

    let abort = runner(
        store.clone(),
        search(vec![
            "https://news.example.com/floods",
            "https://weather.example.org/report",
        ]),
        fetcher(),
        model,
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(abort, Abort::EmptyRewrite));
    assert!(store.published().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_references_still_rewrite() {
    let store = Arc::new(InMemoryStore::with_articles(vec![article()]));
    let fetcher = Arc::new(FakeFetcher::default());
    let model = Arc::new(FakeModel::replying("<h1>Only a heading</h1><p>And a lead.</p>"));

    let report = runner(
        store.clone(),
        search(vec!["https://gone.example/1", "https://gone.example/2"]),
        fetcher.clone(),
        model,
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.title, "Only a heading");
    let published = store.published().await;
    assert_eq!(published[0].1.description, "And a lead.");
}

#[tokio::test]
async fn test_dry_run_does_not_publish() {
    let store = Arc::new(InMemoryStore::with_articles(vec![article()]));
    let config = PipelineConfig {
        dry_run: true,
        ..PipelineConfig::default()
    };

    let report = runner(
        store.clone(),
        search(vec![
            "https://news.example.com/floods",
            "https://weather.example.org/report",
        ]),
        fetcher(),
        Arc::new(FakeModel::replying(GOOD_REPLY)),
        config,
    )
    .run()
    .await
    .unwrap();

    assert!(!report.published);
    assert!(store.published().await.is_empty());
}

#[tokio::test]
async fn test_publish_failure_exit_code() {
    let store = Arc::new(ReadOnlyStore {
        inner: InMemoryStore::with_articles(vec![article()]),
        publish_calls: AtomicUsize::new(0),
    });

    let abort = runner(
        store.clone(),
        search(vec![
            "https://news.example.com/floods",
            "https://weather.example.org/report",
        ]),
        fetcher(),
        Arc::new(FakeModel::replying(GOOD_REPLY)),
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(abort, Abort::Publish(_)));
    assert_eq!(abort.exit_code(), 6);
    assert_eq!(store.publish_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_store_aborts_at_fetch() {
    let fetcher = fetcher();
    let abort = runner(
        Arc::new(InMemoryStore::new()),
        search(vec![]),
        fetcher.clone(),
        Arc::new(FakeModel::replying(GOOD_REPLY)),
        PipelineConfig::default(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(abort, Abort::FetchArticle(_)));
    assert_eq!(abort.exit_code(), 3);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}
