use std::collections::HashSet;
use std::sync::Arc;
use rw_core::{ReferenceSet, SearchProvider};
use tracing::{debug, info, warn};

use crate::link_filter::LinkFilter;

/// Number of reference links kept per run unless configured otherwise.
pub const DEFAULT_LIMIT: usize = 2;

/// Finds reference links for a topic through the search provider.
pub struct ReferenceCollector {
    search: Arc<dyn SearchProvider>,
    filter: LinkFilter,
}

impl ReferenceCollector {
    pub fn new(search: Arc<dyn SearchProvider>, filter: LinkFilter) -> Self {
        Self { search, filter }
    }

    pub fn filter(&self) -> &LinkFilter {
        &self.filter
    }

    /// Up to `limit` acceptable links, in the provider's ranking order.
    /// A failed search yields an empty set.
    pub async fn collect(&self, topic: &str, limit: usize) -> ReferenceSet {
        let hits = match self.search.search(topic).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Search via {} failed for {:?}: {}", self.search.name(), topic, e);
                return ReferenceSet::default();
            }
        };
        let total = hits.len();

        let mut seen = HashSet::new();
        let links: Vec<String> = hits
            .into_iter()
            .map(|hit| hit.link)
            .filter(|link| !link.trim().is_empty())
            .filter(|link| {
                let acceptable = self.filter.is_acceptable(link);
                if !acceptable {
                    debug!("Skipping excluded link {}", link);
                }
                acceptable
            })
            .filter(|link| seen.insert(link.clone()))
            .take(limit)
            .collect();

        info!("Kept {} of {} search results for {:?}", links.len(), total, topic);
        ReferenceSet::new(links)
    }
}
