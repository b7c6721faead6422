use url::Url;

/// Domains never used as reference sources: the encyclopedia plus the big
/// video and social platforms.
pub const EXCLUDED_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "youtube.com",
    "youtu.be",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "tiktok.com",
    "linkedin.com",
    "reddit.com",
    "pinterest.com",
];

/// Deny-list filter for discovered links. Anything not on the list passes.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    excluded: Vec<String>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            excluded: EXCLUDED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl LinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default list plus the domains of the content source itself: its
    /// host and, for API hosts like `api.mynews.com`, the parent domain.
    pub fn for_content_source(base_url: &str) -> Self {
        source_domains(base_url)
            .iter()
            .fold(Self::default(), |filter, domain| filter.with_excluded_domain(domain))
    }

    pub fn with_excluded_domain(mut self, domain: &str) -> Self {
        let domain = domain.trim().to_lowercase();
        if !domain.is_empty() && !self.excluded.contains(&domain) {
            self.excluded.push(domain);
        }
        self
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// False when the URL contains any excluded domain, true otherwise.
    pub fn is_acceptable(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        !self.excluded.iter().any(|domain| url.contains(domain.as_str()))
    }
}

fn source_domains(base_url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(base_url) else {
        return Vec::new();
    };
    let Some(host) = parsed.host_str() else {
        return Vec::new();
    };
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    let parent = parsed
        .domain()
        .and_then(|_| host.split_once('.'))
        .map(|(_, parent)| parent.to_string())
        .filter(|parent| !looks_like_public_suffix(parent));

    let mut domains = vec![host];
    domains.extend(parent);
    domains
}

/// `com`, `co.uk`, `com.ar` and the like. Short second-level labels under a
/// country code are treated as registry suffixes, never as a site.
fn looks_like_public_suffix(domain: &str) -> bool {
    match domain.split_once('.') {
        None => true,
        Some((label, rest)) => !rest.contains('.') && label.len() <= 3,
    }
}
