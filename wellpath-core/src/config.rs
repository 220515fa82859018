use std::time::Duration;

/// Backend used when no override is compiled in
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Backend and paging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,

    /// Page size for progress and catalog requests
    pub page_size: u32,

    /// Language the backend localizes content into
    pub target_lang: String,

    /// Max catalog pages kept in memory
    pub catalog_capacity: usize,

    /// How long a cached catalog page stays fresh
    pub catalog_ttl: Duration,

    /// Timeline commands that may wait unprocessed
    pub queue_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: option_env!("WELLPATH_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            page_size: 50,
            target_lang: "en".to_string(),
            catalog_capacity: 32,
            catalog_ttl: Duration::from_secs(300),
            queue_capacity: 100,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = lang.into();
        self
    }

    pub fn with_catalog_cache(mut self, capacity: usize, ttl: Duration) -> Self {
        self.catalog_capacity = capacity;
        self.catalog_ttl = ttl;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Absolute URL for an API path such as `/v1/challenges`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
