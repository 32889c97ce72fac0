//! Engine configuration: typed defaults for the web client, recursion controller, and
//! orchestrator, overridable by the CLI or any other embedder.

use std::time::Duration;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(9_050);
/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);
/// Default maximum retry attempts for retryable statuses/network errors.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
/// Default recursion depth bound.
pub const DEFAULT_MAX_DEPTH: u8 = 10;
/// Default redirect cap for the sitemap client.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Well-known sitemap paths probed by the orchestrator when `use_known_paths` is set.
pub const DEFAULT_WELL_KNOWN_PATHS: &[&str] = &[
    "sitemap.xml",
    "sitemap_index.xml",
    "sitemap-index.xml",
    "sitemap.xml.gz",
    "sitemap_news.xml",
];

/// User-agent string sent with every request.
pub fn user_agent() -> String {
    format!("usp/{}", env!("CARGO_PKG_VERSION"))
}

/// Web client tuning knobs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Overall read (response) timeout.
    pub read_timeout: Duration,
    /// Maximum redirects followed before giving up.
    pub max_redirects: usize,
    /// Maximum attempts (including the first) for retryable failures.
    pub retry_attempts: u32,
    /// Delay inserted before every request.
    pub inter_request_delay: Option<Duration>,
    /// Uniform jitter added on top of `inter_request_delay`, up to this bound.
    pub delay_jitter: Option<Duration>,
    /// Optional upstream proxy URL.
    pub proxy: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            inter_request_delay: None,
            delay_jitter: None,
            proxy: None,
        }
    }
}

/// Orchestrator/recursion-controller tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Web client configuration.
    pub client: ClientConfig,
    /// Maximum recursion depth before an `InvalidSitemap("recursion depth exceeded")`.
    pub max_depth: u8,
    /// Whether to probe and parse `<home>/robots.txt`.
    pub use_robots_txt: bool,
    /// Whether to probe the well-known path list.
    pub use_known_paths: bool,
    /// Well-known paths to probe, in probe order.
    pub well_known_paths: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            use_robots_txt: true,
            use_known_paths: true,
            well_known_paths: DEFAULT_WELL_KNOWN_PATHS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl EngineConfig {
    /// Append caller-supplied extra well-known paths after the defaults.
    #[must_use]
    pub fn with_extra_known_paths(mut self, extra: impl IntoIterator<Item = String>) -> Self {
        self.well_known_paths.extend(extra);
        self
    }
}
