//! Error types for the sitemap discovery engine.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Failures that occur while
//! walking a sitemap tree are, per the recursion controller's propagation policy, localised to
//! the node that produced them and turned into an `InvalidSitemap` entity rather than aborting
//! the whole call — this type exists mainly to carry that reason string plus enough structure
//! for callers to log and categorise failures consistently.

use thiserror::Error;

/// The error type for `usp-core` operations.
#[derive(Error, Debug)]
pub enum Error {
    /// DNS, connection, or TLS failure while performing a GET.
    #[error("transport error fetching {url}: {source}")]
    Transport {
        /// The URL being fetched when the transport failed.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The final response had a non-2xx status.
    #[error("http {status} fetching {url}")]
    Http {
        /// Final HTTP status code.
        status: u16,
        /// The URL that produced the status.
        url: String,
    },

    /// Gunzip failed on a body that looked gzip-compressed.
    ///
    /// Never returned to a caller directly: the client logs this at warning level and falls
    /// back to the original bytes.
    #[error("decompression failed for {url}: {message}")]
    Decompress {
        /// The URL whose body failed to decompress.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// Malformed XML, or any other unparsable sitemap body.
    #[error("parse error: {0}")]
    Parse(String),

    /// Body could not be classified as XML, robots.txt, or plain text.
    #[error("classification error: {0}")]
    Classification(String),

    /// Recursion depth bound was reached before fetching a candidate child.
    #[error("recursion depth exceeded at {0}")]
    RecursionLimit(String),

    /// A candidate child URL (or its post-redirect final URL) is already an ancestor.
    #[error("recursive sitemap at {0}")]
    Cycle(String),

    /// The supplied homepage URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Reading or writing a page-store scratch file failed.
    #[error("page store error: {0}")]
    Storage(String),

    /// JSON (de)serialisation of a scratch file failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether retrying the operation that produced this error might succeed.
    ///
    /// Transport-flavoured errors (timeouts, connection resets) are recoverable; parse,
    /// classification, and recursion errors are not — they reflect the content or shape of the
    /// document itself, which a retry cannot change.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// A stable category string, suitable for a `tracing` field or a metrics label.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Http { .. } => "http",
            Self::Decompress { .. } => "decompress",
            Self::Parse(_) => "parse",
            Self::Classification(_) => "classification",
            Self::RecursionLimit(_) => "recursion_limit",
            Self::Cycle(_) => "cycle",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }

    /// Whether the recognised retryable status set contains this HTTP status.
    #[must_use]
    pub const fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }
}

/// Convenience alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_stable_and_nonempty() {
        let errors: Vec<Error> = vec![
            Error::Http { status: 404, url: "https://a".into() },
            Error::Decompress { url: "https://a".into(), message: "bad gzip".into() },
            Error::Parse("bad xml".into()),
            Error::Classification("unknown body".into()),
            Error::RecursionLimit("https://a".into()),
            Error::Cycle("https://a".into()),
            Error::InvalidUrl("not a url".into()),
            Error::Storage("disk full".into()),
        ];
        for e in errors {
            assert!(!e.category().is_empty());
        }
    }

    #[test]
    fn recursion_and_parse_errors_are_not_recoverable() {
        assert!(!Error::RecursionLimit("https://a".into()).is_recoverable());
        assert!(!Error::Cycle("https://a".into()).is_recoverable());
        assert!(!Error::Parse("bad".into()).is_recoverable());
    }

    #[test]
    fn retryable_http_statuses_match_spec_set() {
        for status in [429, 500, 502, 503, 504] {
            assert!(Error::is_retryable_status(status));
        }
        for status in [200, 301, 403, 404] {
            assert!(!Error::is_retryable_status(status));
        }
    }
}
