//! The web client interface.
//!
//! Expressed as a trait so the engine can be driven against a `reqwest`-backed implementation
//! in production and a scripted implementation in tests: a purpose-tuned `reqwest::Client`
//! behind a small owned type.

use std::io::Read as _;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ClientConfig;

/// A successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// URL reached after following all redirects.
    pub final_url: String,
    /// Final HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: reqwest::header::HeaderMap,
    /// Response body, gunzipped if it carried a gzip signature or content-encoding.
    pub body: Vec<u8>,
}

/// A failed fetch: transport failure or non-2xx final response.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    /// Final HTTP status, when one was received at all.
    pub status: Option<u16>,
    /// Human-readable failure description.
    pub message: String,
    /// Whether a retry might succeed, per the retryable status/network-error set.
    pub retryable: bool,
}

/// The outcome of one `get` call: either an ok response or a
/// structured failure, never a bare exception.
pub type FetchOutcome = Result<FetchResponse, FetchFailure>;

/// Minimum operations required of a web client.
#[async_trait]
pub trait WebClient: Send + Sync {
    /// Perform a GET, following redirects, and report the outcome.
    async fn get(&self, url: &str) -> FetchOutcome;
}

/// The default `reqwest`-backed [`WebClient`].
pub struct ReqwestWebClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestWebClient {
    /// Build a client from `config`.
    pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.connect_timeout + config.read_timeout)
            .user_agent(crate::config::user_agent())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        let client = builder.build()?;
        Ok(Self { client, config })
    }

    async fn delay_before_request(&self) {
        let Some(base) = self.config.inter_request_delay else { return };
        let jitter = self
            .config
            .delay_jitter
            .map(|max| Duration::from_secs_f64(rand_fraction() * max.as_secs_f64()))
            .unwrap_or_default();
        tokio::time::sleep(base + jitter).await;
    }

    async fn get_once(&self, url: &str) -> FetchOutcome {
        self.delay_before_request().await;

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                return Err(FetchFailure {
                    status: e.status().map(|s| s.as_u16()),
                    retryable: e.is_timeout() || e.is_connect(),
                    message: e.to_string(),
                });
            },
        };

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = response.headers().clone();

        if !response.status().is_success() {
            return Err(FetchFailure {
                status: Some(status),
                retryable: crate::error::Error::is_retryable_status(status),
                message: format!("http {status}"),
            });
        }

        let raw = match response.bytes().await {
            Ok(b) => b.to_vec(),
            Err(e) => {
                return Err(FetchFailure { status: Some(status), retryable: true, message: e.to_string() });
            },
        };

        let body = gunzip_if_needed(&final_url, &headers, raw);
        Ok(FetchResponse { final_url, status, headers, body })
    }
}

#[async_trait]
impl WebClient for ReqwestWebClient {
    async fn get(&self, url: &str) -> FetchOutcome {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.get_once(url).await {
                Ok(response) => return Ok(response),
                Err(failure) if failure.retryable && attempt < self.config.retry_attempts => {
                    let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                    tracing::warn!(url, attempt, error = %failure.message, "retrying fetch");
                    tokio::time::sleep(backoff).await;
                },
                Err(failure) => return Err(failure),
            }
        }
    }
}

/// Gzip magic bytes: a body is treated as gzip if it carries this signature *or* a
/// `Content-Encoding: gzip` header that `reqwest`'s own transport-level negotiation didn't
/// already strip (some servers mislabel the encoding header while still sending raw gzip).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn gunzip_if_needed(url: &str, headers: &reqwest::header::HeaderMap, body: Vec<u8>) -> Vec<u8> {
    let header_says_gzip = headers
        .get(reqwest::header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("gzip"));
    let looks_gzip = body.len() >= 2 && body[0..2] == GZIP_MAGIC;

    if !header_says_gzip && !looks_gzip {
        return body;
    }

    let mut decoder = flate2::read::GzDecoder::new(&body[..]);
    let mut decompressed = Vec::new();
    match decoder.read_to_end(&mut decompressed) {
        Ok(_) => decompressed,
        Err(e) => {
            tracing::warn!(url, error = %e, "gzip decompression failed, passing original bytes through");
            body
        },
    }
}

/// Cheap, dependency-free uniform `[0, 1)` sample for jitter. Not cryptographic; only used to
/// spread request timing.
fn rand_fraction() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.subsec_nanos()).unwrap_or(0);
    f64::from(nanos % 1_000_000) / 1_000_000.0
}
