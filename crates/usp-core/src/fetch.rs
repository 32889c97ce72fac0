//! The fetcher and classifier: fetch one URL, decide what kind of document it returned,
//! parse it, and recurse into any declared children.
//!
//! This is the one place the web client, the parsers, and the recursion controller meet. The
//! recursive walk is realised as a `tokio` task tree: each node's children are fetched
//! concurrently via `tokio::spawn`, joined back in declaration order.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt as _};

use crate::client::WebClient;
use crate::config::EngineConfig;
use crate::entity::{SitemapEntity, SitemapEntry};
use crate::page_store::PageStore;
use crate::recursion::{self, RecursionFilters};
use crate::xml::{self, XmlDocument};
use crate::{robots, text};

/// Shared, cheaply-cloned context threaded through every node of one recursive walk.
#[derive(Clone)]
struct WalkContext {
    client: Arc<dyn WebClient>,
    cfg: Arc<EngineConfig>,
    filters: Arc<RecursionFilters>,
}

/// Fetch `url`, classify its body, parse it, and recursively fetch any declared children.
///
/// `depth` is this node's own recursion level (the homepage root is `0`); `ancestors` is the set
/// of URLs already on the path from the root to this node, used for cycle detection.
pub fn fetch_sitemap_node(
    client: Arc<dyn WebClient>,
    cfg: Arc<EngineConfig>,
    filters: Arc<RecursionFilters>,
    url: String,
    depth: u8,
    ancestors: Arc<HashSet<String>>,
) -> BoxFuture<'static, SitemapEntity> {
    let ctx = WalkContext { client, cfg, filters };
    walk(ctx, url, depth, ancestors).boxed()
}

fn walk(ctx: WalkContext, url: String, depth: u8, ancestors: Arc<HashSet<String>>) -> BoxFuture<'static, SitemapEntity> {
    async move {
        let url_for_err = url.clone();
        match fetch_and_build(ctx, url, depth, ancestors).await {
            Ok(entity) => entity,
            Err(failure) => {
                tracing::debug!(url = url_for_err, error = %failure.message, "fetch failed, marking invalid");
                SitemapEntity::InvalidSitemap { url: url_for_err, reason: failure.message }
            },
        }
    }
    .boxed()
}

/// Probe one candidate URL the orchestrator is not otherwise committed to (the well-known path
/// list): a 404 yields no attachment at all rather than an `InvalidSitemap`, since
/// "no sitemap at this well-known location" is the overwhelmingly common, non-noteworthy case.
pub async fn probe_well_known(
    client: Arc<dyn WebClient>,
    cfg: Arc<EngineConfig>,
    filters: Arc<RecursionFilters>,
    url: String,
    depth: u8,
    ancestors: Arc<HashSet<String>>,
) -> Option<SitemapEntity> {
    let ctx = WalkContext { client, cfg, filters };
    let url_for_err = url.clone();
    match fetch_and_build(ctx, url, depth, ancestors).await {
        Ok(entity) => Some(entity),
        Err(failure) if failure.status == Some(404) => {
            tracing::debug!(url = url_for_err, "well-known path returned 404, skipping");
            None
        },
        Err(failure) => Some(SitemapEntity::InvalidSitemap { url: url_for_err, reason: failure.message }),
    }
}

async fn fetch_and_build(
    ctx: WalkContext,
    url: String,
    depth: u8,
    ancestors: Arc<HashSet<String>>,
) -> Result<SitemapEntity, crate::client::FetchFailure> {
    if let Some(rejection) = recursion::check_cycle(&url, &ancestors) {
        return Ok(SitemapEntity::InvalidSitemap { url, reason: rejection.reason().to_string() });
    }

    let response = ctx.client.get(&url).await?;

    if let Some(rejection) = recursion::check_cycle(&response.final_url, &ancestors) {
        return Ok(SitemapEntity::InvalidSitemap { url, reason: rejection.reason().to_string() });
    }

    let body = String::from_utf8_lossy(&response.body).into_owned();
    Ok(build_entity(ctx, url, response.final_url, body, depth, ancestors).await)
}

async fn build_entity(
    ctx: WalkContext,
    url: String,
    final_url: String,
    body: String,
    depth: u8,
    ancestors: Arc<HashSet<String>>,
) -> SitemapEntity {
    if is_robots_path(&final_url) {
        let children = robots::parse_robots_txt(&body);
        let sub_sitemaps = recurse_into(&ctx, &url, &final_url, children, depth, &ancestors).await;
        return SitemapEntity::IndexRobotsTxtSitemap { url: final_url, sub_sitemaps };
    }

    if xml::looks_like_xml(&body) {
        return match xml::parse_xml(&body) {
            Ok(XmlDocument::Index(children)) => {
                let sub_sitemaps = recurse_into(&ctx, &url, &final_url, children, depth, &ancestors).await;
                SitemapEntity::IndexXMLSitemap { url: final_url, sub_sitemaps }
            },
            Ok(XmlDocument::Urlset(entries)) => {
                page_entity(final_url, entries, |url, pages| SitemapEntity::PagesXMLSitemap { url, pages })
            },
            Ok(XmlDocument::Rss(entries)) => {
                page_entity(final_url, entries, |url, pages| SitemapEntity::PagesRSSSitemap { url, pages })
            },
            Ok(XmlDocument::Atom(entries)) => {
                page_entity(final_url, entries, |url, pages| SitemapEntity::PagesAtomSitemap { url, pages })
            },
            Err(e) => SitemapEntity::InvalidSitemap { url: final_url, reason: e.to_string() },
        };
    }

    let entries = text::parse_text_sitemap(&body);
    page_entity(final_url, entries, |url, pages| SitemapEntity::PagesTextSitemap { url, pages })
}

fn page_entity(
    url: String,
    entries: Vec<SitemapEntry>,
    variant: impl FnOnce(String, PageStore) -> SitemapEntity,
) -> SitemapEntity {
    match PageStore::new(entries) {
        Ok(pages) => variant(url, pages),
        Err(e) => SitemapEntity::InvalidSitemap { url, reason: e.to_string() },
    }
}

/// Apply the recursion filters to `children`, then fetch each surviving URL concurrently,
/// rejecting any that the depth bound or cycle check would block before spending a request on
/// it.
async fn recurse_into(
    ctx: &WalkContext,
    url: &str,
    final_url: &str,
    children: Vec<String>,
    depth: u8,
    ancestors: &Arc<HashSet<String>>,
) -> Vec<SitemapEntity> {
    let filtered = ctx.filters.apply(children, depth, ancestors);
    let child_depth = depth + 1;

    let mut extended = (**ancestors).clone();
    extended.insert(url.to_string());
    extended.insert(final_url.to_string());
    let extended = Arc::new(extended);

    let max_depth = ctx.cfg.max_depth;
    let tasks: Vec<_> = filtered
        .into_iter()
        .map(|child_url| {
            if let Some(rejection) = recursion::check_depth(child_depth, max_depth) {
                let reason = rejection.reason().to_string();
                return tokio::spawn(
                    async move { SitemapEntity::InvalidSitemap { url: child_url, reason } },
                );
            }
            tokio::spawn(walk(ctx.clone(), child_url, child_depth, Arc::clone(&extended)))
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(entity) => results.push(entity),
            Err(e) => tracing::warn!(error = %e, "child fetch task panicked"),
        }
    }
    results
}

fn is_robots_path(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| u.path().to_ascii_lowercase().ends_with("robots.txt"))
        .unwrap_or_else(|_| url.to_ascii_lowercase().ends_with("robots.txt"))
}
