//! The top-level orchestrator: turns a homepage URL into a full sitemap tree, and exposes
//! the no-network single-document entry point for callers that already have a body in hand.

use std::collections::HashSet;
use std::sync::Arc;

use crate::client::{ReqwestWebClient, WebClient};
use crate::config::EngineConfig;
use crate::entity::{SitemapEntity, SitemapEntry};
use crate::error::{Error, Result};
use crate::fetch;
use crate::page_store::PageStore;
use crate::recursion::RecursionFilters;
use crate::xml::{self, XmlDocument};
use crate::{robots, text};

/// Discover, fetch, and assemble the full sitemap tree rooted at `homepage_url`.
///
/// Constructs the synthetic root, attaches the robots.txt subtree (unless disabled), probes the
/// well-known path list while skipping anything robots.txt already declared (unless disabled),
/// and returns the root.
///
/// `web_client` defaults to a [`ReqwestWebClient`] built from `cfg.client` when `None`.
pub async fn sitemap_tree_for_homepage(
    homepage_url: &str,
    cfg: EngineConfig,
    filters: RecursionFilters,
    web_client: Option<Arc<dyn WebClient>>,
) -> Result<SitemapEntity> {
    let home = url::Url::parse(homepage_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let client = match web_client {
        Some(c) => c,
        None => Arc::new(ReqwestWebClient::new(cfg.client.clone()).map_err(|e| Error::Transport {
            url: homepage_url.to_string(),
            source: e,
        })?),
    };
    let cfg = Arc::new(cfg);
    let filters = Arc::new(filters);
    let root_ancestors = Arc::new(HashSet::from([homepage_url.to_string()]));

    let mut sub_sitemaps = Vec::new();
    let mut robots_seen: HashSet<String> = HashSet::new();

    if cfg.use_robots_txt {
        let robots_url = home
            .join("/robots.txt")
            .map_err(|e| Error::InvalidUrl(e.to_string()))?
            .to_string();
        let robots_entity = fetch::fetch_sitemap_node(
            Arc::clone(&client),
            Arc::clone(&cfg),
            Arc::clone(&filters),
            robots_url,
            1,
            Arc::clone(&root_ancestors),
        )
        .await;
        robots_seen.extend(robots_entity.all_sitemaps().skip(1).map(|e| e.url().to_string()));
        sub_sitemaps.push(robots_entity);
    }

    if cfg.use_known_paths {
        for path in &cfg.well_known_paths {
            let candidate = match home.join(path) {
                Ok(u) => u.to_string(),
                Err(e) => {
                    tracing::warn!(path, error = %e, "skipping unjoinable well-known path");
                    continue;
                },
            };
            let outcome = fetch::probe_well_known(
                Arc::clone(&client),
                Arc::clone(&cfg),
                Arc::clone(&filters),
                candidate,
                1,
                Arc::clone(&root_ancestors),
            )
            .await;
            if let Some(entity) = outcome {
                if robots_seen.contains(entity.url()) {
                    continue;
                }
                sub_sitemaps.push(entity);
            }
        }
    }

    Ok(SitemapEntity::IndexWebsiteSitemap { url: homepage_url.to_string(), sub_sitemaps })
}

/// Parse a single sitemap document already in hand, with no network access.
///
/// An index-type document's declared children are represented as `InvalidSitemap`
/// entries carrying their declared URL rather than being fetched.
#[must_use]
pub fn sitemap_from_str(body: &str, source_url: &str) -> SitemapEntity {
    if is_robots_like(source_url) {
        let children = robots::parse_robots_txt(body);
        let sub_sitemaps = unfetched_children(children);
        return SitemapEntity::IndexRobotsTxtSitemap { url: source_url.to_string(), sub_sitemaps };
    }

    if xml::looks_like_xml(body) {
        return match xml::parse_xml(body) {
            Ok(XmlDocument::Index(children)) => SitemapEntity::IndexXMLSitemap {
                url: source_url.to_string(),
                sub_sitemaps: unfetched_children(children),
            },
            Ok(XmlDocument::Urlset(entries)) => page_entity(source_url, entries, |url, pages| {
                SitemapEntity::PagesXMLSitemap { url, pages }
            }),
            Ok(XmlDocument::Rss(entries)) => page_entity(source_url, entries, |url, pages| {
                SitemapEntity::PagesRSSSitemap { url, pages }
            }),
            Ok(XmlDocument::Atom(entries)) => page_entity(source_url, entries, |url, pages| {
                SitemapEntity::PagesAtomSitemap { url, pages }
            }),
            Err(e) => SitemapEntity::InvalidSitemap { url: source_url.to_string(), reason: e.to_string() },
        };
    }

    let entries = text::parse_text_sitemap(body);
    page_entity(source_url, entries, |url, pages| SitemapEntity::PagesTextSitemap { url, pages })
}

fn is_robots_like(url: &str) -> bool {
    url.to_ascii_lowercase().ends_with("robots.txt")
}

fn unfetched_children(urls: Vec<String>) -> Vec<SitemapEntity> {
    urls.into_iter()
        .map(|url| SitemapEntity::InvalidSitemap { url, reason: "not fetched: parsed from string".to_string() })
        .collect()
}

fn page_entity(
    url: &str,
    entries: Vec<SitemapEntry>,
    variant: impl FnOnce(String, PageStore) -> SitemapEntity,
) -> SitemapEntity {
    match PageStore::new(entries) {
        Ok(pages) => variant(url.to_string(), pages),
        Err(e) => SitemapEntity::InvalidSitemap { url: url.to_string(), reason: e.to_string() },
    }
}
