//! The sitemap entity sum type and the page records it carries.
//!
//! A tree returned by [`crate::sitemap_tree_for_homepage`] is built entirely out of
//! [`SitemapEntity`] values. Every variant shares one capability contract —
//! [`SitemapEntity::sub_sitemaps`], [`SitemapEntity::pages`], [`SitemapEntity::all_sitemaps`],
//! [`SitemapEntity::all_pages`] — so callers never need to match on the tag to walk the tree;
//! they only match on it when they care about *why* a node is shaped the way it is.

use serde::{Deserialize, Serialize};

use crate::page_store::PageStore;

/// A single page declared by a page sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    /// Canonical final URL of the page.
    pub url: String,
    /// Priority in `[0.0, 1.0]`. Defaults to `0.5` when absent or unparseable.
    pub priority: f32,
    /// Last-modified timestamp, when the source declared one parseable by C11.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Change-frequency hint, when declared.
    pub change_frequency: Option<ChangeFrequency>,
    /// Google News extension payload, when present and complete.
    pub news_story: Option<NewsStory>,
    /// Google Image extension entries.
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    /// `xhtml:link rel="alternate"` entries.
    #[serde(default)]
    pub alternates: Vec<AlternateLink>,
}

impl SitemapEntry {
    /// A bare entry with only a URL set; priority defaults to 0.5.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            priority: 0.5,
            last_modified: None,
            change_frequency: None,
            news_story: None,
            images: Vec::new(),
            alternates: Vec::new(),
        }
    }
}

/// `changefreq` values recognised by the urlset schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// Changes essentially every time it is accessed.
    Always,
    /// Changes hourly.
    Hourly,
    /// Changes daily.
    Daily,
    /// Changes weekly.
    Weekly,
    /// Changes monthly.
    Monthly,
    /// Changes yearly.
    Yearly,
    /// Archival content that will not change again.
    Never,
}

impl std::str::FromStr for ChangeFrequency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(()),
        }
    }
}

/// Google News sitemap extension payload (`<news:news>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStory {
    /// Article title.
    pub title: Option<String>,
    /// `<news:name>` of the publication.
    pub publication_name: String,
    /// `<news:language>` of the publication.
    pub publication_language: String,
    /// `<news:publication_date>`, parsed by C11 when possible.
    pub publication_date: Option<chrono::DateTime<chrono::Utc>>,
    /// `<news:access>`, if present (`Registration` or `Subscription`).
    pub access: Option<String>,
    /// Comma-separated `<news:genres>`, split into individual tokens.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Comma-separated `<news:keywords>`, split into individual tokens.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// `<news:stock_tickers>`, split on `,`.
    #[serde(default)]
    pub stock_tickers: Vec<String>,
}

/// Google Image sitemap extension entry (`<image:image>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    /// `<image:loc>`, required.
    pub loc: String,
    /// `<image:caption>`, if present.
    pub caption: Option<String>,
    /// `<image:geo_location>`, if present.
    pub geo_location: Option<String>,
    /// `<image:title>`, if present.
    pub title: Option<String>,
    /// `<image:license>`, if present.
    pub license: Option<String>,
}

/// `xhtml:link rel="alternate"` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateLink {
    /// `href` attribute.
    pub href: String,
    /// `hreflang` attribute.
    pub hreflang: String,
}

/// One node of a sitemap tree.
///
/// Implemented as a tagged sum type rather than a class hierarchy: every variant answers the
/// same four questions (`sub_sitemaps`, `pages`, and the two traversal iterators), so
/// `all_sitemaps`/`all_pages` dispatch on the tag once and free callers from ever matching on
/// it themselves.
#[derive(Debug)]
pub enum SitemapEntity {
    /// Synthetic root created by the orchestrator.
    IndexWebsiteSitemap {
        /// Homepage URL.
        url: String,
        /// Robots.txt and well-known-path children, in attachment order.
        sub_sitemaps: Vec<SitemapEntity>,
    },
    /// A parsed robots.txt.
    IndexRobotsTxtSitemap {
        /// URL of the robots.txt.
        url: String,
        /// Sitemaps declared by `Sitemap:`/`Site-map:` directives, in declared order.
        sub_sitemaps: Vec<SitemapEntity>,
    },
    /// A parsed `<sitemapindex>` document.
    IndexXMLSitemap {
        /// URL of the index document.
        url: String,
        /// Declared sub-sitemaps, in declared order (after dedup).
        sub_sitemaps: Vec<SitemapEntity>,
    },
    /// A parsed `<urlset>` document.
    PagesXMLSitemap {
        /// URL of the urlset document.
        url: String,
        /// Page list, persisted via [`PageStore`].
        pages: PageStore,
    },
    /// A parsed plain-text page list.
    PagesTextSitemap {
        /// URL of the text document.
        url: String,
        /// Page list, persisted via [`PageStore`].
        pages: PageStore,
    },
    /// A parsed RSS 2.0 feed.
    PagesRSSSitemap {
        /// URL of the feed.
        url: String,
        /// Page list, persisted via [`PageStore`].
        pages: PageStore,
    },
    /// A parsed Atom 0.3/1.0 feed.
    PagesAtomSitemap {
        /// URL of the feed.
        url: String,
        /// Page list, persisted via [`PageStore`].
        pages: PageStore,
    },
    /// A failed fetch, unrecognised format, depth overrun, or cycle.
    InvalidSitemap {
        /// URL that failed to produce a usable sitemap.
        url: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl SitemapEntity {
    /// The URL this node was fetched (or would have been fetched) from.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::IndexWebsiteSitemap { url, .. }
            | Self::IndexRobotsTxtSitemap { url, .. }
            | Self::IndexXMLSitemap { url, .. }
            | Self::PagesXMLSitemap { url, .. }
            | Self::PagesTextSitemap { url, .. }
            | Self::PagesRSSSitemap { url, .. }
            | Self::PagesAtomSitemap { url, .. }
            | Self::InvalidSitemap { url, .. } => url,
        }
    }

    /// Direct sitemap children, or an empty slice for page-bearing and invalid nodes.
    #[must_use]
    pub fn sub_sitemaps(&self) -> &[SitemapEntity] {
        match self {
            Self::IndexWebsiteSitemap { sub_sitemaps, .. }
            | Self::IndexRobotsTxtSitemap { sub_sitemaps, .. }
            | Self::IndexXMLSitemap { sub_sitemaps, .. } => sub_sitemaps,
            _ => &[],
        }
    }

    /// The page list of a page-bearing node, reloaded from its scratch file, or empty for
    /// index-like and invalid nodes.
    #[must_use]
    pub fn pages(&self) -> Vec<SitemapEntry> {
        match self {
            Self::PagesXMLSitemap { pages, .. }
            | Self::PagesTextSitemap { pages, .. }
            | Self::PagesRSSSitemap { pages, .. }
            | Self::PagesAtomSitemap { pages, .. } => pages.load().unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Depth-first pre-order iterator over this node and every descendant sitemap.
    pub fn all_sitemaps(&self) -> impl Iterator<Item = &SitemapEntity> {
        AllSitemaps { stack: vec![self] }
    }

    /// Depth-first pre-order iterator over every page owned by this subtree.
    ///
    /// Each leaf's page list is reloaded from its scratch file, yielded, and dropped before the
    /// next leaf is visited, so resident memory does not grow with the size of the site.
    pub fn all_pages(&self) -> impl Iterator<Item = SitemapEntry> + '_ {
        self.all_sitemaps().flat_map(SitemapEntity::pages)
    }

    /// True for the three index-like variants.
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(
            self,
            Self::IndexWebsiteSitemap { .. }
                | Self::IndexRobotsTxtSitemap { .. }
                | Self::IndexXMLSitemap { .. }
        )
    }

    /// True for the four page-bearing variants.
    #[must_use]
    pub const fn is_pages(&self) -> bool {
        matches!(
            self,
            Self::PagesXMLSitemap { .. }
                | Self::PagesTextSitemap { .. }
                | Self::PagesRSSSitemap { .. }
                | Self::PagesAtomSitemap { .. }
        )
    }
}

struct AllSitemaps<'a> {
    stack: Vec<&'a SitemapEntity>,
}

impl<'a> Iterator for AllSitemaps<'a> {
    type Item = &'a SitemapEntity;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse so pre-order pops them in declaration order.
        for child in node.sub_sitemaps().iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_store::PageStore;

    fn leaf(url: &str, entries: Vec<SitemapEntry>) -> SitemapEntity {
        SitemapEntity::PagesXMLSitemap {
            url: url.to_string(),
            pages: PageStore::new(entries).expect("scratch file"),
        }
    }

    #[test]
    fn all_sitemaps_is_depth_first_preorder() {
        let root = SitemapEntity::IndexWebsiteSitemap {
            url: "https://ex.org".into(),
            sub_sitemaps: vec![
                SitemapEntity::IndexXMLSitemap {
                    url: "https://ex.org/index.xml".into(),
                    sub_sitemaps: vec![leaf("https://ex.org/a.xml", vec![])],
                },
                leaf("https://ex.org/b.xml", vec![]),
            ],
        };
        let urls: Vec<&str> = root.all_sitemaps().map(SitemapEntity::url).collect();
        assert_eq!(
            urls,
            vec![
                "https://ex.org",
                "https://ex.org/index.xml",
                "https://ex.org/a.xml",
                "https://ex.org/b.xml",
            ]
        );
    }

    #[test]
    fn all_pages_concatenates_leaf_pages_in_order() {
        let root = SitemapEntity::IndexWebsiteSitemap {
            url: "https://ex.org".into(),
            sub_sitemaps: vec![
                leaf("https://ex.org/a.xml", vec![SitemapEntry::new("https://ex.org/a")]),
                leaf("https://ex.org/b.xml", vec![SitemapEntry::new("https://ex.org/b")]),
            ],
        };
        let urls: Vec<String> = root.all_pages().map(|p| p.url).collect();
        assert_eq!(urls, vec!["https://ex.org/a", "https://ex.org/b"]);
    }

    #[test]
    fn index_and_page_accessors_are_mutually_empty() {
        let index = SitemapEntity::IndexXMLSitemap { url: "u".into(), sub_sitemaps: vec![] };
        assert!(index.pages().is_empty());
        let page = leaf("u", vec![]);
        assert!(page.sub_sitemaps().is_empty());
    }
}
