//! `<urlset>` parsing, including the Google News, Google Image, and xhtml-alternate
//! extensions. Extended beyond the base sitemap schema to track the nested
//! `<news:news>`/`<image:image>` sub-elements those extensions add.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::date::{parse_date, parse_priority};
use crate::entity::{AlternateLink, ImageEntry, NewsStory, SitemapEntry};
use crate::error::{Error, Result};

/// Namespace URIs the urlset dialect recognises; elements bound to anything else are ignored.
/// `xhtml` is included alongside the sitemap/News/Image trio because the alternate-link feature
/// is defined entirely in terms of `xhtml:link`.
const RECOGNISED_NAMESPACES: [&str; 4] = [
    "http://www.sitemaps.org/schemas/sitemap/0.9",
    "http://www.google.com/schemas/sitemap-news/0.9",
    "http://www.google.com/schemas/sitemap-image/1.1",
    "http://www.w3.org/1999/xhtml",
];

/// An element is dispatched on if it declares no namespace at all (tolerance for documents that
/// omit namespace declarations entirely) or resolves to one of [`RECOGNISED_NAMESPACES`].
fn is_dispatchable(ns: ResolveResult) -> bool {
    match ns {
        ResolveResult::Unbound => true,
        ResolveResult::Bound(ns) => RECOGNISED_NAMESPACES.contains(&String::from_utf8_lossy(ns.into_inner()).as_ref()),
        ResolveResult::Unknown(_) => false,
    }
}

#[derive(Default)]
struct NewsDraft {
    title: Option<String>,
    publication_name: Option<String>,
    publication_language: Option<String>,
    publication_date: Option<String>,
    access: Option<String>,
    genres: Option<String>,
    keywords: Option<String>,
    stock_tickers: Option<String>,
}

impl NewsDraft {
    /// Publication name and language are both required, or the whole extension is
    /// discarded while the base page is kept.
    fn finish(self) -> Option<NewsStory> {
        let name = self.publication_name?;
        let language = self.publication_language?;
        Some(NewsStory {
            title: self.title,
            publication_name: name,
            publication_language: language,
            publication_date: self.publication_date.as_deref().and_then(parse_date),
            access: self.access,
            genres: split_list(self.genres.as_deref()),
            keywords: split_list(self.keywords.as_deref()),
            stock_tickers: split_list(self.stock_tickers.as_deref()),
        })
    }
}

fn split_list(s: Option<&str>) -> Vec<String> {
    s.map(|s| s.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect())
        .unwrap_or_default()
}

#[derive(Default)]
struct ImageDraft {
    loc: Option<String>,
    caption: Option<String>,
    geo_location: Option<String>,
    title: Option<String>,
    license: Option<String>,
}

impl ImageDraft {
    fn finish(self) -> Option<ImageEntry> {
        Some(ImageEntry {
            loc: self.loc?,
            caption: self.caption,
            geo_location: self.geo_location,
            title: self.title,
            license: self.license,
        })
    }
}

/// Parse a `<urlset>` document into page entries.
pub fn parse_urlset(body: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();

    let mut in_url = false;
    let mut draft: Option<SitemapEntry> = None;
    let mut field: Option<String> = None;

    let mut in_news = false;
    let mut news: NewsDraft = NewsDraft::default();
    let mut in_image = false;
    let mut image: ImageDraft = ImageDraft::default();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(e))) if is_dispatchable(ns.clone()) => {
                let local = local_name(&e);
                match local.as_str() {
                    "url" => {
                        in_url = true;
                        draft = Some(SitemapEntry::new(String::new()));
                    },
                    "news" if in_url => in_news = true,
                    "image" if in_url => in_image = true,
                    "link" if in_url => handle_alternate(&e, &mut draft),
                    other if in_url => field = Some(other.to_string()),
                    _ => {},
                }
            },
            Ok((ns, Event::Empty(e))) if is_dispatchable(ns.clone()) => {
                let local = local_name(&e);
                if local == "link" && in_url {
                    handle_alternate(&e, &mut draft);
                }
            },
            Ok((_, Event::Text(t))) => {
                if let Some(name) = &field {
                    let text = t.unescape().map_err(xml_err)?.into_owned();
                    if in_news {
                        assign_news_field(&mut news, name, text);
                    } else if in_image {
                        assign_image_field(&mut image, name, text);
                    } else if let Some(d) = draft.as_mut() {
                        assign_url_field(d, name, &text);
                    }
                }
            },
            Ok((_, Event::End(e))) => {
                let local = local_name_bytes(e.local_name().as_ref());
                match local.as_str() {
                    "news" => {
                        in_news = false;
                        if let Some(d) = draft.as_mut() {
                            d.news_story = std::mem::take(&mut news).finish();
                        }
                    },
                    "image" => {
                        in_image = false;
                        if let (Some(d), Some(img)) = (draft.as_mut(), std::mem::take(&mut image).finish()) {
                            d.images.push(img);
                        }
                    },
                    "url" => {
                        in_url = false;
                        if let Some(d) = draft.take() {
                            if !d.url.is_empty() && seen.insert(d.url.clone()) {
                                entries.push(d);
                            }
                        }
                    },
                    _ => field = None,
                }
            },
            Ok((_, Event::Eof)) => break,
            Ok(_) => {},
            Err(e) => {
                tracing::warn!(error = %e, "truncated or malformed urlset, keeping partial result");
                break;
            },
        }
        buf.clear();
    }

    Ok(entries)
}

fn handle_alternate(e: &BytesStart, draft: &mut Option<SitemapEntry>) {
    let mut rel = None;
    let mut href = None;
    let mut hreflang = None;
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"rel" => rel = attr.unescape_value().ok().map(|v| v.into_owned()),
            b"href" => href = attr.unescape_value().ok().map(|v| v.into_owned()),
            b"hreflang" => hreflang = attr.unescape_value().ok().map(|v| v.into_owned()),
            _ => {},
        }
    }
    if rel.as_deref() != Some("alternate") {
        return;
    }
    if let (Some(d), Some(href), Some(hreflang)) = (draft.as_mut(), href, hreflang) {
        d.alternates.push(AlternateLink { href, hreflang });
    }
}

fn assign_url_field(entry: &mut SitemapEntry, field: &str, text: &str) {
    match field {
        "loc" => entry.url = text.to_string(),
        "lastmod" => entry.last_modified = parse_date(text),
        "changefreq" => entry.change_frequency = text.parse().ok(),
        "priority" => entry.priority = parse_priority(text),
        _ => {},
    }
}

fn assign_news_field(news: &mut NewsDraft, field: &str, text: String) {
    match field {
        "name" => news.publication_name = Some(text),
        "language" => news.publication_language = Some(text),
        "title" => news.title = Some(text),
        "publication_date" => news.publication_date = Some(text),
        "access" => news.access = Some(text),
        "genres" => news.genres = Some(text),
        "keywords" => news.keywords = Some(text),
        "stock_tickers" => news.stock_tickers = Some(text),
        _ => {},
    }
}

fn assign_image_field(image: &mut ImageDraft, field: &str, text: String) {
    match field {
        "loc" => image.loc = Some(text),
        "caption" => image.caption = Some(text),
        "geo_location" => image.geo_location = Some(text),
        "title" => image.title = Some(text),
        "license" => image.license = Some(text),
        _ => {},
    }
}

fn local_name(e: &BytesStart) -> String {
    local_name_bytes(e.local_name().as_ref())
}

fn local_name_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Parse(format!("xml error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_urlset() {
        let body = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>https://ex.org/a</loc><priority>0.8</priority></url>
            <url><loc>https://ex.org/b</loc><priority>0.8</priority></url>
        </urlset>"#;
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://ex.org/a");
        assert_eq!(entries[0].priority, 0.8);
    }

    #[test]
    fn skips_url_missing_loc() {
        let body = "<urlset><url><priority>0.5</priority></url></urlset>";
        assert!(parse_urlset(body).unwrap().is_empty());
    }

    #[test]
    fn bad_priority_and_lastmod_default_without_erroring() {
        let body = "<urlset><url><loc>https://ex.org/a</loc><priority>bogus</priority><lastmod>not-a-date</lastmod></url></urlset>";
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries[0].priority, 0.5);
        assert!(entries[0].last_modified.is_none());
    }

    #[test]
    fn parses_google_news_extension_when_complete() {
        let body = r#"<urlset xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">
            <url><loc>https://ex.org/story</loc>
                <news:news>
                    <news:publication>
                        <news:name>Example News</news:name>
                        <news:language>en</news:language>
                    </news:publication>
                    <news:title>Big story</news:title>
                </news:news>
            </url>
        </urlset>"#;
        let entries = parse_urlset(body).unwrap();
        let story = entries[0].news_story.as_ref().unwrap();
        assert_eq!(story.publication_name, "Example News");
        assert_eq!(story.publication_language, "en");
        assert_eq!(story.title.as_deref(), Some("Big story"));
    }

    #[test]
    fn discards_incomplete_news_extension_keeping_base_page() {
        let body = r#"<urlset xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">
            <url><loc>https://ex.org/story</loc>
                <news:news><news:publication><news:name>Example</news:name></news:publication></news:news>
            </url>
        </urlset>"#;
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].news_story.is_none());
    }

    #[test]
    fn ignores_news_element_under_unrecognised_namespace() {
        let body = r#"<urlset xmlns:foo="https://unrelated.example/ns">
            <url><loc>https://ex.org/story</loc>
                <foo:news>
                    <foo:publication><foo:name>Example News</foo:name><foo:language>en</foo:language></foo:publication>
                </foo:news>
            </url>
        </urlset>"#;
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].news_story.is_none());
    }

    #[test]
    fn parses_google_image_extension() {
        let body = r#"<urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
            <url><loc>https://ex.org/a</loc>
                <image:image><image:loc>https://ex.org/a.jpg</image:loc><image:caption>A</image:caption></image:image>
            </url>
        </urlset>"#;
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries[0].images.len(), 1);
        assert_eq!(entries[0].images[0].loc, "https://ex.org/a.jpg");
    }

    #[test]
    fn parses_xhtml_alternate_links() {
        let body = r#"<urlset xmlns:xhtml="http://www.w3.org/1999/xhtml">
            <url><loc>https://ex.org/a</loc>
                <xhtml:link rel="alternate" hreflang="fr" href="https://ex.org/fr/a"/>
            </url>
        </urlset>"#;
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries[0].alternates.len(), 1);
        assert_eq!(entries[0].alternates[0].hreflang, "fr");
    }

    #[test]
    fn namespace_tolerant_when_declarations_are_missing() {
        let body = "<urlset><url><loc>https://ex.org/a</loc></url></urlset>";
        assert_eq!(parse_urlset(body).unwrap().len(), 1);
    }

    #[test]
    fn truncated_document_keeps_prior_complete_urls() {
        let body = "<urlset><url><loc>https://ex.org/a</loc></url><url><loc>https://ex.org/b</loc></url><url><loc>https://ex.org/c";
        let entries = parse_urlset(body).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn drops_intra_file_duplicate_urls() {
        let body = "<urlset><url><loc>https://ex.org/a</loc></url><url><loc>https://ex.org/a</loc></url></urlset>";
        assert_eq!(parse_urlset(body).unwrap().len(), 1);
    }
}
