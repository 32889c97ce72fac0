//! `<sitemapindex>` parsing: each `<sitemap>` contributes one child URL via its `<loc>`.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Parse a `<sitemapindex>` document into the ordered, deduplicated list of declared child
/// URLs (first-seen wins on duplicates).
pub fn parse_sitemap_index(body: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut seen = std::collections::HashSet::new();
    let mut urls = Vec::new();
    let mut in_sitemap = false;
    let mut in_loc = false;
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                match e.local_name().as_ref() {
                    b"sitemap" => {
                        in_sitemap = true;
                        current_loc = None;
                    },
                    b"loc" if in_sitemap => in_loc = true,
                    _ => {},
                }
            },
            Ok(Event::Text(t)) if in_loc => {
                current_loc = Some(t.unescape().map_err(xml_err)?.into_owned());
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"loc" => in_loc = false,
                b"sitemap" => {
                    in_sitemap = false;
                    if let Some(loc) = current_loc.take() {
                        if seen.insert(loc.clone()) {
                            urls.push(loc);
                        }
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => {
                tracing::warn!(error = %e, "truncated or malformed sitemapindex, keeping partial result");
                break;
            },
        }
        buf.clear();
    }

    Ok(urls)
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Parse(format!("xml error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"<?xml version="1.0"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://ex.org/a.xml</loc></sitemap>
  <sitemap><loc>https://ex.org/b.xml</loc></sitemap>
</sitemapindex>"#;

    #[test]
    fn parses_child_locs_in_order() {
        assert_eq!(
            parse_sitemap_index(INDEX).unwrap(),
            vec!["https://ex.org/a.xml", "https://ex.org/b.xml"]
        );
    }

    #[test]
    fn drops_duplicate_children_keeping_first() {
        let body = "<sitemapindex><sitemap><loc>https://ex.org/a.xml</loc></sitemap><sitemap><loc>https://ex.org/a.xml</loc></sitemap></sitemapindex>";
        assert_eq!(parse_sitemap_index(body).unwrap(), vec!["https://ex.org/a.xml"]);
    }

    #[test]
    fn sitemap_without_loc_contributes_nothing() {
        let body = "<sitemapindex><sitemap><lastmod>2024-01-01</lastmod></sitemap></sitemapindex>";
        assert!(parse_sitemap_index(body).unwrap().is_empty());
    }

    #[test]
    fn truncated_document_keeps_partial_result() {
        let body = "<sitemapindex><sitemap><loc>https://ex.org/a.xml</loc></sitemap><sitemap><loc>https://ex.org/b";
        assert_eq!(parse_sitemap_index(body).unwrap(), vec!["https://ex.org/a.xml"]);
    }
}
