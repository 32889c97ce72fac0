//! XML dispatch and the concrete XML parser family.
//!
//! The dispatch step is a single streaming pass that looks only at the first depth-1 element's
//! local name — it never trusts `Content-Type`. Each concrete parser is itself a second
//! streaming pass over the same bytes (`quick_xml::Reader` + `read_event_into`, matching on
//! `Event::Start`/`Event::Text`/`Event::End`/`Event::Eof`).

mod atom;
mod rss;
mod sitemapindex;
mod urlset;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::entity::SitemapEntry;
use crate::error::{Error, Result};

pub use atom::parse_atom;
pub use rss::parse_rss;
pub use sitemapindex::parse_sitemap_index;
pub use urlset::parse_urlset;

/// The result of parsing one XML sitemap document.
#[derive(Debug)]
pub enum XmlDocument {
    /// A `<sitemapindex>` document: declared child sitemap URLs, in declaration order.
    Index(Vec<String>),
    /// A `<urlset>` document: parsed page entries.
    Urlset(Vec<SitemapEntry>),
    /// An RSS 2.0 `<rss>` document: parsed page entries.
    Rss(Vec<SitemapEntry>),
    /// An Atom `<feed>` document (0.3 or 1.0, undistinguished): parsed page entries.
    Atom(Vec<SitemapEntry>),
}

/// Whether `body`, after trimming leading whitespace, looks like XML (begins with `<`).
/// Content-type is deliberately never consulted: a server that mislabels a JSON or HTML error
/// page as `application/xml` should fail classification rather than have the engine guess.
#[must_use]
pub fn looks_like_xml(body: &str) -> bool {
    body.trim_start().starts_with('<')
}

/// Dispatch an XML document to its concrete parser based on the local name of the first
/// depth-1 element.
pub fn parse_xml(body: &str) -> Result<XmlDocument> {
    let root_name = find_root_element(body)?;
    match root_name.as_str() {
        "sitemapindex" => Ok(XmlDocument::Index(parse_sitemap_index(body)?)),
        "urlset" => Ok(XmlDocument::Urlset(parse_urlset(body)?)),
        "rss" => Ok(XmlDocument::Rss(parse_rss(body)?)),
        "feed" => Ok(XmlDocument::Atom(parse_atom(body)?)),
        other => Err(Error::Parse(format!("unrecognised root element <{other}>"))),
    }
}

/// Scan forward to the first `Event::Start`/`Event::Empty` and return its local name.
fn find_root_element(body: &str) -> Result<String> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                let name = e.local_name();
                return Ok(String::from_utf8_lossy(name.as_ref()).into_owned());
            },
            Ok(Event::Eof) => {
                return Err(Error::Parse("empty document, no root element found".into()));
            },
            Ok(_) => {},
            Err(e) => return Err(Error::Parse(format!("xml error: {e}"))),
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_like_xml_ignores_leading_whitespace() {
        assert!(looks_like_xml("  \n<urlset></urlset>"));
        assert!(!looks_like_xml("not xml"));
    }

    #[test]
    fn dispatches_on_root_element_local_name() {
        assert!(matches!(
            parse_xml("<sitemapindex></sitemapindex>").unwrap(),
            XmlDocument::Index(_)
        ));
        assert!(matches!(parse_xml("<urlset></urlset>").unwrap(), XmlDocument::Urlset(_)));
        assert!(matches!(parse_xml("<rss></rss>").unwrap(), XmlDocument::Rss(_)));
        assert!(matches!(parse_xml("<feed></feed>").unwrap(), XmlDocument::Atom(_)));
    }

    #[test]
    fn unrecognised_root_is_a_parse_error() {
        assert!(parse_xml("<html></html>").is_err());
    }

    #[test]
    fn empty_document_is_a_parse_error() {
        assert!(parse_xml("").is_err());
    }

    #[test]
    fn namespace_prefixed_root_is_matched_by_local_name() {
        assert!(matches!(
            parse_xml(r#"<ns:urlset xmlns:ns="http://www.sitemaps.org/schemas/sitemap/0.9"></ns:urlset>"#)
                .unwrap(),
            XmlDocument::Urlset(_)
        ));
    }
}
