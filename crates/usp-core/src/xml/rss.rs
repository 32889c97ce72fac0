//! RSS 2.0 parsing: one page per `<item>` that declares `title`, `description`, and
//! `link`; channel-level metadata is ignored.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::date::parse_date;
use crate::entity::SitemapEntry;
use crate::error::{Error, Result};

#[derive(Default)]
struct ItemDraft {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
}

impl ItemDraft {
    fn finish(self) -> Option<SitemapEntry> {
        let _title = self.title?;
        let _description = self.description?;
        let link = self.link?;
        let mut entry = SitemapEntry::new(link);
        entry.last_modified = self.pub_date.as_deref().and_then(parse_date);
        Some(entry)
    }
}

/// Parse an RSS 2.0 `<rss>` document into page entries.
pub fn parse_rss(body: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();

    let mut in_item = false;
    let mut field: Option<String> = None;
    let mut draft = ItemDraft::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => {
                    in_item = true;
                    draft = ItemDraft::default();
                },
                other if in_item => field = Some(String::from_utf8_lossy(other).into_owned()),
                _ => {},
            },
            Ok(Event::Text(t)) if in_item => {
                if let Some(name) = &field {
                    let text = t.unescape().map_err(xml_err)?.into_owned();
                    match name.as_str() {
                        "title" => draft.title = Some(text),
                        "description" => draft.description = Some(text),
                        "link" => draft.link = Some(text),
                        "pubDate" => draft.pub_date = Some(text),
                        _ => {},
                    }
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"item" => {
                    in_item = false;
                    if let Some(entry) = std::mem::take(&mut draft).finish() {
                        if seen.insert(entry.url.clone()) {
                            entries.push(entry);
                        }
                    }
                },
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => {
                tracing::warn!(error = %e, "truncated or malformed rss feed, keeping partial result");
                break;
            },
        }
        buf.clear();
    }

    Ok(entries)
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Parse(format!("xml error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<rss version="2.0"><channel>
        <title>Ignored channel title</title>
        <item>
            <title>Post one</title>
            <description>First post</description>
            <link>https://ex.org/1</link>
            <pubDate>Mon, 15 Jan 2024 10:30:00 GMT</pubDate>
        </item>
        <item>
            <title>Missing description</title>
            <link>https://ex.org/2</link>
        </item>
    </channel></rss>"#;

    #[test]
    fn parses_complete_items_only() {
        let entries = parse_rss(FEED).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://ex.org/1");
        let last_modified = entries[0].last_modified.unwrap();
        assert_eq!(last_modified.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn drops_items_missing_required_fields() {
        let body = "<rss><channel><item><title>T</title><link>https://ex.org/a</link></item></channel></rss>";
        assert!(parse_rss(body).unwrap().is_empty());
    }

    #[test]
    fn drops_intra_file_duplicate_links() {
        let body = "<rss><channel>\
            <item><title>T</title><description>D</description><link>https://ex.org/a</link></item>\
            <item><title>T2</title><description>D2</description><link>https://ex.org/a</link></item>\
            </channel></rss>";
        assert_eq!(parse_rss(body).unwrap().len(), 1);
    }
}
