//! Atom 0.3/1.0 parsing: one page per `<entry>`, version undistinguished. The two Atom
//! generations differ mainly in which date element they use (`modified`/`issued` for 0.3,
//! `updated` for 1.0); this parser accepts all three and prefers `updated`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::date::parse_date;
use crate::entity::SitemapEntry;
use crate::error::{Error, Result};

#[derive(Default)]
struct EntryDraft {
    alternate_link: Option<String>,
    first_unrelled_link: Option<String>,
    updated: Option<String>,
    modified: Option<String>,
    issued: Option<String>,
}

impl EntryDraft {
    fn finish(self) -> Option<SitemapEntry> {
        let link = self.alternate_link.or(self.first_unrelled_link)?;
        let mut entry = SitemapEntry::new(link);
        entry.last_modified = [self.updated, self.modified, self.issued]
            .into_iter()
            .flatten()
            .find_map(|s| parse_date(&s));
        Some(entry)
    }
}

/// Parse an Atom `<feed>` document into page entries.
pub fn parse_atom(body: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();

    let mut in_entry = false;
    let mut field: Option<String> = None;
    let mut draft = EntryDraft::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => {
                    in_entry = true;
                    draft = EntryDraft::default();
                },
                b"link" if in_entry => record_link(&e, &mut draft),
                other if in_entry => field = Some(String::from_utf8_lossy(other).into_owned()),
                _ => {},
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"link" && in_entry {
                    record_link(&e, &mut draft);
                }
            },
            Ok(Event::Text(t)) if in_entry => {
                if let Some(name) = &field {
                    let text = t.unescape().map_err(xml_err)?.into_owned();
                    match name.as_str() {
                        "updated" => draft.updated = Some(text),
                        "modified" => draft.modified = Some(text),
                        "issued" => draft.issued = Some(text),
                        _ => {},
                    }
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"entry" => {
                    in_entry = false;
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
                tracing::warn!(error = %e, "truncated or malformed atom feed, keeping partial result");
                break;
            },
        }
        buf.clear();
    }

    Ok(entries)
}

fn record_link(e: &BytesStart, draft: &mut EntryDraft) {
    let mut rel = None;
    let mut href = None;
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"rel" => rel = attr.unescape_value().ok().map(|v| v.into_owned()),
            b"href" => href = attr.unescape_value().ok().map(|v| v.into_owned()),
            _ => {},
        }
    }
    let Some(href) = href else { return };
    match rel.as_deref() {
        Some("alternate") => {
            draft.alternate_link.get_or_insert(href);
        },
        None => {
            draft.first_unrelled_link.get_or_insert(href);
        },
        Some(_) => {},
    }
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Parse(format!("xml error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_alternate_link_over_unrelled() {
        let body = r#"<feed><entry>
            <link rel="self" href="https://ex.org/self"/>
            <link rel="alternate" href="https://ex.org/a"/>
            <updated>2024-01-15T10:00:00Z</updated>
        </entry></feed>"#;
        let entries = parse_atom(body).unwrap();
        assert_eq!(entries[0].url, "https://ex.org/a");
    }

    #[test]
    fn falls_back_to_first_unrelled_link() {
        let body = r#"<feed><entry><link href="https://ex.org/a"/></entry></feed>"#;
        let entries = parse_atom(body).unwrap();
        assert_eq!(entries[0].url, "https://ex.org/a");
    }

    #[test]
    fn drops_entries_without_usable_link() {
        let body = r#"<feed><entry><link rel="self" href="https://ex.org/self"/></entry></feed>"#;
        assert!(parse_atom(body).unwrap().is_empty());
    }

    #[test]
    fn date_fallback_order_prefers_updated_then_modified_then_issued() {
        let body = r#"<feed><entry>
            <link href="https://ex.org/a"/>
            <modified>2024-02-02T00:00:00Z</modified>
            <issued>2024-03-03T00:00:00Z</issued>
        </entry></feed>"#;
        let entries = parse_atom(body).unwrap();
        assert_eq!(entries[0].last_modified.unwrap().format("%Y-%m-%d").to_string(), "2024-02-02");
    }
}
