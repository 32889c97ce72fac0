//! Plain-text sitemap parsing: one URL per non-empty line.

use crate::entity::SitemapEntry;

/// Parse a plain-text page list: one absolute `http`/`https` URL per non-empty line, trimmed
/// of whitespace. Lines that do not parse as such a URL are silently skipped. Order is
/// preserved; intra-file duplicates are dropped (first wins).
#[must_use]
pub fn parse_text_sitemap(body: &str) -> Vec<SitemapEntry> {
    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(parsed) = url::Url::parse(line) else { continue };
        if !matches!(parsed.scheme(), "http" | "https") {
            continue;
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            continue;
        }
        if seen.insert(line.to_string()) {
            entries.push(SitemapEntry::new(line));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_url_per_line() {
        let body = "https://ex.org/a\nhttps://ex.org/b\n";
        let entries = parse_text_sitemap(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://ex.org/a");
        assert_eq!(entries[1].url, "https://ex.org/b");
    }

    #[test]
    fn skips_blank_lines_and_trims_whitespace() {
        let body = "  https://ex.org/a  \n\n\nhttps://ex.org/b\n";
        assert_eq!(parse_text_sitemap(body).len(), 2);
    }

    #[test]
    fn rejects_non_http_schemes_and_relative_lines() {
        let body = "ftp://ex.org/a\nnot a url\n/relative/path\n";
        assert!(parse_text_sitemap(body).is_empty());
    }

    #[test]
    fn rejects_urls_with_empty_host() {
        let body = "file:///etc/passwd\n";
        assert!(parse_text_sitemap(body).is_empty());
    }

    #[test]
    fn drops_intra_file_duplicates_keeping_first() {
        let body = "https://ex.org/a\nhttps://ex.org/a\n";
        assert_eq!(parse_text_sitemap(body).len(), 1);
    }
}
