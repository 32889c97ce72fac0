//! Robots.txt parsing: extract `Sitemap:`/`Site-map:` directives in declaration order.
//!
//! Everything else in a robots.txt — `User-agent`, `Allow`, `Disallow`, comments — is outside
//! this crate's concern; `Disallow` rules are never interpreted here.

/// Extract the ordered, deduplicated list of sitemap URLs declared by a robots.txt body.
///
/// Matching is case-insensitive on the directive key (`Sitemap` / `Site-map`) but the URL
/// value is preserved verbatim. A second occurrence of the same URL within the file is
/// dropped; first-seen wins.
#[must_use]
pub fn parse_robots_txt(body: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut urls = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        let Some(rest) = strip_directive(line) else { continue };
        let url = rest.trim();
        if url.is_empty() {
            continue;
        }
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    }

    urls
}

/// If `line` begins with a `Sitemap:`/`Site-map:` directive (case-insensitive key), return the
/// text after the colon.
fn strip_directive(line: &str) -> Option<&str> {
    for key in ["Sitemap", "Site-map"] {
        if line.len() < key.len() + 1 {
            continue;
        }
        let (candidate_key, rest) = line.split_at(key.len());
        if candidate_key.eq_ignore_ascii_case(key) {
            if let Some(value) = rest.strip_prefix(':') {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_sitemap_directive() {
        let body = "User-agent: *\nDisallow: /admin\nSitemap: https://ex.org/sitemap.xml\n";
        assert_eq!(parse_robots_txt(body), vec!["https://ex.org/sitemap.xml"]);
    }

    #[test]
    fn extracts_site_map_variant_case_insensitively() {
        let body = "site-map: https://ex.org/a.xml\nSITEMAP: https://ex.org/b.xml\n";
        assert_eq!(
            parse_robots_txt(body),
            vec!["https://ex.org/a.xml", "https://ex.org/b.xml"]
        );
    }

    #[test]
    fn preserves_declaration_order_and_url_case() {
        let body = "Sitemap: https://Ex.org/Sitemap.XML\nSitemap: https://ex.org/other.xml\n";
        assert_eq!(
            parse_robots_txt(body),
            vec!["https://Ex.org/Sitemap.XML", "https://ex.org/other.xml"]
        );
    }

    #[test]
    fn drops_duplicate_urls_keeping_first() {
        let body = "Sitemap: https://ex.org/a.xml\nSitemap: https://ex.org/a.xml\n";
        assert_eq!(parse_robots_txt(body), vec!["https://ex.org/a.xml"]);
    }

    #[test]
    fn ignores_unrelated_directives() {
        let body = "User-agent: *\nAllow: /\n# comment\nDisallow: /private\n";
        assert!(parse_robots_txt(body).is_empty());
    }
}
