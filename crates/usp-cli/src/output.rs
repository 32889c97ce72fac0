//! Rendering for the `ls` subcommand's two output formats.

use std::fmt::Write as _;

use usp_core::SitemapEntity;

use crate::cli::OutputFormat;

/// Render `root` in the requested format, optionally stripping `prefix` from every printed URL.
#[must_use]
pub fn render(format: OutputFormat, root: &SitemapEntity, prefix: Option<&str>) -> String {
    match format {
        OutputFormat::Tabtree => render_tabtree(root, prefix),
        OutputFormat::Pages => render_pages(root, prefix),
    }
}

fn render_tabtree(root: &SitemapEntity, prefix: Option<&str>) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0, prefix);
    out
}

fn write_node(out: &mut String, node: &SitemapEntity, depth: usize, prefix: Option<&str>) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{} {}", kind_label(node), strip(node.url(), prefix));

    if let SitemapEntity::InvalidSitemap { reason, .. } = node {
        let _ = writeln!(out, "{indent}  ! {reason}");
    }

    for child in node.sub_sitemaps() {
        write_node(out, child, depth + 1, prefix);
    }

    for page in node.pages() {
        let _ = writeln!(out, "{indent}  - {}", strip(&page.url, prefix));
    }
}

fn render_pages(root: &SitemapEntity, prefix: Option<&str>) -> String {
    let mut out = String::new();
    for page in root.all_pages() {
        let _ = writeln!(out, "{}", strip(&page.url, prefix));
    }
    out
}

const fn kind_label(node: &SitemapEntity) -> &'static str {
    match node {
        SitemapEntity::IndexWebsiteSitemap { .. } => "[site]",
        SitemapEntity::IndexRobotsTxtSitemap { .. } => "[robots]",
        SitemapEntity::IndexXMLSitemap { .. } => "[index]",
        SitemapEntity::PagesXMLSitemap { .. } => "[urlset]",
        SitemapEntity::PagesTextSitemap { .. } => "[text]",
        SitemapEntity::PagesRSSSitemap { .. } => "[rss]",
        SitemapEntity::PagesAtomSitemap { .. } => "[atom]",
        SitemapEntity::InvalidSitemap { .. } => "[invalid]",
    }
}

fn strip<'a>(url: &'a str, prefix: Option<&str>) -> &'a str {
    match prefix {
        Some(p) => url.strip_prefix(p).unwrap_or(url),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use usp_core::PageStore;

    use super::*;

    #[test]
    fn tabtree_indents_children_under_their_parent() {
        let root = SitemapEntity::IndexWebsiteSitemap {
            url: "https://ex.org".into(),
            sub_sitemaps: vec![SitemapEntity::PagesTextSitemap {
                url: "https://ex.org/sitemap.txt".into(),
                pages: PageStore::new(vec![usp_core::SitemapEntry::new("https://ex.org/a")]).unwrap(),
            }],
        };
        let rendered = render(OutputFormat::Tabtree, &root, None);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[site] https://ex.org");
        assert!(lines[1].starts_with("  [text] "));
        assert!(lines[2].trim_start().starts_with("- https://ex.org/a"));
    }

    #[test]
    fn pages_format_flattens_to_one_url_per_line() {
        let root = SitemapEntity::PagesTextSitemap {
            url: "https://ex.org/sitemap.txt".into(),
            pages: PageStore::new(vec![
                usp_core::SitemapEntry::new("https://ex.org/a"),
                usp_core::SitemapEntry::new("https://ex.org/b"),
            ])
            .unwrap(),
        };
        let rendered = render(OutputFormat::Pages, &root, None);
        assert_eq!(rendered, "https://ex.org/a\nhttps://ex.org/b\n");
    }

    #[test]
    fn strip_prefix_removes_leading_homepage_url() {
        assert_eq!(strip("https://ex.org/a", Some("https://ex.org")), "/a");
        assert_eq!(strip("https://ex.org/a", None), "https://ex.org/a");
    }
}
