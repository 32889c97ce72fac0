//! The recursion controller: depth bound, cycle detection, and the two pluggable filter
//! callbacks, applied list-filter-then-per-url.

use std::collections::HashSet;

/// Per-URL filter: `(url, recursion_level, parent_urls_set) -> keep`.
pub type UrlFilter = Box<dyn Fn(&str, u8, &HashSet<String>) -> bool + Send + Sync>;

/// List filter: `(urls_list, recursion_level, parent_urls_set) -> filtered_subset`.
pub type ListFilter = Box<dyn Fn(&[String], u8, &HashSet<String>) -> Vec<String> + Send + Sync>;

/// The two filter callbacks an embedder may supply to `sitemap_tree_for_homepage`, carried by
/// value as capability objects rather than trait references.
#[derive(Default)]
pub struct RecursionFilters {
    /// Applied first: replaces the declared child list with a filtered subset.
    pub list: Option<ListFilter>,
    /// Applied second: tested independently against each surviving URL.
    pub per_url: Option<UrlFilter>,
}

impl RecursionFilters {
    /// Apply the list filter (if any), then the per-URL filter (if any), to `candidates`.
    ///
    /// The engine does not catch panics raised from either callback — a user callback
    /// error is the one failure mode allowed to abort the whole call.
    #[must_use]
    pub fn apply(&self, candidates: Vec<String>, depth: u8, ancestors: &HashSet<String>) -> Vec<String> {
        let after_list = match &self.list {
            Some(f) => f(&candidates, depth, ancestors),
            None => candidates,
        };
        match &self.per_url {
            Some(f) => after_list.into_iter().filter(|u| f(u, depth, ancestors)).collect(),
            None => after_list,
        }
    }
}

/// Why a candidate child URL was rejected before (or immediately after) fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecursionRejection {
    /// Triggered when `d >= max_depth`.
    DepthExceeded,
    /// Triggered when the URL (pre- or post-redirect) is already an ancestor.
    Cycle,
}

impl RecursionRejection {
    /// Human-readable reason string, used verbatim in the resulting `InvalidSitemap`.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::DepthExceeded => "recursion depth exceeded",
            Self::Cycle => "recursive sitemap",
        }
    }
}

/// Depth bound check, applied before fetching.
#[must_use]
pub const fn check_depth(depth: u8, max_depth: u8) -> Option<RecursionRejection> {
    if depth >= max_depth {
        Some(RecursionRejection::DepthExceeded)
    } else {
        None
    }
}

/// Cycle check, applied both before fetching (against the declared URL)
/// and after fetching (against the post-redirect final URL).
#[must_use]
pub fn check_cycle(url: &str, ancestors: &HashSet<String>) -> Option<RecursionRejection> {
    ancestors.contains(url).then_some(RecursionRejection::Cycle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_filter_runs_before_per_url_filter() {
        let filters = RecursionFilters {
            list: Some(Box::new(|urls, _, _| {
                urls.iter().filter(|u| !u.contains("draft")).cloned().collect()
            })),
            per_url: Some(Box::new(|u, _, _| u.contains("/en/"))),
        };
        let candidates = vec!["/en/a".to_string(), "/en/draft".to_string(), "/fr/a".to_string()];
        let result = filters.apply(candidates, 0, &HashSet::new());
        assert_eq!(result, vec!["/en/a".to_string()]);
    }

    #[test]
    fn no_filters_is_identity() {
        let filters = RecursionFilters::default();
        let candidates = vec!["/a".to_string(), "/b".to_string()];
        assert_eq!(filters.apply(candidates.clone(), 0, &HashSet::new()), candidates);
    }

    #[test]
    fn depth_bound_triggers_at_max_depth() {
        assert_eq!(check_depth(10, 10), Some(RecursionRejection::DepthExceeded));
        assert_eq!(check_depth(9, 10), None);
    }

    #[test]
    fn cycle_check_detects_ancestor_membership() {
        let mut ancestors = HashSet::new();
        ancestors.insert("https://ex.org/sitemap_index.xml".to_string());
        assert_eq!(
            check_cycle("https://ex.org/sitemap_index.xml", &ancestors),
            Some(RecursionRejection::Cycle)
        );
        assert_eq!(check_cycle("https://ex.org/other.xml", &ancestors), None);
    }
}
