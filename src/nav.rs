//! Sidebar navigation and active-link detection

use crate::models::EntityKind;

/// Whether a sidebar link should be highlighted for the current route.
///
/// A link is active on an exact match, or when the lowercased current path
/// contains the link's final segment (the text after its last `/`). Routes
/// sharing a trailing segment therefore both light up, e.g. `/settings/users`
/// and `/admin/users` against a link to `/users`.
pub fn is_active(current_path: &str, link_path: &str) -> bool {
    let last_segment = match link_path.rfind('/') {
        Some(idx) => &link_path[idx + 1..],
        None => link_path,
    };

    current_path == link_path || current_path.to_lowercase().contains(last_segment)
}

/// One sidebar entry
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub kind: EntityKind,
}

impl NavLink {
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            label: kind.plural().to_string(),
            href: kind.route().to_string(),
            kind,
        }
    }

    pub fn is_active(&self, current_path: &str) -> bool {
        is_active(current_path, &self.href)
    }
}

/// Sidebar links in display order
pub fn sidebar_links() -> Vec<NavLink> {
    EntityKind::ALL.iter().copied().map(NavLink::for_kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_active() {
        assert!(is_active("/dashboard/suppliers", "/dashboard/suppliers"));
    }

    #[test]
    fn test_trailing_segment_substring_is_active() {
        assert!(is_active("/admin/categories/list", "/categories"));
    }

    #[test]
    fn test_current_path_is_lowercased_but_link_is_not() {
        assert!(is_active("/Dashboard/LOCATIONS", "/dashboard/locations"));
        assert!(!is_active("/dashboard/locations", "/dashboard/Locations"));
    }

    #[test]
    fn test_shared_trailing_segment_matches_both_routes() {
        assert!(is_active("/settings/users", "/admin/users"));
        assert!(is_active("/admin/users", "/settings/users"));
    }

    #[test]
    fn test_unrelated_route_is_inactive() {
        assert!(!is_active("/dashboard/suppliers", "/dashboard/locations"));
    }

    #[test]
    fn test_trailing_slash_link_matches_everything() {
        assert!(is_active("/anything", "/dashboard/"));
    }

    #[test]
    fn test_sidebar_highlights_one_entity_route() {
        let current = EntityKind::Supplier.route();
        let active: Vec<_> = sidebar_links()
            .into_iter()
            .filter(|l| l.is_active(current))
            .map(|l| l.kind)
            .collect();
        assert_eq!(active, vec![EntityKind::Supplier]);
    }
}
