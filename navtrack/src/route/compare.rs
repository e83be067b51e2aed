//! Route identity comparison.

use std::sync::Arc;

use super::model::Route;

/// Whether `current` starts a new navigation session relative to `previous`.
///
/// The same allocation is never new. Otherwise two routes are the same when
/// their overview geometry matches and they have the same number of legs;
/// routes without an overview geometry fall back to full structural equality.
pub fn is_new_route(previous: Option<&Arc<Route>>, current: &Arc<Route>) -> bool {
    match previous {
        None => true,
        Some(previous) if Arc::ptr_eq(previous, current) => false,
        Some(previous) => !same_route(previous, current),
    }
}

fn same_route(a: &Route, b: &Route) -> bool {
    match (&a.geometry, &b.geometry) {
        (Some(ga), Some(gb)) => ga == gb && a.legs.len() == b.legs.len(),
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(geometry: Option<&str>, distance: f64) -> Route {
        Route {
            distance,
            duration: 10.0,
            geometry: geometry.map(String::from),
            weight: None,
            legs: Vec::new(),
        }
    }

    #[test]
    fn test_no_previous_is_new() {
        assert!(is_new_route(None, &Arc::new(route(None, 1.0))));
    }

    #[test]
    fn test_same_arc_is_not_new() {
        let r = Arc::new(route(Some("abc"), 1.0));
        assert!(!is_new_route(Some(&r), &r));
    }

    #[test]
    fn test_equal_geometry_is_not_new() {
        let a = Arc::new(route(Some("abc"), 1.0));
        let b = Arc::new(route(Some("abc"), 2.0));
        assert!(!is_new_route(Some(&a), &b));
    }

    #[test]
    fn test_different_geometry_is_new() {
        let a = Arc::new(route(Some("abc"), 1.0));
        let b = Arc::new(route(Some("abd"), 1.0));
        assert!(is_new_route(Some(&a), &b));
    }

    #[test]
    fn test_missing_geometry_uses_structural_equality() {
        let a = Arc::new(route(None, 1.0));
        assert!(!is_new_route(Some(&a), &Arc::new(route(None, 1.0))));
        assert!(is_new_route(Some(&a), &Arc::new(route(None, 2.0))));
    }
}
