//! Tag allocation and the bulk purge of tagged elements.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::Result;

use super::host::{ElementId, HostDocument};
use super::session::Session;

/// Returns the first of `prefix + n`, `prefix + (n + 1)`, … not present in
/// `existing`, where `n` is the number of existing elements.
///
/// Probing starts at the element count, not at zero, so numbers freed by
/// deleting low-tagged elements are not reused while higher ones exist.
///
/// `existing` does not include the element about to be tagged, so the first
/// tag of an empty document is `prefix + 0`, not `prefix + 1`.
#[must_use]
pub fn next_tag(prefix: &str, existing: &[Option<String>]) -> String {
    let taken: HashSet<&str> = existing.iter().flatten().map(String::as_str).collect();
    (existing.len()..)
        .map(|index| format!("{prefix}{index}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| prefix.to_string())
}

/// Tags of every visual element of `doc`, untagged ones as `None`.
#[must_use]
pub fn existing_tags<D: HostDocument + ?Sized>(doc: &D) -> Vec<Option<String>> {
    doc.tagged_elements()
        .into_iter()
        .map(|id| doc.element_tag(id))
        .collect()
}

/// What happened to the cached default view during a purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDisposition {
    /// No live default view was cached.
    NotCached,
    /// The default view was deleted and the session cleared.
    Deleted,
    /// The default view is the displayed one and was kept.
    RetainedActive,
}

/// Outcome of [`purge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: Vec<ElementId>,
    pub view: ViewDisposition,
}

/// Deletes every visual element, then the cached default view unless it is
/// displayed.
///
/// Must run inside an open mutation. The displayed view is never handed to
/// the host for deletion; the report says it was retained and the element
/// deletions stand.
///
/// # Errors
///
/// Propagates host failures while deleting.
pub fn purge<D: HostDocument + ?Sized>(doc: &mut D, session: &mut Session) -> Result<PurgeReport> {
    let removed = doc.tagged_elements();
    for id in &removed {
        doc.delete(*id)?;
    }

    let view = match session.default_view() {
        Some(view) if doc.is_view_valid(view) => {
            if doc.active_view() == Some(view) {
                warn!(%view, "default view is displayed, keeping it");
                ViewDisposition::RetainedActive
            } else {
                doc.delete_view(view)?;
                session.clear();
                ViewDisposition::Deleted
            }
        }
        _ => {
            session.clear();
            ViewDisposition::NotCached
        }
    };

    info!(removed = removed.len(), ?view, "purged visual elements");
    Ok(PurgeReport { removed, view })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::BoundedCurve;
    use crate::highlight::MemoryDocument;
    use crate::math::Point3;
    use crate::shape::GeometryObject;

    fn tags(list: &[Option<&str>]) -> Vec<Option<String>> {
        list.iter().map(|t| t.map(str::to_string)).collect()
    }

    fn line() -> Vec<GeometryObject> {
        vec![BoundedCurve::line(Point3::origin(), Point3::new(0.0, 1.0, 0.0))
            .unwrap()
            .into()]
    }

    // ── NextTag ─────────────────────────────────────────────

    #[test]
    fn empty_document_starts_at_zero() {
        assert_eq!(next_tag("DSF", &[]), "DSF0");
    }

    #[test]
    fn probe_starts_at_count() {
        assert_eq!(next_tag("DSF", &tags(&[Some("DSF0"), Some("DSF1")])), "DSF2");
        // DSF0 was deleted externally; its number is not reused.
        assert_eq!(next_tag("DSF", &tags(&[Some("DSF1"), Some("DSF2")])), "DSF3");
        assert_eq!(next_tag("DSF", &tags(&[Some("DSF2"), Some("DSF3")])), "DSF4");
    }

    #[test]
    fn untagged_elements_still_count() {
        assert_eq!(next_tag("DSF", &tags(&[None, Some("DSF0")])), "DSF2");
        assert_eq!(next_tag("DSF", &tags(&[Some("DSF1"), None])), "DSF2");
    }

    #[test]
    fn repeated_allocation_is_distinct() {
        let mut existing = Vec::new();
        for _ in 0..50 {
            let tag = next_tag("X", &existing);
            assert!(!existing.contains(&Some(tag.clone())));
            existing.push(Some(tag));
        }
    }

    // ── Purge ───────────────────────────────────────────────

    #[test]
    fn purge_of_empty_document_is_noop() {
        let mut doc = MemoryDocument::new();
        let mut session = Session::default();
        doc.begin_mutation("purge").unwrap();
        let report = purge(&mut doc, &mut session).unwrap();
        doc.commit().unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(report.view, ViewDisposition::NotCached);
        assert_eq!(doc.view_names().len(), 1);
    }

    #[test]
    fn purge_spares_foreign_objects_and_inactive_view() {
        let mut doc = MemoryDocument::new();
        let level = doc.add_level(0.0);
        let mut session = Session::default();

        doc.begin_mutation("setup").unwrap();
        let a = doc.create_visual_element(line()).unwrap();
        let b = doc.create_visual_element(line()).unwrap();
        let view = doc.create_view("DSF View").unwrap();
        doc.commit().unwrap();
        session.remember(view, None);

        doc.begin_mutation("purge").unwrap();
        let report = purge(&mut doc, &mut session).unwrap();
        doc.commit().unwrap();

        assert_eq!(report.removed, [a, b]);
        assert_eq!(report.view, ViewDisposition::Deleted);
        assert_eq!(doc.visual_element_count(), 0);
        assert_eq!(doc.object_count(), 1);
        doc.set_selection(&[level]).unwrap();
        assert!(!doc.is_view_valid(view));
        assert_eq!(session, Session::default());
    }

    #[test]
    fn displayed_view_is_retained() {
        let mut doc = MemoryDocument::new();
        let mut session = Session::default();
        doc.begin_mutation("setup").unwrap();
        doc.create_visual_element(line()).unwrap();
        let view = doc.create_view("DSF View").unwrap();
        doc.commit().unwrap();
        doc.activate_view(view).unwrap();
        session.remember(view, None);

        doc.begin_mutation("purge").unwrap();
        let report = purge(&mut doc, &mut session).unwrap();
        doc.commit().unwrap();

        assert_eq!(report.view, ViewDisposition::RetainedActive);
        assert_eq!(report.removed.len(), 1);
        assert_eq!(doc.visual_element_count(), 0);
        assert!(doc.is_view_valid(view));
        assert_eq!(session.default_view(), Some(view));
    }
}
