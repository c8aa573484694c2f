use super::host::{FilterId, ViewId};

/// Handles the highlighter caches between requests: the default view and
/// the color override filter attached to it.
///
/// Both start empty and are filled on the first request that shows the
/// default view; a purge that deletes the view clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    default_view: Option<ViewId>,
    default_filter: Option<FilterId>,
}

impl Session {
    /// The cached default view, if any.
    #[must_use]
    pub fn default_view(&self) -> Option<ViewId> {
        self.default_view
    }

    /// The filter attached to the cached default view, if any.
    #[must_use]
    pub fn default_filter(&self) -> Option<FilterId> {
        self.default_filter
    }

    /// Caches the default view and, when one was attached, its filter.
    pub fn remember(&mut self, view: ViewId, filter: Option<FilterId>) {
        self.default_view = Some(view);
        self.default_filter = filter;
    }

    /// Forgets both handles.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
