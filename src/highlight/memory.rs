use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{HostError, Result};
use crate::shape::GeometryObject;

use super::host::{
    ColorOverrideFilter, ElementId, FilterId, HostDocument, HostObject, HostObjectKind, Instance,
    ViewId,
};

/// Name of the view a fresh document opens with.
pub const START_VIEW_NAME: &str = "Start";

/// A visual element stored by [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct VisualElement {
    pub geometry: Vec<GeometryObject>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone)]
struct ViewRecord {
    name: String,
    filters: Vec<FilterId>,
}

/// Everything a rollback restores.
#[derive(Debug, Clone, Default)]
struct DocumentState {
    next_id: u64,
    elements: BTreeMap<ElementId, VisualElement>,
    objects: BTreeMap<ElementId, HostObject>,
    views: BTreeMap<ViewId, ViewRecord>,
    filters: BTreeMap<FilterId, ColorOverrideFilter>,
}

impl DocumentState {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A complete in-memory [`HostDocument`].
///
/// Mutation scopes snapshot the document state; a rollback restores the
/// snapshot. The active view, the selection and the message log are UI
/// state and survive rollbacks (the selection is pruned of ids that no
/// longer exist).
#[derive(Debug)]
pub struct MemoryDocument {
    state: DocumentState,
    open: Option<(String, DocumentState)>,
    active_view: Option<ViewId>,
    selection: Vec<ElementId>,
    messages: Vec<String>,
    committed: Vec<String>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty document showing a single start view.
    #[must_use]
    pub fn new() -> Self {
        let mut state = DocumentState::default();
        let start = ViewId(state.allocate());
        state.views.insert(
            start,
            ViewRecord {
                name: START_VIEW_NAME.to_string(),
                filters: Vec::new(),
            },
        );
        Self {
            state,
            open: None,
            active_view: Some(start),
            selection: Vec::new(),
            messages: Vec::new(),
            committed: Vec::new(),
        }
    }

    /// Adds a foreign object. Foreign objects are model content the
    /// highlighter selects from but never deletes.
    pub fn add_object(&mut self, kind: HostObjectKind) -> ElementId {
        let id = ElementId(self.state.allocate());
        self.state.objects.insert(id, HostObject { id, kind });
        id
    }

    /// Adds a family instance.
    pub fn add_instance(&mut self, instance: Instance) -> ElementId {
        self.add_object(HostObjectKind::Instance(instance))
    }

    /// Adds a level at `elevation`.
    pub fn add_level(&mut self, elevation: f64) -> ElementId {
        self.add_object(HostObjectKind::Level { elevation })
    }

    /// Messages shown to the user so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Labels of the committed mutation scopes, oldest first.
    #[must_use]
    pub fn committed_labels(&self) -> &[String] {
        &self.committed
    }

    /// Returns `true` while a mutation scope is open.
    #[must_use]
    pub fn is_mutation_open(&self) -> bool {
        self.open.is_some()
    }

    /// A visual element by id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&VisualElement> {
        self.state.elements.get(&id)
    }

    /// Number of visual elements.
    #[must_use]
    pub fn visual_element_count(&self) -> usize {
        self.state.elements.len()
    }

    /// Number of foreign objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.state.objects.len()
    }

    /// Names of every view, in creation order.
    #[must_use]
    pub fn view_names(&self) -> Vec<&str> {
        self.state.views.values().map(|v| v.name.as_str()).collect()
    }

    /// Filters attached to a view.
    #[must_use]
    pub fn filters_of(&self, view: ViewId) -> Vec<&ColorOverrideFilter> {
        self.state
            .views
            .get(&view)
            .map(|record| {
                record
                    .filters
                    .iter()
                    .filter_map(|id| self.state.filters.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of filters in the document.
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.state.filters.len()
    }

    fn require_open(&self) -> Result<()> {
        if self.open.is_some() {
            Ok(())
        } else {
            Err(HostError::NoOpenMutation.into())
        }
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut VisualElement> {
        self.state
            .elements
            .get_mut(&id)
            .ok_or_else(|| HostError::ElementNotFound(id.to_string()).into())
    }
}

impl HostDocument for MemoryDocument {
    fn begin_mutation(&mut self, label: &str) -> Result<()> {
        if let Some((open, _)) = &self.open {
            return Err(HostError::MutationInProgress(open.clone()).into());
        }
        self.open = Some((label.to_string(), self.state.clone()));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let (label, _) = self.open.take().ok_or(HostError::NoOpenMutation)?;
        debug!(%label, "mutation committed");
        self.committed.push(label);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let (label, snapshot) = self.open.take().ok_or(HostError::NoOpenMutation)?;
        self.state = snapshot;
        let state = &self.state;
        self.selection
            .retain(|id| state.elements.contains_key(id) || state.objects.contains_key(id));
        debug!(%label, "mutation rolled back");
        Ok(())
    }

    fn create_visual_element(&mut self, geometry: Vec<GeometryObject>) -> Result<ElementId> {
        self.require_open()?;
        if geometry.is_empty() {
            return Err(HostError::Rejected("a visual element needs geometry".into()).into());
        }
        let id = ElementId(self.state.allocate());
        self.state
            .elements
            .insert(id, VisualElement { geometry, tag: None });
        Ok(id)
    }

    fn set_tag(&mut self, id: ElementId, tag: &str) -> Result<()> {
        self.require_open()?;
        self.element_mut(id)?.tag = Some(tag.to_string());
        Ok(())
    }

    fn tagged_elements(&self) -> Vec<ElementId> {
        self.state.elements.keys().copied().collect()
    }

    fn element_tag(&self, id: ElementId) -> Option<String> {
        self.state.elements.get(&id).and_then(|e| e.tag.clone())
    }

    fn delete(&mut self, id: ElementId) -> Result<()> {
        self.require_open()?;
        self.state
            .elements
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| HostError::ElementNotFound(id.to_string()).into())
    }

    fn find_view(&self, name: &str) -> Option<ViewId> {
        self.state
            .views
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(id, _)| *id)
    }

    fn create_view(&mut self, name: &str) -> Result<ViewId> {
        self.require_open()?;
        if self.find_view(name).is_some() {
            return Err(HostError::Rejected(format!("a view named '{name}' already exists")).into());
        }
        let id = ViewId(self.state.allocate());
        self.state.views.insert(
            id,
            ViewRecord {
                name: name.to_string(),
                filters: Vec::new(),
            },
        );
        Ok(id)
    }

    fn active_view(&self) -> Option<ViewId> {
        self.active_view
    }

    fn activate_view(&mut self, id: ViewId) -> Result<()> {
        if let Some((label, _)) = &self.open {
            return Err(HostError::MutationInProgress(label.clone()).into());
        }
        if !self.is_view_valid(id) {
            return Err(HostError::ViewNotFound(id.to_string()).into());
        }
        self.active_view = Some(id);
        Ok(())
    }

    fn delete_view(&mut self, id: ViewId) -> Result<()> {
        self.require_open()?;
        if self.active_view == Some(id) {
            return Err(HostError::ActiveViewConflict.into());
        }
        self.state
            .views
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| HostError::ViewNotFound(id.to_string()).into())
    }

    fn is_view_valid(&self, id: ViewId) -> bool {
        self.state.views.contains_key(&id)
    }

    fn add_color_override_filter(
        &mut self,
        view: ViewId,
        filter: &ColorOverrideFilter,
    ) -> Result<FilterId> {
        self.require_open()?;
        if !self.is_view_valid(view) {
            return Err(HostError::ViewNotFound(view.to_string()).into());
        }
        let existing = self
            .state
            .filters
            .iter()
            .find(|(_, f)| f.name == filter.name)
            .map(|(id, _)| *id);
        let id = match existing {
            Some(id) => id,
            None => {
                let id = FilterId(self.state.allocate());
                self.state.filters.insert(id, filter.clone());
                id
            }
        };
        if let Some(record) = self.state.views.get_mut(&view) {
            if !record.filters.contains(&id) {
                record.filters.push(id);
            }
        }
        Ok(id)
    }

    fn selection(&self) -> Vec<HostObject> {
        self.selection
            .iter()
            .filter_map(|id| {
                self.state.objects.get(id).cloned().or_else(|| {
                    self.state.elements.contains_key(id).then(|| HostObject {
                        id: *id,
                        kind: HostObjectKind::Other,
                    })
                })
            })
            .collect()
    }

    fn set_selection(&mut self, ids: &[ElementId]) -> Result<()> {
        if let Some(missing) = ids
            .iter()
            .find(|id| !self.state.objects.contains_key(*id) && !self.state.elements.contains_key(*id))
        {
            return Err(HostError::ElementNotFound(missing.to_string()).into());
        }
        self.selection = ids.to_vec();
        Ok(())
    }

    fn notify_user(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
