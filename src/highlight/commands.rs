//! Ready-made commands acting on the current selection.
//!
//! Each command runs its element creation in one labelled mutation and
//! reports failure to the user instead of returning it.

use tracing::{info, warn};

use crate::error::{ErrorKind, OperationError, Result};
use crate::geometry::Plane;
use crate::math::{Point3, Vector3};

use super::host::{ElementId, HostDocument, HostObjectKind, Instance};
use super::{with_mutation, Highlighter};

/// Result of a command, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Succeeded,
    Failed,
}

/// The commands offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    /// Solid per selected instance bounding box, then show the default view.
    BoundingBoxes,
    /// Facing vector of each selected point-located instance, then show the
    /// default view.
    Vectors,
    /// Largest face of each selected instance; the new elements become the
    /// selection.
    BiggestFace,
    /// Horizontal slab at each selected level's elevation.
    LevelPlanes,
    /// Remove everything the highlighter created.
    ClearAll,
}

impl DemoCommand {
    pub const ALL: [Self; 5] = [
        Self::BoundingBoxes,
        Self::Vectors,
        Self::BiggestFace,
        Self::LevelPlanes,
        Self::ClearAll,
    ];

    /// Label of the mutation the command runs in.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BoundingBoxes => "DSF_Highlight Bbox",
            Self::Vectors => "DSF_Highlight Vector",
            Self::BiggestFace => "DSF_Highlight Face",
            Self::LevelPlanes => "DSF_Highlight Level Plane",
            Self::ClearAll => super::CLEAR_ALL_LABEL,
        }
    }

    /// Runs the command against the current selection of `doc`.
    ///
    /// A failure rolls back the command's mutation, is shown to the user and
    /// yields [`CommandStatus::Failed`].
    pub fn run<D: HostDocument + ?Sized>(
        self,
        highlighter: &mut Highlighter,
        doc: &mut D,
    ) -> CommandStatus {
        match self.execute(highlighter, doc) {
            Ok(()) => {
                info!(command = self.label(), "command succeeded");
                CommandStatus::Succeeded
            }
            Err(err) => {
                warn!(command = self.label(), error = %err, "command failed");
                doc.notify_user(&err.to_string());
                CommandStatus::Failed
            }
        }
    }

    fn execute<D: HostDocument + ?Sized>(self, highlighter: &mut Highlighter, doc: &mut D) -> Result<()> {
        match self {
            Self::BoundingBoxes => {
                let instances = selected_instances(doc)?;
                with_mutation(doc, self.label(), |doc| {
                    for (_, instance) in &instances {
                        match highlighter.bounding_box(doc, instance.bounding_box.as_ref()) {
                            Err(err) if err.kind() == ErrorKind::NoGeometry => {}
                            other => {
                                other?;
                            }
                        }
                    }
                    Ok(())
                })?;
                highlighter.on_view_3d(doc)?;
            }
            Self::Vectors => {
                let located: Vec<(Point3, Vector3)> = selected_instances(doc)?
                    .into_iter()
                    .filter_map(|(_, instance)| instance.location.map(|at| (at, instance.facing)))
                    .collect();
                if located.is_empty() {
                    return Err(nothing_selected("point-located family instance(s)"));
                }
                with_mutation(doc, self.label(), |doc| {
                    for (origin, facing) in &located {
                        highlighter.vector(doc, *origin, *facing)?;
                    }
                    Ok(())
                })?;
                highlighter.on_view_3d(doc)?;
            }
            Self::BiggestFace => {
                let instances = selected_instances(doc)?;
                with_mutation(doc, self.label(), |doc| {
                    let mut created = Vec::with_capacity(instances.len());
                    for (id, instance) in &instances {
                        created.push(highlight_biggest_face(highlighter, doc, *id, instance)?);
                    }
                    doc.set_selection(&created)
                })?;
            }
            Self::LevelPlanes => {
                let elevations = selected_levels(doc);
                if elevations.is_empty() {
                    return Err(nothing_selected("level(s)"));
                }
                let extent = highlighter.config().level_plane_extent;
                with_mutation(doc, self.label(), |doc| {
                    for elevation in &elevations {
                        let plane = Plane::from_normal(Point3::new(0.0, 0.0, *elevation), Vector3::z())?;
                        highlighter.plane_with_size(doc, &plane, extent, extent)?;
                    }
                    Ok(())
                })?;
            }
            Self::ClearAll => {
                highlighter.clear_all(doc)?;
            }
        }
        Ok(())
    }
}

fn highlight_biggest_face<D: HostDocument + ?Sized>(
    highlighter: &Highlighter,
    doc: &mut D,
    id: ElementId,
    instance: &Instance,
) -> Result<ElementId> {
    let geometry = instance
        .geometry
        .as_ref()
        .ok_or_else(|| OperationError::NoGeometry(format!("{id} has no geometry instance")))?;
    let face = geometry
        .faces
        .iter()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .ok_or_else(|| OperationError::NoGeometry(format!("{id} has no faces")))?;
    highlighter.face(doc, &face.triangles, Some(&geometry.transform))
}

fn selected_instances<D: HostDocument + ?Sized>(doc: &D) -> Result<Vec<(ElementId, Instance)>> {
    let instances: Vec<_> = doc
        .selection()
        .into_iter()
        .filter_map(|object| match object.kind {
            HostObjectKind::Instance(instance) => Some((object.id, instance)),
            _ => None,
        })
        .collect();
    if instances.is_empty() {
        return Err(nothing_selected("family instance(s)"));
    }
    Ok(instances)
}

fn selected_levels<D: HostDocument + ?Sized>(doc: &D) -> Vec<f64> {
    doc.selection()
        .into_iter()
        .filter_map(|object| match object.kind {
            HostObjectKind::Level { elevation } => Some(elevation),
            _ => None,
        })
        .collect()
}

fn nothing_selected(what: &str) -> crate::ShapemarkError {
    OperationError::InvalidArgument(format!("select {what}")).into()
}
