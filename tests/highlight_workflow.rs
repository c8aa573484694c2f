#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use approx::assert_relative_eq;
use nalgebra::{Translation3, UnitQuaternion};
use shapemark::geometry::BoundingBoxXyz;
use shapemark::highlight::{
    HostFace, Instance, InstanceGeometry, ViewDisposition, START_VIEW_NAME,
};
use shapemark::math::{Point3, RigidTransform, Vector3};
use shapemark::{
    with_mutation, CommandStatus, DemoCommand, ErrorKind, HighlightConfig, Highlighter,
    HostDocument, MemoryDocument,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn square(size: f64) -> HostFace {
    HostFace::new(vec![
        [p(0.0, 0.0, 0.0), p(size, 0.0, 0.0), p(size, size, 0.0)],
        [p(0.0, 0.0, 0.0), p(size, size, 0.0), p(0.0, size, 0.0)],
    ])
}

fn tags(doc: &MemoryDocument) -> Vec<String> {
    doc.tagged_elements()
        .into_iter()
        .filter_map(|id| doc.element_tag(id))
        .collect()
}

// ── Commands ────────────────────────────────────────────────

#[test]
fn bounding_boxes_then_default_view() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let placed = BoundingBoxXyz::new(p(0.0, 0.0, 0.0), p(2.0, 3.0, 4.0)).with_transform(
        RigidTransform::from_parts(
            Translation3::new(10.0, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5),
        ),
    );
    let with_box = doc.add_instance(Instance::at(p(0.0, 0.0, 0.0), Vector3::x()).with_bounding_box(placed));
    let without_box = doc.add_instance(Instance::at(p(5.0, 0.0, 0.0), Vector3::x()));
    doc.set_selection(&[with_box, without_box]).unwrap();

    let mut highlighter = Highlighter::default();
    let status = DemoCommand::BoundingBoxes.run(&mut highlighter, &mut doc);

    assert_eq!(status, CommandStatus::Succeeded);
    assert_eq!(doc.visual_element_count(), 1);
    assert_eq!(doc.messages(), ["Element doesn't have a bounding box"]);
    assert_eq!(doc.committed_labels(), ["DSF_Highlight Bbox", "DSF_Generate View"]);

    let view = doc.active_view().unwrap();
    assert_eq!(doc.find_view("DSF View"), Some(view));
    assert_eq!(doc.filters_of(view)[0].tag_prefix, "DSF");

    let id = doc.tagged_elements()[0];
    let solid = doc.element(id).unwrap().geometry[0].as_solid().unwrap();
    assert!(solid.is_valid());
    assert_relative_eq!(solid.volume().unwrap(), 24.0, epsilon = 1e-9);
}

#[test]
fn vectors_share_one_view() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let a = doc.add_instance(Instance::at(p(0.0, 0.0, 0.0), Vector3::x()));
    let b = doc.add_instance(Instance::at(p(0.0, 5.0, 0.0), Vector3::z()));
    doc.set_selection(&[a, b]).unwrap();

    let config = HighlightConfig::default().with_sample_step(0.5);
    let mut highlighter = Highlighter::new(config).unwrap();
    assert_eq!(DemoCommand::Vectors.run(&mut highlighter, &mut doc), CommandStatus::Succeeded);
    assert_eq!(DemoCommand::Vectors.run(&mut highlighter, &mut doc), CommandStatus::Succeeded);

    // three markers, the line and the origin point per vector, twice
    assert_eq!(doc.visual_element_count(), 20);
    let unique: HashSet<_> = tags(&doc).into_iter().collect();
    assert_eq!(unique.len(), 20);
    assert_eq!(doc.view_names(), [START_VIEW_NAME, "DSF View"]);
    assert_eq!(
        doc.committed_labels(),
        ["DSF_Highlight Vector", "DSF_Generate View", "DSF_Highlight Vector"]
    );
}

#[test]
fn biggest_face_is_selected() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let geometry = InstanceGeometry {
        faces: vec![square(1.0), square(3.0), square(2.0)],
        transform: RigidTransform::translation(0.0, 0.0, 5.0),
    };
    let instance = doc.add_instance(Instance::at(p(0.0, 0.0, 0.0), Vector3::x()).with_geometry(geometry));
    doc.set_selection(&[instance]).unwrap();

    let mut highlighter = Highlighter::default();
    assert_eq!(DemoCommand::BiggestFace.run(&mut highlighter, &mut doc), CommandStatus::Succeeded);

    let selected = doc.selection();
    assert_eq!(selected.len(), 1);
    let sheet = doc.element(selected[0].id).unwrap().geometry[0].as_solid().unwrap();
    assert!(!sheet.is_closed());
    assert_relative_eq!(sheet.area().unwrap(), 9.0, epsilon = 1e-9);
    assert_relative_eq!(sheet.aabb().unwrap().max.z, 5.0, epsilon = 1e-12);
    assert_eq!(doc.active_view(), doc.find_view(START_VIEW_NAME));
}

#[test]
fn biggest_face_without_geometry_rolls_back() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let good = doc.add_instance(
        Instance::at(p(0.0, 0.0, 0.0), Vector3::x()).with_geometry(InstanceGeometry {
            faces: vec![square(1.0)],
            transform: RigidTransform::identity(),
        }),
    );
    let bare = doc.add_instance(Instance::at(p(0.0, 0.0, 0.0), Vector3::x()));
    doc.set_selection(&[good, bare]).unwrap();

    let mut highlighter = Highlighter::default();
    assert_eq!(DemoCommand::BiggestFace.run(&mut highlighter, &mut doc), CommandStatus::Failed);
    assert_eq!(doc.visual_element_count(), 0);
    assert!(doc.committed_labels().is_empty());
    assert!(doc.messages()[0].contains("no geometry instance"));
}

// ── Purge ───────────────────────────────────────────────────

#[test]
fn clear_all_respects_the_displayed_view() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let level = doc.add_level(3.0);
    let start = doc.active_view().unwrap();
    let mut highlighter = Highlighter::default();

    with_mutation(&mut doc, "setup", |doc| {
        highlighter.cube(doc, p(0.0, 0.0, 0.0), 1.0)?;
        highlighter.point(doc, p(1.0, 1.0, 1.0))?;
        Ok(())
    })
    .unwrap();
    let view = highlighter.on_view_3d(&mut doc).unwrap();

    assert_eq!(DemoCommand::ClearAll.run(&mut highlighter, &mut doc), CommandStatus::Succeeded);
    assert_eq!(doc.visual_element_count(), 0);
    assert!(doc.is_view_valid(view));
    assert_eq!(doc.messages().len(), 1);

    doc.activate_view(start).unwrap();
    let report = highlighter.clear_all(&mut doc).unwrap();
    assert_eq!(report.view, ViewDisposition::Deleted);
    assert!(report.removed.is_empty());
    assert!(!doc.is_view_valid(view));
    assert_eq!(doc.object_count(), 1);
    doc.set_selection(&[level]).unwrap();
}

// ── Tags ────────────────────────────────────────────────────

#[test]
fn tags_probe_upward_after_external_deletion() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let highlighter = Highlighter::default();
    let ids = with_mutation(&mut doc, "three", |doc| {
        (0..3)
            .map(|i| highlighter.cube(doc, p(f64::from(i), 0.0, 0.0), 0.5))
            .collect::<shapemark::Result<Vec<_>>>()
    })
    .unwrap();
    assert_eq!(tags(&doc), ["DSF0", "DSF1", "DSF2"]);

    with_mutation(&mut doc, "external", |doc| doc.delete(ids[0])).unwrap();
    with_mutation(&mut doc, "one more", |doc| highlighter.cube(doc, p(9.0, 0.0, 0.0), 0.5)).unwrap();

    assert_eq!(tags(&doc), ["DSF1", "DSF2", "DSF3"]);
}

#[test]
fn invalid_request_leaves_earlier_batches() {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let highlighter = Highlighter::default();
    with_mutation(&mut doc, "ok", |doc| highlighter.cube(doc, p(0.0, 0.0, 0.0), 1.0)).unwrap();

    let err = with_mutation(&mut doc, "bad", |doc| {
        highlighter.rectangular_prism(doc, p(0.0, 0.0, 0.0), 1.0, 0.0, 1.0)
    })
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(tags(&doc), ["DSF0"]);
    assert_eq!(doc.committed_labels(), ["ok"]);
}
