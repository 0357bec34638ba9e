//! Template model reducers.

use crate::helpers::{TestTemplateBuilder, assert_template_invariants};
use certdesigner::template::{Reorder, TemplateModel};
use certdesigner::types::{ElementId, ElementKind, ElementPatch, ElementType, ImageRef};

fn model() -> TemplateModel {
    TemplateModel::new(
        TestTemplateBuilder::new()
            .with_static_text("a", "First", (10.0, 10.0))
            .with_static_text("b", "Second", (10.0, 100.0))
            .with_static_text("c", "Third", (10.0, 200.0))
            .build(),
    )
}

fn order(model: &TemplateModel) -> Vec<&str> {
    model.template().elements.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn test_add_selects_and_uses_type_defaults() {
    let mut model = TemplateModel::default();
    let id = model.add_element(ElementType::Signature, ElementPatch::default());
    let element = model.selected_element().unwrap();
    assert_eq!(element.id, id);
    assert_eq!((element.x, element.y), (50.0, 50.0));
    assert_eq!((element.width, element.height), (200.0, 80.0));
    assert_eq!(model.revision(), 1);
}

#[test]
fn test_add_with_overrides() {
    let mut model = TemplateModel::default();
    model.add_element(
        ElementType::StaticText,
        ElementPatch {
            content: Some("Awarded to".into()),
            width: Some(10.0),
            ..ElementPatch::default()
        },
    );
    let element = model.selected_element().unwrap();
    assert_eq!(element.width, 50.0);
    match &element.kind {
        ElementKind::StaticText { content, .. } => assert_eq!(content, "Awarded to"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_duplicate_offsets_and_inserts_after_source() {
    let mut model = model();
    let copy = model.duplicate_element(&ElementId::new("a")).unwrap();

    assert_eq!(order(&model)[0], "a");
    assert_eq!(order(&model)[1], copy.as_str());
    assert_eq!(model.selected_id(), Some(&copy));
    let element = model.template().element(&copy).unwrap();
    assert_eq!((element.x, element.y), (30.0, 30.0));
}

#[test]
fn test_delete_selected_clears_selection() {
    let mut model = model();
    let b = ElementId::new("b");
    model.select(Some(&b));
    assert!(model.delete_element(&b));
    assert!(model.selected_id().is_none());
    assert_eq!(order(&model), vec!["a", "c"]);
    assert!(!model.delete_element(&b));
}

#[test]
fn test_reorder() {
    let mut model = model();
    let a = ElementId::new("a");
    assert!(model.reorder_element(&a, Reorder::ToFront));
    assert_eq!(order(&model), vec!["b", "c", "a"]);
    assert!(!model.reorder_element(&a, Reorder::Forward));
    assert!(model.reorder_element(&a, Reorder::Backward));
    assert_eq!(order(&model), vec!["b", "a", "c"]);
    assert!(model.reorder_element(&ElementId::new("c"), Reorder::ToBack));
    assert_eq!(order(&model), vec!["c", "b", "a"]);
}

#[test]
fn test_no_op_mutations_keep_revision() {
    let mut model = model();
    let a = ElementId::new("a");
    assert!(!model.move_element(&a, 10.0, 10.0));
    assert!(!model.update_element(&a, &ElementPatch::content("First")));
    assert!(!model.set_background(None));
    assert!(!model.update_element(&ElementId::new("missing"), &ElementPatch::content("x")));
    assert_eq!(model.revision(), 0);
}

#[test]
fn test_snapshot_unaffected_by_later_edits() {
    let mut model = model();
    let snapshot = model.snapshot();
    model.move_element(&ElementId::new("a"), 300.0, 300.0);
    model.set_background(Some(ImageRef::new("bg.png")));

    assert_eq!(snapshot.elements[0].x, 10.0);
    assert!(snapshot.background_reference.is_none());
    assert_eq!(model.template().elements[0].x, 300.0);
}

#[test]
fn test_updates_clamp_invariants() {
    let mut model = model();
    let a = ElementId::new("a");
    model.update_element(
        &a,
        &ElementPatch {
            x: Some(-40.0),
            height: Some(1.0),
            ..ElementPatch::default()
        },
    );
    model.move_element(&ElementId::new("b"), -5.0, -5.0);
    assert_template_invariants(model.template());
}

#[test]
fn test_record_round_trip_preserves_order_and_background() {
    let mut model = model();
    model.set_background(Some(ImageRef::new("bg.png")));
    let json = model.to_record("Workshop").to_json().unwrap();

    let loaded = TemplateModel::from_record(certdesigner::types::TemplateRecord::from_json(&json).unwrap());
    assert_eq!(order(&loaded), vec!["a", "b", "c"]);
    assert_eq!(loaded.template(), model.template());
}
