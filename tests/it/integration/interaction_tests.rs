//! Pointer and keyboard flows through an editor session.

use crate::helpers::{TestTemplateBuilder, assert_idle, bounds_of};
use certdesigner::editor::EditorSession;
use certdesigner::geometry::{Point, Rect, ResizeHandle, Size};
use certdesigner::input::{Cursor, GestureKind, Key, PointerButton, PointerOutcome, ToolMode};
use certdesigner::render::SceneNode;
use certdesigner::types::ElementId;

fn session() -> EditorSession {
    TestTemplateBuilder::new()
        .with_static_text("a", "Awarded to", (100.0, 50.0))
        .with_static_text("b", "For excellence", (400.0, 300.0))
        .session()
}

fn text_rect(session: &EditorSession, id: &str) -> Rect {
    let id = ElementId::new(id);
    let scene = session.scene();
    scene
        .nodes_for(&id)
        .find_map(|node| match node {
            SceneNode::Text { rect, .. } => Some(*rect),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no text node for {id}"))
}

/// Click the body of an element to select it without moving it.
fn select(session: &mut EditorSession, at: Point) {
    assert_eq!(
        session.pointer_down(at, PointerButton::Primary),
        PointerOutcome::Started(GestureKind::Drag)
    );
    assert_eq!(session.pointer_up(at), PointerOutcome::Committed(GestureKind::Drag));
}

#[test]
fn test_drag_commits_once_on_release() {
    let mut s = session();
    let revision = s.model().revision();

    assert_eq!(
        s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary),
        PointerOutcome::Started(GestureKind::Drag)
    );
    assert_eq!(s.active_captures(), 1);
    assert_eq!(s.model().selected_id(), Some(&ElementId::new("a")));

    s.pointer_move(Point::new(160.0, 70.0));
    s.pointer_move(Point::new(170.0, 80.0));
    assert!(s.frame_tick());

    // Ghost moves, the model does not
    assert_eq!(text_rect(&s, "a"), Rect::new(120.0, 70.0, 200.0, 40.0));
    assert_eq!(bounds_of(&s, "a"), Rect::new(100.0, 50.0, 200.0, 40.0));
    assert_eq!(s.model().revision(), revision);

    assert_eq!(
        s.pointer_up(Point::new(170.0, 80.0)),
        PointerOutcome::Committed(GestureKind::Drag)
    );
    assert_eq!(bounds_of(&s, "a"), Rect::new(120.0, 70.0, 200.0, 40.0));
    assert_eq!(s.model().revision(), revision + 1);
    assert_idle(&s);
}

#[test]
fn test_release_applies_final_position_without_tick() {
    let mut s = session();
    s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary);
    s.pointer_move(Point::new(155.0, 65.0));
    s.pointer_up(Point::new(250.0, 160.0));
    assert_eq!(bounds_of(&s, "a").origin(), Point::new(200.0, 150.0));
}

#[test]
fn test_drag_clamps_at_canvas_origin() {
    let mut s = session();
    s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary);
    s.pointer_move(Point::new(-400.0, -400.0));
    s.frame_tick();
    s.pointer_up(Point::new(-400.0, -400.0));
    assert_eq!(bounds_of(&s, "a").origin(), Point::new(0.0, 0.0));
}

#[test]
fn test_drag_delta_scaled_by_zoom() {
    let mut s = session();
    s.set_zoom(2.0);
    // element a spans (200,100)-(600,180) on screen at zoom 2
    s.pointer_down(Point::new(300.0, 120.0), PointerButton::Primary);
    s.pointer_up(Point::new(340.0, 160.0));
    assert_eq!(bounds_of(&s, "a").origin(), Point::new(120.0, 70.0));
}

#[test]
fn test_resize_from_se_handle() {
    let mut s = session();
    select(&mut s, Point::new(150.0, 60.0));
    let revision = s.model().revision();

    // se corner of a is at (300, 90)
    assert_eq!(s.handle_at(Point::new(302.0, 88.0)), Some(ResizeHandle::Se));
    assert_eq!(
        s.pointer_down(Point::new(300.0, 90.0), PointerButton::Primary),
        PointerOutcome::Started(GestureKind::Resize)
    );
    s.pointer_move(Point::new(350.0, 110.0));
    s.frame_tick();
    assert_eq!(text_rect(&s, "a"), Rect::new(100.0, 50.0, 250.0, 60.0));

    s.pointer_up(Point::new(350.0, 110.0));
    assert_eq!(bounds_of(&s, "a"), Rect::new(100.0, 50.0, 250.0, 60.0));
    assert_eq!(s.model().revision(), revision + 1);
    assert_idle(&s);
}

#[test]
fn test_resize_never_below_minimum() {
    let mut s = session();
    select(&mut s, Point::new(150.0, 60.0));
    s.pointer_down(Point::new(300.0, 90.0), PointerButton::Primary);
    s.pointer_up(Point::new(-200.0, -200.0));
    assert_eq!(bounds_of(&s, "a"), Rect::new(100.0, 50.0, 50.0, 30.0));
}

#[test]
fn test_nw_resize_keeps_opposite_corner() {
    let mut s = session();
    select(&mut s, Point::new(150.0, 60.0));
    s.pointer_down(Point::new(100.0, 50.0), PointerButton::Primary);
    s.pointer_up(Point::new(130.0, 60.0));
    let r = bounds_of(&s, "a");
    assert_eq!(r, Rect::new(130.0, 60.0, 170.0, 30.0));
    assert_eq!((r.right(), r.bottom()), (300.0, 90.0));
}

#[test]
fn test_second_pointer_down_rejected_during_resize() {
    let mut s = session();
    select(&mut s, Point::new(150.0, 60.0));
    s.pointer_down(Point::new(300.0, 90.0), PointerButton::Primary);

    // Another element's body, and the same handle again
    assert_eq!(
        s.pointer_down(Point::new(450.0, 310.0), PointerButton::Primary),
        PointerOutcome::Rejected
    );
    assert_eq!(
        s.pointer_down(Point::new(300.0, 90.0), PointerButton::Middle),
        PointerOutcome::Rejected
    );
    assert!(s.input_state().is_resizing());
    assert_eq!(s.active_captures(), 1);
    assert_eq!(s.model().selected_id(), Some(&ElementId::new("a")));
}

#[test]
fn test_pan_tool_moves_view_only() {
    let mut s = session();
    let revision = s.model().revision();
    assert!(s.key_down(Key::Char('h')));
    assert_eq!(s.tool_mode(), ToolMode::Pan);

    // Even over an element, the pan tool pans
    assert_eq!(
        s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary),
        PointerOutcome::Started(GestureKind::Pan)
    );
    s.pointer_move(Point::new(200.0, 90.0));
    s.frame_tick();
    assert_eq!(s.viewport().pan, Point::new(50.0, 30.0));
    assert_eq!(s.committed_view().pan, Point::ZERO);
    assert_eq!(text_rect(&s, "a"), Rect::new(150.0, 80.0, 200.0, 40.0));

    s.pointer_up(Point::new(200.0, 90.0));
    assert_eq!(s.committed_view().pan, Point::new(50.0, 30.0));
    assert_eq!(s.model().revision(), revision);
    assert_eq!(bounds_of(&s, "a"), Rect::new(100.0, 50.0, 200.0, 40.0));
    assert_idle(&s);
}

#[test]
fn test_middle_button_pans_in_select_mode() {
    let mut s = session();
    assert_eq!(
        s.pointer_down(Point::new(150.0, 60.0), PointerButton::Middle),
        PointerOutcome::Started(GestureKind::Pan)
    );
    assert!(s.model().selected_id().is_none());
    s.pointer_up(Point::new(140.0, 40.0));
    assert_eq!(s.committed_view().pan, Point::new(-10.0, -20.0));
}

#[test]
fn test_blur_discards_drag() {
    let mut s = session();
    let revision = s.model().revision();
    s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary);
    s.pointer_move(Point::new(300.0, 300.0));
    s.frame_tick();

    assert_eq!(s.blur(), PointerOutcome::Cancelled(GestureKind::Drag));
    assert_idle(&s);
    assert_eq!(bounds_of(&s, "a"), Rect::new(100.0, 50.0, 200.0, 40.0));
    assert_eq!(s.model().revision(), revision);

    // The late release of the lost gesture does nothing
    assert_eq!(s.pointer_up(Point::new(300.0, 300.0)), PointerOutcome::Ignored);
    assert!(!s.pointer_move(Point::new(310.0, 310.0)));
}

#[test]
fn test_escape_cancels_pan_and_restores_view() {
    let mut s = session();
    s.pointer_down(Point::new(10.0, 10.0), PointerButton::Middle);
    s.pointer_move(Point::new(110.0, 10.0));
    s.frame_tick();
    assert_eq!(s.viewport().pan, Point::new(100.0, 0.0));

    assert!(s.key_down(Key::Escape));
    assert_eq!(s.viewport().pan, Point::ZERO);
    assert_idle(&s);
}

#[test]
fn test_zoom_clamped_and_locked_during_gesture() {
    let mut s = session();
    assert!(s.set_zoom(10.0));
    assert_eq!(s.zoom(), 3.0);
    for _ in 0..50 {
        s.zoom_out();
    }
    assert_eq!(s.zoom(), 0.1);

    s.set_zoom(1.0);
    s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary);
    assert!(!s.zoom_in());
    assert!(!s.zoom_around(2.0, Point::new(0.0, 0.0)));
    assert_eq!(s.zoom(), 1.0);
}

#[test]
fn test_zoom_around_keeps_point_fixed() {
    let mut s = session();
    let cursor = Point::new(200.0, 70.0);
    let before = s.viewport().to_canvas(cursor);
    assert!(s.zoom_around(1.5, cursor));
    let after = s.viewport().to_canvas(cursor);
    assert!((before.x - after.x).abs() < 1e-3);
    assert!((before.y - after.y).abs() < 1e-3);
}

#[test]
fn test_fit_to_view_centers_canvas() {
    let mut s = session();
    s.set_container_size(Size::new(400.0, 400.0));
    assert!(s.fit_to_view());
    assert_eq!(s.zoom(), 0.5);
    assert_eq!(s.viewport().pan, Point::new(0.0, (400.0 - 283.0) / 2.0));
}

#[test]
fn test_delete_shortcut_and_text_focus() {
    let mut s = session();
    select(&mut s, Point::new(150.0, 60.0));

    s.set_text_focus(true);
    assert!(!s.key_down(Key::Delete));
    assert!(s.template().element(&ElementId::new("a")).is_some());

    s.set_text_focus(false);
    assert!(s.key_down(Key::Backspace));
    assert!(s.template().element(&ElementId::new("a")).is_none());
    assert!(s.model().selected_id().is_none());
}

#[test]
fn test_click_empty_canvas_clears_selection() {
    let mut s = session();
    select(&mut s, Point::new(150.0, 60.0));
    assert_eq!(
        s.pointer_down(Point::new(700.0, 20.0), PointerButton::Primary),
        PointerOutcome::SelectionCleared
    );
    assert!(s.model().selected_id().is_none());
    assert_idle(&s);
}

#[test]
fn test_topmost_element_wins_hit_test() {
    let mut s = TestTemplateBuilder::new()
        .with_static_text("under", "Under", (100.0, 100.0))
        .with_static_text("over", "Over", (150.0, 110.0))
        .session();
    s.pointer_down(Point::new(200.0, 120.0), PointerButton::Primary);
    assert_eq!(s.input_state().active_element(), Some(&ElementId::new("over")));
}

#[test]
fn test_hover_cursors() {
    let mut s = session();
    assert_eq!(s.hover(Point::new(150.0, 60.0)), Cursor::Move);
    assert_eq!(s.hover(Point::new(700.0, 20.0)), Cursor::Default);

    select(&mut s, Point::new(150.0, 60.0));
    assert_eq!(s.hover(Point::new(100.0, 90.0)), Cursor::Resize(ResizeHandle::Sw));

    s.set_tool_mode(ToolMode::Pan);
    assert_eq!(s.hover(Point::new(700.0, 20.0)), Cursor::Grab);
}

#[test]
fn test_scene_paints_handles_for_selection() {
    let mut s = session();
    assert_eq!(s.scene().handles().count(), 0);
    select(&mut s, Point::new(150.0, 60.0));
    assert_eq!(s.scene().handles().count(), 4);
}

#[test]
fn test_dropping_session_mid_gesture_releases_capture() {
    let mut s = session();
    s.pointer_down(Point::new(150.0, 60.0), PointerButton::Primary);
    assert_eq!(s.active_captures(), 1);
    s.teardown();
    assert_idle(&s);
}
