//! Geometry properties over random inputs.
//!
//! Seeded so failures reproduce.

use certdesigner::constants::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use certdesigner::geometry::{
    Point, Rect, ResizeHandle, compute_resize, fit_contain, to_canvas, to_screen,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ITERATIONS: usize = 2_000;
const EPSILON: f32 = 1e-2;

fn random_rect(rng: &mut StdRng) -> Rect {
    Rect::new(
        rng.gen_range(0.0..600.0),
        rng.gen_range(0.0..400.0),
        rng.gen_range(MIN_ELEMENT_WIDTH..400.0),
        rng.gen_range(MIN_ELEMENT_HEIGHT..300.0),
    )
}

#[test]
fn test_screen_canvas_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ITERATIONS {
        let zoom = rng.gen_range(0.1..3.0);
        let pan = Point::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
        let p = Point::new(rng.gen_range(0.0..2000.0), rng.gen_range(0.0..2000.0));

        let back = to_canvas(to_screen(p, zoom, pan), zoom, pan);
        assert!((back.x - p.x).abs() < EPSILON, "{p:?} -> {back:?} at zoom {zoom}");
        assert!((back.y - p.y).abs() < EPSILON, "{p:?} -> {back:?} at zoom {zoom}");
    }
}

#[test]
fn test_resize_keeps_minimum_and_origin() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..ITERATIONS {
        let start = random_rect(&mut rng);
        let handle = ResizeHandle::ALL[rng.gen_range(0..4)];
        let dx = rng.gen_range(-1000.0..1000.0);
        let dy = rng.gen_range(-1000.0..1000.0);

        let r = compute_resize(handle, dx, dy, start);
        assert!(r.width >= MIN_ELEMENT_WIDTH, "{handle:?} {start:?} -> {r:?}");
        assert!(r.height >= MIN_ELEMENT_HEIGHT, "{handle:?} {start:?} -> {r:?}");
        assert!(r.x >= 0.0 && r.y >= 0.0, "{handle:?} {start:?} -> {r:?}");
    }
}

#[test]
fn test_resize_anchors_opposite_edges() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..ITERATIONS {
        let start = random_rect(&mut rng);
        let dx = rng.gen_range(-300.0..300.0);
        let dy = rng.gen_range(-300.0..300.0);

        // sw: right edge fixed; ne: bottom edge fixed; se: origin fixed
        let sw = compute_resize(ResizeHandle::Sw, dx, dy, start);
        if sw.x > 0.0 {
            assert!((sw.right() - start.right()).abs() < EPSILON, "{start:?} -> {sw:?}");
        }
        assert_eq!(sw.y, start.y);

        let ne = compute_resize(ResizeHandle::Ne, dx, dy, start);
        if ne.y > 0.0 {
            assert!((ne.bottom() - start.bottom()).abs() < EPSILON, "{start:?} -> {ne:?}");
        }
        assert_eq!(ne.x, start.x);

        let se = compute_resize(ResizeHandle::Se, dx, dy, start);
        assert_eq!((se.x, se.y), (start.x, start.y));

        // nw: bottom-right corner fixed while the origin stays clear of zero
        let width = (start.width - dx).max(MIN_ELEMENT_WIDTH);
        let height = (start.height - dy).max(MIN_ELEMENT_HEIGHT);
        if start.right() - width >= 0.0 && start.bottom() - height >= 0.0 {
            let nw = compute_resize(ResizeHandle::Nw, dx, dy, start);
            assert!((nw.right() - start.right()).abs() < EPSILON, "{start:?} -> {nw:?}");
            assert!((nw.bottom() - start.bottom()).abs() < EPSILON, "{start:?} -> {nw:?}");
        }
    }
}

#[test]
fn test_nw_resize_clamped_at_origin() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..ITERATIONS {
        let start = random_rect(&mut rng);
        // Drag up-left past the canvas origin
        let dx = -(start.x + rng.gen_range(1.0..500.0));
        let dy = -(start.y + rng.gen_range(1.0..500.0));

        let nw = compute_resize(ResizeHandle::Nw, dx, dy, start);
        // The origin stops at zero and the size absorbs the rest, so the
        // bottom-right corner still does not move
        assert_eq!((nw.x, nw.y), (0.0, 0.0), "{start:?} -> {nw:?}");
        assert!((nw.right() - start.right()).abs() < EPSILON, "{start:?} -> {nw:?}");
        assert!((nw.bottom() - start.bottom()).abs() < EPSILON, "{start:?} -> {nw:?}");
    }
}

#[test]
fn test_nw_resize_worked_example() {
    let r = compute_resize(ResizeHandle::Nw, 30.0, 20.0, Rect::new(100.0, 100.0, 200.0, 100.0));
    assert_eq!(r, Rect::new(130.0, 120.0, 170.0, 80.0));
}

#[test]
fn test_contain_fit_stays_inside_and_keeps_aspect() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..ITERATIONS {
        let box_w = rng.gen_range(1.0..800.0);
        let box_h = rng.gen_range(1.0..800.0);
        let nat_w = rng.gen_range(1.0..4000.0);
        let nat_h = rng.gen_range(1.0..4000.0);

        let fit = fit_contain(box_w, box_h, nat_w, nat_h);
        assert!(fit.draw_w <= box_w + EPSILON && fit.draw_h <= box_h + EPSILON);
        assert!(fit.draw_x >= -EPSILON && fit.draw_y >= -EPSILON);
        // One axis fills the box
        assert!((fit.draw_w - box_w).abs() < EPSILON || (fit.draw_h - box_h).abs() < EPSILON);
        let ratio = (fit.draw_w / fit.draw_h) / (nat_w / nat_h);
        assert!((ratio - 1.0).abs() < 1e-3, "aspect drift {ratio}");
    }
}

#[test]
fn test_contain_fit_degenerate_inputs() {
    let fit = fit_contain(100.0, 50.0, 0.0, 10.0);
    assert_eq!((fit.draw_w, fit.draw_h), (0.0, 0.0));
    assert_eq!((fit.draw_x, fit.draw_y), (50.0, 25.0));
}
