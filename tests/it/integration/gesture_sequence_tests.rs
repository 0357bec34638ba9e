//! Random pointer/keyboard sequences against the session invariants:
//! at most one gesture at a time, every element inside the position and
//! size limits after each event, and no capture outliving its gesture.

use crate::helpers::{TestTemplateBuilder, assert_template_invariants};
use certdesigner::editor::EditorSession;
use certdesigner::geometry::Point;
use certdesigner::input::{Key, PointerButton, PointerOutcome};
use certdesigner::types::ElementType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STEPS: usize = 3_000;

fn random_point(rng: &mut StdRng) -> Point {
    Point::new(rng.gen_range(-200.0..1000.0), rng.gen_range(-200.0..800.0))
}

fn assert_session_invariants(s: &EditorSession) {
    let state = s.input_state();
    let active = [state.is_dragging(), state.is_resizing(), state.is_panning()]
        .iter()
        .filter(|&&b| b)
        .count();
    assert!(active <= 1);
    assert_eq!(s.active_captures(), active);
    assert_eq!(s.ghost().is_some(), state.is_dragging() || state.is_resizing());
    assert!((0.1..=3.0).contains(&s.zoom()));
    assert_template_invariants(s.template());
}

fn run(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut s = TestTemplateBuilder::new()
        .with_static_text("a", "Awarded to", (100.0, 50.0))
        .with_variable_text("name", "name", "Participant Name", (250.0, 200.0))
        .with_image("logo", None, (20.0, 400.0, 150.0, 150.0))
        .session();

    for _ in 0..STEPS {
        match rng.gen_range(0..12) {
            0..=2 => {
                let button = match rng.gen_range(0..10) {
                    0 => PointerButton::Middle,
                    1 => PointerButton::Secondary,
                    _ => PointerButton::Primary,
                };
                let was_idle = s.input_state().is_idle();
                let outcome = s.pointer_down(random_point(&mut rng), button);
                if !was_idle {
                    assert_eq!(outcome, PointerOutcome::Rejected);
                }
            }
            3..=6 => {
                s.pointer_move(random_point(&mut rng));
                if rng.gen_bool(0.5) {
                    s.frame_tick();
                }
            }
            7 | 8 => {
                s.pointer_up(random_point(&mut rng));
            }
            9 => {
                s.zoom_around(rng.gen_range(0.5..2.0), random_point(&mut rng));
            }
            10 => {
                let key = match rng.gen_range(0..4) {
                    0 => Key::Char('h'),
                    1 => Key::Char('v'),
                    2 => Key::Escape,
                    _ => Key::Delete,
                };
                s.key_down(key);
            }
            _ => {
                if rng.gen_bool(0.1) {
                    s.blur();
                } else if s.template().elements.len() < 3 {
                    s.add_element(ElementType::StaticText);
                }
            }
        }
        assert_session_invariants(&s);
    }

    s.teardown();
    assert_eq!(s.active_captures(), 0);
}

#[test]
fn test_random_sequences_keep_invariants() {
    for seed in [1, 2, 3, 42, 2024] {
        run(seed);
    }
}
