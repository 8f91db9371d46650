//! The compositing order is a contract: background, status text, curve
//! layer, payout overlay, axis grid — independent of any single renderer.

mod common;

use common::{Op, RecordingSurface, test_sprites};
use liftoff::{
    Canvas, RoundPhase, RoundState, Stage, ViewWindow, multiplier, render_frame,
};

fn state_rising(elapsed: f64, popup_elapsed: f64) -> RoundState {
    RoundState {
        elapsed,
        crash_frame: 0,
        popup_elapsed,
        crash_value: 0.0,
        phase: if elapsed < 5.0 {
            RoundPhase::Preparing
        } else {
            RoundPhase::Rising
        },
        round: 0,
    }
}

fn render(state: &RoundState, surface: &mut RecordingSurface) {
    let window = ViewWindow::for_round(state.elapsed, multiplier(state.elapsed));
    let stage = Stage::for_canvas(Canvas {
        width: 960,
        height: 640,
    });
    render_frame(state, window, &stage, &test_sprites(), surface).unwrap();
}

#[test]
fn rising_frame_layers_in_order() {
    let mut surface = RecordingSurface::new();
    render(&state_rising(6.0, 0.3), &mut surface);
    let ops = &surface.ops;

    // Background: flat fill then the blurred halo.
    assert_eq!(ops[0], Op::FillRect { blur: 0.0 });
    assert_eq!(ops[1], Op::FillCircle { blur: 100.0 });

    // Status text next, under everything the curve draws.
    let Op::Text { content } = &ops[2] else {
        panic!("expected status text third, got {:?}", ops[2]);
    };
    assert_eq!(content, &format!("{:.2}x", multiplier(6.0)));

    // Curve layer: translucent area fill, blurred baseline band, glow
    // stroke, inner stroke, rocket sprite.
    assert_eq!(ops[3], Op::FillPath { alpha: 0.5 });
    assert_eq!(ops[4], Op::FillRect { blur: 40.0 });
    assert_eq!(ops[5], Op::StrokePath { width: 10.0 });
    assert_eq!(ops[6], Op::StrokePath { width: 6.0 });
    assert_eq!(ops[7], Op::Image);

    // Payout overlay (popup is visible): image then earnings text.
    assert_eq!(ops[8], Op::Image);
    let Op::Text { content } = &ops[9] else {
        panic!("expected payout text, got {:?}", ops[9]);
    };
    assert_eq!(content, "+10.327 EBONE");

    // Everything after is the axis grid: labels and 2px gridline segments.
    assert!(ops.len() > 10);
    for op in &ops[10..] {
        match op {
            Op::Text { .. } => {}
            Op::StrokePath { width } if *width == 2.0 => {}
            other => panic!("unexpected op in grid layer: {other:?}"),
        }
    }
}

#[test]
fn countdown_frame_still_draws_curve_under_text() {
    let mut surface = RecordingSurface::new();
    render(&state_rising(2.25, 0.0), &mut surface);
    let ops = &surface.ops;

    let Op::Text { content } = &ops[2] else {
        panic!("expected countdown text, got {:?}", ops[2]);
    };
    assert_eq!(content, "3");
    // Curve area fill still present during the countdown.
    assert_eq!(ops[3], Op::FillPath { alpha: 0.5 });
}

#[test]
fn crashed_frame_replaces_curve_with_crash_sprite() {
    let mut surface = RecordingSurface::new();
    let state = RoundState {
        elapsed: 8.0,
        crash_frame: 1,
        popup_elapsed: 0.0,
        crash_value: multiplier(8.0),
        phase: RoundPhase::Crashed,
        round: 0,
    };
    render(&state, &mut surface);
    let ops = &surface.ops;

    let Op::Text { content } = &ops[2] else {
        panic!("expected crash text, got {:?}", ops[2]);
    };
    assert_eq!(content, &format!("Bang @{:.2}x", multiplier(8.0)));

    // No curve fill or strokes while crashed; exactly one sprite blit
    // (popup is invisible at popup_elapsed = 0).
    assert_eq!(ops[3], Op::Image);
    assert!(
        !ops.iter()
            .any(|op| matches!(op, Op::FillPath { .. } | Op::StrokePath { width: 10.0 })),
        "crashed frame must not draw the curve"
    );
    let images = ops.iter().filter(|op| matches!(op, Op::Image)).count();
    assert_eq!(images, 1);
}

#[test]
fn zero_popup_draws_no_payout() {
    let mut surface = RecordingSurface::new();
    render(&state_rising(6.0, 0.0), &mut surface);

    // Only the rocket sprite, no payout image or text.
    let images = surface.ops.iter().filter(|op| matches!(op, Op::Image)).count();
    assert_eq!(images, 1);
    assert!(
        !surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::Text { content } if content == "+10.327 EBONE"))
    );
}
