//! End-to-end round lifecycle through the session: countdown, rise, crash,
//! reset, and the inspect entry point.

mod common;

use common::{Op, RecordingSurface, test_sprites};
use liftoff::{
    CrashTrigger, ManualClock, RoundPhase, RunMode, Session, SessionOpts, TickEvent,
};

#[test]
fn live_session_counts_down_then_rises() {
    let mut surface = RecordingSurface::new();
    let opts = SessionOpts {
        mode: RunMode::Live,
        trigger: CrashTrigger::Disabled,
        seed: 0,
    };
    let mut session = Session::new(opts, test_sprites(), &surface).unwrap();

    for _ in 0..99 {
        session.step(&mut surface).unwrap();
        assert_eq!(session.state().phase, RoundPhase::Preparing);
    }
    session.step(&mut surface).unwrap();
    assert_eq!(session.state().phase, RoundPhase::Rising);

    // The 100th tick lands exactly on the boundary: the countdown display is
    // over and the multiplier headline reads 1.00x.
    surface.clear();
    let _ = session.step(&mut surface).unwrap();
    let headline = surface
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Text { content } => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(headline, "1.00x");
}

#[test]
fn certain_crash_plays_full_sprite_sequence_then_resets() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut surface = RecordingSurface::new();
    let opts = SessionOpts {
        mode: RunMode::Live,
        trigger: CrashTrigger::Probabilistic { per_tick: 1.0 },
        seed: 9,
    };
    // test_sprites has 3 crash frames.
    let mut session = Session::new(opts, test_sprites(), &surface).unwrap();

    let mut crashed_at_tick = None;
    let mut reset_at_tick = None;
    for tick in 0..200u64 {
        match session.step(&mut surface).unwrap() {
            Some(TickEvent::Crashed { at }) => {
                assert!(at > 1.0);
                crashed_at_tick = Some(tick);
            }
            Some(TickEvent::RoundReset) => {
                reset_at_tick = Some(tick);
                break;
            }
            None => {}
        }
    }

    let crashed = crashed_at_tick.expect("round should crash");
    let reset = reset_at_tick.expect("round should reset");
    // elapsed must strictly exceed PREPARE_TIME before the trigger runs:
    // 100 ticks reach 5.0, the 101st is the first eligible.
    assert_eq!(crashed, 100);
    // Crash frames 1 and 2 play on the next two ticks; the third increment
    // reaches the frame count and resets instead of rendering frame 3.
    assert_eq!(reset, crashed + 3);
    assert_eq!(session.state().phase, RoundPhase::Preparing);
    assert_eq!(session.state().elapsed, 0.0);
    assert_eq!(session.state().round, 1);
}

#[test]
fn run_ticks_renders_once_per_tick() {
    let mut surface = RecordingSurface::new();
    let opts = SessionOpts {
        mode: RunMode::Live,
        trigger: CrashTrigger::Disabled,
        seed: 0,
    };
    let mut session = Session::new(opts, test_sprites(), &surface).unwrap();

    let mut frames = 0u64;
    session
        .run_ticks(25, &mut ManualClock, &mut surface, |_, _| {
            frames += 1;
            Ok(())
        })
        .unwrap();
    assert_eq!(frames, 25);
    assert!((session.state().elapsed - 25.0 * 0.05).abs() < 1e-9);
}

#[test]
fn inspect_mode_freezes_time_and_grows_popup() {
    let mut surface = RecordingSurface::new();
    let opts = SessionOpts {
        mode: RunMode::Inspect { elapsed: 13.0 },
        trigger: CrashTrigger::Disabled,
        seed: 0,
    };
    let mut session = Session::new(opts, test_sprites(), &surface).unwrap();
    assert_eq!(session.state().phase, RoundPhase::Rising);

    for _ in 0..10 {
        session.step(&mut surface).unwrap();
    }
    assert_eq!(session.state().elapsed, 13.0);
    assert!((session.state().popup_elapsed - 0.5).abs() < 1e-9);

    // The payout overlay is now visible: rocket + payout image + payout text.
    surface.clear();
    session.step(&mut surface).unwrap();
    let images = surface.ops.iter().filter(|op| matches!(op, Op::Image)).count();
    assert_eq!(images, 2);
    assert!(
        surface
            .ops
            .iter()
            .any(|op| matches!(op, Op::Text { content } if content == "+10.327 EBONE"))
    );
}
