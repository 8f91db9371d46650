//! Round lifecycle: phases, per-tick counters and transitions.

use rand::Rng as _;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::consts::{CRASH_PROBABILITY, PREPARE_TIME, TICK_STEP};
use crate::curve::multiplier;
use crate::error::{LiftoffError, LiftoffResult};
use crate::view::ViewWindow;

/// Phase of the current round.
///
/// `Preparing` and `Rising` share one elapsed-time counter; the boundary is
/// `elapsed` crossing `PREPARE_TIME`, not a separate flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RoundPhase {
    /// Countdown before the curve starts growing.
    Preparing,
    /// Curve actively growing.
    Rising,
    /// Explosion sprite sequence playing.
    Crashed,
}

/// All mutable per-round counters, owned exclusively by [`RoundStateMachine`].
///
/// Renderers receive this read-only together with the frame's [`ViewWindow`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoundState {
    /// Seconds since round start; monotonic while the round is active and
    /// frozen once the round crashes.
    pub elapsed: f64,
    /// 0-based index into the crash sprite sequence; meaningful only while
    /// `phase == Crashed`.
    pub crash_frame: usize,
    /// Seconds since the payout pop-up triggered; clamped at use sites.
    pub popup_elapsed: f64,
    /// Multiplier value at the instant of the crash.
    pub crash_value: f64,
    pub phase: RoundPhase,
    /// Completed-round counter, for logging only.
    pub round: u64,
}

impl RoundState {
    fn new_round(round: u64) -> Self {
        Self {
            elapsed: 0.0,
            crash_frame: 0,
            popup_elapsed: 0.0,
            crash_value: 0.0,
            phase: RoundPhase::Preparing,
            round,
        }
    }
}

/// Whether and how a rising round can crash.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CrashTrigger {
    /// Rounds never crash; the explosion path is unreachable.
    Disabled,
    /// Per-tick crash check once `elapsed` passes `PREPARE_TIME`, driven by
    /// the machine's seeded RNG so rounds are reproducible.
    Probabilistic { per_tick: f64 },
}

impl Default for CrashTrigger {
    fn default() -> Self {
        Self::Probabilistic {
            per_tick: CRASH_PROBABILITY,
        }
    }
}

/// Notable transitions produced by a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickEvent {
    /// The round just crashed at the given multiplier.
    Crashed { at: f64 },
    /// The crash sequence finished and a new round started.
    RoundReset,
}

/// Owns the [`RoundState`] and advances it on a fixed tick.
///
/// Time is tracked as integer tick counts and converted to seconds, so 100
/// ticks land exactly on `PREPARE_TIME` instead of drifting past it.
pub struct RoundStateMachine {
    state: RoundState,
    active_ticks: u64,
    popup_ticks: u64,
    trigger: CrashTrigger,
    rng: Pcg32,
    crash_frame_count: usize,
}

impl RoundStateMachine {
    pub fn new(
        trigger: CrashTrigger,
        seed: u64,
        crash_frame_count: usize,
    ) -> LiftoffResult<Self> {
        if crash_frame_count == 0 {
            return Err(LiftoffError::validation(
                "crash_frame_count must be > 0",
            ));
        }
        if let CrashTrigger::Probabilistic { per_tick } = trigger
            && !(0.0..=1.0).contains(&per_tick)
        {
            return Err(LiftoffError::validation(
                "crash probability must be within [0, 1]",
            ));
        }
        Ok(Self {
            state: RoundState::new_round(0),
            active_ticks: 0,
            popup_ticks: 0,
            trigger,
            rng: Pcg32::seed_from_u64(seed),
            crash_frame_count,
        })
    }

    /// Pin the round at a fixed elapsed time (inspect entry point).
    pub fn pin_elapsed(&mut self, elapsed: f64) {
        self.state.elapsed = elapsed.max(0.0);
        self.active_ticks = (self.state.elapsed / TICK_STEP).round() as u64;
        self.state.phase = phase_for_elapsed(self.state.elapsed);
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Window for the current frame, floors already applied.
    pub fn view_window(&self) -> ViewWindow {
        ViewWindow::for_round(self.state.elapsed, multiplier(self.state.elapsed))
    }

    /// Advance one fixed tick.
    ///
    /// While active, `elapsed` moves by [`TICK_STEP`] and the phase is
    /// re-derived; while crashed, `crash_frame` moves by one and the round
    /// resets exactly when it reaches the crash sprite count.
    pub fn advance(&mut self) -> Option<TickEvent> {
        match self.state.phase {
            RoundPhase::Preparing | RoundPhase::Rising => {
                self.active_ticks += 1;
                self.state.elapsed = self.active_ticks as f64 * TICK_STEP;
                self.state.phase = phase_for_elapsed(self.state.elapsed);

                if self.state.phase == RoundPhase::Rising
                    && self.state.elapsed > PREPARE_TIME
                    && self.roll_crash()
                {
                    self.state.crash_value = multiplier(self.state.elapsed);
                    self.state.crash_frame = 0;
                    self.state.phase = RoundPhase::Crashed;
                    tracing::debug!(
                        round = self.state.round,
                        at = self.state.crash_value,
                        "round crashed"
                    );
                    return Some(TickEvent::Crashed {
                        at: self.state.crash_value,
                    });
                }
                None
            }
            RoundPhase::Crashed => {
                self.state.crash_frame += 1;
                if self.state.crash_frame >= self.crash_frame_count {
                    let round = self.state.round + 1;
                    self.state = RoundState::new_round(round);
                    self.active_ticks = 0;
                    self.popup_ticks = 0;
                    tracing::debug!(round, "starting new round");
                    return Some(TickEvent::RoundReset);
                }
                None
            }
        }
    }

    /// Advance the payout pop-up animation by one tick.
    pub fn advance_popup(&mut self) {
        self.popup_ticks += 1;
        self.state.popup_elapsed = self.popup_ticks as f64 * TICK_STEP;
    }

    fn roll_crash(&mut self) -> bool {
        match self.trigger {
            CrashTrigger::Disabled => false,
            CrashTrigger::Probabilistic { per_tick } => {
                self.rng.random::<f64>() < per_tick
            }
        }
    }
}

fn phase_for_elapsed(elapsed: f64) -> RoundPhase {
    if elapsed < PREPARE_TIME {
        RoundPhase::Preparing
    } else {
        RoundPhase::Rising
    }
}
