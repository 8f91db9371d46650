//! The self-driving animation session.
//!
//! One session owns the round state machine and drives the fixed
//! update-then-draw cycle against a [`Surface`]. Two entry points exist:
//! the live loop, and an inspect mode that pins the round at a chosen
//! elapsed time while the payout pop-up animates in.

use crate::assets::SpriteSet;
use crate::clock::FrameClock;
use crate::error::LiftoffResult;
use crate::render::render_frame;
use crate::state::{CrashTrigger, RoundState, RoundStateMachine, TickEvent};
use crate::surface::Surface;
use crate::view::Stage;

/// How the session advances time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunMode {
    /// Normal self-driving rounds.
    Live,
    /// Freeze the round at `elapsed` and animate only the payout pop-up.
    Inspect { elapsed: f64 },
}

#[derive(Clone, Copy, Debug)]
pub struct SessionOpts {
    pub mode: RunMode,
    pub trigger: CrashTrigger,
    /// Seed for the crash RNG; same seed, same rounds.
    pub seed: u64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            mode: RunMode::Live,
            trigger: CrashTrigger::default(),
            seed: 0,
        }
    }
}

/// Owns per-round state and renders one frame per tick.
pub struct Session {
    mode: RunMode,
    machine: RoundStateMachine,
    sprites: SpriteSet,
    stage: Stage,
}

impl Session {
    /// Build a session over already-loaded assets. Asset and font loading
    /// happen strictly before this point; nothing here can fail later than
    /// startup.
    pub fn new(opts: SessionOpts, sprites: SpriteSet, surface: &dyn Surface) -> LiftoffResult<Self> {
        let mut machine =
            RoundStateMachine::new(opts.trigger, opts.seed, sprites.crash.len())?;
        if let RunMode::Inspect { elapsed } = opts.mode {
            machine.pin_elapsed(elapsed);
        }
        let stage = Stage::for_canvas(surface.canvas());
        Ok(Self {
            mode: opts.mode,
            machine,
            sprites,
            stage,
        })
    }

    pub fn state(&self) -> &RoundState {
        self.machine.state()
    }

    /// Advance one tick and draw the resulting frame.
    pub fn step(&mut self, surface: &mut dyn Surface) -> LiftoffResult<Option<TickEvent>> {
        let event = match self.mode {
            RunMode::Live => self.machine.advance(),
            RunMode::Inspect { .. } => {
                self.machine.advance_popup();
                None
            }
        };

        render_frame(
            self.machine.state(),
            self.machine.view_window(),
            &self.stage,
            &self.sprites,
            surface,
        )?;
        Ok(event)
    }

    /// Run `ticks` update/draw cycles, pacing with `clock` and handing each
    /// finished frame to `on_frame`.
    pub fn run_ticks(
        &mut self,
        ticks: u64,
        clock: &mut dyn FrameClock,
        surface: &mut dyn Surface,
        mut on_frame: impl FnMut(u64, &mut dyn Surface) -> LiftoffResult<()>,
    ) -> LiftoffResult<()> {
        for tick in 0..ticks {
            clock.wait_for_tick();
            if let Some(event) = self.step(surface)? {
                tracing::debug!(tick, ?event, "round event");
            }
            on_frame(tick, surface)?;
        }
        Ok(())
    }
}
