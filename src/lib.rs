//! Liftoff renders an animated "multiplier curve" visualization: a rocket
//! rides a monotonic growth curve until the round either keeps climbing or
//! crashes into an explosion sequence, then resets.
//!
//! The crate is a self-driving visual loop:
//!
//! - Load sprites and the display font (startup gate, failures are fatal)
//! - Build a [`Session`] over a [`Surface`]
//! - Tick it on a fixed 50ms clock; every tick advances the
//!   [`RoundStateMachine`] and composites one frame in a fixed stage order
#![forbid(unsafe_code)]

pub mod assets;
pub mod blur_cpu;
pub mod clock;
pub mod composite_cpu;
pub mod consts;
pub mod core;
pub mod curve;
pub mod error;
pub mod render;
pub mod session;
pub mod state;
pub mod surface;
pub mod view;

pub use crate::assets::{PreparedImage, SpriteSequence, SpriteSet, load_font_bytes};
pub use crate::clock::{FrameClock, IntervalClock, ManualClock};
pub use crate::core::{Canvas, Rgba8};
pub use crate::curve::multiplier;
pub use crate::error::{LiftoffError, LiftoffResult};
pub use crate::render::cpu::{CpuSurface, FrameRGBA};
pub use crate::render::{RenderStage, STAGE_ORDER, render_frame};
pub use crate::session::{RunMode, Session, SessionOpts};
pub use crate::state::{CrashTrigger, RoundPhase, RoundState, RoundStateMachine, TickEvent};
pub use crate::surface::{
    Paint, Shadow, StrokeStyle, Surface, TextAlign, TextMetrics, TextStyle,
};
pub use crate::view::{CoordinateMapper, Stage, ViewWindow};
