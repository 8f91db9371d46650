//! Per-frame render pipeline.
//!
//! The compositing order is an explicit list rather than an implicit call
//! sequence: every frame draws [`STAGE_ORDER`] front to back, whatever the
//! round phase. Individual stages decide what (if anything) they emit.

use crate::assets::SpriteSet;
use crate::consts::{BACKGROUND, HALO};
use crate::core::{Point, Rect};
use crate::error::LiftoffResult;
use crate::state::RoundState;
use crate::surface::{Paint, Surface};
use crate::view::{CoordinateMapper, Stage, ViewWindow};

pub mod cpu;
pub mod curve;
pub mod grid;
pub mod overlay;

/// One layer of the frame, in compositing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStage {
    Background,
    StatusText,
    /// Curve fill + strokes + rocket while active, crash sprite otherwise.
    Curve,
    PayoutOverlay,
    AxisGrid,
}

/// Fixed compositing order of every frame.
pub const STAGE_ORDER: [RenderStage; 5] = [
    RenderStage::Background,
    RenderStage::StatusText,
    RenderStage::Curve,
    RenderStage::PayoutOverlay,
    RenderStage::AxisGrid,
];

/// Draw one full frame of the round onto `surface`.
///
/// `window` must already have its floors applied (the state machine's
/// [`view_window`](crate::state::RoundStateMachine::view_window) guarantees
/// this).
#[tracing::instrument(skip_all, fields(phase = ?state.phase))]
pub fn render_frame(
    state: &RoundState,
    window: ViewWindow,
    stage: &Stage,
    sprites: &SpriteSet,
    surface: &mut dyn Surface,
) -> LiftoffResult<()> {
    let mapper = CoordinateMapper::new(*stage, window);
    for layer in STAGE_ORDER {
        match layer {
            RenderStage::Background => draw_background(surface)?,
            RenderStage::StatusText => overlay::draw_status(state, surface)?,
            RenderStage::Curve => curve::draw(state, &mapper, sprites, surface)?,
            RenderStage::PayoutOverlay => {
                overlay::draw_payout(state, stage, &sprites.payout, surface)?
            }
            RenderStage::AxisGrid => grid::draw(&mapper, surface)?,
        }
    }
    Ok(())
}

/// Flat background plus the soft halo in the top-right corner.
fn draw_background(surface: &mut dyn Surface) -> LiftoffResult<()> {
    let canvas = surface.canvas();
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    surface.fill_rect(
        Rect::new(0.0, 0.0, w, h),
        &Paint::Solid(BACKGROUND),
        1.0,
        0.0,
    )?;
    surface.fill_circle(Point::new(w, 50.0), 150.0, &Paint::Solid(HALO), 100.0)
}
