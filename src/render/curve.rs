//! The growth curve itself: filled area, glow strokes and the moving sprite.

use crate::assets::SpriteSet;
use crate::consts::{
    BAND, CRASH_SPRITE_SIZE, CURVE_OFFSET, FILL_STOPS, GLOW_STROKE_STOPS, INNER_STROKE_STOPS,
    MAX_CURVE_SEGMENTS, ROCKET_FRAME_RATE, ROCKET_SPRITE_SIZE, SEGMENTS_PER_TIME_UNIT,
    SHADOW_DARK,
};
use crate::core::{Affine, BezPath, Point, Rect};
use crate::curve::{multiplier, tangent_angle};
use crate::error::LiftoffResult;
use crate::state::{RoundPhase, RoundState};
use crate::surface::{Paint, Shadow, StrokeStyle, Surface};
use crate::view::CoordinateMapper;

/// Draw the curve layer: area + strokes + rocket while the round is active,
/// the crash sprite alone once it has crashed.
pub fn draw(
    state: &RoundState,
    mapper: &CoordinateMapper,
    sprites: &SpriteSet,
    surface: &mut dyn Surface,
) -> LiftoffResult<()> {
    match state.phase {
        RoundPhase::Preparing | RoundPhase::Rising => {
            draw_curve(state.elapsed, mapper, surface)?;
            draw_rocket(state.elapsed, mapper, sprites, surface)
        }
        RoundPhase::Crashed => draw_crash(state, mapper, sprites, surface),
    }
}

/// Curve spine sampled at up to [`MAX_CURVE_SEGMENTS`] points, offset from
/// the axes by [`CURVE_OFFSET`] in both directions.
fn spine(elapsed: f64, mapper: &CoordinateMapper) -> BezPath {
    let d = CURVE_OFFSET;
    let segments = (elapsed * SEGMENTS_PER_TIME_UNIT)
        .min(MAX_CURVE_SEGMENTS)
        .max(1.0) as usize;

    let start = mapper.map(0.0, 0.0);
    let mut path = BezPath::new();
    path.move_to(Point::new(start.x + d, start.y - d));
    for i in 0..=segments {
        let t = elapsed / segments as f64 * i as f64;
        let p = mapper.map(t, multiplier(t));
        path.line_to(Point::new(p.x + d, p.y - d));
    }
    path
}

fn draw_curve(
    elapsed: f64,
    mapper: &CoordinateMapper,
    surface: &mut dyn Surface,
) -> LiftoffResult<()> {
    let stage = mapper.stage;
    let window = mapper.window;
    let d = CURVE_OFFSET;

    let start = Point::new(stage.origin.x + d, stage.origin.y - d);
    // Stage-space extent of the curve, used for gradient radii and to close
    // the area fill back down to the baseline.
    let xx = elapsed / window.w * stage.width;
    let yy = multiplier(elapsed) / window.h * stage.height;
    let reach = xx.hypot(yy).max(1.0);

    let open = spine(elapsed, mapper);

    // Area under the curve, half-transparent radial wash.
    let mut area = open.clone();
    area.line_to(Point::new(start.x + xx, start.y));
    area.line_to(start);
    area.close_path();
    surface.fill_path(
        &area,
        &Paint::Radial {
            center: start,
            radius: reach,
            stops: Paint::stops(&FILL_STOPS),
        },
        0.5,
    )?;

    // Soft dark band hugging the baseline, drawn over the fill's lower edge.
    let canvas_w = f64::from(surface.canvas().width);
    surface.fill_rect(
        Rect::new(0.0, start.y - 100.0, canvas_w, start.y + 100.0),
        &Paint::Solid(BAND),
        1.0,
        40.0,
    )?;

    // Thick shadowed glow stroke, then the bright blurred inner stroke.
    surface.stroke_path(
        &open,
        &StrokeStyle {
            width: 10.0,
            blur: 0.0,
            shadow: Some(Shadow {
                color: SHADOW_DARK,
                offset_y: 1.0,
                blur: 3.0,
            }),
        },
        &Paint::Radial {
            center: stage.origin,
            radius: reach,
            stops: Paint::stops(&GLOW_STROKE_STOPS),
        },
    )?;
    surface.stroke_path(
        &open,
        &StrokeStyle {
            width: 6.0,
            blur: 2.0,
            shadow: None,
        },
        &Paint::Linear {
            start: Point::ZERO,
            end: Point::new(stage.width, stage.height),
            stops: Paint::stops(&INNER_STROKE_STOPS),
        },
    )
}

fn draw_rocket(
    elapsed: f64,
    mapper: &CoordinateMapper,
    sprites: &SpriteSet,
    surface: &mut dyn Surface,
) -> LiftoffResult<()> {
    let d = CURVE_OFFSET;
    let tip = mapper.map(elapsed, multiplier(elapsed));
    let at = Point::new(tip.x + d, tip.y - d);

    let index = (elapsed * ROCKET_FRAME_RATE) as usize % sprites.rocket.len();
    let frame = sprites.rocket.frame(index);
    let angle = tangent_angle(elapsed, mapper.window.w, mapper.window.h);

    let size = ROCKET_SPRITE_SIZE;
    let transform = Affine::translate(at.to_vec2())
        * Affine::rotate(angle)
        * Affine::translate((-size / 4.0, -size / 2.0))
        * Affine::scale_non_uniform(
            size / f64::from(frame.width),
            size / f64::from(frame.height),
        );
    surface.draw_image(frame, transform)
}

fn draw_crash(
    state: &RoundState,
    mapper: &CoordinateMapper,
    sprites: &SpriteSet,
    surface: &mut dyn Surface,
) -> LiftoffResult<()> {
    // The state machine bounds crash_frame before this renderer is invoked.
    debug_assert!(state.crash_frame < sprites.crash.len());

    let d = CURVE_OFFSET;
    let tip = mapper.map(state.elapsed, state.crash_value);
    let at = Point::new(tip.x + d, tip.y - d);

    let frame = sprites.crash.frame(state.crash_frame);
    let size = CRASH_SPRITE_SIZE;
    let transform = Affine::translate(at.to_vec2())
        * Affine::translate((-size / 2.0, -size / 2.0))
        * Affine::scale_non_uniform(
            size / f64::from(frame.width),
            size / f64::from(frame.height),
        );
    surface.draw_image(frame, transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Canvas;
    use crate::view::{Stage, ViewWindow};

    fn mapper(elapsed: f64) -> CoordinateMapper {
        let stage = Stage::for_canvas(Canvas {
            width: 960,
            height: 640,
        });
        CoordinateMapper::new(
            stage,
            ViewWindow::for_round(elapsed, multiplier(elapsed)),
        )
    }

    fn path_points(path: &BezPath) -> Vec<Point> {
        use kurbo::PathEl;
        path.elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sampling_density_scales_with_elapsed_and_caps() {
        // moveTo + (segments + 1) sample points.
        let early = path_points(&spine(1.0, &mapper(1.0)));
        assert_eq!(early.len(), 1 + 100 + 1);

        let capped = path_points(&spine(60.0, &mapper(60.0)));
        assert_eq!(capped.len(), 1 + 1000 + 1);
    }

    #[test]
    fn spine_starts_at_offset_origin() {
        let m = mapper(2.0);
        let pts = path_points(&spine(2.0, &m));
        let origin = m.stage.origin;
        assert_eq!(
            pts[0],
            Point::new(origin.x + CURVE_OFFSET, origin.y - CURVE_OFFSET)
        );
    }

    #[test]
    fn spine_is_monotonic_in_x() {
        let m = mapper(8.0);
        let pts = path_points(&spine(8.0, &m));
        for pair in pts[1..].windows(2) {
            assert!(pair[1].x >= pair[0].x);
        }
    }

    #[test]
    fn rocket_frame_index_wraps() {
        // floor(7.3 * 50) = 365; with 180 frames that wraps to 5.
        let idx = (7.3 * ROCKET_FRAME_RATE) as usize % 180;
        assert_eq!(idx, 5);
    }
}
