//! Axis grid: human-friendly tick intervals, labels and gridlines.

use crate::consts::{AXIS_FONT_PX, GRID_LINE, PRIMARY};
use crate::core::{BezPath, Point};
use crate::error::LiftoffResult;
use crate::surface::{Paint, StrokeStyle, Surface, TextAlign, TextStyle};
use crate::view::CoordinateMapper;

/// A single axis tick, recomputed each frame from the view window.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Time-axis label interval for a window spanning `w` time-units.
///
/// Step function escalating at fixed thresholds. The 205 step past 500 is
/// deliberate, not a typo for 200.
pub fn x_interval(w: f64) -> f64 {
    let mut interval = 2.0;
    if w > 10.0 {
        interval = 5.0;
    }
    if w > 25.0 {
        interval = 10.0;
    }
    if w > 50.0 {
        interval = 25.0;
    }
    if w > 100.0 {
        interval = 50.0;
    }
    if w > 250.0 {
        interval = 100.0;
    }
    if w > 500.0 {
        interval = 205.0;
    }
    interval
}

/// Value-axis label interval for a window spanning `h` multiplier units.
///
/// Picks "nice" steps (1, 2, 5, 10, 20, 50, …) scaled to the window: the
/// largest power of ten `base` with `base * 10 <= h`, halved when the next
/// decade is close.
pub fn y_interval(h: f64) -> f64 {
    if h < 2.5 {
        return 1.0;
    }
    let mut base = 1.0;
    while base * 10.0 <= h {
        base *= 10.0;
    }
    if base * 2.5 >= h { base / 2.0 } else { base }
}

/// All tick positions for one axis: multiples of `interval` up to `bound`.
pub fn ticks(bound: f64, interval: f64) -> Vec<AxisTick> {
    let mut out = Vec::new();
    let mut pos = 0.0;
    while pos <= bound {
        out.push(AxisTick {
            position: pos,
            label: format_tick(pos),
        });
        pos += interval;
    }
    out
}

/// Whether the last full interval leaves a visible gap to the window edge,
/// needing a trailing partial gridline segment.
pub fn needs_trailing_segment(bound: f64, interval: f64) -> bool {
    (bound / interval).floor() * interval + interval / 10.0 < bound
}

/// Draw both axes: labels at every tick, gridline segments between them with
/// a text-sized gap around each label, and trailing partial segments.
pub fn draw(mapper: &CoordinateMapper, surface: &mut dyn Surface) -> LiftoffResult<()> {
    let stage = mapper.stage;
    let window = mapper.window;

    // Time axis, along the bottom edge.
    let xi = x_interval(window.w);
    let mut pen: Option<Point> = None;
    let mut label_half_height = 0.0;
    for tick in ticks(window.w, xi) {
        let at = mapper.map(tick.position, 0.0);
        let align = if tick.position == 0.0 {
            TextAlign::Left
        } else {
            TextAlign::Center
        };
        let m = surface.draw_text(
            &tick.label,
            at,
            &TextStyle::solid(AXIS_FONT_PX, align, PRIMARY),
        )?;
        label_half_height = m.height / 2.0;

        if tick.position > 0.0
            && let Some(start) = pen
        {
            let end = Point::new(at.x - m.width / 2.0 - 15.0, at.y - label_half_height);
            stroke_segment(surface, start, end)?;
        }
        pen = Some(Point::new(at.x + m.width / 2.0 + 15.0, at.y - label_half_height));
    }
    if needs_trailing_segment(window.w, xi)
        && let Some(start) = pen
    {
        let end = Point::new(
            stage.origin.x + stage.width,
            stage.origin.y - label_half_height,
        );
        stroke_segment(surface, start, end)?;
    }

    // Value axis, up the left edge. The origin tick is unlabeled.
    let yi = y_interval(window.h);
    let mut pen: Option<Point> = None;
    for tick in ticks(window.h, yi) {
        let at = mapper.map(0.0, tick.position);
        if tick.position > 0.0 {
            surface.draw_text(
                &format!("{}x", tick.label),
                at,
                &TextStyle::solid(AXIS_FONT_PX, TextAlign::Left, PRIMARY),
            )?;
            if let Some(start) = pen {
                stroke_segment(surface, start, Point::new(at.x, at.y + 15.0))?;
            }
        }
        pen = Some(Point::new(at.x, at.y - 28.0));
    }
    if needs_trailing_segment(window.h, yi)
        && let Some(start) = pen
    {
        let end = Point::new(stage.origin.x, stage.origin.y - stage.height);
        stroke_segment(surface, start, end)?;
    }

    Ok(())
}

fn stroke_segment(surface: &mut dyn Surface, from: Point, to: Point) -> LiftoffResult<()> {
    let mut seg = BezPath::new();
    seg.move_to(from);
    seg.line_to(to);
    surface.stroke_path(
        &seg,
        &StrokeStyle {
            width: 2.0,
            blur: 0.0,
            shadow: None,
        },
        &Paint::Solid(GRID_LINE),
    )
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}
