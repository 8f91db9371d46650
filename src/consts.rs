//! Compiled-in visual and timing constants.
//!
//! The visualization carries no runtime configuration: colors, gaps, timings
//! and sprite geometry are all fixed here.

use crate::core::Rgba8;

/// Seconds of countdown before the curve starts growing.
pub const PREPARE_TIME: f64 = 5.0;

/// Time-units added to `elapsed` per tick while the round is active.
pub const TICK_STEP: f64 = 0.05;

/// Fixed tick period driving the update/draw cycle.
pub const TICK_PERIOD_MS: u64 = 50;

/// Per-tick crash probability once `elapsed` passes [`PREPARE_TIME`].
pub const CRASH_PROBABILITY: f64 = 0.01;

/// Output canvas size in pixels.
pub const CANVAS_WIDTH: u32 = 960;
pub const CANVAS_HEIGHT: u32 = 640;

/// Margin between canvas edge and the plot stage, all four sides.
pub const STAGE_GAP: f64 = 70.0;

/// Pixel offset of the curve start from the stage origin, right and up.
pub const CURVE_OFFSET: f64 = 30.0;

/// Cap on curve sampling segments per frame.
pub const MAX_CURVE_SEGMENTS: f64 = 1000.0;

/// Curve samples per elapsed time-unit.
pub const SEGMENTS_PER_TIME_UNIT: f64 = 100.0;

/// Visible time-span floor and growth factor.
pub const WINDOW_W_MIN: f64 = 10.0;
pub const WINDOW_W_GROWTH: f64 = 1.1;

/// Visible value-span floor and growth factor.
pub const WINDOW_H_MIN: f64 = 2.0;
pub const WINDOW_H_GROWTH: f64 = 1.3;

/// Rocket sprite frames consumed per elapsed time-unit.
pub const ROCKET_FRAME_RATE: f64 = 50.0;

/// Finite-difference step for the sprite tangent angle.
pub const TANGENT_DELTA: f64 = 0.1;

/// Rendered sprite sizes in pixels (square).
pub const ROCKET_SPRITE_SIZE: f64 = 150.0;
pub const CRASH_SPRITE_SIZE: f64 = 300.0;

/// Payout pop-up growth clamp, in seconds since the pop-up triggered.
pub const POPUP_MAX_ELAPSED: f64 = 0.5;

/// Payout pop-up image size at full scale.
pub const PAYOUT_IMAGE_WIDTH: f64 = 600.0;
pub const PAYOUT_IMAGE_HEIGHT: f64 = 400.0;

/// Fixed display string on the payout pop-up.
pub const PAYOUT_TEXT: &str = "+10.327 EBONE";

/// Font sizes in pixels.
pub const STATUS_FONT_PX: f32 = 120.0;
pub const AXIS_FONT_PX: f32 = 24.0;
pub const PAYOUT_FONT_PX: f32 = 48.0;

// Palette.
pub const BACKGROUND: Rgba8 = Rgba8::rgb(0x2A, 0x2A, 0x38);
pub const PRIMARY: Rgba8 = Rgba8::rgb(0x6D, 0x6D, 0x8F);
pub const GRID_LINE: Rgba8 = Rgba8::rgb(0x37, 0x37, 0x4D);
pub const HALO: Rgba8 = Rgba8::rgb(0x95, 0x95, 0xB9);
pub const STATUS_TEXT: Rgba8 = Rgba8::rgb(0xF5, 0xF5, 0xFA);
pub const ALERT_TEXT: Rgba8 = Rgba8::rgb(0xFF, 0x33, 0x00);
pub const SHADOW_DARK: Rgba8 = Rgba8::rgb(0x11, 0x11, 0x11);
pub const BAND: Rgba8 = Rgba8::rgb(0x29, 0x29, 0x38);

/// Area-fill radial gradient stops, curve start outward.
pub const FILL_STOPS: [(f64, Rgba8); 3] = [
    (0.0, Rgba8::rgb(0x29, 0x29, 0x38)),
    (0.5, Rgba8::rgb(0x4A, 0x70, 0xFF)),
    (1.0, Rgba8::rgb(0xAD, 0x19, 0xC6)),
];

/// Outer glow-stroke radial gradient stops, stage origin outward.
pub const GLOW_STROKE_STOPS: [(f64, Rgba8); 3] = [
    (0.0, Rgba8::rgb(0x61, 0xB0, 0xD0)),
    (0.5, Rgba8::rgb(0x4A, 0x70, 0xFF)),
    (1.0, Rgba8::rgb(0xAD, 0x19, 0xC6)),
];

/// Bright inner-stroke linear gradient stops, across the stage diagonal.
pub const INNER_STROKE_STOPS: [(f64, Rgba8); 2] = [
    (0.0, Rgba8::rgb(0x9C, 0xD5, 0xFF)),
    (1.0, Rgba8::rgb(0xFF, 0xC1, 0xDF)),
];

/// Payout text vertical gradient stops, top to baseline.
pub const PAYOUT_TEXT_STOPS: [(f64, Rgba8); 2] = [
    (0.3, Rgba8::rgb(0xFF, 0xFF, 0xFF)),
    (0.7, Rgba8::rgb(0xFF, 0x99, 0x00)),
];

/// Payout text glow color.
pub const PAYOUT_GLOW: Rgba8 = Rgba8::rgb(0xFF, 0x99, 0x00);
