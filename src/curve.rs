//! The multiplier growth function.
//!
//! Pure math: elapsed round time in, display multiplier out. The countdown
//! branch eases the value up to 1.0, the active branch accelerates away from
//! it. Both branches meet at exactly 1.0 when `t == PREPARE_TIME`.

use crate::consts::{PREPARE_TIME, TANGENT_DELTA};

/// Multiplier value at elapsed time `t` (seconds since round start).
///
/// Defined for all `t >= 0`; strictly increasing for `t > PREPARE_TIME`.
pub fn multiplier(t: f64) -> f64 {
    let x = t - PREPARE_TIME;
    if x < 0.0 {
        (1.0 - x * x / (PREPARE_TIME * PREPARE_TIME)).powf(0.4)
    } else {
        (x / 10.0).powf(2.5) + 1.0
    }
}

/// Local tangent angle of the curve at `t`, in window-scaled screen space.
///
/// Uses a backward finite difference with step [`TANGENT_DELTA`]. The
/// horizontal scale is halved once `t >= PREPARE_TIME` to flatten rotation
/// sensitivity later in the round. `w`/`h` are the view-window spans.
pub fn tangent_angle(t: f64, w: f64, h: f64) -> f64 {
    let rise = (multiplier(t - TANGENT_DELTA) - multiplier(t)) / h;
    let run_scale = if t >= PREPARE_TIME { 0.5 } else { 1.0 };
    let run = TANGENT_DELTA / w / run_scale;
    rise.atan2(run)
}
