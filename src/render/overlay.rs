//! Status text and the payout pop-up.

use crate::assets::PreparedImage;
use crate::consts::{
    ALERT_TEXT, PAYOUT_FONT_PX, PAYOUT_GLOW, PAYOUT_IMAGE_HEIGHT, PAYOUT_IMAGE_WIDTH,
    PAYOUT_TEXT, PAYOUT_TEXT_STOPS, POPUP_MAX_ELAPSED, PREPARE_TIME, STATUS_FONT_PX,
    STATUS_TEXT,
};
use crate::core::{Affine, Point};
use crate::curve::multiplier;
use crate::error::LiftoffResult;
use crate::state::{RoundPhase, RoundState};
use crate::surface::{Paint, Shadow, Surface, TextAlign, TextStyle};
use crate::view::Stage;

/// Centered headline: countdown, live multiplier, or crash message.
pub fn draw_status(state: &RoundState, surface: &mut dyn Surface) -> LiftoffResult<()> {
    let canvas = surface.canvas();
    let at = Point::new(
        f64::from(canvas.width) / 2.0,
        f64::from(canvas.height) / 3.0,
    );

    let (content, color, size, alpha) = match state.phase {
        RoundPhase::Crashed => (
            format!("Bang @{:.2}x", state.crash_value),
            ALERT_TEXT,
            STATUS_FONT_PX,
            1.0,
        ),
        RoundPhase::Preparing => {
            let (content, size, alpha) = countdown_display(state.elapsed);
            (content, STATUS_TEXT, size, alpha)
        }
        RoundPhase::Rising => (
            format!("{:.2}x", multiplier(state.elapsed)),
            STATUS_TEXT,
            STATUS_FONT_PX,
            1.0,
        ),
    };

    surface
        .draw_text(
            &content,
            at,
            &TextStyle {
                size_px: size,
                align: TextAlign::Center,
                paint: Paint::Solid(color),
                alpha,
                shadow: None,
            },
        )
        .map(|_| ())
}

/// Countdown text plus its fading alpha and swelling size.
///
/// The digit fades out over each second while growing from base size toward
/// double size, restarting as the next digit arrives.
pub fn countdown_display(elapsed: f64) -> (String, f32, f64) {
    let remaining = (PREPARE_TIME - elapsed).ceil() as i64;
    let alpha = 1.0 - elapsed.fract();
    let size = STATUS_FONT_PX * (1.0 + alpha as f32);
    (remaining.to_string(), size, alpha)
}

/// Payout pop-up: image and earnings line scaling in from `popup_elapsed`.
///
/// Invisible until `popup_elapsed` advances (the inspect entry point); a zero
/// scale draws nothing.
pub fn draw_payout(
    state: &RoundState,
    stage: &Stage,
    payout: &PreparedImage,
    surface: &mut dyn Surface,
) -> LiftoffResult<()> {
    let popup = state.popup_elapsed.min(POPUP_MAX_ELAPSED);
    if popup <= 0.0 {
        return Ok(());
    }

    let scale = (popup * 2.0).powf(0.3);
    let w = PAYOUT_IMAGE_WIDTH * scale;
    let h = PAYOUT_IMAGE_HEIGHT * scale;
    let center = Point::new(
        stage.origin.x + stage.width / 2.0,
        stage.origin.y - stage.height / 2.0,
    );
    let drop = stage.height / 15.0;

    let transform = Affine::translate(center.to_vec2())
        * Affine::translate((-w / 2.0, -h / 2.0 + drop))
        * Affine::scale_non_uniform(w / f64::from(payout.width), h / f64::from(payout.height));
    surface.draw_image(payout, transform)?;

    // Earnings line above the image, vertical white-to-orange gradient with
    // an orange glow.
    let metrics = surface.measure_text(PAYOUT_TEXT, PAYOUT_FONT_PX)?;
    let at = Point::new(center.x, center.y - drop);
    surface
        .draw_text(
            PAYOUT_TEXT,
            at,
            &TextStyle {
                size_px: PAYOUT_FONT_PX,
                align: TextAlign::Center,
                paint: Paint::Linear {
                    start: Point::new(at.x, at.y - metrics.height),
                    end: at,
                    stops: Paint::stops(&PAYOUT_TEXT_STOPS),
                },
                alpha: 1.0,
                shadow: Some(Shadow {
                    color: PAYOUT_GLOW,
                    offset_y: 0.0,
                    blur: 12.0,
                }),
            },
        )
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_digits_step_down_each_second() {
        assert_eq!(countdown_display(0.0).0, "5");
        assert_eq!(countdown_display(0.5).0, "5");
        assert_eq!(countdown_display(1.5).0, "4");
        assert_eq!(countdown_display(4.9).0, "1");
    }

    #[test]
    fn countdown_alpha_fades_within_each_second() {
        let (_, _, a0) = countdown_display(2.0);
        let (_, _, a1) = countdown_display(2.75);
        assert!((a0 - 1.0).abs() < 1e-9);
        assert!((a1 - 0.25).abs() < 1e-9);
    }

    #[test]
    fn countdown_size_swells_with_alpha() {
        let (_, size, alpha) = countdown_display(3.25);
        assert!((f64::from(size) - f64::from(STATUS_FONT_PX) * (1.0 + alpha)).abs() < 1e-4);
    }
}
