//! Separable Gaussian blur over premultiplied RGBA8 buffers.
//!
//! Fixed-point Q16 kernel weights keep the passes integer-only. Used by the
//! CPU surface for the `blur`-filtered draw operations and drop shadows.

use crate::error::{LiftoffError, LiftoffResult};

/// Blur `buf` in place using `scratch` as the intermediate pass buffer.
///
/// Both buffers must be `width * height * 4` bytes. `radius == 0` is a no-op.
pub fn blur_rgba8_premul_in_place(
    buf: &mut [u8],
    scratch: &mut Vec<u8>,
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> LiftoffResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LiftoffError::render("blur buffer size overflow"))?;
    if buf.len() != expected {
        return Err(LiftoffError::render(
            "blur buffer must match width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    scratch.resize(expected, 0);

    horizontal_pass(buf, scratch, width, height, &kernel);
    vertical_pass(scratch, buf, width, height, &kernel);
    Ok(())
}

/// Kernel radius/sigma pair for a canvas-style `blur(Npx)` filter value.
pub fn blur_params(blur_px: f64) -> (u32, f32) {
    let radius = blur_px.ceil().clamp(0.0, 128.0) as u32;
    let sigma = ((blur_px / 2.0) as f32).max(0.5);
    (radius, sigma)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> LiftoffResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LiftoffError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(LiftoffError::render("gaussian kernel sum is zero"));
    }

    // Quantize to Q16 and push any rounding drift into the center tap so the
    // kernel sums to exactly 1.0.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let fixed = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = fixed as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    (((acc + 32768) >> 16).min(255)) as u8
}
