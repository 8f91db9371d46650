//! CPU [`Surface`] backed by `vello_cpu` rasterization and `parley` text.
//!
//! Every draw operation renders into a transparent scratch pixmap first, has
//! its shadow/blur effects applied there, and is then composited over the
//! main pixmap with premultiplied source-over. This keeps the effect model
//! identical across primitives.

use std::borrow::Cow;
use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::PreparedImage;
use crate::blur_cpu::{blur_params, blur_rgba8_premul_in_place};
use crate::composite_cpu::{over_in_place, over_in_place_offset_y, tint_by_alpha};
use crate::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::error::{LiftoffError, LiftoffResult};
use crate::surface::{
    Paint, Shadow, StrokeStyle, Surface, TextAlign, TextMetrics, TextStyle,
};

/// One rendered frame in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// RGBA8 brush color carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Display-font text shaping, registered once at startup.
struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
}

impl TextEngine {
    fn new(font_bytes: Vec<u8>) -> LiftoffResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| LiftoffError::asset("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LiftoffError::asset("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
        })
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> LiftoffResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LiftoffError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Resolved paint ready for a `vello_cpu` context.
enum CpuPaint {
    Color(vello_cpu::peniko::Color),
    Image(vello_cpu::Image),
}

/// The real drawing surface of the animation.
pub struct CpuSurface {
    canvas: Canvas,
    width16: u16,
    height16: u16,
    main: vello_cpu::Pixmap,
    scratch: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    text: TextEngine,
    blur_scratch: Vec<u8>,
    shadow_buf: Vec<u8>,
}

impl CpuSurface {
    /// Build a surface; fails if the display font cannot be registered, so
    /// text is never drawn before the font gate passes.
    pub fn new(canvas: Canvas, font_bytes: Vec<u8>) -> LiftoffResult<Self> {
        let width16: u16 = canvas
            .width
            .try_into()
            .map_err(|_| LiftoffError::validation("canvas width exceeds u16"))?;
        let height16: u16 = canvas
            .height
            .try_into()
            .map_err(|_| LiftoffError::validation("canvas height exceeds u16"))?;
        if width16 == 0 || height16 == 0 {
            return Err(LiftoffError::validation("canvas must be non-empty"));
        }

        Ok(Self {
            canvas,
            width16,
            height16,
            main: vello_cpu::Pixmap::new(width16, height16),
            scratch: Some(vello_cpu::Pixmap::new(width16, height16)),
            ctx: None,
            text: TextEngine::new(font_bytes)?,
            blur_scratch: Vec::new(),
            shadow_buf: Vec::new(),
        })
    }

    /// Copy out the current frame.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.main.data_as_u8_slice().to_vec(),
        }
    }

    fn resolve_paint(&self, paint: &Paint) -> LiftoffResult<CpuPaint> {
        match paint {
            Paint::Solid(c) => Ok(CpuPaint::Color(vello_cpu::peniko::Color::from_rgba8(
                c.r, c.g, c.b, c.a,
            ))),
            Paint::Linear { .. } | Paint::Radial { .. } => {
                let bytes = gradient_bytes(paint, self.canvas.width, self.canvas.height)?;
                let img = image_from_premul_bytes(&bytes, self.canvas.width, self.canvas.height)?;
                Ok(CpuPaint::Image(img))
            }
        }
    }

    /// Render one op into scratch, apply effects, composite over main.
    fn run_op(
        &mut self,
        alpha: f64,
        blur: f64,
        shadow: Option<Shadow>,
        gradient_mask: Option<Vec<u8>>,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> LiftoffResult<()> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width16, self.height16),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let mut scratch = self
            .scratch
            .take()
            .ok_or_else(|| LiftoffError::render("scratch surface missing"))?;
        scratch.data_as_u8_slice_mut().fill(0);

        draw(&mut ctx);
        ctx.flush();
        ctx.render_to_pixmap(&mut scratch);

        let (w, h) = (self.canvas.width, self.canvas.height);
        let bytes = scratch.data_as_u8_slice_mut();

        if let Some(gradient) = gradient_mask {
            mask_gradient_by_alpha(bytes, &gradient);
        }

        if let Some(sh) = shadow {
            self.shadow_buf.clear();
            self.shadow_buf.extend_from_slice(bytes);
            tint_by_alpha(&mut self.shadow_buf, sh.color.to_premul());
            let (radius, sigma) = blur_params(sh.blur);
            blur_rgba8_premul_in_place(
                &mut self.shadow_buf,
                &mut self.blur_scratch,
                w,
                h,
                radius,
                sigma,
            )?;
            over_in_place_offset_y(
                self.main.data_as_u8_slice_mut(),
                &self.shadow_buf,
                w,
                h,
                sh.offset_y.round() as i32,
                1.0,
            )?;
        }

        if blur > 0.0 {
            let (radius, sigma) = blur_params(blur);
            blur_rgba8_premul_in_place(bytes, &mut self.blur_scratch, w, h, radius, sigma)?;
        }

        over_in_place(self.main.data_as_u8_slice_mut(), bytes, alpha as f32)?;

        self.ctx = Some(ctx);
        self.scratch = Some(scratch);
        Ok(())
    }

    fn layout_and_metrics(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> LiftoffResult<(parley::Layout<TextBrushRgba8>, TextMetrics, f64)> {
        let layout = self.text.layout(text, size_px, brush)?;
        let width = f64::from(layout.width());
        let (baseline, height) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (f64::from(m.baseline), f64::from(m.ascent + m.descent))
            })
            .unwrap_or((0.0, 0.0));
        Ok((layout, TextMetrics { width, height }, baseline))
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        alpha: f64,
        blur: f64,
    ) -> LiftoffResult<()> {
        let cpu_paint = self.resolve_paint(paint)?;
        self.run_op(alpha, blur, None, None, move |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            apply_paint(ctx, cpu_paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.x0, rect.y0, rect.x1, rect.y1,
            ));
        })
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        paint: &Paint,
        blur: f64,
    ) -> LiftoffResult<()> {
        let circle = kurbo::Circle::new(center, radius.max(0.0));
        let mut path = BezPath::new();
        for el in circle.path_elements(0.1) {
            path.push(el);
        }
        let cpu_paint = self.resolve_paint(paint)?;
        let cpu_path = bezpath_to_cpu(&path);
        self.run_op(1.0, blur, None, None, move |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            apply_paint(ctx, cpu_paint);
            ctx.fill_path(&cpu_path);
        })
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint, alpha: f64) -> LiftoffResult<()> {
        let cpu_paint = self.resolve_paint(paint)?;
        let cpu_path = bezpath_to_cpu(path);
        self.run_op(alpha, 0.0, None, None, move |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            apply_paint(ctx, cpu_paint);
            ctx.fill_path(&cpu_path);
        })
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        style: &StrokeStyle,
        paint: &Paint,
    ) -> LiftoffResult<()> {
        let cpu_paint = self.resolve_paint(paint)?;
        // vello_cpu is used fill-only; strokes are expanded to fills with
        // kurbo's stroke expansion, round caps and joins.
        let stroke = kurbo::Stroke::new(style.width)
            .with_caps(kurbo::Cap::Round)
            .with_join(kurbo::Join::Round);
        let expanded = kurbo::stroke(
            path.elements().iter().copied(),
            &stroke,
            &kurbo::StrokeOpts::default(),
            0.25,
        );
        let cpu_path = bezpath_to_cpu(&expanded);
        self.run_op(1.0, style.blur, style.shadow, None, move |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            apply_paint(ctx, cpu_paint);
            ctx.fill_path(&cpu_path);
        })
    }

    fn draw_image(&mut self, image: &PreparedImage, transform: Affine) -> LiftoffResult<()> {
        let paint = image_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        self.run_op(1.0, 0.0, None, None, move |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        })
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> LiftoffResult<TextMetrics> {
        // Gradient-painted text renders white glyphs and multiplies a
        // device-space gradient through the coverage afterwards.
        let (brush, gradient_mask) = match &style.paint {
            Paint::Solid(c) => (
                TextBrushRgba8 {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                    a: c.a,
                },
                None,
            ),
            gradient => (
                TextBrushRgba8 {
                    r: 255,
                    g: 255,
                    b: 255,
                    a: 255,
                },
                Some(gradient_bytes(
                    gradient,
                    self.canvas.width,
                    self.canvas.height,
                )?),
            ),
        };

        let (layout, metrics, baseline) = self.layout_and_metrics(text, style.size_px, brush)?;

        let dx = match style.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => metrics.width / 2.0,
        };
        let translate = Affine::translate((origin.x - dx, origin.y - baseline));
        let font = self.text.font_data.clone();

        self.run_op(style.alpha, 0.0, style.shadow, gradient_mask, move |ctx| {
            ctx.set_transform(affine_to_cpu(translate));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        })?;

        Ok(metrics)
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> LiftoffResult<TextMetrics> {
        let (_, metrics, _) =
            self.layout_and_metrics(text, size_px, TextBrushRgba8::default())?;
        Ok(metrics)
    }
}

fn apply_paint(ctx: &mut vello_cpu::RenderContext, paint: CpuPaint) {
    match paint {
        CpuPaint::Color(c) => ctx.set_paint(c),
        CpuPaint::Image(img) => ctx.set_paint(img),
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LiftoffResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LiftoffError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LiftoffError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LiftoffError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn image_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LiftoffResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Rasterize a gradient paint as a device-space premul RGBA8 buffer.
fn gradient_bytes(paint: &Paint, width: u32, height: u32) -> LiftoffResult<Vec<u8>> {
    let mut out = vec![0u8; (width as usize) * (height as usize) * 4];
    match paint {
        Paint::Solid(c) => {
            let px = c.to_premul();
            for chunk in out.chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
        Paint::Radial {
            center,
            radius,
            stops,
        } => {
            let radius = radius.max(1e-6);
            for y in 0..height {
                for x in 0..width {
                    let dx = f64::from(x) + 0.5 - center.x;
                    let dy = f64::from(y) + 0.5 - center.y;
                    let t = (dx.hypot(dy) / radius).clamp(0.0, 1.0);
                    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
                    out[idx..idx + 4].copy_from_slice(&sample_stops(stops, t).to_premul());
                }
            }
        }
        Paint::Linear { start, end, stops } => {
            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let len2 = (dx * dx + dy * dy).max(1e-12);
            for y in 0..height {
                for x in 0..width {
                    let px = f64::from(x) + 0.5 - start.x;
                    let py = f64::from(y) + 0.5 - start.y;
                    let t = ((px * dx + py * dy) / len2).clamp(0.0, 1.0);
                    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
                    out[idx..idx + 4].copy_from_slice(&sample_stops(stops, t).to_premul());
                }
            }
        }
    }
    Ok(out)
}

/// Piecewise-linear gradient stop interpolation in straight alpha.
fn sample_stops(stops: &[crate::surface::GradientStop], t: f64) -> Rgba8 {
    let Some(first) = stops.first() else {
        return Rgba8::rgba(0, 0, 0, 0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(1e-12);
            let f = (t - a.offset) / span;
            let lerp = |x: u8, y: u8| -> u8 {
                (f64::from(x) + (f64::from(y) - f64::from(x)) * f)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            return Rgba8::rgba(
                lerp(a.color.r, b.color.r),
                lerp(a.color.g, b.color.g),
                lerp(a.color.b, b.color.b),
                lerp(a.color.a, b.color.a),
            );
        }
    }
    stops.last().map(|s| s.color).unwrap_or(Rgba8::rgba(0, 0, 0, 0))
}

/// Multiply a device-space gradient through the coverage (alpha) of a
/// rendered white-glyph buffer.
fn mask_gradient_by_alpha(buf: &mut [u8], gradient: &[u8]) {
    for (px, g) in buf.chunks_exact_mut(4).zip(gradient.chunks_exact(4)) {
        let a = u16::from(px[3]);
        if a == 0 {
            px.copy_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        for c in 0..4 {
            px[c] = ((u16::from(g[c]) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::GradientStop;

    #[test]
    fn sample_stops_endpoints_and_midpoint() {
        let stops = vec![
            GradientStop {
                offset: 0.0,
                color: Rgba8::rgb(0, 0, 0),
            },
            GradientStop {
                offset: 1.0,
                color: Rgba8::rgb(200, 100, 50),
            },
        ];
        assert_eq!(sample_stops(&stops, 0.0), Rgba8::rgb(0, 0, 0));
        assert_eq!(sample_stops(&stops, 1.0), Rgba8::rgb(200, 100, 50));
        assert_eq!(sample_stops(&stops, 0.5), Rgba8::rgb(100, 50, 25));
    }

    #[test]
    fn sample_stops_clamps_outside_offsets() {
        let stops = vec![
            GradientStop {
                offset: 0.3,
                color: Rgba8::rgb(10, 10, 10),
            },
            GradientStop {
                offset: 0.7,
                color: Rgba8::rgb(90, 90, 90),
            },
        ];
        assert_eq!(sample_stops(&stops, 0.0), Rgba8::rgb(10, 10, 10));
        assert_eq!(sample_stops(&stops, 1.0), Rgba8::rgb(90, 90, 90));
    }

    #[test]
    fn radial_gradient_centers_on_first_stop() {
        let paint = Paint::Radial {
            center: Point::new(0.5, 0.5),
            radius: 4.0,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: Rgba8::rgb(255, 0, 0),
                },
                GradientStop {
                    offset: 1.0,
                    color: Rgba8::rgb(0, 0, 255),
                },
            ],
        };
        let bytes = gradient_bytes(&paint, 4, 4).unwrap();
        // Pixel (0,0) sits at the gradient center.
        assert_eq!(&bytes[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn mask_keeps_gradient_under_full_coverage() {
        let mut buf = vec![255, 255, 255, 255, 0, 0, 0, 0];
        let gradient = vec![10, 20, 30, 255, 40, 50, 60, 255];
        mask_gradient_by_alpha(&mut buf, &gradient);
        assert_eq!(&buf[0..4], &[10, 20, 30, 255]);
        assert_eq!(&buf[4..8], &[0, 0, 0, 0]);
    }
}
