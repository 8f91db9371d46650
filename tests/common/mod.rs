//! Shared test doubles: a recording drawing surface and synthetic assets.

use liftoff::{
    Canvas, LiftoffResult, Paint, PreparedImage, SpriteSequence, SpriteSet, StrokeStyle,
    Surface, TextMetrics, TextStyle,
};
use liftoff::core::{Affine, BezPath, Point, Rect};

/// What a draw call was, shape-wise.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    FillRect { blur: f64 },
    FillCircle { blur: f64 },
    FillPath { alpha: f64 },
    StrokePath { width: f64 },
    Image,
    Text { content: String },
}

/// Surface double that records every operation in order.
pub struct RecordingSurface {
    canvas: Canvas,
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            canvas: Canvas {
                width: 960,
                height: 640,
            },
            ops: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    fn metrics_for(text: &str, size_px: f32) -> TextMetrics {
        TextMetrics {
            width: f64::from(size_px) * 0.5 * text.len() as f64,
            height: f64::from(size_px),
        }
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_rect(
        &mut self,
        _rect: Rect,
        _paint: &Paint,
        _alpha: f64,
        blur: f64,
    ) -> LiftoffResult<()> {
        self.ops.push(Op::FillRect { blur });
        Ok(())
    }

    fn fill_circle(
        &mut self,
        _center: Point,
        _radius: f64,
        _paint: &Paint,
        blur: f64,
    ) -> LiftoffResult<()> {
        self.ops.push(Op::FillCircle { blur });
        Ok(())
    }

    fn fill_path(&mut self, _path: &BezPath, _paint: &Paint, alpha: f64) -> LiftoffResult<()> {
        self.ops.push(Op::FillPath { alpha });
        Ok(())
    }

    fn stroke_path(
        &mut self,
        _path: &BezPath,
        style: &StrokeStyle,
        _paint: &Paint,
    ) -> LiftoffResult<()> {
        self.ops.push(Op::StrokePath { width: style.width });
        Ok(())
    }

    fn draw_image(&mut self, _image: &PreparedImage, _transform: Affine) -> LiftoffResult<()> {
        self.ops.push(Op::Image);
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        _origin: Point,
        style: &TextStyle,
    ) -> LiftoffResult<TextMetrics> {
        self.ops.push(Op::Text {
            content: text.to_string(),
        });
        Ok(Self::metrics_for(text, style.size_px))
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> LiftoffResult<TextMetrics> {
        Ok(Self::metrics_for(text, size_px))
    }
}

/// Tiny in-memory sprite set: 4 rocket frames, 3 crash frames.
pub fn test_sprites() -> SpriteSet {
    let frame = |v: u8| PreparedImage::solid(2, 2, [v, v, v, 255]);
    SpriteSet {
        rocket: SpriteSequence::from_frames(vec![frame(1), frame(2), frame(3), frame(4)]).unwrap(),
        crash: SpriteSequence::from_frames(vec![frame(5), frame(6), frame(7)]).unwrap(),
        payout: frame(8),
    }
}
