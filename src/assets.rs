//! Sprite and font providers.
//!
//! All assets load once at startup, strictly before the first tick; any
//! failure here is fatal. Sprites are numbered PNGs (`0001.png`, …) in the
//! `rocket/` and `crash/` directories plus a single `earning.png`, with the
//! display font alongside.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::error::{LiftoffError, LiftoffResult};

pub mod decode;

pub use decode::decode_image;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, tightly packed premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Solid-color image, mainly for tests and tools.
    pub fn solid(width: u32, height: u32, premul_rgba: [u8; 4]) -> Self {
        let px_count = (width as usize) * (height as usize);
        let mut bytes = Vec::with_capacity(px_count * 4);
        for _ in 0..px_count {
            bytes.extend_from_slice(&premul_rgba);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}

/// An ordered sprite animation, advanced by discrete frame index.
#[derive(Clone, Debug)]
pub struct SpriteSequence {
    frames: Vec<PreparedImage>,
}

impl SpriteSequence {
    pub fn from_frames(frames: Vec<PreparedImage>) -> LiftoffResult<Self> {
        if frames.is_empty() {
            return Err(LiftoffError::asset("sprite sequence must be non-empty"));
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> &PreparedImage {
        &self.frames[index]
    }
}

/// The full set of drawables the animation needs.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    pub rocket: SpriteSequence,
    pub crash: SpriteSequence,
    pub payout: PreparedImage,
}

impl SpriteSet {
    /// Load every sprite from `root`, failing fast on the first bad asset.
    #[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>) -> LiftoffResult<Self> {
        let root = root.as_ref();
        let rocket = load_sequence(&root.join("rocket"))?;
        let crash = load_sequence(&root.join("crash"))?;
        let payout = load_image_file(&root.join("earning.png"))?;
        tracing::debug!(
            rocket_frames = rocket.len(),
            crash_frames = crash.len(),
            "sprites loaded"
        );
        Ok(Self {
            rocket,
            crash,
            payout,
        })
    }
}

/// Read the display font bytes; fonts must be loaded before any text draws.
pub fn load_font_bytes(path: impl AsRef<Path>) -> LiftoffResult<Vec<u8>> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    if bytes.is_empty() {
        return Err(LiftoffError::asset(format!(
            "font file '{}' is empty",
            path.display()
        )));
    }
    Ok(bytes)
}

fn load_sequence(dir: &Path) -> LiftoffResult<SpriteSequence> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read sprite dir '{}'", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list sprite dir '{}'", dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("png") {
            paths.push(path);
        }
    }
    // Frame order comes from the zero-padded numeric file names.
    paths.sort();

    if paths.is_empty() {
        return Err(LiftoffError::asset(format!(
            "sprite dir '{}' contains no .png frames",
            dir.display()
        )));
    }

    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        frames.push(load_image_file(path)?);
    }
    SpriteSequence::from_frames(frames)
}

fn load_image_file(path: &Path) -> LiftoffResult<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| LiftoffError::asset(format!("decode '{}': {e}", path.display())))
}
