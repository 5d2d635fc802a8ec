use anyhow::{bail, Context, Result};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Provider of video-like frames for brightness sampling.
pub trait FrameSource: Send + Sync {
    /// Acquire the source. Errors are shown to the user and disable the dependent scene.
    fn open(&mut self) -> Result<()>;
    /// Frame for the current refresh; `None` when nothing new is available.
    fn next_frame(&mut self, elapsed_secs: f32) -> Option<RgbaImage>;
    fn describe(&self) -> String;
}

/// Uniform gray frames whose level follows a sine of the elapsed time.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    period: f32,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, period: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            period,
        }
    }

    pub fn level_at(&self, elapsed_secs: f32) -> u8 {
        if self.period <= 0.0 {
            return 128;
        }
        let phase = elapsed_secs / self.period * std::f32::consts::TAU;
        ((0.5 + 0.5 * phase.sin()) * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

impl FrameSource for SyntheticSource {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn next_frame(&mut self, elapsed_secs: f32) -> Option<RgbaImage> {
        let l = self.level_at(elapsed_secs);
        Some(RgbaImage::from_pixel(self.width, self.height, Rgba([l, l, l, 255])))
    }

    fn describe(&self) -> String {
        format!("synthetic {}x{} period={}s", self.width, self.height, self.period)
    }
}

/// A still image or a directory of images, replayed one frame per refresh.
pub struct FileFrames {
    path: PathBuf,
    frames: Vec<RgbaImage>,
    cursor: usize,
}

impl FileFrames {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frames: Vec::new(),
            cursor: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

fn decode(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("decode {}", path.display()))?;
    Ok(img.to_rgba8())
}

impl FrameSource for FileFrames {
    fn open(&mut self) -> Result<()> {
        let meta = std::fs::metadata(&self.path)
            .with_context(|| format!("no frame source at {}", self.path.display()))?;
        self.frames.clear();
        self.cursor = 0;
        if meta.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(&self.path)
                .with_context(|| format!("list {}", self.path.display()))?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            entries.sort();
            for p in entries {
                match decode(&p) {
                    Ok(frame) => self.frames.push(frame),
                    Err(e) => bevy::log::warn!(target: "sensing", "skipping frame: {e:#}"),
                }
            }
        } else {
            self.frames.push(decode(&self.path)?);
        }
        if self.frames.is_empty() {
            bail!("no decodable frames in {}", self.path.display());
        }
        Ok(())
    }

    fn next_frame(&mut self, _elapsed_secs: f32) -> Option<RgbaImage> {
        if self.frames.is_empty() {
            return None;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Some(frame)
    }

    fn describe(&self) -> String {
        format!("{} ({} frames)", self.path.display(), self.frames.len())
    }
}
