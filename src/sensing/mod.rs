//! Scalar brightness from a frame source: camera, video file, still frames or
//! a generated oscillation.
pub mod brightness;
#[cfg(feature = "camera")]
pub mod camera;
pub mod source;
#[cfg(feature = "video")]
pub mod video;
#[cfg(any(feature = "camera", feature = "video", test))]
mod worker;

pub use brightness::{mean_brightness, sample_brightness};
#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use source::{FileFrames, FrameSource, SyntheticSource};
#[cfg(feature = "video")]
pub use video::VideoFileSource;

use bevy::prelude::*;

use crate::core::config::BrightnessConfig;

/// Opened frame source plus the most recent brightness reading.
#[derive(Resource)]
pub struct BrightnessFeed {
    source: Box<dyn FrameSource>,
    sample_width: u32,
    sample_height: u32,
    pub latest: f32,
}

impl BrightnessFeed {
    /// Build and open the configured source. Failure leaves no feed behind.
    pub fn open(cfg: &BrightnessConfig) -> anyhow::Result<Self> {
        let mut source = select_source(cfg)?;
        source.open()?;
        info!(target: "sensing", "brightness source ready: {}", source.describe());
        Ok(Self::with_source(source, cfg.sample_width, cfg.sample_height))
    }

    pub fn with_source(source: Box<dyn FrameSource>, sample_width: u32, sample_height: u32) -> Self {
        Self {
            source,
            sample_width,
            sample_height,
            latest: 0.0,
        }
    }

    /// Pull one frame and update `latest`; keeps the previous value when no frame arrives.
    pub fn sample(&mut self, elapsed_secs: f32) -> f32 {
        if let Some(frame) = self.source.next_frame(elapsed_secs) {
            self.latest = sample_brightness(&frame, self.sample_width, self.sample_height);
        }
        self.latest
    }
}

/// Camera, then video, then still frames; generated frames when none is set.
pub fn select_source(cfg: &BrightnessConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    if let Some(index) = cfg.camera {
        return camera_source(index, cfg);
    }
    if let Some(path) = &cfg.video {
        return video_source(path, cfg);
    }
    Ok(match &cfg.frames {
        Some(path) => Box::new(FileFrames::new(path)),
        None => Box::new(SyntheticSource::new(
            cfg.sample_width,
            cfg.sample_height,
            cfg.synthetic_period,
        )),
    })
}

#[cfg(feature = "camera")]
fn camera_source(index: u32, cfg: &BrightnessConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    Ok(Box::new(CameraSource::new(index, cfg.sample_width, cfg.sample_height)))
}

#[cfg(not(feature = "camera"))]
fn camera_source(index: u32, _cfg: &BrightnessConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    anyhow::bail!("camera {index} requested but this build lacks the `camera` feature")
}

#[cfg(feature = "video")]
fn video_source(path: &str, cfg: &BrightnessConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    Ok(Box::new(VideoFileSource::new(path, cfg.sample_width, cfg.sample_height)))
}

#[cfg(not(feature = "video"))]
fn video_source(path: &str, _cfg: &BrightnessConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    anyhow::bail!("video {path} requested but this build lacks the `video` feature")
}

pub fn sample_brightness_system(time: Res<Time>, feed: Option<ResMut<BrightnessFeed>>) {
    if let Some(mut feed) = feed {
        feed.sample(time.elapsed_secs());
    }
}
