//! Live device stream through `nokhwa`.
use anyhow::{Context, Result};
use image::RgbaImage;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;

use super::source::FrameSource;
use super::worker::FrameWorker;

pub struct CameraSource {
    index: u32,
    width: u32,
    height: u32,
    worker: Option<FrameWorker>,
}

impl CameraSource {
    /// Requests the format closest to `width`x`height`; the device may pick another.
    pub fn new(index: u32, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
            worker: None,
        }
    }
}

fn open_camera(index: u32, width: u32, height: u32) -> Result<Camera> {
    let format = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::Closest(CameraFormat::new(
        Resolution::new(width, height),
        FrameFormat::MJPEG,
        30,
    )));
    let mut camera = Camera::new(CameraIndex::Index(index), format)
        .with_context(|| format!("camera {index} unavailable"))?;
    camera.open_stream().with_context(|| format!("camera {index} refused to stream"))?;
    Ok(camera)
}

fn capture(camera: &mut Camera) -> Result<Option<RgbaImage>> {
    let buffer = camera.frame().context("camera frame")?;
    let decoded = buffer.decode_image::<RgbAFormat>().context("camera frame decode")?;
    let (w, h) = (decoded.width(), decoded.height());
    Ok(RgbaImage::from_raw(w, h, decoded.into_raw()))
}

impl FrameSource for CameraSource {
    fn open(&mut self) -> Result<()> {
        let (index, w, h) = (self.index, self.width, self.height);
        self.worker = Some(FrameWorker::spawn("camera", move || open_camera(index, w, h), capture)?);
        Ok(())
    }

    fn next_frame(&mut self, _elapsed_secs: f32) -> Option<RgbaImage> {
        self.worker.as_ref()?.take()
    }

    fn describe(&self) -> String {
        format!("camera {} (requested {}x{})", self.index, self.width, self.height)
    }
}
