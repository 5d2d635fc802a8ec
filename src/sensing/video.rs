//! Looping video file decoded with `ffmpeg-next`, scaled to the sample size.
use anyhow::{anyhow, Context, Result};
use ffmpeg_next as ffmpeg;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use super::source::FrameSource;
use super::worker::FrameWorker;

const FALLBACK_FPS: f64 = 30.0;

fn init_ffmpeg() -> Result<()> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();
    INIT.get_or_init(|| ffmpeg::init().map_err(|e| e.to_string()))
        .clone()
        .map_err(|e| anyhow!("ffmpeg init: {e}"))
}

struct Decoder {
    path: PathBuf,
    width: u32,
    height: u32,
    input: ffmpeg::format::context::Input,
    video: ffmpeg::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    stream_index: usize,
    frame_interval: Duration,
    decoded: ffmpeg::frame::Video,
    scaled: ffmpeg::frame::Video,
    draining: bool,
}

impl Decoder {
    fn open(path: PathBuf, width: u32, height: u32) -> Result<Self> {
        init_ffmpeg()?;
        let input = ffmpeg::format::input(&path).with_context(|| format!("open video {}", path.display()))?;
        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .with_context(|| format!("no video stream in {}", path.display()))?;
        let stream_index = stream.index();
        let fps = f64::from(stream.avg_frame_rate());
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { FALLBACK_FPS };
        let video = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?
            .decoder()
            .video()
            .context("video decoder")?;
        let scaler = ffmpeg::software::scaling::Context::get(
            video.format(),
            video.width(),
            video.height(),
            ffmpeg::format::Pixel::RGBA,
            width,
            height,
            ffmpeg::software::scaling::Flags::BILINEAR,
        )
        .context("rgba scaler")?;
        Ok(Self {
            path,
            width,
            height,
            input,
            video,
            scaler,
            stream_index,
            frame_interval: Duration::from_secs_f64(1.0 / fps),
            decoded: ffmpeg::frame::Video::empty(),
            scaled: ffmpeg::frame::Video::empty(),
            draining: false,
        })
    }

    fn next_packet(&mut self) -> Option<ffmpeg::Packet> {
        let index = self.stream_index;
        self.input
            .packets()
            .find(|(stream, _)| stream.index() == index)
            .map(|(_, packet)| packet)
    }

    /// One frame at the stream's pace. Restarts from the top after the last frame.
    fn step(&mut self) -> Result<Option<RgbaImage>> {
        loop {
            if self.video.receive_frame(&mut self.decoded).is_ok() {
                self.scaler.run(&self.decoded, &mut self.scaled)?;
                thread::sleep(self.frame_interval);
                return rgba_image(&self.scaled).map(Some);
            }
            if self.draining {
                *self = Self::open(self.path.clone(), self.width, self.height)?;
                continue;
            }
            match self.next_packet() {
                Some(packet) => self.video.send_packet(&packet)?,
                None => {
                    self.video.send_eof()?;
                    self.draining = true;
                }
            }
        }
    }
}

/// Copy plane 0 row by row; ffmpeg pads rows to its own stride.
fn rgba_image(frame: &ffmpeg::frame::Video) -> Result<RgbaImage> {
    let (w, h) = (frame.width(), frame.height());
    let row = w as usize * 4;
    let stride = frame.stride(0);
    let data = frame.data(0);
    let mut pixels = Vec::with_capacity(row * h as usize);
    for y in 0..h as usize {
        let start = y * stride;
        pixels.extend_from_slice(data.get(start..start + row).context("short video row")?);
    }
    RgbaImage::from_raw(w, h, pixels).context("video frame size mismatch")
}

pub struct VideoFileSource {
    path: PathBuf,
    width: u32,
    height: u32,
    worker: Option<FrameWorker>,
}

impl VideoFileSource {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width: width.max(1),
            height: height.max(1),
            worker: None,
        }
    }
}

impl FrameSource for VideoFileSource {
    fn open(&mut self) -> Result<()> {
        let (path, w, h) = (self.path.clone(), self.width, self.height);
        self.worker = Some(FrameWorker::spawn("video", move || Decoder::open(path, w, h), Decoder::step)?);
        Ok(())
    }

    fn next_frame(&mut self, _elapsed_secs: f32) -> Option<RgbaImage> {
        self.worker.as_ref()?.take()
    }

    fn describe(&self) -> String {
        format!("video {} at {}x{}", self.path.display(), self.width, self.height)
    }
}
