use image::{imageops::FilterType, RgbaImage};

/// Mean of per-pixel channel averages over packed RGBA bytes, normalized to [0, 1].
/// Alpha is ignored; an empty buffer reads as black.
pub fn mean_brightness(rgba: &[u8]) -> f32 {
    let mut sum: u64 = 0;
    let mut pixels: u64 = 0;
    for px in rgba.chunks_exact(4) {
        sum += px[0] as u64 + px[1] as u64 + px[2] as u64;
        pixels += 1;
    }
    if pixels == 0 {
        return 0.0;
    }
    sum as f32 / (pixels as f32 * 3.0 * 255.0)
}

/// Downsample `frame` to `width x height` (skipped when already that size) and reduce it.
pub fn sample_brightness(frame: &RgbaImage, width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        return 0.0;
    }
    if frame.width() == width && frame.height() == height {
        return mean_brightness(frame.as_raw());
    }
    let small = image::imageops::resize(frame, width, height, FilterType::Triangle);
    mean_brightness(small.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_black() {
        assert_eq!(mean_brightness(&[]), 0.0);
    }

    #[test]
    fn white_and_black_extremes() {
        assert_eq!(mean_brightness(&[255, 255, 255, 0, 255, 255, 255, 7]), 1.0);
        assert_eq!(mean_brightness(&[0, 0, 0, 255]), 0.0);
    }

    #[test]
    fn channel_average_then_pixel_mean() {
        // (255+0+0)/3 and (0+0+0)/3 -> mean 42.5 / 255
        let v = mean_brightness(&[255, 0, 0, 255, 0, 0, 0, 255]);
        assert!((v - 42.5 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_frame_survives_downsampling() {
        let frame = RgbaImage::from_pixel(640, 480, image::Rgba([102, 102, 102, 255]));
        let v = sample_brightness(&frame, 320, 240);
        assert!((v - 0.4).abs() < 5e-3);
    }
}
