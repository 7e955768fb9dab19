//! The three renderings of one detection map.
//!
//! Every renderer reads the working image and the shared [`DetectionMap`] and
//! returns a fresh buffer of the same size. None of them re-run detection.


use common::parallel::par_fill_rows;

use crate::color::{dim, red_overlay, ColorRamp};
use crate::config::Config;
use crate::detection::DetectionMap;
use crate::image_buffer::ImageBuffer;
use crate::morphology::{close, dilate_falloff, BinaryMask};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

#[inline]
fn rgb(pixel: [u8; 4]) -> [u8; 3] {
    [pixel[0], pixel[1], pixel[2]]
}

#[inline]
fn with_alpha(rgb: [u8; 3], alpha: u8) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}

fn assert_same_size(image: &ImageBuffer, map: &DetectionMap) {
    assert_eq!(
        (image.width() as usize, image.height() as usize),
        (map.width(), map.height()),
        "detection map must match the image dimensions"
    );
}

/// Red highlight over the source.
///
/// A detected pixel is blended toward red by `score / overlay_scale`, capped
/// at `overlay_blend_cap`. Other pixels are scaled by
/// `overlay_background_dim`. Source alpha is kept.
pub fn render_overlay(image: &ImageBuffer, map: &DetectionMap, config: &Config) -> ImageBuffer {
    assert_same_size(image, map);

    let width = image.width() as usize;
    let src = image.pixels();
    let scores = map.scores();
    let mut out = ImageBuffer::new(image.width(), image.height());

    par_fill_rows(out.pixels_mut(), width, |x, y| {
        let i = y * width + x;
        let pixel = src[i];
        let color = match scores[i] {
            0 => dim(rgb(pixel), config.overlay_background_dim),
            score => red_overlay(
                rgb(pixel),
                score as f32 / config.overlay_scale,
                config.overlay_blend_cap,
            ),
        };
        with_alpha(color, pixel[3])
    });

    out
}

/// Thermal-style map of the falloff-smoothed scores.
///
/// Cells whose intensity stays under `spectral_floor` show the source dimmed
/// by `spectral_background_dim`; the rest take their color from the ramp.
/// Output is opaque.
pub fn render_spectral(image: &ImageBuffer, map: &DetectionMap, config: &Config) -> ImageBuffer {
    assert_same_size(image, map);

    let width = image.width() as usize;
    let src = image.pixels();
    let halo = dilate_falloff(map, config.spectral_halo_radius);
    let ramp: &ColorRamp = &config.ramp;
    let mut out = ImageBuffer::new(image.width(), image.height());

    par_fill_rows(out.pixels_mut(), width, |x, y| {
        let intensity = (halo[(x, y)] / config.spectral_scale).min(1.0);
        let color = if intensity < config.spectral_floor {
            dim(rgb(src[y * width + x]), config.spectral_background_dim)
        } else {
            ramp.color_at(intensity)
        };
        with_alpha(color, 255)
    });

    out
}

/// Thresholds the map at `score > 0` and closes it with the configured radii.
pub fn closed_mask(map: &DetectionMap, config: &Config) -> BinaryMask {
    close(
        &BinaryMask::from_detection(map),
        config.dilate_radius,
        config.erode_radius,
    )
}

/// Pure white on black, opaque.
pub fn render_mask(mask: &BinaryMask) -> ImageBuffer {
    let width = mask.width();
    let mut out = ImageBuffer::new(width as u32, mask.height() as u32);

    par_fill_rows(out.pixels_mut(), width, |x, y| {
        if mask.get(x, y) {
            WHITE
        } else {
            BLACK
        }
    });

    out
}
