//! Synthetic images for tests and benches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::codec::encode_png;
use crate::image_buffer::ImageBuffer;

/// Axis-aligned rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

pub fn rgba(rgb: [u8; 3]) -> [u8; 4] {
    [rgb[0], rgb[1], rgb[2], 255]
}

pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> ImageBuffer {
    ImageBuffer::filled(width, height, rgba(rgb))
}

/// Checkerboard of `block`-sized squares inside `rect`, `surround` elsewhere.
pub fn checkerboard_in_surround(
    width: u32,
    height: u32,
    rect: Rect,
    block: u32,
    a: [u8; 3],
    b: [u8; 3],
    surround: [u8; 3],
) -> ImageBuffer {
    let mut image = uniform(width, height, surround);
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            let parity = ((x - rect.x0) / block + (y - rect.y0) / block) % 2;
            image.set_pixel(x, y, rgba(if parity == 0 { a } else { b }));
        }
    }
    image
}

/// The camouflage fixture: an 8px checkerboard whose colors differ by 30 per
/// channel, centred in a 96x96 image on a uniform backdrop.
pub fn camouflage_scene() -> (ImageBuffer, Rect) {
    let rect = Rect {
        x0: 24,
        y0: 24,
        x1: 72,
        y1: 72,
    };
    let image = checkerboard_in_surround(
        96,
        96,
        rect,
        8,
        [100, 120, 80],
        [130, 150, 110],
        [115, 135, 95],
    );
    (image, rect)
}

/// Uniformly random opaque pixels from a fixed seed.
pub fn seeded_noise(width: u32, height: u32, seed: u64) -> ImageBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (0..width as usize * height as usize)
        .map(|_| [rng.random(), rng.random(), rng.random(), 255])
        .collect();
    ImageBuffer::from_pixels(width, height, pixels).unwrap()
}

pub fn png_bytes(image: &ImageBuffer) -> Vec<u8> {
    encode_png(image).unwrap()
}
