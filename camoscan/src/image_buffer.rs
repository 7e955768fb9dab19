//! RGBA8 pixel grid shared by every pipeline stage.

use crate::error::{Error, Result};

pub const CHANNELS: usize = 4;

/// An owned RGBA8 image, tightly packed, row-major.
///
/// Invariant: `bytes.len() == width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ImageBuffer {
    /// Creates a fully transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let bytes = rgba.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            bytes,
        }
    }

    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if bytes.len() != expected {
            return Err(Error::InvalidInput(format!(
                "bytes length {} does not match expected size {} for {}x{} RGBA",
                bytes.len(),
                expected,
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Builds an image from per-pixel colors, one entry per pixel in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Result<Self> {
        let bytes = bytemuck::cast_slice::<[u8; 4], u8>(&pixels).to_vec();
        Self::from_raw(width, height, bytes)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels()[self.index(x, y)]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.index(x, y);
        self.pixels_mut()[idx] = rgba;
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.bytes)
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = ImageBuffer::from_raw(4, 4, vec![0; 63]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_from_raw_accepts_exact_length() {
        let img = ImageBuffer::from_raw(3, 2, vec![7; 24]).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.pixel(2, 1), [7, 7, 7, 7]);
    }

    #[test]
    fn test_pixel_access_is_row_major() {
        let mut img = ImageBuffer::new(5, 3);
        img.set_pixel(4, 1, [1, 2, 3, 4]);
        assert_eq!(img.pixels()[1 * 5 + 4], [1, 2, 3, 4]);
        assert_eq!(&img.as_bytes()[(1 * 5 + 4) * 4..(1 * 5 + 4) * 4 + 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_filled() {
        let img = ImageBuffer::filled(2, 2, [10, 20, 30, 255]);
        assert!(img.pixels().iter().all(|&p| p == [10, 20, 30, 255]));
        assert_eq!(img.into_raw().len(), 16);
    }

    #[test]
    fn test_zero_sized_image() {
        let img = ImageBuffer::new(0, 7);
        assert!(img.is_empty());
        assert_eq!(img.pixel_count(), 0);
    }
}
