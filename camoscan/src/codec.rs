//! Decoding of input rasters and PNG encoding of output artifacts.

use std::io::Cursor;
use std::path::Path;

use image as image_lib;

use crate::error::{Error, Result};
use crate::image_buffer::ImageBuffer;

/// Decodes any raster format the `image` crate recognizes into RGBA8.
pub fn decode(bytes: &[u8]) -> Result<ImageBuffer> {
    let img = image_lib::load_from_memory(bytes)
        .map_err(|e| Error::InvalidInput(format!("failed to decode image: {}", e)))?;

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "image has zero area: {}x{}",
            width, height
        )));
    }

    ImageBuffer::from_raw(width, height, rgba.into_raw())
}

/// Encodes the buffer as an RGBA8 PNG.
pub fn encode_png(image: &ImageBuffer) -> Result<Vec<u8>> {
    let rgba = image_lib::RgbaImage::from_raw(
        image.width(),
        image.height(),
        image.as_bytes().to_vec(),
    )
    .ok_or_else(|| {
        Error::Encoding(format!(
            "buffer does not match {}x{} RGBA layout",
            image.width(),
            image.height()
        ))
    })?;

    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, image_lib::ImageFormat::Png)
        .map_err(|e| Error::Encoding(e.to_string()))?;

    Ok(out.into_inner())
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ImageBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode(&bytes)
}

pub fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
