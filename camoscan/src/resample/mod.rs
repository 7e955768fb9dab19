//! Working-resolution resampling.
//!
//! Analysis runs on a copy whose long edge is capped; outputs are brought back
//! to the source size afterwards.

#[cfg(test)]
mod tests;

use common::parallel::par_fill_rows;

use crate::image_buffer::ImageBuffer;

/// Dimensions after capping the long edge at `max_dimension`.
///
/// Each axis is `floor(dim * scale)` with `scale = min(1, max / long_edge)`,
/// computed in integers so the long edge lands exactly on the cap. Neither
/// axis collapses below 1 pixel.
pub fn working_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= max_dimension {
        return (width, height);
    }

    let scale_axis =
        |dim: u32| ((dim as u64 * max_dimension as u64) / long_edge as u64).max(1) as u32;
    (scale_axis(width), scale_axis(height))
}

/// Area-averaging downscale so the long edge is at most `max_dimension`.
///
/// Returns an identical copy when the image already fits.
pub fn downscale(image: &ImageBuffer, max_dimension: u32) -> ImageBuffer {
    let (width, height) = working_dimensions(image.width(), image.height(), max_dimension);
    if (width, height) == image.dimensions() {
        return image.clone();
    }

    area_resize(image, width, height)
}

/// Smooth (bilinear) resize to exactly `width` x `height`.
///
/// Sample positions are pixel-centre aligned and clamped at the edges, so a
/// resize to the same dimensions is an exact copy.
pub fn upscale(image: &ImageBuffer, width: u32, height: u32) -> ImageBuffer {
    if (width, height) == image.dimensions() {
        return image.clone();
    }

    let mut out = ImageBuffer::new(width, height);
    if out.is_empty() || image.is_empty() {
        return out;
    }

    let src = image.pixels();
    let src_w = image.width() as usize;
    let src_h = image.height() as usize;
    let xs = bilinear_taps(src_w, width as usize);
    let ys = bilinear_taps(src_h, height as usize);

    par_fill_rows(out.pixels_mut(), width as usize, |x, y| {
        let (x0, x1, fx) = xs[x];
        let (y0, y1, fy) = ys[y];

        let p00 = src[y0 * src_w + x0];
        let p10 = src[y0 * src_w + x1];
        let p01 = src[y1 * src_w + x0];
        let p11 = src[y1 * src_w + x1];

        std::array::from_fn(|c| {
            let top = p00[c] as f32 + fx * (p10[c] as f32 - p00[c] as f32);
            let bottom = p01[c] as f32 + fx * (p11[c] as f32 - p01[c] as f32);
            to_channel(top + fy * (bottom - top))
        })
    });

    out
}

/// Exact area average: every destination pixel covers a fractional rectangle
/// of the source and takes the coverage-weighted mean of what it overlaps.
fn area_resize(image: &ImageBuffer, width: u32, height: u32) -> ImageBuffer {
    let mut out = ImageBuffer::new(width, height);
    if out.is_empty() || image.is_empty() {
        return out;
    }

    let src = image.pixels();
    let src_w = image.width() as usize;
    let xs = area_taps(src_w, width as usize);
    let ys = area_taps(image.height() as usize, height as usize);

    par_fill_rows(out.pixels_mut(), width as usize, |x, y| {
        let mut acc = [0.0f32; 4];
        let mut total = 0.0f32;

        for &(sy, wy) in &ys[y] {
            let row = &src[sy * src_w..(sy + 1) * src_w];
            for &(sx, wx) in &xs[x] {
                let w = wx * wy;
                let p = row[sx];
                for c in 0..4 {
                    acc[c] += p[c] as f32 * w;
                }
                total += w;
            }
        }

        acc.map(|v| to_channel(v / total))
    });

    out
}

/// For each destination index, the overlapped source indices and their coverage.
fn area_taps(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);

            (first..last)
                .filter_map(|s| {
                    let coverage = end.min((s + 1) as f64) - start.max(s as f64);
                    (coverage > 1e-9).then_some((s, coverage as f32))
                })
                .collect()
        })
        .collect()
}

/// For each destination index, the two bracketing source indices and the blend
/// fraction toward the second.
fn bilinear_taps(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f64 / dst_len as f64;
    let last = (src_len - 1) as f64;

    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * scale - 0.5).clamp(0.0, last);
            let i0 = pos.floor() as usize;
            let i1 = (i0 + 1).min(src_len - 1);
            (i0, i1, (pos - i0 as f64) as f32)
        })
        .collect()
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
