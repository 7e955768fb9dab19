//! Binary morphology on detection masks.
//!
//! The structuring element is the Euclidean disk `dx² + dy² <= r²`. Every
//! operator reads an immutable input and writes each output cell exactly once,
//! rows in parallel. Neighbours outside the image are ignored, so the frame
//! itself never erodes a region.


use common::Buffer2;

use crate::detection::DetectionMap;

/// Boolean mask with one cell per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    bits: Buffer2<bool>,
}

impl BinaryMask {
    pub fn new(width: usize, height: usize, bits: Vec<bool>) -> Self {
        Self {
            bits: Buffer2::new(width, height, bits),
        }
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            bits: Buffer2::new_filled(width, height, false),
        }
    }

    /// Cells with a positive score.
    pub fn from_detection(map: &DetectionMap) -> Self {
        Self::new(
            map.width(),
            map.height(),
            map.scores().iter().map(|&s| s > 0).collect(),
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.bits.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.bits.height()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[(x, y)]
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        self.bits.pixels()
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True if every cell set in `other` is also set here.
    pub fn contains(&self, other: &BinaryMask) -> bool {
        debug_assert_eq!(self.width(), other.width());
        debug_assert_eq!(self.height(), other.height());
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(&mine, &theirs)| mine || !theirs)
    }
}

/// Offsets of the disk of the given radius.
fn disk(radius: usize) -> Vec<(isize, isize)> {
    let r = radius as isize;
    let r_sq = r * r;
    (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| dx * dx + dy * dy <= r_sq)
        .collect()
}

#[inline]
fn offset(x: usize, y: usize, dx: isize, dy: isize, width: usize, height: usize) -> Option<usize> {
    let nx = x as isize + dx;
    let ny = y as isize + dy;
    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
        return None;
    }
    Some(ny as usize * width + nx as usize)
}

/// Sets every cell within `radius` of a set cell.
pub fn dilate(mask: &BinaryMask, radius: usize) -> BinaryMask {
    if radius == 0 {
        return mask.clone();
    }

    let (width, height) = (mask.width(), mask.height());
    let src = mask.bits();
    let element = disk(radius);

    let bits = Buffer2::from_fn_par(width, height, |x, y| {
        element
            .iter()
            .any(|&(dx, dy)| offset(x, y, dx, dy, width, height).is_some_and(|i| src[i]))
    });

    BinaryMask { bits }
}

/// Keeps a cell only if every in-image cell within `radius` is set.
pub fn erode(mask: &BinaryMask, radius: usize) -> BinaryMask {
    if radius == 0 {
        return mask.clone();
    }

    let (width, height) = (mask.width(), mask.height());
    let src = mask.bits();
    let element = disk(radius);

    let bits = Buffer2::from_fn_par(width, height, |x, y| {
        src[y * width + x]
            && element
                .iter()
                .all(|&(dx, dy)| offset(x, y, dx, dy, width, height).is_none_or(|i| src[i]))
    });

    BinaryMask { bits }
}

/// Dilation followed by erosion: fills small gaps and smooths the outline.
///
/// With `erode_radius <= dilate_radius` the result contains the input.
pub fn close(mask: &BinaryMask, dilate_radius: usize, erode_radius: usize) -> BinaryMask {
    erode(&dilate(mask, dilate_radius), erode_radius)
}

/// Grayscale dilation with linear decay.
///
/// Each scored cell spreads `score * (1 - distance / radius)` to its disk and
/// every output cell keeps the maximum it receives, giving a soft halo around
/// detections. Radius 0 returns the scores unchanged.
pub fn dilate_falloff(map: &DetectionMap, radius: usize) -> Buffer2<f32> {
    let (width, height) = (map.width(), map.height());
    let src = map.scores();

    if radius == 0 {
        return Buffer2::new(width, height, src.iter().map(|&s| s as f32).collect());
    }

    let r = radius as f32;
    let element: Vec<(isize, isize, f32)> = disk(radius)
        .into_iter()
        .map(|(dx, dy)| (dx, dy, 1.0 - ((dx * dx + dy * dy) as f32).sqrt() / r))
        .filter(|&(_, _, w)| w > 0.0)
        .collect();

    Buffer2::from_fn_par(width, height, |x, y| {
        element.iter().fold(0.0f32, |best, &(dx, dy, w)| {
            match offset(x, y, dx, dy, width, height) {
                Some(i) if src[i] > 0 => best.max(src[i] as f32 * w),
                _ => best,
            }
        })
    })
}
