//! Local-anomaly detection.
//!
//! Every pixel at least `outer_radius` away from the image border is scored by
//! comparing the mean color of a small square window against the mean color of
//! a surrounding annulus, gated by a horizontal oscillation test that rejects
//! both flat regions and noise. Border pixels always score 0.


use common::Buffer2;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::image_buffer::ImageBuffer;

/// Per-pixel anomaly scores for one image; 0 means "not anomalous".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionMap {
    scores: Buffer2<u8>,
}

impl DetectionMap {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            scores: Buffer2::new_filled(width, height, 0),
        }
    }

    pub fn from_scores(width: usize, height: usize, scores: Vec<u8>) -> Result<Self> {
        if scores.len() != width * height {
            return Err(Error::InvalidInput(format!(
                "score count {} does not match {}x{}",
                scores.len(),
                width,
                height
            )));
        }

        Ok(Self {
            scores: Buffer2::new(width, height, scores),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.scores.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.scores.height()
    }

    #[inline]
    pub fn score(&self, x: usize, y: usize) -> u8 {
        self.scores[(x, y)]
    }

    #[inline]
    pub fn scores(&self) -> &[u8] {
        self.scores.pixels()
    }

    pub fn anomalous_count(&self) -> usize {
        self.scores.iter().filter(|&&s| s > 0).count()
    }

    pub fn max_score(&self) -> u8 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// True when no pixel is anomalous.
    pub fn is_clear(&self) -> bool {
        self.scores.iter().all(|&s| s == 0)
    }
}

/// Detector thresholds and window geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    pub outer_radius: usize,
    pub inner_radius: usize,
    pub local_window_radius: usize,
    pub pattern_max_offset: usize,
    pub pattern_min_diff: f32,
    pub pattern_max_diff: f32,
    pub pattern_min_count: u32,
    pub anomaly_min: f32,
    pub anomaly_max: f32,
}

impl From<&Config> for DetectorParams {
    fn from(config: &Config) -> Self {
        Self {
            outer_radius: config.outer_radius,
            inner_radius: config.inner_radius,
            local_window_radius: config.local_window_radius,
            pattern_max_offset: config.pattern_max_offset,
            pattern_min_diff: config.pattern_min_diff,
            pattern_max_diff: config.pattern_max_diff,
            pattern_min_count: config.pattern_min_count,
            anomaly_min: config.anomaly_min,
            anomaly_max: config.anomaly_max,
        }
    }
}

impl DetectorParams {
    /// Checks that the windows fit inside the skipped border.
    pub fn validate(&self) -> Result<()> {
        if self.inner_radius >= self.outer_radius {
            return Err(Error::Config(format!(
                "inner_radius ({}) must be < outer_radius ({})",
                self.inner_radius, self.outer_radius
            )));
        }
        if self.local_window_radius > self.outer_radius
            || self.pattern_max_offset > self.outer_radius
        {
            return Err(Error::Config(format!(
                "local window ({}) and pattern offsets ({}) must fit inside the border margin ({})",
                self.local_window_radius, self.pattern_max_offset, self.outer_radius
            )));
        }
        Ok(())
    }
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    params: DetectorParams,
    /// Offsets with `inner² <= dx² + dy² <= outer²`.
    annulus: Vec<(isize, isize)>,
}

impl AnomalyDetector {
    /// Fails with [`Error::Config`] when the windows reach past the border.
    pub fn new(params: DetectorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(DetectorParams::from(config))
    }

    fn build(params: DetectorParams) -> Self {
        let outer = params.outer_radius as isize;
        let inner_sq = (params.inner_radius * params.inner_radius) as isize;
        let outer_sq = outer * outer;

        let annulus = (-outer..=outer)
            .flat_map(|dy| (-outer..=outer).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| {
                let d2 = dx * dx + dy * dy;
                d2 >= inner_sq && d2 <= outer_sq
            })
            .collect();

        Self { params, annulus }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Scores every pixel of `image`. The map has the image's dimensions.
    pub fn detect(&self, image: &ImageBuffer) -> DetectionMap {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let margin = self.params.outer_radius;

        if width <= 2 * margin || height <= 2 * margin {
            debug!(
                width,
                height, margin, "image smaller than the analysis window, nothing to detect"
            );
            return DetectionMap::empty(width, height);
        }

        let pixels = image.pixels();
        let intensity: Vec<f32> = pixels
            .iter()
            .map(|p| (p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0)
            .collect();

        let scores = Buffer2::from_fn_par(width, height, |x, y| {
            if x < margin || y < margin || x >= width - margin || y >= height - margin {
                return 0;
            }
            self.score_at(pixels, &intensity, width, x, y)
        });

        let map = DetectionMap { scores };
        debug!(
            width,
            height,
            anomalous = map.anomalous_count(),
            peak = map.max_score(),
            "anomaly detection finished"
        );
        map
    }

    fn score_at(
        &self,
        pixels: &[[u8; 4]],
        intensity: &[f32],
        width: usize,
        x: usize,
        y: usize,
    ) -> u8 {
        let p = &self.params;
        let center = y * width + x;

        let anomaly = self.color_anomaly(pixels, width, x, y);
        if !(anomaly > p.anomaly_min && anomaly < p.anomaly_max) {
            return 0;
        }

        let row = &intensity[center - p.pattern_max_offset..=center + p.pattern_max_offset];
        let mid = p.pattern_max_offset;
        let oscillations = (1..=p.pattern_max_offset)
            .filter(|&dx| {
                let diff = (row[mid - dx] - row[mid + dx]).abs();
                diff > p.pattern_min_diff && diff < p.pattern_max_diff
            })
            .count() as u32;

        if oscillations < p.pattern_min_count {
            return 0;
        }

        anomaly.min(255.0).round().max(1.0) as u8
    }

    /// Sum of absolute per-channel differences between the local and surround means.
    fn color_anomaly(&self, pixels: &[[u8; 4]], width: usize, x: usize, y: usize) -> f32 {
        let r = self.params.local_window_radius;

        let mut local = [0u32; 3];
        for wy in y - r..=y + r {
            for px in &pixels[wy * width + x - r..=wy * width + x + r] {
                local[0] += px[0] as u32;
                local[1] += px[1] as u32;
                local[2] += px[2] as u32;
            }
        }
        let local_count = ((2 * r + 1) * (2 * r + 1)) as f32;

        let mut surround = [0u32; 3];
        for &(dx, dy) in &self.annulus {
            let sx = (x as isize + dx) as usize;
            let sy = (y as isize + dy) as usize;
            let px = pixels[sy * width + sx];
            surround[0] += px[0] as u32;
            surround[1] += px[1] as u32;
            surround[2] += px[2] as u32;
        }
        let surround_count = self.annulus.len() as f32;

        (0..3)
            .map(|c| (local[c] as f32 / local_count - surround[c] as f32 / surround_count).abs())
            .sum()
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::build(DetectorParams::default())
    }
}
