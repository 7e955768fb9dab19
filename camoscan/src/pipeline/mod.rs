//! End-to-end visualization pipeline.
//!
//! decode -> downscale -> detect once -> {overlay, spectral, mask} ->
//! upscale -> encode. The detection map is the only thing the three renderers
//! share, so their footprints always agree.

#[cfg(test)]
mod tests;

use std::time::Instant;

use tracing::{debug, info};

use crate::codec::{decode, encode_png};
use crate::config::Config;
use crate::detection::AnomalyDetector;
use crate::error::Result;
use crate::image_buffer::ImageBuffer;
use crate::render::{closed_mask, render_mask, render_overlay, render_spectral};
use crate::resample::{downscale, upscale};
use crate::stats::DetectionStats;

/// Mask cells at or above this after smoothing upscale are white.
const MASK_THRESHOLD: u8 = 128;

/// Decoded outputs at the source resolution.
#[derive(Debug, Clone)]
pub struct RenderedBuffers {
    pub overlay: ImageBuffer,
    pub spectral: ImageBuffer,
    pub mask: ImageBuffer,
    pub stats: DetectionStats,
}

/// PNG-encoded outputs at the source resolution.
#[derive(Debug, Clone)]
pub struct Visualizations {
    pub width: u32,
    pub height: u32,
    pub overlay: Vec<u8>,
    pub spectral: Vec<u8>,
    pub mask: Vec<u8>,
    pub stats: DetectionStats,
}

#[derive(Debug, Clone)]
pub struct VisualizationPipeline {
    config: Config,
    detector: AnomalyDetector,
}

impl VisualizationPipeline {
    /// Builds a pipeline after validating `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let detector = AnomalyDetector::from_config(&config)?;
        Ok(Self { config, detector })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs detection once and renders all three outputs at `image`'s size.
    pub fn render(&self, image: &ImageBuffer) -> RenderedBuffers {
        let (width, height) = image.dimensions();
        let start = Instant::now();

        let working = downscale(image, self.config.max_dimension);
        debug!(
            source_width = width,
            source_height = height,
            working_width = working.width(),
            working_height = working.height(),
            "Working resolution"
        );

        let map = self.detector.detect(&working);
        let mask = closed_mask(&map, &self.config);
        let stats = DetectionStats::compute(&map, &mask);

        let overlay = upscale(&render_overlay(&working, &map, &self.config), width, height);
        let spectral = upscale(&render_spectral(&working, &map, &self.config), width, height);
        let mut mask = upscale(&render_mask(&mask), width, height);
        rebinarize(&mut mask);

        info!(
            width,
            height,
            anomalous_pixels = stats.anomalous_pixels,
            coverage_percent = stats.coverage_percent,
            peak_score = stats.peak_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered visualizations"
        );

        RenderedBuffers {
            overlay,
            spectral,
            mask,
            stats,
        }
    }

    /// Decodes `bytes`, renders, and PNG-encodes all three outputs.
    ///
    /// Any decode or encode failure fails the whole run.
    pub fn run(&self, bytes: &[u8]) -> Result<Visualizations> {
        let image = decode(bytes)?;
        let rendered = self.render(&image);

        Ok(Visualizations {
            width: image.width(),
            height: image.height(),
            overlay: encode_png(&rendered.overlay)?,
            spectral: encode_png(&rendered.spectral)?,
            mask: encode_png(&rendered.mask)?,
            stats: rendered.stats,
        })
    }
}

/// Snaps interpolated mask edges back to pure black or white.
fn rebinarize(mask: &mut ImageBuffer) {
    for pixel in mask.pixels_mut() {
        let v = if pixel[0] >= MASK_THRESHOLD { 255 } else { 0 };
        *pixel = [v, v, v, 255];
    }
}
