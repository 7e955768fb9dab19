//! Configuration for the detection and visualization pipeline.
//!
//! [`Config`] is a flat struct whose fields are grouped by comments into the
//! stages that read them. Every field has a default, and partial YAML/JSON
//! files only override the fields they name.

use std::path::Path;

use common::SerdeFormat;
use serde::{Deserialize, Serialize};

use crate::color::ColorRamp;
use crate::error::{Error, Result};

/// Long-edge cap of the working resolution.
pub const DEFAULT_MAX_DIMENSION: u32 = 800;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ------------------------------------------------------------------
    // Working resolution
    // ------------------------------------------------------------------
    /// Images whose long edge exceeds this are analysed downscaled.
    pub max_dimension: u32,

    // ------------------------------------------------------------------
    // Anomaly detector
    // ------------------------------------------------------------------
    /// Outer radius of the surround annulus; also the skipped border width.
    pub outer_radius: usize,
    /// Inner radius of the surround annulus.
    pub inner_radius: usize,
    /// Half-size of the square local window (3 gives 7x7).
    pub local_window_radius: usize,
    /// Largest horizontal offset compared by the pattern test.
    pub pattern_max_offset: usize,
    /// Intensity differences must be strictly above this to count.
    pub pattern_min_diff: f32,
    /// Intensity differences must be strictly below this to count.
    pub pattern_max_diff: f32,
    /// Minimum number of moderate oscillations.
    pub pattern_min_count: u32,
    /// Color anomaly must be strictly above this.
    pub anomaly_min: f32,
    /// Color anomaly must be strictly below this.
    pub anomaly_max: f32,

    // ------------------------------------------------------------------
    // Mask morphology
    // ------------------------------------------------------------------
    pub dilate_radius: usize,
    pub erode_radius: usize,

    // ------------------------------------------------------------------
    // Red overlay
    // ------------------------------------------------------------------
    /// Score that maps to blend intensity 1.0.
    pub overlay_scale: f32,
    /// Maximum fraction of red mixed into a pixel.
    pub overlay_blend_cap: f32,
    /// Brightness factor applied to pixels without detection.
    pub overlay_background_dim: f32,

    // ------------------------------------------------------------------
    // Spectral map
    // ------------------------------------------------------------------
    /// Radius of the decaying halo spread around each detection.
    pub spectral_halo_radius: usize,
    /// Score that maps to the top of the ramp.
    pub spectral_scale: f32,
    /// Intensities below this are rendered as dimmed background.
    pub spectral_floor: f32,
    /// Brightness factor applied to background pixels.
    pub spectral_background_dim: f32,
    pub ramp: ColorRamp,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,

            outer_radius: 12,
            inner_radius: 8,
            local_window_radius: 3,
            pattern_max_offset: 4,
            pattern_min_diff: 10.0,
            pattern_max_diff: 40.0,
            pattern_min_count: 2,
            anomaly_min: 18.0,
            anomaly_max: 95.0,

            dilate_radius: 6,
            erode_radius: 3,

            overlay_scale: 100.0,
            overlay_blend_cap: 0.7,
            overlay_background_dim: 1.0,

            spectral_halo_radius: 6,
            spectral_scale: 100.0,
            spectral_floor: 0.05,
            spectral_background_dim: 0.2,
            ramp: ColorRamp::thermal(),
        }
    }
}

impl Config {
    /// Loads a config from a `.yaml`/`.yml`/`.json` file and validates it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = SerdeFormat::from_path(path).map_err(|e| Error::Config(e.to_string()))?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text, format)
    }

    pub fn parse(text: &str, format: SerdeFormat) -> Result<Self> {
        let config: Config = match format {
            SerdeFormat::Yaml => serde_yml::from_str(text).map_err(|e| Error::Config(e.to_string()))?,
            SerdeFormat::Json => {
                serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::Config(msg()))
            }
        }

        check(self.max_dimension > 0, || "max_dimension must be positive".into())?;
        check(self.inner_radius < self.outer_radius, || {
            format!(
                "inner_radius ({}) must be < outer_radius ({})",
                self.inner_radius, self.outer_radius
            )
        })?;
        check(self.local_window_radius <= self.outer_radius, || {
            format!(
                "local_window_radius ({}) must be <= outer_radius ({})",
                self.local_window_radius, self.outer_radius
            )
        })?;
        check(self.pattern_max_offset <= self.outer_radius, || {
            format!(
                "pattern_max_offset ({}) must be <= outer_radius ({})",
                self.pattern_max_offset, self.outer_radius
            )
        })?;
        check(
            self.pattern_min_diff >= 0.0 && self.pattern_min_diff < self.pattern_max_diff,
            || {
                format!(
                    "pattern thresholds must satisfy 0 <= min ({}) < max ({})",
                    self.pattern_min_diff, self.pattern_max_diff
                )
            },
        )?;
        check(
            self.anomaly_min >= 0.0 && self.anomaly_min < self.anomaly_max,
            || {
                format!(
                    "anomaly band must satisfy 0 <= min ({}) < max ({})",
                    self.anomaly_min, self.anomaly_max
                )
            },
        )?;
        check(self.erode_radius <= self.dilate_radius, || {
            format!(
                "erode_radius ({}) must be <= dilate_radius ({}) so closing never shrinks detections",
                self.erode_radius, self.dilate_radius
            )
        })?;
        check((0.0..=1.0).contains(&self.overlay_blend_cap), || {
            format!(
                "overlay_blend_cap must be in [0, 1], got {}",
                self.overlay_blend_cap
            )
        })?;
        check(self.overlay_scale > 0.0, || {
            format!("overlay_scale must be positive, got {}", self.overlay_scale)
        })?;
        check(self.spectral_scale > 0.0, || {
            format!("spectral_scale must be positive, got {}", self.spectral_scale)
        })?;
        check((0.0..=1.0).contains(&self.spectral_floor), || {
            format!("spectral_floor must be in [0, 1], got {}", self.spectral_floor)
        })?;
        check((0.0..=1.0).contains(&self.overlay_background_dim), || {
            format!(
                "overlay_background_dim must be in [0, 1], got {}",
                self.overlay_background_dim
            )
        })?;
        check((0.0..=1.0).contains(&self.spectral_background_dim), || {
            format!(
                "spectral_background_dim must be in [0, 1], got {}",
                self.spectral_background_dim
            )
        })?;

        Ok(())
    }
}
