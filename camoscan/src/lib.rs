//! Camoscan - deterministic camouflage highlighting for photographs.
//!
//! One local-anomaly detection pass over a bounded working resolution drives
//! three renderings:
//! - a red overlay on the source image
//! - a thermal-style spectral map with a soft halo around detections
//! - a binary detection mask cleaned by morphological closing
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use camoscan::prelude::*;
//!
//! let pipeline = VisualizationPipeline::new(Config::default())?;
//! let bytes = std::fs::read("photo.jpg")?;
//! let out = pipeline.run(&bytes)?;
//!
//! std::fs::write("photo_overlay.png", &out.overlay)?;
//! println!("{:.1}% covered", out.stats.coverage_percent);
//! ```

pub mod analysis;
pub mod codec;
pub mod color;
pub mod config;
pub mod detection;
mod error;
mod image_buffer;
pub mod morphology;
pub mod pipeline;
pub mod render;
pub mod resample;
mod stats;

#[cfg(test)]
pub(crate) mod test_utils;

pub mod prelude;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Error, Result};
pub use image_buffer::{ImageBuffer, CHANNELS};

// ============================================================================
// Detection
// ============================================================================

pub use config::{Config, DEFAULT_MAX_DIMENSION};
pub use detection::{AnomalyDetector, DetectionMap, DetectorParams};
pub use morphology::BinaryMask;
pub use stats::DetectionStats;

// ============================================================================
// Rendering
// ============================================================================

pub use color::{ColorRamp, RampStop};
pub use pipeline::{RenderedBuffers, VisualizationPipeline, Visualizations};

// ============================================================================
// Remote analysis
// ============================================================================

pub use analysis::{scan, AnalysisOutcome, CamouflageReport, ScanReport, VisionAnalyzer};
