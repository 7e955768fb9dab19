//! Commonly used types.
//!
//! ```rust,ignore
//! use camoscan::prelude::*;
//! ```

pub use crate::{Config, Error, ImageBuffer, Result};

pub use crate::{AnomalyDetector, BinaryMask, DetectionMap, DetectionStats};

pub use crate::{ColorRamp, VisualizationPipeline, Visualizations};

pub use crate::{scan, AnalysisOutcome, CamouflageReport, VisionAnalyzer};
