//! Seam for the remote vision model that describes what was found.
//!
//! The pixel pipeline never depends on the analyzer. [`scan`] renders first
//! and only then asks the analyzer, so a failing or slow model can cost the
//! description but never the images.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::{VisualizationPipeline, Visualizations};

/// Structured answer of a vision model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CamouflageReport {
    pub object_type: String,
    pub species: String,
    /// 0 to 100.
    pub confidence: f32,
    pub description: String,
    pub camouflage_analysis: String,
    pub location: String,
}

impl CamouflageReport {
    /// Confidence forced into `[0, 100]`; NaN becomes 0.
    pub fn normalized(mut self) -> Self {
        self.confidence = if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 100.0)
        };
        self
    }
}

/// Something that can describe an image, e.g. a hosted multimodal model.
pub trait VisionAnalyzer {
    /// `image` is the encoded input; `mask` the encoded detection mask when shared.
    fn analyze(&self, image: &[u8], mask: Option<&[u8]>) -> anyhow::Result<CamouflageReport>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(CamouflageReport),
    Failed(String),
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&CamouflageReport> {
        match self {
            AnalysisOutcome::Completed(report) => Some(report),
            AnalysisOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub visualizations: Visualizations,
    pub analysis: AnalysisOutcome,
}

/// Renders `bytes` with `pipeline`, then asks `analyzer` for a description.
///
/// Errors from the pipeline are returned. Errors from the analyzer are logged
/// and recorded as [`AnalysisOutcome::Failed`].
pub fn scan<A>(
    pipeline: &VisualizationPipeline,
    analyzer: &A,
    bytes: &[u8],
    share_mask: bool,
) -> Result<ScanReport>
where
    A: VisionAnalyzer + ?Sized,
{
    let visualizations = pipeline.run(bytes)?;

    let mask = share_mask.then_some(visualizations.mask.as_slice());
    let analysis = match analyzer.analyze(bytes, mask) {
        Ok(report) => {
            let report = report.normalized();
            info!(
                object_type = %report.object_type,
                confidence = report.confidence,
                "Vision analysis completed"
            );
            AnalysisOutcome::Completed(report)
        }
        Err(err) => {
            warn!("Vision analysis failed: {:#}", err);
            AnalysisOutcome::Failed(format!("{:#}", err))
        }
    };

    Ok(ScanReport {
        visualizations,
        analysis,
    })
}
