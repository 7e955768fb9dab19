use serde::{Deserialize, Serialize};

use crate::detection::DetectionMap;
use crate::morphology::BinaryMask;

/// Summary of one detection pass, measured at working resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionStats {
    pub working_width: usize,
    pub working_height: usize,
    /// Pixels with a positive score before morphology.
    pub anomalous_pixels: usize,
    /// Pixels set in the closed mask.
    pub mask_pixels: usize,
    /// Share of the image covered by the closed mask, 0 to 100.
    pub coverage_percent: f32,
    /// Mean score over anomalous pixels, 0 when there are none.
    pub mean_score: f32,
    pub peak_score: u8,
}

impl DetectionStats {
    pub fn compute(map: &DetectionMap, mask: &BinaryMask) -> Self {
        debug_assert_eq!((map.width(), map.height()), (mask.width(), mask.height()));

        let total = map.width() * map.height();
        let (anomalous, score_sum) = map
            .scores()
            .iter()
            .filter(|&&s| s > 0)
            .fold((0usize, 0u64), |(n, sum), &s| (n + 1, sum + s as u64));
        let mask_pixels = mask.count();

        Self {
            working_width: map.width(),
            working_height: map.height(),
            anomalous_pixels: anomalous,
            mask_pixels,
            coverage_percent: if total == 0 {
                0.0
            } else {
                (mask_pixels as f64 * 100.0 / total as f64) as f32
            },
            mean_score: if anomalous == 0 {
                0.0
            } else {
                (score_sum as f64 / anomalous as f64) as f32
            },
            peak_score: map.max_score(),
        }
    }
}
