use egui::Color32;

use crate::mask::SampleRegion;

/// Tunables for a scratch card. Defaults reproduce the classic behavior:
/// a 40pt round stroke through a light-gray overlay, completing once the
/// center half of the mask is 40% clear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScratchConfig {
    /// Erase stroke width in logical points. Converted to mask pixels at
    /// widget construction using the device pixel scale.
    pub stroke_width: f32,
    /// Coverage percentage (0–100) at which the completion signal fires.
    pub completion_threshold: f32,
    /// Region of the mask scanned for coverage measurement.
    pub sample_region: SampleRegion,
    /// Initial opaque overlay color.
    pub fill_color: Color32,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            stroke_width: 40.0,
            completion_threshold: 40.0,
            sample_region: SampleRegion::CENTER_HALF,
            // UIKit's lightGray: 2/3 white.
            fill_color: Color32::from_gray(170),
        }
    }
}
