use egui::{Color32, ColorImage, Pos2};
use image::{Rgba, RgbaImage};

/// Hard ceiling on mask size (~256 megapixels). Anything larger is almost
/// certainly a bad `logical_size * pixels_per_point` computation upstream.
const MAX_MASK_PIXELS: u64 = 256_000_000;

// ============================================================================
// ERRORS
// ============================================================================

/// Failures that can surface from the scratch core.
///
/// Construction failures are hard errors the caller must honor by not
/// presenting the widget. Everything after construction is infallible on an
/// allocated mask; a widget whose mask never allocated skips strokes instead.
#[derive(Debug)]
pub enum ScratchError {
    /// The computed pixel dimensions were zero or implausibly large.
    Allocation { width: u32, height: u32 },
}

impl std::fmt::Display for ScratchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScratchError::Allocation { width, height } => {
                write!(f, "cannot allocate {}×{} scratch mask", width, height)
            }
        }
    }
}

impl std::error::Error for ScratchError {}

// ============================================================================
// SAMPLE REGION
// ============================================================================

/// Fractional sub-rectangle of the mask scanned by coverage measurement.
/// All four fields are fractions of the mask dimensions in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SampleRegion {
    /// The centered half-width × half-height rectangle. Scratching tends to
    /// start centrally, so a localized scan is cheaper and perceptually
    /// adequate — this approximation (not the full mask) is the default on
    /// purpose, and changing it changes user-visible completion timing.
    pub const CENTER_HALF: SampleRegion = SampleRegion {
        x: 0.25,
        y: 0.25,
        width: 0.5,
        height: 0.5,
    };

    /// The entire mask.
    pub const FULL: SampleRegion = SampleRegion {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Pixel bounds `(x0, y0, x1, y1)` of this region on a `w`×`h` mask,
    /// half-open on the right/bottom, truncated and clamped to the mask.
    fn pixel_bounds(&self, w: u32, h: u32) -> (u32, u32, u32, u32) {
        let x0 = ((w as f32 * self.x).max(0.0) as u32).min(w);
        let y0 = ((h as f32 * self.y).max(0.0) as u32).min(h);
        let x1 = ((w as f32 * (self.x + self.width)).max(0.0) as u32).min(w);
        let y1 = ((h as f32 * (self.y + self.height)).max(0.0) as u32).min(h);
        (x0, y0, x1, y1)
    }
}

impl Default for SampleRegion {
    fn default() -> Self {
        SampleRegion::CENTER_HALF
    }
}

// ============================================================================
// SCRATCH MASK — the opaque overlay raster
// ============================================================================

/// The erase mask: an RGBA raster at device-pixel resolution, initialized
/// fully opaque and progressively cleared by strokes. Alpha 0 means erased.
///
/// The buffer is owned exclusively by this struct — nothing else may read or
/// write it, so no locking is needed anywhere in the core. Dimensions never
/// change after construction.
pub struct ScratchMask {
    pixels: RgbaImage,
}

impl ScratchMask {
    /// Allocate a mask for a widget of `logical_size` points at the given
    /// device pixel scale, filled entirely with `fill` at full opacity.
    pub fn new(
        logical_size: egui::Vec2,
        pixels_per_point: f32,
        fill: Color32,
    ) -> Result<Self, ScratchError> {
        let width = (logical_size.x * pixels_per_point).round().max(0.0) as u32;
        let height = (logical_size.y * pixels_per_point).round().max(0.0) as u32;
        Self::from_pixel_size(width, height, fill)
    }

    /// Allocate a mask of exact pixel dimensions.
    pub fn from_pixel_size(width: u32, height: u32, fill: Color32) -> Result<Self, ScratchError> {
        let total = (width as u64) * (height as u64);
        if total == 0 || total > MAX_MASK_PIXELS {
            return Err(ScratchError::Allocation { width, height });
        }
        let fill = Rgba([fill.r(), fill.g(), fill.b(), 255]);
        let pixels = RgbaImage::from_pixel(width, height, fill);
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    // ---- erasure ------------------------------------------------------------

    /// Erase a round-capped line segment of `width_px` through the mask.
    ///
    /// This is the clear-composite stroke: every pixel under the stroke drops
    /// to alpha 0 (color zeroed as well). Drawn as densely stepped circular
    /// stamps along the segment, ≤ 1px apart, so the union is a solid
    /// stadium shape with no gaps at any drag speed.
    ///
    /// `from`/`to` are in the mask's own pixel space — the caller converts
    /// from logical points by multiplying with the device pixel scale.
    pub fn erase_stroke(&mut self, from: Pos2, to: Pos2, width_px: f32) {
        let radius = width_px / 2.0;
        if radius <= 0.0 {
            return;
        }
        let delta = to - from;
        let distance = delta.length();
        let steps = (distance.ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.clear_circle(from + delta * t, radius);
        }
    }

    /// Zero out every pixel within `radius` of `center`.
    fn clear_circle(&mut self, center: Pos2, radius: f32) {
        let (cx, cy) = (center.x, center.y);
        let radius_sq = radius * radius;
        let width = self.pixels.width();
        let height = self.pixels.height();

        let min_x = (cx - radius).max(0.0) as u32;
        let max_x = ((cx + radius).max(0.0) as u32).min(width.saturating_sub(1));
        let min_y = (cy - radius).max(0.0) as u32;
        let max_y = ((cy + radius).max(0.0) as u32).min(height.saturating_sub(1));
        if min_x > max_x || min_y > max_y {
            return;
        }

        for y in min_y..=max_y {
            let dy = y as f32 - cy;
            let dy_sq = dy * dy;
            for x in min_x..=max_x {
                let dx = x as f32 - cx;
                if dx * dx + dy_sq <= radius_sq {
                    self.pixels.put_pixel(x, y, Rgba([0, 0, 0, 0]));
                }
            }
        }
    }

    // ---- readback -----------------------------------------------------------

    /// Snapshot the mask into a `ColorImage` for texture upload. Pure read.
    ///
    /// Zero-copy cast from the raw RGBA bytes to `&[Color32]`; every pixel is
    /// either fully opaque or fully transparent black, so the bytes are
    /// already valid premultiplied color.
    pub fn to_color_image(&self) -> ColorImage {
        let size = [self.pixels.width() as usize, self.pixels.height() as usize];
        let src: &[Color32] = bytemuck::cast_slice(self.pixels.as_raw());
        ColorImage {
            size,
            pixels: src.to_vec(),
        }
    }

    // ---- measurement --------------------------------------------------------

    /// Percentage of pixels in `region` that are fully transparent, in
    /// [0, 100]. An empty region measures 0.0 — no division by zero.
    ///
    /// Scans every pixel in the region, counting `alpha == 0`. At the default
    /// centered-half region this is a quarter of the mask per call, cheap
    /// enough to run after every stroke until the latch flips.
    pub fn erased_percentage(&self, region: SampleRegion) -> f32 {
        let width = self.pixels.width();
        let (x0, y0, x1, y1) = region.pixel_bounds(width, self.pixels.height());

        let raw = self.pixels.as_raw();
        let mut total: u64 = 0;
        let mut clear: u64 = 0;
        for y in y0..y1 {
            let row = (y as usize * width as usize) * 4;
            for x in x0..x1 {
                let alpha = raw[row + x as usize * 4 + 3];
                total += 1;
                if alpha == 0 {
                    clear += 1;
                }
            }
        }

        if total == 0 {
            return 0.0;
        }
        (clear as f32 * 100.0) / total as f32
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_100() -> ScratchMask {
        ScratchMask::from_pixel_size(100, 100, Color32::from_gray(170)).unwrap()
    }

    #[test]
    fn fresh_mask_measures_zero() {
        let mask = mask_100();
        assert_eq!(mask.erased_percentage(SampleRegion::CENTER_HALF), 0.0);
        assert_eq!(mask.erased_percentage(SampleRegion::FULL), 0.0);
    }

    #[test]
    fn zero_sized_mask_is_an_allocation_error() {
        assert!(ScratchMask::from_pixel_size(0, 100, Color32::GRAY).is_err());
        assert!(ScratchMask::from_pixel_size(100, 0, Color32::GRAY).is_err());
        assert!(ScratchMask::new(egui::Vec2::ZERO, 2.0, Color32::GRAY).is_err());
    }

    #[test]
    fn logical_size_scales_by_pixels_per_point() {
        let mask = ScratchMask::new(egui::vec2(50.0, 40.0), 2.0, Color32::GRAY).unwrap();
        assert_eq!((mask.width(), mask.height()), (100, 80));
    }

    #[test]
    fn empty_sample_region_measures_zero() {
        let mask = mask_100();
        let empty = SampleRegion {
            x: 0.5,
            y: 0.5,
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(mask.erased_percentage(empty), 0.0);
    }

    #[test]
    fn fully_erased_region_measures_exactly_100() {
        let mut mask = mask_100();
        // One fat stamp centered on the mask covers the whole 50×50 center
        // sample region (corner distance ≈ 34.7px < 80px radius).
        let center = Pos2::new(49.5, 49.5);
        mask.erase_stroke(center, center, 160.0);
        assert_eq!(mask.erased_percentage(SampleRegion::CENTER_HALF), 100.0);
    }

    #[test]
    fn stroke_outside_sample_region_changes_nothing() {
        let mut mask = mask_100();
        // Horizontal band across rows 0..=15, entirely above the [25, 75)
        // center sample rows.
        mask.erase_stroke(Pos2::new(0.0, 5.5), Pos2::new(100.0, 5.5), 20.0);
        assert_eq!(mask.erased_percentage(SampleRegion::CENTER_HALF), 0.0);
        // ... but the full-mask measurement does see it.
        assert!(mask.erased_percentage(SampleRegion::FULL) > 0.0);
    }

    #[test]
    fn band_clearing_1000_of_2500_sampled_pixels_measures_40() {
        let mut mask = mask_100();
        // Width-20 stroke along y = 34.5 clears rows 25..=44 — 20 rows of 50
        // sampled columns = 1000 of 2500 pixels.
        mask.erase_stroke(Pos2::new(0.0, 34.5), Pos2::new(100.0, 34.5), 20.0);
        assert_eq!(mask.erased_percentage(SampleRegion::CENTER_HALF), 40.0);
    }

    #[test]
    fn band_clearing_900_of_2500_sampled_pixels_measures_36() {
        let mut mask = mask_100();
        // Width-18 stroke along y = 34.5 clears rows 26..=43 — 18 rows.
        mask.erase_stroke(Pos2::new(0.0, 34.5), Pos2::new(100.0, 34.5), 18.0);
        assert_eq!(mask.erased_percentage(SampleRegion::CENTER_HALF), 36.0);
    }

    #[test]
    fn zero_length_stroke_still_stamps_a_dot() {
        let mut mask = mask_100();
        let p = Pos2::new(49.5, 49.5);
        mask.erase_stroke(p, p, 4.0);
        assert!(mask.erased_percentage(SampleRegion::CENTER_HALF) > 0.0);
    }

    #[test]
    fn strokes_clip_at_mask_edges() {
        let mut mask = mask_100();
        // Mostly off-canvas; must not panic and must erase the overlap.
        mask.erase_stroke(Pos2::new(-50.0, -50.0), Pos2::new(10.0, 10.0), 30.0);
        assert!(mask.erased_percentage(SampleRegion::FULL) > 0.0);
    }

    #[test]
    fn snapshot_is_stable_between_strokes() {
        let mut mask = mask_100();
        mask.erase_stroke(Pos2::new(10.0, 10.0), Pos2::new(90.0, 90.0), 12.0);
        let a = mask.to_color_image();
        let b = mask.to_color_image();
        assert_eq!(a.size, b.size);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn snapshot_pixels_match_mask_state() {
        let mut mask = ScratchMask::from_pixel_size(4, 4, Color32::from_gray(170)).unwrap();
        mask.erase_stroke(Pos2::new(0.0, 0.0), Pos2::new(0.0, 0.0), 1.5);
        let img = mask.to_color_image();
        assert_eq!(img.pixels[0], Color32::TRANSPARENT);
        assert_eq!(img.pixels[15], Color32::from_gray(170));
    }
}
