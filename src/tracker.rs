use egui::Pos2;

use crate::mask::{SampleRegion, ScratchMask};

/// Contact-tracking state. Exactly one pointer is followed at a time —
/// whichever contact egui reports for the drag. Additional simultaneous
/// contacts are ignored, a deliberate simplification.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TrackState {
    /// No active contact.
    Idle,
    /// Following one contact; `previous` is the last position seen, in
    /// mask-pixel coordinates.
    Tracking { previous: Pos2 },
}

/// What a single processed movement did.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrokeOutcome {
    /// A stroke was actually erased into the mask this movement.
    pub erased: bool,
    /// Coverage measured after the stroke, if measurement ran. Measurement
    /// stops once the latch flips — there is nothing left to decide.
    pub measured: Option<f32>,
    /// The completion threshold was crossed for the first time.
    pub just_completed: bool,
}

/// Converts movement events into erase strokes and watches for completion.
///
/// The latch is monotonic: once coverage first meets the threshold the
/// tracker reports `just_completed` exactly once and never signals again,
/// no matter how much further the user scratches.
pub struct StrokeTracker {
    state: TrackState,
    completed: bool,
    /// Stroke width in mask pixels (logical width × device pixel scale).
    stroke_width_px: f32,
    /// Coverage percentage at which completion fires.
    threshold: f32,
    region: SampleRegion,
    /// The missing-mask skip is logged once, not per movement event.
    missing_mask_warned: bool,
}

impl StrokeTracker {
    pub fn new(stroke_width_px: f32, threshold: f32, region: SampleRegion) -> Self {
        Self {
            state: TrackState::Idle,
            completed: false,
            stroke_width_px,
            threshold,
            region,
            missing_mask_warned: false,
        }
    }

    /// Whether the completion latch has flipped.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// First contact: start tracking from `pos` (mask-pixel coordinates).
    pub fn touch_began(&mut self, pos: Pos2) {
        self.state = TrackState::Tracking { previous: pos };
    }

    /// Contact lifted or cancelled.
    pub fn touch_ended(&mut self) {
        self.state = TrackState::Idle;
    }

    /// One movement event while the contact is down.
    ///
    /// Erases previous→current into the mask, advances the tracked position,
    /// and (until the latch flips) measures coverage. A missing mask — the
    /// surface never allocated — is non-fatal: the stroke is skipped (a
    /// one-time warning in the session log, nothing user-visible) and
    /// tracking continues, position still advancing, so a later recovery
    /// picks up from the right place. Movements while `Idle` are ignored.
    pub fn touch_moved(&mut self, mask: Option<&mut ScratchMask>, pos: Pos2) -> StrokeOutcome {
        let TrackState::Tracking { previous } = self.state else {
            return StrokeOutcome::default();
        };
        self.state = TrackState::Tracking { previous: pos };

        let Some(mask) = mask else {
            if !self.missing_mask_warned {
                self.missing_mask_warned = true;
                crate::log_warn!("erase stroke skipped: mask not allocated");
            }
            return StrokeOutcome::default();
        };

        mask.erase_stroke(previous, pos, self.stroke_width_px);

        let mut outcome = StrokeOutcome {
            erased: true,
            ..Default::default()
        };
        if !self.completed {
            let pct = mask.erased_percentage(self.region);
            outcome.measured = Some(pct);
            if pct >= self.threshold {
                self.completed = true;
                outcome.just_completed = true;
            }
        }
        outcome
    }
}
