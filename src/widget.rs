use std::sync::Arc;

use egui::{
    Color32, ColorImage, ImageData, Pos2, Rect, Sense, TextureHandle, TextureOptions, Ui, Vec2,
};

use crate::config::ScratchConfig;
use crate::mask::ScratchMask;
use crate::tracker::StrokeTracker;

/// A scratch card: a revealed image hidden beneath an opaque overlay the
/// user erases by dragging. Retained widget — create it once, keep it in
/// your app state, and call [`ScratchCard::show`] every frame.
///
/// ```no_run
/// # let revealed = egui::ColorImage::new([200, 200], egui::Color32::GOLD);
/// let mut card = scratchcard::ScratchCard::new(egui::vec2(200.0, 200.0), revealed);
/// # fn show(card: &mut scratchcard::ScratchCard, ui: &mut egui::Ui) {
/// let response = card.show(ui);
/// if response.just_completed {
///     // reveal complete — exactly once
/// }
/// # }
/// ```
pub struct ScratchCard {
    size: Vec2,
    config: ScratchConfig,
    /// Pending revealed image, consumed when its texture is created.
    revealed: Option<ColorImage>,
    revealed_tex: Option<TextureHandle>,
    mask: Option<ScratchMask>,
    mask_tex: Option<TextureHandle>,
    tracker: Option<StrokeTracker>,
    /// Mask allocation failed at first show; the card renders inert.
    defunct: bool,
    on_complete: Option<Box<dyn FnMut()>>,
}

/// Result of showing a [`ScratchCard`] for one frame.
pub struct ScratchCardResponse {
    pub response: egui::Response,
    /// The completion threshold was crossed this frame. True on exactly one
    /// frame per card lifetime.
    pub just_completed: bool,
    /// The card has completed, this frame or earlier.
    pub completed: bool,
}

impl ScratchCard {
    /// A card of `size` logical points over `revealed`. The erase mask is
    /// allocated at first show, when the device pixel scale is known.
    pub fn new(size: Vec2, revealed: ColorImage) -> Self {
        Self {
            size,
            config: ScratchConfig::default(),
            revealed: Some(revealed),
            revealed_tex: None,
            mask: None,
            mask_tex: None,
            tracker: None,
            defunct: false,
            on_complete: None,
        }
    }

    pub fn with_config(mut self, config: ScratchConfig) -> Self {
        self.config = config;
        self
    }

    /// Callback invoked at most once, synchronously on the UI thread during
    /// `show`, on the frame the completion threshold is first crossed.
    /// Hosts that prefer polling can use [`ScratchCardResponse`] instead.
    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn is_complete(&self) -> bool {
        self.tracker.as_ref().is_some_and(StrokeTracker::is_complete)
    }

    /// Show the card, erasing along any pointer drag and pushing the updated
    /// mask to the display after every processed movement.
    pub fn show(&mut self, ui: &mut Ui) -> ScratchCardResponse {
        self.ensure_initialized(ui);

        let (rect, response) = ui.allocate_exact_size(self.size, Sense::drag());

        let mut just_completed = false;
        let mut stroke_erased = false;
        if let Some(tracker) = self.tracker.as_mut() {
            // Touch positions arrive in logical points; the mask lives at
            // device-pixel resolution. Scale before handing anything to the
            // tracker so erase width and measurement agree with the visual.
            let scale = ui.ctx().pixels_per_point();
            let to_mask_px =
                |pos: Pos2| Pos2::new((pos.x - rect.min.x) * scale, (pos.y - rect.min.y) * scale);

            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    tracker.touch_began(to_mask_px(pos));
                }
            } else if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let outcome = tracker.touch_moved(self.mask.as_mut(), to_mask_px(pos));
                    stroke_erased = outcome.erased;
                    just_completed = outcome.just_completed;
                }
            } else if response.drag_released() {
                tracker.touch_ended();
            }
        }
        if stroke_erased {
            self.push_mask_texture();
        }

        // Paint after input handling so this frame's stroke is already in
        // the mask texture: revealed image below, overlay on top.
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        if let Some(tex) = &self.revealed_tex {
            ui.painter().image(tex.id(), rect, uv, Color32::WHITE);
        }
        if let Some(tex) = &self.mask_tex {
            ui.painter().image(tex.id(), rect, uv, Color32::WHITE);
        }

        if just_completed {
            crate::log_info!("scratch card completed");
            if let Some(f) = &mut self.on_complete {
                f();
            }
        }

        ScratchCardResponse {
            response,
            just_completed,
            completed: self.is_complete(),
        }
    }

    /// First-show setup: allocate the mask at device-pixel resolution and
    /// create both textures. Allocation failure leaves the card inert — the
    /// blank rect still renders, nothing reacts.
    fn ensure_initialized(&mut self, ui: &mut Ui) {
        if self.defunct || self.mask.is_some() {
            return;
        }

        let scale = ui.ctx().pixels_per_point();
        match ScratchMask::new(self.size, scale, self.config.fill_color) {
            Ok(mask) => {
                self.mask_tex = Some(ui.ctx().load_texture(
                    "scratch_mask",
                    ImageData::Color(Arc::new(mask.to_color_image())),
                    TextureOptions::LINEAR,
                ));
                self.mask = Some(mask);
                self.tracker = Some(StrokeTracker::new(
                    self.config.stroke_width * scale,
                    self.config.completion_threshold,
                    self.config.sample_region,
                ));
            }
            Err(e) => {
                crate::log_err!("scratch card disabled: {}", e);
                self.defunct = true;
                return;
            }
        }

        if let Some(revealed) = self.revealed.take() {
            self.revealed_tex = Some(ui.ctx().load_texture(
                "scratch_revealed",
                ImageData::Color(Arc::new(revealed)),
                TextureOptions::LINEAR,
            ));
        }
    }

    /// Upload the current mask state so this stroke is visible immediately.
    /// Mask and texture are created together in `ensure_initialized`, so
    /// either both exist or neither does.
    fn push_mask_texture(&mut self) {
        let (Some(mask), Some(tex)) = (&self.mask, &mut self.mask_tex) else {
            return;
        };
        tex.set(
            ImageData::Color(Arc::new(mask.to_color_image())),
            TextureOptions::LINEAR,
        );
    }
}
