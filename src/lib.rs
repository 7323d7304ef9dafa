//! Scratch-card widget for egui.
//!
//! A revealed image sits beneath an opaque overlay; dragging across the card
//! erases round strokes from the overlay's per-pixel alpha mask, and once a
//! sampled center region of the mask is sufficiently clear a one-shot
//! completion signal fires.
//!
//! Everything runs synchronously inside the egui frame: the mask is a plain
//! CPU raster owned by the widget, mutated only by erase strokes, and pushed
//! to the GPU as a texture after each processed movement. No threads, no
//! locks, no ambient platform state — widget size and device pixel scale are
//! explicit inputs.

pub mod config;
pub mod logger;
pub mod mask;
pub mod tracker;
pub mod widget;

pub use config::ScratchConfig;
pub use mask::{SampleRegion, ScratchError, ScratchMask};
pub use tracker::{StrokeOutcome, StrokeTracker};
pub use widget::{ScratchCard, ScratchCardResponse};
