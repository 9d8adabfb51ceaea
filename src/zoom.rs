//! Zoom factor and the zoom bands that drive tile residency
//!
//! Manages the zoom factor the viewer is displaying at, and maps a zoom
//! factor onto the granularity at which tiles are kept in memory.

use serde::{Deserialize, Serialize};

/// Zoom state for a document view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    /// Current zoom factor (1.0 = 100%)
    pub factor: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl Zoom {
    /// Zoom in rate multiplier per step - 10%
    pub const ZOOM_IN_RATE: f32 = 1.1;
    /// Zoom out rate divisor per step - 5%
    pub const ZOOM_OUT_RATE: f32 = 1.05;
    /// Minimum allowed zoom factor
    pub const MIN_SCALE: f32 = 0.1;
    /// Maximum allowed zoom factor
    pub const MAX_SCALE: f32 = 32.0;

    #[must_use]
    pub fn new(factor: f32) -> Self {
        Self {
            factor: Self::clamp_factor(factor),
        }
    }

    /// Returns the current zoom factor
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Zoom in by one step
    pub fn step_in(&mut self) {
        self.factor = Self::clamp_factor(self.factor * Self::ZOOM_IN_RATE);
    }

    /// Zoom out by one step
    pub fn step_out(&mut self) {
        self.factor = Self::clamp_factor(self.factor / Self::ZOOM_OUT_RATE);
    }

    /// Set an explicit factor, returning true if it changed
    pub fn set(&mut self, factor: f32) -> bool {
        let clamped = Self::clamp_factor(factor);
        if (self.factor - clamped).abs() > f32::EPSILON {
            self.factor = clamped;
            true
        } else {
            false
        }
    }

    /// Clamp factor to valid range, handling NaN/Inf
    #[must_use]
    pub fn clamp_factor(factor: f32) -> f32 {
        if !factor.is_finite() {
            1.0
        } else {
            factor.clamp(Self::MIN_SCALE, Self::MAX_SCALE)
        }
    }
}

/// Granularity at which tiles are kept resident
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomBand {
    /// Whole pages gate residency: cached or visible pages keep all tiles
    PageLevel,
    /// Cached pages keep all tiles, other pages keep only on-screen tiles
    TileLevel,
    /// Only on-screen tiles are kept
    VisibleOnly,
}

/// Zoom cut points between the residency bands.
///
/// These are tuning values, not physical constants. Each band is closed
/// at its lower bound: a zoom exactly equal to a threshold belongs to the
/// band above it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomBands {
    /// Zoom at which tile-level visibility starts to count
    pub tile_level_from: f32,
    /// Zoom at which page residency stops counting
    pub visible_only_from: f32,
}

impl ZoomBands {
    pub const DEFAULT_TILE_LEVEL_FROM: f32 = 1.5;
    pub const DEFAULT_VISIBLE_ONLY_FROM: f32 = 2.5;

    /// Band a zoom factor falls into
    #[must_use]
    pub fn band(&self, zoom: f32) -> ZoomBand {
        if zoom < self.tile_level_from {
            ZoomBand::PageLevel
        } else if zoom < self.visible_only_from {
            ZoomBand::TileLevel
        } else {
            ZoomBand::VisibleOnly
        }
    }

    /// True if both thresholds are finite and ordered
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.tile_level_from.is_finite()
            && self.visible_only_from.is_finite()
            && self.tile_level_from <= self.visible_only_from
    }
}

impl Default for ZoomBands {
    fn default() -> Self {
        Self {
            tile_level_from: Self::DEFAULT_TILE_LEVEL_FROM,
            visible_only_from: Self::DEFAULT_VISIBLE_ONLY_FROM,
        }
    }
}
