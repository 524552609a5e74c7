//! Editor configuration.
//!
//! Every field is defaulted from [`crate::constants`], so a host can override
//! just the values it cares about from a partial JSON object.

use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Physics parameters for the force-directed layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Hard cap on iterations
    pub max_iterations: usize,
    /// Pairwise repulsion strength
    pub repulsion_strength: f32,
    /// Spring constant along links
    pub attraction_strength: f32,
    /// Velocity damping per iteration (0..1)
    pub damping: f32,
    /// Stop once summed displacement of one iteration drops below this
    pub convergence_threshold: f32,
    /// Extra space kept between node boxes
    pub spacing_buffer: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_iterations: LAYOUT_MAX_ITERATIONS,
            repulsion_strength: LAYOUT_REPULSION_STRENGTH,
            attraction_strength: LAYOUT_ATTRACTION_STRENGTH,
            damping: LAYOUT_DAMPING,
            convergence_threshold: LAYOUT_CONVERGENCE_THRESHOLD,
            spacing_buffer: LAYOUT_SPACING_BUFFER,
        }
    }
}

/// Tunables for one editor instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Lower zoom bound
    pub min_scale: f32,
    /// Upper zoom bound
    pub max_scale: f32,
    /// Port band width used by hit testing (world units)
    pub hit_tolerance: f32,
    /// Snapshots kept per history stack
    pub history_limit: usize,
    /// Minimum node width (world units)
    pub node_width: f32,
    /// Node height (world units)
    pub node_height: f32,
    /// Auto-layout physics
    pub layout: LayoutConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            hit_tolerance: HIT_TOLERANCE,
            history_limit: MAX_UNDO_HISTORY,
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            layout: LayoutConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parses a (possibly partial) JSON configuration and normalizes it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// Fixes values that would break engine invariants.
    ///
    /// Swapped zoom bounds are reordered and the history limit is at least one.
    pub fn normalized(mut self) -> Self {
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        if self.min_scale <= 0.0 {
            self.min_scale = f32::EPSILON;
        }
        self.history_limit = self.history_limit.max(1);
        self
    }
}
