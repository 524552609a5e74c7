//! Pan/zoom transform between screen space (pixels) and world space.
//!
//! `screen = world * scale + pan` and `world = (screen - pan) / scale`.

use crate::constants::{LABEL_CHAR_WIDTH, LABEL_PADDING, MAX_SCALE, MIN_SCALE};
use crate::types::Node;
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Fixed node box used by hit testing and culling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDimensions {
    /// Minimum width; labels may grow a node past it
    pub width: f32,
    /// Height of every node
    pub height: f32,
}

/// Label-dependent width of a node in world units.
pub fn node_width(node: &Node, dims: NodeDimensions) -> f32 {
    let label = node.name.chars().count() as f32 * LABEL_CHAR_WIDTH + LABEL_PADDING * 2.0;
    label.max(dims.width)
}

/// World-space rectangle covered by a node's body.
pub fn node_rect(node: &Node, dims: NodeDimensions) -> Rect {
    Rect::from_min_size(node.position(), egui::vec2(node_width(node, dims), dims.height))
}

/// Per-editor pan offset and scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pan: Vec2,
    scale: f32,
    min_scale: f32,
    max_scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_SCALE, MAX_SCALE)
    }
}

impl Viewport {
    /// Creates an identity viewport with the given zoom bounds.
    ///
    /// Swapped bounds are reordered; non-finite or non-positive bounds fall
    /// back to the defaults.
    pub fn new(min_scale: f32, max_scale: f32) -> Self {
        let usable = |s: f32| s.is_finite() && s > 0.0;
        let min_scale = if usable(min_scale) { min_scale } else { MIN_SCALE };
        let max_scale = if usable(max_scale) { max_scale } else { MAX_SCALE };
        let (min_scale, max_scale) = (min_scale.min(max_scale), min_scale.max(max_scale));
        Self {
            pan: Vec2::ZERO,
            scale: 1.0_f32.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
        }
    }

    /// Current pan offset in screen pixels.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Current scale factor (1.0 = 100%).
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Converts screen coordinates to world coordinates.
    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        (screen - self.pan) / self.scale
    }

    /// Converts world coordinates to screen coordinates.
    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        world * self.scale + self.pan
    }

    /// Adjusts the scale by `delta` while keeping the world point under
    /// `anchor` fixed on screen.
    ///
    /// The new scale is clamped to the configured bounds; if clamping leaves
    /// the scale unchanged nothing moves. Non-finite input is ignored.
    ///
    /// # Returns
    ///
    /// The scale after the change.
    pub fn zoom_at(&mut self, delta: f32, anchor: Pos2) -> f32 {
        if !delta.is_finite() || !anchor.is_finite() {
            return self.scale;
        }
        let old_scale = self.scale;
        let new_scale = (old_scale + delta).clamp(self.min_scale, self.max_scale);
        if (new_scale - old_scale).abs() <= f32::EPSILON {
            return old_scale;
        }

        let anchor = anchor.to_vec2();
        self.pan = anchor - (anchor - self.pan) * (new_scale / old_scale);
        self.scale = new_scale;
        new_scale
    }

    /// Translates the pan offset by a screen-space delta. Non-finite deltas
    /// are ignored.
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.pan += delta;
        }
    }

    /// Sets the pan offset directly. Non-finite offsets are ignored.
    pub fn pan_to(&mut self, pan: Vec2) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    /// World-space rectangle visible on a surface of `surface` pixels.
    pub fn visible_world_rect(&self, surface: Vec2) -> Rect {
        Rect::from_min_max(
            self.to_world(Pos2::ZERO),
            self.to_world(surface.to_pos2()),
        )
    }

    /// Pans so that `world` ends up at the center of the surface.
    pub fn center_on(&mut self, world: Pos2, surface: Vec2) {
        self.pan = surface / 2.0 - world.to_vec2() * self.scale;
    }
}
