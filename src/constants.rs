//! Shared engine-wide constants.
//! Centralizes tweakable values used by hit testing, culling, history and layout.

// Node dimensions
/// Minimum node width in world units. Labels wider than this grow the node.
pub const NODE_WIDTH: f32 = 100.0;
/// Node height in world units.
pub const NODE_HEIGHT: f32 = 70.0;
/// Approximate advance of one label character in world units.
pub const LABEL_CHAR_WIDTH: f32 = 8.0;
/// Horizontal padding on each side of a node label.
pub const LABEL_PADDING: f32 = 12.0;

// Canvas interactions
/// Distance (world units) within which a pointer counts as being on a port band.
pub const HIT_TOLERANCE: f32 = 10.0;
/// Hit boxes extend this many node widths to the right to cover the output stub.
pub const HIT_BOX_WIDTH_FACTOR: f32 = 3.0;

// Viewport
/// Smallest allowed scale factor.
pub const MIN_SCALE: f32 = 0.25;
/// Largest allowed scale factor.
pub const MAX_SCALE: f32 = 5.0;

// Undo/redo
/// Maximum number of snapshots retained on each history stack.
pub const MAX_UNDO_HISTORY: usize = 50;

// Tabs
/// Name of the default plane every node belongs to unless told otherwise.
pub const MAIN_TAB_NAME: &str = "main";

// Force-directed layout
/// Hard cap on layout iterations.
pub const LAYOUT_MAX_ITERATIONS: usize = 500;
/// Pairwise repulsion strength.
pub const LAYOUT_REPULSION_STRENGTH: f32 = 50000.0;
/// Spring constant for linked node pairs.
pub const LAYOUT_ATTRACTION_STRENGTH: f32 = 0.08;
/// Velocity damping applied every iteration.
pub const LAYOUT_DAMPING: f32 = 0.85;
/// Extra space kept between nodes so links stay visible.
pub const LAYOUT_SPACING_BUFFER: f32 = 10.0;
/// Iteration stops once summed displacement falls below this.
pub const LAYOUT_CONVERGENCE_THRESHOLD: f32 = 0.5;
/// Distances are clamped to at least this to avoid singular forces.
pub const LAYOUT_MIN_DISTANCE: f32 = 1.0;
