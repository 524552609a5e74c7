//! # Flowgraph Core
//!
//! Headless core of an interactive node-graph editor. Nodes with typed input
//! and output ports live on named tabs and are wired together by directed
//! links. The host application feeds pointer events, modifier keys and surface
//! size in, and draws the render payload that comes out.
//!
//! ## Features
//! - Pan/zoom viewport with anchor-preserving zoom
//! - Cast-pick hit testing of node bodies and port bands
//! - Link validation (polarity, duplicates, 2-cycles, accepted node types)
//! - Bounded undo/redo over value snapshots
//! - Incremental force-directed auto-layout
//! - Tree and connected-component selection
//! - Viewport culling with resolved link anchors
//!
//! ## Example
//!
//! ```
//! use flowgraph_core::{Editor, Node, Port, PortRef};
//!
//! let mut editor = Editor::new();
//! let a = editor.add_node_at(Node::new("A", (0.0, 0.0)).with_output(Port::new("out")), egui::pos2(0.0, 0.0));
//! let b = editor.add_node_at(Node::new("B", (0.0, 0.0)).with_input(Port::new("in")), egui::pos2(300.0, 0.0));
//!
//! let out = editor.graph().node(a).unwrap().outputs[0].id;
//! let inp = editor.graph().node(b).unwrap().inputs[0].id;
//! editor.connect(PortRef::new(a, out), PortRef::new(b, inp)).unwrap();
//!
//! assert_eq!(editor.graph().links().len(), 1);
//! assert!(editor.undo());
//! assert!(editor.graph().links().is_empty());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod editor;
pub mod graph;
pub mod history;
pub mod hit_test;
pub mod layout;
pub mod links;
pub mod render;
pub mod samples;
pub mod selection;
mod types;
pub mod viewport;

// Re-export the types most hosts need
pub use config::{EditorConfig, LayoutConfig};
pub use editor::{ActionCategory, ContextAction, ContextItem, Editor, Modifiers};
pub use graph::Graph;
pub use hit_test::{Gesture, PointerButton, PointerEvent, PointerPhase};
pub use layout::{ForceLayout, LayoutStep};
pub use links::ConnectError;
pub use render::{RenderLink, RenderPayload};
pub use types::*;
pub use viewport::Viewport;
