//! Viewport culling and link anchor resolution.
//!
//! Produces the data the host draws: the active tab's nodes that intersect the
//! visible world rectangle, and the links touching them with endpoints resolved
//! to node anchors. Links leave from the source node's right edge and enter at
//! the destination node's top-left anchor, independent of which port they use.

use crate::graph::Graph;
use crate::types::*;
use crate::viewport::{node_rect, node_width, NodeDimensions, Viewport};
use egui::{Pos2, Rect, Vec2};
use std::collections::HashMap;

/// A link ready to draw, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLink {
    /// The link itself
    pub link: Link,
    /// Output-side anchor on the source node
    pub start: Pos2,
    /// Input-side anchor on the destination node
    pub end: Pos2,
    /// Source node is marked required
    pub required: bool,
    /// Either endpoint is selected
    pub selected: bool,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPayload {
    /// Visible nodes of the active tab
    pub nodes: Vec<Node>,
    /// Links with at least one visible endpoint
    pub links: Vec<RenderLink>,
    /// Link currently being dragged: origin anchor and pointer position
    pub pending_link: Option<(Pos2, Pos2)>,
    /// World-space rectangle the payload was culled against
    pub visible: Rect,
}

/// Output-side anchor of a node: its right edge at the anchor's height.
pub fn output_anchor(node: &Node, dims: NodeDimensions) -> Pos2 {
    egui::pos2(node.x + node_width(node, dims), node.y)
}

/// Input-side anchor of a node: its top-left corner.
pub fn input_anchor(node: &Node) -> Pos2 {
    node.position()
}

/// Active-tab nodes whose box intersects `visible`.
pub fn nodes_in_rect<'a>(
    graph: &'a Graph,
    visible: Rect,
    dims: NodeDimensions,
) -> impl Iterator<Item = &'a Node> {
    graph
        .active_tab_nodes()
        .filter(move |n| node_rect(n, dims).intersects(visible))
}

/// Culls the graph against the viewport and resolves link endpoints.
///
/// # Arguments
///
/// * `graph` - Graph to draw
/// * `viewport` - Current pan/zoom
/// * `surface` - Drawing surface size in pixels
/// * `dims` - Node box dimensions
pub fn prepare(
    graph: &Graph,
    viewport: &Viewport,
    surface: Vec2,
    dims: NodeDimensions,
) -> RenderPayload {
    let visible = viewport.visible_world_rect(surface);
    let nodes: Vec<Node> = nodes_in_rect(graph, visible, dims).cloned().collect();

    let on_tab: HashMap<NodeId, &Node> = graph.active_tab_nodes().map(|n| (n.id, n)).collect();
    let shown = |id: &NodeId| nodes.iter().any(|n| n.id == *id);

    let links = graph
        .links()
        .iter()
        .filter(|l| shown(&l.from.node_id) || shown(&l.to.node_id))
        .filter_map(|l| {
            let from = on_tab.get(&l.from.node_id)?;
            let to = on_tab.get(&l.to.node_id)?;
            Some(RenderLink {
                link: *l,
                start: output_anchor(from, dims),
                end: input_anchor(to),
                required: from.required,
                selected: from.selected || to.selected,
            })
        })
        .collect();

    RenderPayload {
        nodes,
        links,
        pending_link: None,
        visible,
    }
}
