//! Cast-pick: maps a pointer position to the graph entity under it and the
//! gesture that position implies.
//!
//! Hit boxes are anchored at a node's top-left corner and are three node
//! widths wide so the output stub to the right of the body is covered. Within
//! a node, a band of `tolerance` around the right edge selects the first
//! output port and a band at the left edge selects the first input port.

use crate::constants::HIT_BOX_WIDTH_FACTOR;
use crate::types::*;
use crate::viewport::{node_width, NodeDimensions};
use egui::Pos2;
use serde::{Deserialize, Serialize};

/// Mouse button that produced a pointer event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PointerButton {
    /// Usually the left button
    Primary,
    /// Usually the wheel button
    Middle,
    /// Usually the right button
    Secondary,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button pressed
    Down,
    /// Button released
    Up,
    /// Second click of a double click
    DoubleClick,
}

/// Normalized pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PointerEvent {
    /// Screen-space x
    pub x: f32,
    /// Screen-space y
    pub y: f32,
    /// Button involved
    pub button: PointerButton,
    /// Press, release or double click
    pub phase: PointerPhase,
}

impl PointerEvent {
    /// Creates a pointer event.
    pub fn new(pos: Pos2, button: PointerButton, phase: PointerPhase) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            button,
            phase,
        }
    }

    /// Screen position as a point.
    pub fn pos(&self) -> Pos2 {
        egui::pos2(self.x, self.y)
    }
}

/// Entity under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The node's body
    Body(NodeId),
    /// The node's first input port
    Input(PortRef),
    /// The node's first output port
    Output(PortRef),
}

impl HitTarget {
    /// Node the target belongs to.
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::Body(id) => *id,
            Self::Input(p) | Self::Output(p) => p.node_id,
        }
    }
}

/// Gesture implied by a pointer event over a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Start dragging a link out of a port
    StartLinkDrag(PortRef, PortSide),
    /// Release over a port; completes a link drag if one is active
    CompleteLink(PortRef, PortSide),
    /// Press on a node body: select and start moving
    PressNode(NodeId),
    /// Release on a node body: finish moving
    ReleaseNode(NodeId),
    /// Secondary release on a node: open its context menu
    ContextMenu(NodeId),
    /// Double click on a node: select its connected component
    GraphSelect(NodeId),
    /// Click on empty canvas
    DeselectAll,
    /// Nothing to do
    Nothing,
}

/// Finds the entity under `world` among `nodes`.
///
/// Nodes are visited in iteration order. A port band hit returns immediately;
/// otherwise the body whose anchor is closest (in both axes) wins.
///
/// # Arguments
///
/// * `nodes` - Candidate nodes, usually the active tab
/// * `world` - Pointer position in world space
/// * `dims` - Node box dimensions
/// * `tolerance` - Port band half-width in world units
pub fn pick<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    world: Pos2,
    dims: NodeDimensions,
    tolerance: f32,
) -> Option<HitTarget> {
    let hit_width = dims.width * HIT_BOX_WIDTH_FACTOR;
    let mut closest_x = hit_width;
    let mut closest_y = dims.height;
    let mut closest: Option<NodeId> = None;

    for node in nodes {
        let x_distance = world.x - node.x;
        let y_distance = world.y - node.y;
        if x_distance < -tolerance || y_distance < 0.0 {
            continue;
        }
        if y_distance >= dims.height
            || x_distance >= hit_width
            || x_distance >= closest_x
            || y_distance >= closest_y
        {
            continue;
        }

        let width = node_width(node, dims);
        if x_distance >= width + tolerance {
            continue;
        }
        if x_distance > width - tolerance {
            if let Some(port) = node.outputs.first() {
                return Some(HitTarget::Output(PortRef::new(node.id, port.id)));
            }
        }
        if x_distance < tolerance {
            if let Some(port) = node.inputs.first() {
                return Some(HitTarget::Input(PortRef::new(node.id, port.id)));
            }
        }
        closest_x = x_distance;
        closest_y = y_distance;
        closest = Some(node.id);
    }

    closest.map(HitTarget::Body)
}

/// Maps a pointer event over `target` to a gesture.
///
/// Clicks that hit nothing deselect everything unless the canvas is being
/// panned. Buttons without a meaning on a node are ignored.
pub fn resolve_gesture(target: Option<HitTarget>, event: &PointerEvent, action: Action) -> Gesture {
    let gesture = match (target, event.phase) {
        (Some(HitTarget::Output(port)), PointerPhase::Down) => {
            Some(Gesture::StartLinkDrag(port, PortSide::Output))
        }
        (Some(HitTarget::Input(port)), PointerPhase::Down) => {
            Some(Gesture::StartLinkDrag(port, PortSide::Input))
        }
        (Some(HitTarget::Output(port)), PointerPhase::Up) => {
            Some(Gesture::CompleteLink(port, PortSide::Output))
        }
        (Some(HitTarget::Input(port)), PointerPhase::Up) => {
            Some(Gesture::CompleteLink(port, PortSide::Input))
        }
        (Some(target), phase) => match (event.button, phase) {
            (PointerButton::Primary, PointerPhase::DoubleClick) => {
                Some(Gesture::GraphSelect(target.node_id()))
            }
            (PointerButton::Primary, PointerPhase::Down) => Some(Gesture::PressNode(target.node_id())),
            (PointerButton::Primary, PointerPhase::Up) => Some(Gesture::ReleaseNode(target.node_id())),
            (PointerButton::Secondary, PointerPhase::Up) => {
                Some(Gesture::ContextMenu(target.node_id()))
            }
            _ => Some(Gesture::Nothing),
        },
        (None, _) => None,
    };

    gesture.unwrap_or(if action == Action::Pan {
        Gesture::Nothing
    } else {
        Gesture::DeselectAll
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: NodeDimensions = NodeDimensions {
        width: 100.0,
        height: 70.0,
    };
    const TOL: f32 = 10.0;

    fn full_node(x: f32, y: f32) -> Node {
        Node::new("n", (x, y))
            .with_input(Port::new("in"))
            .with_output(Port::new("out"))
    }

    #[test]
    fn body_hit_in_middle_of_node() {
        let node = full_node(0.0, 0.0);
        let hit = pick([&node], egui::pos2(50.0, 30.0), DIMS, TOL);
        assert_eq!(hit, Some(HitTarget::Body(node.id)));
    }

    #[test]
    fn edge_bands_pick_first_ports() {
        let node = full_node(0.0, 0.0);

        let right = pick([&node], egui::pos2(105.0, 30.0), DIMS, TOL);
        assert_eq!(right, Some(HitTarget::Output(PortRef::new(node.id, node.outputs[0].id))));

        let left = pick([&node], egui::pos2(-5.0, 30.0), DIMS, TOL);
        assert_eq!(left, Some(HitTarget::Input(PortRef::new(node.id, node.inputs[0].id))));
    }

    #[test]
    fn bands_without_ports_fall_back_to_body() {
        let node = Node::new("bare", (0.0, 0.0));
        assert_eq!(
            pick([&node], egui::pos2(2.0, 10.0), DIMS, TOL),
            Some(HitTarget::Body(node.id))
        );
    }

    #[test]
    fn misses_outside_hit_box() {
        let node = full_node(0.0, 0.0);
        assert_eq!(pick([&node], egui::pos2(50.0, -1.0), DIMS, TOL), None);
        assert_eq!(pick([&node], egui::pos2(-11.0, 10.0), DIMS, TOL), None);
        assert_eq!(pick([&node], egui::pos2(50.0, 70.0), DIMS, TOL), None);
        assert_eq!(pick([&node], egui::pos2(150.0, 10.0), DIMS, TOL), None);
    }

    #[test]
    fn closest_anchor_wins_when_boxes_overlap() {
        let far = full_node(0.0, 0.0);
        let near = full_node(30.0, 20.0);
        let hit = pick([&far, &near], egui::pos2(60.0, 40.0), DIMS, TOL);
        assert_eq!(hit, Some(HitTarget::Body(near.id)));

        // Iteration order does not matter for bodies
        let hit = pick([&near, &far], egui::pos2(60.0, 40.0), DIMS, TOL);
        assert_eq!(hit, Some(HitTarget::Body(near.id)));
    }

    #[test]
    fn gestures_for_ports() {
        let node = full_node(0.0, 0.0);
        let out = PortRef::new(node.id, node.outputs[0].id);
        let down = PointerEvent::new(egui::pos2(0.0, 0.0), PointerButton::Primary, PointerPhase::Down);
        let up = PointerEvent { phase: PointerPhase::Up, ..down };
        let dbl = PointerEvent { phase: PointerPhase::DoubleClick, ..down };

        assert_eq!(
            resolve_gesture(Some(HitTarget::Output(out)), &down, Action::Nothing),
            Gesture::StartLinkDrag(out, PortSide::Output)
        );
        assert_eq!(
            resolve_gesture(Some(HitTarget::Output(out)), &up, Action::ConnectPort),
            Gesture::CompleteLink(out, PortSide::Output)
        );
        assert_eq!(
            resolve_gesture(Some(HitTarget::Output(out)), &dbl, Action::Nothing),
            Gesture::GraphSelect(node.id)
        );
    }

    #[test]
    fn gestures_for_bodies_and_empty_canvas() {
        let id = uuid::Uuid::new_v4();
        let at = egui::pos2(0.0, 0.0);
        let ev = |button, phase| PointerEvent::new(at, button, phase);
        let body = Some(HitTarget::Body(id));

        assert_eq!(
            resolve_gesture(body, &ev(PointerButton::Primary, PointerPhase::Down), Action::Nothing),
            Gesture::PressNode(id)
        );
        assert_eq!(
            resolve_gesture(body, &ev(PointerButton::Primary, PointerPhase::Up), Action::MoveNode),
            Gesture::ReleaseNode(id)
        );
        assert_eq!(
            resolve_gesture(body, &ev(PointerButton::Secondary, PointerPhase::Up), Action::Nothing),
            Gesture::ContextMenu(id)
        );
        assert_eq!(
            resolve_gesture(body, &ev(PointerButton::Secondary, PointerPhase::Down), Action::Nothing),
            Gesture::Nothing
        );
        assert_eq!(
            resolve_gesture(None, &ev(PointerButton::Primary, PointerPhase::Down), Action::Nothing),
            Gesture::DeselectAll
        );
        assert_eq!(
            resolve_gesture(None, &ev(PointerButton::Primary, PointerPhase::Down), Action::Pan),
            Gesture::Nothing
        );
    }
}
