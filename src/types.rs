//! Core data types and structures for the graph engine.
//!
//! This module defines the fundamental data structures used throughout the crate,
//! including nodes, ports, links, history snapshots and the persisted document shape.

use crate::constants::MAIN_TAB_NAME;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for graph nodes.
pub type NodeId = Uuid;

/// Unique identifier for node ports.
pub type PortId = Uuid;

fn default_tab() -> String {
    MAIN_TAB_NAME.to_string()
}

/// Global interaction mode of an editor instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Action {
    /// Idle; nothing is being manipulated
    #[default]
    Nothing,
    /// The host is panning the canvas
    Pan,
    /// Selected nodes are being dragged
    MoveNode,
    /// One or more nodes are selected
    SelectedNode,
    /// A link is being dragged out of a port
    ConnectPort,
    /// The pointer left the drawing surface
    Left,
}

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PortSide {
    /// Incoming connection point, drawn on the left edge
    Input,
    /// Outgoing connection point, drawn on the right edge
    Output,
}

/// Field-wise restriction on the node feeding an input port.
///
/// Every present field must equal the corresponding field of the candidate node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeConstraint {
    /// Required node type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Required node sub-type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Required node kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One alternative in a port's `accepted` list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptedEntry {
    /// Constraint on the source node, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeConstraint>,
}

/// A typed connection point on a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Port {
    /// Unique identifier for this port
    pub id: PortId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Acceptance rules for links ending here; empty accepts anything
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted: Vec<AcceptedEntry>,
    /// Derived: whether any link touches this port
    #[serde(default)]
    pub connected: bool,
}

impl Port {
    /// Creates an unconstrained, unconnected port with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accepted: Vec::new(),
            connected: false,
        }
    }

    /// Adds an acceptance alternative to this port.
    pub fn accepting(mut self, constraint: NodeConstraint) -> Self {
        self.accepted.push(AcceptedEntry {
            node: Some(constraint),
        });
        self
    }
}

/// A placed graph vertex with position, ports, and metadata.
///
/// `(x, y)` is the top-left anchor of the node in world units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier for this node; never changes after creation
    pub id: NodeId,
    /// User-displayable label
    #[serde(default)]
    pub name: String,
    /// Free-form type tag used by port acceptance rules
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Free-form sub-type tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    /// Free-form kind tag; instances carry their definition's name here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// World-space x of the top-left corner
    pub x: f32,
    /// World-space y of the top-left corner
    pub y: f32,
    /// Input ports, in display order
    #[serde(default)]
    pub inputs: Vec<Port>,
    /// Output ports, in display order
    #[serde(default)]
    pub outputs: Vec<Port>,
    /// Tab (plane) this node is drawn on
    #[serde(default = "default_tab")]
    pub tab: String,
    /// Definition node this node is an instance of (weak reference)
    #[serde(rename = "clone", default, skip_serializing_if = "Option::is_none")]
    pub clone_of: Option<NodeId>,
    /// Marks the node as mandatory in the host's domain
    #[serde(default)]
    pub required: bool,
    /// Derived: part of the current selection
    #[serde(default)]
    pub selected: bool,
    /// Derived: dangling clone reference or rejected by the host validator
    #[serde(default)]
    pub invalid: bool,
    /// Extra context menu entries offered while this node alone is selected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

impl Node {
    /// Creates a new node on the main tab.
    ///
    /// # Arguments
    ///
    /// * `name` - The display label for the node
    /// * `position` - The (x, y) world position of the top-left corner
    ///
    /// # Returns
    ///
    /// A new `Node` with a unique ID and no ports.
    pub fn new(name: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            node_type: None,
            sub_type: None,
            kind: None,
            x: position.0,
            y: position.1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            tab: default_tab(),
            clone_of: None,
            required: false,
            selected: false,
            invalid: false,
            items: Vec::new(),
        }
    }

    /// Sets the type tag.
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Appends an input port.
    pub fn with_input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    /// Appends an output port.
    pub fn with_output(mut self, port: Port) -> Self {
        self.outputs.push(port);
        self
    }

    /// Adds a host-defined context menu entry.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Moves the node onto another tab.
    pub fn on_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = tab.into();
        self
    }

    /// Top-left corner as a point.
    pub fn position(&self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    /// Returns the port with the given id and the side it sits on.
    pub fn port(&self, port_id: PortId) -> Option<(&Port, PortSide)> {
        self.inputs
            .iter()
            .find(|p| p.id == port_id)
            .map(|p| (p, PortSide::Input))
            .or_else(|| {
                self.outputs
                    .iter()
                    .find(|p| p.id == port_id)
                    .map(|p| (p, PortSide::Output))
            })
    }

    /// Returns true if `port_id` belongs to this node.
    pub fn has_port(&self, port_id: PortId) -> bool {
        self.port(port_id).is_some()
    }

    /// Copies this node under fresh node and port ids.
    ///
    /// Derived flags are reset and the copy is placed at `position`. The
    /// `clone_of` reference is carried over unchanged; callers decide whether
    /// the copy is an independent node or an instance.
    pub fn with_fresh_ids(&self, position: egui::Pos2) -> Node {
        let fresh_port = |p: &Port| Port {
            id: Uuid::new_v4(),
            connected: false,
            ..p.clone()
        };
        Node {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            inputs: self.inputs.iter().map(fresh_port).collect(),
            outputs: self.outputs.iter().map(fresh_port).collect(),
            selected: false,
            invalid: false,
            ..self.clone()
        }
    }
}

/// Identity of one port: the owning node plus the port id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    /// Owning node
    pub node_id: NodeId,
    /// Port on that node
    pub port_id: PortId,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(node_id: NodeId, port_id: PortId) -> Self {
        Self { node_id, port_id }
    }
}

/// A directed edge between two ports. Identity is the endpoint pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Link {
    /// Output-side endpoint
    pub from: PortRef,
    /// Input-side endpoint
    pub to: PortRef,
}

impl Link {
    /// Creates a link between two ports.
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self { from, to }
    }

    /// Returns true if either endpoint sits on `node_id`.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.from.node_id == node_id || self.to.node_id == node_id
    }

    /// Returns true if either endpoint is `port_id`.
    pub fn touches_port(&self, port_id: PortId) -> bool {
        self.from.port_id == port_id || self.to.port_id == port_id
    }
}

/// Immutable point-in-time copy of the graph used for undo/redo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// All nodes at the time of the snapshot
    pub nodes: Vec<Node>,
    /// All links at the time of the snapshot
    pub links: Vec<Link>,
}

/// The persisted graph shape: `{ tabs, nodes, links }`.
///
/// Viewport and history are session-local and never part of a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    /// Tab names in display order
    #[serde(default)]
    pub tabs: Vec<String>,
    /// Every node on every tab
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Every link
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Default for GraphDocument {
    /// Creates an empty document with just the main tab.
    fn default() -> Self {
        Self {
            tabs: vec![default_tab()],
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl GraphDocument {
    /// Serialize the document to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
