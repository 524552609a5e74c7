//! Interaction state structures.
//!
//! Everything here is session-local: none of it is part of a persisted
//! document, and none of it is captured by undo snapshots.

use crate::types::*;
use egui::Pos2;
use serde::{Deserialize, Serialize};

/// Modifier keys as reported by the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl toggles nodes in and out of the selection
    pub ctrl: bool,
    /// Alt-click on an instance jumps to its definition
    pub alt: bool,
    /// Space held opens the template menu and suspends picking
    pub space: bool,
}

/// A link being dragged out of a port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePort {
    /// Port the drag started from
    pub port: PortRef,
    /// Side of that port
    pub side: PortSide,
    /// World-space anchor the dragged link starts at
    pub origin: Pos2,
    /// World-space position of the dangling end
    pub pointer: Pos2,
}

/// Commands offered by the node context menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContextAction {
    /// Delete the selection and its instances
    Delete,
    /// Remove every link touching the selection
    Unlink,
    /// Copy the selection at the cursor
    Duplicate,
    /// Extend the selection downstream
    TreeSelect,
    /// Extend the selection to whole connected components
    GraphSelect,
    /// Clear the `required` flag
    Optional,
    /// Set the `required` flag
    Required,
}

impl ContextAction {
    /// Every action, in menu order.
    pub const ALL: [ContextAction; 7] = [
        Self::Delete,
        Self::Unlink,
        Self::Duplicate,
        Self::TreeSelect,
        Self::GraphSelect,
        Self::Optional,
        Self::Required,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Unlink => "unlink",
            Self::Duplicate => "duplicate",
            Self::TreeSelect => "treeSelect",
            Self::GraphSelect => "graphSelect",
            Self::Optional => "optional",
            Self::Required => "required",
        }
    }
}

/// One entry of a context menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContextItem {
    /// Built-in editor command
    Action(ContextAction),
    /// Host-defined command; the editor hands its name back when chosen
    Custom(String),
}

impl ContextItem {
    /// Menu label.
    pub fn label(&self) -> &str {
        match self {
            Self::Action(action) => action.label(),
            Self::Custom(name) => name,
        }
    }
}

/// Named group of context menu entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionCategory {
    /// Heading shown above the entries
    pub name: String,
    /// Entries in menu order
    pub items: Vec<ContextItem>,
}

impl ActionCategory {
    /// Creates a category of host-defined entries.
    pub fn custom(name: impl Into<String>, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().map(|i| ContextItem::Custom(i.into())).collect(),
        }
    }
}

/// Tracks selection, drags, menus and modifiers for one editor.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Global interaction mode
    pub action: Action,
    /// Selected node ids, in selection order
    pub selection: Vec<NodeId>,
    /// Link drag in progress
    pub active_port: Option<ActivePort>,
    /// Screen position of the open context menu
    pub context_menu: Option<Pos2>,
    /// Node whose label the host should open for editing
    pub renaming: Option<NodeId>,
    /// Current modifier keys
    pub modifiers: Modifiers,
    /// Template hovered in the space menu; spawned when space is released
    pub pending_template: Option<Node>,
    /// Last known pointer position (screen)
    pub cursor: Pos2,
    /// Pointer position (screen) at the moment space was pressed
    pub space_origin: Option<Pos2>,
    /// Whether the current drag already pushed its undo snapshot
    pub move_recorded: bool,
    /// Whether the current layout run already pushed its undo snapshot
    pub layout_recorded: bool,
}

impl InteractionState {
    /// Switches the interaction mode. Any mode change drops the pending
    /// template.
    pub fn transition(&mut self, action: Action) {
        if self.action != action {
            log::trace!("action {:?} -> {:?}", self.action, action);
            self.pending_template = None;
        }
        self.action = action;
    }

    /// Returns true while picking is suspended by a menu.
    pub fn picking_suspended(&self) -> bool {
        self.context_menu.is_some() || self.modifiers.space
    }
}
