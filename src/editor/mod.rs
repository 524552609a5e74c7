//! Editor instance: one graph with its own viewport, history, interaction
//! state and host hooks.
//!
//! Every structural mutation follows the same protocol: push an undo snapshot,
//! apply the change, then settle derived state (selection flags, `invalid`
//! flags) and hand the new document to the host's serializer. Rejected
//! gestures leave everything untouched.

mod state;

pub use state::{ActionCategory, ActivePort, ContextAction, ContextItem, InteractionState, Modifiers};

use crate::config::EditorConfig;
use crate::constants::MAIN_TAB_NAME;
use crate::graph::Graph;
use crate::history::History;
use crate::hit_test::{pick, resolve_gesture, Gesture, PointerEvent, PointerPhase};
use crate::layout::{ForceLayout, LayoutStep};
use crate::links::{validate_connection, ConnectError};
use crate::render::{self, RenderPayload};
use crate::selection;
use crate::types::*;
use crate::viewport::{NodeDimensions, Viewport};
use egui::{Pos2, Vec2};
use std::fmt;

type Serializer = Box<dyn FnMut(&GraphDocument)>;
type PairValidator = Box<dyn Fn(&Node, &Node) -> bool>;

/// A single graph editor.
pub struct Editor {
    graph: Graph,
    viewport: Viewport,
    history: History,
    config: EditorConfig,
    surface: Vec2,
    interaction: InteractionState,
    serializer: Option<Serializer>,
    data_serializer: Option<Serializer>,
    validator: Option<PairValidator>,
    categories: Vec<ActionCategory>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("graph", &self.graph)
            .field("viewport", &self.viewport)
            .field("surface", &self.surface)
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Creates an editor with default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Creates an editor with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        let config = config.normalized();
        Self {
            graph: Graph::new(),
            viewport: Viewport::new(config.min_scale, config.max_scale),
            history: History::new(config.history_limit),
            config,
            surface: Vec2::ZERO,
            interaction: InteractionState::default(),
            serializer: None,
            data_serializer: None,
            validator: None,
            categories: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// The working graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current pan/zoom.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Undo/redo stacks.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Active configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Session-local interaction state.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Selected node ids.
    pub fn selection(&self) -> &[NodeId] {
        &self.interaction.selection
    }

    /// Current interaction mode.
    pub fn action(&self) -> Action {
        self.interaction.action
    }

    /// Returns true if there is a state to undo to.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there is a state to redo to.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The persisted `{ tabs, nodes, links }` shape of the current graph.
    pub fn document(&self) -> GraphDocument {
        self.graph.to_document()
    }

    /// Node box used for picking, culling and layout.
    pub fn dims(&self) -> NodeDimensions {
        NodeDimensions {
            width: self.config.node_width,
            height: self.config.node_height,
        }
    }

    /// Last known pointer position in world space.
    pub fn cursor_world(&self) -> Pos2 {
        self.viewport.to_world(self.interaction.cursor)
    }

    /// Visible nodes and links of the active tab, plus the link being dragged.
    pub fn render_payload(&self) -> RenderPayload {
        let mut payload = render::prepare(&self.graph, &self.viewport, self.surface, self.dims());
        payload.pending_link = self.interaction.active_port.map(|a| (a.origin, a.pointer));
        payload
    }

    // ---------------------------------------------------------------------
    // Host hooks and loading
    // ---------------------------------------------------------------------

    /// Registers the callback that receives the document after every
    /// structural change.
    pub fn set_serializer(&mut self, serializer: impl FnMut(&GraphDocument) + 'static) {
        self.serializer = Some(Box::new(serializer));
    }

    /// Registers the callback for data-only updates: layout steps, required
    /// flags, undo and redo. Without one, those go to the serializer.
    pub fn set_data_serializer(&mut self, serializer: impl FnMut(&GraphDocument) + 'static) {
        self.data_serializer = Some(Box::new(serializer));
    }

    /// Replaces the host's context menu categories, shown after the node
    /// category.
    pub fn set_categories(&mut self, categories: Vec<ActionCategory>) {
        self.categories = categories;
    }

    /// Registers a pairwise validator and re-validates the graph.
    pub fn set_validator(&mut self, validator: impl Fn(&Node, &Node) -> bool + 'static) {
        self.validator = Some(Box::new(validator));
        self.validate_graph();
    }

    /// Replaces the graph with a persisted document.
    ///
    /// An empty tab list keeps the current tabs. History, selection and any
    /// gesture in progress are discarded.
    pub fn load_document(&mut self, mut doc: GraphDocument) {
        if doc.tabs.is_empty() {
            doc.tabs = self.graph.tabs().to_vec();
        }
        let active = self.graph.active_tab().to_string();

        self.graph = Graph::from_document(doc);
        self.graph.select_tab(&active);
        self.history.clear();
        self.interaction = InteractionState {
            modifiers: self.interaction.modifiers,
            cursor: self.interaction.cursor,
            ..Default::default()
        };
        self.graph.sync_selection(&[]);
        self.validate_graph();
        log::debug!(
            "loaded {} nodes and {} links on {} tabs",
            self.graph.nodes().len(),
            self.graph.links().len(),
            self.graph.tabs().len()
        );
    }

    /// Runs the host's load callback and loads whatever it returns.
    ///
    /// # Returns
    ///
    /// `true` if the callback produced a document.
    pub fn load_nodes(&mut self, loader: impl FnOnce() -> Option<GraphDocument>) -> bool {
        match loader() {
            Some(doc) => {
                self.load_document(doc);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Viewport
    // ---------------------------------------------------------------------

    /// Zooms by `delta` around a screen-space anchor. See [`Viewport::zoom_at`].
    pub fn zoom_at(&mut self, delta: f32, anchor: Pos2) -> f32 {
        self.viewport.zoom_at(delta, anchor)
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    /// Sets the pan offset.
    pub fn pan_to(&mut self, pan: Vec2) {
        self.viewport.pan_to(pan);
    }

    /// Records the drawing surface size in pixels.
    pub fn resize(&mut self, surface: Vec2) {
        self.surface = surface;
    }

    // ---------------------------------------------------------------------
    // Pointer, keyboard and mode
    // ---------------------------------------------------------------------

    /// Records the pointer position (screen) and drags the pending link along.
    pub fn set_cursor(&mut self, screen: Pos2) {
        self.interaction.cursor = screen;
        self.drag_connector(screen);
    }

    /// Moves the dangling end of the link being dragged.
    ///
    /// # Returns
    ///
    /// `false` if no link drag is in progress.
    pub fn drag_connector(&mut self, screen: Pos2) -> bool {
        match self.interaction.active_port.as_mut() {
            Some(active) => {
                active.pointer = self.viewport.to_world(screen);
                true
            }
            None => false,
        }
    }

    /// Updates modifier keys.
    ///
    /// Pressing space remembers where the pointer was; releasing it spawns the
    /// hovered template there.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        let previous = self.interaction.modifiers;
        self.interaction.modifiers = modifiers;

        if modifiers.space && !previous.space {
            self.interaction.space_origin = Some(self.interaction.cursor);
            self.interaction.pending_template = None;
        } else if !modifiers.space && previous.space {
            let origin = self
                .interaction
                .space_origin
                .take()
                .unwrap_or(self.interaction.cursor);
            if let Some(template) = self.interaction.pending_template.take() {
                let world = self.viewport.to_world(origin);
                self.spawn_from_template(&template, world);
            }
        }
    }

    /// Reports the template under the pointer in the space menu.
    ///
    /// Ignored unless space is held.
    pub fn hover_template(&mut self, template: Option<Node>) {
        if self.interaction.modifiers.space {
            self.interaction.pending_template = template;
        }
    }

    /// Switches the interaction mode, e.g. to [`Action::Pan`] while the host
    /// drags the canvas.
    pub fn set_action(&mut self, action: Action) {
        self.interaction.transition(action);
    }

    /// Hit-tests a pointer event against the active tab and performs the
    /// resulting gesture.
    ///
    /// Picking is suspended while the context menu is open or space is held.
    pub fn cast_pick(&mut self, event: PointerEvent) -> Gesture {
        self.set_cursor(event.pos());
        if self.interaction.picking_suspended() {
            return Gesture::Nothing;
        }

        let world = self.viewport.to_world(event.pos());
        let target = pick(
            self.graph.active_tab_nodes(),
            world,
            self.dims(),
            self.config.hit_tolerance,
        );
        let gesture = resolve_gesture(target, &event, self.interaction.action);
        self.dispatch(gesture, &event, world);
        gesture
    }

    fn dispatch(&mut self, gesture: Gesture, event: &PointerEvent, world: Pos2) {
        let completes = matches!(gesture, Gesture::CompleteLink(..));
        if event.phase == PointerPhase::Up && !completes && self.interaction.active_port.take().is_some() {
            log::debug!("link drag abandoned");
            self.settle_action();
        }

        match gesture {
            Gesture::StartLinkDrag(port, side) => self.start_link_drag(port, side, world),
            Gesture::CompleteLink(port, _) => self.complete_link(port),
            Gesture::PressNode(id) => self.press_node(id),
            Gesture::ReleaseNode(_) => self.finish_move(),
            Gesture::ContextMenu(id) => self.open_context_menu(id, event.pos()),
            Gesture::GraphSelect(id) => {
                if !self.interaction.selection.contains(&id) {
                    self.interaction.selection = vec![id];
                }
                self.graph_select();
            }
            Gesture::DeselectAll => self.reset(),
            Gesture::Nothing => {}
        }
    }

    fn start_link_drag(&mut self, port: PortRef, side: PortSide, world: Pos2) {
        let Some(node) = self.graph.node(port.node_id) else {
            return;
        };
        let origin = match side {
            PortSide::Output => render::output_anchor(node, self.dims()),
            PortSide::Input => render::input_anchor(node),
        };
        self.interaction.active_port = Some(ActivePort {
            port,
            side,
            origin,
            pointer: world,
        });
        self.interaction.transition(Action::ConnectPort);
    }

    fn complete_link(&mut self, port: PortRef) {
        let Some(active) = self.interaction.active_port.take() else {
            self.finish_move();
            return;
        };
        // Rejections are logged by connect; the drag ends either way
        let _ = self.connect(active.port, port);
        self.reset();
    }

    fn press_node(&mut self, id: NodeId) {
        self.interaction.move_recorded = false;
        self.interaction.context_menu = None;
        if self.interaction.modifiers.alt && self.go_to_definition(id) {
            return;
        }
        let selection = selection::click_select(
            &self.interaction.selection,
            id,
            self.interaction.modifiers.ctrl,
        );
        self.set_selection(selection);
    }

    fn finish_move(&mut self) {
        let moved = std::mem::take(&mut self.interaction.move_recorded);
        self.settle_action();
        if moved {
            self.serialize();
        }
    }

    fn open_context_menu(&mut self, id: NodeId, screen: Pos2) {
        if !self.interaction.selection.contains(&id) {
            self.set_selection(vec![id]);
        }
        self.interaction.context_menu = Some(screen);
        self.interaction.transition(Action::SelectedNode);
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Replaces the selection.
    pub fn set_selection(&mut self, ids: Vec<NodeId>) {
        let graph = &self.graph;
        self.interaction.selection = ids.into_iter().filter(|id| graph.node(*id).is_some()).collect();
        self.interaction.renaming = match self.interaction.selection.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        self.graph.sync_selection(&self.interaction.selection);
        self.settle_action();
    }

    /// Applies a click on `id`, honoring the ctrl modifier.
    pub fn select_node(&mut self, id: NodeId) {
        let selection = selection::click_select(
            &self.interaction.selection,
            id,
            self.interaction.modifiers.ctrl,
        );
        self.set_selection(selection);
    }

    /// Extends the selection to every node downstream of it.
    pub fn tree_select(&mut self) {
        let ids = selection::tree_select(
            &self.interaction.selection,
            self.graph.nodes(),
            self.graph.links(),
        );
        self.set_selection(ids);
    }

    /// Extends the selection to the connected components it touches.
    pub fn graph_select(&mut self) {
        let ids = selection::graph_select(
            &self.interaction.selection,
            self.graph.nodes(),
            self.graph.links(),
        );
        self.set_selection(ids);
    }

    /// Clears selection, link drag and context menu, and returns to idle.
    pub fn reset(&mut self) {
        self.interaction.active_port = None;
        self.interaction.context_menu = None;
        self.interaction.move_recorded = false;
        self.interaction.selection.clear();
        self.interaction.renaming = None;
        self.graph.sync_selection(&[]);
        self.interaction.transition(Action::Nothing);
    }

    /// Centers the viewport on a node and selects it, switching tabs if needed.
    pub fn center_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.graph.node(id) else {
            return false;
        };
        let (position, tab) = (node.position(), node.tab.clone());
        self.graph.select_tab(&tab);
        self.viewport.center_on(position, self.surface);
        self.set_selection(vec![id]);
        true
    }

    /// Centers on the definition of an instance node.
    ///
    /// # Returns
    ///
    /// `false` if `id` is not an instance or its definition is gone.
    pub fn go_to_definition(&mut self, id: NodeId) -> bool {
        let definition = self
            .graph
            .node(id)
            .and_then(|n| n.clone_of)
            .filter(|def| self.graph.node(*def).is_some());
        match definition {
            Some(def) => self.center_node(def),
            None => false,
        }
    }

    /// Active-tab nodes whose name contains `query`, ignoring case.
    pub fn find_nodes(&self, query: &str) -> Vec<&Node> {
        let query = query.to_lowercase();
        self.graph
            .active_tab_nodes()
            .filter(|n| n.name.to_lowercase().contains(&query))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Adds a node at the pointer position on the active tab.
    ///
    /// The node gets fresh node and port ids and becomes the sole selection.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.add_node_at(node, self.cursor_world())
    }

    /// Adds a node at a world position.
    ///
    /// A node left on the main tab lands on the active tab; any other tab the
    /// caller set is kept and created if missing.
    pub fn add_node_at(&mut self, node: Node, world: Pos2) -> NodeId {
        let mut node = node.with_fresh_ids(world);
        if node.tab.is_empty() || node.tab == MAIN_TAB_NAME {
            node.tab = self.graph.active_tab().to_string();
        }
        self.place(node)
    }

    /// Creates a node from a template at `world`.
    ///
    /// If the template is a node of this graph the new node becomes an
    /// instance of it: `clone_of` points at the template and `kind` carries its
    /// name.
    pub fn spawn_from_template(&mut self, template: &Node, world: Pos2) -> NodeId {
        let mut node = template.with_fresh_ids(world);
        if self.graph.node(template.id).is_some() {
            node.clone_of = Some(template.id);
            node.kind = Some(template.name.clone());
        }
        node.tab = self.graph.active_tab().to_string();
        self.place(node)
    }

    fn place(&mut self, node: Node) -> NodeId {
        self.record();
        log::debug!("adding node {} ({}) on tab {}", node.id, node.name, node.tab);
        let id = self.graph.insert_node(node);
        self.set_selection(vec![id]);
        self.commit();
        id
    }

    /// Copies the selected nodes to the pointer position.
    ///
    /// Copies are independent nodes: fresh ids and no `clone_of` reference.
    /// Their relative arrangement is kept, anchored at the first selected node.
    ///
    /// # Returns
    ///
    /// The ids of the copies, which become the selection.
    pub fn duplicate_selection(&mut self) -> Vec<NodeId> {
        let originals: Vec<Node> = self
            .interaction
            .selection
            .iter()
            .filter_map(|id| self.graph.node(*id))
            .cloned()
            .collect();
        let Some(base) = originals.first().map(Node::position) else {
            return Vec::new();
        };
        let anchor = self.cursor_world();

        self.record();
        let copies: Vec<NodeId> = originals
            .iter()
            .map(|n| {
                let mut copy = n.with_fresh_ids(anchor + (n.position() - base));
                copy.clone_of = None;
                self.graph.insert_node(copy)
            })
            .collect();
        log::debug!("duplicated {} nodes", copies.len());
        self.set_selection(copies.clone());
        self.commit();
        copies
    }

    /// Deletes the selection, every instance of a selected node, and their
    /// links.
    ///
    /// # Returns
    ///
    /// The ids of every removed node.
    pub fn delete_selection(&mut self) -> Vec<NodeId> {
        if self.interaction.selection.is_empty() {
            return Vec::new();
        }
        self.record();
        let removed = self.graph.remove_nodes_cascading(&self.interaction.selection);
        log::debug!("deleted {} nodes", removed.len());
        self.reset();
        self.commit();
        removed
    }

    /// Removes every link touching the selection.
    ///
    /// # Returns
    ///
    /// The number of links removed.
    pub fn unlink_selection(&mut self) -> usize {
        let selection = &self.interaction.selection;
        let affected = self
            .graph
            .links()
            .iter()
            .any(|l| selection.iter().any(|id| l.touches(*id)));
        if !affected {
            return 0;
        }
        self.record();
        let removed = self.graph.remove_links_touching(&self.interaction.selection);
        log::debug!("unlinked {} links", removed);
        self.commit();
        removed
    }

    /// Sets or clears `required` on the selection.
    pub fn set_required(&mut self, required: bool) {
        if self.interaction.selection.is_empty() {
            return;
        }
        self.record();
        self.graph.set_required(&self.interaction.selection, required);
        self.settle();
        self.serialize_data();
    }

    /// Renames a node; instances of it get the new name as their `kind`.
    pub fn relabel_node(&mut self, id: NodeId, name: &str) -> bool {
        if self.graph.node(id).is_none() {
            return false;
        }
        self.record();
        self.graph.relabel(id, name);
        self.commit();
        true
    }

    /// Applies a host-driven property edit to one node.
    pub fn update_node(&mut self, id: NodeId, edit: impl FnOnce(&mut Node)) -> bool {
        if self.graph.node(id).is_none() {
            return false;
        }
        self.record();
        self.graph.update_node(id, edit);
        self.commit();
        true
    }

    /// Drags the selection by a screen-space delta.
    ///
    /// The first move of a drag gesture pushes one undo snapshot; the host is
    /// notified when the drag is released.
    pub fn move_selection(&mut self, delta: Vec2) {
        if self.interaction.selection.is_empty() {
            return;
        }
        if !self.interaction.move_recorded {
            self.record();
            self.interaction.move_recorded = true;
        }
        let world_delta = delta / self.viewport.scale();
        self.graph.move_nodes(&self.interaction.selection, world_delta);
        self.interaction.transition(Action::MoveNode);
    }

    /// Links two ports, given in either order.
    ///
    /// # Errors
    ///
    /// Returns the first link rule the pair breaks; the graph is unchanged.
    pub fn connect(&mut self, a: PortRef, b: PortRef) -> Result<Link, ConnectError> {
        let link = match validate_connection(&self.graph, a, b) {
            Ok(link) => link,
            Err(err) => {
                log::debug!("link rejected: {err}");
                return Err(err);
            }
        };
        self.record();
        self.graph.insert_link(link);
        log::debug!("linked {} -> {}", link.from.node_id, link.to.node_id);
        self.commit();
        Ok(link)
    }

    /// Recomputes every node's `invalid` flag.
    ///
    /// # Returns
    ///
    /// The ids of the invalid nodes.
    pub fn validate_graph(&mut self) -> Vec<NodeId> {
        self.graph.validate(self.validator.as_deref())
    }

    // ---------------------------------------------------------------------
    // Context menu
    // ---------------------------------------------------------------------

    /// Actions offered for the current selection; empty without a selection.
    pub fn context_actions(&self) -> Vec<ContextAction> {
        if self.interaction.selection.is_empty() {
            Vec::new()
        } else {
            ContextAction::ALL.to_vec()
        }
    }

    /// Full context menu: the node category first, then the host's categories.
    ///
    /// The node category holds the built-in actions plus, for a single
    /// selection, that node's own entries.
    pub fn context_menu(&self) -> Vec<ActionCategory> {
        let mut items: Vec<ContextItem> = self
            .context_actions()
            .into_iter()
            .map(ContextItem::Action)
            .collect();
        if let [only] = self.interaction.selection.as_slice() {
            if let Some(node) = self.graph.node(*only) {
                items.extend(node.items.iter().cloned().map(ContextItem::Custom));
            }
        }

        let mut categories = vec![ActionCategory {
            name: "node".to_string(),
            items,
        }];
        categories.extend(self.categories.iter().cloned());
        categories
    }

    /// Runs a context menu entry and closes the menu.
    ///
    /// # Returns
    ///
    /// The name of a host-defined entry, for the host to run.
    pub fn apply_context_item(&mut self, item: &ContextItem) -> Option<String> {
        match item {
            ContextItem::Action(action) => {
                self.apply_context_action(*action);
                None
            }
            ContextItem::Custom(name) => {
                self.close_context_menu();
                log::debug!("context entry {name} handed to host");
                Some(name.clone())
            }
        }
    }

    /// Runs a context menu action and closes the menu.
    pub fn apply_context_action(&mut self, action: ContextAction) {
        self.interaction.context_menu = None;
        match action {
            ContextAction::Delete => {
                self.delete_selection();
            }
            ContextAction::Unlink => {
                self.unlink_selection();
            }
            ContextAction::Duplicate => {
                self.duplicate_selection();
            }
            ContextAction::TreeSelect => self.tree_select(),
            ContextAction::GraphSelect => self.graph_select(),
            ContextAction::Optional => self.set_required(false),
            ContextAction::Required => self.set_required(true),
        }
    }

    /// Closes the context menu without doing anything.
    pub fn close_context_menu(&mut self) {
        self.interaction.context_menu = None;
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    /// Steps back one mutation. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.graph.snapshot()) else {
            return false;
        };
        self.graph.restore(previous);
        self.after_history_jump();
        true
    }

    /// Steps forward one mutation. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.graph.snapshot()) else {
            return false;
        };
        self.graph.restore(next);
        self.after_history_jump();
        true
    }

    fn after_history_jump(&mut self) {
        self.interaction.active_port = None;
        self.interaction.context_menu = None;
        self.interaction.move_recorded = false;
        self.interaction.layout_recorded = false;
        self.settle();
        self.serialize_data();
        self.settle_action();
    }

    // ---------------------------------------------------------------------
    // Tabs
    // ---------------------------------------------------------------------

    /// Adds an empty tab. Duplicate names are ignored.
    pub fn add_tab(&mut self, name: &str) -> bool {
        let added = self.graph.add_tab(name);
        if added {
            self.serialize();
        }
        added
    }

    /// Removes a tab with its nodes and their links.
    ///
    /// The last remaining tab cannot be removed.
    pub fn remove_tab(&mut self, name: &str) -> bool {
        let tabs = self.graph.tabs();
        if tabs.len() <= 1 || !tabs.iter().any(|t| t == name) {
            return false;
        }
        self.record();
        self.graph.remove_tab(name);
        self.commit();
        self.settle_action();
        true
    }

    /// Renames a tab and makes it active. Renaming onto an existing name is
    /// ignored.
    pub fn rename_tab(&mut self, name: &str, new_name: &str) -> bool {
        let tabs = self.graph.tabs();
        if !tabs.iter().any(|t| t == name) || tabs.iter().any(|t| t == new_name) {
            return false;
        }
        self.record();
        self.graph.rename_tab(name, new_name);
        self.commit();
        true
    }

    /// Switches to another tab and clears the selection.
    pub fn select_tab(&mut self, name: &str) -> bool {
        if !self.graph.select_tab(name) {
            return false;
        }
        self.reset();
        true
    }

    // ---------------------------------------------------------------------
    // Auto-layout
    // ---------------------------------------------------------------------

    /// Starts a force-directed layout over every node.
    ///
    /// Pull steps from the returned iterator and hand them to
    /// [`Editor::apply_layout_step`]; drop it to cancel. The first applied
    /// step of a run pushes one undo snapshot, so a run that applies nothing
    /// leaves history alone.
    pub fn auto_layout(&mut self) -> ForceLayout {
        self.interaction.layout_recorded = false;
        ForceLayout::new(
            self.graph.nodes(),
            self.graph.links(),
            self.config.layout,
            self.dims(),
        )
    }

    /// Moves nodes to the positions of one layout step.
    pub fn apply_layout_step(&mut self, step: &LayoutStep) {
        if !self.interaction.layout_recorded {
            self.record();
            self.interaction.layout_recorded = true;
        }
        self.graph.set_positions(step.positions.iter().copied());
        self.serialize_data();
    }

    /// Runs a layout to completion.
    ///
    /// # Returns
    ///
    /// The number of steps applied.
    pub fn run_layout(&mut self) -> usize {
        let mut steps = 0;
        for step in self.auto_layout() {
            self.apply_layout_step(&step);
            steps += 1;
        }
        steps
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn record(&mut self) {
        self.history.record(self.graph.snapshot());
        self.interaction.layout_recorded = false;
    }

    // Re-derives flags after a structural change and notifies the host.
    fn commit(&mut self) {
        self.settle();
        self.serialize();
    }

    fn settle(&mut self) {
        let graph = &self.graph;
        self.interaction.selection.retain(|id| graph.node(*id).is_some());
        if self.interaction.renaming.is_some_and(|id| graph.node(id).is_none()) {
            self.interaction.renaming = None;
        }
        self.graph.sync_selection(&self.interaction.selection);
        self.validate_graph();
    }

    fn settle_action(&mut self) {
        let next = if self.interaction.selection.is_empty() {
            Action::Nothing
        } else {
            Action::SelectedNode
        };
        self.interaction.transition(next);
    }

    fn serialize(&mut self) {
        if let Some(serializer) = self.serializer.as_mut() {
            let doc = self.graph.to_document();
            serializer(&doc);
        }
    }

    fn serialize_data(&mut self) {
        match self.data_serializer.as_mut() {
            Some(serializer) => {
                let doc = self.graph.to_document();
                serializer(&doc);
            }
            None => self.serialize(),
        }
    }
}
