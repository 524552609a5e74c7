//! Graph store: nodes, links and tabs.
//!
//! The store enforces structural invariants at mutation time: links only ever
//! reference ports that exist, port `connected` flags are recomputed after
//! every structural change, and exactly one existing tab is active.

use crate::constants::MAIN_TAB_NAME;
use crate::types::*;
use std::collections::HashSet;

/// The working graph of one editor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    tabs: Vec<String>,
    active_tab: String,
}

impl Default for Graph {
    /// Creates an empty graph with only the main tab.
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            tabs: vec![MAIN_TAB_NAME.to_string()],
            active_tab: MAIN_TAB_NAME.to_string(),
        }
    }
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a persisted document.
    ///
    /// An empty tab list falls back to the main tab. Tabs referenced by nodes
    /// but missing from the list are appended, and links whose endpoints do
    /// not exist are dropped.
    pub fn from_document(doc: GraphDocument) -> Self {
        let mut graph = Self::default();
        if !doc.tabs.is_empty() {
            graph.tabs = doc.tabs;
            graph.active_tab = graph.tabs[0].clone();
        }
        graph.nodes = doc.nodes;
        graph.links = doc.links;
        graph.adopt_missing_tabs();
        graph.prune_dangling_links();
        graph.refresh_connections();
        graph
    }

    /// Exports the persisted `{ tabs, nodes, links }` shape.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            tabs: self.tabs.clone(),
            nodes: self.nodes.clone(),
            links: self.links.clone(),
        }
    }

    /// All nodes, on every tab.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Tab names in display order.
    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    /// The tab currently shown.
    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    /// Nodes on the active tab, in insertion order.
    pub fn active_tab_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.tab == self.active_tab)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up a port and the side it sits on.
    pub fn port(&self, port: PortRef) -> Option<(&Port, PortSide)> {
        self.node(port.node_id)?.port(port.port_id)
    }

    /// Copies nodes and links for the history stacks.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            links: self.links.clone(),
        }
    }

    /// Replaces nodes and links with a stored snapshot.
    ///
    /// Tabs referenced by restored nodes are re-created if they were removed
    /// in the meantime.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.links = snapshot.links;
        self.adopt_missing_tabs();
        self.refresh_connections();
    }

    /// Appends a node. The id must be fresh.
    ///
    /// An unknown tab is added to the tab list. Port `connected` flags are
    /// recomputed, so whatever the node carried in is discarded.
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        self.adopt_missing_tabs();
        self.refresh_connections();
        id
    }

    /// Appends a link. Endpoints must already have been validated.
    pub fn insert_link(&mut self, link: Link) {
        self.links.push(link);
        self.refresh_connections();
    }

    /// Removes the given nodes plus every instance cloned from them, and all
    /// links touching any removed node.
    ///
    /// # Returns
    ///
    /// The ids of every node that was removed.
    pub fn remove_nodes_cascading(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        let seeds: HashSet<NodeId> = ids.iter().copied().collect();
        let doomed: HashSet<NodeId> = self
            .nodes
            .iter()
            .filter(|n| seeds.contains(&n.id) || n.clone_of.is_some_and(|c| seeds.contains(&c)))
            .map(|n| n.id)
            .collect();

        let removed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| doomed.contains(&n.id))
            .map(|n| n.id)
            .collect();
        self.nodes.retain(|n| !doomed.contains(&n.id));
        self.links
            .retain(|l| !doomed.contains(&l.from.node_id) && !doomed.contains(&l.to.node_id));
        self.refresh_connections();
        removed
    }

    /// Removes every link touching any of the given nodes.
    ///
    /// # Returns
    ///
    /// The number of links removed.
    pub fn remove_links_touching(&mut self, ids: &[NodeId]) -> usize {
        let before = self.links.len();
        self.links.retain(|l| !ids.iter().any(|id| l.touches(*id)));
        self.refresh_connections();
        before - self.links.len()
    }

    /// Translates the given nodes by a world-space delta.
    pub fn move_nodes(&mut self, ids: &[NodeId], delta: egui::Vec2) {
        for node in self.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
            node.x += delta.x;
            node.y += delta.y;
        }
    }

    /// Overwrites node positions, e.g. from an auto-layout step.
    pub fn set_positions(&mut self, positions: impl IntoIterator<Item = (NodeId, egui::Pos2)>) {
        for (id, pos) in positions {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
                node.x = pos.x;
                node.y = pos.y;
            }
        }
    }

    /// Renames a node and writes the new name into the `kind` of every
    /// instance of it.
    ///
    /// # Returns
    ///
    /// `false` if the node doesn't exist.
    pub fn relabel(&mut self, id: NodeId, name: &str) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        for node in &mut self.nodes {
            if node.id == id {
                node.name = name.to_string();
            } else if node.clone_of == Some(id) {
                node.kind = Some(name.to_string());
            }
        }
        true
    }

    /// Applies an arbitrary edit to one node. The node id cannot be changed.
    ///
    /// Ports removed by the edit take their links with them, and a tab the
    /// node moves onto is added to the tab list.
    pub fn update_node(&mut self, id: NodeId, edit: impl FnOnce(&mut Node)) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        edit(node);
        node.id = id;
        self.adopt_missing_tabs();
        self.prune_dangling_links();
        self.refresh_connections();
        true
    }

    /// Sets the `required` flag on the given nodes.
    pub fn set_required(&mut self, ids: &[NodeId], required: bool) {
        for node in self.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
            node.required = required;
        }
    }

    /// Mirrors the selection set into each node's `selected` flag.
    pub fn sync_selection(&mut self, selection: &[NodeId]) {
        for node in &mut self.nodes {
            node.selected = selection.contains(&node.id);
        }
    }

    /// Recomputes every port's `connected` flag from the link list.
    pub fn refresh_connections(&mut self) {
        let used: HashSet<PortId> = self
            .links
            .iter()
            .flat_map(|l| [l.from.port_id, l.to.port_id])
            .collect();
        for node in &mut self.nodes {
            for port in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
                port.connected = used.contains(&port.id);
            }
        }
    }

    /// Recomputes every node's `invalid` flag.
    ///
    /// A node is invalid if its clone reference dangles, or if `pair_ok`
    /// rejects it against any other node (both nodes of a rejected pair are
    /// flagged). Every pair is re-checked on each call.
    ///
    /// # Returns
    ///
    /// The ids of the invalid nodes, without duplicates.
    pub fn validate(&mut self, pair_ok: Option<&dyn Fn(&Node, &Node) -> bool>) -> Vec<NodeId> {
        let ids: HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        let mut invalid: Vec<NodeId> = Vec::new();
        let flag = |id: NodeId, invalid: &mut Vec<NodeId>| {
            if !invalid.contains(&id) {
                invalid.push(id);
            }
        };

        for node in &self.nodes {
            if node.clone_of.is_some_and(|c| !ids.contains(&c)) {
                log::warn!("node {} references missing definition", node.id);
                flag(node.id, &mut invalid);
            }
            if let Some(pair_ok) = pair_ok {
                for other in self.nodes.iter().filter(|o| o.id != node.id) {
                    if !pair_ok(node, other) {
                        flag(node.id, &mut invalid);
                        flag(other.id, &mut invalid);
                    }
                }
            }
        }

        for node in &mut self.nodes {
            node.invalid = invalid.contains(&node.id);
        }
        invalid
    }

    /// Adds a tab. Duplicate names are ignored.
    pub fn add_tab(&mut self, name: &str) -> bool {
        if self.tabs.iter().any(|t| t == name) {
            return false;
        }
        self.tabs.push(name.to_string());
        true
    }

    /// Removes a tab together with its nodes and their links.
    ///
    /// If the active tab is removed the first remaining tab becomes active.
    /// The last remaining tab cannot be removed.
    pub fn remove_tab(&mut self, name: &str) -> bool {
        if self.tabs.len() <= 1 || !self.tabs.iter().any(|t| t == name) {
            return false;
        }
        self.tabs.retain(|t| t != name);
        let doomed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.tab == name)
            .map(|n| n.id)
            .collect();
        self.nodes.retain(|n| n.tab != name);
        self.links.retain(|l| !doomed.iter().any(|id| l.touches(*id)));
        if self.active_tab == name {
            self.active_tab = self.tabs[0].clone();
        }
        self.refresh_connections();
        true
    }

    /// Renames a tab, moves its nodes along, and makes it active.
    ///
    /// Renaming onto an existing name is ignored.
    pub fn rename_tab(&mut self, name: &str, new_name: &str) -> bool {
        if !self.tabs.iter().any(|t| t == name) || self.tabs.iter().any(|t| t == new_name) {
            return false;
        }
        for tab in self.tabs.iter_mut().filter(|t| *t == name) {
            *tab = new_name.to_string();
        }
        for node in self.nodes.iter_mut().filter(|n| n.tab == name) {
            node.tab = new_name.to_string();
        }
        self.active_tab = new_name.to_string();
        true
    }

    /// Makes an existing tab active.
    pub fn select_tab(&mut self, name: &str) -> bool {
        if !self.tabs.iter().any(|t| t == name) {
            return false;
        }
        self.active_tab = name.to_string();
        true
    }

    fn adopt_missing_tabs(&mut self) {
        for node in &self.nodes {
            if !self.tabs.contains(&node.tab) {
                self.tabs.push(node.tab.clone());
            }
        }
    }

    fn prune_dangling_links(&mut self) {
        let nodes = &self.nodes;
        let exists = |p: &PortRef| {
            nodes
                .iter()
                .any(|n| n.id == p.node_id && n.has_port(p.port_id))
        };
        self.links.retain(|l| exists(&l.from) && exists(&l.to));
    }
}
