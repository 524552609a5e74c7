//! Selection helpers: modifier-aware click selection and connectivity-based
//! traversal.
//!
//! Traversals are pure functions of (seed, nodes, links). They track visited
//! ids, so cycles in the link graph terminate.

use crate::types::*;
use std::collections::{HashMap, HashSet, VecDeque};

/// Applies a click on `id` to the current selection.
///
/// Without ctrl, clicking an already-selected node keeps the selection (so a
/// multi-selection can be dragged) and clicking anything else selects just
/// that node. With ctrl, the node is toggled in or out.
pub fn click_select(selection: &[NodeId], id: NodeId, ctrl: bool) -> Vec<NodeId> {
    let already = selection.contains(&id);
    match (already, ctrl) {
        (true, false) => selection.to_vec(),
        (true, true) => selection.iter().copied().filter(|n| *n != id).collect(),
        (false, true) => selection.iter().copied().chain([id]).collect(),
        (false, false) => vec![id],
    }
}

/// Seeds plus every node reachable from them by following links forward.
pub fn tree_select(seeds: &[NodeId], nodes: &[Node], links: &[Link]) -> Vec<NodeId> {
    let mut forward: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for link in links {
        forward.entry(link.from.node_id).or_default().push(link.to.node_id);
    }
    reachable(seeds, nodes, &forward)
}

/// Seeds plus their full connected components, ignoring link direction.
pub fn graph_select(seeds: &[NodeId], nodes: &[Node], links: &[Link]) -> Vec<NodeId> {
    let mut undirected: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for link in links {
        undirected.entry(link.from.node_id).or_default().push(link.to.node_id);
        undirected.entry(link.to.node_id).or_default().push(link.from.node_id);
    }
    reachable(seeds, nodes, &undirected)
}

// Breadth-first walk; ids are returned in discovery order without duplicates.
fn reachable(
    seeds: &[NodeId],
    nodes: &[Node],
    adjacency: &HashMap<NodeId, Vec<NodeId>>,
) -> Vec<NodeId> {
    let existing: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    for seed in seeds.iter().filter(|s| existing.contains(*s)) {
        if seen.insert(*seed) {
            queue.push_back(*seed);
        }
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for next in adjacency.get(&id).into_iter().flatten() {
                if existing.contains(next) && seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> (Vec<Node>, Vec<Link>) {
        let nodes: Vec<Node> = names
            .iter()
            .map(|n| {
                Node::new(*n, (0.0, 0.0))
                    .with_input(Port::new("in"))
                    .with_output(Port::new("out"))
            })
            .collect();
        let links = nodes
            .windows(2)
            .map(|w| {
                Link::new(
                    PortRef::new(w[0].id, w[0].outputs[0].id),
                    PortRef::new(w[1].id, w[1].inputs[0].id),
                )
            })
            .collect();
        (nodes, links)
    }

    fn as_set(ids: Vec<NodeId>) -> HashSet<NodeId> {
        ids.into_iter().collect()
    }

    #[test]
    fn click_without_ctrl_replaces_unless_already_selected() {
        let (a, b) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        assert_eq!(click_select(&[a], b, false), vec![b]);
        assert_eq!(click_select(&[a, b], b, false), vec![a, b]);
    }

    #[test]
    fn click_with_ctrl_toggles() {
        let (a, b) = (uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
        assert_eq!(click_select(&[a], b, true), vec![a, b]);
        assert_eq!(click_select(&[a, b], a, true), vec![b]);
    }

    #[test]
    fn tree_select_follows_outbound_only() {
        let (nodes, links) = chain(&["a", "b", "c"]);
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();

        assert_eq!(tree_select(&[ids[1]], &nodes, &links), vec![ids[1], ids[2]]);
        assert_eq!(tree_select(&[ids[0]], &nodes, &links), ids);
    }

    #[test]
    fn graph_select_walks_both_directions() {
        let (mut nodes, links) = chain(&["a", "b", "c"]);
        let loner = Node::new("loner", (0.0, 0.0));
        let loner_id = loner.id;
        nodes.push(loner);

        let selected = as_set(graph_select(&[nodes[2].id], &nodes, &links));
        assert_eq!(selected.len(), 3);
        assert!(!selected.contains(&loner_id));
    }

    #[test]
    fn traversal_terminates_on_cycles() {
        let (nodes, mut links) = chain(&["a", "b", "c"]);
        links.push(Link::new(
            PortRef::new(nodes[2].id, nodes[2].outputs[0].id),
            PortRef::new(nodes[0].id, nodes[0].inputs[0].id),
        ));
        let expected: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();

        assert_eq!(as_set(graph_select(&[nodes[0].id], &nodes, &links)), expected);
        assert_eq!(as_set(tree_select(&[nodes[1].id], &nodes, &links)), expected);
        assert_eq!(graph_select(&[nodes[0].id], &nodes, &links).len(), 3);
    }

    #[test]
    fn union_across_seeds_is_deduplicated() {
        let (nodes, links) = chain(&["a", "b", "c"]);
        let seeds = [nodes[0].id, nodes[1].id, nodes[0].id];

        let result = tree_select(&seeds, &nodes, &links);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn unknown_seeds_are_ignored() {
        let (nodes, links) = chain(&["a"]);
        assert!(tree_select(&[uuid::Uuid::new_v4()], &nodes, &links).is_empty());
    }
}
