//! Force-directed auto-layout as a lazy, finite sequence of steps.
//!
//! Each call to [`Iterator::next`] runs one relaxation iteration and yields the
//! resulting positions. The host applies a step, re-renders, and pulls the next
//! one whenever it likes; dropping the iterator cancels the layout. The
//! sequence ends once the summed displacement of an iteration falls below the
//! convergence threshold or the iteration cap is reached.
//!
//! Physics per iteration:
//! - every node pair repels with `repulsion / d²` (doubled inside the minimum
//!   safe distance, `d` floored at [`LAYOUT_MIN_DISTANCE`])
//! - every linked pair attracts proportionally to `d - ideal`
//! - velocities are damped and integrated into positions

use crate::config::LayoutConfig;
use crate::constants::LAYOUT_MIN_DISTANCE;
use crate::types::{Link, Node, NodeId};
use crate::viewport::NodeDimensions;
use egui::{Pos2, Vec2};
use std::collections::HashMap;
use std::iter::FusedIterator;

// Golden angle in radians; spreads coincident pairs over distinct directions.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Node positions after one layout iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutStep {
    /// 1-based iteration counter
    pub iteration: usize,
    /// Summed distance moved by every node during this iteration
    pub total_displacement: f32,
    /// New top-left position of every laid-out node
    pub positions: Vec<(NodeId, Pos2)>,
}

/// Iterator over the steps of one force-directed layout run.
#[derive(Debug, Clone)]
pub struct ForceLayout {
    ids: Vec<NodeId>,
    positions: Vec<Pos2>,
    velocities: Vec<Vec2>,
    edges: Vec<(usize, usize)>,
    config: LayoutConfig,
    min_distance: f32,
    iteration: usize,
    finished: bool,
}

impl ForceLayout {
    /// Prepares a layout over `nodes`, attracted along `links`.
    ///
    /// Links are reduced to node pairs; links touching unknown nodes and links
    /// from a node to itself exert no force.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Nodes to lay out, with their starting positions
    /// * `links` - Links providing attraction
    /// * `config` - Physics parameters
    /// * `dims` - Node box, used to derive the minimum safe distance
    pub fn new(nodes: &[Node], links: &[Link], config: LayoutConfig, dims: NodeDimensions) -> Self {
        let index: HashMap<NodeId, usize> = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let edges = links
            .iter()
            .filter_map(|l| Some((*index.get(&l.from.node_id)?, *index.get(&l.to.node_id)?)))
            .filter(|(a, b)| a != b)
            .collect();

        // Diagonal of the node box plus a buffer on each side
        let min_distance = dims.width.hypot(dims.height) + config.spacing_buffer * 2.0;

        Self {
            ids: nodes.iter().map(|n| n.id).collect(),
            positions: nodes.iter().map(Node::position).collect(),
            velocities: vec![Vec2::ZERO; nodes.len()],
            edges,
            config,
            min_distance,
            iteration: 0,
            finished: nodes.is_empty(),
        }
    }

    /// Preferred length of a link.
    pub fn ideal_distance(&self) -> f32 {
        self.min_distance * 1.5
    }

    /// Number of iterations run so far.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    fn forces(&self) -> Vec<Vec2> {
        let mut forces = vec![Vec2::ZERO; self.positions.len()];
        let repulsion = self.config.repulsion_strength;

        for i in 0..self.positions.len() {
            for j in (i + 1)..self.positions.len() {
                let (direction, distance) = self.separation(i, j);
                let mut magnitude = repulsion / (distance * distance);
                if distance < self.min_distance {
                    magnitude *= 2.0;
                }
                forces[i] += direction * magnitude;
                forces[j] -= direction * magnitude;
            }
        }

        let ideal = self.ideal_distance();
        for &(from, to) in &self.edges {
            let (direction, distance) = self.separation(to, from);
            let pull = direction * (distance - ideal) * self.config.attraction_strength;
            forces[from] += pull;
            forces[to] -= pull;
        }
        forces
    }

    // Unit vector pointing from `b` to `a`, and the floored distance between them.
    fn separation(&self, a: usize, b: usize) -> (Vec2, f32) {
        let delta = self.positions[a] - self.positions[b];
        let length = delta.length();
        if length < LAYOUT_MIN_DISTANCE {
            let angle = (a.min(b) * 7 + a.max(b) * 13) as f32 * GOLDEN_ANGLE;
            let sign = if a < b { 1.0 } else { -1.0 };
            return (Vec2::angled(angle) * sign, LAYOUT_MIN_DISTANCE);
        }
        (delta / length, length)
    }
}

impl Iterator for ForceLayout {
    type Item = LayoutStep;

    fn next(&mut self) -> Option<LayoutStep> {
        if self.finished {
            return None;
        }

        let forces = self.forces();
        let damping = self.config.damping;
        let mut total_displacement = 0.0;
        for ((position, velocity), force) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(forces)
        {
            *velocity = (*velocity + force) * damping;
            *position += *velocity;
            total_displacement += velocity.length();
        }

        self.iteration += 1;
        if total_displacement < self.config.convergence_threshold
            || self.iteration >= self.config.max_iterations
        {
            log::debug!(
                "layout finished after {} iterations (displacement {:.3})",
                self.iteration,
                total_displacement
            );
            self.finished = true;
        } else {
            log::trace!("layout step {}: displacement {:.3}", self.iteration, total_displacement);
        }

        Some(LayoutStep {
            iteration: self.iteration,
            total_displacement,
            positions: self.ids.iter().copied().zip(self.positions.iter().copied()).collect(),
        })
    }
}

impl FusedIterator for ForceLayout {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, PortRef};

    const DIMS: NodeDimensions = NodeDimensions {
        width: 100.0,
        height: 70.0,
    };

    fn linked(a_pos: (f32, f32), b_pos: (f32, f32)) -> (Vec<Node>, Vec<Link>) {
        let a = Node::new("A", a_pos).with_output(Port::new("out"));
        let b = Node::new("B", b_pos).with_input(Port::new("in"));
        let link = Link::new(
            PortRef::new(a.id, a.outputs[0].id),
            PortRef::new(b.id, b.inputs[0].id),
        );
        (vec![a, b], vec![link])
    }

    fn distance(step: &LayoutStep) -> f32 {
        (step.positions[0].1 - step.positions[1].1).length()
    }

    #[test]
    fn empty_graph_yields_nothing() {
        let mut layout = ForceLayout::new(&[], &[], LayoutConfig::default(), DIMS);
        assert!(layout.next().is_none());
    }

    #[test]
    fn sequence_is_finite_and_fused() {
        let config = LayoutConfig {
            max_iterations: 25,
            convergence_threshold: 0.0,
            ..Default::default()
        };
        let nodes: Vec<Node> = (0..4).map(|i| Node::new("n", (i as f32 * 10.0, 0.0))).collect();
        let mut layout = ForceLayout::new(&nodes, &[], config, DIMS);
        assert_eq!(layout.iterations(), 0);

        let steps: Vec<LayoutStep> = layout.by_ref().collect();
        assert_eq!(steps.len(), 25);
        assert_eq!(steps.last().unwrap().iteration, 25);
        assert!(layout.next().is_none());
        assert_eq!(layout.iterations(), 25);
    }

    #[test]
    fn lone_node_converges_immediately() {
        let node = Node::new("solo", (5.0, 5.0));
        let steps: Vec<LayoutStep> =
            ForceLayout::new(&[node], &[], LayoutConfig::default(), DIMS).collect();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].positions[0].1, egui::pos2(5.0, 5.0));
    }

    #[test]
    fn linked_pair_settles_near_ideal_length() {
        let (nodes, links) = linked((0.0, 0.0), (300.0, 0.0));
        let layout = ForceLayout::new(&nodes, &links, LayoutConfig::default(), DIMS);

        let last = layout.last().unwrap();
        let d = distance(&last);
        assert!(last.iteration < LayoutConfig::default().max_iterations);
        assert!((180.0..280.0).contains(&d), "settled at {d}");
    }

    #[test]
    fn coincident_nodes_are_separated_deterministically() {
        let a = Node::new("A", (0.0, 0.0));
        let b = Node::new("B", (0.0, 0.0));
        let nodes = vec![a, b];

        let first = ForceLayout::new(&nodes, &[], LayoutConfig::default(), DIMS).next().unwrap();
        let again = ForceLayout::new(&nodes, &[], LayoutConfig::default(), DIMS).next().unwrap();

        assert!(distance(&first) > 1.0);
        assert!(first.positions.iter().all(|(_, p)| p.x.is_finite() && p.y.is_finite()));
        assert_eq!(first, again);
    }

    #[test]
    fn links_to_unknown_nodes_are_ignored() {
        let (nodes, links) = linked((0.0, 0.0), (300.0, 0.0));
        let only_a = &nodes[..1];
        let steps: Vec<LayoutStep> =
            ForceLayout::new(only_a, &links, LayoutConfig::default(), DIMS).collect();
        assert_eq!(steps.len(), 1);
    }
}
