//! Link validation: decides whether a proposed port-to-port connection is legal.
//!
//! Rules, checked in order:
//! 1. a port cannot be linked to itself
//! 2. one endpoint must be an output and the other an input
//! 3. the exact `{from, to}` pair must not exist yet
//! 4. no link may already run the other way between the same two nodes
//! 5. if the input port declares `accepted` entries, the source node must
//!    satisfy at least one of them
//!
//! Longer cycles (A -> B -> C -> A) are not rejected.

use crate::graph::Graph;
use crate::types::*;
use std::fmt;

/// Reasons a connection attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// Both endpoints are the same port
    SamePort,
    /// Both endpoints are inputs, or both are outputs
    SamePolarity,
    /// A link with the same endpoints already exists
    DuplicateLink,
    /// A link already runs in the opposite direction between the two nodes
    ReverseLink,
    /// The source node satisfies none of the input port's accepted entries
    NotAccepted,
    /// An endpoint does not exist in the graph
    PortNotFound(PortRef),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SamePort => write!(f, "Cannot link a port to itself"),
            Self::SamePolarity => write!(f, "Must connect an output to an input"),
            Self::DuplicateLink => write!(f, "Link already exists"),
            Self::ReverseLink => write!(f, "A link already runs the other way between these nodes"),
            Self::NotAccepted => write!(f, "Input port does not accept this node"),
            Self::PortNotFound(p) => write!(f, "Port {} on node {} not found", p.port_id, p.node_id),
        }
    }
}

impl std::error::Error for ConnectError {}

impl NodeConstraint {
    /// Returns true if at least one field is present and every present field
    /// equals the candidate's.
    pub fn matches(&self, node: &Node) -> bool {
        let fields = [
            (&self.node_type, &node.node_type),
            (&self.sub_type, &node.sub_type),
            (&self.kind, &node.kind),
        ];
        let present: Vec<_> = fields.iter().filter(|(want, _)| want.is_some()).collect();
        !present.is_empty() && present.iter().all(|(want, have)| want == have)
    }
}

impl AcceptedEntry {
    /// Returns true if this entry admits `node` as a link source.
    pub fn matches(&self, node: &Node) -> bool {
        self.node.as_ref().is_some_and(|c| c.matches(node))
    }
}

/// Returns true if `port` takes links coming from `source`.
///
/// An empty accepted list admits every node.
pub fn accepts(port: &Port, source: &Node) -> bool {
    port.accepted.is_empty() || port.accepted.iter().any(|entry| entry.matches(source))
}

/// Checks a proposed connection between two ports of `graph`.
///
/// The endpoints may be given in either order; the output side becomes the
/// link's `from`.
///
/// # Returns
///
/// The normalized link if every rule passes, otherwise the first rule broken.
pub fn validate_connection(graph: &Graph, a: PortRef, b: PortRef) -> Result<Link, ConnectError> {
    if a.port_id == b.port_id {
        return Err(ConnectError::SamePort);
    }
    let (_, side_a) = graph.port(a).ok_or(ConnectError::PortNotFound(a))?;
    let (_, side_b) = graph.port(b).ok_or(ConnectError::PortNotFound(b))?;
    if side_a == side_b {
        return Err(ConnectError::SamePolarity);
    }

    let link = match side_a {
        PortSide::Output => Link::new(a, b),
        PortSide::Input => Link::new(b, a),
    };

    if graph.links().contains(&link) {
        return Err(ConnectError::DuplicateLink);
    }
    if graph
        .links()
        .iter()
        .any(|l| l.from.node_id == link.to.node_id && l.to.node_id == link.from.node_id)
    {
        return Err(ConnectError::ReverseLink);
    }

    let (target, _) = graph
        .port(link.to)
        .ok_or(ConnectError::PortNotFound(link.to))?;
    let source = graph
        .node(link.from.node_id)
        .ok_or(ConnectError::PortNotFound(link.from))?;
    if !accepts(target, source) {
        return Err(ConnectError::NotAccepted);
    }

    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        graph: Graph,
        a_out: PortRef,
        a_in: PortRef,
        b_out: PortRef,
        b_in: PortRef,
    }

    fn fixture() -> Fixture {
        let mut graph = Graph::new();
        let a = Node::new("A", (0.0, 0.0))
            .with_input(Port::new("in"))
            .with_output(Port::new("out"));
        let b = Node::new("B", (200.0, 0.0))
            .with_input(Port::new("in"))
            .with_output(Port::new("out"));
        let a_out = PortRef::new(a.id, a.outputs[0].id);
        let a_in = PortRef::new(a.id, a.inputs[0].id);
        let b_out = PortRef::new(b.id, b.outputs[0].id);
        let b_in = PortRef::new(b.id, b.inputs[0].id);
        graph.insert_node(a);
        graph.insert_node(b);
        Fixture { graph, a_out, a_in, b_out, b_in }
    }

    #[test]
    fn rejects_self_loop() {
        let f = fixture();
        assert_eq!(validate_connection(&f.graph, f.a_out, f.a_out), Err(ConnectError::SamePort));
    }

    #[test]
    fn rejects_same_polarity() {
        let f = fixture();
        assert_eq!(validate_connection(&f.graph, f.a_out, f.b_out), Err(ConnectError::SamePolarity));
        assert_eq!(validate_connection(&f.graph, f.a_in, f.b_in), Err(ConnectError::SamePolarity));
    }

    #[test]
    fn normalizes_direction() {
        let f = fixture();
        let link = validate_connection(&f.graph, f.b_in, f.a_out).unwrap();
        assert_eq!(link, Link::new(f.a_out, f.b_in));
    }

    #[test]
    fn rejects_duplicates_and_reverse_links() {
        let mut f = fixture();
        let link = validate_connection(&f.graph, f.a_out, f.b_in).unwrap();
        f.graph.insert_link(link);

        assert_eq!(validate_connection(&f.graph, f.a_out, f.b_in), Err(ConnectError::DuplicateLink));
        assert_eq!(validate_connection(&f.graph, f.b_in, f.a_out), Err(ConnectError::DuplicateLink));
        assert_eq!(validate_connection(&f.graph, f.b_out, f.a_in), Err(ConnectError::ReverseLink));
        assert_eq!(f.graph.links().len(), 1);
    }

    #[test]
    fn unknown_port_is_reported() {
        let f = fixture();
        let ghost = PortRef::new(f.a_out.node_id, uuid::Uuid::new_v4());
        assert_eq!(
            validate_connection(&f.graph, ghost, f.b_in),
            Err(ConnectError::PortNotFound(ghost))
        );
    }

    #[test]
    fn constraint_fields_are_conjunctive() {
        let node = Node {
            node_type: Some("x".into()),
            sub_type: Some("s".into()),
            ..Node::new("N", (0.0, 0.0))
        };
        let both = NodeConstraint {
            node_type: Some("x".into()),
            sub_type: Some("s".into()),
            kind: None,
        };
        let type_ok_kind_wrong = NodeConstraint {
            node_type: Some("x".into()),
            kind: Some("k".into()),
            ..Default::default()
        };

        assert!(both.matches(&node));
        assert!(!type_ok_kind_wrong.matches(&node));
        assert!(!NodeConstraint::default().matches(&node));
    }

    #[test]
    fn accepted_entries_are_disjunctive() {
        let node = Node::new("N", (0.0, 0.0)).with_type("y");
        let port = Port::new("in")
            .accepting(NodeConstraint {
                node_type: Some("x".into()),
                ..Default::default()
            })
            .accepting(NodeConstraint {
                node_type: Some("y".into()),
                ..Default::default()
            });

        assert!(accepts(&port, &node));
        assert!(accepts(&Port::new("open"), &node));
        assert!(!accepts(&Port::new("empty entry").accepting(NodeConstraint::default()), &node));
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(ConnectError::DuplicateLink.to_string(), "Link already exists");
        assert!(ConnectError::NotAccepted.to_string().contains("accept"));
    }
}
