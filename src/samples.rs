//! Built-in sample graphs.
//!
//! Used by the demo binary and as realistic fixtures in tests.

use crate::types::*;

/// Kinds of built-in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Source -> Transform -> Sink
    LinearPipeline,
    /// A router feeding two typed sinks, plus an instance of one of them
    Branching,
}

/// Metadata for a single sample.
pub struct SampleInfo {
    /// Stable identifier for the sample
    pub kind: SampleKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_samples() -> &'static [SampleInfo] {
    const SAMPLES: &[SampleInfo] = &[
        SampleInfo {
            kind: SampleKind::LinearPipeline,
            name: "Linear Pipeline",
        },
        SampleInfo {
            kind: SampleKind::Branching,
            name: "Branching with Instance",
        },
    ];
    SAMPLES
}

/// Builds the document for the given sample.
pub fn build_sample(kind: SampleKind) -> GraphDocument {
    match kind {
        SampleKind::LinearPipeline => build_linear_pipeline(),
        SampleKind::Branching => build_branching(),
    }
}

fn stage(name: &str, node_type: &str, position: (f32, f32)) -> Node {
    Node::new(name, position)
        .with_type(node_type)
        .with_input(Port::new("in"))
        .with_output(Port::new("out"))
}

fn wire(from: &Node, to: &Node) -> Link {
    Link::new(
        PortRef::new(from.id, from.outputs[0].id),
        PortRef::new(to.id, to.inputs[0].id),
    )
}

fn build_linear_pipeline() -> GraphDocument {
    let source = Node::new("Source", (100.0, 200.0))
        .with_type("source")
        .with_output(Port::new("out"));
    let transform = stage("Transform", "transform", (300.0, 200.0));
    let sink = Node::new("Sink", (500.0, 200.0)).with_type("sink").with_input(
        Port::new("in").accepting(NodeConstraint {
            node_type: Some("transform".into()),
            ..Default::default()
        }),
    );

    let links = vec![wire(&source, &transform), wire(&transform, &sink)];
    GraphDocument {
        nodes: vec![source, transform, sink],
        links,
        ..Default::default()
    }
}

fn build_branching() -> GraphDocument {
    let input = Node::new("Input", (100.0, 250.0))
        .with_type("source")
        .with_output(Port::new("out"));
    let router = stage("Router", "router", (300.0, 250.0));
    let even = stage("Even", "sink", (500.0, 150.0));
    let odd = stage("Odd", "sink", (500.0, 350.0));

    // Instance of "Even" living on a second tab
    let mut even_copy = even
        .with_fresh_ids(egui::pos2(100.0, 100.0))
        .on_tab("reuse");
    even_copy.clone_of = Some(even.id);
    even_copy.kind = Some(even.name.clone());

    let links = vec![wire(&input, &router), wire(&router, &even), wire(&router, &odd)];
    GraphDocument {
        tabs: vec!["main".into(), "reuse".into()],
        nodes: vec![input, router, even, odd, even_copy],
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn every_sample_loads_cleanly() {
        for info in all_samples() {
            let doc = build_sample(info.kind);
            let link_count = doc.links.len();
            let mut graph = Graph::from_document(doc);

            assert_eq!(graph.links().len(), link_count, "{}", info.name);
            assert!(graph.validate(None).is_empty(), "{}", info.name);
        }
    }

    #[test]
    fn branching_sample_has_an_instance_on_second_tab() {
        let doc = build_sample(SampleKind::Branching);
        let instance = doc.nodes.iter().find(|n| n.clone_of.is_some()).unwrap();

        assert_eq!(instance.tab, "reuse");
        assert_eq!(instance.kind.as_deref(), Some("Even"));
        assert!(doc.nodes.iter().any(|n| Some(n.id) == instance.clone_of));
    }
}
