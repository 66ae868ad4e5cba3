//! Graph functionality tests
//!
//! Tests for lineage graph building and the DOT, Mermaid and JSON renderers.
//! Rendered output is compared with inline insta snapshots.

use insta::assert_snapshot;
use ownergraph::graph::{EdgeKind, NodeState};
use ownergraph::{LineageGraph, NodeLabel, RenderFormat};

/// pod -> replicaset -> deployment
fn coredns_graph() -> LineageGraph {
    let mut graph = LineageGraph::new();
    let pod = graph.create_node(NodeLabel::new("pods", "v1", "coredns"));
    let rs = graph.create_node(NodeLabel::new("replicasets", "apps/v1", "coredns-abc"));
    let deploy = graph.create_node(NodeLabel::new("deployments", "apps/v1", "coredns"));
    graph.create_edge(pod, rs).unwrap();
    graph.create_edge(rs, deploy).unwrap();
    graph
}

#[test]
fn test_graph_creation() {
    let graph = LineageGraph::new();
    assert!(graph.nodes().is_empty());
    assert!(graph.edges().is_empty());
    assert!(graph.sinks().is_empty());
}

#[test]
fn test_create_node_is_idempotent() {
    let mut graph = LineageGraph::new();
    let first = graph.create_node(NodeLabel::new("pods", "v1", "web"));
    let second = graph.create_node(NodeLabel::new("pods", "v1", "web"));
    let other = graph.create_node(NodeLabel::new("pods", "v1", "api"));

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(graph.nodes().len(), 2);
}

#[test]
fn test_labels_differing_in_one_part_are_distinct() {
    let mut graph = LineageGraph::new();
    let a = graph.create_node(NodeLabel::new("widgets", "example.com/v1", "w"));
    let b = graph.create_node(NodeLabel::new("widgets", "example.com/v2", "w"));
    assert_ne!(a, b);
}

#[test]
fn test_create_edge() {
    let graph = coredns_graph();
    assert_eq!(graph.edges().len(), 2);
    assert!(graph.edges().iter().all(|e| e.kind == EdgeKind::Owner));

    let deploy = graph
        .node_by_label(&NodeLabel::new("deployments", "apps/v1", "coredns"))
        .unwrap();
    assert_eq!(graph.sinks(), vec![deploy]);
}

#[test]
fn test_create_edge_rejects_unknown_node() {
    let mut graph = LineageGraph::new();
    let pod = graph.create_node(NodeLabel::new("pods", "v1", "web"));
    let mut other = LineageGraph::new();
    other.create_node(NodeLabel::new("pods", "v1", "a"));
    let stray = other.create_node(NodeLabel::new("pods", "v1", "b"));

    assert!(graph.create_edge(pod, stray).is_err());
    assert!(graph.edges().is_empty());
}

#[test]
fn test_mark_unresolved() {
    let mut graph = LineageGraph::new();
    let job = graph.create_node(NodeLabel::new("Job", "batch/v1", "nightly"));
    graph.mark_unresolved(job, "no resource for kind Job");

    assert_eq!(
        graph.node(job).unwrap().state,
        NodeState::Unresolved("no resource for kind Job".to_string())
    );
}

#[test]
fn test_render_dot() {
    let dot = coredns_graph().render(RenderFormat::Dot, "lineage").unwrap();
    assert_snapshot!(dot, @r#"
    digraph "lineage" {
      "pods\nv1\ncoredns";
      "replicasets\napps/v1\ncoredns-abc";
      "deployments\napps/v1\ncoredns";
      "pods\nv1\ncoredns" -> "replicasets\napps/v1\ncoredns-abc";
      "replicasets\napps/v1\ncoredns-abc" -> "deployments\napps/v1\ncoredns";
    }
    "#);
}

#[test]
fn test_render_dot_single_node() {
    let mut graph = LineageGraph::new();
    graph.create_node(NodeLabel::new("pods", "v1", "standalone"));

    let dot = graph.render(RenderFormat::Dot, "g").unwrap();
    assert_eq!(dot, "digraph \"g\" {\n  \"pods\\nv1\\nstandalone\";\n}");
}

#[test]
fn test_render_dot_escapes_quotes() {
    let mut graph = LineageGraph::new();
    graph.create_node(NodeLabel::new("widgets", "example.com/v1", "say \"hi\""));

    let dot = graph.render(RenderFormat::Dot, "lineage").unwrap();
    assert!(dot.contains(r#""widgets\nexample.com/v1\nsay \"hi\"";"#));
}

#[test]
fn test_render_dot_marks_unresolved_and_cycles() {
    let mut graph = LineageGraph::new();
    let a = graph.create_node(NodeLabel::new("widgets", "example.com/v1", "a"));
    let b = graph.create_node(NodeLabel::new("widgets", "example.com/v1", "b"));
    let job = graph.create_node(NodeLabel::new("Job", "batch/v1", "nightly"));
    graph.create_edge(a, b).unwrap();
    graph.create_edge_of_kind(b, a, EdgeKind::Cycle).unwrap();
    graph.create_edge(a, job).unwrap();
    graph.mark_unresolved(job, "not found");

    let dot = graph.render(RenderFormat::Dot, "lineage").unwrap();
    assert_snapshot!(dot, @r#"
    digraph "lineage" {
      "widgets\nexample.com/v1\na";
      "widgets\nexample.com/v1\nb";
      "Job\nbatch/v1\nnightly" [style=dashed, tooltip="not found"];
      "widgets\nexample.com/v1\na" -> "widgets\nexample.com/v1\nb";
      "widgets\nexample.com/v1\nb" -> "widgets\nexample.com/v1\na" [style=dotted];
      "widgets\nexample.com/v1\na" -> "Job\nbatch/v1\nnightly";
    }
    "#);
}

#[test]
fn test_render_mermaid() {
    let mermaid = coredns_graph()
        .render(RenderFormat::Mermaid, "lineage")
        .unwrap();
    assert_snapshot!(mermaid, @r#"
    flowchart BT
        n0["pods<br/>v1<br/>coredns"]
        n1["replicasets<br/>apps/v1<br/>coredns-abc"]
        n2["deployments<br/>apps/v1<br/>coredns"]
        n0 --> n1
        n1 --> n2
    "#);
}

#[test]
fn test_render_mermaid_unresolved_class() {
    let mut graph = LineageGraph::new();
    let pod = graph.create_node(NodeLabel::new("pods", "v1", "web"));
    let job = graph.create_node(NodeLabel::new("Job", "batch/v1", "nightly"));
    graph.create_edge(pod, job).unwrap();
    graph.mark_unresolved(job, "not found");

    let mermaid = graph.render(RenderFormat::Mermaid, "lineage").unwrap();
    assert!(
        mermaid.ends_with("    classDef unresolved stroke-dasharray: 5 5\n    class n1 unresolved")
    );
}

#[test]
fn test_render_json() {
    let json = coredns_graph().render(RenderFormat::Json, "lineage").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "lineage");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(value["nodes"][1]["label"]["resource"], "replicasets");
    assert_eq!(value["nodes"][1]["label"]["apiVersion"], "apps/v1");
    assert_eq!(value["nodes"][0]["state"]["status"], "resolved");
    assert_eq!(value["edges"][0]["from"], 0);
    assert_eq!(value["edges"][0]["to"], 1);
}

#[test]
fn test_render_format_from_str() {
    assert_eq!("dot".parse::<RenderFormat>().unwrap(), RenderFormat::Dot);
    assert_eq!("Graphviz".parse::<RenderFormat>().unwrap(), RenderFormat::Dot);
    assert_eq!("mermaid".parse::<RenderFormat>().unwrap(), RenderFormat::Mermaid);
    assert!("svg".parse::<RenderFormat>().is_err());
}
