//! Payload normalization: node deduplication and edge screening.

use std::collections::HashMap;

use log::{info, warn};

use super::types::{GraphEdge, GraphNode, MindmapPayload, RawEdge, RawNode};
use crate::error::Advisory;

/// Deduplicated node table plus the edge list of one payload.
///
/// Nodes keep the position of the first occurrence of their id and the values
/// of the last one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedGraph {
	nodes: Vec<GraphNode>,
	index: HashMap<String, usize>,
	edges: Vec<GraphEdge>,
	advisories: Vec<Advisory>,
}

impl NormalizedGraph {
	/// Nodes in first-seen order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Edges in input order, including ones whose endpoints do not resolve.
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn advisories(&self) -> &[Advisory] {
		&self.advisories
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).map(|&pos| &self.nodes[pos])
	}

	/// Layout position of a node id, if present.
	pub fn position(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Builds a [`NormalizedGraph`] from raw nodes and edges.
///
/// Repeated ids overwrite the earlier values in place. Nodes without an id are
/// skipped. Edges are kept in order; those with a missing or unknown endpoint
/// are reported as advisories, and structurally incomplete ones are dropped.
pub fn normalize(raw_nodes: &[RawNode], raw_edges: &[RawEdge]) -> NormalizedGraph {
	let mut graph = NormalizedGraph::default();

	for raw in raw_nodes {
		let Some(id) = raw.id.as_ref() else {
			warn!("mindmap: skipping node without id (label {:?})", raw.label);
			continue;
		};
		let node = GraphNode {
			id: id.clone(),
			label: raw.label.clone(),
			details: raw.details.clone(),
			code: raw.code.clone(),
		};
		match graph.index.get(id) {
			Some(&pos) => {
				let advisory = Advisory::DuplicateNodeId { id: id.clone() };
				warn!("mindmap: {}", advisory);
				graph.advisories.push(advisory);
				graph.nodes[pos] = node;
			}
			None => {
				graph.index.insert(id.clone(), graph.nodes.len());
				graph.nodes.push(node);
			}
		}
	}

	if raw_edges.is_empty() {
		info!("mindmap: payload has no edges, showing nodes only");
	}

	for raw in raw_edges {
		let resolves = |end: &Option<String>| end.as_deref().is_some_and(|id| graph.contains(id));
		if !resolves(&raw.from) || !resolves(&raw.to) {
			let advisory = Advisory::DanglingEdgeReference {
				from: raw.from.clone().unwrap_or_default(),
				to: raw.to.clone().unwrap_or_default(),
			};
			warn!("mindmap: {}", advisory);
			graph.advisories.push(advisory);
		}
		if let (Some(from), Some(to)) = (&raw.from, &raw.to) {
			graph.edges.push(GraphEdge {
				from: from.clone(),
				to: to.clone(),
			});
		}
	}

	graph
}

/// Normalizes a whole wire payload.
pub fn normalize_payload(payload: &MindmapPayload) -> NormalizedGraph {
	normalize(&payload.nodes, &payload.edges)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn last_duplicate_wins_values() {
		let nodes = [
			RawNode::new("a", "A", "first A", "x=1"),
			RawNode::new("a", "A2", "second A", "x=2"),
		];
		let edges = [RawEdge::new("a", "b")];
		let graph = normalize(&nodes, &edges);

		assert_eq!(graph.nodes().len(), 1);
		let a = graph.node("a").unwrap();
		assert_eq!(a.label, "A2");
		assert_eq!(a.details, "second A");
		assert_eq!(a.code, "x=2");
		assert_eq!(graph.edges().len(), 1);
		assert_eq!(
			graph.advisories(),
			&[
				Advisory::DuplicateNodeId { id: "a".into() },
				Advisory::DanglingEdgeReference { from: "a".into(), to: "b".into() },
			]
		);
	}

	#[test]
	fn duplicates_keep_first_seen_position() {
		let nodes = [
			RawNode::new("x", "X1", "", ""),
			RawNode::new("y", "Y", "", ""),
			RawNode::new("z", "Z", "", ""),
			RawNode::new("x", "X2", "", ""),
			RawNode::new("y", "Y2", "", ""),
			RawNode::new("x", "X3", "", ""),
		];
		let graph = normalize(&nodes, &[]);

		let order: Vec<(&str, &str)> = graph
			.nodes()
			.iter()
			.map(|n| (n.id.as_str(), n.label.as_str()))
			.collect();
		assert_eq!(order, vec![("x", "X3"), ("y", "Y2"), ("z", "Z")]);
		assert_eq!(graph.position("z"), Some(2));
		assert_eq!(graph.advisories().len(), 3);
	}

	#[test]
	fn nodes_without_id_are_skipped() {
		let nodes = [
			RawNode {
				label: "orphan".into(),
				..RawNode::default()
			},
			RawNode::new("kept", "Kept", "", ""),
		];
		let graph = normalize(&nodes, &[]);

		assert_eq!(graph.nodes().len(), 1);
		assert!(graph.contains("kept"));
	}

	#[test]
	fn incomplete_edges_are_dropped_and_reported() {
		let nodes = [RawNode::new("a", "A", "", "")];
		let edges = [
			RawEdge {
				from: Some("a".into()),
				to: None,
			},
			RawEdge::new("a", "a"),
		];
		let graph = normalize(&nodes, &edges);

		assert_eq!(graph.edges(), &[GraphEdge { from: "a".into(), to: "a".into() }]);
		assert_eq!(
			graph.advisories(),
			&[Advisory::DanglingEdgeReference { from: "a".into(), to: String::new() }]
		);
	}

	#[test]
	fn normalization_is_deterministic() {
		let payload: MindmapPayload = serde_json::from_str(
			r#"{"nodes": [
				{"id": "f", "label": "f", "details": "d", "code": "c"},
				{"id": "g", "label": "g"},
				{"id": "f", "label": "f2"}
			], "edges": [{"from_": "f", "to": "g"}, {"from_": "g", "to": "missing"}]}"#,
		)
		.unwrap();

		assert_eq!(normalize_payload(&payload), normalize_payload(&payload));
	}

	#[test]
	fn empty_payload_normalizes_to_empty_graph() {
		let graph = normalize(&[], &[]);

		assert!(graph.is_empty());
		assert!(graph.edges().is_empty());
		assert!(graph.advisories().is_empty());
	}
}
