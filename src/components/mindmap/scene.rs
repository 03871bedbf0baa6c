//! Engine input built from a normalized graph.

use super::normalize::NormalizedGraph;

/// A node as handed to a graph engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneNode {
	pub id: String,
	pub label: String,
	/// Hover text; the node details.
	pub tooltip: String,
}

/// A directed edge between two scene node positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneEdge {
	pub from: usize,
	pub to: usize,
}

impl SceneEdge {
	pub fn is_loop(&self) -> bool {
		self.from == self.to
	}
}

/// Everything an engine needs to draw one graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scene {
	pub nodes: Vec<SceneNode>,
	pub edges: Vec<SceneEdge>,
}

impl Scene {
	/// Resolves edge endpoints to node positions.
	///
	/// Edges with an endpoint missing from the graph are omitted; they were
	/// already reported during normalization.
	pub fn from_graph(graph: &NormalizedGraph) -> Self {
		let nodes = graph
			.nodes()
			.iter()
			.map(|node| SceneNode {
				id: node.id.clone(),
				label: node.label.clone(),
				tooltip: node.details.clone(),
			})
			.collect();
		let edges = graph
			.edges()
			.iter()
			.filter_map(|edge| {
				Some(SceneEdge {
					from: graph.position(&edge.from)?,
					to: graph.position(&edge.to)?,
				})
			})
			.collect();
		Self { nodes, edges }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::normalize::normalize;
	use crate::components::mindmap::types::{RawEdge, RawNode};

	#[test]
	fn dangling_edges_are_omitted() {
		let nodes = [RawNode::new("a", "A", "does a", ""), RawNode::new("b", "B", "", "")];
		let edges = [
			RawEdge::new("a", "b"),
			RawEdge::new("a", "ghost"),
			RawEdge::new("ghost", "b"),
			RawEdge::new("b", "b"),
		];
		let graph = normalize(&nodes, &edges);
		let scene = Scene::from_graph(&graph);

		assert_eq!(
			scene.edges,
			vec![SceneEdge { from: 0, to: 1 }, SceneEdge { from: 1, to: 1 }]
		);
		assert!(scene.edges.len() <= edges.len());
		assert!(scene.edges[1].is_loop());
		assert_eq!(scene.nodes[0].tooltip, "does a");
	}

	#[test]
	fn empty_graph_gives_empty_scene() {
		assert_eq!(Scene::from_graph(&normalize(&[], &[])), Scene::default());
	}
}
