//! Graph data structures: the wire payload and the cleaned node/edge records.

use serde::{Deserialize, Deserializer};

/// Node identifier as it appears on the wire: a JSON string or number.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
	Text(String),
	Number(serde_json::Number),
}

impl From<WireId> for String {
	fn from(id: WireId) -> Self {
		match id {
			WireId::Text(text) => text,
			WireId::Number(number) => number.to_string(),
		}
	}
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	Ok(Option::<WireId>::deserialize(deserializer)?.map(String::from))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A node as delivered by the analysis service, before deduplication.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawNode {
	/// Identifier; nodes without one are skipped.
	#[serde(default, deserialize_with = "optional_id")]
	pub id: Option<String>,
	/// Short display name.
	#[serde(default, deserialize_with = "lenient_text")]
	pub label: String,
	/// Description shown in the inspector and the hover tooltip.
	#[serde(default, deserialize_with = "lenient_text")]
	pub details: String,
	/// Source excerpt for this element.
	#[serde(default, deserialize_with = "lenient_text")]
	pub code: String,
}

impl RawNode {
	/// Builds a fully populated raw node.
	pub fn new(id: &str, label: &str, details: &str, code: &str) -> Self {
		Self {
			id: Some(id.to_string()),
			label: label.to_string(),
			details: details.to_string(),
			code: code.to_string(),
		}
	}
}

/// A directed edge as delivered by the analysis service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawEdge {
	/// Source node id, sent as `from_` on the wire.
	#[serde(rename = "from_", default, deserialize_with = "optional_id")]
	pub from: Option<String>,
	/// Target node id.
	#[serde(default, deserialize_with = "optional_id")]
	pub to: Option<String>,
}

impl RawEdge {
	/// Builds an edge with both endpoints set.
	pub fn new(from: &str, to: &str) -> Self {
		Self {
			from: Some(from.to_string()),
			to: Some(to.to_string()),
		}
	}
}

/// The complete `{nodes, edges}` payload of the mindmap endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MindmapPayload {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub edges: Vec<RawEdge>,
}

/// A node after normalization. Never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub details: String,
	pub code: String,
}

/// A directed `from -> to` reference between node ids.
///
/// Endpoints are not guaranteed to resolve to nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub from: String,
	pub to: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_wire_payload_with_from_underscore() {
		let json = r#"{
			"nodes": [{"id": "main.py:run", "label": "run", "details": "entry", "code": "def run(): pass"}],
			"edges": [{"from_": "main.py:run", "to": "main.py:helper"}]
		}"#;
		let payload: MindmapPayload = serde_json::from_str(json).unwrap();

		assert_eq!(payload.nodes, vec![RawNode::new("main.py:run", "run", "entry", "def run(): pass")]);
		assert_eq!(payload.edges, vec![RawEdge::new("main.py:run", "main.py:helper")]);
	}

	#[test]
	fn numeric_ids_become_text() {
		let json = r#"{"nodes": [{"id": 7, "label": "seven"}], "edges": [{"from_": 7, "to": 8}]}"#;
		let payload: MindmapPayload = serde_json::from_str(json).unwrap();

		assert_eq!(payload.nodes[0].id.as_deref(), Some("7"));
		assert_eq!(payload.edges[0], RawEdge::new("7", "8"));
	}

	#[test]
	fn missing_and_null_fields_are_tolerated() {
		let json = r#"{"nodes": [{"label": null}, {"id": null, "code": "x"}, {"id": "a"}]}"#;
		let payload: MindmapPayload = serde_json::from_str(json).unwrap();

		assert_eq!(payload.nodes[0].id, None);
		assert_eq!(payload.nodes[0].label, "");
		assert_eq!(payload.nodes[1].id, None);
		assert_eq!(payload.nodes[2], RawNode { id: Some("a".into()), ..RawNode::default() });
		assert!(payload.edges.is_empty());
	}
}
