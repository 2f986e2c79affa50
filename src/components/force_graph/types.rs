//! Graph data structures as they arrive from `data/graph.json`.

use serde::Deserialize;

/// Relationship category of a node, drawn as the circle's stroke color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Drawn with a green stroke.
	Friend,
	/// Anything else, including unrecognised `type` values.
	#[default]
	#[serde(other)]
	Other,
}

impl NodeKind {
	/// Stroke color used for the node circle.
	pub fn stroke(self) -> &'static str {
		match self {
			NodeKind::Friend => "green",
			NodeKind::Other => "red",
		}
	}
}

/// A node in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier, referenced by links.
	pub id: String,
	/// Label drawn next to the node.
	#[serde(default)]
	pub name: String,
	/// Shown under the name in the hover tooltip.
	#[serde(default)]
	pub location: String,
	/// The `type` field of the document.
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
}

/// A directed edge between two nodes, labelled with `val`.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Edge label text.
	#[serde(default)]
	pub val: String,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// All nodes, in drawing order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Links referencing nodes by id.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_graph_document() {
		let json = r#"{
			"nodes": [
				{"id": "a", "name": "Ann", "location": "Oslo", "type": "friend"},
				{"id": "b", "name": "Bob", "location": "Rome", "type": "other"}
			],
			"links": [{"source": "a", "target": "b", "val": "knows"}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].kind, NodeKind::Friend);
		assert_eq!(data.nodes[1].location, "Rome");
		assert_eq!(data.links[0].val, "knows");
	}

	#[test]
	fn unknown_type_falls_back_to_other() {
		let node: GraphNode =
			serde_json::from_str(r#"{"id": "x", "name": "X", "type": "colleague"}"#).unwrap();
		assert_eq!(node.kind, NodeKind::Other);
		assert_eq!(node.location, "");
		assert_eq!(node.kind.stroke(), "red");
	}

	#[test]
	fn empty_document_is_empty_graph() {
		let data: GraphData = serde_json::from_str("{}").unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.links.is_empty());
	}

	#[test]
	fn missing_id_is_an_error() {
		assert!(serde_json::from_str::<GraphNode>(r#"{"name": "nameless"}"#).is_err());
	}
}
