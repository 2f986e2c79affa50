//! One-shot fetch of the graph document.

use log::info;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::{GraphError, Result};
use super::types::GraphData;

fn js_error(value: JsValue) -> GraphError {
	GraphError::Fetch(
		value
			.as_string()
			.unwrap_or_else(|| format!("{:?}", value)),
	)
}

pub fn parse_graph(text: &str) -> Result<GraphData> {
	Ok(serde_json::from_str(text)?)
}

/// Fetches and parses the graph at `url`. No retries.
pub async fn fetch_graph(url: &str) -> Result<GraphData> {
	let window = web_sys::window().ok_or_else(|| GraphError::Fetch("no window".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;
	if !response.ok() {
		return Err(GraphError::Status(response.status()));
	}

	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.ok_or_else(|| GraphError::Fetch("response body is not text".into()))?;
	let data = parse_graph(&text)?;
	info!(
		"loaded {} nodes, {} links from {}",
		data.nodes.len(),
		data.links.len(),
		url
	);
	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn malformed_document_is_a_json_error() {
		assert!(matches!(
			parse_graph(r#"{"nodes": [{"id": 1}]"#),
			Err(GraphError::Json(_))
		));
	}

	#[test]
	fn bundled_sample_parses() {
		let data = parse_graph(include_str!("../../../data/graph.json")).unwrap();
		assert_eq!(data.nodes.len(), 5);
		assert!(data.links.iter().all(|l| !l.val.is_empty()));
	}

	#[test]
	fn zero_nodes_parse_cleanly() {
		let data = parse_graph(r#"{"nodes": [], "links": []}"#).unwrap();
		assert!(data.nodes.is_empty());
	}
}
