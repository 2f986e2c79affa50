use thiserror::Error;

/// Failures while loading graph data or building the scene from it.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("fetch failed: {0}")]
	Fetch(String),
	#[error("unexpected HTTP status {0}")]
	Status(u16),
	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("node not found: {0}")]
	MissingNode(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_problem() {
		assert_eq!(
			GraphError::MissingNode("zed".into()).to_string(),
			"node not found: zed"
		);
		assert_eq!(GraphError::Status(404).to_string(), "unexpected HTTP status 404");
	}
}
