//! Tunable layout, tooltip and interaction parameters.
//!
//! Every field has a default, so a config document only needs the fields it
//! overrides:
//!
//! ```json
//! { "link_distance": 200, "pin_policy": "release_on_drag_end" }
//! ```

use serde::Deserialize;

/// What happens to a dragged node's pin when the drag ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinPolicy {
	/// The node stays fixed where it was dropped.
	#[default]
	Persist,
	/// The pin is cleared and the node rejoins the simulation.
	ReleaseOnDragEnd,
}

/// Settings for one [`ForceGraphSvg`](super::ForceGraphSvg).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Where the graph document is fetched from.
	pub data_url: String,
	/// Target length of every link, in SVG units.
	pub link_distance: f64,
	/// How hard links pull towards `link_distance`.
	pub link_strength: f64,
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Quiet period after the last window resize before re-centering.
	pub resize_debounce_ms: i32,
	pub tooltip_fade_in_ms: f64,
	pub tooltip_fade_out_ms: f64,
	/// Opacity the tooltip fades in to.
	pub tooltip_opacity: f64,
	/// Vertical offset of the tooltip from the pointer.
	pub tooltip_offset_y: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Alpha the simulation is reheated to after a resize.
	pub resize_alpha: f64,
	/// Whether dropped nodes stay pinned.
	pub pin_policy: PinPolicy,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			data_url: "data/graph.json".into(),
			link_distance: 150.0,
			link_strength: 2.0,
			charge_strength: -30.0,
			resize_debounce_ms: 500,
			tooltip_fade_in_ms: 200.0,
			tooltip_fade_out_ms: 500.0,
			tooltip_opacity: 0.9,
			tooltip_offset_y: -28.0,
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
			pin_policy: PinPolicy::Persist,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_document_keeps_defaults() {
		let config: GraphConfig =
			serde_json::from_str(r#"{"link_distance": 80, "pin_policy": "release_on_drag_end"}"#)
				.unwrap();
		assert_eq!(config.link_distance, 80.0);
		assert_eq!(config.pin_policy, PinPolicy::ReleaseOnDragEnd);
		assert_eq!(config.link_strength, 2.0);
		assert_eq!(config.data_url, "data/graph.json");
		assert_eq!(config.resize_debounce_ms, 500);
	}

	#[test]
	fn unknown_pin_policy_is_rejected() {
		assert!(serde_json::from_str::<GraphConfig>(r#"{"pin_policy": "sometimes"}"#).is_err());
	}
}
