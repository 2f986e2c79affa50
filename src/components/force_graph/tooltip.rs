//! Hover tooltip content and its fade transitions.

use super::types::GraphNode;

/// Tooltip markup for a node.
pub fn node_html(node: &GraphNode) -> String {
	format!("{}<br/>{}", node.name, node.location)
}

/// Tooltip markup for a link between `source` and `target`.
pub fn link_html(source: &GraphNode, target: &GraphNode) -> String {
	format!("{} to<br/>{}", source.name, target.name)
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// An opacity transition started at `start_ms`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
	from: f64,
	to: f64,
	start_ms: f64,
	duration_ms: f64,
}

impl Fade {
	fn settled(value: f64) -> Self {
		Self {
			from: value,
			to: value,
			start_ms: 0.0,
			duration_ms: 0.0,
		}
	}

	pub fn value_at(&self, now_ms: f64) -> f64 {
		if self.duration_ms <= 0.0 {
			return self.to;
		}
		let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
		self.from + (self.to - self.from) * ease_cubic_in_out(t)
	}
}

/// Floating tooltip shown next to the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub html: String,
	pub left: f64,
	pub top: f64,
	fade: Fade,
}

impl Default for Tooltip {
	fn default() -> Self {
		Self {
			html: String::new(),
			left: 0.0,
			top: 0.0,
			fade: Fade::settled(0.0),
		}
	}
}

impl Tooltip {
	/// Replaces the content, moves the tooltip and fades it towards `opacity`
	/// starting from wherever the previous fade had got to.
	pub fn show(
		&mut self,
		html: String,
		left: f64,
		top: f64,
		opacity: f64,
		duration_ms: f64,
		now_ms: f64,
	) {
		self.html = html;
		self.left = left;
		self.top = top;
		self.fade_to(opacity, duration_ms, now_ms);
	}

	/// Fades out, keeping the last content in place.
	pub fn hide(&mut self, duration_ms: f64, now_ms: f64) {
		self.fade_to(0.0, duration_ms, now_ms);
	}

	fn fade_to(&mut self, to: f64, duration_ms: f64, now_ms: f64) {
		self.fade = Fade {
			from: self.fade.value_at(now_ms),
			to,
			start_ms: now_ms,
			duration_ms,
		};
	}

	pub fn opacity(&self, now_ms: f64) -> f64 {
		self.fade.value_at(now_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::NodeKind;

	fn person(name: &str, location: &str) -> GraphNode {
		GraphNode {
			id: name.to_lowercase(),
			name: name.into(),
			location: location.into(),
			kind: NodeKind::Friend,
		}
	}

	#[test]
	fn content_markup() {
		let (ann, bob) = (person("Ann", "Oslo"), person("Bob", "Rome"));
		assert_eq!(node_html(&ann), "Ann<br/>Oslo");
		assert_eq!(link_html(&ann, &bob), "Ann to<br/>Bob");
	}

	#[test]
	fn fades_in_then_out() {
		let mut tip = Tooltip::default();
		assert_eq!(tip.opacity(0.0), 0.0);

		tip.show("x".into(), 10.0, 20.0, 0.9, 200.0, 1_000.0);
		assert_eq!(tip.opacity(1_000.0), 0.0);
		assert!((tip.opacity(1_100.0) - 0.45).abs() < 1e-9);
		assert!(tip.opacity(1_150.0) < 0.9);
		assert_eq!(tip.opacity(1_200.0), 0.9);
		assert_eq!(tip.opacity(5_000.0), 0.9);

		tip.hide(500.0, 2_000.0);
		assert_eq!(tip.opacity(2_000.0), 0.9);
		assert_eq!(tip.opacity(2_500.0), 0.0);
		assert_eq!(tip.html, "x");
	}

	#[test]
	fn interrupted_fade_starts_from_current_opacity() {
		let mut tip = Tooltip::default();
		tip.show("a".into(), 0.0, 0.0, 0.9, 200.0, 0.0);
		tip.hide(500.0, 100.0);
		assert!((tip.opacity(100.0) - 0.45).abs() < 1e-9);
		assert!(tip.opacity(350.0) < 0.45);
	}

	#[test]
	fn easing_endpoints() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(0.5), 0.5);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
	}
}
