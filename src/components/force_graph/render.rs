//! Per-tick drawing geometry, independent of the DOM.
//!
//! The scene controller produces a [`Frame`] after every simulation tick; the
//! SVG layer copies these values onto its elements as attributes.

use std::fmt;

pub const SVG_ID: &str = "dag";
pub const ARROWHEAD_ID: &str = "arrowhead";
pub const ARROWHEAD_PATH: &str = "M 0,-5 L 10 ,0 L 0,5";
pub const ARROWHEAD_FILL: &str = "#999";

pub const NODE_RADIUS: f64 = 10.0;
pub const NODE_FILL: &str = "#fff";
pub const NODE_STROKE_WIDTH: f64 = 5.0;
pub const NODE_STROKE_OPACITY: f64 = 0.7;
pub const NODE_LABEL_DX: f64 = 12.0;
pub const NODE_LABEL_DY: f64 = 8.0;
pub const EDGE_LABEL_DY: f64 = -4.0;

/// Element id of the path an edge label is laid out along.
pub fn edge_path_id(link: usize) -> String {
	format!("edgepath{link}")
}

pub fn edge_label_id(link: usize) -> String {
	format!("edgelabel{link}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// `transform` attribute placing a node group at this point.
	pub fn translate(&self) -> String {
		format!("translate({}, {})", self.x, self.y)
	}
}

/// Current endpoints of one link.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkGeometry {
	pub source: Point,
	pub target: Point,
}

impl LinkGeometry {
	/// Path data for the label path, running source to target.
	pub fn path(&self) -> String {
		format!(
			"M {} {} L {} {}",
			self.source.x, self.source.y, self.target.x, self.target.y
		)
	}

	/// True when the link points leftwards, which would render its label
	/// upside down.
	pub fn is_reversed(&self) -> bool {
		self.target.x < self.source.x
	}
}

/// Axis-aligned bounding box as reported by `getBBox()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl BBox {
	pub fn center(&self) -> Point {
		Point {
			x: self.x + self.width / 2.0,
			y: self.y + self.height / 2.0,
		}
	}
}

/// Orientation that keeps an edge label readable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelRotation {
	Upright,
	/// Half turn about the label's own center.
	Flipped(Point),
}

impl LabelRotation {
	/// Picks the rotation for a label along `link`. The bounding box is only
	/// measured when the label actually needs flipping.
	pub fn for_link(link: &LinkGeometry, bbox: impl FnOnce() -> BBox) -> Self {
		if link.is_reversed() {
			LabelRotation::Flipped(bbox().center())
		} else {
			LabelRotation::Upright
		}
	}
}

impl fmt::Display for LabelRotation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LabelRotation::Upright => write!(f, "rotate(0)"),
			LabelRotation::Flipped(c) => write!(f, "rotate(180 {} {})", c.x, c.y),
		}
	}
}

/// Everything that moves between two ticks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub links: Vec<LinkGeometry>,
	pub nodes: Vec<Point>,
}
