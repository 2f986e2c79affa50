//! Scene controller owning the graph, its simulation and interaction state.
//!
//! All input reaches the scene through [`GraphScene::dispatch`]; the animation
//! loop calls [`GraphScene::tick`] once per frame and repaints from
//! [`GraphScene::frame`] whenever a tick happened.

use std::collections::HashMap;

use log::debug;

use super::config::{GraphConfig, PinPolicy};
use super::error::{GraphError, Result};
use super::render::{Frame, LinkGeometry, Point};
use super::simulation::{Simulation, SimulationParameters};
use super::tooltip::{self, Tooltip};
use super::types::{GraphData, GraphNode};

/// A link with both endpoints resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLink {
	pub source: usize,
	pub target: usize,
	pub val: String,
}

/// Pointer and window input, in the order the browser delivers it.
///
/// Hover positions are page coordinates; drag positions are in the SVG's
/// own coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
	NodeOver { node: usize, page_x: f64, page_y: f64 },
	NodeOut,
	LinkOver { link: usize, page_x: f64, page_y: f64 },
	LinkOut,
	DragStart { node: usize, x: f64, y: f64 },
	Drag { x: f64, y: f64 },
	DragEnd,
	Resize { width: f64, height: f64 },
}

/// Tracks an in-progress node drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
	pub node: usize,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

fn parameters(config: &GraphConfig, width: f64, height: f64) -> SimulationParameters {
	SimulationParameters {
		link_distance: config.link_distance,
		link_strength: config.link_strength,
		charge_strength: config.charge_strength,
		center_x: width / 2.0,
		center_y: height / 2.0,
	}
}

pub struct GraphScene {
	nodes: Vec<GraphNode>,
	links: Vec<SceneLink>,
	simulation: Simulation,
	drag: Option<DragState>,
	tooltip: Tooltip,
	config: GraphConfig,
	pub width: f64,
	pub height: f64,
}

impl GraphScene {
	/// Resolves link endpoints by node id and starts the layout centered in
	/// a `width` x `height` viewport.
	pub fn new(data: &GraphData, width: f64, height: f64, config: GraphConfig) -> Result<Self> {
		let id_to_idx: HashMap<&str, usize> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();
		let resolve = |id: &str| {
			id_to_idx
				.get(id)
				.copied()
				.ok_or_else(|| GraphError::MissingNode(id.to_string()))
		};

		let links = data
			.links
			.iter()
			.map(|link| -> Result<SceneLink> {
				Ok(SceneLink {
					source: resolve(&link.source)?,
					target: resolve(&link.target)?,
					val: link.val.clone(),
				})
			})
			.collect::<Result<Vec<_>>>()?;

		let simulation = Simulation::new(
			data.nodes.len(),
			links.iter().map(|l| (l.source, l.target)).collect(),
			parameters(&config, width, height),
		);

		Ok(Self {
			nodes: data.nodes.clone(),
			links,
			simulation,
			drag: None,
			tooltip: Tooltip::default(),
			config,
			width,
			height,
		})
	}

	/// A scene with nothing in it, used until data arrives or when it fails to load.
	pub fn empty(width: f64, height: f64, config: GraphConfig) -> Self {
		Self {
			nodes: Vec::new(),
			links: Vec::new(),
			simulation: Simulation::new(0, Vec::new(), parameters(&config, width, height)),
			drag: None,
			tooltip: Tooltip::default(),
			config,
			width,
			height,
		}
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[SceneLink] {
		&self.links
	}

	pub fn tooltip(&self) -> &Tooltip {
		&self.tooltip
	}

	/// Advances the layout one step if it is still running.
	pub fn tick(&mut self) -> bool {
		let ticked = self.simulation.step();
		if ticked && !self.simulation.is_running() {
			debug!("layout settled at alpha {:.5}", self.simulation.alpha());
		}
		ticked
	}

	/// Current drawing geometry for every link and node.
	pub fn frame(&self) -> Frame {
		let position = |idx: usize| {
			let node = &self.simulation.nodes()[idx];
			Point {
				x: node.x,
				y: node.y,
			}
		};
		Frame {
			links: self
				.links
				.iter()
				.map(|link| LinkGeometry {
					source: position(link.source),
					target: position(link.target),
				})
				.collect(),
			nodes: (0..self.nodes.len()).map(position).collect(),
		}
	}

	pub fn dispatch(&mut self, event: Interaction, now_ms: f64) {
		match event {
			Interaction::NodeOver {
				node,
				page_x,
				page_y,
			} => {
				if let Some(n) = self.nodes.get(node) {
					let html = tooltip::node_html(n);
					self.show_tooltip(html, page_x, page_y, now_ms);
				}
			}
			Interaction::LinkOver {
				link,
				page_x,
				page_y,
			} => {
				if let Some(l) = self.links.get(link) {
					let html = tooltip::link_html(&self.nodes[l.source], &self.nodes[l.target]);
					self.show_tooltip(html, page_x, page_y, now_ms);
				}
			}
			Interaction::NodeOut | Interaction::LinkOut => {
				self.tooltip.hide(self.config.tooltip_fade_out_ms, now_ms);
			}
			Interaction::DragStart { node, x, y } => self.drag_start(node, x, y),
			Interaction::Drag { x, y } => self.drag_move(x, y),
			Interaction::DragEnd => self.drag_end(),
			Interaction::Resize { width, height } => self.resize(width, height),
		}
	}

	fn show_tooltip(&mut self, html: String, page_x: f64, page_y: f64, now_ms: f64) {
		self.tooltip.show(
			html,
			page_x,
			page_y + self.config.tooltip_offset_y,
			self.config.tooltip_opacity,
			self.config.tooltip_fade_in_ms,
			now_ms,
		);
	}

	fn drag_start(&mut self, node: usize, x: f64, y: f64) {
		let Some(&current) = self.simulation.node(node) else {
			return;
		};
		if self.drag.is_none() {
			self.simulation
				.set_alpha_target(self.config.drag_alpha_target);
			self.simulation.restart();
		}
		self.simulation.pin(node, current.x, current.y);
		debug!(
			"dragging node {} (alpha {:.3}, target {})",
			node,
			self.simulation.alpha(),
			self.simulation.alpha_target()
		);
		self.drag = Some(DragState {
			node,
			start_x: x,
			start_y: y,
			node_start_x: current.x,
			node_start_y: current.y,
		});
	}

	fn drag_move(&mut self, x: f64, y: f64) {
		if let Some(drag) = self.drag {
			self.simulation.pin(
				drag.node,
				drag.node_start_x + (x - drag.start_x),
				drag.node_start_y + (y - drag.start_y),
			);
		}
	}

	fn drag_end(&mut self) {
		let Some(drag) = self.drag.take() else {
			return;
		};
		self.simulation.set_alpha_target(0.0);
		if self.config.pin_policy == PinPolicy::ReleaseOnDragEnd {
			self.simulation.unpin(drag.node);
		}
		let pinned = self
			.simulation
			.node(drag.node)
			.is_some_and(|n| n.is_pinned());
		debug!("released node {} (pinned: {})", drag.node, pinned);
	}

	/// Re-centers the layout on the new viewport and reheats it. Pins are kept.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.set_center(width / 2.0, height / 2.0);
		self.simulation.set_alpha(self.config.resize_alpha);
		self.simulation.restart();
		let (cx, cy) = self.simulation.center();
		debug!("re-centered layout on ({}, {}) for {}x{}", cx, cy, width, height);
	}
}
