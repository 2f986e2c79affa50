//! SVG elements mirroring a [`GraphScene`], and the listeners feeding input back into it.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent, SvgGraphicsElement, Window};

use super::render::{
	ARROWHEAD_FILL, ARROWHEAD_ID, ARROWHEAD_PATH, BBox, EDGE_LABEL_DY, Frame, LabelRotation,
	NODE_FILL, NODE_LABEL_DX, NODE_LABEL_DY, NODE_RADIUS, NODE_STROKE_OPACITY, NODE_STROKE_WIDTH,
	edge_label_id, edge_path_id,
};
use super::state::{GraphScene, Interaction};
use super::tooltip::Tooltip;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Routes an interaction into whoever owns the scene.
pub type Dispatch = Rc<dyn Fn(Interaction)>;

type Listener = Closure<dyn FnMut(MouseEvent)>;

fn svg_element(document: &Document, tag: &str, attrs: &[(&str, &str)]) -> Result<Element, JsValue> {
	let el = document.create_element_ns(Some(SVG_NS), tag)?;
	for (name, value) in attrs {
		el.set_attribute(name, value)?;
	}
	Ok(el)
}

fn listen(
	target: &web_sys::EventTarget,
	event: &str,
	listeners: &mut Vec<Listener>,
	handler: impl FnMut(MouseEvent) + 'static,
) -> Result<(), JsValue> {
	let cb: Listener = Closure::new(handler);
	target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
	listeners.push(cb);
	Ok(())
}

/// Pointer position relative to the SVG's top-left corner.
fn svg_point(svg: &Element, ev: &MouseEvent) -> (f64, f64) {
	let rect = svg.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn measure(label: &Element) -> BBox {
	label
		.dyn_ref::<SvgGraphicsElement>()
		.and_then(|g| g.get_b_box().ok())
		.map(|r| BBox {
			x: r.x() as f64,
			y: r.y() as f64,
			width: r.width() as f64,
			height: r.height() as f64,
		})
		.unwrap_or_default()
}

fn append_arrowhead(document: &Document, svg: &Element) -> Result<(), JsValue> {
	let defs = svg_element(document, "defs", &[])?;
	let marker = svg_element(
		document,
		"marker",
		&[
			("id", ARROWHEAD_ID),
			("viewBox", "-0 -5 10 10"),
			("refX", "16"),
			("refY", "0"),
			("orient", "auto"),
			("markerWidth", "8"),
			("markerHeight", "8"),
			("xoverflow", "visible"),
		],
	)?;
	let path = svg_element(
		document,
		"path",
		&[
			("d", ARROWHEAD_PATH),
			("fill", ARROWHEAD_FILL),
			("style", "stroke: none"),
		],
	)?;
	marker.append_child(&path)?;
	defs.append_child(&marker)?;
	svg.append_child(&defs)?;
	Ok(())
}

/// The SVG primitives for one loaded graph, kept in scene index order.
pub struct SvgScene {
	lines: Vec<Element>,
	paths: Vec<Element>,
	labels: Vec<Element>,
	nodes: Vec<Element>,
	_listeners: Vec<Listener>,
}

impl SvgScene {
	/// Replaces the contents of `svg` with elements for every link and node
	/// of `scene`, wiring hover and drag input to `dispatch`.
	pub fn build(
		window: &Window,
		svg: &Element,
		scene: &GraphScene,
		dispatch: Dispatch,
	) -> Result<Self, JsValue> {
		let document = svg
			.owner_document()
			.ok_or_else(|| JsValue::from_str("svg element has no document"))?;
		let mut listeners = Vec::new();
		svg.set_inner_html("");
		append_arrowhead(&document, svg)?;

		let marker_ref = format!("url(#{})", ARROWHEAD_ID);
		let mut lines = Vec::with_capacity(scene.links().len());
		for i in 0..scene.links().len() {
			let line = svg_element(
				&document,
				"line",
				&[("class", "link"), ("marker-end", marker_ref.as_str())],
			)?;
			let over = dispatch.clone();
			listen(&line, "mouseover", &mut listeners, move |ev| {
				over(Interaction::LinkOver {
					link: i,
					page_x: ev.page_x() as f64,
					page_y: ev.page_y() as f64,
				})
			})?;
			let out = dispatch.clone();
			listen(&line, "mouseout", &mut listeners, move |_| out(Interaction::LinkOut))?;
			svg.append_child(&line)?;
			lines.push(line);
		}

		let mut paths = Vec::with_capacity(scene.links().len());
		for i in 0..scene.links().len() {
			let path = svg_element(
				&document,
				"path",
				&[("class", "edgepath"), ("id", edge_path_id(i).as_str())],
			)?;
			svg.append_child(&path)?;
			paths.push(path);
		}

		let mut labels = Vec::with_capacity(scene.links().len());
		for (i, link) in scene.links().iter().enumerate() {
			let dy = EDGE_LABEL_DY.to_string();
			let text = svg_element(
				&document,
				"text",
				&[("class", "edgelabel"), ("id", edge_label_id(i).as_str()), ("dy", dy.as_str())],
			)?;
			let text_path = svg_element(
				&document,
				"textPath",
				&[
					("href", format!("#{}", edge_path_id(i)).as_str()),
					("style", "pointer-events: none"),
					("text-anchor", "middle"),
					("startOffset", "50%"),
				],
			)?;
			text_path.set_text_content(Some(&link.val));
			text.append_child(&text_path)?;
			svg.append_child(&text)?;
			labels.push(text);
		}

		let mut nodes = Vec::with_capacity(scene.nodes().len());
		for (i, node) in scene.nodes().iter().enumerate() {
			let group = svg_element(&document, "g", &[("class", "node")])?;
			let circle = svg_element(
				&document,
				"circle",
				&[
					("r", NODE_RADIUS.to_string().as_str()),
					(
						"style",
						format!(
							"fill: {}; stroke-width: {}; stroke-opacity: {}; stroke: {}",
							NODE_FILL,
							NODE_STROKE_WIDTH,
							NODE_STROKE_OPACITY,
							node.kind.stroke()
						)
						.as_str(),
					),
				],
			)?;
			let label = svg_element(
				&document,
				"text",
				&[
					("dx", NODE_LABEL_DX.to_string().as_str()),
					("dy", NODE_LABEL_DY.to_string().as_str()),
				],
			)?;
			label.set_text_content(Some(&node.name));
			group.append_child(&circle)?;
			group.append_child(&label)?;

			let (down, down_svg) = (dispatch.clone(), svg.clone());
			listen(&group, "mousedown", &mut listeners, move |ev| {
				ev.prevent_default();
				let (x, y) = svg_point(&down_svg, &ev);
				down(Interaction::DragStart { node: i, x, y })
			})?;
			let over = dispatch.clone();
			listen(&group, "mouseover", &mut listeners, move |ev| {
				over(Interaction::NodeOver {
					node: i,
					page_x: ev.page_x() as f64,
					page_y: ev.page_y() as f64,
				})
			})?;
			let out = dispatch.clone();
			listen(&group, "mouseout", &mut listeners, move |_| out(Interaction::NodeOut))?;

			svg.append_child(&group)?;
			nodes.push(group);
		}

		// Drags keep tracking once the pointer leaves the node or the SVG.
		let (moved, move_svg) = (dispatch.clone(), svg.clone());
		listen(window, "mousemove", &mut listeners, move |ev| {
			let (x, y) = svg_point(&move_svg, &ev);
			moved(Interaction::Drag { x, y })
		})?;
		let up = dispatch;
		listen(window, "mouseup", &mut listeners, move |_| up(Interaction::DragEnd))?;

		Ok(Self {
			lines,
			paths,
			labels,
			nodes,
			_listeners: listeners,
		})
	}

	/// Copies one tick's geometry onto the elements.
	pub fn update(&self, frame: &Frame) {
		for (geom, line) in frame.links.iter().zip(&self.lines) {
			let _ = line.set_attribute("x1", &geom.source.x.to_string());
			let _ = line.set_attribute("y1", &geom.source.y.to_string());
			let _ = line.set_attribute("x2", &geom.target.x.to_string());
			let _ = line.set_attribute("y2", &geom.target.y.to_string());
		}
		for (point, group) in frame.nodes.iter().zip(&self.nodes) {
			let _ = group.set_attribute("transform", &point.translate());
		}
		for (geom, path) in frame.links.iter().zip(&self.paths) {
			let _ = path.set_attribute("d", &geom.path());
		}
		for (geom, label) in frame.links.iter().zip(&self.labels) {
			let rotation = LabelRotation::for_link(geom, || measure(label));
			let _ = label.set_attribute("transform", &rotation.to_string());
		}
	}
}

/// The floating tooltip `div`.
pub struct TooltipView {
	element: HtmlElement,
	html: String,
	/// Last painted `(left, top, opacity)`.
	style: Option<(f64, f64, f64)>,
}

impl TooltipView {
	pub fn new(element: HtmlElement) -> Self {
		Self {
			element,
			html: String::new(),
			style: None,
		}
	}

	/// Writes whatever changed since the last paint. A settled tooltip costs
	/// no DOM writes.
	pub fn paint(&mut self, tooltip: &Tooltip, now_ms: f64) {
		if self.html != tooltip.html {
			self.element.set_inner_html(&tooltip.html);
			self.html.clone_from(&tooltip.html);
		}
		let next = (tooltip.left, tooltip.top, tooltip.opacity(now_ms));
		if self.style == Some(next) {
			return;
		}
		self.style = Some(next);
		let style = self.element.style();
		let _ = style.set_property("left", &format!("{}px", next.0));
		let _ = style.set_property("top", &format!("{}px", next.1));
		let _ = style.set_property("opacity", &next.2.to_string());
	}
}
