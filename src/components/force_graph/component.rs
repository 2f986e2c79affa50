//! Leptos component wiring the scene controller to an SVG element.
//!
//! On mount the component sizes the SVG to the viewport, fetches the graph,
//! builds the SVG scene and starts a `requestAnimationFrame` loop that steps
//! the simulation and repaints after every tick. Window resizes are debounced
//! before they re-center the layout.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Window};

use super::config::GraphConfig;
use super::debounce::{Debouncer, WindowScheduler};
use super::dom::{Dispatch, SvgScene, TooltipView};
use super::loader;
use super::render::SVG_ID;
use super::state::{GraphScene, Interaction};

/// Scene controller plus the DOM it paints into.
struct GraphContext {
	scene: GraphScene,
	svg_scene: Option<SvgScene>,
	tooltip: TooltipView,
}

fn viewport(window: &Window) -> (f64, f64) {
	let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(read(window.inner_width()), read(window.inner_height()))
}

fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

fn set_size(svg: &Element, width: f64, height: f64) {
	let _ = svg.set_attribute("width", &width.to_string());
	let _ = svg.set_attribute("height", &height.to_string());
}

/// Renders the graph at `config.data_url` as a viewport-sized SVG with a
/// hover tooltip.
#[component]
pub fn ForceGraphSvg(#[prop(optional)] config: GraphConfig) -> impl IntoView {
	let svg_ref = NodeRef::<leptos::svg::Svg>::new();
	let tooltip_ref = NodeRef::<leptos::html::Div>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let (Some(svg), Some(tooltip)) = (svg_ref.get(), tooltip_ref.get()) else {
			return;
		};
		if context.borrow().is_some() {
			return;
		}
		let svg: Element = svg.into();
		let tooltip: HtmlElement = tooltip.into();
		let Some(window) = web_sys::window() else {
			error!("no window to render into");
			return;
		};

		let (w, h) = viewport(&window);
		set_size(&svg, w, h);
		*context.borrow_mut() = Some(GraphContext {
			scene: GraphScene::empty(w, h, config.clone()),
			svg_scene: None,
			tooltip: TooltipView::new(tooltip),
		});

		let context_dispatch = context.clone();
		let dispatch: Dispatch = Rc::new(move |event: Interaction| {
			if let Some(ref mut c) = *context_dispatch.borrow_mut() {
				c.scene.dispatch(event, now_ms());
			}
		});

		let (context_load, svg_load, window_load, config_load) =
			(context.clone(), svg.clone(), window.clone(), config.clone());
		spawn_local(async move {
			let data = match loader::fetch_graph(&config_load.data_url).await {
				Ok(data) => data,
				Err(e) => {
					error!("could not load {}: {}", config_load.data_url, e);
					return;
				}
			};
			let mut guard = context_load.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			match GraphScene::new(&data, c.scene.width, c.scene.height, config_load) {
				Ok(scene) => c.scene = scene,
				Err(e) => {
					error!("could not lay out graph: {}", e);
					return;
				}
			}
			match SvgScene::build(&window_load, &svg_load, &c.scene, dispatch) {
				Ok(svg_scene) => c.svg_scene = Some(svg_scene),
				Err(e) => error!("could not build svg scene: {:?}", e),
			}
		});

		let debouncer = Rc::new(RefCell::new(Debouncer::new(
			WindowScheduler,
			config.resize_debounce_ms,
		)));
		let (context_resize, svg_resize) = (context.clone(), svg.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (context_resize, svg_resize) = (context_resize.clone(), svg_resize.clone());
			debouncer.borrow_mut().trigger(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport(&win);
				set_size(&svg_resize, nw, nh);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.scene.dispatch(
						Interaction::Resize {
							width: nw,
							height: nh,
						},
						now_ms(),
					);
				}
			});
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.scene.tick() {
					if let Some(ref svg_scene) = c.svg_scene {
						svg_scene.update(&c.scene.frame());
					}
				}
				c.tooltip.paint(c.scene.tooltip(), now_ms());
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
		info!("force graph mounted at {}x{}", w, h);
	});

	view! {
		<svg node_ref=svg_ref id=SVG_ID></svg>
		<div node_ref=tooltip_ref class="tooltip" style="opacity: 0;"></div>
	}
}
