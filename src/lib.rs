//! friend-graph: a force-directed SVG graph of people and places.
//!
//! Leptos client-side app that fetches `data/graph.json`, lays it out with a
//! force simulation and lets the user hover and drag nodes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

mod components;
mod pages;

pub use components::force_graph::{
	ForceGraphSvg, GraphConfig, GraphData, GraphLink, GraphNode, NodeKind, PinPolicy,
};

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Parses a config document, keeping defaults for absent fields.
pub fn parse_config(json: &str) -> Result<GraphConfig, serde_json::Error> {
	serde_json::from_str(json)
}

/// Reads overrides from a `<script id="graph-config" type="application/json">`
/// element, if the page has one.
fn load_config() -> GraphConfig {
	let script = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id("graph-config"))
		.and_then(|e| e.dyn_into::<HtmlScriptElement>().ok());
	let Some(text) = script.and_then(|s| s.text().ok()) else {
		return GraphConfig::default();
	};

	match parse_config(&text) {
		Ok(config) => {
			info!("using config overrides from page");
			config
		}
		Err(e) => {
			warn!("ignoring invalid graph config: {}", e);
			GraphConfig::default()
		}
	}
}

/// An app router which renders the graph page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	let config = load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Friend Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=move || view! { <Home config=config.clone() /> } />
			</Routes>
		</Router>
	}
}
