use leptos::prelude::*;

use crate::components::force_graph::{ForceGraphSvg, GraphConfig};

/// Default Home Page
#[component]
pub fn Home(#[prop(optional)] config: GraphConfig) -> impl IntoView {
	view! {
		<div class="fullscreen-graph">
			<ForceGraphSvg config=config />
			<div class="graph-overlay">
				<h1>"Friends"</h1>
				<p class="subtitle">"Hover for details. Drag a node to pin it in place."</p>
			</div>
		</div>
	}
}
