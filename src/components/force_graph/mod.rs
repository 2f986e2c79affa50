//! Force-directed graph rendered as SVG.
//!
//! - Physics layout with link springs, many-body repulsion and centering
//! - Node dragging that pins nodes in place
//! - Hover tooltips for nodes and links
//! - Debounced re-centering when the window is resized

mod component;
mod config;
mod debounce;
mod dom;
mod error;
mod loader;
mod render;
mod simulation;
mod state;
mod tooltip;
mod types;

pub use component::ForceGraphSvg;
pub use config::{GraphConfig, PinPolicy};
pub use types::{GraphData, GraphLink, GraphNode, NodeKind};
