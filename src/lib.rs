//! code-mindmap: Interactive code-structure mindmap for code review results.
//!
//! This crate provides a WASM-based component that turns the `{nodes, edges}`
//! payload of a code review into a force-directed graph with physics-based
//! layout, pan/zoom, hover tooltips and a click-to-inspect details panel.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::mindmap::{MindmapConfig, MindmapPanel, MindmapPayload, MindmapRenderer};
pub use error::{Advisory, EngineError, RenderError};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("code-mindmap: logging initialized");
}

/// Text of the `<script>` element with the given id, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Parses the JSON in a `<script>` element, logging what went wrong.
fn load_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let json_text = script_text(id)?;
	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("code-mindmap: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load the mindmap payload from a script element with id="mindmap-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_payload() -> MindmapPayload {
	let payload: MindmapPayload = load_json("mindmap-data").unwrap_or_default();
	info!(
		"code-mindmap: loaded {} nodes, {} edges",
		payload.nodes.len(),
		payload.edges.len()
	);
	payload
}

/// Load overrides from id="mindmap-config"; defaults apply when absent or invalid.
fn load_config() -> MindmapConfig {
	load_json("mindmap-config").unwrap_or_default()
}

/// Main application component.
/// Loads the review payload from the DOM and renders the mindmap panel.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let payload = load_payload();
	let payload_signal = Signal::derive(move || payload.clone());
	let config = load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Code Review Mindmap" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="review-mindmap">
			<h1>"Code Structure"</h1>
			<p class="subtitle">"Click a node for details. Drag nodes to reposition. Scroll to zoom."</p>
			<MindmapPanel payload=payload_signal config=config />
		</div>
	}
}
