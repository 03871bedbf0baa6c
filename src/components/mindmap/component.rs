//! Leptos panel hosting the mindmap surfaces.
//!
//! The panel always renders the canvas and details regions so the renderer
//! can find them by id; they are only hidden while closed. An effect renders
//! the payload whenever the panel is open and tears the graph down otherwise.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;

use super::canvas::CanvasEngine;
use super::config::MindmapConfig;
use super::dom::DomHost;
use super::renderer::MindmapRenderer;
use super::types::MindmapPayload;

/// Toggleable code-structure mindmap with a details sidebar.
///
/// `payload` is re-rendered whenever it changes while the panel is open.
#[component]
pub fn MindmapPanel(
	#[prop(into)] payload: Signal<MindmapPayload>,
	#[prop(optional)] config: MindmapConfig,
	#[prop(default = false)] open: bool,
) -> impl IntoView {
	let mount = config.mount.clone();
	let renderer = Rc::new(RefCell::new(MindmapRenderer::new(
		DomHost,
		CanvasEngine::default(),
		config,
	)));
	let (is_open, set_open) = signal(open);

	let renderer_fx = renderer.clone();
	Effect::new(move |_| {
		let showing = is_open.get();
		let payload = payload.get();
		let Ok(mut renderer) = renderer_fx.try_borrow_mut() else {
			warn!("mindmap: renderer busy, skipping update");
			return;
		};
		if showing {
			// Failures are logged by the renderer and leave the panel empty.
			let _ = renderer.render_payload(&payload);
		} else {
			renderer.close();
		}
	});

	view! {
		<div class="mindmap-panel">
			<button
				class="mindmap-toggle"
				on:click=move |_| set_open.update(|open| *open = !*open)
			>
				{move || if is_open.get() { "Close mindmap" } else { "Show mindmap" }}
			</button>
			<div
				class="mindmap-body"
				style:display=move || if is_open.get() { "flex" } else { "none" }
			>
				<div id=mount.canvas class="mindmap-canvas" style="flex: 1; height: 600px;"></div>
				<div id=mount.details class="mindmap-details" style="width: 320px; overflow: auto;"></div>
			</div>
		</div>
	}
}
