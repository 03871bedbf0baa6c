//! Browser backend: a `<canvas>` driven by the force simulation.
//!
//! `construct` creates the canvas inside the mount element and wires
//! mouse/wheel handlers for node dragging, panning, zooming and clicking. An
//! animation loop runs via `requestAnimationFrame`, advancing the simulation
//! while something moves and redrawing every frame. `destroy` undoes all of it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::{EngineOptions, StabilizationOptions};
use super::engine::{ClickListener, EngineHandle, GraphEngine};
use super::render;
use super::scale::ScaleConfig;
use super::scene::Scene;
use super::state::ForceGraphState;
use super::theme::Theme;
use crate::error::EngineError;

/// Fallback canvas size when the mount element has no layout yet.
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);
/// Frame time bounds (seconds) fed to the simulation.
const MIN_FRAME_DT: f64 = 0.001;
const MAX_FRAME_DT: f64 = 0.05;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
	stabilization: StabilizationOptions,
	last_frame: Option<f64>,
}

impl GraphContext {
	fn frame(&mut self, timestamp: f64) {
		let dt = self
			.last_frame
			.map(|last| ((timestamp - last) / 1000.0).clamp(MIN_FRAME_DT, MAX_FRAME_DT))
			.unwrap_or(self.stabilization.time_step as f64);
		self.last_frame = Some(timestamp);
		self.state.advance(dt as f32, self.stabilization.min_motion);
	}
}

type EventClosure = Closure<dyn FnMut(Event)>;

/// Creates canvas-backed graphs inside DOM elements.
#[derive(Clone, Debug, Default)]
pub struct CanvasEngine {
	/// Zoom scaling rules applied to every graph it builds.
	pub scale: ScaleConfig,
}

impl GraphEngine for CanvasEngine {
	type Canvas = Element;
	type Handle = CanvasHandle;

	fn construct(
		&self,
		mount: &Element,
		scene: &Scene,
		options: &EngineOptions,
	) -> Result<CanvasHandle, EngineError> {
		options.validate()?;
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or(EngineError::NoWindow)?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(EngineError::js)?
			.dyn_into()
			.map_err(|_| EngineError::Backend("created element is not a canvas".into()))?;
		let (w, h) = match (mount.client_width(), mount.client_height()) {
			(w, h) if w > 0 && h > 0 => (w as f64, h as f64),
			_ => FALLBACK_SIZE,
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		canvas.set_class_name("mindmap-canvas");
		let _ = canvas.set_attribute("style", "display: block; cursor: grab;");

		mount.set_inner_html("");
		mount.append_child(&canvas).map_err(EngineError::js)?;

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(EngineError::js)?
			.ok_or_else(|| EngineError::Backend("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|_| EngineError::Backend("unexpected 2d context type".into()))?;

		let theme = Theme::default();
		ctx.set_font(&theme.node.font());
		let state = ForceGraphState::new(scene, w, h, &options.physics, &theme, |text| {
			render::measure(&ctx, text)
		});

		let mut handle = CanvasHandle {
			mount: mount.clone(),
			canvas,
			context: Rc::new(RefCell::new(GraphContext {
				state,
				scale: self.scale.clone(),
				theme,
				stabilization: options.stabilization.clone(),
				last_frame: None,
			})),
			click: Rc::new(RefCell::new(None)),
			listeners: Vec::new(),
			resize: None,
			animate: Rc::new(RefCell::new(None)),
			frame: Rc::new(Cell::new(None)),
			destroyed: false,
		};
		handle.attach_listeners()?;
		handle.watch_resize()?;
		handle.start_animation(ctx)?;
		Ok(handle)
	}
}

/// A live canvas graph.
pub struct CanvasHandle {
	mount: Element,
	canvas: HtmlCanvasElement,
	context: Rc<RefCell<GraphContext>>,
	click: Rc<RefCell<Option<ClickListener>>>,
	listeners: Vec<(&'static str, EventClosure)>,
	/// Window `resize` listener; keeps the canvas matched to its mount.
	resize: Option<EventClosure>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	frame: Rc<Cell<Option<i32>>>,
	destroyed: bool,
}

/// Pointer position relative to the canvas.
fn local_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Matches the canvas to its mount's layout size, returning the new size if it changed.
fn sync_canvas_size(mount: &Element, canvas: &HtmlCanvasElement) -> Option<(f64, f64)> {
	let (w, h) = (mount.client_width(), mount.client_height());
	if w <= 0 || h <= 0 || (w as u32 == canvas.width() && h as u32 == canvas.height()) {
		return None;
	}
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	Some((w as f64, h as f64))
}

impl CanvasHandle {
	fn listen(&mut self, event: &'static str, closure: EventClosure) -> Result<(), EngineError> {
		self.canvas
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
			.map_err(EngineError::js)?;
		self.listeners.push((event, closure));
		Ok(())
	}

	fn attach_listeners(&mut self) -> Result<(), EngineError> {
		let (context_md, canvas_md) = (self.context.clone(), self.canvas.clone());
		self.listen(
			"mousedown",
			Closure::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
					return;
				};
				let (x, y) = local_position(&canvas_md, ev);
				if let Ok(mut c) = context_md.try_borrow_mut() {
					c.state.pointer_down(x, y);
				}
			}),
		)?;

		let (context_mm, canvas_mm) = (self.context.clone(), self.canvas.clone());
		self.listen(
			"mousemove",
			Closure::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
					return;
				};
				let (x, y) = local_position(&canvas_mm, ev);
				if let Ok(mut c) = context_mm.try_borrow_mut() {
					c.state.pointer_move(x, y);
				}
			}),
		)?;

		let (context_mu, canvas_mu, click_mu) =
			(self.context.clone(), self.canvas.clone(), self.click.clone());
		self.listen(
			"mouseup",
			Closure::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
					return;
				};
				let (x, y) = local_position(&canvas_mu, ev);
				let click = match context_mu.try_borrow_mut() {
					Ok(mut c) => c.state.pointer_up(x, y),
					Err(_) => None,
				};
				// The context borrow is released before listeners run.
				if let Some(click) = click {
					if let Some(listener) = click_mu.borrow_mut().as_mut() {
						listener(click.node_id.as_deref());
					}
				}
			}),
		)?;

		let context_ml = self.context.clone();
		self.listen(
			"mouseleave",
			Closure::new(move |_: Event| {
				if let Ok(mut c) = context_ml.try_borrow_mut() {
					c.state.pointer_leave();
				}
			}),
		)?;

		let (context_wh, canvas_wh) = (self.context.clone(), self.canvas.clone());
		self.listen(
			"wheel",
			Closure::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
					return;
				};
				ev.prevent_default();
				let (x, y) = local_position(&canvas_wh, ev);
				if let Ok(mut c) = context_wh.try_borrow_mut() {
					c.state.zoom_at(x, y, ev.delta_y());
				}
			}),
		)
	}

	fn watch_resize(&mut self) -> Result<(), EngineError> {
		let window = web_sys::window().ok_or(EngineError::NoWindow)?;
		let (context_rs, canvas_rs, mount_rs) =
			(self.context.clone(), self.canvas.clone(), self.mount.clone());
		let closure: EventClosure = Closure::new(move |_: Event| {
			let Some((w, h)) = sync_canvas_size(&mount_rs, &canvas_rs) else {
				return;
			};
			if let Ok(mut c) = context_rs.try_borrow_mut() {
				c.state.resize(w, h);
			}
		});
		window
			.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
			.map_err(EngineError::js)?;
		self.resize = Some(closure);
		Ok(())
	}

	fn start_animation(&mut self, ctx: CanvasRenderingContext2d) -> Result<(), EngineError> {
		let (context_anim, animate_inner, frame_inner) =
			(self.context.clone(), self.animate.clone(), self.frame.clone());
		let (mount_anim, canvas_anim) = (self.mount.clone(), self.canvas.clone());
		*self.animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			if let Ok(mut c) = context_anim.try_borrow_mut() {
				// The mount may only get its layout size after construction.
				if c.last_frame.is_none() {
					if let Some((w, h)) = sync_canvas_size(&mount_anim, &canvas_anim) {
						c.state.refit(w, h);
					}
				}
				c.frame(timestamp);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let next = web_sys::window()
					.and_then(|w| w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
				frame_inner.set(next);
			}
		}));

		let window = web_sys::window().ok_or(EngineError::NoWindow)?;
		if let Some(ref cb) = *self.animate.borrow() {
			let id = window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.map_err(EngineError::js)?;
			self.frame.set(Some(id));
		}
		Ok(())
	}
}

impl EngineHandle for CanvasHandle {
	fn stabilize(&mut self) -> usize {
		match self.context.try_borrow_mut() {
			Ok(mut c) => {
				let options = c.stabilization.clone();
				let steps = c.state.stabilize(&options);
				debug!("mindmap: layout settled after {} steps", steps);
				steps
			}
			Err(_) => {
				warn!("mindmap: stabilize skipped, graph state busy");
				0
			}
		}
	}

	fn on_click(&mut self, listener: ClickListener) {
		*self.click.borrow_mut() = Some(listener);
	}

	fn destroy(&mut self) {
		if self.destroyed {
			return;
		}
		self.destroyed = true;

		if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		self.animate.borrow_mut().take();

		for (event, closure) in self.listeners.drain(..) {
			let _ = self
				.canvas
				.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
		}
		if let (Some(closure), Some(window)) = (self.resize.take(), web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
		}
		if let Ok(mut click) = self.click.try_borrow_mut() {
			click.take();
		}

		if self.canvas.parent_node().is_some() {
			let _ = self.mount.remove_child(&self.canvas);
		}
		debug!("mindmap: canvas destroyed");
	}
}

impl Drop for CanvasHandle {
	fn drop(&mut self) {
		self.destroy();
	}
}
