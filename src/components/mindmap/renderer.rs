//! Render lifecycle: surface lookup, engine construction, click wiring and teardown.
//!
//! A [`MindmapRenderer`] owns at most one live [`RendererHandle`]. Every call
//! to [`MindmapRenderer::render`] tears the previous one down first, so a
//! mount point never carries two graphs or two click listeners.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::{error, info};

use super::config::MindmapConfig;
use super::engine::{ClickListener, EngineHandle, GraphEngine};
use super::inspector::{DetailsSurface, Inspector};
use super::normalize::{NormalizedGraph, normalize_payload};
use super::scene::Scene;
use super::types::MindmapPayload;
use crate::error::{RenderError, SurfaceKind};

/// Resolves display surfaces by their stable identifiers.
pub trait SurfaceHost {
	type Canvas;
	type Details: DetailsSurface + 'static;

	fn canvas_surface(&self, id: &str) -> Option<Self::Canvas>;
	fn details_surface(&self, id: &str) -> Option<Self::Details>;
}

type Observers = Rc<RefCell<Vec<ClickListener>>>;

/// A live visualization. Dropping it tears the graph down.
pub struct RendererHandle<H: EngineHandle, D: DetailsSurface> {
	engine: H,
	inspector: Rc<RefCell<Inspector<D>>>,
	observers: Observers,
	graph: Rc<NormalizedGraph>,
}

impl<H: EngineHandle, D: DetailsSurface> RendererHandle<H, D> {
	/// Adds a click observer, called after the inspector has updated.
	///
	/// Observers must not subscribe further observers from inside a callback.
	pub fn subscribe(&mut self, listener: ClickListener) {
		self.observers.borrow_mut().push(listener);
	}

	pub fn inspector(&self) -> Ref<'_, Inspector<D>> {
		self.inspector.borrow()
	}

	pub fn graph(&self) -> &NormalizedGraph {
		&self.graph
	}
}

impl<H: EngineHandle, D: DetailsSurface> Drop for RendererHandle<H, D> {
	fn drop(&mut self) {
		self.engine.destroy();
		if let Ok(mut inspector) = self.inspector.try_borrow_mut() {
			inspector.clear();
		}
		if let Ok(mut observers) = self.observers.try_borrow_mut() {
			observers.clear();
		}
	}
}

/// Drives one pair of display surfaces through successive visualizations.
pub struct MindmapRenderer<S: SurfaceHost, E: GraphEngine<Canvas = S::Canvas>> {
	host: S,
	engine: E,
	config: MindmapConfig,
	live: Option<RendererHandle<E::Handle, S::Details>>,
}

impl<S: SurfaceHost, E: GraphEngine<Canvas = S::Canvas>> MindmapRenderer<S, E> {
	pub fn new(host: S, engine: E, config: MindmapConfig) -> Self {
		Self {
			host,
			engine,
			config,
			live: None,
		}
	}

	/// Replaces the current visualization with one for `graph`.
	///
	/// Failures are logged and returned; the previous visualization is gone
	/// either way.
	pub fn render(
		&mut self,
		graph: NormalizedGraph,
	) -> Result<&mut RendererHandle<E::Handle, S::Details>, RenderError> {
		self.close();
		match self.mount(graph) {
			Ok(handle) => Ok(self.live.insert(handle)),
			Err(e) => {
				error!("mindmap: render aborted: {}", e);
				Err(e)
			}
		}
	}

	/// Normalizes a wire payload and renders it.
	pub fn render_payload(
		&mut self,
		payload: &MindmapPayload,
	) -> Result<&mut RendererHandle<E::Handle, S::Details>, RenderError> {
		self.render(normalize_payload(payload))
	}

	/// Tears down the live visualization, if any.
	pub fn close(&mut self) {
		if self.live.take().is_some() {
			info!("mindmap: visualization torn down");
		}
	}

	pub fn live(&self) -> Option<&RendererHandle<E::Handle, S::Details>> {
		self.live.as_ref()
	}

	fn mount(
		&self,
		graph: NormalizedGraph,
	) -> Result<RendererHandle<E::Handle, S::Details>, RenderError> {
		let ids = &self.config.mount;
		let canvas = self
			.host
			.canvas_surface(&ids.canvas)
			.ok_or_else(|| RenderError::MountTargetMissing {
				surface: SurfaceKind::Canvas,
				id: ids.canvas.clone(),
			})?;
		let details = self
			.host
			.details_surface(&ids.details)
			.ok_or_else(|| RenderError::MountTargetMissing {
				surface: SurfaceKind::Details,
				id: ids.details.clone(),
			})?;

		let graph = Rc::new(graph);
		let inspector = Rc::new(RefCell::new(Inspector::new(details, graph.clone())));
		let scene = Scene::from_graph(&graph);

		let mut engine = self.engine.construct(&canvas, &scene, &self.config.engine)?;
		let steps = engine.stabilize();
		info!(
			"mindmap: rendered {} nodes, {} edges (stabilized in {} steps)",
			scene.nodes.len(),
			scene.edges.len(),
			steps
		);

		let observers: Observers = Rc::default();
		let (inspector_click, observers_click) = (inspector.clone(), observers.clone());
		engine.on_click(Box::new(move |node_id| {
			if let Ok(mut inspector) = inspector_click.try_borrow_mut() {
				inspector.on_node_click(node_id);
			}
			if let Ok(mut observers) = observers_click.try_borrow_mut() {
				for listener in observers.iter_mut() {
					listener(node_id);
				}
			}
		}));

		Ok(RendererHandle {
			engine,
			inspector,
			observers,
			graph,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::config::EngineOptions;
	use crate::components::mindmap::inspector::DetailsView;
	use crate::components::mindmap::inspector::tests::RecordingSurface;
	use crate::components::mindmap::types::{RawEdge, RawNode};
	use crate::error::EngineError;

	#[derive(Default)]
	struct EngineLog {
		constructed: usize,
		live: usize,
		listeners: usize,
		click: Option<ClickListener>,
		scene: Option<Scene>,
		fail_with: Option<EngineError>,
	}

	#[derive(Clone, Default)]
	struct FakeEngine {
		log: Rc<RefCell<EngineLog>>,
	}

	impl FakeEngine {
		fn click(&self, node_id: Option<&str>) {
			let listener = self.log.borrow_mut().click.take();
			if let Some(mut listener) = listener {
				listener(node_id);
				self.log.borrow_mut().click = Some(listener);
			}
		}
	}

	struct FakeHandle {
		log: Rc<RefCell<EngineLog>>,
		has_listener: bool,
		destroyed: bool,
	}

	impl GraphEngine for FakeEngine {
		type Canvas = String;
		type Handle = FakeHandle;

		fn construct(
			&self,
			_canvas: &String,
			scene: &Scene,
			options: &EngineOptions,
		) -> Result<FakeHandle, EngineError> {
			options.validate()?;
			let mut log = self.log.borrow_mut();
			if let Some(err) = log.fail_with.clone() {
				return Err(err);
			}
			log.constructed += 1;
			log.live += 1;
			log.scene = Some(scene.clone());
			Ok(FakeHandle {
				log: self.log.clone(),
				has_listener: false,
				destroyed: false,
			})
		}
	}

	impl EngineHandle for FakeHandle {
		fn stabilize(&mut self) -> usize {
			1
		}

		fn on_click(&mut self, listener: ClickListener) {
			let mut log = self.log.borrow_mut();
			if !self.has_listener {
				log.listeners += 1;
				self.has_listener = true;
			}
			log.click = Some(listener);
		}

		fn destroy(&mut self) {
			if self.destroyed {
				return;
			}
			self.destroyed = true;
			let mut log = self.log.borrow_mut();
			log.live -= 1;
			if self.has_listener {
				log.listeners -= 1;
				log.click = None;
			}
		}
	}

	#[derive(Clone, Default)]
	struct FakeHost {
		canvas: Option<&'static str>,
		details: Option<RecordingSurface>,
	}

	impl FakeHost {
		fn complete() -> Self {
			Self {
				canvas: Some("mindmap"),
				details: Some(RecordingSurface::default()),
			}
		}

		fn shown(&self) -> Option<DetailsView> {
			self.details.as_ref().and_then(RecordingSurface::last)
		}
	}

	impl SurfaceHost for FakeHost {
		type Canvas = String;
		type Details = RecordingSurface;

		fn canvas_surface(&self, id: &str) -> Option<String> {
			self.canvas.filter(|c| *c == id).map(String::from)
		}

		fn details_surface(&self, id: &str) -> Option<RecordingSurface> {
			(id == "mindmap-details").then(|| self.details.clone()).flatten()
		}
	}

	fn renderer(host: FakeHost, engine: FakeEngine) -> MindmapRenderer<FakeHost, FakeEngine> {
		MindmapRenderer::new(host, engine, MindmapConfig::default())
	}

	fn duplicate_payload() -> MindmapPayload {
		MindmapPayload {
			nodes: vec![
				RawNode::new("a", "A", "first A", "x=1"),
				RawNode::new("a", "A2", "second A", "x=2"),
			],
			edges: vec![RawEdge::new("a", "b")],
		}
	}

	#[test]
	fn duplicate_and_dangling_payload_renders() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host.clone(), engine.clone());

		let handle = renderer.render_payload(&duplicate_payload()).unwrap();
		assert_eq!(handle.graph().nodes().len(), 1);
		assert_eq!(handle.graph().node("a").unwrap().label, "A2");

		let scene = engine.log.borrow().scene.clone().unwrap();
		assert_eq!(scene.nodes.len(), 1);
		assert!(scene.edges.is_empty());
		assert_eq!(host.shown(), Some(DetailsView::Placeholder));
	}

	#[test]
	fn click_round_trip_reaches_inspector() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host.clone(), engine.clone());
		renderer.render_payload(&duplicate_payload()).unwrap();

		engine.click(Some("a"));
		assert_eq!(
			host.shown(),
			Some(DetailsView::Node {
				label: "A2".into(),
				details: "second A".into(),
				excerpt: "x=2...".into(),
			})
		);
		let selected = renderer.live().unwrap().inspector().selected().cloned();
		assert_eq!(selected.map(|n| n.id), Some("a".to_string()));

		engine.click(None);
		assert_eq!(host.shown(), Some(DetailsView::Placeholder));
	}

	#[test]
	fn empty_payload_renders_nothing_without_error() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host.clone(), engine.clone());

		renderer.render_payload(&MindmapPayload::default()).unwrap();

		assert_eq!(engine.log.borrow().scene, Some(Scene::default()));
		assert_eq!(host.shown(), Some(DetailsView::Placeholder));
	}

	#[test]
	fn rerender_leaves_one_live_graph_and_listener() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host, engine.clone());

		renderer.render_payload(&duplicate_payload()).unwrap();
		let second = MindmapPayload {
			nodes: vec![RawNode::new("m", "main", "", ""), RawNode::new("h", "helper", "", "")],
			edges: vec![RawEdge::new("m", "h")],
		};
		renderer.render_payload(&second).unwrap();

		let log = engine.log.borrow();
		assert_eq!(log.constructed, 2);
		assert_eq!(log.live, 1);
		assert_eq!(log.listeners, 1);
		assert_eq!(log.scene.as_ref().map(|s| s.edges.len()), Some(1));
	}

	#[test]
	fn missing_canvas_aborts_before_drawing() {
		let host = FakeHost {
			canvas: None,
			..FakeHost::complete()
		};
		let engine = FakeEngine::default();
		let mut renderer = renderer(host.clone(), engine.clone());

		let err = renderer.render_payload(&duplicate_payload()).err().unwrap();
		assert!(matches!(
			err,
			RenderError::MountTargetMissing { surface: SurfaceKind::Canvas, ref id } if id == "mindmap"
		));
		assert_eq!(engine.log.borrow().constructed, 0);
		assert_eq!(host.shown(), None);
		assert!(renderer.live().is_none());
	}

	#[test]
	fn missing_details_surface_aborts_too() {
		let host = FakeHost {
			details: None,
			..FakeHost::complete()
		};
		let engine = FakeEngine::default();
		let mut renderer = renderer(host, engine.clone());

		let err = renderer.render_payload(&duplicate_payload()).err().unwrap();
		assert!(matches!(
			err,
			RenderError::MountTargetMissing { surface: SurfaceKind::Details, .. }
		));
		assert_eq!(engine.log.borrow().constructed, 0);
	}

	#[test]
	fn engine_failure_is_contained() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host, engine.clone());
		renderer.render_payload(&duplicate_payload()).unwrap();

		engine.log.borrow_mut().fail_with = Some(EngineError::Backend("no 2d context".into()));
		let err = renderer.render_payload(&duplicate_payload()).err().unwrap();

		assert!(matches!(err, RenderError::RenderInitFailed(_)));
		assert!(renderer.live().is_none());
		assert_eq!(engine.log.borrow().live, 0);
	}

	#[test]
	fn invalid_options_report_render_init_failed() {
		let mut config = MindmapConfig::default();
		config.engine.physics.damping = 0.0;
		let engine = FakeEngine::default();
		let mut renderer = MindmapRenderer::new(FakeHost::complete(), engine.clone(), config);

		let err = renderer.render_payload(&duplicate_payload()).err().unwrap();
		assert!(matches!(err, RenderError::RenderInitFailed(EngineError::InvalidOptions(_))));
		assert_eq!(engine.log.borrow().constructed, 0);
	}

	#[test]
	fn close_tears_down_and_clears_selection() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host.clone(), engine.clone());
		renderer.render_payload(&duplicate_payload()).unwrap();
		engine.click(Some("a"));

		renderer.close();

		assert!(renderer.live().is_none());
		assert_eq!(engine.log.borrow().live, 0);
		assert_eq!(engine.log.borrow().listeners, 0);
		assert_eq!(host.shown(), Some(DetailsView::Placeholder));
	}

	#[test]
	fn observers_see_clicks_after_inspector() {
		let (host, engine) = (FakeHost::complete(), FakeEngine::default());
		let mut renderer = renderer(host, engine.clone());
		let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();

		let sink = seen.clone();
		renderer
			.render_payload(&duplicate_payload())
			.unwrap()
			.subscribe(Box::new(move |id| sink.borrow_mut().push(id.map(String::from))));
		engine.click(Some("a"));
		engine.click(None);

		assert_eq!(*seen.borrow(), vec![Some("a".to_string()), None]);
	}
}
