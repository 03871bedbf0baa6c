//! Capability interface between the renderer and a drawing backend.
//!
//! The browser backend is [`CanvasEngine`](super::canvas::CanvasEngine); tests
//! substitute an in-memory engine.

use super::config::EngineOptions;
use super::scene::Scene;
use crate::error::EngineError;

/// Callback fired on a click: the node id, or `None` for empty canvas.
pub type ClickListener = Box<dyn FnMut(Option<&str>)>;

/// Constructs live visual graphs on a mount surface.
pub trait GraphEngine {
	/// The surface a graph is mounted into.
	type Canvas;
	/// Live graph instance.
	type Handle: EngineHandle;

	/// Builds a visual graph for `scene` inside `canvas`.
	///
	/// May leave partial content on the surface when it fails.
	fn construct(
		&self,
		canvas: &Self::Canvas,
		scene: &Scene,
		options: &EngineOptions,
	) -> Result<Self::Handle, EngineError>;
}

/// A constructed visual graph.
pub trait EngineHandle {
	/// Settles the layout, returning the number of simulation steps taken.
	fn stabilize(&mut self) -> usize;

	/// Sets the click listener, replacing any previous one.
	fn on_click(&mut self, listener: ClickListener);

	/// Removes the graph from its surface and releases every listener.
	/// Calling it twice is a no-op.
	fn destroy(&mut self);
}
