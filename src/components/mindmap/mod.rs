//! Code-structure mindmap component.
//!
//! Turns a `{nodes, edges}` payload from the code-review service into an
//! interactive force-directed graph with a details sidebar:
//! - Normalization of loosely-shaped wire data (duplicates, dangling edges)
//! - Physics layout, stabilized before first display
//! - Pan, zoom, node dragging and hover tooltips on a canvas
//! - Click-to-inspect node details with a code excerpt
//!
//! # Example
//!
//! ```ignore
//! use code_mindmap::components::mindmap::{MindmapPanel, MindmapPayload, RawEdge, RawNode};
//!
//! let payload = MindmapPayload {
//!     nodes: vec![
//!         RawNode::new("a", "main", "Entry point", "fn main() {}"),
//!         RawNode::new("b", "parse", "Parses input", "fn parse() {}"),
//!     ],
//!     edges: vec![RawEdge::new("a", "b")],
//! };
//!
//! view! { <MindmapPanel payload=payload open=true /> }
//! ```

mod canvas;
mod component;
pub mod config;
mod dom;
pub mod engine;
pub mod inspector;
pub mod normalize;
mod render;
pub mod renderer;
pub mod scale;
pub mod scene;
mod state;
pub mod theme;
pub mod types;

pub use canvas::{CanvasEngine, CanvasHandle};
pub use component::MindmapPanel;
pub use config::{EngineOptions, MindmapConfig, MountIds, PhysicsOptions, StabilizationOptions};
pub use dom::{DomDetails, DomHost};
pub use engine::{ClickListener, EngineHandle, GraphEngine};
pub use inspector::{DetailsSurface, DetailsView, Inspector};
pub use normalize::{NormalizedGraph, normalize, normalize_payload};
pub use renderer::{MindmapRenderer, RendererHandle, SurfaceHost};
pub use scene::Scene;
pub use theme::Theme;
pub use types::{GraphEdge, GraphNode, MindmapPayload, RawEdge, RawNode};
