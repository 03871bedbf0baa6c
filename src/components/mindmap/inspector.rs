//! Detail inspector: projects the clicked node onto a details surface.

use std::rc::Rc;

use log::debug;

use super::normalize::NormalizedGraph;
use super::types::GraphNode;

/// Text shown while no node is selected.
pub const PLACEHOLDER: &str = "Click a node to view its details";

/// Number of code characters shown in the excerpt.
pub const EXCERPT_CHARS: usize = 200;

/// What a details surface should currently display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailsView {
	Placeholder,
	Node {
		label: String,
		details: String,
		excerpt: String,
	},
}

impl DetailsView {
	fn for_node(node: &GraphNode) -> Self {
		DetailsView::Node {
			label: node.label.clone(),
			details: node.details.clone(),
			excerpt: code_excerpt(&node.code),
		}
	}
}

/// First [`EXCERPT_CHARS`] characters of `code`, followed by `...`.
pub fn code_excerpt(code: &str) -> String {
	let mut excerpt: String = code.chars().take(EXCERPT_CHARS).collect();
	excerpt.push_str("...");
	excerpt
}

/// A region of the page the inspector writes into.
pub trait DetailsSurface {
	fn show(&self, view: &DetailsView);
}

/// Holds the current selection for one visualization.
pub struct Inspector<D: DetailsSurface> {
	surface: D,
	graph: Rc<NormalizedGraph>,
	selected: Option<usize>,
}

impl<D: DetailsSurface> Inspector<D> {
	/// Starts with nothing selected and the placeholder displayed.
	pub fn new(surface: D, graph: Rc<NormalizedGraph>) -> Self {
		surface.show(&DetailsView::Placeholder);
		Self {
			surface,
			graph,
			selected: None,
		}
	}

	/// Handles a click from the renderer.
	pub fn on_node_click(&mut self, node_id: Option<&str>) {
		self.selected = node_id.and_then(|id| self.graph.position(id));
		match self.selected() {
			Some(node) => {
				debug!("mindmap: inspecting {}", node.id);
				self.surface.show(&DetailsView::for_node(node));
			}
			None => self.surface.show(&DetailsView::Placeholder),
		}
	}

	pub fn selected(&self) -> Option<&GraphNode> {
		self.selected.map(|pos| &self.graph.nodes()[pos])
	}

	/// Drops the selection and shows the placeholder again.
	pub fn clear(&mut self) {
		self.selected = None;
		self.surface.show(&DetailsView::Placeholder);
	}
}
