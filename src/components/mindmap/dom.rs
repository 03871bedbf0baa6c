//! DOM surfaces: looks up mount regions by element id and writes the
//! inspector's view into the details region as plain text nodes.

use log::warn;
use web_sys::{Document, Element};

use super::inspector::{DetailsSurface, DetailsView, PLACEHOLDER};
use super::renderer::SurfaceHost;

/// Resolves surfaces from the current document.
#[derive(Clone, Debug, Default)]
pub struct DomHost;

fn document() -> Option<Document> {
	web_sys::window()?.document()
}

impl SurfaceHost for DomHost {
	type Canvas = Element;
	type Details = DomDetails;

	fn canvas_surface(&self, id: &str) -> Option<Element> {
		document()?.get_element_by_id(id)
	}

	fn details_surface(&self, id: &str) -> Option<DomDetails> {
		document()?.get_element_by_id(id).map(DomDetails)
	}
}

/// Details region backed by a DOM element.
#[derive(Clone, Debug)]
pub struct DomDetails(pub Element);

impl DomDetails {
	fn append(&self, document: &Document, tag: &str, class: &str, text: &str) -> Option<()> {
		let el = document.create_element(tag).ok()?;
		el.set_class_name(class);
		el.set_text_content(Some(text));
		self.0.append_child(&el).ok()?;
		Some(())
	}

	fn fill(&self, view: &DetailsView) -> Option<()> {
		let document = document()?;
		self.0.set_text_content(None);
		match view {
			DetailsView::Placeholder => self.append(&document, "p", "text-gray-400", PLACEHOLDER),
			DetailsView::Node {
				label,
				details,
				excerpt,
			} => {
				self.append(&document, "h3", "text-lg font-bold text-gray-200", label)?;
				self.append(&document, "p", "text-gray-300", details)?;
				self.append(
					&document,
					"pre",
					"bg-gray-900 p-2 rounded text-gray-200 text-sm overflow-auto",
					excerpt,
				)
			}
		}
	}
}

impl DetailsSurface for DomDetails {
	fn show(&self, view: &DetailsView) {
		if self.fill(view).is_none() {
			warn!("mindmap: could not update details surface");
		}
	}
}
