//! Error and advisory types for the mindmap component.
//!
//! Nothing here escapes to the host as a panic: render failures come back as
//! [`RenderError`] values and advisories are only logged.

use std::fmt;

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Which of the two required display surfaces a render call looked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
	/// Region the graph canvas is mounted into.
	Canvas,
	/// Region the detail inspector writes into.
	Details,
}

impl fmt::Display for SurfaceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SurfaceKind::Canvas => f.write_str("canvas"),
			SurfaceKind::Details => f.write_str("details"),
		}
	}
}

/// Failure of a single render call.
#[derive(Error, Debug)]
pub enum RenderError {
	/// A required display surface is not attached to the page.
	#[error("{surface} surface `{id}` not found")]
	MountTargetMissing {
		/// The surface that was missing.
		surface: SurfaceKind,
		/// The identifier it was looked up by.
		id: String,
	},

	/// The rendering engine could not be set up.
	#[error("graph engine failed to initialize: {0}")]
	RenderInitFailed(#[from] EngineError),
}

/// Failure raised by a [`GraphEngine`](crate::components::mindmap::GraphEngine) backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
	/// Layout or physics options cannot drive a simulation.
	#[error("invalid engine options: {0}")]
	InvalidOptions(String),

	/// No browser window or document is available.
	#[error("no browser window available")]
	NoWindow,

	/// The backend itself rejected an operation.
	#[error("{0}")]
	Backend(String),
}

impl EngineError {
	/// Wraps a thrown JS value, keeping the message of `Error` objects.
	pub fn js(value: JsValue) -> Self {
		let message = match value.dyn_ref::<js_sys::Error>() {
			Some(err) => String::from(err.message()),
			None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
		};
		EngineError::Backend(message)
	}
}

/// Non-fatal inconsistencies found in a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
	/// Several input nodes share one id; the last occurrence supplied the values.
	#[error("duplicate node id `{id}`, keeping the last occurrence")]
	DuplicateNodeId {
		/// The repeated id.
		id: String,
	},

	/// An edge endpoint does not name any node; the edge is not drawn.
	#[error("edge {from} -> {to} references a missing node")]
	DanglingEdgeReference {
		/// Source endpoint as given (empty when absent).
		from: String,
		/// Target endpoint as given (empty when absent).
		to: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mount_error_names_surface_and_id() {
		let err = RenderError::MountTargetMissing {
			surface: SurfaceKind::Details,
			id: "mindmap-details".into(),
		};
		assert_eq!(err.to_string(), "details surface `mindmap-details` not found");
	}

	#[test]
	fn engine_errors_convert_into_render_init_failed() {
		let err: RenderError = EngineError::InvalidOptions("damping must be in (0, 1]".into()).into();
		assert!(matches!(err, RenderError::RenderInitFailed(_)));
		assert!(err.to_string().contains("damping"));
	}
}
