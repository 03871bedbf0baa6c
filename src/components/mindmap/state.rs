//! Graph simulation state and pointer interaction.
//!
//! Wraps the `force_graph` physics simulation with per-node box metadata, the
//! pan/zoom view transform, and the drag/pan/click state machine. Nothing here
//! touches the DOM, so the whole interaction model runs natively in tests.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::warn;

use super::config::{PhysicsOptions, StabilizationOptions};
use super::scene::Scene;
use super::theme::Theme;

/// Pointer travel (screen pixels) below which a press-release is a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
/// Share of the canvas the graph occupies after fitting.
const FIT_PADDING: f64 = 0.9;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	/// Label already wrapped to the maximum box width.
	pub lines: Vec<String>,
	pub tooltip: String,
	/// Box size in world units.
	pub width: f64,
	pub height: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to MIN_ZOOM..MAX_ZOOM).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Set once the pointer travelled beyond the click tolerance.
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A completed click: the node under the pointer, or `None` for empty canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickEvent {
	pub node_id: Option<String>,
}

/// Splits `text` into lines no wider than `max_width`.
///
/// Breaks at whitespace where possible and inside words that are too long on
/// their own. Explicit newlines are kept. Always yields at least one line.
pub fn wrap_text(text: &str, max_width: f64, measure: &mut impl FnMut(&str) -> f64) -> Vec<String> {
	let mut lines = Vec::new();
	for paragraph in text.split('\n') {
		let mut current = String::new();
		for word in paragraph.split_whitespace() {
			let candidate = if current.is_empty() {
				word.to_string()
			} else {
				format!("{} {}", current, word)
			};
			if measure(&candidate) <= max_width {
				current = candidate;
				continue;
			}
			if !current.is_empty() {
				lines.push(std::mem::take(&mut current));
			}
			for ch in word.chars() {
				current.push(ch);
				if current.chars().count() > 1 && measure(&current) > max_width {
					current.pop();
					lines.push(std::mem::replace(&mut current, ch.to_string()));
				}
			}
		}
		lines.push(current);
	}
	lines
}

/// Core graph state combining physics simulation with interaction tracking.
///
/// Created once per render, settled by [`stabilize`](Self::stabilize), then
/// only advanced while the user drags nodes around.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<DefaultNodeIdx>,
	pub selected: Option<DefaultNodeIdx>,
	/// Last pointer position over the canvas, in screen space.
	pub pointer: Option<(f64, f64)>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	loops: Vec<DefaultNodeIdx>,
	press: Option<(f64, f64)>,
}

impl ForceGraphState {
	/// Seeds every scene node on a circle around the canvas centre.
	///
	/// `measure` returns the width of a label line in the node font.
	pub fn new(
		scene: &Scene,
		width: f64,
		height: f64,
		physics: &PhysicsOptions,
		theme: &Theme,
		mut measure: impl FnMut(&str) -> f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: physics.charge,
			force_spring: physics.spring,
			force_max: physics.max_force,
			node_speed: physics.node_speed,
			damping_factor: physics.damping,
		});
		let style = &theme.node;
		let count = scene.nodes.len().max(1) as f64;
		let radius = (80.0 * count / (2.0 * PI)).max(100.0);

		let mut indices = Vec::with_capacity(scene.nodes.len());
		for (i, node) in scene.nodes.iter().enumerate() {
			let lines = wrap_text(&node.label, style.max_text_width(), &mut measure);
			let text_width = lines.iter().map(|l| measure(l)).fold(0.0, f64::max);
			let angle = (i as f64) * 2.0 * PI / count;
			let (x, y) = (
				(width / 2.0 + radius * angle.cos()) as f32,
				(height / 2.0 + radius * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: physics.node_mass,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					width: (text_width + 2.0 * style.margin).min(style.max_width),
					height: lines.len() as f64 * style.line_step() + 2.0 * style.margin,
					lines,
					tooltip: node.tooltip.clone(),
				},
			});
			indices.push(idx);
		}

		let (mut edges, mut loops) = (Vec::new(), Vec::new());
		for edge in &scene.edges {
			let (Some(&src), Some(&tgt)) = (indices.get(edge.from), indices.get(edge.to)) else {
				warn!("mindmap: skipping edge {} -> {} outside the scene", edge.from, edge.to);
				continue;
			};
			if edge.is_loop() {
				loops.push(src);
			} else {
				// The simulation graph is undirected; reciprocal and repeated
				// edges share one spring but each keeps its own arrow.
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			selected: None,
			pointer: None,
			width,
			height,
			animation_running: false,
			edges,
			loops,
			press: None,
		}
	}

	/// Directed `(from, to)` pairs to draw, one per scene edge that is not a loop.
	pub fn edges(&self) -> &[(DefaultNodeIdx, DefaultNodeIdx)] {
		&self.edges
	}

	/// Nodes that carry a self-referencing edge.
	pub fn loops(&self) -> &[DefaultNodeIdx] {
		&self.loops
	}

	/// Runs `f` against the node with index `idx`.
	pub fn with_node<T>(&self, idx: DefaultNodeIdx, f: impl FnOnce(&force_graph::Node<NodeInfo>) -> T) -> Option<T> {
		let mut f = Some(f);
		let mut out = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				if let Some(f) = f.take() {
					out = Some(f(node));
				}
			}
		});
		out
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		self.with_node(idx, |node| (node.x() as f64, node.y() as f64))
	}

	/// Advances the simulation by `dt` seconds, returning the largest node move.
	pub fn step(&mut self, dt: f32) -> f32 {
		let mut before = Vec::new();
		self.graph.visit_nodes(|node| before.push((node.x(), node.y())));
		self.graph.update(dt);
		let mut motion: f32 = 0.0;
		let mut i = 0;
		self.graph.visit_nodes(|node| {
			if let Some(&(x, y)) = before.get(i) {
				motion = motion.max((node.x() - x).hypot(node.y() - y));
			}
			i += 1;
		});
		if motion.is_finite() { motion } else { 0.0 }
	}

	/// Settles the layout and fits it into view, returning the steps taken.
	pub fn stabilize(&mut self, options: &StabilizationOptions) -> usize {
		let mut steps = 0;
		while steps < options.iterations {
			steps += 1;
			if self.step(options.time_step) < options.min_motion {
				break;
			}
		}
		self.animation_running = false;
		self.fit();
		steps
	}

	/// Per-frame update: runs physics only while something is moving.
	pub fn advance(&mut self, dt: f32, min_motion: f32) {
		if !self.animation_running {
			return;
		}
		let motion = self.step(dt);
		if !self.drag.active && motion < min_motion {
			self.animation_running = false;
		}
	}

	/// World-space bounding box of all node boxes: `(min_x, min_y, max_x, max_y)`.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let (hw, hh) = (node.data.user_data.width / 2.0, node.data.user_data.height / 2.0);
			let b = bounds.get_or_insert((x - hw, y - hh, x + hw, y + hh));
			*b = (b.0.min(x - hw), b.1.min(y - hh), b.2.max(x + hw), b.3.max(y + hh));
		});
		bounds
	}

	/// Zooms and centres the view on the whole graph; never zooms in past 100%.
	pub fn fit(&mut self) {
		let Some((x0, y0, x1, y1)) = self.bounds() else {
			self.transform = ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			};
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = (FIT_PADDING * (self.width / bw).min(self.height / bh)).clamp(MIN_ZOOM, 1.0);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose box contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if dx.abs() <= info.width / 2.0 && dy.abs() <= info.height / 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	/// Tooltip for the hovered node, hidden while dragging.
	pub fn hover_tooltip(&self) -> Option<String> {
		if self.drag.active || self.pan.active {
			return None;
		}
		let idx = self.hovered?;
		self.with_node(idx, |node| node.data.user_data.tooltip.clone())
			.filter(|text| !text.is_empty())
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.press = Some((x, y));
		if let Some(idx) = self.node_at_position(x, y) {
			let (nx, ny) = self.node_position(idx).unwrap_or((0.0, 0.0));
			self.drag = DragState {
				active: true,
				moved: false,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				node_start_x: nx as f32,
				node_start_y: ny as f32,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.pointer = Some((x, y));
		if self.drag.active {
			let travel = (x - self.drag.start_x).hypot(y - self.drag.start_y);
			if !self.drag.moved && travel < CLICK_TOLERANCE {
				return;
			}
			self.drag.moved = true;
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
				self.animation_running = true;
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		} else {
			self.hovered = self.node_at_position(x, y);
		}
	}

	/// Ends a drag or pan; returns a click when the pointer barely moved.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<ClickEvent> {
		let click = self
			.press
			.take()
			.filter(|&(px, py)| !self.drag.moved && (x - px).hypot(y - py) < CLICK_TOLERANCE)
			.map(|_| {
				self.selected = self.node_at_position(x, y);
				ClickEvent {
					node_id: self.selected.and_then(|idx| self.with_node(idx, |n| n.data.user_data.id.clone())),
				}
			});
		self.release_drag();
		click
	}

	pub fn pointer_leave(&mut self) {
		self.press = None;
		self.release_drag();
		self.hovered = None;
		self.pointer = None;
	}

	/// Zooms around the screen point `(x, y)`; positive `delta_y` zooms out.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Resizes the viewport and fits the graph into it again.
	pub fn refit(&mut self, width: f64, height: f64) {
		self.resize(width, height);
		self.fit();
	}

	fn release_drag(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}
}
