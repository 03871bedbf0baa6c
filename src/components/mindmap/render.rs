//! Canvas rendering for the mindmap.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, self loops and arrowheads (world space)
//! 3. Node boxes and labels (world space)
//! 4. Hover tooltip (screen space)

use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo, wrap_text};
use super::theme::Theme;

/// Centre and half extents of a node box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeom {
	pub x: f64,
	pub y: f64,
	pub hw: f64,
	pub hh: f64,
}

impl BoxGeom {
	fn of(node: &force_graph::Node<NodeInfo>) -> Self {
		Self {
			x: node.x() as f64,
			y: node.y() as f64,
			hw: node.data.user_data.width / 2.0,
			hh: node.data.user_data.height / 2.0,
		}
	}

	/// Point where a ray from the centre along `(ux, uy)` leaves the box.
	pub fn exit(&self, ux: f64, uy: f64) -> (f64, f64) {
		let tx = if ux.abs() > 1e-9 { self.hw / ux.abs() } else { f64::INFINITY };
		let ty = if uy.abs() > 1e-9 { self.hh / uy.abs() } else { f64::INFINITY };
		let t = tx.min(ty);
		(self.x + ux * t, self.y + uy * t)
	}
}

/// Geometry of one curved directed edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePath {
	pub start: (f64, f64),
	pub control: (f64, f64),
	/// Arrow tip, on the target box border.
	pub end: (f64, f64),
	/// Unit direction the arrowhead points in.
	pub dir: (f64, f64),
}

fn unit(dx: f64, dy: f64) -> Option<(f64, f64)> {
	let len = (dx * dx + dy * dy).sqrt();
	(len > 1e-3).then(|| (dx / len, dy / len))
}

/// Computes the dynamic curve between two boxes from their current positions.
///
/// The control point sits off the midpoint, perpendicular to the centre line,
/// at `roundness` times the centre distance. Returns `None` when the boxes
/// share a centre.
pub fn edge_path(from: &BoxGeom, to: &BoxGeom, roundness: f64) -> Option<EdgePath> {
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	let (ux, uy) = unit(dx, dy)?;
	let bend = dist * roundness;
	let control = ((from.x + to.x) / 2.0 - uy * bend, (from.y + to.y) / 2.0 + ux * bend);

	let out = unit(control.0 - from.x, control.1 - from.y).unwrap_or((ux, uy));
	let inward = unit(control.0 - to.x, control.1 - to.y).unwrap_or((-ux, -uy));
	let start = from.exit(out.0, out.1);
	let end = to.exit(inward.0, inward.1);
	let dir = unit(end.0 - control.0, end.1 - control.1).unwrap_or((ux, uy));
	Some(EdgePath {
		start,
		control,
		end,
		dir,
	})
}

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, theme, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_loops(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	draw_tooltip(state, ctx, theme);
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let color = theme.edge.color.to_css();
	ctx.set_stroke_style_str(&color);
	ctx.set_fill_style_str(&color);
	ctx.set_line_width(scale.edge_width);

	let mut boxes = HashMap::new();
	state.graph.visit_nodes(|node| {
		boxes.insert(node.index(), BoxGeom::of(node));
	});

	for (from, to) in state.edges() {
		let (Some(a), Some(b)) = (boxes.get(from), boxes.get(to)) else {
			continue;
		};
		let Some(path) = edge_path(a, b, theme.edge.roundness) else {
			continue;
		};
		// Stop the stroke at the arrow's base so it does not poke through the tip.
		let (line_x, line_y) = (
			path.end.0 - path.dir.0 * scale.arrow_size,
			path.end.1 - path.dir.1 * scale.arrow_size,
		);
		ctx.begin_path();
		ctx.move_to(path.start.0, path.start.1);
		let _ = ctx.quadratic_curve_to(path.control.0, path.control.1, line_x, line_y);
		ctx.stroke();

		draw_arrow(ctx, path.end, path.dir, scale.arrow_size);
	}
}

fn draw_loops(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let r = theme.edge.loop_radius;
	for &idx in state.loops() {
		let Some(geom) = state.with_node(idx, BoxGeom::of) else {
			continue;
		};
		// Circle centred on the top-right corner, drawn over the outside quarter.
		let (cx, cy) = (geom.x + geom.hw, geom.y - geom.hh);
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, r, PI, PI / 2.0);
		ctx.stroke();
		draw_arrow(ctx, (cx, cy + r), (-1.0, 0.0), scale.arrow_size);
	}
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, tip: (f64, f64), dir: (f64, f64), size: f64) {
	let (ux, uy) = dir;
	let (back_x, back_y) = (tip.0 - ux * size, tip.1 - uy * size);
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);

	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let style = &theme.node;
	ctx.set_font(&style.font());
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let geom = BoxGeom::of(node);
		let (border, width) = if state.selected == Some(idx) {
			(style.border_selected, scale.border_width_selected)
		} else if state.hovered == Some(idx) {
			(style.border_hover, scale.border_width)
		} else {
			(style.border, scale.border_width)
		};

		trace_rounded_box(ctx, &geom, style.corner_radius);
		ctx.set_fill_style_str(&style.fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&border.to_css());
		ctx.set_line_width(width);
		ctx.stroke();

		if !scale.draw_labels {
			return;
		}
		ctx.set_fill_style_str(&style.text.to_css());
		let top = geom.y - geom.hh + style.margin;
		for (i, line) in node.data.user_data.lines.iter().enumerate() {
			let line_y = top + style.line_step() * (i as f64 + 0.5);
			let _ = ctx.fill_text(line, geom.x, line_y);
		}
	});
}

fn trace_rounded_box(ctx: &CanvasRenderingContext2d, geom: &BoxGeom, radius: f64) {
	let r = radius.min(geom.hw).min(geom.hh);
	let (left, top, right, bottom) = (geom.x - geom.hw, geom.y - geom.hh, geom.x + geom.hw, geom.y + geom.hh);
	ctx.begin_path();
	ctx.move_to(left + r, top);
	let _ = ctx.arc_to(right, top, right, bottom, r);
	let _ = ctx.arc_to(right, bottom, left, bottom, r);
	let _ = ctx.arc_to(left, bottom, left, top, r);
	let _ = ctx.arc_to(left, top, right, top, r);
	ctx.close_path();
}

/// Width of `text` in the context's current font.
pub fn measure(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
	ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (Some(text), Some((px, py))) = (state.hover_tooltip(), state.pointer) else {
		return;
	};
	let style = &theme.tooltip;
	ctx.set_font(&style.font());
	let lines = wrap_text(&text, style.max_width - 2.0 * style.padding, &mut |t: &str| measure(ctx, t));
	let text_width = lines.iter().map(|l| measure(ctx, l)).fold(0.0, f64::max);
	let line_step = style.font_size * 1.3;
	let (w, h) = (
		text_width + 2.0 * style.padding,
		lines.len() as f64 * line_step + 2.0 * style.padding,
	);
	let x = (px + style.offset).min(state.width - w).max(0.0);
	let y = (py + style.offset).min(state.height - h).max(0.0);

	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(x, y, w, h);
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, w, h);

	ctx.set_fill_style_str(&style.text.to_css());
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + style.padding, y + style.padding + i as f64 * line_step);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
	}

	#[test]
	fn exit_point_lies_on_box_border() {
		let geom = BoxGeom {
			x: 0.0,
			y: 0.0,
			hw: 50.0,
			hh: 20.0,
		};
		assert!(close(geom.exit(1.0, 0.0), (50.0, 0.0)));
		assert!(close(geom.exit(0.0, -1.0), (0.0, -20.0)));
		let d = std::f64::consts::FRAC_1_SQRT_2;
		assert!(close(geom.exit(d, d), (20.0, 20.0)));
	}

	#[test]
	fn straight_edge_runs_between_facing_sides() {
		let a = BoxGeom {
			x: 0.0,
			y: 0.0,
			hw: 30.0,
			hh: 15.0,
		};
		let b = BoxGeom { x: 200.0, ..a };
		let path = edge_path(&a, &b, 0.0).unwrap();

		assert!(close(path.start, (30.0, 0.0)));
		assert!(close(path.end, (170.0, 0.0)));
		assert!(close(path.dir, (1.0, 0.0)));
	}

	#[test]
	fn curve_bends_and_tracks_node_positions() {
		let a = BoxGeom {
			x: 0.0,
			y: 0.0,
			hw: 30.0,
			hh: 15.0,
		};
		let b = BoxGeom { x: 200.0, ..a };
		let path = edge_path(&a, &b, 0.25).unwrap();
		assert!(close(path.control, (100.0, 50.0)));
		assert!(path.dir.1 < 0.0);

		let moved = BoxGeom { y: 100.0, ..b };
		let again = edge_path(&a, &moved, 0.25).unwrap();
		assert_ne!(path.control, again.control);
	}

	#[test]
	fn reverse_edge_bends_to_the_other_side() {
		let a = BoxGeom {
			x: 0.0,
			y: 0.0,
			hw: 30.0,
			hh: 15.0,
		};
		let b = BoxGeom { x: 200.0, ..a };
		let forward = edge_path(&a, &b, 0.25).unwrap();
		let back = edge_path(&b, &a, 0.25).unwrap();
		assert!(forward.control.1 > 0.0 && back.control.1 < 0.0);
	}

	#[test]
	fn coincident_boxes_have_no_path() {
		let a = BoxGeom {
			x: 5.0,
			y: 5.0,
			hw: 10.0,
			hh: 10.0,
		};
		assert_eq!(edge_path(&a, &a, 0.25), None);
	}
}
