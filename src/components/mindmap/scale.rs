//! Zoom-dependent scaling of strokes and labels.
//!
//! The canvas is drawn in world space under a pan/zoom transform, so most
//! geometry simply scales with zoom. Strokes get a minimum screen width so
//! they stay visible when zoomed far out, and labels are skipped once they
//! would be too small to read.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				base.clamp(min_screen / k, max_screen / k)
			}
		}
	}
}

/// Scaling rules for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub border: ScaleBehavior,
	pub edge: ScaleBehavior,
	pub arrow: ScaleBehavior,
	/// Smallest on-screen font size (pixels) at which labels are drawn.
	pub label_draw_threshold: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			border: ScaleBehavior::Clamped {
				min_screen: 0.75,
				max_screen: f64::INFINITY,
			},
			edge: ScaleBehavior::Clamped {
				min_screen: 0.5,
				max_screen: 6.0,
			},
			arrow: ScaleBehavior::World,
			label_draw_threshold: 5.0,
		}
	}
}

/// Pre-computed values for one frame at zoom level `k`, in world units.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub border_width: f64,
	pub border_width_selected: f64,
	pub edge_width: f64,
	pub arrow_size: f64,
	pub draw_labels: bool,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, theme: &super::theme::Theme, k: f64) -> Self {
		Self {
			border_width: config.border.apply(theme.node.border_width, k),
			border_width_selected: config.border.apply(theme.node.border_width_selected, k),
			edge_width: config.edge.apply(theme.edge.width, k),
			arrow_size: config.arrow.apply(theme.edge.arrow_size(), k),
			draw_labels: theme.node.font_size * k >= config.label_draw_threshold,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::theme::Theme;

	#[test]
	fn strokes_keep_minimum_screen_width() {
		let config = ScaleConfig::default();
		let theme = Theme::default();

		let near = ScaledValues::new(&config, &theme, 1.0);
		assert_eq!(near.edge_width, 1.0);

		let far = ScaledValues::new(&config, &theme, 0.1);
		assert!((far.edge_width * 0.1 - 0.5).abs() < 1e-9);
	}

	#[test]
	fn labels_hidden_when_too_small() {
		let config = ScaleConfig::default();
		let theme = Theme::default();

		assert!(ScaledValues::new(&config, &theme, 1.0).draw_labels);
		assert!(!ScaledValues::new(&config, &theme, 0.3).draw_labels);
	}

	#[test]
	fn world_behavior_ignores_zoom() {
		assert_eq!(ScaleBehavior::World.apply(3.0, 0.2), 3.0);
	}
}
