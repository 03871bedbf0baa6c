//! Fixed visual theme: dark boxes, accent borders and edges, light text.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
}

/// Box node appearance. Sizes are in world units.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	pub border: Color,
	/// Border of the clicked node
	pub border_selected: Color,
	/// Border of the node under the pointer
	pub border_hover: Color,
	pub text: Color,
	pub border_width: f64,
	pub border_width_selected: f64,
	pub corner_radius: f64,
	/// Padding between the label and the box edge
	pub margin: f64,
	/// Maximum box width; longer labels wrap
	pub max_width: f64,
	pub font_size: f64,
	/// Line height as a multiple of the font size
	pub line_height: f64,
}

impl NodeStyle {
	pub fn font(&self) -> String {
		format!("{}px sans-serif", self.font_size)
	}

	/// Widest a single label line may be.
	pub fn max_text_width(&self) -> f64 {
		self.max_width - 2.0 * self.margin
	}

	pub fn line_step(&self) -> f64 {
		self.font_size * self.line_height
	}
}

/// Edge appearance.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub width: f64,
	/// Full arrowhead length before `arrow_scale` is applied
	pub arrow_length: f64,
	pub arrow_scale: f64,
	/// Bend of the dynamic curve relative to the edge length (0.0 = straight)
	pub roundness: f64,
	/// Radius of the loop drawn for self-referencing edges
	pub loop_radius: f64,
}

impl EdgeStyle {
	pub fn arrow_size(&self) -> f64 {
		self.arrow_length * self.arrow_scale
	}
}

/// Hover tooltip appearance, in screen pixels.
#[derive(Clone, Debug)]
pub struct TooltipStyle {
	pub background: Color,
	pub border: Color,
	pub text: Color,
	pub font_size: f64,
	pub padding: f64,
	pub max_width: f64,
	/// Distance between the pointer and the tooltip corner
	pub offset: f64,
}

impl TooltipStyle {
	pub fn font(&self) -> String {
		format!("{}px sans-serif", self.font_size)
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
	pub tooltip: TooltipStyle,
}

impl Default for Theme {
	fn default() -> Self {
		let accent = Color::rgb(59, 130, 246);
		Self {
			background: BackgroundStyle {
				color: Color::rgb(17, 24, 39),
			},
			node: NodeStyle {
				fill: Color::rgb(31, 41, 55),
				border: accent,
				border_selected: accent.lighten(0.5),
				border_hover: accent.lighten(0.25),
				text: Color::rgb(255, 255, 255),
				border_width: 1.0,
				border_width_selected: 2.0,
				corner_radius: 4.0,
				margin: 10.0,
				max_width: 200.0,
				font_size: 14.0,
				line_height: 1.2,
			},
			edge: EdgeStyle {
				color: accent,
				width: 1.0,
				arrow_length: 15.0,
				arrow_scale: 0.5,
				roundness: 0.25,
				loop_radius: 12.0,
			},
			tooltip: TooltipStyle {
				background: Color::rgb(55, 65, 81),
				border: Color::rgba(255, 255, 255, 0.2),
				text: Color::rgb(229, 231, 235),
				font_size: 12.0,
				padding: 6.0,
				max_width: 300.0,
				offset: 12.0,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn theme_uses_dark_fill_and_accent() {
		let theme = Theme::default();
		assert_eq!(theme.node.fill.to_css(), "#1f2937");
		assert_eq!(theme.node.border.to_css(), "#3b82f6");
		assert_eq!(theme.edge.color.to_css(), "#3b82f6");
		assert_eq!(theme.node.text.to_css(), "#ffffff");
		assert_eq!(theme.edge.arrow_size(), 7.5);
	}

	#[test]
	fn translucent_colors_use_rgba() {
		assert_eq!(Color::rgba(10, 20, 30, 0.5).to_css(), "rgba(10, 20, 30, 0.5)");
	}
}
