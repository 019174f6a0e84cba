//! Visual theming for the entity graph.
//!
//! Fill colour encodes risk, border colour encodes category and stroke
//! colour encodes relationship classification. The light theme matches the
//! investigation dashboard; the dark theme is for dimmed rooms and demos.

use super::types::{Category, Classification, RiskLevel};

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
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

/// Fill colours per risk level.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskPalette {
	pub low: Color,
	pub medium: Color,
	pub high: Color,
	pub critical: Color,
}

/// Border colours per entity category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPalette {
	pub wallet: Color,
	pub exchange: Color,
	pub mixer: Color,
	pub contract: Color,
	pub defi: Color,
}

/// Relationship stroke style.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub normal: Color,
	pub suspicious: Color,
	pub high_volume: Color,
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Centre colour when `use_gradient` is set.
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Node decoration style.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Whether nodes have a soft inner gradient.
	pub use_gradient: bool,
	pub label: Color,
	/// Risk badge fill and outline.
	pub badge: Color,
	pub badge_border: Color,
	pub selection_ring: Color,
	/// Opacity of unrelated nodes while something is hovered.
	pub dimmed_alpha: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub risk: RiskPalette,
	pub category: CategoryPalette,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
}

impl Theme {
	fn risk_palette() -> RiskPalette {
		RiskPalette {
			low: Color::rgb(16, 185, 129),
			medium: Color::rgb(245, 158, 11),
			high: Color::rgb(239, 68, 68),
			critical: Color::rgb(220, 38, 38),
		}
	}

	fn category_palette() -> CategoryPalette {
		CategoryPalette {
			wallet: Color::rgb(59, 130, 246),
			exchange: Color::rgb(16, 185, 129),
			mixer: Color::rgb(239, 68, 68),
			contract: Color::rgb(139, 92, 246),
			defi: Color::rgb(6, 182, 212),
		}
	}

	/// Dashboard look: white canvas, pale strokes.
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: false,
			},
			risk: Self::risk_palette(),
			category: Self::category_palette(),
			edge: EdgeStyle {
				normal: Color::rgb(229, 231, 235),
				suspicious: Color::rgb(252, 165, 165),
				high_volume: Color::rgb(147, 197, 253),
				opacity: 0.6,
			},
			node: NodeStyle {
				use_gradient: false,
				label: Color::rgb(255, 255, 255),
				badge: Color::rgb(239, 68, 68),
				badge_border: Color::rgb(255, 255, 255),
				selection_ring: Color::rgb(37, 99, 235),
				dimmed_alpha: 0.35,
			},
		}
	}

	/// Dark canvas with a soft radial gradient.
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: BackgroundStyle {
				color: Color::rgb(17, 24, 39),
				color_secondary: Color::rgb(31, 41, 55),
				use_gradient: true,
			},
			risk: Self::risk_palette(),
			category: Self::category_palette(),
			edge: EdgeStyle {
				normal: Color::rgb(107, 114, 128),
				suspicious: Color::rgb(248, 113, 113),
				high_volume: Color::rgb(96, 165, 250),
				opacity: 0.7,
			},
			node: NodeStyle {
				use_gradient: true,
				label: Color::rgb(255, 255, 255),
				badge: Color::rgb(239, 68, 68),
				badge_border: Color::rgb(17, 24, 39),
				selection_ring: Color::rgb(250, 204, 21),
				dimmed_alpha: 0.3,
			},
		}
	}

	pub fn risk_color(&self, risk: RiskLevel) -> Color {
		match risk {
			RiskLevel::Low => self.risk.low,
			RiskLevel::Medium => self.risk.medium,
			RiskLevel::High => self.risk.high,
			RiskLevel::Critical => self.risk.critical,
		}
	}

	pub fn category_color(&self, category: Category) -> Color {
		match category {
			Category::Wallet => self.category.wallet,
			Category::Exchange => self.category.exchange,
			Category::Mixer => self.category.mixer,
			Category::Contract => self.category.contract,
			Category::DefiProtocol => self.category.defi,
		}
	}

	pub fn edge_color(&self, classification: Classification) -> Color {
		match classification {
			Classification::Normal => self.edge.normal,
			Classification::Suspicious => self.edge.suspicious,
			Classification::HighVolume => self.edge.high_volume,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
