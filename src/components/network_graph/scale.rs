//! Size and zoom-dependent scaling for graph visuals.
//!
//! Two concerns live here:
//!
//! - **Magnitude scaling**: how an entity's value maps to a radius and how a
//!   relationship's weight maps to a stroke width. Both use a square-root
//!   curve so large values stay readable without swamping the canvas.
//! - **Zoom scaling**: how decorations (labels, rings, hit zones) behave as
//!   the view zoom `k` changes.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: simulation coordinates. Sizes here grow with zoom.
//! - **Screen-space**: canvas pixels. Sizes here stay fixed under zoom.

use serde::Deserialize;

/// Square-root scale: `base + sqrt(value / unit)`.
///
/// Monotonic and sub-linear: doubling `value` never doubles the output.
/// Fields missing from an override take the node radius defaults.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MagnitudeScale {
	pub base: f64,
	pub unit: f64,
}

impl Default for MagnitudeScale {
	fn default() -> Self {
		Self {
			base: 10.0,
			unit: 1000.0,
		}
	}
}

impl MagnitudeScale {
	pub fn apply(&self, value: f64) -> f64 {
		let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
		let unit = if self.unit > 0.0 { self.unit } else { 1.0 };
		self.base + (value / unit).sqrt()
	}
}

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	/// Bounds given in either order.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				let lo = min_screen.min(*max_screen) / k;
				let hi = min_screen.max(*max_screen) / k;
				base.max(lo).min(hi)
			}
		}
	}
}

/// Defines how opacity responds to zoom level.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum AlphaBehavior {
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade { zero_alpha_k: f64, full_alpha_k: f64 },
}

impl AlphaBehavior {
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

/// Visual scale configuration for all graph elements.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleConfig {
	/// Entity magnitude to node radius (world units).
	pub node_radius: MagnitudeScale,
	/// Relationship weight to stroke width (world units).
	pub edge_width: MagnitudeScale,
	/// Extra radius on the emphasised node.
	pub hover_growth: f64,
	/// Category border width, normal and emphasised.
	pub border_width: f64,
	pub hover_border_width: f64,
	pub border_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Labels stop shrinking below this zoom.
	pub label_min_k: f64,
	pub label_alpha: AlphaBehavior,
	/// Risk badge radius (world units).
	pub badge_radius: f64,
	/// Selection ring width and gap, screen pixels.
	pub ring_width: f64,
	pub ring_offset: f64,
	/// Dash pattern (dash, gap) for suspicious edges, world units.
	pub dash_pattern: (f64, f64),
	/// Flow animation speed, world units per second.
	pub flow_speed: f64,
	pub dash_alpha: AlphaBehavior,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: MagnitudeScale::default(),
			edge_width: MagnitudeScale {
				base: 1.0,
				unit: 10_000.0,
			},
			hover_growth: 5.0,
			border_width: 3.0,
			hover_border_width: 5.0,
			border_behavior: ScaleBehavior::Clamped {
				min_screen: 1.0,
				max_screen: 8.0,
			},
			label_size: 10.0,
			label_min_k: 0.5,
			label_alpha: AlphaBehavior::Fade {
				zero_alpha_k: 0.25,
				full_alpha_k: 0.5,
			},
			badge_radius: 5.0,
			ring_width: 2.0,
			ring_offset: 4.0,
			dash_pattern: (8.0, 4.0),
			flow_speed: 12.0,
			dash_alpha: AlphaBehavior::Fade {
				zero_alpha_k: 0.3,
				full_alpha_k: 0.7,
			},
		}
	}
}

/// Pre-computed values for one zoom level. Build once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub border_width: f64,
	pub hover_border_width: f64,
	pub label_font: String,
	pub label_alpha: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
	pub dash_pattern: (f64, f64),
	/// Dash visibility [0, 1]. At 0 suspicious edges draw solid.
	pub dash_alpha: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.label_size / k.max(config.label_min_k);

		Self {
			k,
			border_width: config.border_behavior.apply(config.border_width, k),
			hover_border_width: config.border_behavior.apply(config.hover_border_width, k),
			label_font: format!("bold {}px sans-serif", label_font_size),
			label_alpha: config.label_alpha.apply(k),
			ring_width: ScaleBehavior::Screen.apply(config.ring_width, k),
			ring_offset: ScaleBehavior::Screen.apply(config.ring_offset, k),
			dash_pattern: config.dash_pattern,
			dash_alpha: config.dash_alpha.apply(k),
		}
	}

	/// Dash offset for the flow animation on suspicious edges.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_radius_matches_dashboard_formula() {
		let scale = ScaleConfig::default().node_radius;
		assert_eq!(scale.apply(0.0), 10.0);
		assert_eq!(scale.apply(100_000.0), 20.0);
	}

	#[test]
	fn radius_is_monotonic_and_sublinear() {
		let scale = ScaleConfig::default().node_radius;
		let magnitudes = [0.0, 1.0, 500.0, 45_000.0, 150_000.0, 890_000.0, 1e9];
		for pair in magnitudes.windows(2) {
			assert!(scale.apply(pair[0]) <= scale.apply(pair[1]));
		}
		for m in [1.0, 1_000.0, 150_000.0, 1e9] {
			assert!(scale.apply(2.0 * m) / scale.apply(m) < 2.0);
		}
	}

	#[test]
	fn bad_magnitudes_fall_back_to_base() {
		let scale = ScaleConfig::default().edge_width;
		assert_eq!(scale.apply(-5.0), 1.0);
		assert_eq!(scale.apply(f64::NAN), 1.0);
	}

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 1.0,
			max_screen: 8.0,
		};
		// 3 world units at k=10 would be 30px on screen.
		assert_eq!(behavior.apply(3.0, 10.0), 0.8);
		assert_eq!(behavior.apply(3.0, 1.0), 3.0);
		assert_eq!(behavior.apply(3.0, 0.25), 4.0);
	}

	#[test]
	fn dash_fades_out_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 1.0).dash_alpha, 1.0);
		assert_eq!(ScaledValues::new(&config, 0.2).dash_alpha, 0.0);
	}

	#[test]
	fn inverted_clamp_bounds_are_reordered() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 8.0,
			max_screen: 1.0,
		};
		assert_eq!(behavior.apply(3.0, 10.0), 0.8);
		assert_eq!(behavior.apply(3.0, 1.0), 3.0);
		assert_eq!(behavior.apply(3.0, 0.25), 4.0);
	}

	#[test]
	fn partial_overrides_keep_remaining_defaults() {
		let config: ScaleConfig = serde_json::from_str(r#"{"nodeRadius":{"base":5}}"#).unwrap();
		assert_eq!(config.node_radius.base, 5.0);
		assert_eq!(config.node_radius.unit, 1000.0);
		assert_eq!(config.edge_width, ScaleConfig::default().edge_width);

		let config: ScaleConfig = serde_json::from_str(
			r#"{
				"borderBehavior": {"Clamped": {"minScreen": 2, "maxScreen": 6}},
				"labelAlpha": {"Fade": {"zeroAlphaK": 0.1, "fullAlphaK": 0.4}}
			}"#,
		)
		.unwrap();
		assert_eq!(
			config.border_behavior,
			ScaleBehavior::Clamped {
				min_screen: 2.0,
				max_screen: 6.0,
			}
		);
		assert_eq!(config.label_alpha.apply(0.4), 1.0);
	}
}
