//! Tuning knobs for the graph component.
//!
//! Every section has sensible defaults and may be overridden, in whole or in
//! part, by a `"config"` object in the embedded dataset.

use serde::Deserialize;

use super::engine::SimulationConfig;
use super::interaction::InteractionConfig;
use super::scale::ScaleConfig;
use super::viewport::ViewportConfig;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub viewport: ViewportConfig,
	pub interaction: InteractionConfig,
	pub scale: ScaleConfig,
}

/// Put a user-supplied `(min, max)` pair in order. Falls back to `default`
/// when either bound is not finite.
pub(crate) fn ordered_range(range: (f64, f64), default: (f64, f64)) -> (f64, f64) {
	let (a, b) = range;
	if a.is_finite() && b.is_finite() {
		(a.min(b), a.max(b))
	} else {
		default
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ranges_are_ordered_or_replaced() {
		assert_eq!(ordered_range((2.0, 0.5), (0.0, 1.0)), (0.5, 2.0));
		assert_eq!(ordered_range((0.5, 2.0), (0.0, 1.0)), (0.5, 2.0));
		assert_eq!(ordered_range((f64::NAN, 2.0), (0.0, 1.0)), (0.0, 1.0));
	}

	#[test]
	fn partial_override_keeps_remaining_defaults() {
		let config: GraphConfig = serde_json::from_str(
			r#"{ "simulation": { "linkDistance": 140 }, "viewport": { "maxScale": 5 } }"#,
		)
		.unwrap();

		assert_eq!(config.simulation.link_distance, 140.0);
		assert_eq!(
			config.simulation.repulsion_strength,
			SimulationConfig::default().repulsion_strength
		);
		assert_eq!(config.viewport.max_scale, 5.0);
		assert_eq!(config.viewport.min_scale, ViewportConfig::default().min_scale);
		assert_eq!(config.interaction, InteractionConfig::default());
		assert_eq!(config.scale, ScaleConfig::default());
	}
}
