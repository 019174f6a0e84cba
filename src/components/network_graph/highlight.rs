//! Smoothed hover emphasis.
//!
//! The interaction layer decides *which* node is emphasised; this module
//! animates *how much*. The hovered node eases toward full emphasis (grows
//! and thickens its border) and its neighbours toward a lighter highlight,
//! while everything else eases back to zero. Exponential smoothing makes the
//! motion independent of frame rate.

use std::collections::{HashMap, HashSet};

/// Rate constants for `1 - e^(-rate * dt)`; ~200ms to 95% at these values.
const FADE_IN_RATE: f64 = 15.0;
const FADE_OUT_RATE: f64 = 12.0;
/// Intensities below this are dropped.
const VISIBLE: f64 = 0.005;

#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	hovered: Option<usize>,
	neighbors: HashSet<usize>,
	/// Emphasis of the hovered node (and of a node fading out after hover).
	hover: HashMap<usize, f64>,
	/// Highlight of hovered node plus neighbours.
	related: HashMap<usize, f64>,
	max_related: f64,
}

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<usize>, neighbors: impl IntoIterator<Item = usize>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.neighbors.clear();
		if let Some(idx) = node {
			self.neighbors.insert(idx);
			self.neighbors.extend(neighbors);
		}
	}

	/// Drop all state, e.g. when node indices are reassigned by a reload.
	pub fn clear(&mut self) {
		*self = Self::default();
	}

	pub fn tick(&mut self, dt: f64) {
		let rise = 1.0 - (-FADE_IN_RATE * dt).exp();
		let fall = (-FADE_OUT_RATE * dt).exp();

		if let Some(idx) = self.hovered {
			let v = self.hover.entry(idx).or_insert(0.0);
			*v += (1.0 - *v) * rise;
		}
		for &idx in &self.neighbors {
			let v = self.related.entry(idx).or_insert(0.0);
			*v += (1.0 - *v) * rise;
		}

		let hovered = self.hovered;
		self.hover.retain(|idx, v| {
			if Some(*idx) != hovered {
				*v *= fall;
			}
			*v > VISIBLE
		});

		let neighbors = &self.neighbors;
		let mut max: f64 = 0.0;
		self.related.retain(|idx, v| {
			if !neighbors.contains(idx) {
				*v *= fall;
			}
			let keep = *v > VISIBLE;
			if keep {
				max = max.max(*v);
			}
			keep
		});
		self.max_related = max;
	}

	/// Emphasis of the hovered node, in [0, 1].
	pub fn hover_intensity(&self, idx: usize) -> f64 {
		self.hover.get(&idx).copied().unwrap_or(0.0)
	}

	/// Highlight of a node as hovered-or-neighbour, in [0, 1].
	pub fn node_intensity(&self, idx: usize) -> f64 {
		self.related.get(&idx).copied().unwrap_or(0.0)
	}

	/// An edge is as highlighted as its dimmer endpoint.
	pub fn edge_intensity(&self, a: usize, b: usize) -> f64 {
		self.node_intensity(a).min(self.node_intensity(b))
	}

	/// Strongest current highlight; drives dimming of everything else.
	pub fn max_intensity(&self) -> f64 {
		self.max_related
	}

	/// Whether anything is still mid-transition.
	pub fn is_animating(&self) -> bool {
		let hover_settled = match self.hovered {
			Some(idx) => self.hover.len() == 1 && self.hover_intensity(idx) > 0.995,
			None => self.hover.is_empty(),
		};
		let related_settled = self.related.len() == self.neighbors.len()
			&& self.neighbors.iter().all(|&idx| self.node_intensity(idx) > 0.995);
		!(hover_settled && related_settled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FRAME: f64 = 1.0 / 60.0;

	#[test]
	fn hovered_node_and_neighbors_fade_in() {
		let mut state = HighlightState::default();
		state.set_hover(Some(0), [1]);
		for _ in 0..30 {
			state.tick(FRAME);
		}
		assert!(state.hover_intensity(0) > 0.99);
		assert_eq!(state.hover_intensity(1), 0.0);
		assert!(state.node_intensity(1) > 0.99);
		assert_eq!(state.node_intensity(2), 0.0);
		assert!(state.edge_intensity(0, 1) > 0.99);
		assert_eq!(state.edge_intensity(0, 2), 0.0);
		assert!(!state.is_animating());
	}

	#[test]
	fn leaving_fades_out_and_forgets() {
		let mut state = HighlightState::default();
		state.set_hover(Some(3), []);
		state.tick(FRAME);
		let partial = state.hover_intensity(3);
		assert!(partial > 0.0 && partial < 1.0);
		assert!(state.is_animating());

		state.set_hover(None, []);
		for _ in 0..120 {
			state.tick(FRAME);
		}
		assert_eq!(state.hover_intensity(3), 0.0);
		assert_eq!(state.max_intensity(), 0.0);
		assert!(!state.is_animating());
	}

	#[test]
	fn idle_state_is_not_animating() {
		assert!(!HighlightState::default().is_animating());
	}
}
