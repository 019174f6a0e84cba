//! Pointer gesture state machine.
//!
//! Turns raw canvas pointer events into layout and viewport operations:
//!
//! ```text
//! Idle --down on node--> DraggingNode --up--> Idle   (pin ... unpin)
//! Idle --down on canvas--> PanningBackground --up--> Idle
//! ```
//!
//! A press that never travels `click_threshold` pixels is a click; releasing
//! it on a node emits [`InteractionEvent::NodeSelected`]. Wheel events zoom
//! without changing state, and pointer moves while idle drive hover emphasis.

use std::mem;

use serde::Deserialize;

use super::engine::GraphLayoutEngine;
use super::types::Entity;
use super::viewport::ViewportController;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
	/// Pointer travel (screen pixels) that turns a press into a drag.
	pub click_threshold: f64,
	/// Extra pointer slop around nodes, screen pixels.
	pub hit_padding: f64,
	pub zoom_on_wheel: bool,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			click_threshold: 4.0,
			hit_padding: 3.0,
			zoom_on_wheel: true,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerState {
	#[default]
	Idle,
	DraggingNode {
		node_id: String,
		/// Screen point where the press started.
		origin: (f64, f64),
		/// Node centre minus the world point that was grabbed.
		grab_offset: (f64, f64),
		dragged: bool,
	},
	PanningBackground {
		origin: (f64, f64),
		last: (f64, f64),
		dragged: bool,
	},
}

/// Something the host page may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
	NodeSelected(Entity),
	HoverChanged(Option<String>),
}

#[derive(Default)]
pub struct InteractionLayer {
	config: InteractionConfig,
	state: PointerState,
	hovered: Option<String>,
}

impl InteractionLayer {
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn state(&self) -> &PointerState {
		&self.state
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	pub fn is_emphasized(&self, id: &str) -> bool {
		self.hovered.as_deref() == Some(id)
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.state, PointerState::DraggingNode { dragged: true, .. })
	}

	fn hit(
		&self,
		screen: (f64, f64),
		engine: &GraphLayoutEngine,
		viewport: &ViewportController,
	) -> Option<usize> {
		let (wx, wy) = viewport.screen_to_world(screen.0, screen.1);
		engine.node_at(wx, wy, self.config.hit_padding / viewport.scale())
	}

	pub fn pointer_down(
		&mut self,
		screen: (f64, f64),
		engine: &mut GraphLayoutEngine,
		viewport: &ViewportController,
	) {
		// A previous gesture whose release never arrived.
		self.finish_gesture(engine);

		self.state = match self.hit(screen, engine, viewport) {
			Some(idx) => {
				let node = &engine.nodes()[idx];
				let node_id = node.entity.id.clone();
				let (nx, ny) = node.position();
				let (wx, wy) = viewport.screen_to_world(screen.0, screen.1);
				engine.pin(&node_id, (nx, ny));
				PointerState::DraggingNode {
					node_id,
					origin: screen,
					grab_offset: (nx - wx, ny - wy),
					dragged: false,
				}
			}
			None => PointerState::PanningBackground {
				origin: screen,
				last: screen,
				dragged: false,
			},
		};
	}

	pub fn pointer_move(
		&mut self,
		screen: (f64, f64),
		engine: &mut GraphLayoutEngine,
		viewport: &mut ViewportController,
	) -> Option<InteractionEvent> {
		if self.state == PointerState::Idle {
			let hit = self
				.hit(screen, engine, viewport)
				.map(|idx| engine.nodes()[idx].entity.id.clone());
			if hit == self.hovered {
				return None;
			}
			self.hovered = hit.clone();
			return Some(InteractionEvent::HoverChanged(hit));
		}

		let threshold = self.config.click_threshold;
		match &mut self.state {
			PointerState::Idle => {}
			PointerState::DraggingNode {
				node_id,
				origin,
				grab_offset,
				dragged,
			} => {
				*dragged |= travelled(*origin, screen) >= threshold;
				if *dragged {
					let (wx, wy) = viewport.screen_to_world(screen.0, screen.1);
					engine.pin(node_id.as_str(), (wx + grab_offset.0, wy + grab_offset.1));
				}
			}
			PointerState::PanningBackground {
				origin,
				last,
				dragged,
			} => {
				*dragged |= travelled(*origin, screen) >= threshold;
				viewport.pan_by(screen.0 - last.0, screen.1 - last.1);
				*last = screen;
			}
		}
		None
	}

	/// End the gesture. A node press that never became a drag selects it.
	pub fn pointer_up(&mut self, engine: &mut GraphLayoutEngine) -> Option<InteractionEvent> {
		match mem::take(&mut self.state) {
			PointerState::DraggingNode {
				node_id, dragged, ..
			} => {
				engine.unpin(&node_id);
				if dragged {
					None
				} else {
					engine
						.node(&node_id)
						.map(|node| InteractionEvent::NodeSelected(node.entity.clone()))
				}
			}
			PointerState::Idle | PointerState::PanningBackground { .. } => None,
		}
	}

	/// The pointer left the surface: finish any gesture without selecting
	/// and drop hover emphasis.
	pub fn pointer_leave(&mut self, engine: &mut GraphLayoutEngine) -> Option<InteractionEvent> {
		self.finish_gesture(engine);
		self.hovered
			.take()
			.map(|_| InteractionEvent::HoverChanged(None))
	}

	pub fn wheel(&mut self, screen: (f64, f64), delta_y: f64, viewport: &mut ViewportController) {
		if self.config.zoom_on_wheel {
			viewport.wheel(screen, delta_y);
		}
	}

	/// Forget gesture and hover targets that vanished after a reload.
	pub fn retain_known(&mut self, engine: &GraphLayoutEngine) {
		if let PointerState::DraggingNode { node_id, .. } = &self.state {
			if engine.node(node_id).is_none() {
				self.state = PointerState::Idle;
			}
		}
		if self.hovered.as_deref().is_some_and(|id| engine.node(id).is_none()) {
			self.hovered = None;
		}
	}

	fn finish_gesture(&mut self, engine: &mut GraphLayoutEngine) {
		if let PointerState::DraggingNode { node_id, .. } = mem::take(&mut self.state) {
			engine.unpin(&node_id);
		}
	}
}

fn travelled(from: (f64, f64), to: (f64, f64)) -> f64 {
	((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::engine::{Bounds, SimulationConfig};
	use crate::components::network_graph::scale::ScaleConfig;
	use crate::components::network_graph::types::{Category, RiskLevel};
	use crate::components::network_graph::viewport::ViewportConfig;

	struct Fixture {
		engine: GraphLayoutEngine,
		viewport: ViewportController,
		layer: InteractionLayer,
	}

	/// Two nodes: "a" at (100, 100) and "b" at (300, 100).
	fn fixture() -> Fixture {
		let place = |id: &str, x: f64| {
			let mut e = Entity::new(id, id, Category::Wallet, RiskLevel::Medium, 0.0);
			(e.x, e.y) = (Some(x), Some(100.0));
			e
		};
		let mut engine =
			GraphLayoutEngine::new(SimulationConfig::default(), ScaleConfig::default().node_radius);
		engine.initialize(&[place("a", 100.0), place("b", 300.0)], &[], Bounds::new(400.0, 200.0));
		Fixture {
			engine,
			viewport: ViewportController::new(ViewportConfig::default(), 400.0, 200.0),
			layer: InteractionLayer::new(InteractionConfig::default()),
		}
	}

	impl Fixture {
		fn down(&mut self, at: (f64, f64)) {
			self.layer.pointer_down(at, &mut self.engine, &self.viewport);
		}

		fn drag_to(&mut self, at: (f64, f64)) -> Option<InteractionEvent> {
			self.layer.pointer_move(at, &mut self.engine, &mut self.viewport)
		}

		fn up(&mut self) -> Option<InteractionEvent> {
			self.layer.pointer_up(&mut self.engine)
		}
	}

	#[test]
	fn click_on_node_selects_it() {
		let mut f = fixture();
		f.down((102.0, 101.0));
		assert!(matches!(f.layer.state(), PointerState::DraggingNode { .. }));
		assert_eq!(f.engine.node("a").unwrap().pinned(), Some((100.0, 100.0)));

		// Jitter under the threshold is still a click.
		assert_eq!(f.drag_to((104.0, 102.0)), None);
		match f.up() {
			Some(InteractionEvent::NodeSelected(entity)) => assert_eq!(entity.id, "a"),
			other => panic!("expected selection, got {other:?}"),
		}
		assert_eq!(f.layer.state(), &PointerState::Idle);
		assert!(f.engine.node("a").unwrap().pinned().is_none());
	}

	#[test]
	fn dragging_moves_pin_and_suppresses_click() {
		let mut f = fixture();
		f.down((105.0, 100.0));
		f.drag_to((155.0, 140.0));
		assert!(f.layer.is_dragging());
		// Grabbed 5px right of centre; the offset is kept.
		assert_eq!(f.engine.node("a").unwrap().pinned(), Some((150.0, 140.0)));

		f.engine.step();
		assert_eq!(f.engine.position("a"), Some((150.0, 140.0)));

		assert_eq!(f.up(), None);
		assert!(f.engine.node("a").unwrap().pinned().is_none());
		assert_eq!(f.engine.position("a"), Some((150.0, 140.0)));
	}

	#[test]
	fn drag_distance_accounts_for_zoom() {
		let mut f = fixture();
		f.viewport.zoom_at((0.0, 0.0), 2.0);
		f.down((200.0, 200.0));
		f.drag_to((220.0, 200.0));
		assert_eq!(f.engine.node("a").unwrap().pinned(), Some((110.0, 100.0)));
		f.up();
	}

	#[test]
	fn pressing_a_node_reheats_a_settled_layout() {
		let mut f = fixture();
		while f.engine.is_active() {
			f.engine.step();
		}
		let (x, y) = f.engine.position("b").unwrap();
		f.down((x, y));
		assert!(f.engine.is_active());
		f.up();
	}

	#[test]
	fn background_drag_pans() {
		let mut f = fixture();
		f.down((200.0, 180.0));
		assert!(matches!(f.layer.state(), PointerState::PanningBackground { .. }));
		f.drag_to((210.0, 170.0));
		f.drag_to((230.0, 175.0));
		let t = f.viewport.transform();
		assert_eq!((t.x, t.y), (30.0, -5.0));

		assert_eq!(f.up(), None);
		assert_eq!(f.layer.state(), &PointerState::Idle);
	}

	#[test]
	fn leaving_mid_drag_releases_without_selecting() {
		let mut f = fixture();
		f.down((100.0, 100.0));
		assert_eq!(f.layer.pointer_leave(&mut f.engine), None);
		assert_eq!(f.layer.state(), &PointerState::Idle);
		assert!(f.engine.node("a").unwrap().pinned().is_none());
		assert_eq!(f.up(), None);
	}

	#[test]
	fn hover_reports_changes_only() {
		let mut f = fixture();
		assert_eq!(
			f.drag_to((300.0, 100.0)),
			Some(InteractionEvent::HoverChanged(Some("b".into())))
		);
		assert_eq!(f.drag_to((301.0, 100.0)), None);
		assert!(f.layer.is_emphasized("b"));

		assert_eq!(
			f.drag_to((200.0, 100.0)),
			Some(InteractionEvent::HoverChanged(None))
		);
		f.drag_to((100.0, 100.0));
		assert_eq!(
			f.layer.pointer_leave(&mut f.engine),
			Some(InteractionEvent::HoverChanged(None))
		);
		assert_eq!(f.layer.hovered(), None);
	}

	#[test]
	fn wheel_zooms_without_changing_state() {
		let mut f = fixture();
		f.layer.wheel((200.0, 100.0), -120.0, &mut f.viewport);
		assert!(f.viewport.scale() > 1.0);
		assert_eq!(f.layer.state(), &PointerState::Idle);
	}

	#[test]
	fn reload_forgets_vanished_targets() {
		let mut f = fixture();
		f.drag_to((300.0, 100.0));
		f.down((300.0, 100.0));

		let only_a = [f.engine.node("a").unwrap().entity.clone()];
		f.engine.initialize(&only_a, &[], Bounds::new(400.0, 200.0));
		f.layer.retain_known(&f.engine);

		assert_eq!(f.layer.state(), &PointerState::Idle);
		assert_eq!(f.layer.hovered(), None);
	}
}
