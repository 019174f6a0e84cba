//! Per-canvas state driven by the frame loop.
//!
//! Owns the layout engine, viewport, gesture state machine and hover
//! animation, and keeps them consistent across reloads and pointer events.

use super::config::GraphConfig;
use super::engine::{Bounds, GraphLayoutEngine};
use super::filter::Subgraph;
use super::highlight::HighlightState;
use super::interaction::{InteractionEvent, InteractionLayer, PointerState};
use super::types::{Classification, Entity};
use super::viewport::{ViewportCommand, ViewportController};

pub struct NetworkGraphState {
	pub engine: GraphLayoutEngine,
	pub viewport: ViewportController,
	pub interaction: InteractionLayer,
	pub highlight: HighlightState,
	/// Entity shown in the details panel, drawn with a ring.
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
	/// Seconds of dash animation on suspicious edges.
	pub flow_time: f64,
	flowing: bool,
	dirty: bool,
}

impl NetworkGraphState {
	pub fn new(config: &GraphConfig, width: f64, height: f64) -> Self {
		Self {
			engine: GraphLayoutEngine::new(config.simulation.clone(), config.scale.node_radius),
			viewport: ViewportController::new(config.viewport.clone(), width, height),
			interaction: InteractionLayer::new(config.interaction.clone()),
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
			flow_time: 0.0,
			flowing: false,
			dirty: true,
		}
	}

	/// Replace the visible subgraph. Surviving nodes keep their place.
	pub fn load(&mut self, subgraph: &Subgraph) {
		self.engine.initialize(
			&subgraph.nodes,
			&subgraph.edges,
			Bounds::new(self.width, self.height),
		);
		self.interaction.retain_known(&self.engine);
		self.highlight.clear();
		self.sync_hover();
		if self
			.selected
			.as_deref()
			.is_some_and(|id| self.engine.node(id).is_none())
		{
			self.selected = None;
		}
		self.flowing = self
			.engine
			.edges()
			.iter()
			.any(|e| e.relationship.classification == Classification::Suspicious);
		self.dirty = true;
	}

	pub fn tick(&mut self, dt: f64) {
		if self.engine.is_active() {
			self.engine.step();
		}
		self.highlight.tick(dt);
		if self.flowing {
			self.flow_time += dt;
		}
	}

	/// Whether the next frame differs from the last one drawn.
	pub fn needs_redraw(&self) -> bool {
		self.dirty || self.flowing || self.engine.is_active() || self.highlight.is_animating()
	}

	pub fn mark_drawn(&mut self) {
		self.dirty = false;
	}

	/// Force a redraw, e.g. after a theme change.
	pub fn invalidate(&mut self) {
		self.dirty = true;
	}

	pub fn pointer_down(&mut self, screen: (f64, f64)) {
		self.interaction
			.pointer_down(screen, &mut self.engine, &self.viewport);
		self.dirty = true;
	}

	pub fn pointer_move(&mut self, screen: (f64, f64)) -> Option<InteractionEvent> {
		let event = self
			.interaction
			.pointer_move(screen, &mut self.engine, &mut self.viewport);
		if matches!(event, Some(InteractionEvent::HoverChanged(_))) {
			self.sync_hover();
		}
		if *self.interaction.state() != PointerState::Idle {
			self.dirty = true;
		}
		event
	}

	/// Finish the gesture, returning the entity if it was a click on a node.
	pub fn pointer_up(&mut self) -> Option<Entity> {
		self.dirty = true;
		match self.interaction.pointer_up(&mut self.engine)? {
			InteractionEvent::NodeSelected(entity) => {
				self.selected = Some(entity.id.clone());
				Some(entity)
			}
			InteractionEvent::HoverChanged(_) => None,
		}
	}

	pub fn pointer_leave(&mut self) {
		if self.interaction.pointer_leave(&mut self.engine).is_some() {
			self.sync_hover();
		}
		self.dirty = true;
	}

	pub fn wheel(&mut self, screen: (f64, f64), delta_y: f64) {
		self.interaction.wheel(screen, delta_y, &mut self.viewport);
		self.dirty = true;
	}

	pub fn apply(&mut self, command: ViewportCommand) {
		self.viewport.apply(command);
		self.dirty = true;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.engine.resize(Bounds::new(width, height));
		self.viewport.resize(width, height);
		self.dirty = true;
	}

	/// CSS cursor for the current gesture and hover.
	pub fn cursor(&self) -> &'static str {
		match self.interaction.state() {
			PointerState::Idle if self.interaction.hovered().is_some() => "pointer",
			PointerState::Idle => "grab",
			_ => "grabbing",
		}
	}

	fn sync_hover(&mut self) {
		let idx = self
			.interaction
			.hovered()
			.and_then(|id| self.engine.index_of(id));
		let neighbors: Vec<usize> = idx
			.map(|i| self.engine.neighbors(i).collect())
			.unwrap_or_default();
		self.highlight.set_hover(idx, neighbors);
	}
}
