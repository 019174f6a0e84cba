//! Force-directed layout simulation.
//!
//! Nodes live in a contiguous arena and edges refer to them by index, so the
//! per-frame force passes are plain loops over `Vec`s. Each [`step`] applies
//! five velocity contributions and then integrates:
//!
//! 1. **Repulsion** between every node pair (`strength * alpha / d²` on the
//!    displacement vector), with a minimum-distance clamp.
//! 2. **Attraction** along edges toward `link_distance`, stronger for heavy
//!    edges within `weight_factor_range`.
//! 3. **Centering** toward the middle of the bounds.
//! 4. **Cluster** pull toward the centroid of a node's cluster group.
//! 5. **Collision** pushing apart overlapping circles.
//!
//! All forces except collision scale with `alpha`, which decays toward
//! `alpha_target` each step. Once alpha drops under `alpha_min` the engine
//! reports itself inactive and the frame loop stops stepping it. Pinning a
//! node raises the target so the rest of the graph keeps reacting while it is
//! dragged.
//!
//! [`step`]: GraphLayoutEngine::step

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, warn};
use serde::Deserialize;

use super::config::ordered_range;
use super::scale::MagnitudeScale;
use super::types::{Entity, Relationship};

/// Physics parameters. Defaults follow the classic d3 force layout tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
	/// Many-body strength. Negative values repel.
	pub repulsion_strength: f64,
	/// Pairs closer than this are treated as this far apart.
	pub min_distance: f64,
	/// Rest length of every edge.
	pub link_distance: f64,
	/// Bounds on `weight / mean_weight` when scaling edge strength.
	pub weight_factor_range: (f64, f64),
	pub center_strength: f64,
	pub cluster_strength: f64,
	/// Added to each node's radius when testing overlap.
	pub collision_padding: f64,
	pub collision_strength: f64,
	/// Fraction of velocity lost per step.
	pub velocity_decay: f64,
	pub alpha_start: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Alpha floor applied by [`GraphLayoutEngine::reheat`].
	pub reheat_alpha: f64,
	/// Alpha target held while any node is pinned.
	pub drag_alpha_target: f64,
	/// Radius of the seeding circle for nodes without a position.
	pub seed_radius: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			repulsion_strength: -300.0,
			min_distance: 10.0,
			link_distance: 100.0,
			weight_factor_range: (0.5, 2.0),
			center_strength: 0.05,
			cluster_strength: 0.02,
			collision_padding: 4.0,
			collision_strength: 0.7,
			velocity_decay: 0.4,
			alpha_start: 1.0,
			alpha_min,
			// Reach alpha_min from 1.0 in ~300 steps.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			reheat_alpha: 0.3,
			drag_alpha_target: 0.3,
			seed_radius: 100.0,
		}
	}
}

/// Size of the render surface; the centering force targets its middle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub fn new(width: f64, height: f64) -> Self {
		let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
		Self {
			width: sane(width),
			height: sane(height),
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

/// An entity together with its simulation state.
#[derive(Clone, Debug)]
pub struct LayoutNode {
	pub entity: Entity,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Rendered and collision radius, derived from magnitude.
	pub radius: f64,
	pinned: Option<(f64, f64)>,
	degree: usize,
}

impl LayoutNode {
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	pub fn pinned(&self) -> Option<(f64, f64)> {
		self.pinned
	}
}

/// A relationship resolved to node indices.
#[derive(Clone, Debug)]
pub struct LayoutEdge {
	pub source: usize,
	pub target: usize,
	pub relationship: Relationship,
	strength: f64,
	/// Share of the spring correction applied to the target.
	bias: f64,
}

impl LayoutEdge {
	pub fn strength(&self) -> f64 {
		self.strength
	}
}

pub struct GraphLayoutEngine {
	config: SimulationConfig,
	radius_scale: MagnitudeScale,
	bounds: Bounds,
	nodes: Vec<LayoutNode>,
	edges: Vec<LayoutEdge>,
	index: HashMap<String, usize>,
	alpha: f64,
	alpha_target: f64,
	dropped_edges: usize,
	settled_logged: bool,
}

impl GraphLayoutEngine {
	pub fn new(mut config: SimulationConfig, radius_scale: MagnitudeScale) -> Self {
		let range = ordered_range(
			config.weight_factor_range,
			SimulationConfig::default().weight_factor_range,
		);
		if range != config.weight_factor_range {
			warn!(
				"network-graph: weight factor range {:?} replaced by {:?}",
				config.weight_factor_range, range
			);
			config.weight_factor_range = range;
		}
		Self {
			config,
			radius_scale,
			bounds: Bounds::new(0.0, 0.0),
			nodes: Vec::new(),
			edges: Vec::new(),
			index: HashMap::new(),
			alpha: 0.0,
			alpha_target: 0.0,
			dropped_edges: 0,
			settled_logged: true,
		}
	}

	/// Load a dataset snapshot.
	///
	/// Nodes whose id was present in the previous snapshot keep their
	/// position, velocity and pin. New nodes start at their `x`/`y` hint or on
	/// a circle around the centre, by insertion order. Duplicate ids after
	/// the first and edges with a missing endpoint are dropped.
	pub fn initialize(&mut self, nodes: &[Entity], edges: &[Relationship], bounds: Bounds) {
		self.bounds = bounds;
		let previous: HashMap<String, LayoutNode> = self
			.nodes
			.drain(..)
			.map(|node| (node.entity.id.clone(), node))
			.collect();
		self.index.clear();
		self.edges.clear();

		let center = bounds.center();
		let mut preserved = 0;
		for (i, entity) in nodes.iter().enumerate() {
			if self.index.contains_key(&entity.id) {
				warn!("network-graph: duplicate entity id {:?} ignored", entity.id);
				continue;
			}
			let radius = self.radius_scale.apply(entity.magnitude);
			let node = match previous.get(&entity.id) {
				Some(prev) => {
					preserved += 1;
					LayoutNode {
						entity: entity.clone(),
						radius,
						degree: 0,
						..prev.clone()
					}
				}
				None => {
					let (x, y) = match (entity.x, entity.y) {
						(Some(x), Some(y)) if x.is_finite() && y.is_finite() => (x, y),
						_ => seed_position(i, nodes.len(), center, self.config.seed_radius),
					};
					LayoutNode {
						entity: entity.clone(),
						x,
						y,
						vx: 0.0,
						vy: 0.0,
						radius,
						pinned: None,
						degree: 0,
					}
				}
			};
			self.index.insert(entity.id.clone(), self.nodes.len());
			self.nodes.push(node);
		}

		self.dropped_edges = 0;
		for relationship in edges {
			let (Some(&source), Some(&target)) = (
				self.index.get(&relationship.source_id),
				self.index.get(&relationship.target_id),
			) else {
				self.dropped_edges += 1;
				continue;
			};
			self.nodes[source].degree += 1;
			self.nodes[target].degree += 1;
			self.edges.push(LayoutEdge {
				source,
				target,
				relationship: relationship.clone(),
				strength: 0.0,
				bias: 0.5,
			});
		}
		self.compute_edge_strengths();

		self.alpha = self.config.alpha_start;
		self.alpha_target = if self.nodes.iter().any(|n| n.pinned.is_some()) {
			self.config.drag_alpha_target
		} else {
			0.0
		};
		self.settled_logged = false;

		debug!(
			"network-graph: layout initialized with {} nodes ({} kept), {} edges, {} dangling dropped",
			self.nodes.len(),
			preserved,
			self.edges.len(),
			self.dropped_edges
		);
	}

	fn compute_edge_strengths(&mut self) {
		let weights: Vec<f64> = self
			.edges
			.iter()
			.map(|e| sanitize(e.relationship.weight))
			.collect();
		let mean = if weights.is_empty() {
			0.0
		} else {
			weights.iter().sum::<f64>() / weights.len() as f64
		};
		let (lo, hi) = self.config.weight_factor_range;

		for (edge, weight) in self.edges.iter_mut().zip(weights) {
			let source_degree = self.nodes[edge.source].degree as f64;
			let target_degree = self.nodes[edge.target].degree as f64;
			let base = 1.0 / source_degree.min(target_degree).max(1.0);
			let factor = if mean > 0.0 {
				(weight / mean).clamp(lo, hi)
			} else {
				1.0
			};
			edge.strength = (base * factor).min(1.0);
			edge.bias = source_degree / (source_degree + target_degree).max(1.0);
		}
	}

	/// Advance the simulation by one tick. Returns whether it is still active.
	pub fn step(&mut self) -> bool {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_repulsion(alpha);
		self.apply_links(alpha);
		self.apply_centering(alpha);
		self.apply_clusters(alpha);
		self.apply_collisions();
		self.integrate();

		let active = self.is_active();
		if !active && !self.settled_logged {
			debug!("network-graph: layout settled (alpha {:.4})", self.alpha);
			self.settled_logged = true;
		}
		active
	}

	fn apply_repulsion(&mut self, alpha: f64) {
		let strength = self.config.repulsion_strength;
		let min_d2 = self.config.min_distance * self.config.min_distance;
		let n = self.nodes.len();

		for i in 0..n {
			for j in (i + 1)..n {
				let (mut dx, mut dy) = (
					self.nodes[j].x - self.nodes[i].x,
					self.nodes[j].y - self.nodes[i].y,
				);
				if dx == 0.0 && dy == 0.0 {
					(dx, dy) = jiggle(i, j);
				}
				let mut d2 = dx * dx + dy * dy;
				if d2 < min_d2 {
					d2 = (min_d2 * d2).sqrt();
				}
				let w = strength * alpha / d2;
				self.nodes[i].vx += dx * w;
				self.nodes[i].vy += dy * w;
				self.nodes[j].vx -= dx * w;
				self.nodes[j].vy -= dy * w;
			}
		}
	}

	fn apply_links(&mut self, alpha: f64) {
		let distance = self.config.link_distance;

		for edge in &self.edges {
			let (s, t) = (edge.source, edge.target);
			if s == t {
				continue;
			}
			let (source, target) = (&self.nodes[s], &self.nodes[t]);
			let (mut dx, mut dy) = (
				target.x + target.vx - source.x - source.vx,
				target.y + target.vy - source.y - source.vy,
			);
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(s, t);
			}
			let l = (dx * dx + dy * dy).sqrt();
			let f = (l - distance) / l * alpha * edge.strength;
			let (fx, fy) = (dx * f, dy * f);

			self.nodes[t].vx -= fx * edge.bias;
			self.nodes[t].vy -= fy * edge.bias;
			self.nodes[s].vx += fx * (1.0 - edge.bias);
			self.nodes[s].vy += fy * (1.0 - edge.bias);
		}
	}

	fn apply_centering(&mut self, alpha: f64) {
		let (cx, cy) = self.bounds.center();
		let k = self.config.center_strength * alpha;
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * k;
			node.vy += (cy - node.y) * k;
		}
	}

	fn apply_clusters(&mut self, alpha: f64) {
		let k = self.config.cluster_strength * alpha;
		if k == 0.0 {
			return;
		}

		let mut centroids: HashMap<i64, (f64, f64, usize)> = HashMap::new();
		for node in &self.nodes {
			if let Some(group) = node.entity.cluster_group {
				let entry = centroids.entry(group).or_insert((0.0, 0.0, 0));
				entry.0 += node.x;
				entry.1 += node.y;
				entry.2 += 1;
			}
		}

		for node in &mut self.nodes {
			let Some(&(sx, sy, count)) = node.entity.cluster_group.and_then(|g| centroids.get(&g))
			else {
				continue;
			};
			if count < 2 {
				continue;
			}
			let (gx, gy) = (sx / count as f64, sy / count as f64);
			node.vx += (gx - node.x) * k;
			node.vy += (gy - node.y) * k;
		}
	}

	fn apply_collisions(&mut self) {
		let padding = self.config.collision_padding;
		let strength = self.config.collision_strength;
		let n = self.nodes.len();

		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let (ri, rj) = (a.radius + padding, b.radius + padding);
				let r = ri + rj;
				let (mut dx, mut dy) = (a.x + a.vx - b.x - b.vx, a.y + a.vy - b.y - b.vy);
				let mut l2 = dx * dx + dy * dy;
				if l2 >= r * r {
					continue;
				}
				if l2 == 0.0 {
					(dx, dy) = jiggle(i, j);
					l2 = dx * dx + dy * dy;
				}
				let l = l2.sqrt();
				let f = (r - l) / l * strength;
				let (fx, fy) = (dx * f, dy * f);
				let share = (rj * rj) / (ri * ri + rj * rj);

				self.nodes[i].vx += fx * share;
				self.nodes[i].vy += fy * share;
				self.nodes[j].vx -= fx * (1.0 - share);
				self.nodes[j].vy -= fy * (1.0 - share);
			}
		}
	}

	fn integrate(&mut self) {
		let retain = 1.0 - self.config.velocity_decay;
		let (count, center, seed_radius) =
			(self.nodes.len(), self.bounds.center(), self.config.seed_radius);

		for (i, node) in self.nodes.iter_mut().enumerate() {
			if let Some((px, py)) = node.pinned {
				node.x = px;
				node.y = py;
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx *= retain;
			node.vy *= retain;
			node.x += node.vx;
			node.y += node.vy;

			if !(node.x.is_finite() && node.y.is_finite()) {
				warn!("network-graph: node {:?} diverged, reseeding", node.entity.id);
				(node.x, node.y) = seed_position(i, count, center, seed_radius);
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}

	/// Fix a node at `position` until [`unpin`](Self::unpin) is called.
	///
	/// Returns `false` if no node has that id.
	pub fn pin(&mut self, id: &str, position: (f64, f64)) -> bool {
		let Some(&idx) = self.index.get(id) else {
			return false;
		};
		if !(position.0.is_finite() && position.1.is_finite()) {
			return false;
		}
		let node = &mut self.nodes[idx];
		node.pinned = Some(position);
		(node.x, node.y) = position;
		node.vx = 0.0;
		node.vy = 0.0;

		self.alpha_target = self.config.drag_alpha_target;
		self.reheat();
		true
	}

	/// Release a pinned node. It stays where it was and floats freely again.
	pub fn unpin(&mut self, id: &str) -> bool {
		let Some(&idx) = self.index.get(id) else {
			return false;
		};
		let was_pinned = self.nodes[idx].pinned.take().is_some();
		if !self.nodes.iter().any(|n| n.pinned.is_some()) {
			self.alpha_target = 0.0;
		}
		was_pinned
	}

	/// Raise alpha so the layout moves again after an external change.
	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(self.config.reheat_alpha);
		self.settled_logged = false;
	}

	pub fn resize(&mut self, bounds: Bounds) {
		if bounds != self.bounds {
			self.bounds = bounds;
			self.reheat();
		}
	}

	/// Whether the frame loop should keep calling [`step`](Self::step).
	///
	/// Graphs with fewer than two nodes have nothing to lay out.
	pub fn is_active(&self) -> bool {
		let min = self.config.alpha_min;
		self.nodes.len() > 1 && (self.alpha >= min || self.alpha_target >= min)
	}

	/// Topmost node whose circle (plus `padding`) contains the world point.
	pub fn node_at(&self, x: f64, y: f64, padding: f64) -> Option<usize> {
		self.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - x, node.y - y);
			let reach = node.radius + padding;
			dx * dx + dy * dy <= reach * reach
		})
	}

	/// Indices of nodes sharing an edge with `idx`.
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.edges.iter().filter_map(move |edge| {
			if edge.source == idx {
				Some(edge.target)
			} else if edge.target == idx {
				Some(edge.source)
			} else {
				None
			}
		})
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn node(&self, id: &str) -> Option<&LayoutNode> {
		self.index_of(id).map(|idx| &self.nodes[idx])
	}

	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.node(id).map(LayoutNode::position)
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[LayoutEdge] {
		&self.edges
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Edges discarded by the last [`initialize`](Self::initialize).
	pub fn dropped_edges(&self) -> usize {
		self.dropped_edges
	}
}

/// Deterministic starting point for the `index`-th of `count` nodes.
fn seed_position(index: usize, count: usize, center: (f64, f64), radius: f64) -> (f64, f64) {
	if count <= 1 {
		return center;
	}
	let angle = index as f64 * 2.0 * PI / count as f64;
	(center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
}

/// Tiny deterministic offset for exactly coincident pairs.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let angle = (i * 7 + j * 13) as f64;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}

fn sanitize(value: f64) -> f64 {
	if value.is_finite() { value.max(0.0) } else { 0.0 }
}
