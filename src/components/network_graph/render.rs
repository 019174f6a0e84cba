//! Canvas rendering for the entity graph.
//!
//! Draw order:
//! 1. Background (screen space)
//! 2. Relationships (world space), suspicious ones dashed and flowing
//! 3. Entities not involved in the hover highlight, then involved ones on top
//! 4. Labels, risk badges and the selection ring with their node

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::engine::{LayoutEdge, LayoutNode};
use super::scale::{ScaleConfig, ScaledValues};
use super::state::NetworkGraphState;
use super::theme::{Color, Theme};
use super::types::Classification;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Opacity multiplier for something outside the highlight while the
/// strongest highlight is at `max_t`.
fn dimmed(max_t: f64, floor: f64) -> f64 {
	1.0 - (1.0 - floor) * max_t
}

/// Centre of the risk badge, sitting on the node's upper-right rim.
fn badge_center(x: f64, y: f64, radius: f64, badge_radius: f64) -> (f64, f64) {
	let offset = radius - badge_radius;
	(x + offset, y - offset)
}

pub fn render(
	state: &NetworkGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let transform = state.viewport.transform();
	let scale = ScaledValues::new(config, transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	draw_edges(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, config, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &NetworkGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let background = &theme.background;
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)
				.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &NetworkGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let nodes = state.engine.nodes();
	let max_t = smooth_step(state.highlight.max_intensity());
	let dash_offset = scale.dash_offset(state.flow_time, config.flow_speed);

	for edge in state.engine.edges() {
		let (Some(source), Some(target)) = (nodes.get(edge.source), nodes.get(edge.target))
		else {
			continue;
		};
		if edge.source == edge.target {
			continue;
		}

		let edge_t = smooth_step(state.highlight.edge_intensity(edge.source, edge.target));
		let opacity = theme.edge.opacity;
		let alpha = if edge_t > 0.01 {
			opacity + (1.0 - opacity) * edge_t
		} else {
			opacity * dimmed(max_t, 0.3)
		};
		let width = config.edge_width.apply(edge.relationship.weight) * (1.0 + 0.5 * edge_t);

		draw_edge(ctx, edge, source, target, scale, theme, alpha, width, dash_offset);
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

#[allow(clippy::too_many_arguments)]
fn draw_edge(
	ctx: &CanvasRenderingContext2d,
	edge: &LayoutEdge,
	source: &LayoutNode,
	target: &LayoutNode,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	width: f64,
	dash_offset: f64,
) {
	let classification = edge.relationship.classification;
	let color = theme.edge_color(classification);
	ctx.set_stroke_style_str(&color.with_alpha(alpha * color.a).to_css());
	ctx.set_line_width(width);

	// Dashes fade to a solid line when zoomed far out.
	let gap = scale.dash_pattern.1 * scale.dash_alpha;
	if classification == Classification::Suspicious && gap > 0.1 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(scale.dash_pattern.0),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.begin_path();
	ctx.move_to(source.x, source.y);
	ctx.line_to(target.x, target.y);
	ctx.stroke();
}

fn draw_nodes(
	state: &NetworkGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let nodes = state.engine.nodes();

	// Pass 1: nodes outside the highlight, dimmed while one is active
	for (idx, node) in nodes.iter().enumerate() {
		if state.highlight.node_intensity(idx) > 0.001 {
			continue;
		}
		let alpha = dimmed(max_t, theme.node.dimmed_alpha);
		draw_node(state, ctx, config, scale, theme, idx, node, alpha);
	}

	// Pass 2: highlighted or transitioning nodes on top
	for (idx, node) in nodes.iter().enumerate() {
		let node_t = smooth_step(state.highlight.node_intensity(idx));
		if node_t <= 0.001 {
			continue;
		}
		let dim = dimmed(max_t, theme.node.dimmed_alpha);
		let alpha = dim + (1.0 - dim) * node_t;
		draw_node(state, ctx, config, scale, theme, idx, node, alpha);
	}

	ctx.set_global_alpha(1.0);
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	state: &NetworkGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	idx: usize,
	node: &LayoutNode,
	alpha: f64,
) {
	let (x, y) = node.position();
	let hover_t = smooth_step(state.highlight.hover_intensity(idx));
	let radius = node.radius + config.hover_growth * hover_t;
	let entity = &node.entity;
	let fill = theme.risk_color(entity.risk_level);

	ctx.set_global_alpha(alpha);

	fill_circle(ctx, theme, x, y, radius, fill);

	let border = scale.border_width + (scale.hover_border_width - scale.border_width) * hover_t;
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&theme.category_color(entity.category).to_css());
	ctx.set_line_width(border);
	ctx.stroke();

	if state.selected.as_deref() == Some(entity.id.as_str()) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + border / 2.0 + scale.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&theme.node.selection_ring.to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();
	}

	if scale.label_alpha > 0.0 {
		ctx.set_global_alpha(alpha * scale.label_alpha);
		ctx.set_fill_style_str(&theme.node.label.to_css());
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&entity.label, x, y);
		ctx.set_global_alpha(alpha);
	}

	if entity.risk_level.is_elevated() {
		let (bx, by) = badge_center(x, y, node.radius, config.badge_radius);
		ctx.begin_path();
		let _ = ctx.arc(bx, by, config.badge_radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&theme.node.badge.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&theme.node.badge_border.to_css());
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
}

fn fill_circle(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	x: f64,
	y: f64,
	radius: f64,
	color: Color,
) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &color.lighten(0.3).to_css());
			let _ = gradient.add_color_stop(0.7, &color.to_css());
			let _ = gradient.add_color_stop(1.0, &color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&color.to_css()),
	}
	ctx.fill();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn smooth_step_endpoints() {
		assert_eq!(smooth_step(0.0), 0.0);
		assert_eq!(smooth_step(1.0), 1.0);
		assert_eq!(smooth_step(0.5), 0.5);
	}

	#[test]
	fn dimming_reaches_floor_at_full_highlight() {
		assert_eq!(dimmed(0.0, 0.35), 1.0);
		assert!((dimmed(1.0, 0.35) - 0.35).abs() < 1e-12);
	}

	#[test]
	fn badge_sits_on_upper_right_rim() {
		// Radius 20 (magnitude 100_000) puts the badge 15 units right and up.
		assert_eq!(badge_center(100.0, 100.0, 20.0, 5.0), (115.0, 85.0));
	}
}
