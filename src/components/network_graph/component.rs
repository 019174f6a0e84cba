//! Leptos component wrapping the entity graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and selection. An animation
//! loop runs via `requestAnimationFrame`; frames where nothing moved are
//! skipped.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::filter::{GraphFilters, Subgraph, project};
use super::render;
use super::scale::ScaleConfig;
use super::state::NetworkGraphState;
use super::theme::Theme;
use super::types::{Entity, GraphData};
use super::viewport::ViewportCommand;

/// Frame step handed to the simulation and animations, seconds.
const FRAME_DT: f64 = 0.016;

/// Bundles graph state with visual configuration.
struct GraphContext {
	state: NetworkGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Renders an interactive entity-relationship graph on a canvas element.
///
/// `data` holds the full dataset; `filters` narrows it to the visible
/// subgraph. Changing either re-lays out only when the projected subgraph
/// actually differs, and nodes that stay visible keep their place. Clicking a
/// node calls `on_select`. `command` drives the toolbar zoom buttons and
/// `zoom_level` receives the current zoom factor.
///
/// The canvas is `width`×`height` unless `fullscreen` is set, in which case it
/// fills the window and follows its size.
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional, into)] filters: Option<Signal<GraphFilters>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = 800.0)] width: f64,
	#[prop(default = 600.0)] height: f64,
	#[prop(optional, into)] on_select: Option<Callback<Entity>>,
	#[prop(optional)] zoom_level: Option<WriteSignal<f64>>,
	#[prop(optional, into)] command: Option<Signal<Option<ViewportCommand>>>,
	#[prop(optional, into)] theme: Option<Signal<Theme>>,
	#[prop(optional)] config: Option<GraphConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_else(|| {
		data.with_untracked(|d| d.config.clone())
			.unwrap_or_default()
	});
	let visible: Memo<Subgraph> = Memo::new(move |_| {
		let filters = filters.map(|f| f.get()).unwrap_or_default();
		data.with(|d| project(&d.nodes, &d.links, &filters))
	});
	let current_theme = move || theme.map(|t| t.get()).unwrap_or_default();

	let canvas_ref = NodeRef::<Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((width, height))
		} else {
			(width, height)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("network-graph: canvas 2d context unavailable");
			return;
		};

		let mut state = NetworkGraphState::new(&config, w, h);
		state.load(&visible.get_untracked());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: config.scale.clone(),
			theme: theme.map(|t| t.get_untracked()).unwrap_or_default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				if c.state.needs_redraw() {
					c.state.tick(FRAME_DT);
					render::render(&c.state, &ctx, &c.scale, &c.theme);
					c.state.mark_drawn();
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// The initial subgraph is loaded by the setup effect above.
	let context_reload = context.clone();
	Effect::new(move |prev: Option<()>| {
		let subgraph = visible.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut c) = *context_reload.borrow_mut() {
			debug!(
				"network-graph: reloading {} nodes, {} edges",
				subgraph.nodes.len(),
				subgraph.edges.len()
			);
			c.state.load(&subgraph);
		}
	});

	let context_theme = context.clone();
	Effect::new(move |_| {
		let theme = current_theme();
		if let Some(ref mut c) = *context_theme.borrow_mut() {
			c.theme = theme;
			c.state.invalidate();
		}
	});

	let context_cmd = context.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.and_then(|c| c.get()) else {
			return;
		};
		let zoom = context_cmd.borrow_mut().as_mut().map(|c| {
			c.state.apply(cmd);
			c.state.viewport.scale()
		});
		if let (Some(k), Some(signal)) = (zoom, zoom_level) {
			signal.set(k);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(point) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(point);
			set_cursor(canvas_ref, &c.state);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(point) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.pointer_move(point);
			set_cursor(canvas_ref, &c.state);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let selected = context_mu.borrow_mut().as_mut().and_then(|c| {
			let selected = c.state.pointer_up();
			set_cursor(canvas_ref, &c.state);
			selected
		});
		if let (Some(entity), Some(cb)) = (selected, on_select) {
			debug!("network-graph: selected {}", entity.id);
			cb.run(entity);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(point) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let zoom = context_wh.borrow_mut().as_mut().map(|c| {
			c.state.wheel(point, ev.delta_y());
			c.state.viewport.scale()
		});
		if let (Some(k), Some(signal)) = (zoom, zoom_level) {
			signal.set(k);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Event position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<Canvas>, state: &NetworkGraphState) {
	let Some(canvas) = canvas_ref.get_untracked() else {
		return;
	};
	let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", state.cursor());
}
