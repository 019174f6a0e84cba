//! aml-network-graph: Interactive entity-relationship graph for AML investigations.
//!
//! This crate provides a WASM-based dashboard component that renders wallets,
//! exchanges, mixers and protocols as a force-directed network with risk and
//! category filtering, pan/zoom, node dragging and a details panel.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::network_graph::{
	Category, Classification, Entity, GraphConfig, GraphData, GraphFilters, NetworkGraphCanvas,
	Relationship, RiskLevel, Theme, ViewportCommand, demo_network,
};

use components::network_graph::filter::ALL;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("aml-network-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...], config?: {...} }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"aml-network-graph: loaded {} entities, {} relationships",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("aml-network-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Volume in the dashboard's rupiah notation, e.g. `Rp 150.000`.
fn format_volume(value: f64) -> String {
	let digits = (value.max(0.0).round() as u64).to_string();
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push('.');
		}
		grouped.push(ch);
	}
	format!("Rp {grouped}")
}

/// Main application component.
/// Loads the dataset from the DOM (or the demo network) and renders the
/// network analysis panel around the graph canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|| {
		info!("aml-network-graph: no embedded dataset, showing demo network");
		demo_network()
	});
	let data = Signal::derive(move || graph_data.clone());

	let risk_filter = RwSignal::new(ALL.to_string());
	let category_filter = RwSignal::new(ALL.to_string());
	let filters = Signal::derive(move || {
		GraphFilters::from_select(&risk_filter.get(), &category_filter.get()).unwrap_or_else(|e| {
			warn!("aml-network-graph: ignoring filter: {}", e);
			GraphFilters::default()
		})
	});

	let (zoom, set_zoom) = signal(1.0_f64);
	let command = RwSignal::new(None::<ViewportCommand>);
	let dark = RwSignal::new(false);
	let theme = Signal::derive(move || if dark.get() { Theme::dark() } else { Theme::light() });
	let selected = RwSignal::new(None::<Entity>);

	let palette = Theme::light();
	let risk_legend = RiskLevel::ALL
		.into_iter()
		.map(|risk| {
			let swatch = format!("background: {};", palette.risk_color(risk).to_css());
			view! {
				<li>
					<span class="swatch" style=swatch />
					{format!("{} Risk", risk.display_name())}
				</li>
			}
		})
		.collect_view();
	let category_legend = Category::ALL
		.into_iter()
		.map(|category| {
			let swatch = format!("border-color: {};", palette.category_color(category).to_css());
			view! {
				<li>
					<span class="swatch ring" style=swatch />
					{category.display_name()}
				</li>
			}
		})
		.collect_view();

	let details = move || {
		selected.get().map(|entity| {
			view! {
				<aside class="node-details">
					<header>
						<h4>"Node Details"</h4>
						<button class="close" on:click=move |_| selected.set(None)>"×"</button>
					</header>
					<dl>
						<dt>"Address"</dt>
						<dd class="mono">{entity.label.clone()}</dd>
						<dt>"Type"</dt>
						<dd>{entity.category.display_name()}</dd>
						<dt>"Risk Level"</dt>
						<dd class=format!("risk risk-{}", entity.risk_level.as_str())>
							{entity.risk_level.display_name()}
						</dd>
						<dt>"Volume"</dt>
						<dd>{format_volume(entity.magnitude)}</dd>
						<dt>"Transactions"</dt>
						<dd>{entity.activity_count}</dd>
					</dl>
				</aside>
			}
		})
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || if dark.get() { "dark" } else { "light" } />
		<Title text="Network Analysis" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section class="network-analysis">
			<div class="controls">
				<h3>"Network Analysis"</h3>
				<select
					prop:value=move || risk_filter.get()
					on:change=move |ev| risk_filter.set(event_target_value(&ev))
				>
					<option value=ALL>"All Risk Levels"</option>
					{RiskLevel::ALL
						.into_iter()
						.map(|risk| {
							view! {
								<option value=risk.as_str()>
									{format!("{} Risk", risk.display_name())}
								</option>
							}
						})
						.collect_view()}
				</select>
				<select
					prop:value=move || category_filter.get()
					on:change=move |ev| category_filter.set(event_target_value(&ev))
				>
					<option value=ALL>"All Types"</option>
					{Category::ALL
						.into_iter()
						.map(|category| {
							view! { <option value=category.as_str()>{category.display_name()}</option> }
						})
						.collect_view()}
				</select>

				<div class="zoom">
					<button title="Zoom out" on:click=move |_| command.set(Some(ViewportCommand::ZoomOut))>
						"−"
					</button>
					<span class="zoom-level">{move || format!("{}%", (zoom.get() * 100.0).round())}</span>
					<button title="Zoom in" on:click=move |_| command.set(Some(ViewportCommand::ZoomIn))>
						"+"
					</button>
					<button title="Reset view" on:click=move |_| command.set(Some(ViewportCommand::Reset))>
						"⟳"
					</button>
					<button title="Toggle theme" on:click=move |_| dark.update(|d| *d = !*d)>
						{move || if dark.get() { "Light" } else { "Dark" }}
					</button>
				</div>
			</div>

			<div class="graph">
				<NetworkGraphCanvas
					data=data
					filters=filters
					theme=theme
					command=command
					zoom_level=set_zoom
					on_select=Callback::new(move |entity: Entity| selected.set(Some(entity)))
				/>

				<div class="legend">
					<h4>"Legend"</h4>
					<ul>{risk_legend}</ul>
					<ul>{category_legend}</ul>
				</div>

				{details}
			</div>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn volume_uses_dot_thousands_separators() {
		assert_eq!(format_volume(150_000.0), "Rp 150.000");
		assert_eq!(format_volume(1_234_567.0), "Rp 1.234.567");
		assert_eq!(format_volume(999.0), "Rp 999");
		assert_eq!(format_volume(0.0), "Rp 0");
	}

	#[test]
	fn volume_clamps_bad_values() {
		assert_eq!(format_volume(-5.0), "Rp 0");
		assert_eq!(format_volume(f64::NAN), "Rp 0");
	}
}
