//! Interactive entity-relationship graph for AML investigations.
//!
//! Renders wallets, exchanges, mixers and protocols as a force-directed
//! network on an HTML canvas:
//! - Physics-based layout with pinning while nodes are dragged
//! - Pan, zoom and toolbar zoom commands
//! - Risk and category filtering that keeps surviving nodes in place
//! - Smooth hover emphasis of a node and its counterparties
//!
//! Everything except [`NetworkGraphCanvas`] and the renderer is plain Rust
//! and runs without a browser.
//!
//! # Example
//!
//! ```ignore
//! use aml_network_graph::{GraphFilters, NetworkGraphCanvas, demo_network};
//!
//! let data = RwSignal::new(demo_network());
//! let filters = RwSignal::new(GraphFilters::default());
//!
//! view! {
//!     <NetworkGraphCanvas
//!         data=data
//!         filters=filters
//!         on_select=Callback::new(|entity| log::info!("selected {}", entity.id))
//!     />
//! }
//! ```

mod component;
pub mod config;
pub mod engine;
pub mod filter;
mod highlight;
pub mod interaction;
mod render;
mod sample;
pub mod scale;
mod state;
pub mod theme;
mod types;
pub mod viewport;

pub use component::NetworkGraphCanvas;
pub use config::GraphConfig;
pub use engine::{Bounds, GraphLayoutEngine, SimulationConfig};
pub use filter::{GraphFilters, Subgraph, project};
pub use interaction::{InteractionEvent, InteractionLayer, PointerState};
pub use sample::demo_network;
pub use theme::Theme;
pub use types::{Category, Classification, Entity, GraphData, Relationship, RiskLevel, UnknownVariant};
pub use viewport::{ViewTransform, ViewportCommand, ViewportController};
