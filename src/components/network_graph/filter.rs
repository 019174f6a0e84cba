//! Visible-subgraph projection for the active risk and category filters.

use std::collections::HashSet;

use super::types::{Category, Entity, Relationship, RiskLevel, UnknownVariant};

/// Select value meaning "no constraint on this dimension".
pub const ALL: &str = "all";

/// Active attribute filters. `None` on a dimension means "all".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphFilters {
	pub risk_level: Option<RiskLevel>,
	pub category: Option<Category>,
}

impl GraphFilters {
	/// Build filters from the raw `<select>` values (`"all"` or a variant name).
	pub fn from_select(risk_level: &str, category: &str) -> Result<Self, UnknownVariant> {
		Ok(Self {
			risk_level: parse_dimension(risk_level)?,
			category: parse_dimension(category)?,
		})
	}

	pub fn matches(&self, entity: &Entity) -> bool {
		self.risk_level.is_none_or(|risk| entity.risk_level == risk)
			&& self.category.is_none_or(|category| entity.category == category)
	}
}

fn parse_dimension<T: std::str::FromStr<Err = UnknownVariant>>(
	value: &str,
) -> Result<Option<T>, UnknownVariant> {
	if value == ALL {
		Ok(None)
	} else {
		value.parse().map(Some)
	}
}

/// The nodes and edges that survive filtering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subgraph {
	pub nodes: Vec<Entity>,
	pub edges: Vec<Relationship>,
}

/// Narrow the dataset to entities matching every active filter, keeping only
/// the relationships whose endpoints both survive. Input order is preserved.
pub fn project(nodes: &[Entity], edges: &[Relationship], filters: &GraphFilters) -> Subgraph {
	let kept: Vec<Entity> = nodes.iter().filter(|n| filters.matches(n)).cloned().collect();
	let ids: HashSet<&str> = kept.iter().map(|n| n.id.as_str()).collect();

	let edges = edges
		.iter()
		.filter(|e| ids.contains(e.source_id.as_str()) && ids.contains(e.target_id.as_str()))
		.cloned()
		.collect();

	Subgraph { nodes: kept, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::Classification;

	fn dataset() -> (Vec<Entity>, Vec<Relationship>) {
		let nodes = vec![
			Entity::new("1", "0x742d", Category::Wallet, RiskLevel::Critical, 150_000.0),
			Entity::new("2", "Binance Hot", Category::Exchange, RiskLevel::Low, 890_000.0),
			Entity::new("3", "Tornado Cash", Category::Mixer, RiskLevel::Critical, 450_000.0),
			Entity::new("4", "0x1234", Category::Wallet, RiskLevel::Medium, 45_000.0),
		];
		let edges = vec![
			Relationship::new("1", "3", 45_000.0, Classification::Suspicious),
			Relationship::new("3", "4", 23_000.0, Classification::Suspicious),
			Relationship::new("1", "2", 67_000.0, Classification::HighVolume),
			Relationship::new("4", "9", 1.0, Classification::Normal),
		];
		(nodes, edges)
	}

	fn ids(subgraph: &Subgraph) -> Vec<&str> {
		subgraph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn unfiltered_keeps_everything_but_dangling_edges() {
		let (nodes, edges) = dataset();
		let sub = project(&nodes, &edges, &GraphFilters::default());
		assert_eq!(ids(&sub), ["1", "2", "3", "4"]);
		assert_eq!(sub.edges.len(), 3);
	}

	#[test]
	fn risk_filter_drops_edges_to_excluded_nodes() {
		let (nodes, edges) = dataset();
		let filters = GraphFilters {
			risk_level: Some(RiskLevel::Critical),
			category: None,
		};
		let sub = project(&nodes, &edges, &filters);
		assert_eq!(ids(&sub), ["1", "3"]);
		assert_eq!(sub.edges.len(), 1);
		assert_eq!(sub.edges[0].target_id, "3");
	}

	#[test]
	fn dimensions_combine_with_and() {
		let (nodes, edges) = dataset();
		let filters = GraphFilters {
			risk_level: Some(RiskLevel::Critical),
			category: Some(Category::Wallet),
		};
		let sub = project(&nodes, &edges, &filters);
		assert_eq!(ids(&sub), ["1"]);
		assert!(sub.edges.is_empty());
	}

	#[test]
	fn every_projected_edge_has_both_endpoints() {
		let (nodes, edges) = dataset();
		for risk in RiskLevel::ALL.map(Some).into_iter().chain([None]) {
			for category in Category::ALL.map(Some).into_iter().chain([None]) {
				let sub = project(&nodes, &edges, &GraphFilters { risk_level: risk, category });
				let kept: HashSet<&str> = sub.nodes.iter().map(|n| n.id.as_str()).collect();
				for edge in &sub.edges {
					assert!(kept.contains(edge.source_id.as_str()));
					assert!(kept.contains(edge.target_id.as_str()));
				}
			}
		}
	}

	#[test]
	fn projection_is_idempotent() {
		let (nodes, edges) = dataset();
		let filters = GraphFilters::from_select("all", "wallet").unwrap();
		let first = project(&nodes, &edges, &filters);
		let second = project(&nodes, &edges, &filters);
		assert_eq!(first, second);
	}

	#[test]
	fn filter_excluding_everything_yields_empty_subgraph() {
		let (nodes, edges) = dataset();
		let filters = GraphFilters::from_select("low", "mixer").unwrap();
		assert_eq!(project(&nodes, &edges, &filters), Subgraph::default());
	}

	#[test]
	fn select_values_parse() {
		assert_eq!(
			GraphFilters::from_select("all", "all").unwrap(),
			GraphFilters::default()
		);
		assert_eq!(
			GraphFilters::from_select("high", "defi").unwrap(),
			GraphFilters {
				risk_level: Some(RiskLevel::High),
				category: Some(Category::DefiProtocol),
			}
		);
		assert!(GraphFilters::from_select("severe", "all").is_err());
	}
}
