//! Built-in demo investigation network, shown when the page embeds no data.

use super::types::{Category, Classification, Entity, GraphData, RiskLevel, Relationship};

/// Twelve entities around a mixer-laundering pattern: wallets feeding
/// mixers, mixers paying out to fresh wallets, and exchanges and DeFi
/// protocols on the clean side.
pub fn demo_network() -> GraphData {
	use Category::*;
	use Classification::*;
	use RiskLevel::*;

	let entities = [
		("1", "0x742d...E8E0", Wallet, Critical, 150_000.0, 234, 1),
		("2", "Binance Hot", Exchange, Low, 890_000.0, 1456, 2),
		("3", "Tornado Cash", Mixer, Critical, 450_000.0, 678, 3),
		("4", "0x1234...7890", Wallet, Medium, 45_000.0, 123, 1),
		("5", "Uniswap V3", DefiProtocol, Low, 234_000.0, 456, 4),
		("6", "0xABCD...EF12", Wallet, High, 78_000.0, 89, 1),
		("7", "Unknown Mixer", Mixer, Critical, 123_000.0, 234, 3),
		("8", "Coinbase Pro", Exchange, Low, 567_000.0, 890, 2),
		("9", "0x9876...4321", Wallet, Medium, 34_000.0, 67, 1),
		("10", "Compound", DefiProtocol, Low, 189_000.0, 345, 4),
		("11", "0xFEDC...BA98", Wallet, High, 92_000.0, 156, 1),
		("12", "Privacy Coin", Mixer, Critical, 67_000.0, 123, 3),
	];
	let flows = [
		("1", "3", 45_000.0, 12, Suspicious),
		("3", "4", 23_000.0, 8, Suspicious),
		("1", "2", 67_000.0, 23, HighVolume),
		("4", "5", 12_000.0, 5, Normal),
		("6", "3", 34_000.0, 15, Suspicious),
		("7", "1", 56_000.0, 19, Suspicious),
		("2", "5", 89_000.0, 34, Normal),
		("8", "9", 23_000.0, 11, Normal),
		("9", "10", 15_000.0, 7, Normal),
		("11", "12", 41_000.0, 18, Suspicious),
		("12", "1", 28_000.0, 9, Suspicious),
		("6", "11", 19_000.0, 6, Normal),
	];

	GraphData {
		nodes: entities
			.into_iter()
			.map(|(id, label, category, risk, value, activity, group)| {
				Entity::new(id, label, category, risk, value)
					.with_activity(activity)
					.with_cluster(group)
			})
			.collect(),
		links: flows
			.into_iter()
			.map(|(source, target, value, activity, classification)| {
				Relationship::new(source, target, value, classification).with_activity(activity)
			})
			.collect(),
		config: None,
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::components::network_graph::filter::{GraphFilters, project};

	#[test]
	fn demo_network_is_consistent() {
		let data = demo_network();
		assert_eq!(data.nodes.len(), 12);
		assert_eq!(data.links.len(), 12);

		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), 12);
		assert!(data.links.iter().all(|l| {
			ids.contains(l.source_id.as_str()) && ids.contains(l.target_id.as_str())
		}));
	}

	#[test]
	fn critical_filter_keeps_mixer_ring() {
		let data = demo_network();
		let filters = GraphFilters {
			risk_level: Some(RiskLevel::Critical),
			category: None,
		};
		let sub = project(&data.nodes, &data.links, &filters);
		let ids: Vec<&str> = sub.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["1", "3", "7", "12"]);
		// 1->3, 7->1 and 12->1 stay; every other flow touches a non-critical entity.
		assert_eq!(sub.edges.len(), 3);
	}
}
