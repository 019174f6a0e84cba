//! Entity and relationship records supplied by the embedding page.
//!
//! Keys are camelCase. The dashboard's older mock payloads used `type`,
//! `risk`, `value`, `transactions`, `group`, `source` and `target`, so those
//! are accepted as aliases.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::config::GraphConfig;

/// What kind of on-chain actor an entity is. Drives border styling only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
	Wallet,
	Exchange,
	Mixer,
	Contract,
	#[serde(alias = "defi")]
	DefiProtocol,
}

impl Category {
	pub const ALL: [Category; 5] = [
		Category::Wallet,
		Category::Exchange,
		Category::Mixer,
		Category::Contract,
		Category::DefiProtocol,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Category::Wallet => "wallet",
			Category::Exchange => "exchange",
			Category::Mixer => "mixer",
			Category::Contract => "contract",
			Category::DefiProtocol => "defi-protocol",
		}
	}

	/// Human-readable name for legends and detail panels.
	pub fn display_name(self) -> &'static str {
		match self {
			Category::Wallet => "Wallet",
			Category::Exchange => "Exchange",
			Category::Mixer => "Mixer",
			Category::Contract => "Contract",
			Category::DefiProtocol => "DeFi",
		}
	}
}

impl FromStr for Category {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"wallet" => Ok(Category::Wallet),
			"exchange" => Ok(Category::Exchange),
			"mixer" => Ok(Category::Mixer),
			"contract" => Ok(Category::Contract),
			"defi-protocol" | "defi" => Ok(Category::DefiProtocol),
			other => Err(UnknownVariant(other.to_string())),
		}
	}
}

/// Assessed risk of an entity, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
	Low,
	Medium,
	High,
	Critical,
}

impl RiskLevel {
	pub const ALL: [RiskLevel; 4] = [
		RiskLevel::Low,
		RiskLevel::Medium,
		RiskLevel::High,
		RiskLevel::Critical,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			RiskLevel::Low => "low",
			RiskLevel::Medium => "medium",
			RiskLevel::High => "high",
			RiskLevel::Critical => "critical",
		}
	}

	pub fn display_name(self) -> &'static str {
		match self {
			RiskLevel::Low => "Low",
			RiskLevel::Medium => "Medium",
			RiskLevel::High => "High",
			RiskLevel::Critical => "Critical",
		}
	}

	/// High and critical entities carry a warning badge.
	pub fn is_elevated(self) -> bool {
		self >= RiskLevel::High
	}
}

impl FromStr for RiskLevel {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"low" => Ok(RiskLevel::Low),
			"medium" => Ok(RiskLevel::Medium),
			"high" => Ok(RiskLevel::High),
			"critical" => Ok(RiskLevel::Critical),
			other => Err(UnknownVariant(other.to_string())),
		}
	}
}

/// Visual classification of a relationship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
	#[default]
	Normal,
	Suspicious,
	#[serde(alias = "high_volume")]
	HighVolume,
}

/// Returned when a filter or enum string matches no known variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown value {:?}", self.0)
	}
}

impl std::error::Error for UnknownVariant {}

/// A node in the entity graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
	/// Unique identifier. Relationships reference entities by this id.
	pub id: String,
	pub label: String,
	#[serde(alias = "type")]
	pub category: Category,
	#[serde(alias = "risk")]
	pub risk_level: RiskLevel,
	/// Aggregate value held or moved. Determines the rendered radius.
	#[serde(alias = "value", default)]
	pub magnitude: f64,
	#[serde(alias = "transactions", default)]
	pub activity_count: u64,
	/// Optional cluster hint; entities in the same group drift together.
	#[serde(alias = "group", default)]
	pub cluster_group: Option<i64>,
	/// Optional starting position in simulation space.
	#[serde(default)]
	pub x: Option<f64>,
	#[serde(default)]
	pub y: Option<f64>,
}

impl Entity {
	pub fn new(
		id: impl Into<String>,
		label: impl Into<String>,
		category: Category,
		risk_level: RiskLevel,
		magnitude: f64,
	) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			category,
			risk_level,
			magnitude,
			activity_count: 0,
			cluster_group: None,
			x: None,
			y: None,
		}
	}

	pub fn with_activity(mut self, activity_count: u64) -> Self {
		self.activity_count = activity_count;
		self
	}

	pub fn with_cluster(mut self, group: i64) -> Self {
		self.cluster_group = Some(group);
		self
	}
}

/// A directed flow of value between two entities.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	#[serde(alias = "source")]
	pub source_id: String,
	#[serde(alias = "target")]
	pub target_id: String,
	#[serde(alias = "value", default)]
	pub weight: f64,
	#[serde(alias = "transactions", default)]
	pub activity_count: u64,
	#[serde(alias = "type", default)]
	pub classification: Classification,
}

impl Relationship {
	pub fn new(
		source_id: impl Into<String>,
		target_id: impl Into<String>,
		weight: f64,
		classification: Classification,
	) -> Self {
		Self {
			source_id: source_id.into(),
			target_id: target_id.into(),
			weight,
			activity_count: 0,
			classification,
		}
	}

	pub fn with_activity(mut self, activity_count: u64) -> Self {
		self.activity_count = activity_count;
		self
	}
}

/// Complete dataset: entities, relationships and optional tuning.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<Entity>,
	pub links: Vec<Relationship>,
	#[serde(default)]
	pub config: Option<GraphConfig>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_legacy_dashboard_payload() {
		let json = r#"{
			"nodes": [
				{ "id": "1", "label": "0x742d...E8E0", "type": "wallet", "risk": "critical",
				  "value": 150000, "transactions": 234, "group": 1 },
				{ "id": "5", "label": "Uniswap V3", "type": "defi", "risk": "low",
				  "value": 234000, "transactions": 456, "group": 4 }
			],
			"links": [
				{ "source": "1", "target": "5", "value": 12000, "transactions": 5, "type": "high_volume" }
			]
		}"#;

		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].category, Category::Wallet);
		assert_eq!(data.nodes[0].risk_level, RiskLevel::Critical);
		assert_eq!(data.nodes[0].activity_count, 234);
		assert_eq!(data.nodes[0].cluster_group, Some(1));
		assert_eq!(data.nodes[1].category, Category::DefiProtocol);
		assert_eq!(data.links[0].source_id, "1");
		assert_eq!(data.links[0].classification, Classification::HighVolume);
		assert!(data.config.is_none());
	}

	#[test]
	fn parses_camel_case_payload_with_defaults() {
		let json = r#"{
			"nodes": [
				{ "id": "a", "label": "A", "category": "defi-protocol", "riskLevel": "medium",
				  "magnitude": 10.5, "activityCount": 3, "clusterGroup": 2 }
			],
			"links": [
				{ "sourceId": "a", "targetId": "b", "weight": 4 }
			]
		}"#;

		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes[0].risk_level, RiskLevel::Medium);
		assert_eq!(data.nodes[0].magnitude, 10.5);
		assert_eq!(data.links[0].classification, Classification::Normal);
		assert_eq!(data.links[0].activity_count, 0);
	}

	#[test]
	fn risk_levels_are_ordered() {
		assert!(RiskLevel::Low < RiskLevel::Medium);
		assert!(RiskLevel::High < RiskLevel::Critical);
		assert!(RiskLevel::Critical.is_elevated());
		assert!(!RiskLevel::Medium.is_elevated());
	}

	#[test]
	fn category_round_trips_through_select_values() {
		for category in Category::ALL {
			assert_eq!(category.as_str().parse::<Category>(), Ok(category));
		}
		assert_eq!("defi".parse::<Category>(), Ok(Category::DefiProtocol));
		assert!("bridge".parse::<Category>().is_err());
	}
}
