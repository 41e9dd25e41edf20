//! Tunable constants for layout and interaction.
//!
//! Defaults were tuned against a 640×480 world. Hosts rendering into a very
//! different world size should scale the repulsion ranges with it.

use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
	pub layout: LayoutConfig,
	pub view: ViewConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub world_width: f64,
	pub world_height: f64,
	/// Relaxation ticks run after each data change.
	pub iterations: u32,
	pub damping: f64,
	/// Spring constant pulling nodes back toward their cluster centre.
	pub cluster_pull: f64,
	/// Fraction of the cluster ellipse radius inside which no pull applies.
	pub cluster_soft_radius: f64,
	pub same_cluster_range: f64,
	pub same_cluster_strength: f64,
	pub cross_cluster_range: f64,
	pub cross_cluster_strength: f64,
	pub edge_strength: f64,
	pub max_edges_per_tick: usize,
	pub min_distance: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			world_width: 640.0,
			world_height: 480.0,
			iterations: 80,
			damping: 0.85,
			cluster_pull: 0.004,
			cluster_soft_radius: 0.55,
			same_cluster_range: 12.0,
			same_cluster_strength: 1.2,
			cross_cluster_range: 80.0,
			cross_cluster_strength: 0.6,
			edge_strength: 0.002,
			max_edges_per_tick: 400,
			min_distance: 1.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	pub zoom_min: f64,
	pub zoom_max: f64,
	pub zoom_in_factor: f64,
	pub zoom_out_factor: f64,
	/// Extra world-space slack around a node's radius when hit-testing.
	pub hit_tolerance: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			zoom_min: 0.5,
			zoom_max: 3.0,
			zoom_in_factor: 1.1,
			zoom_out_factor: 0.9,
			hit_tolerance: 4.0,
		}
	}
}
