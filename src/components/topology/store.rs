//! Dense per-node position arena.
//!
//! The store is rebuilt wholesale whenever the node list changes; indices are
//! the node's position in that list and stay valid until the next rebuild.

use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::Rng;

use super::cluster::{cluster_index, cluster_shape};
use super::style::is_major;
use super::types::{Bounds, Edge, Node, Position};

/// Fraction of the cluster ellipse major nodes are seeded within.
const MAJOR_SPREAD: f64 = 0.55;
const SATELLITE_SPREAD: f64 = 1.0;
/// Exponent > 1 pulls the radial draw toward the centroid.
const RADIAL_BIAS: f64 = 1.6;
const JITTER: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct PositionStore {
	positions: Vec<Position>,
	clusters: Vec<usize>,
	index: HashMap<String, usize>,
}

impl PositionStore {
	/// Seed one position per node inside its cluster ellipse.
	pub fn seed<R: Rng>(nodes: &[Node], bounds: Bounds, rng: &mut R) -> Self {
		let mut store = Self {
			positions: Vec::with_capacity(nodes.len()),
			clusters: Vec::with_capacity(nodes.len()),
			index: HashMap::with_capacity(nodes.len()),
		};

		for (i, node) in nodes.iter().enumerate() {
			let cluster = cluster_index(&node.id);
			let shape = cluster_shape(cluster);
			let (cx, cy) = shape.center_in(bounds.width, bounds.height);
			let (rx, ry) = shape.radii_in(bounds.width, bounds.height);
			let spread = if is_major(node.score) {
				MAJOR_SPREAD
			} else {
				SATELLITE_SPREAD
			};

			let angle = rng.gen_range(0.0..TAU);
			let dist = rng.gen_range(0.0..1.0_f64).powf(RADIAL_BIAS) * spread;
			let x = cx + angle.cos() * rx * dist + rng.gen_range(-JITTER..JITTER);
			let y = cy + angle.sin() * ry * dist + rng.gen_range(-JITTER..JITTER);

			store
				.positions
				.push(Position::at(bounds.clamp_x(x), bounds.clamp_y(y)));
			store.clusters.push(cluster);
			// Duplicate ids: the first occurrence wins lookups.
			store.index.entry(node.id.clone()).or_insert(i);
		}
		store
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn get(&self, idx: usize) -> Option<&Position> {
		self.positions.get(idx)
	}

	pub fn get_mut(&mut self, idx: usize) -> Option<&mut Position> {
		self.positions.get_mut(idx)
	}

	pub fn positions(&self) -> &[Position] {
		&self.positions
	}

	pub fn positions_mut(&mut self) -> &mut [Position] {
		&mut self.positions
	}

	/// Cluster of the node at `idx`, cached from seeding.
	pub fn cluster_of(&self, idx: usize) -> usize {
		self.clusters.get(idx).copied().unwrap_or(0)
	}

	/// Resolve edges to index pairs, dropping those naming unknown ids or
	/// looping onto themselves. Returns the pairs and how many were skipped.
	pub fn resolve_edges(&self, edges: &[Edge]) -> (Vec<(usize, usize)>, usize) {
		let mut skipped = 0;
		let pairs = edges
			.iter()
			.filter_map(|edge| {
				match (self.index_of(&edge.source_id), self.index_of(&edge.target_id)) {
					(Some(s), Some(t)) if s != t => Some((s, t)),
					_ => {
						skipped += 1;
						None
					}
				}
			})
			.collect();
		(pairs, skipped)
	}
}
