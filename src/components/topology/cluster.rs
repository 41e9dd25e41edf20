//! Stable id → cluster mapping and the fixed cluster geometry table.

use super::style::Rgba;

/// Number of clusters every node id is folded into.
pub const CLUSTER_COUNT: usize = 5;

/// Ellipse describing a cluster in normalized `[0, 1]` layout space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterShape {
	pub cx: f64,
	pub cy: f64,
	pub rx: f64,
	pub ry: f64,
	pub color: Rgba,
}

const CLUSTERS: [ClusterShape; CLUSTER_COUNT] = [
	ClusterShape {
		cx: 0.24,
		cy: 0.28,
		rx: 0.15,
		ry: 0.17,
		color: Rgba::rgb(56, 189, 248),
	},
	ClusterShape {
		cx: 0.74,
		cy: 0.26,
		rx: 0.16,
		ry: 0.16,
		color: Rgba::rgb(167, 139, 250),
	},
	ClusterShape {
		cx: 0.5,
		cy: 0.55,
		rx: 0.14,
		ry: 0.15,
		color: Rgba::rgb(251, 191, 36),
	},
	ClusterShape {
		cx: 0.22,
		cy: 0.76,
		rx: 0.15,
		ry: 0.14,
		color: Rgba::rgb(52, 211, 153),
	},
	ClusterShape {
		cx: 0.77,
		cy: 0.75,
		rx: 0.15,
		ry: 0.15,
		color: Rgba::rgb(251, 113, 133),
	},
];

/// FNV-1a over the id bytes, reduced mod [`CLUSTER_COUNT`].
pub fn cluster_index(node_id: &str) -> usize {
	let hash = node_id.bytes().fold(0x811c_9dc5_u32, |h, b| {
		(h ^ b as u32).wrapping_mul(0x0100_0193)
	});
	hash as usize % CLUSTER_COUNT
}

pub fn cluster_shape(index: usize) -> &'static ClusterShape {
	&CLUSTERS[index % CLUSTER_COUNT]
}

impl ClusterShape {
	/// Centre scaled into a `width × height` world.
	pub fn center_in(&self, width: f64, height: f64) -> (f64, f64) {
		(self.cx * width, self.cy * height)
	}

	pub fn radii_in(&self, width: f64, height: f64) -> (f64, f64) {
		(self.rx * width, self.ry * height)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_id_same_cluster() {
		for id in ["W2741809807", "doi:10.1145/3290605", "", "ñ-unicode"] {
			assert_eq!(cluster_index(id), cluster_index(id));
			assert!(cluster_index(id) < CLUSTER_COUNT);
		}
	}

	#[test]
	fn every_cluster_is_reachable() {
		let mut seen = [0usize; CLUSTER_COUNT];
		for i in 0..500 {
			seen[cluster_index(&format!("paper-{i}"))] += 1;
		}
		assert!(seen.iter().all(|&n| n > 0), "{seen:?}");
	}

	#[test]
	fn clusters_fit_in_unit_square() {
		for i in 0..CLUSTER_COUNT {
			let c = cluster_shape(i);
			assert!(c.cx - c.rx >= 0.0 && c.cx + c.rx <= 1.0);
			assert!(c.cy - c.ry >= 0.0 && c.cy + c.ry <= 1.0);
		}
	}
}
