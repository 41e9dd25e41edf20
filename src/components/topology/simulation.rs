//! Cluster-aware force relaxation.
//!
//! Each tick applies, per node:
//! - a linear pull toward the node's cluster centre once it strays past a
//!   soft radius
//! - short-range repulsion from same-cluster nodes and longer-range repulsion
//!   from nodes in other clusters
//! - a very weak spring along a capped window of edges
//!
//! then integrates `v = (v + F) * damping`, `p += v` and clamps into bounds.

use super::cluster::cluster_shape;
use super::config::LayoutConfig;
use super::store::PositionStore;
use super::types::Bounds;

pub struct ForceSimulation {
	config: LayoutConfig,
	forces: Vec<(f64, f64)>,
}

impl ForceSimulation {
	pub fn new(config: LayoutConfig) -> Self {
		Self {
			config,
			forces: Vec::new(),
		}
	}

	/// Advance the layout by one tick. `tick` selects which window of edges
	/// receives spring forces when there are more than the per-tick cap.
	pub fn step(
		&mut self,
		store: &mut PositionStore,
		edges: &[(usize, usize)],
		bounds: Bounds,
		tick: u32,
	) {
		let n = store.len();
		if n == 0 {
			return;
		}
		self.forces.clear();
		self.forces.resize(n, (0.0, 0.0));

		self.apply_cluster_pull(store, bounds);
		self.apply_repulsion(store);
		self.apply_edge_springs(store, edges, tick);

		let damping = self.config.damping;
		for (p, &(fx, fy)) in store.positions_mut().iter_mut().zip(&self.forces) {
			p.vx = (p.vx + fx) * damping;
			p.vy = (p.vy + fy) * damping;
			p.x = bounds.clamp_x(p.x + p.vx);
			p.y = bounds.clamp_y(p.y + p.vy);
		}
	}

	fn apply_cluster_pull(&mut self, store: &PositionStore, bounds: Bounds) {
		for (i, p) in store.positions().iter().enumerate() {
			let shape = cluster_shape(store.cluster_of(i));
			let (cx, cy) = shape.center_in(bounds.width, bounds.height);
			let (rx, ry) = shape.radii_in(bounds.width, bounds.height);
			let soft = (self.config.cluster_soft_radius * (rx + ry) / 2.0).max(self.config.min_distance);
			let dist = p.distance_to(cx, cy);
			if dist <= soft {
				continue;
			}
			let strength = self.config.cluster_pull * (1.0 + (dist - soft) / soft);
			self.forces[i].0 += (cx - p.x) * strength;
			self.forces[i].1 += (cy - p.y) * strength;
		}
	}

	fn apply_repulsion(&mut self, store: &PositionStore) {
		let cfg = &self.config;
		let positions = store.positions();
		for i in 0..positions.len() {
			let ci = store.cluster_of(i);
			for j in (i + 1)..positions.len() {
				let (range, strength) = if store.cluster_of(j) == ci {
					(cfg.same_cluster_range, cfg.same_cluster_strength)
				} else {
					(cfg.cross_cluster_range, cfg.cross_cluster_strength)
				};
				let (mut dx, mut dy) = (positions[i].x - positions[j].x, positions[i].y - positions[j].y);
				let raw = (dx * dx + dy * dy).sqrt();
				if raw >= range {
					continue;
				}
				if raw == 0.0 {
					// Coincident: split them along x, ordered by index.
					(dx, dy) = (1.0, 0.0);
				}
				let dist = raw.max(cfg.min_distance);
				let norm = (dx * dx + dy * dy).sqrt();
				let magnitude = strength * (range - dist) / range;
				let (fx, fy) = (dx / norm * magnitude, dy / norm * magnitude);
				self.forces[i].0 += fx;
				self.forces[i].1 += fy;
				self.forces[j].0 -= fx;
				self.forces[j].1 -= fy;
			}
		}
	}

	fn apply_edge_springs(&mut self, store: &PositionStore, edges: &[(usize, usize)], tick: u32) {
		let cap = self.config.max_edges_per_tick;
		if edges.is_empty() || cap == 0 {
			return;
		}
		let take = cap.min(edges.len());
		let start = (tick as usize).wrapping_mul(take) % edges.len();
		let positions = store.positions();
		for &(s, t) in edges.iter().cycle().skip(start).take(take) {
			let (Some(a), Some(b)) = (positions.get(s), positions.get(t)) else {
				continue;
			};
			let (fx, fy) = ((b.x - a.x) * self.config.edge_strength, (b.y - a.y) * self.config.edge_strength);
			self.forces[s].0 += fx;
			self.forces[s].1 += fy;
			self.forces[t].0 -= fx;
			self.forces[t].1 -= fy;
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::topology::cluster::cluster_index;
	use crate::components::topology::store::tests::{edge, paper};
	use crate::components::topology::style::MAX_NODE_RADIUS;
	use crate::components::topology::types::{Node, Position};

	fn bounds() -> Bounds {
		Bounds::new(640.0, 480.0, MAX_NODE_RADIUS)
	}

	impl ForceSimulation {
		fn relax(&mut self, store: &mut PositionStore, edges: &[(usize, usize)], bounds: Bounds, iterations: u32) {
			for tick in 0..iterations {
				self.step(store, edges, bounds, tick);
			}
		}
	}

	/// First `per` ids landing in each of two distinct clusters.
	fn two_cluster_nodes(per: usize) -> (Vec<Node>, usize, usize) {
		let mut by_cluster: Vec<Vec<String>> = vec![Vec::new(); 5];
		for i in 0.. {
			let id = format!("W{i}");
			by_cluster[cluster_index(&id)].push(id);
			let full: Vec<usize> = (0..5).filter(|&c| by_cluster[c].len() >= per).collect();
			if full.len() >= 2 {
				let (a, b) = (full[0], full[1]);
				let nodes = by_cluster[a][..per]
					.iter()
					.chain(&by_cluster[b][..per])
					.enumerate()
					.map(|(k, id)| paper(id, if k % 3 == 0 { 0.8 } else { 0.3 }))
					.collect();
				return (nodes, a, b);
			}
		}
		unreachable!()
	}

	fn centroid(ps: &[Position]) -> (f64, f64) {
		let n = ps.len() as f64;
		(ps.iter().map(|p| p.x).sum::<f64>() / n, ps.iter().map(|p| p.y).sum::<f64>() / n)
	}

	#[test]
	fn clusters_separate_after_relaxation() {
		let (nodes, a, _) = two_cluster_nodes(6);
		let mut store = PositionStore::seed(&nodes, bounds(), &mut StdRng::seed_from_u64(11));
		let mut sim = ForceSimulation::new(LayoutConfig::default());
		sim.relax(&mut store, &[], bounds(), 80);

		let (left, right): (Vec<Position>, Vec<Position>) = {
			let (mut l, mut r) = (Vec::new(), Vec::new());
			for (i, p) in store.positions().iter().enumerate() {
				if store.cluster_of(i) == a { l.push(*p) } else { r.push(*p) }
			}
			(l, r)
		};
		assert_eq!((left.len(), right.len()), (6, 6));

		let mut intra = Vec::new();
		for group in [&left, &right] {
			for i in 0..group.len() {
				for j in (i + 1)..group.len() {
					intra.push(group[i].distance_to(group[j].x, group[j].y));
				}
			}
		}
		let avg_intra = intra.iter().sum::<f64>() / intra.len() as f64;
		let (lx, ly) = centroid(&left);
		let (rx, ry) = centroid(&right);
		let inter = ((lx - rx).powi(2) + (ly - ry).powi(2)).sqrt();
		assert!(avg_intra < inter, "intra {avg_intra} vs inter {inter}");
	}

	#[test]
	fn cluster_assignment_survives_layout() {
		let nodes: Vec<_> = (0..30).map(|i| paper(&format!("c{i}"), 0.5)).collect();
		let before: Vec<_> = nodes.iter().map(|n| cluster_index(&n.id)).collect();
		let mut store = PositionStore::seed(&nodes, bounds(), &mut StdRng::seed_from_u64(5));
		ForceSimulation::new(LayoutConfig::default()).relax(&mut store, &[], bounds(), 80);
		let after: Vec<_> = nodes.iter().map(|n| cluster_index(&n.id)).collect();
		assert_eq!(before, after);
		for i in 0..nodes.len() {
			assert_eq!(store.cluster_of(i), before[i]);
		}
	}

	#[test]
	fn positions_stay_in_bounds_every_tick() {
		let nodes: Vec<_> = (0..50).map(|i| paper(&format!("b{i}"), (i % 10) as f64 / 10.0)).collect();
		let edges: Vec<_> = (1..50).map(|i| edge(&format!("b{i}"), &format!("b{}", i / 2))).collect();
		let b = bounds();
		let mut store = PositionStore::seed(&nodes, b, &mut StdRng::seed_from_u64(9));
		let (pairs, _) = store.resolve_edges(&edges);
		let mut sim = ForceSimulation::new(LayoutConfig {
			cross_cluster_strength: 25.0,
			..LayoutConfig::default()
		});
		for tick in 0..120 {
			assert!(store.positions().iter().all(|p| b.contains(p.x, p.y)), "tick {tick}");
			sim.step(&mut store, &pairs, b, tick);
		}
		assert!(store.positions().iter().all(|p| b.contains(p.x, p.y)));
	}

	#[test]
	fn coincident_nodes_get_finite_forces() {
		let nodes = vec![paper("dup-a", 0.5), paper("dup-b", 0.5)];
		let mut store = PositionStore::seed(&nodes, bounds(), &mut StdRng::seed_from_u64(1));
		for p in store.positions_mut() {
			*p = Position::at(300.0, 200.0);
		}
		ForceSimulation::new(LayoutConfig::default()).relax(&mut store, &[], bounds(), 5);
		let ps = store.positions();
		assert!(ps.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
		assert_ne!(ps[0].x, ps[1].x);
	}

	#[test]
	fn edges_pull_endpoints_together() {
		let nodes = vec![paper("e0", 0.3), paper("e1", 0.3)];
		let b = bounds();
		let cfg = LayoutConfig {
			cluster_pull: 0.0,
			cross_cluster_strength: 0.0,
			edge_strength: 0.01,
			..LayoutConfig::default()
		};
		let mut store = PositionStore::seed(&nodes, b, &mut StdRng::seed_from_u64(1));
		store.positions_mut()[0] = Position::at(100.0, 240.0);
		store.positions_mut()[1] = Position::at(500.0, 240.0);
		ForceSimulation::new(cfg).relax(&mut store, &[(0, 1)], b, 10);
		let ps = store.positions();
		assert!(ps[0].distance_to(ps[1].x, ps[1].y) < 400.0);
	}

	#[test]
	fn edge_cap_rotates_through_every_edge() {
		let nodes: Vec<_> = (0..10).map(|i| paper(&format!("s{i}"), 0.3)).collect();
		let edges: Vec<_> = (0..5).map(|k| (2 * k, 2 * k + 1)).collect();
		let b = bounds();
		let cfg = LayoutConfig {
			cluster_pull: 0.0,
			same_cluster_strength: 0.0,
			cross_cluster_strength: 0.0,
			max_edges_per_tick: 2,
			..LayoutConfig::default()
		};
		let mut store = PositionStore::seed(&nodes, b, &mut StdRng::seed_from_u64(3));
		let mut sim = ForceSimulation::new(cfg);
		let mut covered = [false; 5];
		for tick in 0..3 {
			for k in 0..edges.len() {
				let x = 60.0 + k as f64 * 100.0;
				store.positions_mut()[2 * k] = Position::at(x, 100.0);
				store.positions_mut()[2 * k + 1] = Position::at(x, 300.0);
			}
			sim.step(&mut store, &edges, b, tick);
			let sprung: Vec<usize> = (0..edges.len())
				.filter(|&k| store.positions()[2 * k].vy != 0.0)
				.collect();
			assert_eq!(sprung.len(), 2, "tick {tick}: {sprung:?}");
			for k in sprung {
				covered[k] = true;
			}
		}
		assert!(covered.iter().all(|&c| c), "{covered:?}");
	}

	#[test]
	fn empty_graph_is_a_no_op() {
		let mut store = PositionStore::default();
		ForceSimulation::new(LayoutConfig::default()).relax(&mut store, &[], bounds(), 80);
		assert!(store.is_empty());
	}
}
