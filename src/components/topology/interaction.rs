//! Pointer gesture state machine.
//!
//! `Idle -> Dragging -> Idle` when the press lands on a node,
//! `Idle -> Panning -> Idle` otherwise. Moves while idle only update hover.
//! The controller mutates positions and the camera but never draws.

use log::debug;

use super::camera::Camera;
use super::config::ViewConfig;
use super::render::draw_order;
use super::store::PositionStore;
use super::style::node_radius;
use super::types::Node;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	Dragging {
		node: usize,
		last: (f64, f64),
	},
	Panning {
		last: (f64, f64),
	},
}

/// Notifications for the host application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
	Select(Option<String>),
	Hover(Option<String>),
}

/// What the controller may read and write for one event.
pub struct Surface<'a> {
	pub nodes: &'a [Node],
	pub store: &'a mut PositionStore,
	pub camera: &'a mut Camera,
	pub selected: Option<usize>,
	/// Hovered node as drawn this frame, whether hovered here or by the host.
	pub hovered: Option<usize>,
}

/// Topmost node whose render radius (plus `tolerance`) covers the screen
/// point. `emphasized` must match what the renderer used for the frame.
pub fn hit_test(
	nodes: &[Node],
	store: &PositionStore,
	camera: &Camera,
	screen: (f64, f64),
	tolerance: f64,
	emphasized: impl Fn(usize) -> bool,
) -> Option<usize> {
	let (wx, wy) = camera.screen_to_world(screen.0, screen.1);
	draw_order(nodes, store.len()).into_iter().rev().find(|&idx| {
		let Some(p) = store.get(idx) else {
			return false;
		};
		let radius = node_radius(nodes[idx].score, emphasized(idx)) + tolerance;
		p.distance_to(wx, wy) <= radius
	})
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	gesture: Gesture,
	hovered: Option<usize>,
	limits: ViewConfig,
}

impl InteractionController {
	pub fn new(limits: ViewConfig) -> Self {
		Self {
			gesture: Gesture::Idle,
			hovered: None,
			limits,
		}
	}

	#[cfg(test)]
	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn dragging(&self) -> Option<usize> {
		match self.gesture {
			Gesture::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	pub fn limits(&self) -> &ViewConfig {
		&self.limits
	}

	/// Forget per-dataset state; indices from the old store are meaningless.
	pub fn reset(&mut self) {
		self.gesture = Gesture::Idle;
		self.hovered = None;
	}

	fn hit(&self, surface: &Surface<'_>, x: f64, y: f64) -> Option<usize> {
		let (selected, hovered, dragging) = (surface.selected, surface.hovered, self.dragging());
		hit_test(
			surface.nodes,
			surface.store,
			surface.camera,
			(x, y),
			self.limits.hit_tolerance,
			|idx| selected == Some(idx) || hovered == Some(idx) || dragging == Some(idx),
		)
	}

	pub fn pointer_down(&mut self, surface: Surface<'_>, x: f64, y: f64) -> Option<HostEvent> {
		match self.hit(&surface, x, y) {
			Some(node) => {
				debug!("drag start on node {node}");
				self.gesture = Gesture::Dragging { node, last: (x, y) };
				if let Some(p) = surface.store.get_mut(node) {
					p.vx = 0.0;
					p.vy = 0.0;
				}
				let id = surface.nodes.get(node).map(|n| n.id.clone());
				Some(HostEvent::Select(id))
			}
			None => {
				self.gesture = Gesture::Panning { last: (x, y) };
				None
			}
		}
	}

	pub fn pointer_move(&mut self, surface: Surface<'_>, x: f64, y: f64) -> Option<HostEvent> {
		match self.gesture {
			Gesture::Dragging { node, last } => {
				let zoom = surface.camera.zoom;
				if let Some(p) = surface.store.get_mut(node) {
					p.x += (x - last.0) / zoom;
					p.y += (y - last.1) / zoom;
				}
				self.gesture = Gesture::Dragging { node, last: (x, y) };
				None
			}
			Gesture::Panning { last } => {
				surface.camera.pan_by(x - last.0, y - last.1);
				self.gesture = Gesture::Panning { last: (x, y) };
				None
			}
			Gesture::Idle => {
				let hit = self.hit(&surface, x, y);
				self.set_hover(hit, surface.nodes)
			}
		}
	}

	pub fn pointer_up(&mut self) {
		if let Gesture::Dragging { node, .. } = self.gesture {
			debug!("drag end on node {node}");
		}
		self.gesture = Gesture::Idle;
	}

	/// Like [`Self::pointer_up`], and also drops any hover.
	pub fn pointer_leave(&mut self, nodes: &[Node]) -> Option<HostEvent> {
		self.pointer_up();
		self.set_hover(None, nodes)
	}

	pub fn wheel(&mut self, camera: &mut Camera, delta_y: f64, x: f64, y: f64) {
		camera.wheel(delta_y, x, y, &self.limits);
	}

	fn set_hover(&mut self, hit: Option<usize>, nodes: &[Node]) -> Option<HostEvent> {
		if hit == self.hovered {
			return None;
		}
		self.hovered = hit;
		Some(HostEvent::Hover(
			hit.and_then(|idx| nodes.get(idx)).map(|n| n.id.clone()),
		))
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::topology::store::tests::paper;
	use crate::components::topology::style::MAX_NODE_RADIUS;
	use crate::components::topology::types::{Bounds, Position};

	struct Rig {
		nodes: Vec<Node>,
		store: PositionStore,
		camera: Camera,
		ctl: InteractionController,
	}

	impl Rig {
		fn new(placed: &[(&str, f64, f64, f64)]) -> Self {
			let nodes: Vec<_> = placed.iter().map(|&(id, score, _, _)| paper(id, score)).collect();
			let mut store = PositionStore::seed(
				&nodes,
				Bounds::new(640.0, 480.0, MAX_NODE_RADIUS),
				&mut StdRng::seed_from_u64(1),
			);
			for (i, &(_, _, x, y)) in placed.iter().enumerate() {
				*store.get_mut(i).unwrap() = Position::at(x, y);
			}
			Self {
				nodes,
				store,
				camera: Camera::default(),
				ctl: InteractionController::new(ViewConfig::default()),
			}
		}

		fn surface(&mut self, hovered: Option<usize>) -> Surface<'_> {
			Surface {
				nodes: &self.nodes,
				store: &mut self.store,
				camera: &mut self.camera,
				selected: None,
				hovered,
			}
		}

		fn down(&mut self, x: f64, y: f64) -> Option<HostEvent> {
			let mut ctl = std::mem::take(&mut self.ctl);
			let ev = ctl.pointer_down(self.surface(ctl.hovered()), x, y);
			self.ctl = ctl;
			ev
		}

		fn moved(&mut self, x: f64, y: f64) -> Option<HostEvent> {
			let mut ctl = std::mem::take(&mut self.ctl);
			let ev = ctl.pointer_move(self.surface(ctl.hovered()), x, y);
			self.ctl = ctl;
			ev
		}
	}

	#[test]
	fn press_on_empty_space_pans_without_selecting() {
		let mut rig = Rig::new(&[("a", 0.9, 100.0, 100.0)]);
		assert_eq!(rig.down(400.0, 400.0), None);
		assert!(matches!(rig.ctl.gesture(), Gesture::Panning { .. }));
		rig.moved(410.0, 395.0);
		rig.moved(430.0, 390.0);
		assert_eq!((rig.camera.pan_x, rig.camera.pan_y), (30.0, -10.0));
		assert_eq!(rig.store.get(0).unwrap().x, 100.0);
		rig.ctl.pointer_up();
		assert_eq!(rig.ctl.gesture(), Gesture::Idle);
	}

	#[test]
	fn press_on_node_starts_drag_and_selects() {
		let mut rig = Rig::new(&[("a", 0.9, 100.0, 100.0)]);
		assert_eq!(rig.down(103.0, 98.0), Some(HostEvent::Select(Some("a".into()))));
		assert_eq!(rig.ctl.dragging(), Some(0));
		assert_eq!(rig.camera, Camera::default());
	}

	#[test]
	fn drag_release_lands_under_pointer_at_any_zoom() {
		let mut rig = Rig::new(&[("a", 0.9, 200.0, 150.0)]);
		rig.camera = Camera {
			zoom: 2.0,
			pan_x: -60.0,
			pan_y: 25.0,
		};
		let start = rig.camera.world_to_screen(200.0, 150.0);
		rig.down(start.0, start.1);
		rig.moved(start.0 + 37.0, start.1 - 12.0);
		rig.moved(start.0 + 80.0, start.1 + 44.0);
		rig.ctl.pointer_up();
		let expected = rig.camera.screen_to_world(start.0 + 80.0, start.1 + 44.0);
		let p = rig.store.get(0).unwrap();
		assert!((p.x - expected.0).abs() < 1e-9 && (p.y - expected.1).abs() < 1e-9);
	}

	#[test]
	fn hover_fires_once_per_id_change() {
		let mut rig = Rig::new(&[("a", 0.9, 100.0, 100.0), ("b", 0.9, 300.0, 100.0)]);
		let events: Vec<_> = [
			(100.0, 100.0),
			(101.0, 100.0),
			(300.0, 100.0),
			(299.0, 101.0),
			(500.0, 400.0),
			(501.0, 400.0),
		]
		.into_iter()
		.filter_map(|(x, y)| rig.moved(x, y))
		.collect();
		assert_eq!(
			events,
			vec![
				HostEvent::Hover(Some("a".into())),
				HostEvent::Hover(Some("b".into())),
				HostEvent::Hover(None),
			]
		);
	}

	#[test]
	fn leave_clears_gesture_and_hover() {
		let mut rig = Rig::new(&[("a", 0.9, 100.0, 100.0)]);
		rig.moved(100.0, 100.0);
		let nodes = rig.nodes.clone();
		assert_eq!(rig.ctl.pointer_leave(&nodes), Some(HostEvent::Hover(None)));
		assert_eq!(rig.ctl.pointer_leave(&nodes), None);
	}

	#[test]
	fn overlapping_hits_prefer_higher_score() {
		let rig = Rig::new(&[("big", 0.95, 100.0, 100.0), ("small", 0.2, 102.0, 100.0)]);
		let hit = hit_test(&rig.nodes, &rig.store, &rig.camera, (102.0, 100.0), 4.0, |_| false);
		assert_eq!(hit, Some(0));
	}

	#[test]
	fn rendered_centre_always_hits_at_any_camera() {
		let mut rig = Rig::new(&[("a", 0.1, 50.0, 60.0), ("b", 0.7, 500.0, 300.0)]);
		for (zoom, pan_x, pan_y) in [(0.5, 0.0, 0.0), (1.7, -120.0, 40.0), (3.0, 300.0, -500.0)] {
			rig.camera = Camera { zoom, pan_x, pan_y };
			for idx in 0..2 {
				let p = *rig.store.get(idx).unwrap();
				let screen = rig.camera.world_to_screen(p.x, p.y);
				let hit = hit_test(&rig.nodes, &rig.store, &rig.camera, screen, 4.0, |_| false);
				assert_eq!(hit, Some(idx));
			}
		}
	}

	#[test]
	fn tolerance_edge_of_hit_radius() {
		let rig = Rig::new(&[("a", 0.1, 100.0, 100.0)]);
		let r = node_radius(0.1, false) + 4.0;
		let near = hit_test(&rig.nodes, &rig.store, &rig.camera, (100.0 + r - 0.01, 100.0), 4.0, |_| false);
		let far = hit_test(&rig.nodes, &rig.store, &rig.camera, (100.0 + r + 0.01, 100.0), 4.0, |_| false);
		assert_eq!((near, far), (Some(0), None));
	}

	#[test]
	fn hover_from_surface_widens_hit_radius() {
		let mut rig = Rig::new(&[("a", 0.1, 100.0, 100.0)]);
		let x = 100.0 + node_radius(0.1, true) + 3.5;
		let mut ctl = std::mem::take(&mut rig.ctl);
		assert_eq!(ctl.pointer_down(rig.surface(None), x, 100.0), None);
		ctl.pointer_up();
		assert_eq!(
			ctl.pointer_down(rig.surface(Some(0)), x, 100.0),
			Some(HostEvent::Select(Some("a".into())))
		);
	}

	#[test]
	fn empty_graph_never_hits() {
		let mut rig = Rig::new(&[]);
		assert_eq!(rig.down(10.0, 10.0), None);
		assert_eq!(hit_test(&rig.nodes, &rig.store, &rig.camera, (0.0, 0.0), 4.0, |_| true), None);
	}
}
