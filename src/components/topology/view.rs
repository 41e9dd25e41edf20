//! Per-instance visualization context.
//!
//! Owns every piece of mutable layout state for one mounted canvas: the
//! position store, camera, starfield, relaxation task and gesture state.
//! The component drives it from DOM events and animation frames; tests drive
//! it directly.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::camera::Camera;
use super::config::TopologyConfig;
use super::interaction::{HostEvent, InteractionController, Surface};
use super::render::{DrawCommand, Scene, render_frame};
use super::scheduler::TickTask;
use super::simulation::ForceSimulation;
use super::starfield::Starfield;
use super::store::PositionStore;
use super::style::MAX_NODE_RADIUS;
use super::types::{Bounds, Edge, Node};

pub struct TopologyView {
	nodes: Vec<Node>,
	edges: Vec<(usize, usize)>,
	store: PositionStore,
	camera: Camera,
	starfield: Starfield,
	simulation: ForceSimulation,
	task: TickTask,
	controller: InteractionController,
	selected: Option<String>,
	host_hovered: Option<String>,
	bounds: Bounds,
	viewport: (f64, f64),
	rng: SmallRng,
	alive: bool,
}

impl TopologyView {
	pub fn new(config: TopologyConfig, viewport: (f64, f64)) -> Self {
		Self::with_rng(config, viewport, SmallRng::from_entropy())
	}

	pub fn with_rng(config: TopologyConfig, viewport: (f64, f64), mut rng: SmallRng) -> Self {
		let bounds = Bounds::new(
			config.layout.world_width,
			config.layout.world_height,
			MAX_NODE_RADIUS,
		);
		let starfield = Starfield::generate(&mut rng);
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			store: PositionStore::default(),
			camera: Camera::default(),
			starfield,
			task: TickTask::new(config.layout.iterations),
			simulation: ForceSimulation::new(config.layout),
			controller: InteractionController::new(config.view),
			selected: None,
			host_hovered: None,
			bounds,
			viewport,
			rng,
			alive: true,
		}
	}

	/// Replace the dataset: positions are rebuilt from scratch and the
	/// relaxation restarts.
	pub fn set_data(&mut self, nodes: Vec<Node>, edges: &[Edge]) {
		self.store = PositionStore::seed(&nodes, self.bounds, &mut self.rng);
		let (pairs, skipped) = self.store.resolve_edges(edges);
		if skipped > 0 {
			debug!("skipped {skipped} edges with unknown or identical endpoints");
		}
		debug!("seeded {} nodes, {} edges", nodes.len(), pairs.len());
		self.nodes = nodes;
		self.edges = pairs;
		self.controller.reset();
		if self.nodes.is_empty() {
			self.task.cancel();
		} else {
			self.task.start();
		}
	}

	pub fn set_selected(&mut self, id: Option<String>) {
		self.selected = id;
	}

	pub fn set_host_hovered(&mut self, id: Option<String>) {
		self.host_hovered = id;
	}

	/// New surface size in CSS pixels. Positions are kept; subsequent ticks
	/// clamp into the resized world.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = (width, height);
		self.bounds = Bounds::new(width, height, MAX_NODE_RADIUS);
	}

	/// Run at most one relaxation tick. Returns whether anything moved.
	pub fn advance(&mut self) -> bool {
		if !self.alive || self.controller.dragging().is_some() {
			return false;
		}
		let Some(tick) = self.task.next_tick() else {
			return false;
		};
		self.simulation
			.step(&mut self.store, &self.edges, self.bounds, tick);
		if !self.task.is_running() {
			info!("layout settled after {} ticks", self.task.ticks());
		}
		true
	}

	pub fn is_simulating(&self) -> bool {
		self.task.is_running()
	}

	fn index(&self, id: Option<&str>) -> Option<usize> {
		id.and_then(|id| self.store.index_of(id))
	}

	/// Host-driven hover wins over pointer hover. Drawing and hit-testing
	/// both go through here so they agree on emphasis.
	fn hovered(&self) -> Option<usize> {
		self.index(self.host_hovered.as_deref()).or(self.controller.hovered())
	}

	pub fn frame(&self) -> Vec<DrawCommand> {
		render_frame(&Scene {
			width: self.viewport.0,
			height: self.viewport.1,
			nodes: &self.nodes,
			edges: &self.edges,
			store: &self.store,
			camera: &self.camera,
			starfield: &self.starfield,
			selected: self.index(self.selected.as_deref()),
			hovered: self.hovered(),
			dragging: self.controller.dragging(),
		})
	}

	fn surface(&mut self) -> (Surface<'_>, &mut InteractionController) {
		let (selected, hovered) = (self.index(self.selected.as_deref()), self.hovered());
		(
			Surface {
				nodes: &self.nodes,
				store: &mut self.store,
				camera: &mut self.camera,
				selected,
				hovered,
			},
			&mut self.controller,
		)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<HostEvent> {
		let (surface, controller) = self.surface();
		let event = controller.pointer_down(surface, x, y);
		if self.controller.dragging().is_some() && self.task.is_running() {
			debug!("drag suspended layout at tick {}", self.task.ticks());
			self.task.cancel();
		}
		event
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<HostEvent> {
		let (surface, controller) = self.surface();
		controller.pointer_move(surface, x, y)
	}

	pub fn pointer_up(&mut self) {
		self.controller.pointer_up();
	}

	pub fn pointer_leave(&mut self) -> Option<HostEvent> {
		self.controller.pointer_leave(&self.nodes)
	}

	pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) {
		self.controller.wheel(&mut self.camera, delta_y, x, y);
	}

	pub fn zoom_in(&mut self) {
		let factor = self.controller.limits().zoom_in_factor;
		self.zoom_about_centre(factor);
	}

	pub fn zoom_out(&mut self) {
		let factor = self.controller.limits().zoom_out_factor;
		self.zoom_about_centre(factor);
	}

	fn zoom_about_centre(&mut self, factor: f64) {
		let (w, h) = self.viewport;
		self.camera
			.zoom_at(factor, w / 2.0, h / 2.0, self.controller.limits());
	}

	pub fn reset_view(&mut self) {
		self.camera.reset();
	}

	#[cfg(test)]
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	#[cfg(test)]
	pub fn store(&self) -> &PositionStore {
		&self.store
	}

	pub fn is_alive(&self) -> bool {
		self.alive
	}

	/// Stop all further work; frame callbacks still in flight become no-ops.
	pub fn teardown(&mut self) {
		self.alive = false;
		self.task.cancel();
		self.controller.reset();
	}
}
