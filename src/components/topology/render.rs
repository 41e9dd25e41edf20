//! Frame composition as a flat list of draw commands.
//!
//! Nothing here touches a canvas; [`super::canvas::paint`] replays the list.
//! Layering, back to front: background, starfield, grid, camera transform,
//! resting edges, hovered edges, nodes by ascending score, labels.

use super::camera::Camera;
use super::cluster::cluster_shape;
use super::starfield::Starfield;
use super::store::PositionStore;
use super::style::{
	HIGHLIGHT_MIN_RADIUS, Rgba, is_major, node_radius, truncate_label, wants_label,
};
use super::types::Node;

const BACKGROUND_TOP: Rgba = Rgba::rgb(11, 16, 32);
const BACKGROUND_BOTTOM: Rgba = Rgba::rgb(24, 18, 43);
const GRID_COLOR: Rgba = Rgba::rgb(148, 163, 184);
const GRID_SPACING: f64 = 40.0;
const LABEL_BACKGROUND: Rgba = Rgba::rgb(15, 23, 42);
const LABEL_FONT_PX: f64 = 11.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
	Solid(Rgba),
	/// Concentric gradient from `inner` to `outer` radius around the circle
	/// centre.
	Radial {
		inner: f64,
		outer: f64,
		stops: Vec<(f64, Rgba)>,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	/// Vertical gradient over the whole surface, in CSS pixels.
	Background {
		width: f64,
		height: f64,
		top: Rgba,
		bottom: Rgba,
	},
	/// Push state and apply `translate(pan) * scale(zoom)`.
	PushTransform {
		pan_x: f64,
		pan_y: f64,
		zoom: f64,
	},
	PopTransform,
	Line {
		from: (f64, f64),
		to: (f64, f64),
		color: Rgba,
		width: f64,
	},
	FillCircle {
		center: (f64, f64),
		radius: f64,
		paint: Paint,
	},
	StrokeCircle {
		center: (f64, f64),
		radius: f64,
		color: Rgba,
		width: f64,
	},
	RoundedRect {
		x: f64,
		y: f64,
		width: f64,
		height: f64,
		radius: f64,
		fill: Rgba,
	},
	/// Text centred horizontally and vertically on `at`.
	Text {
		at: (f64, f64),
		text: String,
		font_px: f64,
		color: Rgba,
	},
}

/// Everything one frame depends on, borrowed from the view.
pub struct Scene<'a> {
	pub width: f64,
	pub height: f64,
	pub nodes: &'a [Node],
	pub edges: &'a [(usize, usize)],
	pub store: &'a PositionStore,
	pub camera: &'a Camera,
	pub starfield: &'a Starfield,
	pub selected: Option<usize>,
	pub hovered: Option<usize>,
	pub dragging: Option<usize>,
}

impl Scene<'_> {
	fn is_emphasized(&self, idx: usize) -> bool {
		self.selected == Some(idx) || self.hovered == Some(idx) || self.dragging == Some(idx)
	}

	fn color_of(&self, idx: usize) -> Rgba {
		cluster_shape(self.store.cluster_of(idx)).color
	}
}

/// Node indices in draw order: ascending score, ties by list order.
pub fn draw_order(nodes: &[Node], count: usize) -> Vec<usize> {
	let mut order: Vec<usize> = (0..count.min(nodes.len())).collect();
	order.sort_by(|&a, &b| nodes[a].score.total_cmp(&nodes[b].score).then(a.cmp(&b)));
	order
}

pub fn render_frame(scene: &Scene<'_>) -> Vec<DrawCommand> {
	let mut out = Vec::with_capacity(64 + scene.nodes.len() * 5 + scene.edges.len());

	out.push(DrawCommand::Background {
		width: scene.width,
		height: scene.height,
		top: BACKGROUND_TOP,
		bottom: BACKGROUND_BOTTOM,
	});
	draw_stars(scene, &mut out);
	draw_grid(scene, &mut out);

	out.push(DrawCommand::PushTransform {
		pan_x: scene.camera.pan_x,
		pan_y: scene.camera.pan_y,
		zoom: scene.camera.zoom,
	});
	if !scene.store.is_empty() {
		draw_edges(scene, &mut out);
		let order = draw_order(scene.nodes, scene.store.len());
		for &idx in &order {
			draw_node(scene, idx, &mut out);
		}
		for &idx in &order {
			draw_label(scene, idx, &mut out);
		}
	}
	out.push(DrawCommand::PopTransform);
	out
}

fn draw_stars(scene: &Scene<'_>, out: &mut Vec<DrawCommand>) {
	for star in scene.starfield.stars() {
		out.push(DrawCommand::FillCircle {
			center: (star.x * scene.width, star.y * scene.height),
			radius: star.radius,
			paint: Paint::Solid(Rgba::WHITE.with_alpha(star.alpha)),
		});
	}
}

fn draw_grid(scene: &Scene<'_>, out: &mut Vec<DrawCommand>) {
	let color = GRID_COLOR.with_alpha(0.05);
	let mut x = GRID_SPACING;
	while x < scene.width {
		out.push(DrawCommand::Line {
			from: (x, 0.0),
			to: (x, scene.height),
			color,
			width: 1.0,
		});
		x += GRID_SPACING;
	}
	let mut y = GRID_SPACING;
	while y < scene.height {
		out.push(DrawCommand::Line {
			from: (0.0, y),
			to: (scene.width, y),
			color,
			width: 1.0,
		});
		y += GRID_SPACING;
	}
}

fn draw_edges(scene: &Scene<'_>, out: &mut Vec<DrawCommand>) {
	let k = scene.camera.zoom;
	let touches_hover =
		|&(s, t): &(usize, usize)| scene.hovered.is_some_and(|h| h == s || h == t);

	for &(s, t) in scene.edges.iter().filter(|e| !touches_hover(*e)) {
		let (Some(a), Some(b)) = (scene.store.get(s), scene.store.get(t)) else {
			continue;
		};
		let bridge = scene.store.cluster_of(s) != scene.store.cluster_of(t);
		out.push(DrawCommand::Line {
			from: (a.x, a.y),
			to: (b.x, b.y),
			color: scene.color_of(s).with_alpha(if bridge { 0.22 } else { 0.1 }),
			width: 0.8 / k,
		});
	}

	for &(s, t) in scene.edges.iter().filter(|e| touches_hover(*e)) {
		let (Some(a), Some(b)) = (scene.store.get(s), scene.store.get(t)) else {
			continue;
		};
		let color = scene.color_of(s);
		out.push(DrawCommand::Line {
			from: (a.x, a.y),
			to: (b.x, b.y),
			color: color.with_alpha(0.25),
			width: 5.0 / k,
		});
		out.push(DrawCommand::Line {
			from: (a.x, a.y),
			to: (b.x, b.y),
			color: color.with_alpha(0.9),
			width: 1.4 / k,
		});
	}
}

fn draw_node(scene: &Scene<'_>, idx: usize, out: &mut Vec<DrawCommand>) {
	let (Some(node), Some(p)) = (scene.nodes.get(idx), scene.store.get(idx)) else {
		return;
	};
	let center = (p.x, p.y);
	let emphasized = scene.is_emphasized(idx);
	let radius = node_radius(node.score, emphasized);
	let color = scene.color_of(idx);
	let k = scene.camera.zoom;

	if is_major(node.score) || scene.selected == Some(idx) || scene.hovered == Some(idx) {
		out.push(DrawCommand::FillCircle {
			center,
			radius: radius * 3.2,
			paint: Paint::Radial {
				inner: radius * 0.8,
				outer: radius * 3.2,
				stops: vec![(0.0, color.with_alpha(0.35)), (1.0, color.with_alpha(0.0))],
			},
		});
	}

	out.push(DrawCommand::FillCircle {
		center,
		radius: radius * 1.6,
		paint: Paint::Solid(color.with_alpha(if emphasized { 0.28 } else { 0.14 })),
	});

	out.push(DrawCommand::FillCircle {
		center,
		radius,
		paint: Paint::Radial {
			inner: 0.0,
			outer: radius,
			stops: vec![
				(0.0, Rgba::WHITE.with_alpha(0.95)),
				(0.55, color),
				(1.0, color.with_alpha(0.0)),
			],
		},
	});

	if radius > HIGHLIGHT_MIN_RADIUS {
		out.push(DrawCommand::FillCircle {
			center: (p.x - radius * 0.3, p.y - radius * 0.3),
			radius: radius * 0.22,
			paint: Paint::Solid(Rgba::WHITE.with_alpha(0.8)),
		});
	}

	if scene.selected == Some(idx) || scene.dragging == Some(idx) {
		out.push(DrawCommand::StrokeCircle {
			center,
			radius: radius + 3.0 / k,
			color: Rgba::WHITE.with_alpha(0.85),
			width: 1.5 / k,
		});
	}
}

fn draw_label(scene: &Scene<'_>, idx: usize, out: &mut Vec<DrawCommand>) {
	let (Some(node), Some(p)) = (scene.nodes.get(idx), scene.store.get(idx)) else {
		return;
	};
	if !wants_label(node.score, scene.selected == Some(idx), scene.hovered == Some(idx)) {
		return;
	}
	// Labels keep a constant on-screen size regardless of zoom.
	let k = scene.camera.zoom;
	let font_px = LABEL_FONT_PX / k;
	let text = truncate_label(&node.title);
	let text_width = text.chars().count() as f64 * font_px * 0.56;
	let (pad_x, pad_y) = (6.0 / k, 3.0 / k);
	let (box_w, box_h) = (text_width + 2.0 * pad_x, font_px + 2.0 * pad_y);
	let cy = p.y + node_radius(node.score, scene.is_emphasized(idx)) + 6.0 / k + box_h / 2.0;

	out.push(DrawCommand::RoundedRect {
		x: p.x - box_w / 2.0,
		y: cy - box_h / 2.0,
		width: box_w,
		height: box_h,
		radius: 4.0 / k,
		fill: LABEL_BACKGROUND.with_alpha(0.82),
	});
	out.push(DrawCommand::Text {
		at: (p.x, cy),
		text,
		font_px,
		color: Rgba::WHITE.with_alpha(0.92),
	});
}
