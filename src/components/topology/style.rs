//! Visual policy shared by the renderer and hit-testing.
//!
//! Hit-testing must agree with what is drawn, so every radius decision lives
//! here and nowhere else.

use std::fmt;

/// Scores strictly above this are "major" nodes.
pub const MAJOR_THRESHOLD: f64 = 0.6;
/// Major nodes at or above this score always carry a label.
pub const LABEL_SCORE: f64 = 0.8;

const MAJOR_MIN_RADIUS: f64 = 8.0;
const MAJOR_MAX_RADIUS: f64 = 18.0;
const SATELLITE_MIN_RADIUS: f64 = 2.0;
const SATELLITE_MAX_RADIUS: f64 = 4.5;
/// Added when a node is selected, hovered or dragged.
pub const EMPHASIS_BONUS: f64 = 3.0;
/// Nodes smaller than this skip the specular highlight dot.
pub const HIGHLIGHT_MIN_RADIUS: f64 = 4.0;
pub const LABEL_MAX_CHARS: usize = 32;

/// Largest radius any node can be drawn with; used as the layout margin.
pub const MAX_NODE_RADIUS: f64 = MAJOR_MAX_RADIUS + EMPHASIS_BONUS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
	}
}

pub fn is_major(score: f64) -> bool {
	score > MAJOR_THRESHOLD
}

/// Render radius in world units.
pub fn node_radius(score: f64, emphasized: bool) -> f64 {
	let score = if score.is_finite() {
		score.clamp(0.0, 1.0)
	} else {
		0.0
	};
	let base = if is_major(score) {
		let t = (score - MAJOR_THRESHOLD) / (1.0 - MAJOR_THRESHOLD);
		MAJOR_MIN_RADIUS + t * (MAJOR_MAX_RADIUS - MAJOR_MIN_RADIUS)
	} else {
		let t = score / MAJOR_THRESHOLD;
		SATELLITE_MIN_RADIUS + t * (SATELLITE_MAX_RADIUS - SATELLITE_MIN_RADIUS)
	};
	if emphasized {
		base + EMPHASIS_BONUS
	} else {
		base
	}
}

pub fn wants_label(score: f64, selected: bool, hovered: bool) -> bool {
	selected || hovered || (is_major(score) && score >= LABEL_SCORE)
}

pub fn truncate_label(title: &str) -> String {
	if title.chars().count() <= LABEL_MAX_CHARS {
		return title.to_string();
	}
	let mut out: String = title.chars().take(LABEL_MAX_CHARS - 1).collect();
	out.push('…');
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn majors_are_always_larger_than_satellites() {
		assert!(node_radius(0.61, false) > node_radius(0.6, false));
		assert!(node_radius(0.6, false) <= SATELLITE_MAX_RADIUS);
		assert_eq!(node_radius(1.0, false), MAJOR_MAX_RADIUS);
		assert_eq!(node_radius(0.0, false), SATELLITE_MIN_RADIUS);
	}

	#[test]
	fn emphasis_adds_fixed_bonus() {
		let r = node_radius(0.3, false);
		assert_eq!(node_radius(0.3, true), r + EMPHASIS_BONUS);
		assert!(node_radius(1.0, true) <= MAX_NODE_RADIUS);
	}

	#[test]
	fn non_finite_score_is_treated_as_zero() {
		assert_eq!(node_radius(f64::NAN, false), SATELLITE_MIN_RADIUS);
	}

	#[test]
	fn label_policy() {
		assert!(wants_label(0.9, false, false));
		assert!(!wants_label(0.7, false, false));
		assert!(wants_label(0.1, true, false));
		assert!(wants_label(0.1, false, true));
	}

	#[test]
	fn long_titles_are_truncated() {
		let t = "x".repeat(80);
		let label = truncate_label(&t);
		assert_eq!(label.chars().count(), LABEL_MAX_CHARS);
		assert!(label.ends_with('…'));
		assert_eq!(truncate_label("short"), "short");
	}

	#[test]
	fn css_color_string() {
		assert_eq!(
			Rgba::rgb(1, 2, 3).with_alpha(0.5).to_string(),
			"rgba(1, 2, 3, 0.500)"
		);
	}
}
