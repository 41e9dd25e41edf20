use serde::Deserialize;

/// A paper (or other research artefact) supplied by the host.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	pub id: String,
	pub title: String,
	/// Relevance in `0..=1`; drives radius and draw order.
	pub score: f64,
	pub year: i32,
	pub citations: u32,
}

/// An undirected link between two node ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	#[serde(rename = "sourceId")]
	pub source_id: String,
	#[serde(rename = "targetId")]
	pub target_id: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

impl Position {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
		}
	}

	pub fn distance_to(&self, x: f64, y: f64) -> f64 {
		let (dx, dy) = (self.x - x, self.y - y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// World-space rectangle nodes are kept inside, inset by `margin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
	pub margin: f64,
}

impl Bounds {
	pub fn new(width: f64, height: f64, margin: f64) -> Self {
		Self {
			width,
			height,
			margin,
		}
	}

	pub fn clamp_x(&self, x: f64) -> f64 {
		clamp_axis(x, self.width, self.margin)
	}

	pub fn clamp_y(&self, y: f64) -> f64 {
		clamp_axis(y, self.height, self.margin)
	}

	#[cfg(test)]
	pub fn contains(&self, x: f64, y: f64) -> bool {
		self.clamp_x(x) == x && self.clamp_y(y) == y
	}
}

// A span narrower than two margins collapses onto its centre line.
fn clamp_axis(v: f64, extent: f64, margin: f64) -> f64 {
	if extent <= 2.0 * margin {
		return extent / 2.0;
	}
	v.clamp(margin, extent - margin)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamp_keeps_points_inside_margin() {
		let b = Bounds::new(100.0, 50.0, 10.0);
		assert_eq!(b.clamp_x(-5.0), 10.0);
		assert_eq!(b.clamp_x(200.0), 90.0);
		assert_eq!(b.clamp_y(25.0), 25.0);
		assert!(b.contains(10.0, 40.0));
		assert!(!b.contains(95.0, 20.0));
	}

	#[test]
	fn narrow_bounds_collapse_to_centre() {
		let b = Bounds::new(15.0, 15.0, 10.0);
		assert_eq!(b.clamp_x(0.0), 7.5);
		assert_eq!(b.clamp_y(14.0), 7.5);
	}

	#[test]
	fn edge_uses_camel_case_keys() {
		let edge: Edge = serde_json::from_str(r#"{"sourceId":"a","targetId":"b"}"#).unwrap();
		assert_eq!(edge.source_id, "a");
		assert_eq!(edge.target_id, "b");
	}
}
