use super::config::ViewConfig;

/// Pan/zoom transform: `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub zoom: f64,
	pub pan_x: f64,
	pub pan_y: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan_x: 0.0,
			pan_y: 0.0,
		}
	}
}

impl Camera {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
	}

	#[cfg(test)]
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.zoom + self.pan_x, wy * self.zoom + self.pan_y)
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.pan_x += dx;
		self.pan_y += dy;
	}

	/// Multiply zoom by `factor` within the configured limits, keeping the
	/// world point under `(ax, ay)` fixed on screen.
	pub fn zoom_at(&mut self, factor: f64, ax: f64, ay: f64, limits: &ViewConfig) {
		let new_zoom = (self.zoom * factor).clamp(limits.zoom_min, limits.zoom_max);
		let ratio = new_zoom / self.zoom;
		self.pan_x = ax - (ax - self.pan_x) * ratio;
		self.pan_y = ay - (ay - self.pan_y) * ratio;
		self.zoom = new_zoom;
	}

	/// One wheel notch; positive `delta_y` zooms out. Purely horizontal
	/// scrolls are ignored.
	pub fn wheel(&mut self, delta_y: f64, ax: f64, ay: f64, limits: &ViewConfig) {
		if delta_y == 0.0 {
			return;
		}
		let factor = if delta_y > 0.0 {
			limits.zoom_out_factor
		} else {
			limits.zoom_in_factor
		};
		self.zoom_at(factor, ax, ay, limits);
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}
