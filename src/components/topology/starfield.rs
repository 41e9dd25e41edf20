use rand::Rng;

const STAR_COUNT: usize = 140;

/// A star in normalized viewport space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub alpha: f64,
}

/// Decorative backdrop generated once per view and reused every frame.
#[derive(Clone, Debug, Default)]
pub struct Starfield {
	stars: Vec<Star>,
}

impl Starfield {
	pub fn generate<R: Rng>(rng: &mut R) -> Self {
		let stars = (0..STAR_COUNT)
			.map(|_| Star {
				x: rng.gen_range(0.0..1.0),
				y: rng.gen_range(0.0..1.0),
				radius: rng.gen_range(0.3..1.3),
				alpha: rng.gen_range(0.15..0.7),
			})
			.collect();
		Self { stars }
	}

	pub fn stars(&self) -> &[Star] {
		&self.stars
	}
}
