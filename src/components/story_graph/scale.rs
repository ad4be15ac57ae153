//! Linear domain-to-range mappings used by the minimap projection and its
//! click inverse-mapping.

/// A linear scale `domain -> range` with inversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	d0: f64,
	d1: f64,
	r0: f64,
	r1: f64,
}

impl LinearScale {
	/// Build a scale mapping `[d0, d1]` onto `[r0, r1]`.
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { d0: domain.0, d1: domain.1, r0: range.0, r1: range.1 }
	}

	/// Map a domain value into the range. A zero-span domain collapses to
	/// the range midpoint.
	pub fn apply(&self, value: f64) -> f64 {
		let span = self.d1 - self.d0;
		if span == 0.0 {
			return (self.r0 + self.r1) / 2.0;
		}
		self.r0 + (value - self.d0) / span * (self.r1 - self.r0)
	}

	/// Map a range value back into the domain.
	pub fn invert(&self, value: f64) -> f64 {
		let span = self.r1 - self.r0;
		if span == 0.0 {
			return (self.d0 + self.d1) / 2.0;
		}
		self.d0 + (value - self.r0) / span * (self.d1 - self.d0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_endpoints_and_midpoint() {
		let scale = LinearScale::new((0.0, 100.0), (10.0, 210.0));
		assert_eq!(scale.apply(0.0), 10.0);
		assert_eq!(scale.apply(100.0), 210.0);
		assert_eq!(scale.apply(50.0), 110.0);
	}

	#[test]
	fn invert_round_trips() {
		let scale = LinearScale::new((-40.0, 160.0), (10.0, 170.0));
		for v in [-40.0, 0.0, 33.5, 160.0] {
			assert!((scale.invert(scale.apply(v)) - v).abs() < 1e-9);
		}
	}

	#[test]
	fn degenerate_domain_hits_range_midpoint() {
		let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
		assert_eq!(scale.apply(5.0), 50.0);
		assert_eq!(scale.apply(99.0), 50.0);
	}
}
