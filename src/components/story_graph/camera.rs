//! The camera: a translate + uniform-scale transform over the scene, with
//! animated zoom-to-node and zoom-to-fit. Starting a new animation replaces
//! any in-flight one (last writer wins on the transform).

/// Lower zoom bound.
pub const MIN_SCALE: f64 = 0.2;
/// Upper zoom bound.
pub const MAX_SCALE: f64 = 3.0;
/// Scale used when centering on a single node.
pub const FOCUS_SCALE: f64 = 1.0;
/// Camera animation duration in seconds.
pub const TWEEN_SECS: f64 = 0.75;
/// World-space padding around the bounding box for zoom-to-fit.
pub const FIT_PADDING: f64 = 50.0;

/// Affine view transform: screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	/// Screen-space translation x.
	pub x: f64,
	/// Screen-space translation y.
	pub y: f64,
	/// Uniform scale factor.
	pub k: f64,
}

#[derive(Clone, Copy, Debug)]
struct Tween {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
}

fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// Pan/zoom state plus the optional in-flight transition.
pub struct Camera {
	/// Current transform applied to the scene.
	pub transform: ViewTransform,
	tween: Option<Tween>,
}

impl Camera {
	/// Camera at identity scale, origin translated to the viewport center.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform { x: width / 2.0, y: height / 2.0, k: 1.0 },
			tween: None,
		}
	}

	/// Map a screen point back into world space.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Zoom by `factor` about a screen point, clamped to the scale bounds.
	/// Cancels any in-flight animation.
	pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64) {
		self.tween = None;
		let new_k = (self.transform.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Animate toward centering a world point at the given scale.
	pub fn zoom_to_point(&mut self, wx: f64, wy: f64, k: f64, viewport: (f64, f64)) {
		let target = focus_transform(wx, wy, k, viewport);
		self.tween = Some(Tween { from: self.transform, to: target, elapsed: 0.0 });
	}

	/// Animate toward fitting all given `(x, y, size)` points in view.
	pub fn zoom_to_fit(&mut self, points: &[(f64, f64, f64)], viewport: (f64, f64)) {
		let Some(target) = fit_transform(points, viewport) else {
			return;
		};
		self.tween = Some(Tween { from: self.transform, to: target, elapsed: 0.0 });
	}

	/// Drop any in-flight animation, freezing the current transform.
	pub fn cancel(&mut self) {
		self.tween = None;
	}

	/// Advance the animation. Returns true while a tween is still running.
	pub fn tick(&mut self, dt: f64) -> bool {
		let Some(mut tween) = self.tween.take() else {
			return false;
		};
		tween.elapsed += dt;
		let t = (tween.elapsed / TWEEN_SECS).min(1.0);
		let e = ease_in_out_cubic(t);
		self.transform = ViewTransform {
			x: tween.from.x + (tween.to.x - tween.from.x) * e,
			y: tween.from.y + (tween.to.y - tween.from.y) * e,
			k: tween.from.k + (tween.to.k - tween.from.k) * e,
		};
		if t < 1.0 {
			self.tween = Some(tween);
			true
		} else {
			false
		}
	}
}

/// Transform that centers a world point in the viewport at scale `k`.
pub fn focus_transform(wx: f64, wy: f64, k: f64, viewport: (f64, f64)) -> ViewTransform {
	let k = k.clamp(MIN_SCALE, MAX_SCALE);
	ViewTransform {
		x: viewport.0 / 2.0 - wx * k,
		y: viewport.1 / 2.0 - wy * k,
		k,
	}
}

/// Transform fitting the padded bounding box of the points in the viewport
/// without exceeding 1:1. Fewer than two points, or a zero-extent box,
/// degenerate to centering on the single point; no points yields `None`.
pub fn fit_transform(
	points: &[(f64, f64, f64)],
	viewport: (f64, f64),
) -> Option<ViewTransform> {
	let (&(first_x, first_y, _), rest) = points.split_first()?;
	if rest.is_empty() {
		return Some(focus_transform(first_x, first_y, FOCUS_SCALE, viewport));
	}

	let mut min_x = f64::INFINITY;
	let mut min_y = f64::INFINITY;
	let mut max_x = f64::NEG_INFINITY;
	let mut max_y = f64::NEG_INFINITY;
	for &(x, y, size) in points {
		min_x = min_x.min(x - size);
		min_y = min_y.min(y - size);
		max_x = max_x.max(x + size);
		max_y = max_y.max(y + size);
	}

	let width = max_x - min_x;
	let height = max_y - min_y;
	if width <= 0.0 && height <= 0.0 {
		return Some(focus_transform(first_x, first_y, FOCUS_SCALE, viewport));
	}

	let k = (viewport.0 / (width + 2.0 * FIT_PADDING))
		.min(viewport.1 / (height + 2.0 * FIT_PADDING))
		.min(1.0)
		.clamp(MIN_SCALE, MAX_SCALE);
	let cx = (min_x + max_x) / 2.0;
	let cy = (min_y + max_y) / 2.0;
	Some(focus_transform(cx, cy, k, viewport))
}
