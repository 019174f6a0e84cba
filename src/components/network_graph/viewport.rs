//! Pan and zoom transform applied to the whole scene.
//!
//! The transform maps simulation (world) coordinates to canvas pixels:
//! `screen = world * k + (x, y)`. It is independent of the layout engine,
//! which never sees screen coordinates.

use log::warn;
use serde::Deserialize;

use super::config::ordered_range;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Factor applied by the zoom-in button.
	pub zoom_in_factor: f64,
	/// Factor applied by the zoom-out button.
	pub zoom_out_factor: f64,
	/// Factor applied per wheel notch.
	pub wheel_factor: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 3.0,
			zoom_in_factor: 1.5,
			zoom_out_factor: 0.67,
			wheel_factor: 1.1,
		}
	}
}

/// Pan and zoom transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl ViewTransform {
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// Programmatic viewport operations, issued by toolbar buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportCommand {
	ZoomIn,
	ZoomOut,
	Reset,
}

pub struct ViewportController {
	config: ViewportConfig,
	transform: ViewTransform,
	width: f64,
	height: f64,
}

impl ViewportController {
	pub fn new(mut config: ViewportConfig, width: f64, height: f64) -> Self {
		let defaults = ViewportConfig::default();
		let range = match ordered_range(
			(config.min_scale, config.max_scale),
			(defaults.min_scale, defaults.max_scale),
		) {
			(min, max) if min > 0.0 => (min, max),
			_ => (defaults.min_scale, defaults.max_scale),
		};
		if range != (config.min_scale, config.max_scale) {
			warn!(
				"network-graph: zoom range {:?} replaced by {:?}",
				(config.min_scale, config.max_scale),
				range
			);
			(config.min_scale, config.max_scale) = range;
		}
		let mut viewport = Self {
			config,
			transform: ViewTransform::IDENTITY,
			width,
			height,
		};
		viewport.reset();
		viewport
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Current zoom factor, always within `[min_scale, max_scale]`.
	pub fn scale(&self) -> f64 {
		self.transform.k
	}

	pub fn apply(&mut self, command: ViewportCommand) {
		match command {
			ViewportCommand::ZoomIn => self.zoom_in(),
			ViewportCommand::ZoomOut => self.zoom_out(),
			ViewportCommand::Reset => self.reset(),
		}
	}

	/// Zoom in around the centre of the surface.
	pub fn zoom_in(&mut self) {
		let center = self.center();
		self.zoom_at(center, self.config.zoom_in_factor);
	}

	/// Zoom out around the centre of the surface.
	pub fn zoom_out(&mut self) {
		let center = self.center();
		self.zoom_at(center, self.config.zoom_out_factor);
	}

	/// Back to the untranslated view at 100%, or the nearest allowed zoom.
	pub fn reset(&mut self) {
		self.transform = ViewTransform {
			k: 1.0_f64.clamp(self.config.min_scale, self.config.max_scale),
			..ViewTransform::IDENTITY
		};
	}

	/// Translate by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.transform.x += dx;
			self.transform.y += dy;
		}
	}

	/// Multiply the zoom by `scale_delta`, keeping the world point under
	/// `screen` fixed on screen. The result is clamped, not rejected.
	pub fn zoom_at(&mut self, screen: (f64, f64), scale_delta: f64) {
		if !(scale_delta.is_finite() && scale_delta > 0.0) {
			return;
		}
		let (sx, sy) = screen;
		let t = self.transform;
		let new_k = (t.k * scale_delta).clamp(self.config.min_scale, self.config.max_scale);
		let ratio = new_k / t.k;
		self.transform = ViewTransform {
			x: sx - (sx - t.x) * ratio,
			y: sy - (sy - t.y) * ratio,
			k: new_k,
		};
	}

	/// Wheel zoom: scrolling down (`delta_y > 0`) zooms out.
	pub fn wheel(&mut self, screen: (f64, f64), delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / self.config.wheel_factor
		} else {
			self.config.wheel_factor
		};
		self.zoom_at(screen, factor);
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(
			wx * self.transform.k + self.transform.x,
			wy * self.transform.k + self.transform.y,
		)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}
