use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::render::{DrawCommand, Paint};
use super::style::Rgba;

/// Replay `commands` onto `ctx`. Coordinates are CSS pixels; `pixel_ratio`
/// maps them onto the backing store.
pub fn paint(ctx: &CanvasRenderingContext2d, pixel_ratio: f64, commands: &[DrawCommand]) {
	let _ = ctx.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0);
	for cmd in commands {
		match cmd {
			DrawCommand::Background {
				width,
				height,
				top,
				bottom,
			} => {
				let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, *height);
				let _ = gradient.add_color_stop(0.0, &top.to_string());
				let _ = gradient.add_color_stop(1.0, &bottom.to_string());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill_rect(0.0, 0.0, *width, *height);
			}
			DrawCommand::PushTransform { pan_x, pan_y, zoom } => {
				ctx.save();
				let _ = ctx.translate(*pan_x, *pan_y);
				let _ = ctx.scale(*zoom, *zoom);
			}
			DrawCommand::PopTransform => ctx.restore(),
			DrawCommand::Line {
				from,
				to,
				color,
				width,
			} => {
				ctx.set_stroke_style_str(&color.to_string());
				ctx.set_line_width(*width);
				ctx.begin_path();
				ctx.move_to(from.0, from.1);
				ctx.line_to(to.0, to.1);
				ctx.stroke();
			}
			DrawCommand::FillCircle {
				center,
				radius,
				paint,
			} => {
				set_fill(ctx, *center, paint);
				ctx.begin_path();
				let _ = ctx.arc(center.0, center.1, *radius, 0.0, 2.0 * PI);
				ctx.fill();
			}
			DrawCommand::StrokeCircle {
				center,
				radius,
				color,
				width,
			} => {
				ctx.set_stroke_style_str(&color.to_string());
				ctx.set_line_width(*width);
				ctx.begin_path();
				let _ = ctx.arc(center.0, center.1, *radius, 0.0, 2.0 * PI);
				ctx.stroke();
			}
			DrawCommand::RoundedRect {
				x,
				y,
				width,
				height,
				radius,
				fill,
			} => {
				rounded_rect_path(ctx, *x, *y, *width, *height, *radius);
				ctx.set_fill_style_str(&fill.to_string());
				ctx.fill();
			}
			DrawCommand::Text {
				at,
				text,
				font_px,
				color,
			} => {
				ctx.set_font(&format!("{font_px}px sans-serif"));
				ctx.set_text_align("center");
				ctx.set_text_baseline("middle");
				ctx.set_fill_style_str(&color.to_string());
				let _ = ctx.fill_text(text, at.0, at.1);
			}
		}
	}
}

fn set_fill(ctx: &CanvasRenderingContext2d, (x, y): (f64, f64), paint: &Paint) {
	match paint {
		Paint::Solid(color) => ctx.set_fill_style_str(&color.to_string()),
		Paint::Radial {
			inner,
			outer,
			stops,
		} => match ctx.create_radial_gradient(x, y, *inner, x, y, *outer) {
			Ok(gradient) => {
				for (offset, color) in stops {
					let _ = gradient.add_color_stop(*offset as f32, &color.to_string());
				}
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			// Degenerate radii; fall back to the innermost stop.
			Err(_) => {
				let fallback = stops.first().map(|(_, c)| *c).unwrap_or(Rgba::WHITE);
				ctx.set_fill_style_str(&fallback.to_string());
			}
		},
	}
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	ctx.quadratic_curve_to(x + w, y, x + w, y + r);
	ctx.line_to(x + w, y + h - r);
	ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
	ctx.line_to(x + r, y + h);
	ctx.quadratic_curve_to(x, y + h, x, y + h - r);
	ctx.line_to(x, y + r);
	ctx.quadratic_curve_to(x, y, x + r, y);
	ctx.close_path();
}
