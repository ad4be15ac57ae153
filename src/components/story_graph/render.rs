//! Canvas drawing for the story graph: gradient links, node circles with
//! visited/current hues and visit badges, labels, hover glow and tooltip.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::StoryGraphState;

const BACKGROUND: &str = "#1a1a2e";
/// Hue marking the node the player currently occupies.
const CURRENT_COLOR: &str = "#ffcc00";
const BADGE_COLOR: &str = "#e94560";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Draw one frame. With no visible nodes only the background is painted.
pub fn render(state: &StoryGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.node_count() == 0 {
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.camera.transform.x, state.camera.transform.y);
	let _ = ctx.scale(state.camera.transform.k, state.camera.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();

	draw_tooltip(state, ctx);
}

fn node_fill(info: &super::state::NodeInfo) -> &str {
	if info.current {
		CURRENT_COLOR
	} else {
		// The store already rewrites the color on revisit; this keeps the
		// encoding purely derived even for loaded states.
		if info.visited_count > 1 {
			crate::story::reducer::VISITED_COLOR
		} else {
			&info.color
		}
	}
}

fn draw_links(state: &StoryGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.camera.transform.k;
	let (line_width, dash, gap) = (1.5 / k, 8.0 / k, 4.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let is_highlighted =
			state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let (alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		// Stroke fades from the source node's color into the target's.
		let gradient = ctx.create_linear_gradient(x1, y1, x2, y2);
		let _ = gradient.add_color_stop(0.0, &n1.data.user_data.color);
		let _ = gradient.add_color_stop(1.0, &n2.data.user_data.color);
		#[allow(deprecated)]
		ctx.set_stroke_style(&gradient);
		ctx.set_global_alpha(alpha);
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (n1.data.user_data.size, n2.data.user_data.size);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * r2, y2 - uy * r2);
		ctx.stroke();
		ctx.set_global_alpha(1.0);
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &StoryGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.camera.transform.k,
	);

	// Dimmed layer first, highlighted nodes on top of it.
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let (alpha, radius) = (1.0 - 0.7 * t, info.size * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		draw_node_circle(ctx, x, y, radius, node_fill(info), info.visited_count, k);
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		let _ = ctx.fill_text(&info.label, x + radius + 4.0, y + 4.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(info.size * (1.0 + 0.35 * t), info.size * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(info.size * (1.0 + 0.2 * t), info.size * (1.4 + 0.6 * t))
		} else {
			(info.size, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) =
				ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)
			{
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient
					.add_color_stop(0.0, &format!("rgba(255, 255, 255, {alpha})"));
				let _ = gradient.add_color_stop(
					0.6,
					&format!("rgba(200, 220, 255, {})", alpha * 0.3),
				);
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_node_circle(ctx, x, y, radius, node_fill(info), info.visited_count, k);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		let _ = ctx.fill_text(&info.label, x + radius + 4.0, y + 4.0);
	});
}

fn draw_node_circle(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	fill: &str,
	visited_count: u32,
	k: f64,
) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_line_width(1.5 / k);
	ctx.stroke();

	if visited_count > 0 {
		let badge_r = (radius * 0.45).max(5.0 / k);
		let (bx, by) = (x + radius * 0.85, y - radius * 0.85);
		ctx.begin_path();
		let _ = ctx.arc(bx, by, badge_r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(BADGE_COLOR);
		ctx.fill();
		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px sans-serif", badge_r * 1.2));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&visited_count.to_string(), bx, by + badge_r * 0.4);
		ctx.set_text_align("start");
	}
}

// Screen-space tooltip for the hovered node: label plus visit count.
fn draw_tooltip(state: &StoryGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hover.node else {
		return;
	};
	let mut lines: Option<(String, u32)> = None;
	state.graph.visit_nodes(|node| {
		if node.index() == idx {
			let info = &node.data.user_data;
			lines = Some((info.label.clone(), info.visited_count));
		}
	});
	let Some((label, visits)) = lines else {
		return;
	};

	let text = format!("{label} (visits: {visits})");
	let (px, py) = state.pointer;
	ctx.set_font("12px sans-serif");
	let width = ctx.measure_text(&text).map(|m| m.width()).unwrap_or(120.0);
	let (bx, by) = (px + 12.0, py - 30.0);

	ctx.set_fill_style_str("rgba(20, 25, 35, 0.9)");
	ctx.fill_rect(bx, by, width + 16.0, 22.0);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.25)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(bx, by, width + 16.0, 22.0);
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(&text, bx + 8.0, by + 15.0);
}
