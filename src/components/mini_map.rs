//! Compact overview canvas: the whole visible graph squeezed through linear
//! scales, with click-to-travel back into world space.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::story_graph::GraphData;
use super::story_graph::scale::LinearScale;

const MARGIN: f64 = 10.0;
const WORLD_PADDING: f64 = 50.0;

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
	let mut range: Option<(f64, f64)> = None;
	for v in values {
		range = Some(match range {
			None => (v, v),
			Some((lo, hi)) => (lo.min(v), hi.max(v)),
		});
	}
	range
}

fn scales(data: &GraphData, width: f64, height: f64) -> Option<(LinearScale, LinearScale)> {
	let xs = extent(data.nodes.iter().map(|n| n.x.unwrap_or(0.0)))?;
	let ys = extent(data.nodes.iter().map(|n| n.y.unwrap_or(0.0)))?;
	Some((
		LinearScale::new(
			(xs.0 - WORLD_PADDING, xs.1 + WORLD_PADDING),
			(MARGIN, width - MARGIN),
		),
		LinearScale::new(
			(ys.0 - WORLD_PADDING, ys.1 + WORLD_PADDING),
			(MARGIN, height - MARGIN),
		),
	))
}

fn draw(data: &GraphData, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str("rgba(20, 25, 35, 0.85)");
	ctx.fill_rect(0.0, 0.0, width, height);
	let Some((sx, sy)) = scales(data, width, height) else {
		return;
	};

	for link in &data.links {
		let source = data.nodes.iter().find(|n| n.id == link.source);
		let target = data.nodes.iter().find(|n| n.id == link.target);
		let (Some(source), Some(target)) = (source, target) else {
			continue;
		};
		ctx.set_stroke_style_str(&link.color);
		ctx.set_line_width(link.width.min(1.5));
		ctx.set_global_alpha(0.6);
		ctx.begin_path();
		ctx.move_to(sx.apply(source.x.unwrap_or(0.0)), sy.apply(source.y.unwrap_or(0.0)));
		ctx.line_to(sx.apply(target.x.unwrap_or(0.0)), sy.apply(target.y.unwrap_or(0.0)));
		ctx.stroke();
		ctx.set_global_alpha(1.0);
	}

	for node in &data.nodes {
		let is_current = data.current_node_id.as_deref() == Some(&node.id);
		let cx = sx.apply(node.x.unwrap_or(0.0));
		let cy = sy.apply(node.y.unwrap_or(0.0));
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, (node.size / 5.0).max(3.0), 0.0, std::f64::consts::TAU);
		ctx.set_fill_style_str(if is_current { "#ffcc00" } else { &node.color });
		ctx.fill();
		if is_current {
			ctx.set_stroke_style_str("#fff");
			ctx.set_line_width(1.0);
			ctx.stroke();
		}
	}

	// Dashed frame hinting at the main view's viewport.
	let (vw, vh) = (width * 0.3, height * 0.3);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&wasm_bindgen::JsValue::from_f64(3.0),
		&wasm_bindgen::JsValue::from_f64(3.0),
	));
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(1.0);
	ctx.stroke_rect((width - vw) / 2.0, (height - vh) / 2.0, vw, vh);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Minimap of the visible story graph. A click is inverse-mapped to world
/// space and reported through `on_travel` as the nearest node's id.
#[component]
pub fn MiniMap(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] on_travel: Callback<String>,
	#[prop(default = 180.0)] width: f64,
	#[prop(default = 180.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};
		draw(&data, &ctx, width, height);
	});

	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let rect = HtmlCanvasElement::from(canvas).get_bounding_client_rect();
		let (cx, cy) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let target = data.with_untracked(|d| {
			let (sx, sy) = scales(d, width, height)?;
			let (wx, wy) = (sx.invert(cx), sy.invert(cy));
			d.nearest_node(wx, wy).map(|n| n.id.clone())
		});
		if let Some(id) = target {
			on_travel.run(id);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="mini-map"
			on:click=on_click
			style="border: 1px solid rgba(255, 255, 255, 0.2); border-radius: 4px; cursor: pointer;"
		/>
	}
}
