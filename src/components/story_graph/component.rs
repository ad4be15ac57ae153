//! The interactive story graph canvas component: animation loop, input
//! gestures, and the checkpoints where layout positions flow back out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use super::render;
use super::state::StoryGraphState;
use super::types::GraphData;
use crate::story::types::NodePosition;

/// Force-directed canvas over the visible story graph.
///
/// `on_node_click` fires for a click that was not a drag; settled layout
/// positions are reported through `on_positions_settled` so the host can
/// persist them. Setting `focus_node` animates the camera to that node;
/// double-click zooms to fit.
#[component]
pub fn StoryGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] on_node_click: Callback<String>,
	#[prop(into)] on_positions_settled: Callback<Vec<NodePosition>>,
	#[prop(into)] focus_node: Signal<Option<String>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<StoryGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let running = Rc::new(Cell::new(true));
	let (state_init, animate_init, resize_cb_init, running_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		running.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			(
				window
					.inner_width()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(800.0),
				window
					.inner_height()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(600.0),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};
		*state_init.borrow_mut() =
			Some(StoryGraphState::new(&data.get_untracked(), w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = (
					win.inner_width()
						.ok()
						.and_then(|v| v.as_f64())
						.unwrap_or(800.0),
					win.inner_height()
						.ok()
						.and_then(|v| v.as_f64())
						.unwrap_or(600.0),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window
					.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, running_anim) = (
			state_init.clone(),
			animate_init.clone(),
			running_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.get() {
				return;
			}
			let settled = {
				let mut guard = state_anim.borrow_mut();
				if let Some(ref mut s) = *guard {
					s.tick(0.016);
					render::render(s, &ctx);
					s.take_settled_positions()
				} else {
					None
				}
			};
			// Checkpoint outside the borrow: the callback may re-enter the
			// store and re-derive our input projection.
			if let Some(positions) = settled {
				on_positions_settled.run(positions);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// A reveal, reset or load changed the projection: re-seed the physics
	// input while the camera and surviving positions carry over.
	let state_data = state.clone();
	Effect::new(move |_| {
		let data = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.reseed(&data);
		}
	});

	let state_focus = state.clone();
	Effect::new(move |_| {
		if let Some(id) = focus_node.get()
			&& let Some(ref mut s) = *state_focus.borrow_mut()
		{
			s.zoom_to_node(&id);
		}
	});

	// The cleanup closure must be Send + Sync; these handles never leave
	// the main thread, so a SendWrapper carries them across the bound.
	let cleanup = SendWrapper::new((running, animate, resize_cb));
	on_cleanup(move || {
		// Stop the loop and drop the closures; no orphaned timers survive
		// the component.
		let (running, animate, resize_cb) = cleanup.take();
		running.set(false);
		*animate.borrow_mut() = None;
		if let (Some(win), Some(cb)) = (web_sys::window(), &*resize_cb.borrow()) {
			let _ = win.remove_event_listener_with_callback(
				"resize",
				cb.as_ref().unchecked_ref(),
			);
		}
	});

	let offset = move |ev: &MouseEvent| {
		let rect = canvas_ref
			.get_untracked()
			.map(|c| HtmlCanvasElement::from(c).get_bounding_client_rect());
		match rect {
			Some(rect) => (
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			),
			None => (ev.client_x() as f64, ev.client_y() as f64),
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = offset(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.begin_drag(idx, x, y);
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.camera.transform.x;
				s.pan.transform_start_y = s.camera.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = offset(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer = (x, y);
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.camera.cancel();
				s.camera.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.camera.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let (clicked, positions) = {
			let mut guard = state_mu.borrow_mut();
			let Some(ref mut s) = *guard else {
				return;
			};
			let mut clicked = None;
			if s.drag.active && !s.drag.moved {
				clicked = s.drag.node_idx.and_then(|idx| s.node_id(idx));
			}
			if s.drag.active {
				s.end_drag();
			}
			s.pan.active = false;
			(clicked, s.take_settled_positions())
		};
		if let Some(positions) = positions {
			on_positions_settled.run(positions);
		}
		if let Some(id) = clicked {
			on_node_click.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.drag.active {
				s.end_drag();
			}
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = offset(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.camera.zoom_about(x, y, factor);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.zoom_to_fit();
		}
	};

	let touch_offset = move |ev: &TouchEvent, i: u32| {
		let touch = ev.touches().get(i)?;
		let rect = canvas_ref
			.get_untracked()
			.map(|c| HtmlCanvasElement::from(c).get_bounding_client_rect());
		Some(match rect {
			Some(rect) => (
				touch.client_x() as f64 - rect.left(),
				touch.client_y() as f64 - rect.top(),
			),
			None => (touch.client_x() as f64, touch.client_y() as f64),
		})
	};

	// Distance between the two active touches while a pinch is in progress.
	let pinch_dist: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));

	let (state_ts, pinch_ts) = (state.clone(), pinch_dist.clone());
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		if let (Some((x1, y1)), Some((x2, y2))) = (touch_offset(&ev, 0), touch_offset(&ev, 1)) {
			pinch_ts.set(Some(((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()));
			if let Some(ref mut s) = *state_ts.borrow_mut() {
				if s.drag.active {
					s.end_drag();
				}
				s.pan.active = false;
			}
			return;
		}
		let Some((x, y)) = touch_offset(&ev, 0) else {
			return;
		};
		if let Some(ref mut s) = *state_ts.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.begin_drag(idx, x, y);
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.camera.transform.x;
				s.pan.transform_start_y = s.camera.transform.y;
			}
		}
	};

	let (state_tm, pinch_tm) = (state.clone(), pinch_dist.clone());
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		if let (Some((x1, y1)), Some((x2, y2))) = (touch_offset(&ev, 0), touch_offset(&ev, 1)) {
			let dist = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
			if let Some(prev) = pinch_tm.replace(Some(dist))
				&& prev > 0.0
				&& let Some(ref mut s) = *state_tm.borrow_mut()
			{
				s.camera
					.zoom_about((x1 + x2) / 2.0, (y1 + y2) / 2.0, dist / prev);
			}
			return;
		}
		let Some((x, y)) = touch_offset(&ev, 0) else {
			return;
		};
		if let Some(ref mut s) = *state_tm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.camera.cancel();
				s.camera.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.camera.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let (state_te, pinch_te) = (state.clone(), pinch_dist);
	let on_touchend = move |ev: TouchEvent| {
		if ev.touches().length() >= 2 {
			return;
		}
		pinch_te.set(None);
		let (tapped, positions) = {
			let mut guard = state_te.borrow_mut();
			let Some(ref mut s) = *guard else {
				return;
			};
			let mut tapped = None;
			if s.drag.active && !s.drag.moved {
				tapped = s.drag.node_idx.and_then(|idx| s.node_id(idx));
			}
			if s.drag.active {
				s.end_drag();
			}
			s.pan.active = false;
			(tapped, s.take_settled_positions())
		};
		if let Some(positions) = positions {
			on_positions_settled.run(positions);
		}
		if let Some(id) = tapped {
			on_node_click.run(id);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="story-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
