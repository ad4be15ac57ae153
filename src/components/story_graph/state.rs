//! Working state of the story graph canvas: the physics simulation, the
//! camera, and the input gestures acting on both.
//!
//! The simulation owns per-frame copies of node positions. They flow back
//! to the story store only at defined checkpoints (settle, drag end),
//! drained through [`StoryGraphState::take_settled_positions`].

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::camera::{Camera, FOCUS_SCALE};
use super::types::GraphData;
use crate::story::types::NodePosition;

/// Extra hit-test slack around a node's visual radius, in world units.
pub const HIT_MARGIN: f64 = 6.0;

// Collision keeps node circles at least this far apart.
const COLLISION_MARGIN: f64 = 18.0;
// Pull of the whole layout toward the viewport center, per tick.
const CENTER_STRENGTH: f64 = 0.05;
// d3-style cooling: the timestep scales with alpha, which decays toward
// alpha_target; the sim settles once cold and still.
const ALPHA_DECAY: f64 = 0.05;
const ALPHA_MIN: f64 = 0.02;
const DRAG_ALPHA_TARGET: f64 = 0.3;
const SETTLE_DISPLACEMENT: f64 = 0.1;

/// Per-node payload carried through the simulation for rendering.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Story node id.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Fill color.
	pub color: String,
	/// Visual radius.
	pub size: f64,
	/// Visit counter for the badge.
	pub visited_count: u32,
	/// Whether this is the player's current node.
	pub current: bool,
}

/// An active node-drag gesture.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// A drag is in progress.
	pub active: bool,
	/// Index of the pinned node.
	pub node_idx: Option<DefaultNodeIdx>,
	/// Gesture origin, screen space.
	pub start_x: f64,
	/// Gesture origin, screen space.
	pub start_y: f64,
	/// Node position at gesture start, world space.
	pub node_start_x: f32,
	/// Node position at gesture start, world space.
	pub node_start_y: f32,
	/// The pointer moved past the click threshold.
	pub moved: bool,
}

/// An active background-pan gesture.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// A pan is in progress.
	pub active: bool,
	/// Gesture origin, screen space.
	pub start_x: f64,
	/// Gesture origin, screen space.
	pub start_y: f64,
	/// Camera translation at gesture start.
	pub transform_start_x: f64,
	/// Camera translation at gesture start.
	pub transform_start_y: f64,
}

/// Hover highlight state with fade-out of the previous target.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Currently hovered node.
	pub node: Option<DefaultNodeIdx>,
	/// Nodes linked to the hovered one.
	pub neighbors: HashSet<DefaultNodeIdx>,
	/// Highlight interpolation, 0..1.
	pub highlight_t: f64,
	/// Previous hover target while its highlight fades out.
	pub prev_node: Option<DefaultNodeIdx>,
	/// Previous neighbor set while fading out.
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Full per-mount working state of the canvas.
pub struct StoryGraphState {
	/// The force simulation and its node payloads.
	pub graph: ForceGraph<NodeInfo, ()>,
	/// Pan/zoom/animation state.
	pub camera: Camera,
	/// Node-drag gesture.
	pub drag: DragState,
	/// Background-pan gesture.
	pub pan: PanState,
	/// Hover highlight.
	pub hover: HoverState,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	/// Monotonic clock driving link-flow dashes.
	pub flow_time: f64,
	/// Last pointer position in screen space, for the tooltip.
	pub pointer: (f64, f64),
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	alpha: f64,
	alpha_target: f64,
	settled: bool,
	pending_positions: Option<Vec<NodePosition>>,
}

impl StoryGraphState {
	/// Seed the simulation from the visible projection. Nodes with a
	/// persisted position keep it; the rest start on a circle around the
	/// viewport center so first paint never overlaps degenerately.
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let (graph, edges, id_to_idx) = build_graph(data, width, height, &HashMap::new());
		Self {
			graph,
			camera: Camera::new(width, height),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			pointer: (0.0, 0.0),
			edges,
			id_to_idx,
			alpha: 1.0,
			alpha_target: 0.0,
			settled: false,
			pending_positions: None,
		}
	}

	/// Re-seed after the projection changed (a reveal, a reset, a load).
	/// Live positions of surviving nodes carry over so the layout does not
	/// re-randomize; the camera is left untouched. The simulation only
	/// reheats when the topology actually changed, so pure payload updates
	/// (colors, visit counts, persisted positions) keep a settled layout
	/// settled.
	pub fn reseed(&mut self, data: &GraphData) {
		let topology_changed = data.nodes.len() != self.id_to_idx.len()
			|| data.links.len() != self.edges.len()
			|| data.nodes.iter().any(|n| !self.id_to_idx.contains_key(&n.id));

		let mut live = HashMap::new();
		self.graph.visit_nodes(|node| {
			live.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		let (graph, edges, id_to_idx) =
			build_graph(data, self.width, self.height, &live);
		self.graph = graph;
		self.edges = edges;
		self.id_to_idx = id_to_idx;
		// An in-flight drag is discarded with its raised alpha target, or
		// the settle condition could never hold again.
		self.drag = DragState::default();
		self.alpha_target = 0.0;
		self.hover = HoverState::default();
		if topology_changed {
			self.settled = false;
			self.alpha = self.alpha.max(0.5);
		}
	}

	/// Number of nodes in the simulation.
	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	/// Map a screen point into world space through the camera.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.camera.screen_to_world(sx, sy)
	}

	/// Topmost node under a screen point, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (wx, wy) = self.screen_to_world(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - wx, node.y() as f64 - wy);
			let radius = node.data.user_data.size + HIT_MARGIN;
			if (dx * dx + dy * dy).sqrt() < radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Story id of a simulation node.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	/// Current world positions of all nodes.
	pub fn positions(&self) -> Vec<NodePosition> {
		let mut out = Vec::with_capacity(self.node_count());
		self.graph.visit_nodes(|node| {
			out.push(NodePosition {
				id: node.data.user_data.id.clone(),
				x: node.x() as f64,
				y: node.y() as f64,
			});
		});
		out
	}

	/// Positions checkpointed at the last settle or drag end, if not yet
	/// consumed.
	pub fn take_settled_positions(&mut self) -> Option<Vec<NodePosition>> {
		self.pending_positions.take()
	}

	/// Pin a node and start dragging it.
	pub fn begin_drag(&mut self, idx: DefaultNodeIdx, sx: f64, sy: f64) {
		self.drag.active = true;
		self.drag.node_idx = Some(idx);
		self.drag.start_x = sx;
		self.drag.start_y = sy;
		self.drag.moved = false;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				self.drag.node_start_x = node.x();
				self.drag.node_start_y = node.y();
			}
		});
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = true;
			}
		});
		// Raise the energy so neighbors flow around the pinned node.
		self.settled = false;
		self.alpha_target = DRAG_ALPHA_TARGET;
		self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
	}

	/// Move the dragged node to follow the pointer.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let k = self.camera.transform.k;
		let (dx, dy) = ((sx - self.drag.start_x) / k, (sy - self.drag.start_y) / k);
		if dx.abs() + dy.abs() > 3.0 {
			self.drag.moved = true;
		}
		let (nx, ny) = (
			self.drag.node_start_x + dx as f32,
			self.drag.node_start_y + dy as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
			}
		});
	}

	/// Release the dragged node: un-pin it so forces resume, checkpoint
	/// positions, and let the simulation cool back down.
	pub fn end_drag(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.is_anchor = false;
				}
			});
			if self.drag.moved {
				self.pending_positions = Some(self.positions());
			}
		}
		self.drag = DragState::default();
		self.alpha_target = 0.0;
	}

	/// Animate the camera to center the given story node.
	pub fn zoom_to_node(&mut self, id: &str) {
		let Some(&idx) = self.id_to_idx.get(id) else {
			return;
		};
		let mut target = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				target = Some((node.x() as f64, node.y() as f64));
			}
		});
		if let Some((wx, wy)) = target {
			self.camera
				.zoom_to_point(wx, wy, FOCUS_SCALE, (self.width, self.height));
		}
	}

	/// Animate the camera to fit every node in view.
	pub fn zoom_to_fit(&mut self) {
		let mut points = Vec::with_capacity(self.node_count());
		self.graph.visit_nodes(|node| {
			points.push((node.x() as f64, node.y() as f64, node.data.user_data.size));
		});
		self.camera.zoom_to_fit(&points, (self.width, self.height));
	}

	/// Update the hover target, keeping the previous one for fade-out.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	/// Whether a node takes part in the current highlight.
	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	/// Whether a node is the (fading) hover target itself.
	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	/// Whether any highlight is active or fading.
	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Advance one animation frame: camera tween, physics while warm, and
	/// hover fade. An empty simulation only advances the camera.
	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		self.camera.tick(dt);

		if self.node_count() > 0 && !self.settled {
			self.step_physics(dt);
		}

		self.tick_hover(dt);
	}

	fn step_physics(&mut self, dt: f64) {
		let before = self.positions();

		self.graph.update((dt * self.alpha.max(self.alpha_target)) as f32);
		self.apply_centering();
		self.apply_collisions();

		let after = self.positions();
		let mut displacement = 0.0;
		for (a, b) in before.iter().zip(after.iter()) {
			displacement += (a.x - b.x).abs() + (a.y - b.y).abs();
		}
		displacement /= after.len() as f64;

		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		if self.alpha < ALPHA_MIN
			&& self.alpha_target == 0.0
			&& displacement < SETTLE_DISPLACEMENT
		{
			self.settled = true;
			self.pending_positions = Some(after);
		}
	}

	// Pull the layout centroid toward the viewport center as one rigid
	// shift, so the force never fights a user pan of individual nodes.
	fn apply_centering(&mut self) {
		let mut sum = (0.0f64, 0.0f64);
		let mut count = 0usize;
		self.graph.visit_nodes(|node| {
			sum.0 += node.x() as f64;
			sum.1 += node.y() as f64;
			count += 1;
		});
		if count == 0 {
			return;
		}
		let shift_x = ((self.width / 2.0) - sum.0 / count as f64) * CENTER_STRENGTH;
		let shift_y = ((self.height / 2.0) - sum.1 / count as f64) * CENTER_STRENGTH;
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x += shift_x as f32;
				node.data.y += shift_y as f32;
			}
		});
	}

	// Pairwise collision resolution: overlapping circles are pushed apart
	// along their axis, pinned nodes staying put.
	fn apply_collisions(&mut self) {
		let mut bodies = Vec::with_capacity(self.node_count());
		self.graph.visit_nodes(|node| {
			bodies.push((
				node.index(),
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.size,
				node.data.is_anchor,
			));
		});

		let mut pushes: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
		for i in 0..bodies.len() {
			for j in (i + 1)..bodies.len() {
				let (ia, xa, ya, ra, anchored_a) = bodies[i];
				let (ib, xb, yb, rb, anchored_b) = bodies[j];
				let min_dist = ra + rb + COLLISION_MARGIN;
				let (dx, dy) = (xb - xa, yb - ya);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist {
					continue;
				}
				// Coincident nodes separate along a fixed axis.
				let (ux, uy) = if dist > 0.001 {
					(dx / dist, dy / dist)
				} else {
					(1.0, 0.0)
				};
				let overlap = min_dist - dist;
				let (share_a, share_b) = match (anchored_a, anchored_b) {
					(true, true) => (0.0, 0.0),
					(true, false) => (0.0, 1.0),
					(false, true) => (1.0, 0.0),
					(false, false) => (0.5, 0.5),
				};
				let push_a = pushes.entry(ia).or_default();
				push_a.0 -= ux * overlap * share_a;
				push_a.1 -= uy * overlap * share_a;
				let push_b = pushes.entry(ib).or_default();
				push_b.0 += ux * overlap * share_b;
				push_b.1 += uy * overlap * share_b;
			}
		}

		if pushes.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(dx, dy)) = pushes.get(&node.index()) {
				node.data.x += dx as f32;
				node.data.y += dy as f32;
			}
		});
	}

	fn tick_hover(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// Track a viewport size change.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

type BuiltGraph = (
	ForceGraph<NodeInfo, ()>,
	Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	HashMap<String, DefaultNodeIdx>,
);

fn build_graph(
	data: &GraphData,
	width: f64,
	height: f64,
	live: &HashMap<String, (f32, f32)>,
) -> BuiltGraph {
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let mut id_to_idx = HashMap::new();
	let mut edges = Vec::new();
	let circle_radius = width.min(height) * 0.3;

	for (i, node) in data.nodes.iter().enumerate() {
		let (x, y) = live
			.get(&node.id)
			.copied()
			.or_else(|| node.x.zip(node.y).map(|(x, y)| (x as f32, y as f32)))
			.unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
				(
					(width / 2.0 + circle_radius * angle.cos()) as f32,
					(height / 2.0 + circle_radius * angle.sin()) as f32,
				)
			});

		let idx = graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor: false,
			user_data: NodeInfo {
				id: node.id.clone(),
				label: node.label.clone(),
				color: node.color.clone(),
				size: node.size,
				visited_count: node.visited_count,
				current: data.current_node_id.as_deref() == Some(&node.id),
			},
		});
		id_to_idx.insert(node.id.clone(), idx);
	}

	// Links whose endpoints are not in the visible set are dropped here,
	// not treated as errors.
	for link in &data.links {
		if let (Some(&src), Some(&tgt)) =
			(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
		{
			graph.add_edge(src, tgt, EdgeData::default());
			edges.push((src, tgt));
		}
	}

	(graph, edges, id_to_idx)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::story_graph::types::{GraphLink, GraphNode};

	fn data(ids: &[&str]) -> GraphData {
		GraphData {
			nodes: ids
				.iter()
				.map(|id| GraphNode {
					id: id.to_string(),
					label: id.to_string(),
					x: None,
					y: None,
					color: "gray".into(),
					size: 15.0,
					visited_count: 0,
				})
				.collect(),
			links: Vec::new(),
			current_node_id: ids.first().map(|s| s.to_string()),
		}
	}

	#[test]
	fn unpositioned_nodes_seed_on_a_circle() {
		let state = StoryGraphState::new(&data(&["a", "b", "c", "d"]), 800.0, 600.0);
		let radius = 600.0 * 0.3;
		for pos in state.positions() {
			let dx = pos.x - 400.0;
			let dy = pos.y - 300.0;
			let r = (dx * dx + dy * dy).sqrt();
			assert!((r - radius).abs() < 1.0, "{} at radius {r}", pos.id);
		}
	}

	#[test]
	fn persisted_positions_win_over_the_circle() {
		let mut d = data(&["a", "b"]);
		d.nodes[0].x = Some(42.0);
		d.nodes[0].y = Some(-7.0);
		let state = StoryGraphState::new(&d, 800.0, 600.0);
		let positions = state.positions();
		let a = positions.iter().find(|p| p.id == "a").unwrap();
		assert!((a.x - 42.0).abs() < 0.01);
		assert!((a.y + 7.0).abs() < 0.01);
	}

	#[test]
	fn dangling_links_are_dropped_from_the_simulation() {
		let mut d = data(&["a", "b"]);
		d.links = vec![
			GraphLink {
				source: "a".into(),
				target: "b".into(),
				color: "#777".into(),
				width: 2.0,
			},
			GraphLink {
				source: "a".into(),
				target: "ghost".into(),
				color: "#777".into(),
				width: 2.0,
			},
		];
		let state = StoryGraphState::new(&d, 800.0, 600.0);
		assert_eq!(state.edges.len(), 1);
	}

	#[test]
	fn reseed_preserves_live_positions_and_camera() {
		let mut state = StoryGraphState::new(&data(&["a", "b"]), 800.0, 600.0);
		state.camera.zoom_about(100.0, 100.0, 1.5);
		let camera_before = state.camera.transform;
		let before = state.positions();

		state.reseed(&data(&["a", "b", "c"]));
		assert_eq!(state.node_count(), 3);
		assert_eq!(state.camera.transform, camera_before);
		let after = state.positions();
		for old in &before {
			let kept = after.iter().find(|p| p.id == old.id).unwrap();
			assert!((kept.x - old.x).abs() < 0.01);
			assert!((kept.y - old.y).abs() < 0.01);
		}
	}

	#[test]
	fn simulation_settles_and_reports_positions_once() {
		let mut state = StoryGraphState::new(&data(&["a", "b", "c"]), 800.0, 600.0);
		for _ in 0..2000 {
			state.tick(0.016);
			if let Some(positions) = state.take_settled_positions() {
				assert_eq!(positions.len(), 3);
				assert!(state.settled);
				// Settling is a one-shot checkpoint.
				assert!(state.take_settled_positions().is_none());
				return;
			}
		}
		panic!("simulation never settled");
	}

	#[test]
	fn drag_end_checkpoints_positions_and_unpins() {
		let mut state = StoryGraphState::new(&data(&["a", "b"]), 800.0, 600.0);
		let positions = state.positions();
		let a = positions.iter().find(|p| p.id == "a").unwrap().clone();
		let idx = state.id_to_idx["a"];
		let (sx, sy) = (
			a.x * state.camera.transform.k + state.camera.transform.x,
			a.y * state.camera.transform.k + state.camera.transform.y,
		);

		state.begin_drag(idx, sx, sy);
		state.drag_to(sx + 60.0, sy + 20.0);
		state.end_drag();

		let moved = state.take_settled_positions().expect("drag end checkpoints");
		let a_after = moved.iter().find(|p| p.id == "a").unwrap();
		assert!((a_after.x - (a.x + 60.0)).abs() < 0.01);
		assert!(!state.drag.active);

		let mut anchored = false;
		state.graph.visit_nodes(|node| {
			if node.index() == idx {
				anchored = node.data.is_anchor;
			}
		});
		assert!(!anchored, "node stays pinned after release");
	}

	#[test]
	fn reseed_mid_drag_discards_the_gesture_and_still_settles() {
		let mut state = StoryGraphState::new(&data(&["a", "b"]), 800.0, 600.0);
		let idx = state.id_to_idx["a"];
		state.begin_drag(idx, 0.0, 0.0);

		state.reseed(&data(&["a", "b", "c"]));
		assert!(!state.drag.active);
		for _ in 0..2000 {
			state.tick(0.016);
			if state.take_settled_positions().is_some() {
				return;
			}
		}
		panic!("simulation never settled after a mid-drag reseed");
	}

	#[test]
	fn collisions_keep_nodes_apart() {
		let mut d = data(&["a", "b"]);
		d.nodes[0].x = Some(100.0);
		d.nodes[0].y = Some(100.0);
		d.nodes[1].x = Some(101.0);
		d.nodes[1].y = Some(100.0);
		let mut state = StoryGraphState::new(&d, 800.0, 600.0);
		for _ in 0..600 {
			state.tick(0.016);
		}
		let positions = state.positions();
		let a = positions.iter().find(|p| p.id == "a").unwrap();
		let b = positions.iter().find(|p| p.id == "b").unwrap();
		let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		assert!(dist > 30.0, "nodes still overlapping at {dist}");
	}

	#[test]
	fn empty_projection_skips_physics() {
		let mut state = StoryGraphState::new(&GraphData::default(), 800.0, 600.0);
		state.tick(0.016);
		assert_eq!(state.node_count(), 0);
		assert!(state.take_settled_positions().is_none());
	}
}
