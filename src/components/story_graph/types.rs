//! Render-facing projection of the visible story graph. The layout engine
//! owns its own working copies of positions; nothing here is shared by
//! reference with the store.

use crate::story::types::StoryState;

/// One visible node, as the canvas needs it.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Story node id.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Persisted layout position, if the simulation has settled before.
	pub x: Option<f64>,
	/// Persisted layout position, if the simulation has settled before.
	pub y: Option<f64>,
	/// Fill color.
	pub color: String,
	/// Visual radius basis and collision footprint.
	pub size: f64,
	/// Visit counter for badges and styling.
	pub visited_count: u32,
}

/// One visible link, endpoints by id.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Stroke color hint.
	pub color: String,
	/// Stroke width hint.
	pub width: f64,
}

/// The full drawable projection for one frame of input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Visible nodes.
	pub nodes: Vec<GraphNode>,
	/// Visible links; entries referencing nodes outside `nodes` are
	/// silently dropped at draw time.
	pub links: Vec<GraphLink>,
	/// Highlighted current node, if any.
	pub current_node_id: Option<String>,
}

impl GraphData {
	/// Project the visible part of the story state.
	pub fn from_story(state: &StoryState) -> Self {
		let nodes = state
			.visible_nodes()
			.into_iter()
			.map(|n| GraphNode {
				id: n.id.clone(),
				label: n.label.clone(),
				x: n.position.map(|p| p.x),
				y: n.position.map(|p| p.y),
				color: n.color.clone(),
				size: n.size,
				visited_count: n.visited_count,
			})
			.collect();
		let links = state
			.visible_links()
			.into_iter()
			.map(|l| GraphLink {
				source: l.source.clone(),
				target: l.target.clone(),
				color: l.color.clone(),
				width: l.width,
			})
			.collect();
		Self {
			nodes,
			links,
			current_node_id: Some(state.current_node_id.clone()),
		}
	}

	/// Closest node to a world-space point by Euclidean distance. Nodes
	/// without a settled position sit at the origin for the comparison.
	pub fn nearest_node(&self, x: f64, y: f64) -> Option<&GraphNode> {
		self.nodes.iter().min_by(|a, b| {
			let da = dist_sq(a, x, y);
			let db = dist_sq(b, x, y);
			da.total_cmp(&db)
		})
	}
}

fn dist_sq(node: &GraphNode, x: f64, y: f64) -> f64 {
	let dx = node.x.unwrap_or(0.0) - x;
	let dy = node.y.unwrap_or(0.0) - y;
	dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::reducer::{StoryAction, reduce};

	#[test]
	fn projection_only_carries_revealed_content() {
		let mut state = StoryState::default();
		state = reduce(state, StoryAction::VisitNode("start".into()));
		let data = GraphData::from_story(&state);
		assert_eq!(data.nodes.len(), 1);
		assert_eq!(data.nodes[0].id, "start");
		assert!(data.links.is_empty());
		assert_eq!(data.current_node_id.as_deref(), Some("start"));
	}

	fn node_at(id: &str, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			x: Some(x),
			y: Some(y),
			color: "gray".into(),
			size: 15.0,
			visited_count: 0,
		}
	}

	#[test]
	fn nearest_node_picks_the_closest() {
		let data = GraphData {
			nodes: vec![
				node_at("a", 0.0, 0.0),
				node_at("b", 100.0, 0.0),
				node_at("c", 40.0, 40.0),
			],
			links: Vec::new(),
			current_node_id: None,
		};
		assert_eq!(data.nearest_node(90.0, 10.0).map(|n| n.id.as_str()), Some("b"));
		assert_eq!(data.nearest_node(30.0, 50.0).map(|n| n.id.as_str()), Some("c"));
		assert!(GraphData::default().nearest_node(0.0, 0.0).is_none());
	}
}
