//! The pure reducer: the closed set of actions through which the story
//! state is mutated, and their exact semantics.

use log::{debug, warn};

use super::initial::initial_state;
use super::types::{
	DEFAULT_NODE_COLOR, DEFAULT_NODE_SIZE, FlagValue, NodePatch, NodePosition, StoryLink,
	StoryState,
};

/// Fill color applied to a node once it has been visited more than once.
pub const VISITED_COLOR: &str = "#6a0dad";
/// Nodes shrink slightly on revisit but never below this size.
pub const MIN_NODE_SIZE: f64 = 10.0;
const VISIT_SHRINK: f64 = 0.95;

/// Every way the story state can change.
#[derive(Clone, Debug)]
pub enum StoryAction {
	/// The player moves to a node; counts, history and reveals update.
	VisitNode(String),
	/// Upsert a node and mark it revealed.
	RevealNode {
		/// Id of the node to reveal or create.
		id: String,
		/// Fields to merge, or to build a new node from.
		patch: NodePatch,
	},
	/// Reveal (or introduce) a transition between two existing nodes.
	RevealLink(StoryLink),
	/// Record a narrative flag.
	SetFlag {
		/// Flag key.
		key: String,
		/// New value.
		value: FlagValue,
	},
	/// Record rule ids that have fired, so once-rules stay fired across
	/// save/load and are cleared by reset.
	MarkRulesFired(Vec<String>),
	/// Restore the fixed initial graph.
	ResetStory,
	/// Replace the state wholesale with an externally validated one.
	LoadStory(StoryState),
	/// Persist settled layout coordinates back onto nodes.
	UpdateNodePositions(Vec<NodePosition>),
}

/// Apply one action. Invalid references are logged no-ops; the function
/// never fails and never leaves the state partially updated.
pub fn reduce(mut state: StoryState, action: StoryAction) -> StoryState {
	match action {
		StoryAction::VisitNode(id) => visit_node(state, &id),

		StoryAction::RevealNode { id, patch } => {
			match state.nodes.get_mut(&id) {
				Some(node) => {
					if let Some(label) = patch.label {
						node.label = label;
					}
					if let Some(text) = patch.text {
						node.text = text;
					}
					if let Some(choices) = patch.choices {
						node.choices = choices;
					}
					if let Some(color) = patch.color {
						node.color = color;
					}
					if let Some(size) = patch.size {
						node.size = size;
					}
					node.revealed = true;
				}
				None => {
					debug!("reveal_node: creating '{id}'");
					state.nodes.insert(
						id.clone(),
						super::types::StoryNode {
							id: id.clone(),
							label: patch.label.unwrap_or_else(|| id.clone()),
							text: patch.text.unwrap_or_default(),
							choices: patch.choices.unwrap_or_default(),
							position: None,
							color: patch
								.color
								.unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
							size: patch.size.unwrap_or(DEFAULT_NODE_SIZE),
							visited_count: 0,
							revealed: true,
						},
					);
				}
			}
			// Links touching this node become visible once both ends are.
			reveal_links_touching(&mut state, &id);
			state
		}

		StoryAction::RevealLink(new_link) => {
			if !state.nodes.contains_key(&new_link.source)
				|| !state.nodes.contains_key(&new_link.target)
			{
				warn!(
					"reveal_link: missing endpoint {} -> {}",
					new_link.source, new_link.target
				);
				return state;
			}
			for id in [&new_link.source, &new_link.target] {
				if let Some(node) = state.nodes.get_mut(id)
					&& !node.revealed
				{
					debug!("reveal_link: revealing endpoint '{id}'");
					node.revealed = true;
				}
			}
			match state
				.links
				.iter_mut()
				.find(|l| l.source == new_link.source && l.target == new_link.target)
			{
				Some(existing) => {
					existing.revealed = true;
					existing.color = new_link.color;
					existing.width = new_link.width;
				}
				None => {
					state.links.push(StoryLink { revealed: true, ..new_link });
				}
			}
			state
		}

		StoryAction::SetFlag { key, value } => {
			debug!("set_flag: {key}");
			state.flags.insert(key, value);
			state
		}

		StoryAction::MarkRulesFired(ids) => {
			state.fired_rules.extend(ids);
			state
		}

		StoryAction::ResetStory => initial_state(),

		StoryAction::LoadStory(new_state) => new_state,

		StoryAction::UpdateNodePositions(updates) => {
			for update in updates {
				if let Some(node) = state.nodes.get_mut(&update.id) {
					node.position =
						Some(super::types::Position { x: update.x, y: update.y });
				}
			}
			state
		}
	}
}

fn visit_node(mut state: StoryState, id: &str) -> StoryState {
	let Some(node) = state.nodes.get_mut(id) else {
		warn!("visit_node: unknown node '{id}'");
		return state;
	};

	let count = state.visit_counts.get(id).copied().unwrap_or(0) + 1;
	node.visited_count = count;
	node.revealed = true;
	if count > 1 {
		node.color = VISITED_COLOR.to_string();
	}
	node.size = (node.size * VISIT_SHRINK).max(MIN_NODE_SIZE);

	let choice_targets: Vec<String> =
		node.choices.iter().map(|c| c.target_id.clone()).collect();

	for link in &mut state.links {
		// Outgoing links to this node's choice targets surface on visit,
		// as do incoming links whose source is already revealed.
		if link.source == id && choice_targets.contains(&link.target) {
			link.revealed = true;
		} else if link.target == id
			&& state.nodes.get(&link.source).is_some_and(|n| n.revealed)
		{
			link.revealed = true;
		}
	}

	state.current_node_id = id.to_string();
	state.visit_counts.insert(id.to_string(), count);
	state.history.push(id.to_string());
	state
}

fn reveal_links_touching(state: &mut StoryState, id: &str) {
	for link in &mut state.links {
		if (link.source == id || link.target == id)
			&& state.nodes.get(&link.source).is_some_and(|n| n.revealed)
			&& state.nodes.get(&link.target).is_some_and(|n| n.revealed)
		{
			link.revealed = true;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::types::Position;

	fn visit(state: StoryState, id: &str) -> StoryState {
		reduce(state, StoryAction::VisitNode(id.to_string()))
	}

	#[test]
	fn visit_increments_counts_and_history_in_order() {
		let mut state = StoryState::default();
		for _ in 0..3 {
			state = visit(state, "start");
		}
		assert_eq!(state.visit_count("start"), 3);
		assert_eq!(state.nodes["start"].visited_count, 3);
		assert_eq!(state.history, vec!["start", "start", "start"]);
		assert_eq!(state.current_node_id, "start");
	}

	#[test]
	fn visit_unknown_node_is_a_noop() {
		let state = StoryState::default();
		let after = visit(state.clone(), "ghost");
		assert_eq!(after, state);
	}

	#[test]
	fn visited_count_implies_revealed() {
		let mut state = StoryState::default();
		state = visit(state, "start");
		state = visit(state, "pathA");
		for node in state.nodes.values() {
			if node.visited_count > 0 {
				assert!(node.revealed, "{} visited but hidden", node.id);
			}
		}
	}

	#[test]
	fn revisit_applies_visited_style_with_size_floor() {
		let mut state = StoryState::default();
		state = visit(state, "start");
		assert_eq!(state.nodes["start"].color, "orange");
		state = visit(state, "start");
		assert_eq!(state.nodes["start"].color, VISITED_COLOR);
		for _ in 0..60 {
			state = visit(state, "start");
		}
		assert_eq!(state.nodes["start"].size, MIN_NODE_SIZE);
	}

	#[test]
	fn visit_reveals_choice_links_and_incoming_from_revealed() {
		let mut state = StoryState::default();
		state = visit(state, "start");
		// Outgoing start->pathA / start->pathB match start's choices.
		assert!(
			state
				.links
				.iter()
				.any(|l| l.source == "start" && l.target == "pathA" && l.revealed)
		);
		assert!(
			state
				.links
				.iter()
				.any(|l| l.source == "start" && l.target == "pathB" && l.revealed)
		);
		state = visit(state, "pathA");
		// Incoming start->pathA was already revealed; pathA->start now is too
		// because start is revealed and listed in pathA's choices.
		assert!(
			state
				.links
				.iter()
				.any(|l| l.source == "pathA" && l.target == "start" && l.revealed)
		);
	}

	#[test]
	fn reveal_node_merges_existing() {
		let mut state = StoryState::default();
		state = reduce(
			state,
			StoryAction::RevealNode {
				id: "pathA".into(),
				patch: NodePatch { color: Some("red".into()), ..Default::default() },
			},
		);
		let node = &state.nodes["pathA"];
		assert!(node.revealed);
		assert_eq!(node.color, "red");
		assert_eq!(node.label, "Path of Whispers");
	}

	#[test]
	fn reveal_node_creates_with_defaults() {
		let state = reduce(
			StoryState::default(),
			StoryAction::RevealNode {
				id: "hiddenShrine".into(),
				patch: NodePatch { label: Some("Hidden Shrine".into()), ..Default::default() },
			},
		);
		let node = &state.nodes["hiddenShrine"];
		assert!(node.revealed);
		assert_eq!(node.visited_count, 0);
		assert_eq!(node.color, DEFAULT_NODE_COLOR);
		assert_eq!(node.size, DEFAULT_NODE_SIZE);
	}

	#[test]
	fn reveal_node_reconciles_touching_links() {
		let mut state = StoryState::default();
		state = visit(state, "start");
		state = reduce(
			state,
			StoryAction::RevealNode { id: "pathA".into(), patch: NodePatch::default() },
		);
		// start and pathA are now both revealed, so pathA->start surfaces.
		assert!(
			state
				.links
				.iter()
				.any(|l| l.source == "pathA" && l.target == "start" && l.revealed)
		);
	}

	#[test]
	fn reveal_link_is_idempotent_per_ordered_pair() {
		let mut state = StoryState::default();
		let link = StoryLink {
			source: "start".into(),
			target: "pathA".into(),
			color: "#777".into(),
			width: 2.0,
			revealed: false,
		};
		let before = state.links.len();
		state = reduce(state, StoryAction::RevealLink(link.clone()));
		state = reduce(state, StoryAction::RevealLink(link));
		assert_eq!(state.links.len(), before);
		let count = state
			.links
			.iter()
			.filter(|l| l.source == "start" && l.target == "pathA")
			.count();
		assert_eq!(count, 1);
		assert!(
			state
				.links
				.iter()
				.find(|l| l.source == "start" && l.target == "pathA")
				.unwrap()
				.revealed
		);
	}

	#[test]
	fn reveal_link_reveals_hidden_endpoints() {
		let state = reduce(
			StoryState::default(),
			StoryAction::RevealLink(StoryLink {
				source: "pathA".into(),
				target: "whisperSource".into(),
				color: "skyblue".into(),
				width: 2.0,
				revealed: false,
			}),
		);
		assert!(state.nodes["pathA"].revealed);
		assert!(state.nodes["whisperSource"].revealed);
	}

	#[test]
	fn reveal_link_with_missing_endpoint_is_a_noop() {
		let state = StoryState::default();
		let after = reduce(
			state.clone(),
			StoryAction::RevealLink(StoryLink {
				source: "ghost".into(),
				target: "start".into(),
				color: "red".into(),
				width: 2.0,
				revealed: false,
			}),
		);
		assert_eq!(after, state);
	}

	#[test]
	fn reveals_are_monotonic_without_reset() {
		let mut state = StoryState::default();
		let actions = [
			StoryAction::VisitNode("start".into()),
			StoryAction::RevealNode { id: "pathA".into(), patch: NodePatch::default() },
			StoryAction::VisitNode("pathA".into()),
			StoryAction::SetFlag { key: "storyBegan".into(), value: true.into() },
			StoryAction::UpdateNodePositions(vec![NodePosition {
				id: "start".into(),
				x: 1.0,
				y: 2.0,
			}]),
		];
		for action in actions {
			let revealed_before: Vec<String> = state
				.visible_nodes()
				.iter()
				.map(|n| n.id.clone())
				.collect();
			state = reduce(state, action);
			for id in &revealed_before {
				assert!(state.nodes[id].revealed, "{id} went hidden");
			}
		}
	}

	#[test]
	fn reset_restores_exactly_the_initial_graph() {
		let mut state = StoryState::default();
		state = visit(state, "start");
		state = visit(state, "pathA");
		state = reduce(state, StoryAction::ResetStory);
		assert_eq!(state, StoryState::default());
		assert_eq!(state.visible_nodes().len(), 1);
		assert_eq!(state.visit_counts.len(), 1);
		assert_eq!(state.visit_count("start"), 0);
		assert!(state.history.is_empty());
		assert!(state.fired_rules.is_empty());
	}

	#[test]
	fn positions_persist_only_for_known_ids() {
		let state = reduce(
			StoryState::default(),
			StoryAction::UpdateNodePositions(vec![
				NodePosition { id: "start".into(), x: 10.0, y: 20.0 },
				NodePosition { id: "ghost".into(), x: 1.0, y: 1.0 },
			]),
		);
		assert_eq!(state.nodes["start"].position, Some(Position { x: 10.0, y: 20.0 }));
		assert!(!state.nodes.contains_key("ghost"));
	}
}
