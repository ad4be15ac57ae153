//! Core data model for the story graph: nodes, links, choices and the
//! aggregate [`StoryState`] that every mutation flows through.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Fallback fill color for nodes introduced without a display hint.
pub const DEFAULT_NODE_COLOR: &str = "gray";
/// Fallback visual size (and collision footprint) for new nodes.
pub const DEFAULT_NODE_SIZE: f64 = 15.0;
/// Fallback stroke width for new links.
pub const DEFAULT_LINK_WIDTH: f64 = 2.0;

/// A flag value recorded by the rule engine or narrative logic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
	/// Boolean trigger flags such as `bothPathsVisited`.
	Bool(bool),
	/// Numeric counters.
	Int(i64),
	/// Free-form text markers.
	Text(String),
}

impl FlagValue {
	/// Whether the flag reads as "set" for condition checks.
	pub fn is_set(&self) -> bool {
		match self {
			FlagValue::Bool(b) => *b,
			FlagValue::Int(n) => *n != 0,
			FlagValue::Text(s) => !s.is_empty(),
		}
	}
}

impl From<bool> for FlagValue {
	fn from(b: bool) -> Self {
		FlagValue::Bool(b)
	}
}

impl From<i64> for FlagValue {
	fn from(n: i64) -> Self {
		FlagValue::Int(n)
	}
}

impl From<&str> for FlagValue {
	fn from(s: &str) -> Self {
		FlagValue::Text(s.to_string())
	}
}

/// A serializable predicate gating a choice, evaluated against the full
/// story state at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChoiceCondition {
	/// The named flag is present and set.
	FlagSet(String),
	/// The named flag equals the given value exactly.
	FlagEquals(String, FlagValue),
	/// The given node has been visited at least `count` times.
	MinVisits {
		/// Node id whose visit count is inspected.
		node: String,
		/// Minimum visit count required.
		count: u32,
	},
}

impl ChoiceCondition {
	/// Evaluate the condition against the current state.
	pub fn holds(&self, state: &StoryState) -> bool {
		match self {
			ChoiceCondition::FlagSet(key) => {
				state.flags.get(key).is_some_and(FlagValue::is_set)
			}
			ChoiceCondition::FlagEquals(key, value) => {
				state.flags.get(key) == Some(value)
			}
			ChoiceCondition::MinVisits { node, count } => {
				state.visit_counts.get(node).copied().unwrap_or(0) >= *count
			}
		}
	}
}

/// One navigable option presented on a narrative page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryChoice {
	/// Id of the node this choice leads to.
	#[serde(rename = "targetId")]
	pub target_id: String,
	/// Button text.
	pub text: String,
	/// Optional gate; an absent condition always holds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub condition: Option<ChoiceCondition>,
}

/// A settled layout coordinate persisted back onto a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// World-space x.
	pub x: f64,
	/// World-space y.
	pub y: f64,
}

/// A position update reported by the layout engine for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePosition {
	/// Node id the coordinates belong to.
	pub id: String,
	/// World-space x.
	pub x: f64,
	/// World-space y.
	pub y: f64,
}

/// A narrative location. Links reference nodes by `id`, never by identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
	/// Stable unique identifier; immutable for the node's lifetime.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Narrative body text shown when the node is current.
	pub text: String,
	/// Ordered outgoing choices.
	#[serde(default)]
	pub choices: Vec<StoryChoice>,
	/// Layout position, absent until the simulation settles once.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Position>,
	/// Fill color display hint.
	pub color: String,
	/// Visual size; also drives the layout collision radius.
	pub size: f64,
	/// Times this node has become current.
	#[serde(rename = "visitedCount")]
	pub visited_count: u32,
	/// Hidden from the graph and minimap until true.
	#[serde(rename = "isRevealed")]
	pub revealed: bool,
}

/// A directed narrative transition between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Stroke color display hint.
	pub color: String,
	/// Stroke width display hint.
	#[serde(default = "default_link_width")]
	pub width: f64,
	/// Visible only when true and both endpoints are revealed.
	#[serde(rename = "isRevealed")]
	pub revealed: bool,
}

fn default_link_width() -> f64 {
	DEFAULT_LINK_WIDTH
}

/// Partial node data carried by a reveal: present fields are merged onto an
/// existing node, or combined with defaults to construct a new one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
	/// Replacement label.
	pub label: Option<String>,
	/// Replacement body text.
	pub text: Option<String>,
	/// Replacement choice list.
	pub choices: Option<Vec<StoryChoice>>,
	/// Replacement fill color.
	pub color: Option<String>,
	/// Replacement size.
	pub size: Option<f64>,
}

/// The aggregate root. Mutated exclusively through
/// [`reduce`](super::reducer::reduce); everything else reads projections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoryState {
	/// All known nodes, revealed or not, keyed by id.
	pub nodes: BTreeMap<String, StoryNode>,
	/// All known links in insertion order.
	pub links: Vec<StoryLink>,
	/// Id of the node the player currently occupies.
	#[serde(rename = "currentNodeId")]
	pub current_node_id: String,
	/// Visit counters, kept in sync with each node's `visited_count`.
	#[serde(rename = "visitCounts")]
	pub visit_counts: BTreeMap<String, u32>,
	/// Narrative flags written by the rule engine and read by text logic.
	pub flags: BTreeMap<String, FlagValue>,
	/// Append-only visit order, for sequence-sensitive triggers.
	pub history: Vec<String>,
	/// Ids of once-rules that already fired; part of saved state so reset
	/// and load both cover rule bookkeeping.
	#[serde(rename = "firedRules", default)]
	pub fired_rules: BTreeSet<String>,
}

impl Default for StoryState {
	fn default() -> Self {
		super::initial::initial_state()
	}
}

impl StoryState {
	/// The node the player currently occupies, if it still exists.
	pub fn current_node(&self) -> Option<&StoryNode> {
		self.nodes.get(&self.current_node_id)
	}

	/// All revealed nodes.
	pub fn visible_nodes(&self) -> Vec<&StoryNode> {
		self.nodes.values().filter(|n| n.revealed).collect()
	}

	/// All revealed links whose endpoints are both revealed nodes.
	pub fn visible_links(&self) -> Vec<&StoryLink> {
		self.links
			.iter()
			.filter(|l| {
				l.revealed
					&& self.nodes.get(&l.source).is_some_and(|n| n.revealed)
					&& self.nodes.get(&l.target).is_some_and(|n| n.revealed)
			})
			.collect()
	}

	/// Visit count for a node, zero when never visited.
	pub fn visit_count(&self, id: &str) -> u32 {
		self.visit_counts.get(id).copied().unwrap_or(0)
	}

	/// Whether a boolean-ish flag is present and set.
	pub fn flag_set(&self, key: &str) -> bool {
		self.flags.get(key).is_some_and(FlagValue::is_set)
	}

	/// Structural validation applied before adopting an external state.
	/// Link endpoints may dangle (they resolve lazily), but the current
	/// node and every history entry must exist.
	pub fn validate(&self) -> Result<(), String> {
		if self.nodes.is_empty() {
			return Err("state has no nodes".into());
		}
		if !self.nodes.contains_key(&self.current_node_id) {
			return Err(format!(
				"current node '{}' is not in the graph",
				self.current_node_id
			));
		}
		for id in &self.history {
			if !self.nodes.contains_key(id) {
				return Err(format!("history references unknown node '{id}'"));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::reducer::{StoryAction, reduce};

	#[test]
	fn visible_links_require_revealed_endpoints() {
		let mut state = StoryState::default();
		assert!(state.visible_links().is_empty());

		// Visiting start reveals its outgoing choice links while their
		// targets stay hidden; such links must not surface yet.
		state = reduce(state, StoryAction::VisitNode("start".into()));
		assert!(
			state
				.links
				.iter()
				.any(|l| l.source == "start" && l.target == "pathA" && l.revealed)
		);
		assert!(state.visible_links().is_empty());

		state = reduce(
			state,
			StoryAction::RevealNode { id: "pathA".into(), patch: NodePatch::default() },
		);
		let visible = state.visible_links();
		assert_eq!(visible.len(), 2);
		for link in &visible {
			assert!(state.nodes[&link.source].revealed);
			assert!(state.nodes[&link.target].revealed);
		}
		// start->pathB is revealed but pathB is still hidden.
		assert!(
			!visible
				.iter()
				.any(|l| l.source == "pathB" || l.target == "pathB")
		);
	}

	#[test]
	fn choice_conditions_evaluate_against_state() {
		let mut state = StoryState::default();
		state.flags.insert("bothPathsVisited".into(), true.into());
		state.visit_counts.insert("pathA".into(), 2);

		assert!(ChoiceCondition::FlagSet("bothPathsVisited".into()).holds(&state));
		assert!(!ChoiceCondition::FlagSet("secretPathDiscovered".into()).holds(&state));
		assert!(
			ChoiceCondition::MinVisits { node: "pathA".into(), count: 2 }.holds(&state)
		);
		assert!(
			!ChoiceCondition::MinVisits { node: "pathB".into(), count: 1 }.holds(&state)
		);
		assert!(
			ChoiceCondition::FlagEquals("bothPathsVisited".into(), true.into())
				.holds(&state)
		);
	}

	#[test]
	fn validate_rejects_dangling_current_node() {
		let mut state = StoryState::default();
		state.current_node_id = "nowhere".into();
		assert!(state.validate().is_err());
	}

	#[test]
	fn validate_accepts_initial_state() {
		assert!(StoryState::default().validate().is_ok());
	}
}
