//! The prioritized trigger/effect rules that drive progressive reveals, and
//! the state-sensitive narrative text generator.
//!
//! The engine only decides *that* something should be revealed, expressed as
//! flags; translating flags into concrete reveal actions is the caller's
//! job (see [`super::handle`]). Fired-rule bookkeeping lives in
//! [`StoryState::fired_rules`] so it survives save/load and is cleared by a
//! reset together with the rest of the state.

use std::cmp::Reverse;

use super::types::{FlagValue, StoryState};

/// Flag raised on the first visit to the starting node.
pub const FLAG_INITIAL_PATHS: &str = "initialPathsRevealed";
/// Flag raised on the first visit to the Path of Whispers.
pub const FLAG_WHISPER_SOURCE: &str = "whisperSourceRevealed";
/// Flag raised on the first visit to the Path of Echoes.
pub const FLAG_ECHO_CHAMBER: &str = "echoChamberRevealed";
/// Flag raised once both paths have been visited, in any order.
pub const FLAG_BOTH_PATHS: &str = "bothPathsVisited";
/// Flag raised by walking whisperSource, pathA, echoChamber back to back.
pub const FLAG_SECRET_PATH: &str = "secretPathDiscovered";

/// A narrative trigger: when `trigger` holds, `effect` contributes a flag
/// patch. `once` rules never re-fire after their id is recorded as fired.
pub struct StoryRule {
	/// Stable id recorded in `fired_rules`.
	pub id: &'static str,
	/// Predicate over the full story state.
	pub trigger: fn(&StoryState) -> bool,
	/// Flags to set when the trigger holds.
	pub effect: fn(&StoryState) -> Vec<(String, FlagValue)>,
	/// Higher priorities are evaluated first.
	pub priority: i32,
	/// Fire at most once.
	pub once: bool,
}

/// What one evaluation pass produced.
#[derive(Debug, Default, PartialEq)]
pub struct RuleOutcome {
	/// Accumulated flag patch, later-firing rules overriding earlier ones
	/// on key collision.
	pub flags: Vec<(String, FlagValue)>,
	/// Ids of `once` rules that fired this pass.
	pub fired: Vec<String>,
}

impl RuleOutcome {
	/// True when the pass produced nothing.
	pub fn is_empty(&self) -> bool {
		self.flags.is_empty() && self.fired.is_empty()
	}
}

/// Ordered rule set evaluated after every state change.
pub struct RuleEngine {
	rules: Vec<StoryRule>,
}

impl Default for RuleEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl RuleEngine {
	/// Engine preloaded with the canonical story rules.
	pub fn new() -> Self {
		let mut engine = Self { rules: Vec::new() };

		engine.add_rule(StoryRule {
			id: "reveal_initial_paths",
			trigger: |s| s.visit_count("start") == 1,
			effect: |_| vec![(FLAG_INITIAL_PATHS.into(), true.into())],
			priority: 100,
			once: true,
		});

		engine.add_rule(StoryRule {
			id: "reveal_whisper_source",
			trigger: |s| s.visit_count("pathA") == 1,
			effect: |_| vec![(FLAG_WHISPER_SOURCE.into(), true.into())],
			priority: 90,
			once: true,
		});

		engine.add_rule(StoryRule {
			id: "reveal_echo_chamber",
			trigger: |s| s.visit_count("pathB") == 1,
			effect: |_| vec![(FLAG_ECHO_CHAMBER.into(), true.into())],
			priority: 90,
			once: true,
		});

		engine.add_rule(StoryRule {
			id: "paths_converge",
			trigger: |s| s.visit_count("pathA") > 0 && s.visit_count("pathB") > 0,
			effect: |_| vec![(FLAG_BOTH_PATHS.into(), true.into())],
			priority: 80,
			once: true,
		});

		engine.add_rule(StoryRule {
			id: "secret_path_discovery",
			trigger: |s| {
				s.history.len() >= 3
					&& s.history[s.history.len() - 3..]
						== ["whisperSource", "pathA", "echoChamber"]
			},
			effect: |_| vec![(FLAG_SECRET_PATH.into(), true.into())],
			priority: 70,
			once: true,
		});

		engine
	}

	/// Append a rule; insertion order is the tie-break within a priority.
	pub fn add_rule(&mut self, rule: StoryRule) {
		self.rules.push(rule);
	}

	/// Evaluate every rule against the state, priority descending. `once`
	/// rules whose id is already in `state.fired_rules` are skipped.
	pub fn evaluate(&self, state: &StoryState) -> RuleOutcome {
		let mut ordered: Vec<&StoryRule> = self.rules.iter().collect();
		ordered.sort_by_key(|r| Reverse(r.priority));

		let mut outcome = RuleOutcome::default();
		for rule in ordered {
			if rule.once && state.fired_rules.contains(rule.id) {
				continue;
			}
			if (rule.trigger)(state) {
				for (key, value) in (rule.effect)(state) {
					outcome.flags.retain(|(k, _)| k != &key);
					outcome.flags.push((key, value));
				}
				if rule.once {
					outcome.fired.push(rule.id.to_string());
				}
			}
		}
		outcome
	}
}

/// Narrative text for a node, with state-sensitive overrides. Deterministic
/// and side-effect free; unknown ids yield an empty string.
pub fn node_text(state: &StoryState, node_id: &str) -> String {
	let Some(node) = state.nodes.get(node_id) else {
		return String::new();
	};

	let mut text = node.text.clone();

	if node_id == "start" {
		if state.visit_count("start") > 1 {
			text = "You re-examine the anomaly. The paths remain, but the anomaly \
			        itself feels... different now."
				.to_string();
		}
		if state.flag_set(FLAG_BOTH_PATHS) {
			text.push_str(
				"\n\nSomething has changed. The paths you've traveled have left \
				 their mark on this place.",
			);
		}
	}

	text
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::reducer::{StoryAction, reduce};

	/// Run one evaluation pass and fold the outcome back into the state,
	/// the way the UI handle does.
	fn evaluate_and_apply(engine: &RuleEngine, mut state: StoryState) -> StoryState {
		let outcome = engine.evaluate(&state);
		state = reduce(state, StoryAction::MarkRulesFired(outcome.fired));
		for (key, value) in outcome.flags {
			state = reduce(state, StoryAction::SetFlag { key, value });
		}
		state
	}

	fn visit(engine: &RuleEngine, mut state: StoryState, id: &str) -> StoryState {
		state = reduce(state, StoryAction::VisitNode(id.to_string()));
		evaluate_and_apply(engine, state)
	}

	#[test]
	fn first_start_visit_raises_initial_paths() {
		let engine = RuleEngine::new();
		let state = visit(&engine, StoryState::default(), "start");
		assert!(state.flag_set(FLAG_INITIAL_PATHS));
		assert!(state.fired_rules.contains("reveal_initial_paths"));
	}

	#[test]
	fn once_rules_contribute_exactly_one_effect() {
		let engine = RuleEngine::new();
		let mut state = visit(&engine, StoryState::default(), "start");
		state.flags.remove(FLAG_INITIAL_PATHS);
		// Trigger no longer holds (count is 2) and the rule is spent either
		// way, so further passes leave the flag unset.
		state = visit(&engine, state, "start");
		state = evaluate_and_apply(&engine, state);
		assert!(!state.flag_set(FLAG_INITIAL_PATHS));
	}

	#[test]
	fn both_paths_fire_regardless_of_order() {
		let engine = RuleEngine::new();
		for order in [["pathA", "pathB"], ["pathB", "pathA"]] {
			let mut state = visit(&engine, StoryState::default(), "start");
			for id in order {
				state = visit(&engine, state, id);
			}
			assert!(state.flag_set(FLAG_BOTH_PATHS), "order {order:?}");
			assert!(state.fired_rules.contains("paths_converge"));
		}
	}

	#[test]
	fn path_visits_raise_their_reveal_flags() {
		let engine = RuleEngine::new();
		let mut state = visit(&engine, StoryState::default(), "start");
		state = visit(&engine, state, "pathA");
		assert!(state.flag_set(FLAG_WHISPER_SOURCE));
		state = visit(&engine, state, "pathB");
		assert!(state.flag_set(FLAG_ECHO_CHAMBER));
	}

	#[test]
	fn secret_path_needs_the_exact_sequence() {
		let engine = RuleEngine::new();
		let mut state = visit(&engine, StoryState::default(), "start");
		for id in ["pathA", "whisperSource", "pathA", "echoChamber"] {
			state = visit(&engine, state, id);
		}
		// ...whisperSource, pathA, echoChamber as the last three entries.
		assert!(state.flag_set(FLAG_SECRET_PATH));

		let mut wrong = visit(&engine, StoryState::default(), "start");
		for id in ["pathA", "whisperSource", "echoChamber"] {
			wrong = visit(&engine, wrong, id);
		}
		assert!(!wrong.flag_set(FLAG_SECRET_PATH));
	}

	#[test]
	fn equal_priority_keeps_insertion_order() {
		let mut engine = RuleEngine::new();
		engine.add_rule(StoryRule {
			id: "collide_a",
			trigger: |_| true,
			effect: |_| vec![("collide".into(), FlagValue::Text("first".into()))],
			priority: 10,
			once: false,
		});
		engine.add_rule(StoryRule {
			id: "collide_b",
			trigger: |_| true,
			effect: |_| vec![("collide".into(), FlagValue::Text("second".into()))],
			priority: 10,
			once: false,
		});
		let outcome = engine.evaluate(&StoryState::default());
		let value = outcome
			.flags
			.iter()
			.find(|(k, _)| k == "collide")
			.map(|(_, v)| v.clone());
		// The later insertion wins the collision.
		assert_eq!(value, Some(FlagValue::Text("second".into())));
	}

	#[test]
	fn reset_reopens_once_rules() {
		let engine = RuleEngine::new();
		let mut state = visit(&engine, StoryState::default(), "start");
		assert!(state.fired_rules.contains("reveal_initial_paths"));
		state = reduce(state, StoryAction::ResetStory);
		let state = visit(&engine, state, "start");
		assert!(state.flag_set(FLAG_INITIAL_PATHS));
	}

	#[test]
	fn start_text_changes_on_revisit_and_convergence() {
		let engine = RuleEngine::new();
		let mut state = visit(&engine, StoryState::default(), "start");
		let first = node_text(&state, "start");
		assert!(first.starts_with("You stand before"));

		state = visit(&engine, state, "start");
		let revisit = node_text(&state, "start");
		assert!(revisit.starts_with("You re-examine"));

		state = visit(&engine, state, "pathA");
		state = visit(&engine, state, "pathB");
		let converged = node_text(&state, "start");
		assert!(converged.contains("left"));
		assert!(converged.contains("mark on this place"));

		assert_eq!(node_text(&state, "nowhere"), "");
	}
}
