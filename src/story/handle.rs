//! Reactive story container provided through Leptos context.
//!
//! All mutation funnels through [`StoryHandle`]: dispatch an action, run the
//! rule engine, translate newly raised flags into concrete reveal actions,
//! and let the visible projection re-derive. This keeps the strict ordering
//! of store mutation before layout re-seeding on the single UI thread.

use leptos::prelude::*;

use super::reducer::{StoryAction, reduce};
use super::rules::{
	FLAG_ECHO_CHAMBER, FLAG_INITIAL_PATHS, FLAG_WHISPER_SOURCE, RuleEngine, node_text,
};
use super::types::{FlagValue, NodePatch, NodePosition, StoryLink, StoryState};

/// Bounded number of evaluate/apply passes per user mutation. Reveals can
/// enable further rules; `once` bookkeeping guarantees termination well
/// before this cap.
const MAX_RULE_PASSES: usize = 4;

/// Cloneable handle to the single story state signal and its rule engine.
#[derive(Clone, Copy)]
pub struct StoryHandle {
	state: RwSignal<StoryState>,
	engine: StoredValue<RuleEngine>,
}

impl StoryHandle {
	/// Create the handle and provide it as context. Call once, at the app
	/// root.
	pub fn provide() -> Self {
		let handle = Self {
			state: RwSignal::new(StoryState::default()),
			engine: StoredValue::new(RuleEngine::new()),
		};
		provide_context(handle);
		handle
	}

	/// Fetch the handle from context. Panics outside the app tree.
	pub fn use_story() -> Self {
		expect_context::<Self>()
	}

	/// The underlying state signal, for read projections.
	pub fn state(&self) -> RwSignal<StoryState> {
		self.state
	}

	fn dispatch(&self, action: StoryAction) {
		self.state.update(|state| {
			let prev = std::mem::take(state);
			*state = reduce(prev, action);
		});
	}

	/// Visit a node, then evaluate rules and apply the reveals they imply.
	pub fn visit_node(&self, id: &str) {
		self.dispatch(StoryAction::VisitNode(id.to_string()));
		self.run_rules();
	}

	/// Reveal or upsert a node, then re-evaluate rules.
	pub fn reveal_node(&self, id: &str, patch: NodePatch) {
		self.dispatch(StoryAction::RevealNode { id: id.to_string(), patch });
		self.run_rules();
	}

	/// Reveal a link, then re-evaluate rules.
	pub fn reveal_link(&self, link: StoryLink) {
		self.dispatch(StoryAction::RevealLink(link));
		self.run_rules();
	}

	/// Record a narrative flag directly.
	pub fn set_flag(&self, key: &str, value: impl Into<FlagValue>) {
		self.dispatch(StoryAction::SetFlag {
			key: key.to_string(),
			value: value.into(),
		});
	}

	/// Restore the initial graph, including rule bookkeeping.
	pub fn reset_story(&self) {
		self.dispatch(StoryAction::ResetStory);
	}

	/// Adopt an externally validated state wholesale.
	pub fn load_story(&self, state: StoryState) {
		self.dispatch(StoryAction::LoadStory(state));
	}

	/// Persist settled layout coordinates back into the store.
	pub fn update_positions(&self, positions: Vec<NodePosition>) {
		if !positions.is_empty() {
			self.dispatch(StoryAction::UpdateNodePositions(positions));
		}
	}

	/// Reactive narrative text for a node.
	pub fn node_text(&self, id: &str) -> String {
		self.state.with(|s| node_text(s, id))
	}

	/// Evaluate rules against the current state and fold the outcome back
	/// in, repeating while new flags keep appearing.
	fn run_rules(&self) {
		for _ in 0..MAX_RULE_PASSES {
			let outcome = self
				.engine
				.with_value(|engine| engine.evaluate(&self.state.get_untracked()));
			if outcome.is_empty() {
				return;
			}
			self.dispatch(StoryAction::MarkRulesFired(outcome.fired));
			for (key, value) in outcome.flags {
				let newly_set = !self.state.get_untracked().flag_set(&key);
				self.dispatch(StoryAction::SetFlag { key: key.clone(), value });
				if newly_set {
					self.apply_reveals_for(&key);
				}
			}
		}
	}

	/// Translate a raised flag into the graph reveals it stands for. Flags
	/// without a graph counterpart only influence text and styling.
	fn apply_reveals_for(&self, flag: &str) {
		match flag {
			FLAG_INITIAL_PATHS => {
				self.dispatch(StoryAction::RevealNode {
					id: "pathA".into(),
					patch: NodePatch::default(),
				});
				self.dispatch(StoryAction::RevealNode {
					id: "pathB".into(),
					patch: NodePatch::default(),
				});
				self.reveal_pair("start", "pathA", "#777");
				self.reveal_pair("start", "pathB", "#777");
			}
			FLAG_WHISPER_SOURCE => {
				self.dispatch(StoryAction::RevealNode {
					id: "whisperSource".into(),
					patch: NodePatch::default(),
				});
				self.reveal_pair("pathA", "whisperSource", "skyblue");
			}
			FLAG_ECHO_CHAMBER => {
				self.dispatch(StoryAction::RevealNode {
					id: "echoChamber".into(),
					patch: NodePatch::default(),
				});
				self.reveal_pair("pathB", "echoChamber", "lightgreen");
			}
			_ => {}
		}
	}

	fn reveal_pair(&self, source: &str, target: &str, color: &str) {
		self.dispatch(StoryAction::RevealLink(StoryLink {
			source: source.to_string(),
			target: target.to_string(),
			color: color.to_string(),
			width: 2.0,
			revealed: true,
		}));
	}
}
