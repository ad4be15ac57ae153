//! localStorage-backed persistence of the story state.
//!
//! The persisted payload is the serialized [`StoryState`]; a load that fails
//! to parse or validate is surfaced as an error and never partially adopted.

use log::error;
use thiserror::Error;
use web_sys::Storage;

use super::types::StoryState;

/// Key the serialized state is stored under.
pub const STORAGE_KEY: &str = "story-graph-save";

/// Ways persistence can fail. None of these corrupt the in-memory state.
#[derive(Debug, Error)]
pub enum SaveError {
	/// No window or localStorage in this context.
	#[error("local storage is unavailable")]
	StorageUnavailable,
	/// The browser rejected the write (quota, privacy mode).
	#[error("failed to write saved story")]
	WriteFailed,
	/// Serializing the state failed.
	#[error("failed to serialize story state: {0}")]
	Serialize(String),
	/// The stored payload did not parse as a story state.
	#[error("saved story is malformed: {0}")]
	Malformed(String),
	/// The payload parsed but failed structural validation.
	#[error("saved story is inconsistent: {0}")]
	Invalid(String),
}

fn storage() -> Result<Storage, SaveError> {
	web_sys::window()
		.and_then(|w| w.local_storage().ok().flatten())
		.ok_or(SaveError::StorageUnavailable)
}

/// Serialize and persist the full state.
pub fn save_story(state: &StoryState) -> Result<(), SaveError> {
	let payload =
		serde_json::to_string(state).map_err(|e| SaveError::Serialize(e.to_string()))?;
	storage()?
		.set_item(STORAGE_KEY, &payload)
		.map_err(|_| SaveError::WriteFailed)
}

/// Load and validate a previously saved state. `Ok(None)` means no save
/// exists; a malformed or inconsistent payload is an error.
pub fn load_story() -> Result<Option<StoryState>, SaveError> {
	let Some(payload) = storage()?
		.get_item(STORAGE_KEY)
		.map_err(|_| SaveError::StorageUnavailable)?
	else {
		return Ok(None);
	};
	let state: StoryState = serde_json::from_str(&payload).map_err(|e| {
		error!("load_story: {e}");
		SaveError::Malformed(e.to_string())
	})?;
	state.validate().map_err(SaveError::Invalid)?;
	Ok(Some(state))
}

/// Whether a save exists, without deserializing it.
pub fn has_saved_story() -> bool {
	storage()
		.ok()
		.and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
		.is_some()
}

/// Remove the save, if any.
pub fn delete_saved_story() {
	if let Ok(storage) = storage() {
		let _ = storage.remove_item(STORAGE_KEY);
	}
}

#[cfg(test)]
mod tests {
	use crate::story::reducer::{StoryAction, reduce};
	use crate::story::types::StoryState;

	// Storage itself needs a browser; the serialization contract is what
	// matters here and is testable natively.

	#[test]
	fn state_round_trips_through_json_without_loss() {
		let mut state = StoryState::default();
		for id in ["start", "pathA", "start"] {
			state = reduce(state, StoryAction::VisitNode(id.to_string()));
		}
		state = reduce(
			state,
			StoryAction::SetFlag { key: "storyBegan".into(), value: true.into() },
		);
		state = reduce(
			state,
			StoryAction::MarkRulesFired(vec!["reveal_initial_paths".into()]),
		);

		let payload = serde_json::to_string(&state).unwrap();
		let restored: StoryState = serde_json::from_str(&payload).unwrap();
		assert_eq!(restored, state);
		assert_eq!(restored.history, state.history);
		assert_eq!(restored.fired_rules, state.fired_rules);
	}

	#[test]
	fn malformed_payload_is_rejected() {
		assert!(serde_json::from_str::<StoryState>("{\"nodes\": 3}").is_err());
		assert!(serde_json::from_str::<StoryState>("not json").is_err());
	}

	#[test]
	fn parsed_but_inconsistent_payload_fails_validation() {
		let mut state = StoryState::default();
		state.history.push("ghost".into());
		let payload = serde_json::to_string(&state).unwrap();
		let restored: StoryState = serde_json::from_str(&payload).unwrap();
		assert!(restored.validate().is_err());
	}
}
