//! Save / load / reset controls with a transient status notice.

use leptos::prelude::*;
use log::error;

use crate::story::StoryHandle;
use crate::story::save;

/// Buttons driving the persistence collaborator. Failures surface as a
/// notice; the story state is never partially adopted.
#[component]
pub fn SaveControls() -> impl IntoView {
	let story = StoryHandle::use_story();
	let status = RwSignal::new(String::new());
	let has_save = RwSignal::new(save::has_saved_story());

	let on_save = move |_| {
		let result = story.state().with_untracked(|state| save::save_story(state));
		match result {
			Ok(()) => {
				has_save.set(true);
				status.set("Story saved.".into());
			}
			Err(e) => {
				error!("save failed: {e}");
				status.set("Failed to save story.".into());
			}
		}
	};

	let on_load = move |_| match save::load_story() {
		Ok(Some(state)) => {
			story.load_story(state);
			status.set("Story loaded.".into());
		}
		Ok(None) => status.set("No saved story found.".into()),
		Err(e) => {
			error!("load failed: {e}");
			status.set("Failed to load story.".into());
		}
	};

	let on_reset = move |_| {
		story.reset_story();
		status.set("Story reset.".into());
	};

	let on_delete = move |_| {
		save::delete_saved_story();
		has_save.set(false);
		status.set("Save deleted.".into());
	};

	view! {
		<div class="save-controls">
			<button on:click=on_save>"Save"</button>
			<button on:click=on_load prop:disabled=move || !has_save.get()>
				"Load"
			</button>
			<button on:click=on_reset>"Reset"</button>
			<button on:click=on_delete prop:disabled=move || !has_save.get()>
				"Delete Save"
			</button>
			<Show when=move || !status.get().is_empty()>
				<span class="save-status">{move || status.get()}</span>
			</Show>
		</div>
	}
}
