//! The narrative page: story text, conditional choices and the minimap.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::components::mini_map::MiniMap;
use crate::components::story_graph::GraphData;
use crate::story::StoryHandle;
use crate::story::types::StoryChoice;

/// Reads the node id from the route and renders its narrative content.
#[component]
pub fn Narrative() -> impl IntoView {
	let story = StoryHandle::use_story();
	let params = use_params_map();
	let navigate = use_navigate();
	let node_id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));

	let label = move || {
		story
			.state()
			.with(|s| s.nodes.get(&node_id.get()).map(|n| n.label.clone()))
			.unwrap_or_else(|| "Unknown place".to_string())
	};
	let text = move || story.node_text(&node_id.get());
	let background = move || {
		story
			.state()
			.with(|s| s.nodes.get(&node_id.get()).map(|n| n.color.clone()))
			.unwrap_or_else(|| "#1e232d".to_string())
	};

	// Choices whose condition holds against the current state.
	let choices = move || -> Vec<StoryChoice> {
		story.state().with(|s| {
			s.nodes
				.get(&node_id.get())
				.map(|n| {
					n.choices
						.iter()
						.filter(|c| {
							c.condition.as_ref().is_none_or(|cond| cond.holds(s))
						})
						.cloned()
						.collect()
				})
				.unwrap_or_default()
		})
	};

	let graph_data =
		Signal::derive(move || story.state().with(|s| GraphData::from_story(s)));

	let travel_nav = navigate.clone();
	let on_travel = Callback::new(move |target_id: String| {
		travel_nav(&format!("/narrative/{target_id}"), Default::default());
		story.visit_node(&target_id);
	});

	let back = move |_| {
		navigate("/", Default::default());
	};

	view! {
		<div class="narrative-page" style:background-color=background>
			<div class="narrative-content">
				<button class="back-button" on:click=back>
					"Back to Map"
				</button>

				<h2>{label}</h2>

				<div class="story-text-container">
					<p>{text}</p>

					<Show when=move || !choices().is_empty()>
						<div class="story-choices">
							<p>"What would you like to do?"</p>
							<div class="choice-buttons">
								<For
									each=choices
									key=|choice| choice.target_id.clone()
									children=move |choice: StoryChoice| {
										let target = choice.target_id.clone();
										view! {
											<button
												class="choice-button"
												on:click=move |_| on_travel.run(target.clone())
											>
												{choice.text.clone()}
											</button>
										}
									}
								/>
							</div>
						</div>
					</Show>
				</div>
			</div>

			<div class="mini-map-container">
				<MiniMap data=graph_data on_travel=on_travel />
			</div>
		</div>
	}
}
