//! The map page: the full-viewport story graph.

use std::time::Duration;

use leptos::leptos_dom::helpers::set_timeout;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::save_controls::SaveControls;
use crate::components::story_graph::{GraphData, StoryGraphCanvas};
use crate::story::StoryHandle;

/// How long the click-to-navigate zoom plays before routing away. Matches
/// the camera tween plus a small beat.
const NAVIGATE_DELAY_MS: u64 = 800;

/// Landing page: the revealed graph, with node clicks visiting and then
/// navigating into the narrative view.
#[component]
pub fn Home() -> impl IntoView {
	let story = StoryHandle::use_story();
	let navigate = use_navigate();
	let graph_data =
		Signal::derive(move || story.state().with(|state| GraphData::from_story(state)));
	let focus_node = RwSignal::new(None::<String>);

	let on_node_click = Callback::new(move |id: String| {
		story.visit_node(&id);
		focus_node.set(Some(id.clone()));
		let navigate = navigate.clone();
		set_timeout(
			move || navigate(&format!("/narrative/{id}"), Default::default()),
			Duration::from_millis(NAVIGATE_DELAY_MS),
		);
	});

	let on_positions_settled = Callback::new(move |positions: Vec<_>| {
		story.update_positions(positions);
	});

	view! {
		<div class="fullscreen-graph">
			<StoryGraphCanvas
				data=graph_data
				on_node_click=on_node_click
				on_positions_settled=on_positions_settled
				focus_node=focus_node
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Eternal Return of the Digital Self"</h1>
				<p class="subtitle">
					"Click a place to travel there. Drag nodes to rearrange, scroll to zoom, double-click to fit."
				</p>
				<SaveControls />
			</div>
		</div>
	}
}
