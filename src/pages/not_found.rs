//! Fallback page for unknown routes.

use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page with a link back to the map.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page not found"</h1>
			<p>"That place is not on the map."</p>
			<A href="/">"Back to the map"</A>
		</div>
	}
}
