//! Force-directed story graph canvas: projection types, physics and camera
//! state, drawing, and the Leptos component tying them together.

pub mod camera;
mod component;
mod render;
pub mod scale;
mod state;
mod types;

pub use component::StoryGraphCanvas;
pub use types::{GraphData, GraphLink, GraphNode};
