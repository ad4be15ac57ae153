//! Reusable UI components.

pub mod mini_map;
pub mod save_controls;
pub mod story_graph;
