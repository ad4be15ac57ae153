//! The story core: data model, pure reducer, rule engine, persistence and
//! the reactive handle the UI mutates through.

pub mod handle;
pub mod initial;
pub mod reducer;
pub mod rules;
pub mod save;
pub mod types;

pub use handle::StoryHandle;
pub use types::{NodePosition, StoryState};
