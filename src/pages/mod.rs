//! Routed pages.

pub mod home;
pub mod narrative;
pub mod not_found;
