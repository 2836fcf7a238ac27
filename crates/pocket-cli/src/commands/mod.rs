//! Command handlers for the Pocket CLI.

pub mod maintenance;
pub mod misc;
pub mod notes;
