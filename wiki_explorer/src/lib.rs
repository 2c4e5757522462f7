//! # Wiki Explorer
//!
//! The session layer of the Infinite Wiki. Every article is generated on
//! demand by an AI service; every `[[link]]` in it leads to another generated
//! article. This crate drives that exploration on top of the `wiki_graph`
//! model.
//!
//! ## Core Components
//!
//! - **explorer**: The exploration state machine (history, fetches, rollback, queue)
//! - **generator**: The AI service seam and its prompt templates
//! - **deep_dive**: Supplementary content (simple explanation, analogy, quiz, image)
//! - **persistence**: Namespaced JSON values over a pluggable key-value store
//! - **animation**: Frame-paced layout runs on a background task
//! - **config**: TOML configuration
//!
//! ## Design Philosophy
//!
//! - **Reactive**: Changing the current topic triggers the view/cache/fetch reaction
//! - **Self-Healing**: A failed fetch rolls its topic out of the history
//! - **Fetch Once**: An article is requested at most once per key until it fails

pub mod animation;
pub mod config;
pub mod deep_dive;
pub mod error;
pub mod explorer;
pub mod generator;
pub mod persistence;

#[cfg(test)]
mod testing;

pub use animation::*;
pub use config::*;
pub use deep_dive::*;
pub use error::*;
pub use explorer::*;
pub use generator::*;
pub use persistence::*;
