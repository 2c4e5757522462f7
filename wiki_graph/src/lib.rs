//! # Wiki Graph
//!
//! The model crate of the Infinite Wiki. It owns the vocabulary every other
//! layer speaks: topics and their case-insensitive identity, the navigation
//! trail, the article cache, the `[[link]]` marker syntax, and the
//! force-directed layout used to draw the explored topics as a graph.
//!
//! This crate contains no AI logic and performs no I/O.
//!
//! ## Core Components
//!
//! - **topic**: Topic key normalization, the history trail and the viewed-topic set
//! - **links**: Link extraction and article segmentation
//! - **store**: Generated articles and their outgoing links
//! - **layout**: Graph derivation and the force-directed layout engine

pub mod layout;
pub mod links;
pub mod store;
pub mod topic;

pub use layout::*;
pub use links::*;
pub use store::*;
pub use topic::*;
