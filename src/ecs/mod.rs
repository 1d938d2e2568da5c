//! Entity store: monotonic ids and insertion-ordered component tables

pub mod store;
pub mod world;

pub use store::ComponentStore;
pub use world::{Component, World};
