//! Application layer: directory, path resolution and charging operations

pub mod charging;
pub mod directory;
pub mod resolve;

pub use directory::{EntityDirectory, SharedEntityDirectory};
