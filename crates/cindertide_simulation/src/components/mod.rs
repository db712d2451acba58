//! ECS components for the two fighters.

pub mod fighter;

pub use fighter::*;
