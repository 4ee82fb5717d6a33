#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the outworld engine crates.
//!
//! - Terminal colors for CLI output
//! - Register slots with a fixed engine meaning
//! - Resource descriptors and the game part table

mod colors;
mod part;
mod resource;
pub mod vars;

#[cfg(test)]
mod resource_tests;

pub use colors::Colors;
pub use part::{
    FIRST_PART, GamePart, LAST_PART, PART_ARENA, PART_CITE, PART_FINAL, PART_INTRODUCTION,
    PART_JAIL, PART_LUXE, PART_PASSWORD, PART_PROTECTION, PART_WATER, PARTS, is_part_id,
};
pub use resource::{ResourceEntry, ResourceKind, ResourceState};
