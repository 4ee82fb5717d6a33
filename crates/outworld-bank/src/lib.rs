#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Game data access for the outworld engine.
//!
//! - `unpack` / `pack`: the ByteKiller codec used for every packed resource
//! - `memlist`: the `MEMLIST.BIN` resource table
//! - `bank`: loading resources and game parts from `BANKxx` files

pub mod bank;
pub mod memlist;
pub mod pack;
pub mod unpack;

#[cfg(test)]
mod bank_tests;

pub use bank::{BankError, LoadedPart, Resources};
pub use memlist::{KindStats, MemEntry, MemList, MemListError};
pub use pack::pack;
pub use unpack::{UnpackError, unpack, unpack_in_place};
