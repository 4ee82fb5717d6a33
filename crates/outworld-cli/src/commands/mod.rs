pub mod dump;
pub mod memlist;
pub mod pack;
pub mod run;
pub mod run_common;
pub mod trace;
pub mod unpack;

#[cfg(test)]
mod pack_tests;
