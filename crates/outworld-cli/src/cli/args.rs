//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! Defaults that differ between commands are set where the command is built.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ColorChoice, value_parser};
use outworld_core::GamePart;

/// Game data directory (--datadir).
pub fn datadir_arg() -> Arg {
    Arg::new("datadir")
        .long("datadir")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .default_value("share/another-world")
        .help("Directory holding MEMLIST.BIN and the BANKxx files")
}

/// Resource dump directory (--dumpdir).
pub fn dumpdir_arg() -> Arg {
    Arg::new("dumpdir")
        .long("dumpdir")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Write every loaded resource and a memlist.txt summary here")
}

/// Resource id (positional).
pub fn resource_id_arg() -> Arg {
    Arg::new("id")
        .value_name("ID")
        .required(true)
        .value_parser(parse_number)
        .help("Resource id, decimal or 0x-prefixed hex")
}

/// Input file (positional).
pub fn input_path_arg() -> Arg {
    Arg::new("input")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Input file")
}

/// Game part (--part).
pub fn part_arg() -> Arg {
    Arg::new("part")
        .long("part")
        .value_name("PART")
        .value_parser(parse_part)
        .help("Game part, by name (water, jail, ...) or id (0x3e80..0x3e89)")
}

/// Number of frames to run (--frames).
pub fn frames_arg() -> Arg {
    Arg::new("frames")
        .long("frames")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Number of passes to run")
}

/// Fixed random seed (--seed).
pub fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .value_name("SEED")
        .value_parser(parse_number)
        .help("Fixed random seed (default: derived from the clock)")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .default_value("1000000")
        .value_parser(value_parser!(u32))
        .help("Instruction budget per pass")
}

/// Game release (--variant).
pub fn variant_arg() -> Arg {
    Arg::new("variant")
        .long("variant")
        .value_name("RELEASE")
        .default_value("another-world")
        .value_parser(["another-world", "out-of-this-world"])
        .help("Which release the game data comes from")
}

/// Keep the code-wheel check (--no-protection-bypass).
pub fn no_protection_bypass_arg() -> Arg {
    Arg::new("no_protection_bypass")
        .long("no-protection-bypass")
        .action(ArgAction::SetTrue)
        .help("Run the copy protection check instead of skipping it")
}

/// Print the run summary as JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the summary as JSON")
}

/// Trace line limit (--limit).
pub fn limit_arg() -> Arg {
    Arg::new("limit")
        .long("limit")
        .value_name("LINES")
        .value_parser(value_parser!(usize))
        .help("Stop recording the trace after this many lines")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(value_parser!(ColorChoice))
        .help("Colorize output")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file")
}

/// Verbosity level (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .global(true)
        .help("Log more (-v info, -vv debug, -vvv trace)")
}

/// Only log errors (-q/--quiet).
pub fn quiet_arg() -> Arg {
    Arg::new("quiet")
        .short('q')
        .long("quiet")
        .action(ArgAction::SetTrue)
        .global(true)
        .conflicts_with("verbose")
        .help("Only log errors")
}

/// Log every executed instruction (--debug-vm).
pub fn debug_vm_arg() -> Arg {
    Arg::new("debug_vm")
        .long("debug-vm")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Log every executed instruction")
}

/// Log resource and part loads (--debug-bank).
pub fn debug_bank_arg() -> Arg {
    Arg::new("debug_bank")
        .long("debug-bank")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Log resource and part loads")
}

/// Decimal, or hex with a `0x` prefix.
pub(crate) fn parse_number(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("'{s}' is not a number in 0..=0xffff"))
}

pub(crate) fn parse_part(s: &str) -> Result<u16, String> {
    GamePart::parse(s)
        .map(|p| p.id)
        .ok_or_else(|| format!("unknown game part '{s}'"))
}
