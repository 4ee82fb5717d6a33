//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! Logging flags are global and accepted by every subcommand.

use clap::Command;

use super::args::*;

/// Machine flags shared by `run` and `trace`.
fn with_machine_args(cmd: Command) -> Command {
    cmd.arg(datadir_arg())
        .arg(dumpdir_arg())
        .arg(part_arg().default_value("protection"))
        .arg(seed_arg())
        .arg(fuel_arg())
        .arg(variant_arg())
        .arg(no_protection_bypass_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("outworld")
        .about("Inspect and run Another World game data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .arg(quiet_arg())
        .arg(debug_vm_arg())
        .arg(debug_bank_arg())
        .subcommand(memlist_command())
        .subcommand(unpack_command())
        .subcommand(pack_command())
        .subcommand(dump_command())
        .subcommand(run_command())
        .subcommand(trace_command())
}

/// List the resources of a data directory.
pub fn memlist_command() -> Command {
    Command::new("memlist")
        .about("List the resources of the memory list")
        .after_help(
            r#"EXAMPLES:
  outworld memlist                     # share/another-world
  outworld memlist --datadir game/     # another directory"#,
        )
        .arg(datadir_arg())
}

/// Extract one resource.
pub fn unpack_command() -> Command {
    Command::new("unpack")
        .about("Extract and unpack one resource")
        .override_usage("  outworld unpack <ID> [-o <FILE>]")
        .after_help(
            r#"EXAMPLES:
  outworld unpack 0x15                 # writes 15_bytecode.data
  outworld unpack 21 -o protection.bin # decimal id, explicit output"#,
        )
        .arg(resource_id_arg())
        .arg(datadir_arg())
        .arg(output_file_arg())
}

/// Compress a file with the bank codec.
pub fn pack_command() -> Command {
    Command::new("pack")
        .about("Compress a file the way bank resources are stored")
        .override_usage("  outworld pack <FILE> [-o <FILE>]")
        .after_help(
            r#"EXAMPLES:
  outworld pack picture.data           # writes picture.data.bk
  outworld pack picture.data -o pic.bk"#,
        )
        .arg(input_path_arg().required(true))
        .arg(output_file_arg())
}

/// Disassemble bytecode.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Disassemble bytecode")
        .override_usage(
            "\
  outworld dump <FILE>
  outworld dump --part <PART> [--datadir <PATH>]",
        )
        .after_help(
            r#"EXAMPLES:
  outworld dump 15_bytecode.data       # a dumped segment
  outworld dump --part water           # straight from the banks"#,
        )
        .arg(input_path_arg().conflicts_with("part"))
        .arg(part_arg())
        .arg(datadir_arg())
        .arg(color_arg())
}

/// Run the game headless.
pub fn run_command() -> Command {
    let cmd = Command::new("run")
        .about("Run the game without video or audio and summarize what happened")
        .override_usage("  outworld run [--part <PART>] [--frames <N>] [--json]")
        .after_help(
            r#"EXAMPLES:
  outworld run                         # 100 frames from the protection screen
  outworld run --part water --frames 500
  outworld run --seed 0x1234 --json    # reproducible, machine-readable"#,
        )
        .arg(frames_arg().default_value("100"))
        .arg(json_arg());
    with_machine_args(cmd)
}

/// Trace execution instruction by instruction.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Trace bytecode execution instruction by instruction")
        .override_usage("  outworld trace [--part <PART>] [--frames <N>] [--limit <LINES>]")
        .after_help(
            r#"EXAMPLES:
  outworld trace --part introduction   # first pass only
  outworld trace --frames 10 --limit 500"#,
        )
        .arg(frames_arg().default_value("1"))
        .arg(limit_arg())
        .arg(color_arg());
    with_machine_args(cmd)
}
