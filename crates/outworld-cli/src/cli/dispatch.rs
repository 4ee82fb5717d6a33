//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors
//! - `Into<*Args>` impls to bridge dispatch → command handlers
//! - `LogParams`, which turns the global logging flags into a filter

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgMatches, ColorChoice};
use outworld_core::PART_PROTECTION;
use outworld_vm::{FuelLimits, MachineConfig, Variant};

use crate::commands::dump::DumpArgs;
use crate::commands::memlist::MemlistArgs;
use crate::commands::pack::PackArgs;
use crate::commands::run::RunArgs;
use crate::commands::run_common::SessionArgs;
use crate::commands::trace::TraceArgs;
use crate::commands::unpack::UnpackArgs;

pub struct LogParams {
    pub verbose: u8,
    pub quiet: bool,
    pub debug_vm: bool,
    pub debug_bank: bool,
}

impl LogParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            verbose: m.get_count("verbose"),
            quiet: m.get_flag("quiet"),
            debug_vm: m.get_flag("debug_vm"),
            debug_bank: m.get_flag("debug_bank"),
        }
    }

    /// `EnvFilter` directives for these flags.
    pub fn directives(&self) -> String {
        let level = match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        let mut directives = level.to_string();
        if self.debug_vm {
            directives.push_str(",outworld_vm=trace");
        }
        if self.debug_bank {
            directives.push_str(",outworld_bank=debug");
        }
        directives
    }
}

pub struct MemlistParams {
    pub datadir: PathBuf,
}

impl MemlistParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            datadir: datadir(m),
        }
    }
}

impl From<MemlistParams> for MemlistArgs {
    fn from(p: MemlistParams) -> Self {
        Self { datadir: p.datadir }
    }
}

pub struct UnpackParams {
    pub id: u16,
    pub datadir: PathBuf,
    pub output: Option<PathBuf>,
}

impl UnpackParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            id: m.get_one::<u16>("id").copied().unwrap_or_default(),
            datadir: datadir(m),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

impl From<UnpackParams> for UnpackArgs {
    fn from(p: UnpackParams) -> Self {
        Self {
            id: p.id,
            datadir: p.datadir,
            output: p.output,
        }
    }
}

pub struct PackParams {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

impl PackParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().unwrap_or_default(),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

impl From<PackParams> for PackArgs {
    fn from(p: PackParams) -> Self {
        // Default output sits next to the input.
        let output = p.output.unwrap_or_else(|| {
            let mut name = p.input.clone().into_os_string();
            name.push(".bk");
            PathBuf::from(name)
        });
        Self {
            input: p.input,
            output,
        }
    }
}

pub struct DumpParams {
    pub input: Option<PathBuf>,
    pub part: Option<u16>,
    pub datadir: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned(),
            part: m.get_one::<u16>("part").copied(),
            datadir: datadir(m),
            color: m.get_one::<ColorChoice>("color").copied().unwrap_or_default(),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            input: p.input,
            part: p.part.unwrap_or(PART_PROTECTION),
            datadir: p.datadir,
            color: colorize(p.color),
        }
    }
}

/// Flags shared by `run` and `trace`.
pub struct SessionParams {
    pub datadir: PathBuf,
    pub dumpdir: Option<PathBuf>,
    pub part: u16,
    pub seed: Option<u16>,
    pub fuel: u32,
    pub variant: Variant,
    pub bypass_protection: bool,
}

impl SessionParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let variant = match m.get_one::<String>("variant").map(|s| s.as_str()) {
            Some("out-of-this-world") => Variant::OutOfThisWorld,
            _ => Variant::AnotherWorld,
        };
        Self {
            datadir: datadir(m),
            dumpdir: m.get_one::<PathBuf>("dumpdir").cloned(),
            part: m.get_one::<u16>("part").copied().unwrap_or(PART_PROTECTION),
            seed: m.get_one::<u16>("seed").copied(),
            fuel: m.get_one::<u32>("fuel").copied().unwrap_or(1_000_000),
            variant,
            bypass_protection: !m.get_flag("no_protection_bypass"),
        }
    }
}

impl From<SessionParams> for SessionArgs {
    fn from(p: SessionParams) -> Self {
        Self {
            datadir: p.datadir,
            dumpdir: p.dumpdir,
            part: p.part,
            config: MachineConfig {
                random_seed: p.seed,
                variant: p.variant,
                bypass_protection: p.bypass_protection,
                limits: FuelLimits::new().exec_fuel(p.fuel),
                ..MachineConfig::default()
            },
        }
    }
}

pub struct RunParams {
    pub session: SessionParams,
    pub frames: u32,
    pub json: bool,
    pub log_instructions: bool,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            session: SessionParams::from_matches(m),
            frames: m.get_one::<u32>("frames").copied().unwrap_or(100),
            json: m.get_flag("json"),
            log_instructions: m.get_flag("debug_vm"),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            session: p.session.into(),
            frames: p.frames,
            json: p.json,
            log_instructions: p.log_instructions,
        }
    }
}

pub struct TraceParams {
    pub session: SessionParams,
    pub frames: u32,
    pub limit: Option<usize>,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            session: SessionParams::from_matches(m),
            frames: m.get_one::<u32>("frames").copied().unwrap_or(1),
            limit: m.get_one::<usize>("limit").copied(),
            color: m.get_one::<ColorChoice>("color").copied().unwrap_or_default(),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        Self {
            session: p.session.into(),
            frames: p.frames,
            limit: p.limit,
            color: colorize(p.color),
        }
    }
}

fn datadir(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("datadir").cloned().unwrap_or_default()
}

/// Resolve `--color`. Traces go to stdout and logs to stderr, so `auto`
/// colors only when both reach a terminal.
pub(crate) fn colorize(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        _ => std::io::stdout().is_terminal() && std::io::stderr().is_terminal(),
    }
}
