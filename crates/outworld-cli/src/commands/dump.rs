//! Disassemble a bytecode segment.

use std::fs;
use std::path::PathBuf;

use outworld_bank::Resources;
use outworld_core::Colors;

pub struct DumpArgs {
    /// A segment on disk; when absent, `part` is read from the banks.
    pub input: Option<PathBuf>,
    pub part: u16,
    pub datadir: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let segment = match &args.input {
        Some(path) => fs::read(path).unwrap_or_else(|e| {
            eprintln!("error: failed to read '{}': {}", path.display(), e);
            std::process::exit(1);
        }),
        None => load_part_bytecode(&args).unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }),
    };
    print!("{}", outworld_bytecode::dump(&segment, Colors::new(args.color)));
}

fn load_part_bytecode(args: &DumpArgs) -> Result<Vec<u8>, outworld_bank::BankError> {
    let mut resources = Resources::open(&args.datadir)?;
    Ok(resources.load_part(args.part)?.bytecode.to_vec())
}
