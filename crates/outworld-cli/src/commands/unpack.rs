//! Extract one resource from the banks.

use std::fs;
use std::path::PathBuf;

use outworld_bank::{BankError, Resources};

pub struct UnpackArgs {
    pub id: u16,
    pub datadir: PathBuf,
    /// Defaults to the dump name of the resource, e.g. `15_bytecode.data`.
    pub output: Option<PathBuf>,
}

pub fn run(args: UnpackArgs) {
    let (data, default_name) = extract(&args).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    let output = args.output.unwrap_or_else(|| PathBuf::from(default_name));
    if let Err(e) = fs::write(&output, &data) {
        eprintln!("error: failed to write '{}': {}", output.display(), e);
        std::process::exit(1);
    }
    println!(
        "{:#04x} -> {} ({} bytes)",
        args.id,
        output.display(),
        data.len()
    );
}

fn extract(args: &UnpackArgs) -> Result<(Vec<u8>, String), BankError> {
    let resources = Resources::open(&args.datadir)?;
    let name = resources.entry(args.id)?.dump_name();
    Ok((resources.read(args.id)?, name))
}
