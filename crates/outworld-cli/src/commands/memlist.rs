//! List the resources of a data directory.

use std::path::PathBuf;

use outworld_bank::Resources;

pub struct MemlistArgs {
    pub datadir: PathBuf,
}

pub fn run(args: MemlistArgs) {
    let resources = Resources::open(&args.datadir).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    print!("{}", resources.memlist());
}
