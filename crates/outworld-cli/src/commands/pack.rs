//! Compress a file with the bank codec.

use std::fs;
use std::path::PathBuf;

use outworld_bank::{UnpackError, pack, unpack_in_place};

pub struct PackArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

pub fn run(args: PackArgs) {
    let data = fs::read(&args.input).unwrap_or_else(|e| {
        eprintln!("error: failed to read '{}': {}", args.input.display(), e);
        std::process::exit(1);
    });
    if data.len() > usize::from(u16::MAX) {
        eprintln!(
            "error: '{}' is {} bytes; bank resources hold at most {}",
            args.input.display(),
            data.len(),
            u16::MAX
        );
        std::process::exit(1);
    }

    let packed = pack(&data);
    // Banks are expanded in place; never write a block the loader cannot read.
    if let Err(e) = verify(&packed, &data) {
        eprintln!("error: packed data does not unpack: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = fs::write(&args.output, &packed) {
        eprintln!("error: failed to write '{}': {}", args.output.display(), e);
        std::process::exit(1);
    }
    let note = if packed.len() == data.len() { " (stored)" } else { "" };
    println!(
        "{} -> {}: {} -> {} bytes{}",
        args.input.display(),
        args.output.display(),
        data.len(),
        packed.len(),
        note
    );
}

/// Expand `packed` inside a buffer of the input's size and compare.
pub(crate) fn verify(packed: &[u8], data: &[u8]) -> Result<(), VerifyError> {
    let mut buf = packed.to_vec();
    buf.resize(data.len(), 0);
    if packed.len() < data.len() {
        unpack_in_place(&mut buf, packed.len(), data.len())?;
    }
    if buf != data {
        return Err(VerifyError::Mismatch);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum VerifyError {
    #[error(transparent)]
    Unpack(#[from] UnpackError),
    #[error("output differs from the input")]
    Mismatch,
}
