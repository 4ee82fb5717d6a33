mod cli;
mod commands;

use cli::{
    DumpParams, LogParams, MemlistParams, PackParams, RunParams, TraceParams, UnpackParams,
    build_cli,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };
    init_tracing(&LogParams::from_matches(m));

    match name {
        "memlist" => {
            let params = MemlistParams::from_matches(m);
            commands::memlist::run(params.into());
        }
        "unpack" => {
            let params = UnpackParams::from_matches(m);
            commands::unpack::run(params.into());
        }
        "pack" => {
            let params = PackParams::from_matches(m);
            commands::pack::run(params.into());
        }
        "dump" => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        "run" => {
            let params = RunParams::from_matches(m);
            commands::run::run(params.into());
        }
        "trace" => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// Logs go to stderr. `RUST_LOG`, when set, wins over the command line.
fn init_tracing(params: &LogParams) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(params.directives()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
