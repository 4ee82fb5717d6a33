//! Trace bytecode execution for debugging.

use outworld_core::Colors;
use outworld_vm::PrintTracer;

use super::run_common::{Session, SessionArgs, SessionError};

pub struct TraceArgs {
    pub session: SessionArgs,
    pub frames: u32,
    pub limit: Option<usize>,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let mut session = Session::open(&args.session).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });
    let mut tracer = PrintTracer::new(Colors::new(args.color));
    if let Some(limit) = args.limit {
        tracer = tracer.with_limit(limit);
    }

    for _ in 0..args.frames {
        match session.frame_with(&mut tracer) {
            Ok(()) => {}
            Err(SessionError::Runtime(e)) => {
                tracer.print();
                eprintln!("runtime error: {}", e);
                std::process::exit(2);
            }
            Err(e) => {
                tracer.print();
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
    tracer.print();
}
