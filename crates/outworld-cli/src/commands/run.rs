//! Run the game headless and summarize what happened.

use outworld_vm::LogTracer;

use super::run_common::{Session, SessionArgs, SessionError};

pub struct RunArgs {
    pub session: SessionArgs,
    pub frames: u32,
    pub json: bool,
    /// Send every executed instruction to the log.
    pub log_instructions: bool,
}

pub fn run(args: RunArgs) {
    let mut session = Session::open(&args.session).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = run_frames(&mut session, &args) {
        eprintln!("error: {}", e);
        let code = match e {
            SessionError::Runtime(_) => 2,
            SessionError::Bank(_) => 1,
        };
        std::process::exit(code);
    }

    let summary = session.summary();
    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", summary);
    }
}

fn run_frames(session: &mut Session, args: &RunArgs) -> Result<(), SessionError> {
    let mut log = LogTracer::new();
    for _ in 0..args.frames {
        if args.log_instructions {
            session.frame_with(&mut log)?;
        } else {
            session.frame()?;
        }
    }
    Ok(())
}
