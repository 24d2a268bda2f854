//! Entry point for the vigil host.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use vigild::{Session, StructuredHealthReporter, SystemConfigLoader, bootstrap_with};

const MAIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::main");

fn main() -> ExitCode {
    let host = match bootstrap_with(&SystemConfigLoader, Arc::new(StructuredHealthReporter::new()))
    {
        Ok(host) => host,
        Err(error) => {
            tracing::error!(target: MAIN_TARGET, error = %error, "bootstrap failed");
            return ExitCode::FAILURE;
        }
    };

    let outcome = Session::new(&host).run(io::stdin().lock(), io::stdout().lock());
    host.shutdown();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: MAIN_TARGET, error = %error, "session aborted");
            ExitCode::FAILURE
        }
    }
}
