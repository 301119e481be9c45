use std::process::ExitCode;
use tid::commands::Cli;
use tid::libs::logging::init_logging;
use tid::msg_error;

fn main() -> ExitCode {
    init_logging();

    match Cli::menu() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            msg_error!(err);
            ExitCode::FAILURE
        }
    }
}
