use std::process::ExitCode;

fn main() -> ExitCode {
    mountfinder_cli::run()
}
