use std::process::ExitCode;

fn main() -> ExitCode {
    match branchlab::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            branchlab::ui::output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
