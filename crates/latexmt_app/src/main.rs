mod app;
mod config;
mod effects;
mod logging;
mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    match app::run_app() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("latexmt_app: {err}");
            ExitCode::FAILURE
        }
    }
}
