mod app;
mod cli;
mod config;
mod error;
mod reader;
mod runfiles;

use std::process::ExitCode;

use config::RunfilesEnv;
use runfiles::EnvRunfilesProvider;

fn main() -> ExitCode {
    env_logger::init();

    let provider = EnvRunfilesProvider::new(RunfilesEnv::from_env());
    let stdout = std::io::stdout();

    match app::run(std::env::args_os().collect(), &provider, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
