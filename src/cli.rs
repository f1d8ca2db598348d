use clap::Parser;
use std::ffi::OsString;

use crate::error::{AppError, Result};

#[derive(Parser, Debug)]
#[command(name = "runfiles_user")]
#[command(about = "Resolve a runfile by its rlocation path and print its contents")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// The runfile path to locate (e.g. "workspace/path/to/file.txt")
    #[arg(required = true, allow_hyphen_values = true)]
    pub rlocationpath: OsString,
}

/// Parses the process arguments. Anything other than exactly one positional
/// argument is a usage error.
pub fn parse_args<I, T>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "runfiles_user".to_string());

    if args.len() != 2 {
        return Err(AppError::Usage { program });
    }

    // An explicit `--` makes clap take the one argument as the path even when
    // it is `--` itself or starts with a hyphen.
    let escaped = [args[0].clone(), OsString::from("--"), args[1].clone()];
    Args::try_parse_from(escaped).map_err(|e| {
        log::debug!("argument parsing failed: {}", e.kind());
        AppError::Usage { program }
    })
}
