use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use crate::cli;
use crate::error::{AppError, Result};
use crate::reader;
use crate::runfiles::{Rlocation, RunfilesProvider};

/// Parses `args`, resolves the runfile and writes its contents to `out`.
pub fn run<P, W>(args: Vec<OsString>, provider: &P, out: &mut W) -> Result<()>
where
    P: RunfilesProvider,
    W: Write,
{
    let argv0 = args.first().cloned().unwrap_or_default();
    let args = cli::parse_args(args)?;

    let runfiles = provider.create(Path::new(&argv0))?;
    // rlocation paths are UTF-8; anything else has no mapping.
    let requested = args.rlocationpath.to_string_lossy();
    let path = args
        .rlocationpath
        .to_str()
        .and_then(|p| runfiles.rlocation(p))
        .ok_or_else(|| AppError::Unresolved {
            path: requested.to_string(),
        })?;
    log::debug!("Resolved {} to {}", requested, path.display());

    let contents = reader::read_runfile(&path)?;
    reader::emit(out, &contents)
}
