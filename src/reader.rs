use std::io::{Read, Write};
use std::path::Path;

use crate::error::{AppError, Result};

/// Reads the whole file into memory.
pub fn read_runfile(path: &Path) -> Result<Vec<u8>> {
    let open_err = |source| AppError::FileOpen {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(open_err)?;
    log::debug!("Read {} bytes from {}", buf.len(), path.display());
    Ok(buf)
}

/// Writes `contents` unmodified and flushes.
pub fn emit<W: Write>(out: &mut W, contents: &[u8]) -> Result<()> {
    out.write_all(contents).map_err(AppError::Write)?;
    out.flush().map_err(AppError::Write)
}
