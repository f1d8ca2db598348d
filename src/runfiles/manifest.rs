use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::RunfilesError;

/// Reads a runfiles manifest into a map of rlocation path to target.
///
/// The manifest is read as raw bytes: targets need not be UTF-8 on Unix.
/// Entries whose key is not UTF-8 can never be requested and are skipped.
pub fn load(path: &Path) -> Result<HashMap<String, PathBuf>, RunfilesError> {
    let content = std::fs::read(path).map_err(|source| RunfilesError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse(&content).map_err(|(line, detail)| RunfilesError::ManifestParse {
        path: path.to_path_buf(),
        line,
        detail,
    })?;
    log::debug!("Loaded {} manifest entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parses manifest content. On failure returns the 1-based line number and a
/// description of the problem.
fn parse(content: &[u8]) -> Result<HashMap<String, PathBuf>, (usize, String)> {
    let mut entries = HashMap::new();

    for (idx, line) in content.split(|b| *b == b'\n').enumerate() {
        let line_num = idx + 1;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let (key, target) = if let Some(escaped) = line.strip_prefix(b" ") {
            let (key, target) = split_at_space(escaped);
            let key = unescape(key, true).map_err(|e| (line_num, e))?;
            let target = unescape(target, false).map_err(|e| (line_num, e))?;
            (key, target)
        } else {
            let (key, target) = split_at_space(line);
            (key.to_vec(), target.to_vec())
        };

        let Ok(key) = String::from_utf8(key) else {
            log::debug!("Skipping manifest line #{}: key is not UTF-8", line_num);
            continue;
        };
        let target = bytes_to_path(target).map_err(|e| (line_num, e))?;
        entries.insert(key, target);
    }

    Ok(entries)
}

fn split_at_space(line: &[u8]) -> (&[u8], &[u8]) {
    match line.iter().position(|b| *b == b' ') {
        Some(i) => (&line[..i], &line[i + 1..]),
        None => (line, &[]),
    }
}

/// `\s` only appears in keys; targets may contain raw spaces.
fn unescape(s: &[u8], is_key: bool) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.iter().copied();

    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b'b') => out.push(b'\\'),
            Some(b's') if is_key => out.push(b' '),
            Some(other) => {
                return Err(format!("unknown escape sequence \\{}", char::from(other)))
            }
            None => return Err("dangling backslash".to_string()),
        }
    }

    Ok(out)
}

#[cfg(unix)]
fn bytes_to_path(bytes: Vec<u8>) -> Result<PathBuf, String> {
    use std::os::unix::ffi::OsStringExt;

    Ok(PathBuf::from(OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: Vec<u8>) -> Result<PathBuf, String> {
    String::from_utf8(bytes)
        .map(|s| PathBuf::from(OsString::from(s)))
        .map_err(|_| "target is not valid UTF-8".to_string())
}
