//! Bazel-style runfiles lookup.
//!
//! A [`Runfiles`] handle is discovered from the environment or from the
//! location of the running executable, then maps rlocation paths such as
//! `my_workspace/pkg/data.txt` to absolute filesystem paths.

pub mod manifest;
pub mod repo_mapping;

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::RunfilesEnv;
use crate::error::RunfilesError;
use repo_mapping::{RepoMapping, REPO_MAPPING_RLOCATION};

/// Canonical name of the main repository, the repository this binary is built in.
const MAIN_REPO: &str = "";

/// Resolves rlocation paths to filesystem paths.
pub trait Rlocation {
    /// Returns `None` when the path has no mapping.
    fn rlocation(&self, path: &str) -> Option<PathBuf>;
}

/// Creates a runfiles handle for the executable at `argv0`.
pub trait RunfilesProvider {
    type Runfiles: Rlocation;

    fn create(&self, argv0: &Path) -> Result<Self::Runfiles, RunfilesError>;
}

/// Provider backed by a snapshot of the runfiles environment variables.
pub struct EnvRunfilesProvider {
    env: RunfilesEnv,
}

impl EnvRunfilesProvider {
    pub fn new(env: RunfilesEnv) -> Self {
        Self { env }
    }
}

impl RunfilesProvider for EnvRunfilesProvider {
    type Runfiles = Runfiles;

    fn create(&self, argv0: &Path) -> Result<Runfiles, RunfilesError> {
        Runfiles::create(&self.env, argv0)
    }
}

#[derive(Debug)]
enum Mode {
    Manifest(HashMap<String, PathBuf>),
    Directory(PathBuf),
}

impl Mode {
    fn lookup(&self, path: &str) -> Option<PathBuf> {
        match self {
            Mode::Directory(dir) => Some(dir.join(path)),
            Mode::Manifest(entries) => {
                if let Some(target) = non_empty(entries.get(path)) {
                    return Some(target.clone());
                }
                // Directory entries: find the longest prefix that is a key.
                let mut end = path.len();
                while let Some(slash) = path[..end].rfind('/') {
                    if let Some(target) = non_empty(entries.get(&path[..slash])) {
                        return Some(target.join(&path[slash + 1..]));
                    }
                    end = slash;
                }
                None
            }
        }
    }
}

fn non_empty(target: Option<&PathBuf>) -> Option<&PathBuf> {
    target.filter(|t| !t.as_os_str().is_empty())
}

#[derive(Debug)]
pub struct Runfiles {
    mode: Mode,
    repo_mapping: RepoMapping,
}

impl Runfiles {
    /// Locates the runfiles for the executable at `argv0`.
    ///
    /// Tried in order: `RUNFILES_MANIFEST_FILE`, `RUNFILES_DIR`, `TEST_SRCDIR`,
    /// then `<exe>.runfiles/MANIFEST`, `<exe>.runfiles_manifest` and
    /// `<exe>.runfiles/` next to `argv0` and the current executable.
    pub fn create(env: &RunfilesEnv, argv0: &Path) -> Result<Self, RunfilesError> {
        let mode = discover(env, argv0)?;
        let repo_mapping = match mode.lookup(REPO_MAPPING_RLOCATION) {
            Some(path) => RepoMapping::load(&path)?,
            None => RepoMapping::default(),
        };
        if !repo_mapping.is_empty() {
            log::debug!("Repository mapping loaded");
        }
        Ok(Self { mode, repo_mapping })
    }
}

impl Rlocation for Runfiles {
    fn rlocation(&self, path: &str) -> Option<PathBuf> {
        if path.is_empty() {
            return None;
        }
        if Path::new(path).is_absolute() {
            return Some(PathBuf::from(path));
        }
        if !is_normalized(path) {
            log::debug!("Rejecting non-normalized rlocation path {:?}", path);
            return None;
        }

        let mapped = self.repo_mapping.apply(MAIN_REPO, path);
        if mapped != path {
            log::debug!("Repository mapping rewrote {} to {}", path, mapped);
        }
        self.mode.lookup(&mapped)
    }
}

fn is_normalized(path: &str) -> bool {
    path.split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

fn discover(env: &RunfilesEnv, argv0: &Path) -> Result<Mode, RunfilesError> {
    if let Some(path) = &env.manifest_file {
        log::debug!("Using manifest from environment: {}", path.display());
        return Ok(Mode::Manifest(manifest::load(path)?));
    }
    if let Some(dir) = env.runfiles_dir.as_ref().or(env.test_srcdir.as_ref()) {
        log::debug!("Using runfiles directory from environment: {}", dir.display());
        return Ok(Mode::Directory(dir.clone()));
    }

    for exe in executable_candidates(argv0) {
        if let Some(mode) = discover_next_to(&exe)? {
            return Ok(mode);
        }
    }

    Err(RunfilesError::NotFound {
        argv0: argv0.display().to_string(),
    })
}

fn executable_candidates(argv0: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if !argv0.as_os_str().is_empty() {
        candidates.push(argv0.to_path_buf());
    }
    match std::env::current_exe() {
        Ok(exe) if !candidates.contains(&exe) => candidates.push(exe),
        Ok(_) => {}
        Err(e) => log::debug!("Cannot determine current executable: {}", e),
    }
    candidates
}

fn discover_next_to(exe: &Path) -> Result<Option<Mode>, RunfilesError> {
    let runfiles_dir = with_suffix(exe, ".runfiles");

    for candidate in [runfiles_dir.join("MANIFEST"), with_suffix(exe, ".runfiles_manifest")] {
        if candidate.is_file() {
            log::debug!("Using manifest next to executable: {}", candidate.display());
            return manifest::load(&candidate).map(|entries| Some(Mode::Manifest(entries)));
        }
    }

    if runfiles_dir.is_dir() {
        log::debug!("Using runfiles directory next to executable: {}", runfiles_dir.display());
        return Ok(Some(Mode::Directory(runfiles_dir)));
    }

    Ok(None)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
