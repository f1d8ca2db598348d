use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Usage: {program} <runfile_path>\nExample: {program} workspace/path/to/file.txt")]
    Usage { program: String },

    #[error("Failed to locate runfiles: {0}")]
    ResolverInit(#[from] RunfilesError),

    #[error("Failed to locate runfile: {path}")]
    Unresolved { path: String },

    #[error("Failed to read file: {} ({source})", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to stdout: {0}")]
    Write(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RunfilesError {
    #[error("cannot find runfiles (argv0={argv0:?})")]
    NotFound { argv0: String },

    #[error("cannot open runfiles manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad runfiles manifest entry in {} line #{line}: {detail}", path.display())]
    ManifestParse {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("cannot open repository mapping {}: {source}", path.display())]
    RepoMappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad repository mapping entry in {} line #{line}", path.display())]
    RepoMapping { path: PathBuf, line: usize },
}

pub type Result<T> = std::result::Result<T, AppError>;
