use std::path::PathBuf;

pub const MANIFEST_FILE_VAR: &str = "RUNFILES_MANIFEST_FILE";
pub const RUNFILES_DIR_VAR: &str = "RUNFILES_DIR";
pub const TEST_SRCDIR_VAR: &str = "TEST_SRCDIR";

/// Runfiles discovery settings, loaded from the process environment.
///
/// A variable that is set but empty is treated as unset, so an empty
/// `RUNFILES_MANIFEST_FILE` falls through to the next discovery step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunfilesEnv {
    /// Manifest mapping rlocation paths to absolute paths
    pub manifest_file: Option<PathBuf>,

    /// Root of a runfiles tree
    pub runfiles_dir: Option<PathBuf>,

    /// Runfiles root set by `bazel test`
    pub test_srcdir: Option<PathBuf>,
}

impl RunfilesEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Builds the settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let non_empty = |key: &str| lookup(key).filter(|p| !p.as_os_str().is_empty());

        let env = Self {
            manifest_file: non_empty(MANIFEST_FILE_VAR),
            runfiles_dir: non_empty(RUNFILES_DIR_VAR),
            test_srcdir: non_empty(TEST_SRCDIR_VAR),
        };
        log::debug!("runfiles environment: {:?}", env);
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<PathBuf> {
        let map: HashMap<String, PathBuf> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_lookup_yields_default() {
        let env = RunfilesEnv::from_lookup(lookup_from(&[]));
        assert_eq!(env, RunfilesEnv::default());
    }

    #[test]
    fn test_all_variables_loaded() {
        let env = RunfilesEnv::from_lookup(lookup_from(&[
            (MANIFEST_FILE_VAR, "/tmp/MANIFEST"),
            (RUNFILES_DIR_VAR, "/tmp/bin.runfiles"),
            (TEST_SRCDIR_VAR, "/tmp/srcdir"),
        ]));
        assert_eq!(env.manifest_file, Some(PathBuf::from("/tmp/MANIFEST")));
        assert_eq!(env.runfiles_dir, Some(PathBuf::from("/tmp/bin.runfiles")));
        assert_eq!(env.test_srcdir, Some(PathBuf::from("/tmp/srcdir")));
    }

    #[test]
    fn test_empty_value_treated_as_unset() {
        let env = RunfilesEnv::from_lookup(lookup_from(&[
            (MANIFEST_FILE_VAR, ""),
            (RUNFILES_DIR_VAR, "/tmp/bin.runfiles"),
        ]));
        assert_eq!(env.manifest_file, None);
        assert_eq!(env.runfiles_dir, Some(PathBuf::from("/tmp/bin.runfiles")));
    }
}
