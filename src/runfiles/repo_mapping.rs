use std::collections::HashMap;
use std::path::Path;

use crate::error::RunfilesError;

/// Name of the repository mapping file inside the runfiles tree.
pub const REPO_MAPPING_RLOCATION: &str = "_repo_mapping";

/// Maps `(source canonical repo, apparent name)` to a target canonical repo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoMapping {
    entries: HashMap<(String, String), String>,
}

impl RepoMapping {
    /// Loads the mapping file. A missing file yields an empty mapping.
    pub fn load(path: &Path) -> Result<Self, RunfilesError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No repository mapping at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(RunfilesError::RepoMappingRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::parse(&content).map_err(|line| RunfilesError::RepoMapping {
            path: path.to_path_buf(),
            line,
        })
    }

    /// Parses `source,apparent,target` lines. Returns the 1-based number of
    /// the first malformed line on failure.
    fn parse(content: &str) -> Result<Self, usize> {
        let mut entries = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            let [source, apparent, target] = fields[..] else {
                return Err(idx + 1);
            };
            entries.insert((source.to_string(), apparent.to_string()), target.to_string());
        }

        Ok(Self { entries })
    }

    /// Rewrites the first segment of `path` when `source_repo` maps it to a
    /// canonical repository name.
    pub fn apply(&self, source_repo: &str, path: &str) -> String {
        let Some((first, rest)) = path.split_once('/') else {
            return path.to_string();
        };
        match self.entries.get(&(source_repo.to_string(), first.to_string())) {
            Some(target) => format!("{}/{}", target, rest),
            None => path.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING: &str = ",my_module,_main\n,rules_foo,rules_foo+\nrules_foo+,helper,helper+\n";

    #[test]
    fn test_parse_entries() {
        let mapping = RepoMapping::parse(MAPPING).unwrap();
        assert!(!mapping.is_empty());
        assert_eq!(mapping.entries.len(), 3);
    }

    #[test]
    fn test_apply_rewrites_first_segment() {
        let mapping = RepoMapping::parse(MAPPING).unwrap();
        assert_eq!(mapping.apply("", "my_module/data/file.txt"), "_main/data/file.txt");
        assert_eq!(mapping.apply("", "rules_foo/bin/tool"), "rules_foo+/bin/tool");
    }

    #[test]
    fn test_apply_respects_source_repo() {
        let mapping = RepoMapping::parse(MAPPING).unwrap();
        assert_eq!(mapping.apply("", "helper/x"), "helper/x");
        assert_eq!(mapping.apply("rules_foo+", "helper/x"), "helper+/x");
    }

    #[test]
    fn test_apply_leaves_unmapped_and_single_segment() {
        let mapping = RepoMapping::parse(MAPPING).unwrap();
        assert_eq!(mapping.apply("", "other/file"), "other/file");
        assert_eq!(mapping.apply("", "my_module"), "my_module");
    }

    #[test]
    fn test_malformed_line() {
        assert_eq!(RepoMapping::parse(",a,b\n,only_two\n"), Err(2));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mapping = RepoMapping::load(&dir.path().join(REPO_MAPPING_RLOCATION)).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_load_malformed_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPO_MAPPING_RLOCATION);
        std::fs::write(&path, "not a mapping\n").unwrap();

        let err = RepoMapping::load(&path).unwrap_err();
        assert!(matches!(err, RunfilesError::RepoMapping { line: 1, .. }));
        assert!(err.to_string().contains("_repo_mapping"));
    }
}
