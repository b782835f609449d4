use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::AnalysisConfig;

pub const CONFIG_FILE_NAME: &str = ".codegauge.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse config from TOML text.
pub fn parse_config(contents: &str) -> Result<AnalysisConfig> {
    toml::from_str::<AnalysisConfig>(contents)
        .with_context(|| format!("Failed to parse {CONFIG_FILE_NAME}"))
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_from(path: &Path) -> Result<AnalysisConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents)
}

/// `start` and its ancestors, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        parent.pop().then_some(parent)
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.codegauge.toml`.
///
/// Returns the defaults when no file is found. A file that exists but does
/// not parse is an error.
pub fn discover_config(start: &Path) -> Result<AnalysisConfig> {
    let found = directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());

    match found {
        Some(path) => {
            tracing::debug!("Loaded config from {}", path.display());
            load_config_from(&path)
        }
        None => {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(AnalysisConfig::default())
        }
    }
}

/// Load the config named on the command line, or discover one from the
/// working directory.
pub fn load_config(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => {
            let current = std::env::current_dir().context("Failed to get current directory")?;
            discover_config(&current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "entry_point_names = [\"run\"]\n",
        )
        .unwrap();
        let nested = temp.path().join("src").join("pkg");
        fs::create_dir_all(&nested).unwrap();

        let config = discover_config(&nested).unwrap();
        assert!(config.entry_point_names.contains("run"));
        assert!(!config.entry_point_names.contains("main"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "complexity_critical_threshold = \"high\"").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_config(Some(&temp.path().join("absent.toml"))).is_err());
    }
}
