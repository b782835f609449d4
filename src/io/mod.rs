pub mod output;
pub mod walker;
pub mod writers;

pub use output::{create_writer, OutputFormat, OutputWriter};

use crate::core::SourceInput;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Expand `paths` (files or directories) into source inputs.
///
/// Directories are walked with the ignore patterns applied; files named
/// explicitly are always read. Duplicates are dropped, first occurrence wins.
pub fn collect_inputs(paths: &[PathBuf], ignore_patterns: &[String]) -> Result<Vec<SourceInput>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(walker::find_project_files(path, ignore_patterns)?);
        } else {
            files.push(path.clone());
        }
    }

    let mut seen = std::collections::BTreeSet::new();
    files.retain(|f| seen.insert(f.clone()));

    files
        .into_iter()
        .map(|file| {
            let text = read_file(&file)?;
            Ok(SourceInput::from_path(file, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Language;
    use tempfile::TempDir;

    #[test]
    fn test_collect_inputs_mixes_files_and_dirs() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.py"), "def main():\n    pass\n").unwrap();
        let single = temp.path().join("b.js");
        fs::write(&single, "function f() {}\n").unwrap();

        let inputs = collect_inputs(&[dir.clone(), single.clone(), single], &[]).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].language, Language::Python);
        assert_eq!(inputs[1].language, Language::JavaScript);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(collect_inputs(&[temp.path().join("absent.py")], &[]).is_err());
    }
}
