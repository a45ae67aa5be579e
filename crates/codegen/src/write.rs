//! Planned output files and the side-effecting step that writes them.
//!
//! Generators first compute a `Vec<PlannedFile>` as a pure function of the
//! specification, then hand it to [`write_plan`]. All parent directories are
//! created before the first file is written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CodegenError;

/// One file to be written, relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub rel_path: PathBuf,
    pub content: String,
}

impl PlannedFile {
    pub fn new(rel_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            content: content.into(),
        }
    }

    /// A pretty-printed JSON document with a trailing newline.
    pub fn json<T: Serialize + ?Sized>(
        rel_path: impl Into<PathBuf>,
        value: &T,
    ) -> Result<Self, CodegenError> {
        let rel_path = rel_path.into();
        let mut content = serde_json::to_string_pretty(value)
            .map_err(|e| CodegenError::serialize(&rel_path.display().to_string(), e))?;
        content.push('\n');
        Ok(Self { rel_path, content })
    }
}

/// Create every directory in `dirs` (and their parents).
pub fn ensure_dirs<'a>(dirs: impl IntoIterator<Item = &'a Path>) -> Result<(), CodegenError> {
    for dir in dirs {
        std::fs::create_dir_all(dir).map_err(|source| CodegenError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write `content` to `path`, replacing any previous content.
pub fn write_file(path: &Path, content: &str) -> Result<PathBuf, CodegenError> {
    std::fs::write(path, content).map_err(|source| CodegenError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Write every planned file under `root`, returning the written paths in
/// plan order.
pub fn write_plan(root: &Path, plan: &[PlannedFile]) -> Result<Vec<PathBuf>, CodegenError> {
    let dirs: BTreeSet<PathBuf> = plan
        .iter()
        .filter_map(|f| root.join(&f.rel_path).parent().map(Path::to_path_buf))
        .collect();
    ensure_dirs(dirs.iter().map(PathBuf::as_path))?;

    plan.iter()
        .map(|f| write_file(&root.join(&f.rel_path), &f.content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_plan_creates_parents_and_preserves_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let plan = vec![
            PlannedFile::new("b/deep/one.txt", "1"),
            PlannedFile::new("a.txt", "2"),
        ];
        let written = write_plan(dir.path(), &plan).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("b/deep/one.txt"), dir.path().join("a.txt")]
        );
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "1");
    }

    #[test]
    fn json_file_ends_with_newline() {
        let f = PlannedFile::json("x.json", &serde_json::json!({"a": 1})).unwrap();
        assert!(f.content.ends_with("}\n"));
    }

    #[test]
    fn write_into_file_path_fails_with_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("blocker"), "x").unwrap();
        let plan = vec![PlannedFile::new("blocker/inner.txt", "1")];
        let err = write_plan(dir.path(), &plan).unwrap_err();
        assert!(matches!(err, CodegenError::CreateDir { .. }));
        assert!(err.to_string().contains("blocker"));
    }
}
