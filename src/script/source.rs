//! Locating and loading script files

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DatactlError, Result};
use crate::script::model::Script;

/// File extension of stored scripts
pub const SCRIPT_EXTENSION: &str = "dms";

/// Where a script comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// A script stored in the scripts directory
    Named(String),
    /// An explicit file path
    Path(PathBuf),
}

impl ScriptSource {
    /// Resolve to a file path, checking that it exists.
    pub fn resolve(&self, scripts_dir: &Path) -> Result<PathBuf> {
        let path = match self {
            ScriptSource::Path(path) => path.clone(),
            ScriptSource::Named(name) => {
                let exact = scripts_dir.join(name);
                if exact.is_file() {
                    exact
                } else {
                    scripts_dir.join(format!("{}.{}", name, SCRIPT_EXTENSION))
                }
            }
        };

        if path.is_file() {
            Ok(path)
        } else {
            Err(DatactlError::ScriptNotFound(path))
        }
    }

    /// Resolve, read and parse the script.
    pub fn load(&self, scripts_dir: &Path) -> Result<Script> {
        let path = self.resolve(scripts_dir)?;
        let content = fs::read_to_string(&path)?;
        Ok(Script::parse(&content)?)
    }
}

/// Names of the scripts stored in `dir`, sorted.
pub fn list_scripts(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == SCRIPT_EXTENSION) {
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
