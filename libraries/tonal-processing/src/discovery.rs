//! Source discovery for batch requests

use crate::{ProcessingError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported input extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a", "aac"];

/// Pattern used when a directory source names none
pub const DEFAULT_PATTERN: &str = "**/*.{wav,mp3,flac,ogg,m4a,aac}";

/// Where a batch reads its inputs from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// A single explicit file
    File(PathBuf),
    /// Every file under `dir` whose relative path matches `pattern`
    Directory { dir: PathBuf, pattern: String },
}

impl SourceSpec {
    pub fn directory(dir: impl Into<PathBuf>, pattern: Option<String>) -> Self {
        SourceSpec::Directory {
            dir: dir.into(),
            pattern: pattern.unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
        }
    }

    /// Root that relative output names are computed against
    pub fn root(&self) -> Option<&Path> {
        match self {
            SourceSpec::File(_) => None,
            SourceSpec::Directory { dir, .. } => Some(dir),
        }
    }

    /// Resolve to a deduplicated list of files, sorted by path
    ///
    /// An empty result is an error, never an empty list.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        match self {
            SourceSpec::File(path) => {
                if path.is_file() {
                    Ok(vec![path.clone()])
                } else {
                    Err(ProcessingError::NoFilesFound {
                        directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                        pattern: path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                    })
                }
            }
            SourceSpec::Directory { dir, pattern } => {
                let files = scan_directory(dir, pattern)?;
                if files.is_empty() {
                    return Err(ProcessingError::NoFilesFound {
                        directory: dir.clone(),
                        pattern: pattern.clone(),
                    });
                }
                tracing::debug!(
                    directory = %dir.display(),
                    pattern = %pattern,
                    count = files.len(),
                    "Discovered input files"
                );
                Ok(files)
            }
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ProcessingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

/// Walk `dir` recursively and keep regular files whose relative path matches
fn scan_directory(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = compile_pattern(pattern)?;

    if !dir.is_dir() {
        return Err(ProcessingError::NoFilesFound {
            directory: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    let mut files = BTreeSet::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if matcher.is_match(relative) {
            files.insert(entry.path().to_path_buf());
        }
    }

    Ok(files.into_iter().collect())
}

/// Check if a file has a supported audio extension
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
