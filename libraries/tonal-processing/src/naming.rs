//! Output path derivation for batch requests

use std::path::{Path, PathBuf};

/// Suffix appended to derived output names unless configured otherwise
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_processed";

/// Where a batch writes its outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpec {
    /// Every input writes to this one path; the last job to finish wins
    File(PathBuf),
    /// `dir / (relative stem + suffix + "." + extension)` per input
    Directory {
        dir: PathBuf,
        suffix: String,
        /// Explicit output extension; `None` keeps the input's own
        extension: Option<String>,
    },
}

impl OutputSpec {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        OutputSpec::Directory {
            dir: dir.into(),
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            extension: None,
        }
    }

    pub fn with_suffix(self, suffix: impl Into<String>) -> Self {
        match self {
            OutputSpec::Directory { dir, extension, .. } => OutputSpec::Directory {
                dir,
                suffix: suffix.into(),
                extension,
            },
            file => file,
        }
    }

    pub fn with_extension(self, extension: Option<String>) -> Self {
        match self {
            OutputSpec::Directory { dir, suffix, .. } => OutputSpec::Directory {
                dir,
                suffix,
                extension: extension.map(|e| e.trim_start_matches('.').to_string()),
            },
            file => file,
        }
    }

    /// Output path for `input`, keeping its sub-directory relative to `root`
    pub fn derive(&self, input: &Path, root: Option<&Path>) -> PathBuf {
        match self {
            OutputSpec::File(path) => path.clone(),
            OutputSpec::Directory {
                dir,
                suffix,
                extension,
            } => {
                let relative_dir = root
                    .and_then(|r| input.strip_prefix(r).ok())
                    .and_then(Path::parent)
                    .unwrap_or_else(|| Path::new(""));

                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();

                let mut name = format!("{}{}", stem, suffix);
                let ext = extension.clone().or_else(|| {
                    input
                        .extension()
                        .map(|e| e.to_string_lossy().into_owned())
                });
                if let Some(ext) = ext {
                    name.push('.');
                    name.push_str(&ext);
                }

                dir.join(relative_dir).join(name)
            }
        }
    }
}
