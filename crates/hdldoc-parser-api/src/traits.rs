use crate::{config::ParserConfig, entities::Module, errors::ParserError, metrics::ParserMetrics};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Information about a successfully parsed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Every module whose closing keyword was seen, in source order
    pub modules: Vec<Module>,

    /// Time taken to parse this file
    #[serde(with = "crate::metrics::duration_serde")]
    pub parse_time: Duration,

    /// Number of lines in the file
    pub line_count: usize,

    /// File size in bytes
    pub byte_count: usize,
}

impl FileInfo {
    pub fn new(file_path: impl Into<PathBuf>, modules: Vec<Module>) -> Self {
        Self {
            file_path: file_path.into(),
            modules,
            parse_time: Duration::ZERO,
            line_count: 0,
            byte_count: 0,
        }
    }

    /// Total number of modules extracted
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

/// Aggregate information about a parsed project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Information about each successfully parsed file
    pub files: Vec<FileInfo>,

    /// Total number of modules across all files
    pub total_modules: usize,

    /// Total parse time for all files
    #[serde(with = "crate::metrics::duration_serde")]
    pub total_parse_time: Duration,

    /// Files that failed to parse (path, error message)
    pub failed_files: Vec<(PathBuf, String)>,
}

impl ProjectInfo {
    /// Total number of files processed (success + failure)
    pub fn total_files(&self) -> usize {
        self.files.len() + self.failed_files.len()
    }

    /// Success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_files() == 0 {
            0.0
        } else {
            self.files.len() as f64 / self.total_files() as f64
        }
    }

    /// Average parse time per file
    pub fn avg_parse_time(&self) -> Duration {
        if self.files.is_empty() {
            Duration::ZERO
        } else {
            self.total_parse_time / self.files.len() as u32
        }
    }

    /// All extracted modules, file by file
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.files.iter().flat_map(|f| f.modules.iter())
    }
}

/// Core trait that all documentation parsers must implement
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to support parallel parsing.
pub trait DocParser: Send + Sync {
    /// Returns the language identifier (lowercase, e.g., "verilog")
    fn language(&self) -> &str;

    /// Returns supported file extensions, lowercase with a leading dot (e.g., [".v"])
    fn file_extensions(&self) -> &[&str];

    /// Parse an in-memory source buffer
    ///
    /// Never fails: malformed input yields whatever modules could be
    /// recovered, possibly none.
    ///
    /// **Note on Metrics**: This method does NOT update parser metrics.
    /// Only `parse_file()` does, to avoid double-counting.
    fn parse_source(&self, source: &str) -> Vec<Module>;

    /// Read a file as UTF-8 and parse it
    ///
    /// **Note on Metrics**: This method updates parser metrics
    /// (files_attempted, files_succeeded, etc.).
    ///
    /// # Errors
    /// Returns `ParserError` if the file cannot be read, is not valid UTF-8,
    /// or exceeds the configured size limit.
    fn parse_file(&self, path: &Path) -> Result<FileInfo, ParserError>;

    /// Parse multiple files (can be overridden for parallel parsing)
    ///
    /// Default implementation parses files sequentially.
    fn parse_files(&self, paths: &[PathBuf]) -> ProjectInfo {
        let mut files = Vec::new();
        let mut failed_files = Vec::new();
        let mut total_modules = 0;
        let mut total_parse_time = Duration::ZERO;

        for path in paths {
            match self.parse_file(path) {
                Ok(info) => {
                    total_modules += info.modules.len();
                    total_parse_time += info.parse_time;
                    files.push(info);
                }
                Err(e) => {
                    failed_files.push((path.clone(), e.to_string()));
                }
            }
        }

        ProjectInfo {
            files,
            total_modules,
            total_parse_time,
            failed_files,
        }
    }

    /// Parse a directory recursively
    fn parse_directory(&self, dir: &Path) -> Result<ProjectInfo, ParserError> {
        let paths = self.discover_files(dir)?;
        Ok(self.parse_files(&paths))
    }

    /// Discover parseable files in a directory
    ///
    /// Default implementation walks the directory and filters with `can_parse`.
    /// Results are sorted so repeated runs see files in the same order.
    fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>, ParserError> {
        use std::fs;

        fn walk_dir<P: DocParser + ?Sized>(
            parser: &P,
            dir: &Path,
            files: &mut Vec<PathBuf>,
        ) -> Result<(), ParserError> {
            if !dir.is_dir() {
                return Ok(());
            }

            for entry in
                fs::read_dir(dir).map_err(|e| ParserError::IoError(dir.to_path_buf(), e))?
            {
                let entry = entry.map_err(|e| ParserError::IoError(dir.to_path_buf(), e))?;
                let path = entry.path();

                if path.is_dir() {
                    walk_dir(parser, &path, files)?;
                } else if parser.can_parse(&path) {
                    files.push(path);
                }
            }

            Ok(())
        }

        let mut files = Vec::new();
        walk_dir(self, dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Check if this parser can handle the given file
    ///
    /// Default implementation compares the extension case-insensitively.
    fn can_parse(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = format!(".{}", ext.to_string_lossy().to_lowercase());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Get parser configuration
    fn config(&self) -> &ParserConfig;

    /// Get accumulated metrics
    fn metrics(&self) -> ParserMetrics;

    /// Reset metrics
    fn reset_metrics(&mut self);
}
