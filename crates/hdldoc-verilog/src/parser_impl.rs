//! VerilogParser implementing the DocParser trait

use hdldoc_parser_api::{
    DocParser, FileInfo, Module, ParserConfig, ParserError, ParserMetrics, ProjectInfo,
};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::grammar::verilog_lexer;
use crate::interpreter::Interpreter;

/// Extensions recognised as Verilog, compared case-insensitively
pub const VERILOG_EXTENSIONS: &[&str] = &[".v", ".vlog"];

pub struct VerilogParser {
    config: ParserConfig,
    metrics: Mutex<ParserMetrics>,
}

impl VerilogParser {
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    /// Metrics stay usable after a panic elsewhere poisoned the lock
    fn lock_metrics(&self) -> MutexGuard<'_, ParserMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, result: &Result<FileInfo, ParserError>) {
        let mut metrics = self.lock_metrics();
        metrics.files_attempted += 1;
        match result {
            Ok(info) => {
                metrics.files_succeeded += 1;
                metrics.total_parse_time += info.parse_time;
                metrics.total_modules += info.modules.len();
            }
            Err(_) => metrics.files_failed += 1,
        }
    }

    fn read_file(&self, path: &Path) -> Result<String, ParserError> {
        let metadata =
            fs::metadata(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;

        if metadata.len() > self.config.max_file_size as u64 {
            warn!("File too large: {} ({} bytes)", path.display(), metadata.len());
            return Err(ParserError::FileTooLarge(
                path.to_path_buf(),
                metadata.len() as usize,
            ));
        }

        fs::read_to_string(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))
    }

    fn parse_files_parallel(&self, paths: &[PathBuf]) -> ProjectInfo {
        let pool = match self.config.parallel_workers {
            Some(workers) => rayon::ThreadPoolBuilder::new().num_threads(workers).build(),
            None => rayon::ThreadPoolBuilder::new().build(),
        };

        let results: Vec<(PathBuf, Result<FileInfo, ParserError>)> = match pool {
            Ok(pool) => pool.install(|| {
                paths
                    .par_iter()
                    .map(|path| (path.clone(), self.parse_file(path)))
                    .collect()
            }),
            Err(e) => {
                warn!("Failed to create thread pool, parsing sequentially: {e}");
                paths
                    .iter()
                    .map(|path| (path.clone(), self.parse_file(path)))
                    .collect()
            }
        };

        collect_project(results)
    }
}

impl Default for VerilogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocParser for VerilogParser {
    fn language(&self) -> &str {
        "verilog"
    }

    fn file_extensions(&self) -> &[&str] {
        VERILOG_EXTENSIONS
    }

    fn parse_source(&self, source: &str) -> Vec<Module> {
        Interpreter::interpret(verilog_lexer().run(source), self.config.include_docs)
    }

    fn parse_file(&self, path: &Path) -> Result<FileInfo, ParserError> {
        let start_time = Instant::now();
        debug!("Parsing {}", path.display());

        let result = self.read_file(path).map(|source| {
            let mut info = FileInfo::new(path, self.parse_source(&source));
            info.line_count = source.lines().count();
            info.byte_count = source.len();
            info.parse_time = start_time.elapsed();
            info
        });

        match &result {
            Ok(info) => info!(
                "Parsed {}: {} modules in {} ms",
                path.display(),
                info.modules.len(),
                info.parse_time.as_millis()
            ),
            Err(e) => warn!("{e}"),
        }

        self.record(&result);
        result
    }

    fn parse_files(&self, paths: &[PathBuf]) -> ProjectInfo {
        if self.config.parallel {
            return self.parse_files_parallel(paths);
        }

        let results = paths
            .iter()
            .map(|path| (path.clone(), self.parse_file(path)))
            .collect();
        collect_project(results)
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn metrics(&self) -> ParserMetrics {
        self.lock_metrics().clone()
    }

    fn reset_metrics(&mut self) {
        *self.lock_metrics() = ParserMetrics::default();
    }
}

fn collect_project(results: Vec<(PathBuf, Result<FileInfo, ParserError>)>) -> ProjectInfo {
    let mut files = Vec::new();
    let mut failed_files = Vec::new();
    let mut total_modules = 0;
    let mut total_parse_time = Duration::ZERO;

    for (path, result) in results {
        match result {
            Ok(info) => {
                total_modules += info.modules.len();
                total_parse_time += info.parse_time;
                files.push(info);
            }
            Err(e) => failed_files.push((path, e.to_string())),
        }
    }

    ProjectInfo {
        files,
        total_modules,
        total_parse_time,
        failed_files,
    }
}
