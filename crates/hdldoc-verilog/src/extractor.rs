//! Path-keyed cache of extracted modules
//!
//! The cache never checks whether a file changed since it was parsed;
//! callers invalidate entries themselves. It is not synchronized: share it
//! across threads only behind a lock.

use hdldoc_parser_api::{
    is_array_type, DocParser, Documentable, Module, ObjectKind, ParserConfig, ParserError,
    ParserResult,
};
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::parser_impl::VerilogParser;

/// Source of file contents for the extractor
pub trait SourceReader {
    /// Read `path` as UTF-8 text
    fn read_source(&self, path: &Path) -> ParserResult<String>;
}

/// Reads straight from the file system
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_source(&self, path: &Path) -> ParserResult<String> {
        fs::read_to_string(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))
    }
}

/// Extracts modules from files, parsing each path at most once
pub struct VerilogExtractor<R = FsReader> {
    reader: R,
    parser: VerilogParser,
    cache: HashMap<PathBuf, Vec<Module>>,
}

impl VerilogExtractor<FsReader> {
    pub fn new() -> Self {
        Self::with_reader(FsReader)
    }
}

impl Default for VerilogExtractor<FsReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SourceReader> VerilogExtractor<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            parser: VerilogParser::new(),
            cache: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.parser = VerilogParser::with_config(config);
        self
    }

    /// Extract objects from a source file
    ///
    /// Cached results are returned without reading the file again.
    /// `type_filter` keeps only objects of that kind.
    pub fn extract_objects(
        &mut self,
        path: impl AsRef<Path>,
        type_filter: Option<ObjectKind>,
    ) -> ParserResult<Vec<Module>> {
        let path = path.as_ref();

        let objects = match self.cache.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => {
                debug!("cache hit for {}", path.display());
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let text = self.reader.read_source(path)?;
                entry.insert(self.parser.parse_source(&text))
            }
        };

        Ok(filter_kind(objects, type_filter))
    }

    /// Extract object declarations from a text buffer; nothing is cached
    pub fn extract_objects_from_source(
        &self,
        text: &str,
        type_filter: Option<ObjectKind>,
    ) -> Vec<Module> {
        filter_kind(&self.parser.parse_source(text), type_filter)
    }

    /// Check if a type is an array type
    pub fn is_array(&self, data_type: &str) -> bool {
        is_array_type(data_type)
    }

    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        self.cache.contains_key(path.as_ref())
    }

    /// Forget the cached result for `path`; returns whether one existed
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.cache.remove(path.as_ref()).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

fn filter_kind(objects: &[Module], type_filter: Option<ObjectKind>) -> Vec<Module> {
    objects
        .iter()
        .filter(|object| type_filter.map_or(true, |kind| object.kind() == kind))
        .cloned()
        .collect()
}
