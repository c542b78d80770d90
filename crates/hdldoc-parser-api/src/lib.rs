//! hdldoc Parser API
//!
//! Shared trait and types for building hdldoc documentation extractors.
//!
//! This crate provides the foundation for HDL parsers that pull interface
//! documentation out of source files without a full semantic compiler. It defines:
//!
//! - **DocParser trait**: The core interface all parsers must implement
//! - **Entity types**: Immutable records for modules, ports and parameters
//! - **Configuration**: Customizable parser behavior
//! - **Metrics**: Performance and success tracking
//! - **Error handling**: I/O level error types (malformed syntax is never an error)
//!
//! # Example
//!
//! ```rust,ignore
//! use hdldoc_parser_api::{DocParser, Module, ParserConfig, ParserMetrics};
//!
//! struct MyParser {
//!     config: ParserConfig,
//! }
//!
//! impl DocParser for MyParser {
//!     fn language(&self) -> &str {
//!         "myhdl"
//!     }
//!
//!     fn file_extensions(&self) -> &[&str] {
//!         &[".my"]
//!     }
//!
//!     fn parse_source(&self, source: &str) -> Vec<Module> {
//!         // Implementation here
//!         todo!()
//!     }
//!
//!     fn config(&self) -> &ParserConfig {
//!         &self.config
//!     }
//!
//!     fn metrics(&self) -> ParserMetrics {
//!         ParserMetrics::default()
//!     }
//!
//!     fn reset_metrics(&mut self) {}
//! }
//! ```

pub mod config;
pub mod entities;
pub mod errors;
pub mod metrics;
pub mod traits;


// Re-export commonly used types
pub use config::ParserConfig;
pub use entities::{is_array_type, Documentable, Module, ObjectKind, Parameter, PortMode};
pub use errors::{ParserError, ParserResult};
pub use metrics::ParserMetrics;
pub use traits::{DocParser, FileInfo, ProjectInfo};
