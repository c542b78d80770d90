//! Verilog documentation extractor for hdldoc
//!
//! Pulls module names, port and parameter declarations, and description
//! comments out of Verilog source without a full semantic front end. Text is
//! scanned by a small state machine over a regex rule table and the
//! resulting events are folded into [`Module`] records.
//!
//! Two comment forms carry documentation:
//!
//! - `//# text` or `///< text` is a metacomment. It describes the most
//!   recently declared port or parameter, or the module if none was declared.
//! - `//# {{Title}}` is a section marker that starts a named group of ports
//!   and/or parameters.
//!
//! Malformed input is never an error; it just yields fewer records.
//!
//! Supported file extensions: `.v`, `.vlog`

mod extractor;
mod grammar;
mod interpreter;
mod lexer;
mod parser_impl;

pub use extractor::{FsReader, SourceReader, VerilogExtractor};
pub use grammar::{verilog_lexer, VerilogAction, VerilogState};
pub use interpreter::Interpreter;
pub use lexer::{Anchor, LexerError, LexerTable, RuleSpec, Token, Tokens, Transition};
pub use parser_impl::{VerilogParser, VERILOG_EXTENSIONS};

pub use hdldoc_parser_api::{
    DocParser, Module, ObjectKind, Parameter, ParserError, ParserResult, PortMode,
};

use std::fs;
use std::path::Path;

/// Parse an in-memory Verilog buffer
///
/// Returns every module whose `endmodule` was seen, in source order.
pub fn parse_source(text: &str) -> Vec<Module> {
    Interpreter::interpret(verilog_lexer().run(text), true)
}

/// Read a file as UTF-8 and parse it
pub fn parse_file(path: impl AsRef<Path>) -> ParserResult<Vec<Module>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| ParserError::IoError(path.to_path_buf(), e))?;
    Ok(parse_source(&text))
}

/// True when the file extension marks a Verilog source
pub fn is_verilog_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = format!(".{}", ext.to_lowercase());
            VERILOG_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
