//! Print the modules found in Verilog files as JSON
//!
//! Usage: cargo run --example dump_modules -- <file.v>...

use hdldoc_verilog::{is_verilog_file, ObjectKind, VerilogExtractor};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut extractor = VerilogExtractor::new();
    let mut status = ExitCode::SUCCESS;

    for path in env::args().skip(1) {
        if !is_verilog_file(&path) {
            eprintln!("skipping {path}: not a Verilog file");
            continue;
        }

        match extractor.extract_objects(&path, Some(ObjectKind::Module)) {
            Ok(modules) => match serde_json::to_string_pretty(&modules) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{path}: {e}");
                    status = ExitCode::FAILURE;
                }
            },
            Err(e) => {
                eprintln!("{e}");
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}
