//! Integration tests for hdldoc-verilog

use hdldoc_verilog::{
    is_verilog_file, parse_file, parse_source, DocParser, Module, ObjectKind, Parameter,
    ParserError, ParserResult, PortMode, SourceReader, VerilogExtractor, VerilogParser,
};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UART_TX: &str = r#"
// Plain comments are ignored
/* A block comment mentioning module fake; endmodule */

module uart_tx #(
  parameter integer CLK_HZ = 50_000_000, //# Input clock frequency
                    BAUD = 115200,       //# Line rate
  //# {{Framing}}
  parameter [3:0] DATA_BITS = 8
) (
  //# {{Clock and reset}}
  input wire clk,
  input wire rst_n, //# Active-low reset
  //# {{Data}}
  input wire [7:0] data,
  input wire valid,
  output reg ready,
  output reg tx  //# Serial output
);
  always @(posedge clk) begin
  end
endmodule
"#;

fn uart() -> Module {
    let mut modules = parse_source(UART_TX);
    assert_eq!(modules.len(), 1);
    modules.remove(0)
}

#[test]
fn test_spec_example_module() {
    let modules = parse_source("module foo\n  input wire a,\n  output reg [7:0] b\n);\nendmodule\n");

    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].name, "foo");
    assert_eq!(
        modules[0].ports,
        vec![
            Parameter::new("a", PortMode::Input, "wire"),
            Parameter::new("b", PortMode::Output, "reg").with_size("[7:0]"),
        ]
    );
}

#[test]
fn test_parameters_with_sticky_type() {
    let module = uart();
    let generics = &module.generics;

    assert_eq!(generics.len(), 3);
    assert_eq!(generics[0].name, "CLK_HZ");
    assert_eq!(generics[0].data_type, "integer");
    assert_eq!(generics[0].default_value.as_deref(), Some("50_000_000"));
    assert_eq!(generics[0].description, vec!["Input clock frequency"]);

    assert_eq!(generics[1].name, "BAUD");
    assert_eq!(generics[1].data_type, "integer");
    assert_eq!(generics[1].description, vec!["Line rate"]);

    assert_eq!(generics[2].name, "DATA_BITS");
    assert_eq!(generics[2].data_type, "integer");
    assert_eq!(generics[2].data_size.as_deref(), Some("[3:0]"));
    assert_eq!(generics[2].default_value.as_deref(), Some("8"));
}

#[test]
fn test_ports_and_descriptions() {
    let module = uart();
    let names: Vec<_> = module.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["clk", "rst_n", "data", "valid", "ready", "tx"]);

    let data = module.port("data").unwrap();
    assert_eq!(data.mode, PortMode::Input);
    assert_eq!(data.data_size.as_deref(), Some("[7:0]"));

    let ready = module.port("ready").unwrap();
    assert_eq!(ready.mode, PortMode::Output);
    assert_eq!(ready.data_type, "reg");

    assert_eq!(module.port("rst_n").unwrap().description, vec!["Active-low reset"]);
    assert_eq!(module.port("tx").unwrap().description, vec!["Serial output"]);
    assert!(module.description.is_empty());
}

#[test]
fn test_sections() {
    let module = uart();

    assert_eq!(module.param_sections.get(&2).map(String::as_str), Some("Framing"));
    assert_eq!(module.port_sections.get(&0).map(String::as_str), Some("Clock and reset"));
    assert_eq!(module.port_sections.get(&2).map(String::as_str), Some("Data"));
    assert_eq!(module.port_section_at(1), Some("Clock and reset"));
    assert_eq!(module.port_section_at(5), Some("Data"));
}

#[test]
fn test_module_count_matches_closed_blocks() {
    let text = "module a;\nendmodule\n\nmodule b;\nendmodule\n\nmodule c\n  input x\n);\n";
    let names: Vec<_> = parse_source(text).into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_malformed_input_never_fails() {
    for text in [
        "",
        "endmodule",
        "module",
        "/* never closed module a; endmodule",
        "module m #(parameter",
        ")))(((;;;",
        "module m\n  input [7:0\n",
        "\u{0}\u{ffff}module\u{1F600} x;",
    ] {
        let _ = parse_source(text);
    }
    assert!(parse_source("/* module a; endmodule").is_empty());
}

#[test]
fn test_port_order_survives_redeclaration() {
    let text = "module m(b, a);\n  output b;\n  input a;\n  output reg b;\nendmodule\n";
    let module = &parse_source(text)[0];

    let names: Vec<_> = module.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
    assert_eq!(module.ports[0].data_type, "reg");
}

#[test]
fn test_serialized_record_shape() {
    let module = uart();
    let value = serde_json::to_value(&module).unwrap();

    assert_eq!(value["kind"], "module");
    assert_eq!(value["generics"][0]["mode"], "param");
    assert_eq!(value["generics"][0]["defaultValue"], "50_000_000");
    assert_eq!(value["ports"][2]["dataSize"], "[7:0]");
    assert!(value["ports"][0].get("defaultValue").is_none());
    assert_eq!(value["portSections"]["2"], "Data");
    assert_eq!(value["paramSections"]["2"], "Framing");
}

#[test]
fn test_parameter_rendering() {
    let module = uart();
    assert_eq!(module.generics[0].to_string(), "CLK_HZ : param integer := 50_000_000");
    assert_eq!(module.ports[2].to_string(), "data : input wire[7:0]");
}

#[test]
fn test_parse_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uart_tx.v");
    fs::write(&path, UART_TX).unwrap();

    let modules = parse_file(&path).unwrap();
    assert_eq!(modules, parse_source(UART_TX));
}

#[test]
fn test_parse_file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = parse_file(dir.path().join("missing.v"));
    assert!(matches!(missing, Err(ParserError::IoError(..))));

    let binary = dir.path().join("binary.v");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
    assert!(matches!(parse_file(&binary), Err(ParserError::IoError(..))));
}

#[test]
fn test_is_verilog_file() {
    assert!(is_verilog_file("rtl/top.v"));
    assert!(is_verilog_file("rtl/TOP.V"));
    assert!(is_verilog_file("core.vlog"));
    assert!(!is_verilog_file("core.sv"));
    assert!(!is_verilog_file("core.v.bak"));
    assert!(!is_verilog_file("README"));
}

#[test]
fn test_parser_trait_matches_free_function() {
    let parser = VerilogParser::new();
    assert_eq!(parser.parse_source(UART_TX), parse_source(UART_TX));
}

/// Reads a fixed buffer and counts how often it was asked to
struct CountingReader {
    text: &'static str,
    reads: Cell<usize>,
}

impl SourceReader for CountingReader {
    fn read_source(&self, _path: &Path) -> ParserResult<String> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.text.to_string())
    }
}

#[test]
fn test_extractor_reads_each_path_once() {
    let mut extractor = VerilogExtractor::with_reader(CountingReader {
        text: UART_TX,
        reads: Cell::new(0),
    });

    let first = extractor.extract_objects("uart_tx.v", None).unwrap();
    let second = extractor
        .extract_objects("uart_tx.v", Some(ObjectKind::Module))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(extractor.reader().reads.get(), 1);

    extractor.extract_objects("other.v", None).unwrap();
    assert_eq!(extractor.reader().reads.get(), 2);
}

#[test]
fn test_extractor_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uart_tx.v");
    fs::write(&path, UART_TX).unwrap();

    let mut extractor = VerilogExtractor::new();
    let first = extractor.extract_objects(&path, None).unwrap();

    // The cache does not notice the file changing underneath it
    fs::write(&path, "module other;\nendmodule\n").unwrap();
    let second = extractor.extract_objects(&path, None).unwrap();
    assert_eq!(first, second);

    extractor.invalidate(&path);
    let third = extractor.extract_objects(&path, None).unwrap();
    assert_eq!(third[0].name, "other");
}
