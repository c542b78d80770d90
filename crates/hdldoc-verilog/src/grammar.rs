//! Verilog declaration grammar for the tokenizer
//!
//! Only the syntax needed for documentation is described here: module
//! headers, parameter lists, port declarations, and comments. Keywords come
//! from closed sets; anything else fails every rule and is skipped one
//! character at a time.

use crate::lexer::{Anchor, LexerTable, RuleSpec, Transition};
use std::sync::LazyLock;

/// Tokenizer states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerilogState {
    Root,
    Module,
    Parameters,
    ModulePort,
    BlockComment,
}

/// Events reported to the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerilogAction {
    /// `(name)`
    Module,
    /// `(text)`
    Metacomment,
    /// `(type?, range?)`
    ParameterStart,
    /// `(name, default)`
    ParamItem,
    /// `(direction, net_type?, signed?, range?)`
    ModulePortStart,
    /// `(name)`
    PortParam,
    /// `(title)`, applies to parameters and ports
    SectionAll,
    /// `(title)`
    SectionParam,
    /// `(title)`
    SectionPort,
    EndModule,
    EndComment,
}

// Building blocks, kept as macros so they can be spliced with `concat!`
macro_rules! metacomment {
    () => {
        r"//(?:/<|#+)\s+(.*)\n"
    };
}

macro_rules! section_meta {
    () => {
        r"//#\s*\{\{(.*)\}\}\r?\n"
    };
}

macro_rules! parameter {
    () => {
        r"parameter\s+(?:(signed|integer|realtime|real|time|logic)\s+)?(\[[^\]]+\])?"
    };
}

macro_rules! port {
    () => {
        r"(input|inout|output)\s+(?:var\s+)?(?:(reg|supply0|supply1|tri|triand|trior|tri0|tri1|wire|wand|wor|logic)\s+)?"
    };
}

const BLOCK_COMMENT_OPEN: &str = r"/\*";
const LINE_COMMENT: &str = r"//.*\n";

use VerilogAction as Act;
use VerilogState as St;

const ROOT: &[RuleSpec<St, Act>] = &[
    RuleSpec::new(r"module\b\s*(\w+)\s*", Some(Act::Module), Transition::Push(St::Module))
        .anchored(Anchor::WordStart),
    RuleSpec::new(BLOCK_COMMENT_OPEN, None, Transition::Push(St::BlockComment)),
    RuleSpec::new(metacomment!(), Some(Act::Metacomment), Transition::Stay),
    RuleSpec::new(LINE_COMMENT, None, Transition::Stay),
];

const MODULE: &[RuleSpec<St, Act>] = &[
    RuleSpec::new(
        parameter!(),
        Some(Act::ParameterStart),
        Transition::Push(St::Parameters),
    )
    .anchored(Anchor::WordStart),
    RuleSpec::new(
        concat!(r"[\(\s]*", port!(), r"(?:(signed)\s+)?((\[[^\]]+\])+)?"),
        Some(Act::ModulePortStart),
        Transition::Push(St::ModulePort),
    )
    .anchored(Anchor::LineStart),
    RuleSpec::new(r"endmodule", Some(Act::EndModule), Transition::Pop).anchored(Anchor::WordStart),
    RuleSpec::new(BLOCK_COMMENT_OPEN, None, Transition::Push(St::BlockComment)),
    RuleSpec::new(section_meta!(), Some(Act::SectionAll), Transition::Stay),
    RuleSpec::new(LINE_COMMENT, None, Transition::Stay),
];

const PARAMETERS: &[RuleSpec<St, Act>] = &[
    RuleSpec::new(
        concat!(r"\s*", parameter!()),
        Some(Act::ParameterStart),
        Transition::Stay,
    ),
    // The default runs up to a comma, a closing delimiter or a `//` comment
    RuleSpec::new(
        r"\s*(\w+)\s*=\s*((?:[^/,);\r\n]|/[^/,);\r\n])+)",
        Some(Act::ParamItem),
        Transition::Stay,
    ),
    RuleSpec::new(section_meta!(), Some(Act::SectionParam), Transition::Stay),
    RuleSpec::new(metacomment!(), Some(Act::Metacomment), Transition::Stay),
    RuleSpec::new(r",", None, Transition::Stay),
    RuleSpec::new(LINE_COMMENT, None, Transition::Stay),
    RuleSpec::new(r"[);]", None, Transition::Pop),
];

const MODULE_PORT: &[RuleSpec<St, Act>] = &[
    RuleSpec::new(
        concat!(r"\s*", port!(), r"(signed)?\s*((\[[^\]]+\])+)?"),
        Some(Act::ModulePortStart),
        Transition::Stay,
    ),
    RuleSpec::new(r"\s*(\w+)\s*,?", Some(Act::PortParam), Transition::Stay),
    RuleSpec::new(BLOCK_COMMENT_OPEN, None, Transition::Push(St::BlockComment)),
    RuleSpec::new(r"[);]", None, Transition::Pop),
    RuleSpec::new(section_meta!(), Some(Act::SectionPort), Transition::Stay),
    RuleSpec::new(metacomment!(), Some(Act::Metacomment), Transition::Stay),
    RuleSpec::new(LINE_COMMENT, None, Transition::Stay),
];

const BLOCK_COMMENT: &[RuleSpec<St, Act>] =
    &[RuleSpec::new(r"\*/", Some(Act::EndComment), Transition::Pop)];

static VERILOG_LEXER: LazyLock<LexerTable<St, Act>> = LazyLock::new(|| {
    LexerTable::compile(
        St::Root,
        &[
            (St::Root, ROOT),
            (St::Module, MODULE),
            (St::Parameters, PARAMETERS),
            (St::ModulePort, MODULE_PORT),
            (St::BlockComment, BLOCK_COMMENT),
        ],
    )
    .expect("built-in Verilog grammar must compile")
});

/// The compiled Verilog rule table, built on first use
pub fn verilog_lexer() -> &'static LexerTable<VerilogState, VerilogAction> {
    &VERILOG_LEXER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(text: &str) -> Vec<(Act, Vec<Option<&str>>)> {
        verilog_lexer()
            .run(text)
            .filter_map(|t| t.action.map(|a| (a, t.groups)))
            .collect()
    }

    fn actions(text: &str) -> Vec<Act> {
        events(text).into_iter().map(|(a, _)| a).collect()
    }

    #[test]
    fn test_grammar_compiles() {
        let _ = verilog_lexer();
    }

    #[test]
    fn test_module_open_and_close() {
        let evs = events("module foo;\nendmodule\n");
        assert_eq!(evs.len(), 2);
        assert_eq!(evs[0], (Act::Module, vec![Some("foo")]));
        assert_eq!(evs[1].0, Act::EndModule);
    }

    #[test]
    fn test_module_keyword_needs_word_boundary() {
        assert!(actions("submodule foo;\n").is_empty());
        assert!(actions("module_inst u0;\n").is_empty());
    }

    #[test]
    fn test_port_opener_groups() {
        let evs = events("module m\n  output reg signed [7:0] q\n);\nendmodule\n");
        assert_eq!(
            evs[1],
            (
                Act::ModulePortStart,
                vec![Some("output"), Some("reg"), Some("signed"), Some("[7:0]"), Some("[7:0]")]
            )
        );
        assert_eq!(evs[2], (Act::PortParam, vec![Some("q")]));
    }

    #[test]
    fn test_port_opener_requires_line_start_in_module_state() {
        // Ports on the module line itself are not recognised
        let acts = actions("module m(input a);\nendmodule\n");
        assert_eq!(acts, vec![Act::Module, Act::EndModule]);
    }

    #[test]
    fn test_triand_is_not_split() {
        let evs = events("module m\n  input triand t\n);\nendmodule\n");
        assert_eq!(evs[1].1[1], Some("triand"));
    }

    #[test]
    fn test_parameter_list() {
        let evs = events("module m #(\n  parameter integer N = 4, M = 8\n);\nendmodule\n");
        assert_eq!(evs[1], (Act::ParameterStart, vec![Some("integer"), None]));
        assert_eq!(evs[2], (Act::ParamItem, vec![Some("N"), Some("4")]));
        assert_eq!(evs[3], (Act::ParamItem, vec![Some("M"), Some("8")]));
        assert_eq!(evs[4].0, Act::EndModule);
    }

    #[test]
    fn test_parameter_default_stops_at_comment_and_semicolon() {
        let evs = events("module m;\nparameter W = 8 / 2; // width\nendmodule\n");
        assert_eq!(evs[2], (Act::ParamItem, vec![Some("W"), Some("8 / 2")]));

        let evs = events("module m #(\n  parameter W = 3 // bits\n) ();\nendmodule\n");
        assert_eq!(evs[2], (Act::ParamItem, vec![Some("W"), Some("3 ")]));
    }

    #[test]
    fn test_parameter_default_keeps_expression_text() {
        let evs = events("module m #(\n  parameter [7:0] INIT = 8'hFF\n);\nendmodule\n");
        assert_eq!(evs[1], (Act::ParameterStart, vec![None, Some("[7:0]")]));
        assert_eq!(evs[2], (Act::ParamItem, vec![Some("INIT"), Some("8'hFF")]));
    }

    #[test]
    fn test_block_comment_hides_declarations() {
        let text = "module m\n/* input x,\n   //# not a metacomment\n*/\n  input a\n);\nendmodule\n";
        let acts = actions(text);
        assert_eq!(
            acts,
            vec![
                Act::Module,
                Act::EndComment,
                Act::ModulePortStart,
                Act::PortParam,
                Act::EndModule
            ]
        );
    }

    #[test]
    fn test_metacomment_and_section_markers() {
        let text = "//# Top level\nmodule m\n//# {{Clocks}}\n  input clk, //# Main clock\n  //# {{Data}}\n  input d\n);\nendmodule\n";
        let evs = events(text);
        assert_eq!(evs[0], (Act::Metacomment, vec![Some("Top level")]));
        assert_eq!(evs[2], (Act::SectionAll, vec![Some("Clocks")]));
        assert_eq!(evs[5], (Act::Metacomment, vec![Some("Main clock")]));
        assert_eq!(evs[6], (Act::SectionPort, vec![Some("Data")]));
    }

    #[test]
    fn test_doxygen_style_metacomment() {
        let evs = events("///< Trailing doc\n");
        assert_eq!(evs, vec![(Act::Metacomment, vec![Some("Trailing doc")])]);
    }

    #[test]
    fn test_plain_comments_are_silent() {
        assert!(actions("// module hidden;\n// endmodule\n").is_empty());
    }

    #[test]
    fn test_crlf_section_marker() {
        let evs = events("module m\r\n//# {{Group}}\r\nendmodule\r\n");
        assert_eq!(evs[1], (Act::SectionAll, vec![Some("Group")]));
    }
}
