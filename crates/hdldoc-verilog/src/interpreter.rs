//! Folds the Verilog token stream into module records
//!
//! Declaration qualifiers are sticky: a port direction, net type or range
//! (and a parameter type or range) stays in force for every bare item that
//! follows until another opener replaces it. Metacomments attach to the most
//! recently declared port or parameter, or to the module when nothing has
//! been declared yet.

use hdldoc_parser_api::{Module, Parameter, PortMode};
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::mem;

use crate::grammar::VerilogAction;
use crate::lexer::Token;

/// Where the next metacomment goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastItem {
    None,
    Module,
    Generic(usize),
    Port(usize),
}

/// Accumulates one buffer's worth of modules
#[derive(Debug)]
pub struct Interpreter {
    include_docs: bool,

    name: Option<String>,

    port_mode: PortMode,
    port_type: String,
    port_signed: bool,
    port_size: Option<String>,

    param_type: String,
    param_size: Option<String>,

    generics: Vec<Parameter>,
    ports: IndexMap<String, Parameter>,
    port_count: usize,
    param_sections: Vec<(usize, String)>,
    port_sections: Vec<(usize, String)>,
    description: Vec<String>,
    last_item: LastItem,

    modules: Vec<Module>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Interpreter {
    pub fn new(include_docs: bool) -> Self {
        Self {
            include_docs,
            name: None,
            port_mode: PortMode::Input,
            port_type: "wire".to_string(),
            port_signed: false,
            port_size: None,
            param_type: String::new(),
            param_size: None,
            generics: Vec::new(),
            ports: IndexMap::new(),
            port_count: 0,
            param_sections: Vec::new(),
            port_sections: Vec::new(),
            description: Vec::new(),
            last_item: LastItem::None,
            modules: Vec::new(),
        }
    }

    /// Run a whole token stream and return the completed modules
    pub fn interpret<'t, I>(tokens: I, include_docs: bool) -> Vec<Module>
    where
        I: IntoIterator<Item = Token<'t, VerilogAction>>,
    {
        let mut interpreter = Self::new(include_docs);
        for token in tokens {
            interpreter.feed(&token);
        }
        interpreter.finish()
    }

    /// Apply one token
    pub fn feed(&mut self, token: &Token<'_, VerilogAction>) {
        let Some(action) = token.action else {
            return;
        };

        match action {
            VerilogAction::Module => self.open_module(token.group(0).unwrap_or_default()),

            VerilogAction::ParameterStart => {
                if let Some(data_type) = token.group(0) {
                    self.param_type = data_type.to_string();
                }
                if let Some(range) = token.group(1) {
                    self.param_size = Some(range.to_string());
                }
            }

            VerilogAction::ParamItem => {
                let Some(name) = token.group(0) else {
                    return;
                };
                let mut param = Parameter::new(name, PortMode::Param, self.param_type.clone());
                param.data_size = self.param_size.clone();
                param.default_value = token.group(1).map(str::to_string);

                self.generics.push(param);
                self.last_item = LastItem::Generic(self.generics.len() - 1);
            }

            VerilogAction::ModulePortStart => {
                if let Some(mode) = token.group(0).and_then(PortMode::from_keyword) {
                    self.port_mode = mode;
                }
                if let Some(net_type) = token.group(1) {
                    self.port_type = net_type.to_string();
                }
                self.port_signed = token.group(2).is_some();
                if let Some(range) = token.group(3) {
                    self.port_size = Some(range.to_string());
                }
            }

            VerilogAction::PortParam => {
                let Some(name) = token.group(0) else {
                    return;
                };
                let data_type = if self.port_signed {
                    format!("{} signed", self.port_type)
                } else {
                    self.port_type.clone()
                };
                let mut port = Parameter::new(name, self.port_mode, data_type);
                port.data_size = self.port_size.clone();
                self.port_count += 1;

                // Re-declaration replaces the entry in place
                let (index, previous) = self.ports.insert_full(name.to_string(), port);
                if previous.is_some() {
                    trace!("port {name} re-declared");
                }
                self.last_item = LastItem::Port(index);
            }

            VerilogAction::Metacomment => {
                if self.include_docs {
                    let text = token.group(0).unwrap_or_default().trim().to_string();
                    self.attach_description(text);
                }
            }

            VerilogAction::SectionAll => {
                let title = token.group(0).unwrap_or_default().to_string();
                self.param_sections.push((self.generics.len(), title.clone()));
                self.port_sections.push((self.port_count, title));
            }

            VerilogAction::SectionParam => {
                let title = token.group(0).unwrap_or_default().to_string();
                self.param_sections.push((self.generics.len(), title));
            }

            VerilogAction::SectionPort => {
                let title = token.group(0).unwrap_or_default().to_string();
                self.port_sections.push((self.port_count, title));
            }

            VerilogAction::EndModule => self.close_module(),

            VerilogAction::EndComment => {}
        }
    }

    /// Completed modules; a module still open at this point is dropped
    pub fn finish(self) -> Vec<Module> {
        if let Some(name) = &self.name {
            debug!("discarding unterminated module {name}");
        }
        self.modules
    }

    fn open_module(&mut self, name: &str) {
        debug!("module {name} opened");

        // Pending description text from outside any module is dropped here
        let include_docs = self.include_docs;
        let modules = mem::take(&mut self.modules);
        *self = Self {
            name: Some(name.to_string()),
            last_item: LastItem::Module,
            modules,
            ..Self::new(include_docs)
        };
    }

    fn close_module(&mut self) {
        let Some(name) = self.name.take() else {
            return;
        };

        let module = Module::new(name)
            .with_generics(mem::take(&mut self.generics))
            .with_ports(mem::take(&mut self.ports).into_values().collect())
            .with_param_sections(to_section_map(mem::take(&mut self.param_sections)))
            .with_port_sections(to_section_map(mem::take(&mut self.port_sections)))
            .with_description(mem::take(&mut self.description));

        debug!(
            "module {} closed: {} parameters, {} ports",
            module.name,
            module.generics.len(),
            module.ports.len()
        );

        self.modules.push(module);
        self.last_item = LastItem::None;
    }

    fn attach_description(&mut self, text: String) {
        match self.last_item {
            LastItem::Generic(index) => {
                if let Some(param) = self.generics.get_mut(index) {
                    param.description.push(text);
                }
            }
            LastItem::Port(index) => {
                if let Some((_, port)) = self.ports.get_index_mut(index) {
                    port.description.push(text);
                }
            }
            LastItem::Module | LastItem::None => self.description.push(text),
        }
    }
}

/// Later markers at the same count replace earlier ones
fn to_section_map(markers: Vec<(usize, String)>) -> BTreeMap<usize, String> {
    markers.into_iter().collect()
}
