use super::object::{Documentable, ObjectKind};
use super::parameter::Parameter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A documented HDL module
///
/// Section maps are keyed by the number of items of that category that had
/// been declared when the section marker was seen, so a section starting at
/// key `2` begins with the third port (or parameter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Module name
    pub name: String,

    /// Always `ObjectKind::Module`
    pub kind: ObjectKind,

    /// Parameters in declaration order
    pub generics: Vec<Parameter>,

    /// Ports in first-occurrence order
    pub ports: Vec<Parameter>,

    /// Parameter count at marker -> section title
    pub param_sections: BTreeMap<usize, String>,

    /// Port count at marker -> section title
    pub port_sections: BTreeMap<usize, String>,

    /// Module-level description lines
    ///
    /// Collected from metacomments inside the parameter or port list that
    /// come before the first declared item. A metacomment directly after
    /// `module m (` or `module m #(`, before any `parameter` or port
    /// keyword, is not seen and never lands here.
    pub description: Vec<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ObjectKind::Module,
            generics: Vec::new(),
            ports: Vec::new(),
            param_sections: BTreeMap::new(),
            port_sections: BTreeMap::new(),
            description: Vec::new(),
        }
    }

    pub fn with_generics(mut self, generics: Vec<Parameter>) -> Self {
        self.generics = generics;
        self
    }

    pub fn with_ports(mut self, ports: Vec<Parameter>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_param_sections(mut self, sections: BTreeMap<usize, String>) -> Self {
        self.param_sections = sections;
        self
    }

    pub fn with_port_sections(mut self, sections: BTreeMap<usize, String>) -> Self {
        self.port_sections = sections;
        self
    }

    pub fn with_description(mut self, lines: Vec<String>) -> Self {
        self.description = lines;
        self
    }

    /// Look up a port by name
    pub fn port(&self, name: &str) -> Option<&Parameter> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Look up a parameter by name (first declaration wins)
    pub fn generic(&self, name: &str) -> Option<&Parameter> {
        self.generics.iter().find(|p| p.name == name)
    }

    /// Title of the section the port at `index` falls into, if any
    pub fn port_section_at(&self, index: usize) -> Option<&str> {
        section_at(&self.port_sections, index)
    }

    /// Title of the section the parameter at `index` falls into, if any
    pub fn param_section_at(&self, index: usize) -> Option<&str> {
        section_at(&self.param_sections, index)
    }
}

fn section_at(sections: &BTreeMap<usize, String>, index: usize) -> Option<&str> {
    sections
        .range(..=index)
        .next_back()
        .map(|(_, title)| title.as_str())
}

impl Documentable for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn description(&self) -> &[String] {
        &self.description
    }
}
