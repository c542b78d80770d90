use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port, or `Param` for module parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    Input,
    Inout,
    Output,
    Param,
}

impl PortMode {
    /// Map a Verilog direction keyword to a mode
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "input" => Some(PortMode::Input),
            "inout" => Some(PortMode::Inout),
            "output" => Some(PortMode::Output),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortMode::Input => "input",
            PortMode::Inout => "inout",
            PortMode::Output => "output",
            PortMode::Param => "param",
        }
    }
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module port or parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Declared identifier
    pub name: String,

    /// Port direction, or `Param` for parameters
    pub mode: PortMode,

    /// Free-form type text, e.g. `wire`, `reg signed`, `integer`
    pub data_type: String,

    /// Raw bracketed range text, e.g. `[7:0]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_size: Option<String>,

    /// Raw default value text (parameters only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Metacomment lines attached to this item
    #[serde(default)]
    pub description: Vec<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, mode: PortMode, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode,
            data_type: data_type.into(),
            data_size: None,
            default_value: None,
            description: Vec::new(),
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.data_size = Some(size.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    pub fn with_description(mut self, lines: Vec<String>) -> Self {
        self.description = lines;
        self
    }

    /// True when the data type text itself carries a bracketed range
    pub fn is_array(&self) -> bool {
        is_array_type(&self.data_type)
    }
}

/// Renders as `name : mode type[size] := default`
impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.mode)?;

        let size = self.data_size.as_deref().unwrap_or("");
        if !self.data_type.is_empty() || !size.is_empty() {
            write!(f, " {}{}", self.data_type, size)?;
        }

        if let Some(default) = &self.default_value {
            write!(f, " := {default}")?;
        }
        Ok(())
    }
}

/// Check if a data type string is an array type
pub fn is_array_type(data_type: &str) -> bool {
    data_type.contains('[')
}
