use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic kind of an extracted documentation object
///
/// Used as the `kind` tag of serialized records and as the type filter
/// when querying an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ObjectKind {
    Module,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Module => "module",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that carries a name, a kind tag and description lines
pub trait Documentable {
    fn name(&self) -> &str;

    fn kind(&self) -> ObjectKind;

    /// Description lines in the order their metacomments were attached
    fn description(&self) -> &[String];
}
