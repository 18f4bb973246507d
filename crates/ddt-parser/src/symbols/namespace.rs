use serde::{Deserialize, Serialize};

use super::Class;

/// A namespace and the classes declared in it.
///
/// The global namespace has an empty name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<Class>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, classes: Vec<Class>) -> Self {
        Self {
            name: name.into(),
            classes,
        }
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    #[must_use]
    pub fn definition(&self) -> String {
        format!("namespace {}", self.name).trim().to_string()
    }
}
