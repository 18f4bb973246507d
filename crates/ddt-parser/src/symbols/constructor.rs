use serde::{Deserialize, Serialize};

use super::{Modifiers, parameter_list};
use crate::error::ParserError;
use crate::extract::{remove_attributes, remove_symbol_keywords};
use crate::parameter::Parameter;
use crate::type_expr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl Constructor {
    /// Assemble a constructor from its `keywords Name` prefix and parameter text.
    ///
    /// # Errors
    /// Returns [`ParserError::ParameterShape`] for a malformed parameter.
    pub fn from_parts(prefix: &str, parameters: Option<&str>) -> Result<Self, ParserError> {
        let (text, attributes) = remove_attributes(prefix.trim());
        let (text, keywords) = remove_symbol_keywords(&text);

        let parameters = match parameters {
            Some(parameters) => Parameter::parse_list(parameters)?,
            None => Vec::new(),
        };

        Ok(Self {
            name: type_expr::parse(&text).name,
            keywords,
            attributes,
            parameters,
        })
    }

    /// Public parameterless constructor used when a class declares none.
    #[must_use]
    pub fn create_default(class_name: &str) -> Self {
        Self {
            name: class_name.to_string(),
            keywords: Some(vec!["public".to_string()]),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    #[must_use]
    pub fn definition(&self) -> String {
        format!(
            "{} {}({})",
            self.keywords().join(" "),
            self.name,
            parameter_list(&self.parameters)
        )
        .trim()
        .to_string()
    }
}

impl Modifiers for Constructor {
    fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }
}
