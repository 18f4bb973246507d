use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Modifiers, generic_display, parameter_list};
use crate::error::ParserError;
use crate::extract::{remove_attributes, remove_constraints, remove_symbol_keywords};
use crate::parameter::Parameter;
use crate::scan::split_top_level;
use crate::type_expr::{self, TypeExpr};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeExpr,
}

impl Method {
    /// Assemble a method from its `keywords ReturnType Name<T>` prefix and
    /// parameter text (which may carry trailing `where` clauses).
    ///
    /// # Errors
    /// Returns [`ParserError::ReturnTypeNotFound`] when the prefix does not
    /// split into a return type and a name, [`ParserError::ParameterShape`]
    /// for a malformed parameter.
    pub fn from_parts(prefix: &str, parameters: Option<&str>) -> Result<Self, ParserError> {
        let (text, attributes) = remove_attributes(prefix.trim());
        let (text, keywords) = remove_symbol_keywords(&text);
        let (text, return_type) = remove_return_type(&text)?;

        let (parameters, constraints) = match parameters {
            Some(parameters) => {
                let (parameters, constraints) = remove_constraints(parameters);
                (Parameter::parse_list(&parameters)?, constraints)
            }
            None => (Vec::new(), None),
        };

        let ty = type_expr::parse(&text);
        debug!(name = %ty.name, parameters = parameters.len(), "assembled method");

        Ok(Self {
            name: ty.name,
            generics: ty.generic_arguments,
            keywords,
            attributes,
            constraints,
            parameters,
            return_type: type_expr::parse(&return_type),
        })
    }

    #[must_use]
    pub fn has_generics(&self) -> bool {
        !self.generics.is_empty()
    }

    #[must_use]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    #[must_use]
    pub fn definition(&self) -> String {
        format!(
            "{} {} {self}({})",
            self.keywords().join(" "),
            self.return_type,
            parameter_list(&self.parameters)
        )
        .trim()
        .to_string()
    }
}

impl Modifiers for Method {
    fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&generic_display(&self.name, &self.generics))
    }
}

/// `Task<int> Run<T>` → (`Run<T>`, `Task<int>`).
fn remove_return_type(text: &str) -> Result<(String, String), ParserError> {
    match split_top_level(text, ' ').as_slice() {
        [return_type, name] => Ok((name.clone(), return_type.clone())),
        _ => Err(ParserError::ReturnTypeNotFound {
            text: text.to_string(),
        }),
    }
}
