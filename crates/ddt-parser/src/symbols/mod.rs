//! Structured model of C# declarations and the assembly of that model
//! from extracted declaration text.

mod class;
mod constructor;
mod method;
mod namespace;

pub use class::{Class, StructureType};
pub use constructor::Constructor;
pub use method::Method;
pub use namespace::Namespace;

use crate::parameter::Parameter;
use crate::type_expr::TypeExpr;

/// Keyword-derived predicates shared by classes, constructors and methods.
///
/// All of them are plain membership tests on the declared keywords.
pub trait Modifiers {
    fn keywords(&self) -> &[String];

    fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords().iter().any(|k| k == keyword)
    }

    fn is_public(&self) -> bool {
        self.has_keyword("public")
    }

    fn is_static(&self) -> bool {
        self.has_keyword("static")
    }

    fn is_abstract(&self) -> bool {
        self.has_keyword("abstract")
    }

    /// Public, non-static and non-abstract.
    fn is_testable(&self) -> bool {
        self.is_public() && !self.is_static() && !self.is_abstract()
    }
}

/// Borrowed view over any node of the model.
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    Namespace(&'a Namespace),
    Class(&'a Class),
    Constructor(&'a Constructor),
    Method(&'a Method),
    Parameter(&'a Parameter),
}

impl<'a> Symbol<'a> {
    #[must_use]
    pub fn name(&self) -> &'a str {
        match self {
            Self::Namespace(namespace) => &namespace.name,
            Self::Class(class) => &class.name,
            Self::Constructor(constructor) => &constructor.name,
            Self::Method(method) => &method.name,
            Self::Parameter(parameter) => &parameter.name,
        }
    }

    /// Canonical declaration text.
    #[must_use]
    pub fn definition(&self) -> String {
        match self {
            Self::Namespace(namespace) => namespace.definition(),
            Self::Class(class) => class.definition(),
            Self::Constructor(constructor) => constructor.definition(),
            Self::Method(method) => method.definition(),
            Self::Parameter(parameter) => parameter.definition(),
        }
    }

    /// Directly nested symbols, in declaration order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        match self {
            Self::Namespace(namespace) => namespace.classes.iter().map(Symbol::Class).collect(),
            Self::Class(class) => class
                .constructors
                .iter()
                .map(Symbol::Constructor)
                .chain(class.methods.iter().map(Symbol::Method))
                .collect(),
            Self::Constructor(constructor) => {
                constructor.parameters.iter().map(Symbol::Parameter).collect()
            }
            Self::Method(method) => method.parameters.iter().map(Symbol::Parameter).collect(),
            Self::Parameter(_) => Vec::new(),
        }
    }
}

/// `Name` or `Name<A, B>`.
pub(crate) fn generic_display(name: &str, generics: &[TypeExpr]) -> String {
    if generics.is_empty() {
        name.to_string()
    } else {
        format!("{name}<{}>", crate::type_expr::join(generics))
    }
}

pub(crate) fn parameter_list(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
