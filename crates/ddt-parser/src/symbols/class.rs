use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Constructor, Method, Modifiers, generic_display};
use crate::error::ParserError;
use crate::extract::{remove_attributes, remove_constraints, remove_symbol_keywords};
use crate::scan::{find_top_level, split_top_level};
use crate::type_expr::{self, TypeExpr};

/// The declaration keyword(s) of a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructureType {
    #[default]
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "struct")]
    Struct,
    #[serde(rename = "record")]
    Record,
    #[serde(rename = "record class")]
    RecordClass,
    #[serde(rename = "record struct")]
    RecordStruct,
    #[serde(rename = "readonly struct")]
    ReadonlyStruct,
    #[serde(rename = "readonly record struct")]
    ReadonlyRecordStruct,
    #[serde(rename = "ref struct")]
    RefStruct,
    #[serde(rename = "readonly ref struct")]
    ReadonlyRefStruct,
}

impl StructureType {
    /// Longest keyword sequences first so `record struct` wins over `record`.
    const MATCH_ORDER: [Self; 11] = [
        Self::ReadonlyRecordStruct,
        Self::ReadonlyRefStruct,
        Self::ReadonlyStruct,
        Self::RecordStruct,
        Self::RecordClass,
        Self::RefStruct,
        Self::Interface,
        Self::Record,
        Self::Struct,
        Self::Class,
        Self::Enum,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Record => "record",
            Self::RecordClass => "record class",
            Self::RecordStruct => "record struct",
            Self::ReadonlyStruct => "readonly struct",
            Self::ReadonlyRecordStruct => "readonly record struct",
            Self::RefStruct => "ref struct",
            Self::ReadonlyRefStruct => "readonly ref struct",
        }
    }

    /// Split a leading structure type (followed by a space) off `text`.
    #[must_use]
    pub fn strip_prefix(text: &str) -> Option<(Self, &str)> {
        Self::MATCH_ORDER.into_iter().find_map(|structure| {
            text.strip_prefix(structure.as_str())
                .and_then(|rest| rest.strip_prefix(' '))
                .map(|rest| (structure, rest.trim()))
        })
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class, struct, interface, enum or record declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    /// Name of the enclosing namespace; the namespace owns the class, not
    /// the other way round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<Class>,
    /// Raw `where` clauses, `None` when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Constructor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usings: Vec<String>,
    #[serde(default)]
    pub structure_type: StructureType,
}

impl Class {
    /// Assemble a class from its declaration text, e.g.
    /// `public sealed class Cache<TKey> : ICache<TKey> where TKey : notnull`.
    ///
    /// Members, namespace and usings are attached by the caller.
    ///
    /// # Errors
    /// Returns [`ParserError::StructureTypeNotFound`] when no structure type
    /// keyword follows the modifiers.
    pub fn from_definition(definition: &str) -> Result<Self, ParserError> {
        let (text, attributes) = remove_attributes(definition.trim());
        let (text, keywords) = remove_symbol_keywords(&text);

        let Some((structure_type, text)) = StructureType::strip_prefix(&text) else {
            return Err(ParserError::StructureTypeNotFound {
                text: definition.trim().to_string(),
            });
        };

        let (mut text, mut implements_text) = remove_implements(text);
        let constraints = match implements_text.take() {
            Some(implements) => {
                let (implements, constraints) = remove_constraints(&implements);
                implements_text = Some(implements);
                constraints
            }
            None => {
                let (rest, constraints) = remove_constraints(&text);
                text = rest;
                constraints
            }
        };

        let implements = implements_text
            .filter(|t| !t.is_empty())
            .map(|t| {
                split_top_level(&t, ',')
                    .iter()
                    .map(|i| Self::from_type(type_expr::parse(i)))
                    .collect()
            })
            .unwrap_or_default();

        let ty = type_expr::parse(&text);
        debug!(name = %ty.name, structure = %structure_type, "assembled class");

        Ok(Self {
            name: ty.name,
            generics: ty.generic_arguments,
            keywords,
            attributes,
            constraints,
            implements,
            structure_type,
            ..Self::default()
        })
    }

    /// Name-and-generics-only class for a referenced base type or interface.
    #[must_use]
    pub fn from_type(ty: TypeExpr) -> Self {
        Self {
            name: ty.name,
            generics: ty.generic_arguments,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_generics(&self) -> bool {
        !self.generics.is_empty()
    }

    /// `keywords structure Name<T> : Base, IFace`.
    #[must_use]
    pub fn definition(&self) -> String {
        let mut value = format!("{} {} {self}", self.keywords().join(" "), self.structure_type);
        if !self.implements.is_empty() {
            let implements = self
                .implements
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            value.push_str(" : ");
            value.push_str(&implements);
        }
        value.trim().to_string()
    }
}

impl Modifiers for Class {
    fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&generic_display(&self.name, &self.generics))
    }
}

/// Split the base list off at the first top-level `:` that precedes any
/// `where` clause (constraint clauses use `:` too).
fn remove_implements(text: &str) -> (String, Option<String>) {
    let where_at = text.find(" where ").unwrap_or(text.len());
    match find_top_level(text, ':').filter(|&colon| colon < where_at) {
        Some(colon) => (
            text[..colon].trim().to_string(),
            Some(text[colon + 1..].trim().to_string()),
        ),
        None => (text.trim().to_string(), None),
    }
}
