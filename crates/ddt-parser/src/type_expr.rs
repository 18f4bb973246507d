//! Type references: `int`, `List<T>`, `Foo<T>?[]?`, `(int, string)`.
//!
//! [`parse`] is a total function. Text that is not a well-formed type still
//! produces a best-effort [`TypeExpr`]; there is no failure signal.

use serde::{Deserialize, Serialize};

use crate::scan::split_top_level;

/// One `[]` suffix of an array type. Each dimension carries its own `?`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayDimension {
    pub nullable: bool,
}

impl ArrayDimension {
    #[must_use]
    pub const fn new(nullable: bool) -> Self {
        Self { nullable }
    }
}

/// A parsed type reference.
///
/// The shape is a plain name, a generic name or a tuple. Array dimensions
/// and the nullable marker layer on top of any shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_arguments: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub array_dimensions: Vec<ArrayDimension>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tuple_components: Vec<TypeExpr>,
}

impl TypeExpr {
    /// A plain named type such as `int` or `T`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A generic type such as `List<int>`.
    pub fn generic(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            generic_arguments: arguments,
            ..Self::default()
        }
    }

    /// A value tuple such as `(int, string)`.
    #[must_use]
    pub fn tuple(components: Vec<Self>) -> Self {
        Self {
            tuple_components: components,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Append one array dimension per entry, outer to inner.
    #[must_use]
    pub fn with_array(mut self, dimensions: &[bool]) -> Self {
        self.array_dimensions
            .extend(dimensions.iter().copied().map(ArrayDimension::new));
        self
    }

    #[must_use]
    pub fn has_generics(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        !self.array_dimensions.is_empty()
    }

    #[must_use]
    pub fn is_tuple(&self) -> bool {
        !self.tuple_components.is_empty()
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_generics() {
            write!(f, "{}<{}>", self.name, join(&self.generic_arguments))?;
        } else if self.is_tuple() {
            write!(f, "({})", join(&self.tuple_components))?;
        } else {
            f.write_str(&self.name)?;
        }

        if self.nullable {
            f.write_str("?")?;
        }

        for dimension in &self.array_dimensions {
            f.write_str(if dimension.nullable { "[]?" } else { "[]" })?;
        }

        Ok(())
    }
}

pub(crate) fn join(types: &[TypeExpr]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse one type reference.
#[must_use]
pub fn parse(text: &str) -> TypeExpr {
    let text = text.trim();

    if let Some(inner) = tuple_interior(text) {
        return TypeExpr::tuple(parse_list(inner));
    }

    let bytes = text.as_bytes();
    let mut ty = TypeExpr::default();
    let mut name: Option<&str> = None;
    let mut depth = 0usize;
    let mut index = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => {
                depth += 1;
                if depth == 1 {
                    name.get_or_insert(text[index..i].trim());
                    index = i + 1;
                }
            }
            b'>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    ty.generic_arguments.extend(parse_list(&text[index..i]));
                    index = i + 1;
                }
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'[' => {
                depth += 1;
                if depth == 1 {
                    if name.is_none() {
                        name = Some(text[index..i].trim());
                        index = i + 1;
                    }

                    if bytes.get(i + 1) == Some(&b']') {
                        depth -= 1;
                        i += 1;
                        let nullable = bytes.get(i + 1) == Some(&b'?');
                        if nullable {
                            i += 1;
                        }
                        ty.array_dimensions.push(ArrayDimension::new(nullable));
                        index = i + 1;
                    }
                }
            }
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    // ranked form such as `[,]`
                    let nullable = bytes.get(i + 1) == Some(&b'?');
                    if nullable {
                        i += 1;
                    }
                    ty.array_dimensions.push(ArrayDimension::new(nullable));
                    index = i + 1;
                }
            }
            b'?' if depth == 0 => {
                name.get_or_insert(text[index..i].trim());
                ty.nullable = true;
                index = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => text.get(index..).unwrap_or_default().trim(),
    };

    if let Some(inner) = tuple_interior(name) {
        ty.tuple_components = parse_list(inner);
    } else {
        ty.name = name.to_string();
    }

    ty
}

/// Parse a comma-separated list of types, e.g. generic arguments.
#[must_use]
pub fn parse_list(text: &str) -> Vec<TypeExpr> {
    split_top_level(text, ',')
        .iter()
        .map(|segment| parse(segment))
        .collect()
}

fn tuple_interior(text: &str) -> Option<&str> {
    text.strip_prefix('(')?.strip_suffix(')')
}
