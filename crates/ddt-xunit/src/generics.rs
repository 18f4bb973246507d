//! Generic parameter detection and the type rewrites applied before a
//! test skeleton is emitted.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use ddt_config::{GenerateSettings, NullabilityMode};
use ddt_parser::TypeExpr;
use regex::Regex;

/// Placeholder type that replaces erased generic parameters.
pub const ERASED_TYPE: &str = "object";

// T, T1, TKey, TValue1
static GENERIC_PARAMETER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^T(\d+|[A-Z]*?[a-z0-9_]*?)$").expect("generic parameter pattern is valid")
});

/// Whether a type name follows the generic parameter naming convention:
/// a single uppercase letter or `T` followed by digits or a word.
#[must_use]
pub fn is_generic_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    let single_upper = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase());
    single_upper || GENERIC_PARAMETER_NAME.is_match(name)
}

/// Collect generic parameter names from a generic argument list.
///
/// Nested generic arguments are searched recursively; only leaf names are
/// candidates.
pub fn collect_generic_parameters(types: &[TypeExpr], into: &mut BTreeSet<String>) {
    for ty in types {
        if ty.has_generics() {
            collect_generic_parameters(&ty.generic_arguments, into);
        } else if is_generic_parameter_name(&ty.name) {
            into.insert(ty.name.clone());
        }
    }
}

/// Pure rewrite of types for one generated test: erasure of the identified
/// generic parameters, then the nullability policy.
#[derive(Debug)]
pub struct TypeRewriter<'a> {
    erased: BTreeSet<String>,
    nullability: NullabilityMode,
    exempt: &'a [String],
}

impl<'a> TypeRewriter<'a> {
    /// `generic_parameters` is only erased when erasure is enabled.
    #[must_use]
    pub fn new(settings: &'a GenerateSettings, generic_parameters: BTreeSet<String>) -> Self {
        Self {
            erased: if settings.erase_generic_parameters {
                generic_parameters
            } else {
                BTreeSet::new()
            },
            nullability: settings.nullability,
            exempt: &settings.nullability_exempt_types,
        }
    }

    #[must_use]
    pub fn rewrite(&self, ty: &TypeExpr) -> TypeExpr {
        let mut ty = self.erase(ty);

        match self.nullability {
            NullabilityMode::None => {}
            NullabilityMode::Strip => {
                if !self.is_exempt(&ty) {
                    ty.nullable = false;
                }
                for dimension in &mut ty.array_dimensions {
                    dimension.nullable = false;
                }
            }
            NullabilityMode::Add => {
                if !self.is_exempt(&ty) {
                    ty.nullable = true;
                }
                for dimension in &mut ty.array_dimensions {
                    dimension.nullable = true;
                }
            }
        }

        ty
    }

    #[must_use]
    pub fn rewrite_all(&self, types: &[TypeExpr]) -> Vec<TypeExpr> {
        types.iter().map(|ty| self.rewrite(ty)).collect()
    }

    fn erase(&self, ty: &TypeExpr) -> TypeExpr {
        let name = if self.erased.contains(&ty.name) {
            ERASED_TYPE.to_string()
        } else {
            ty.name.clone()
        };

        TypeExpr {
            name,
            generic_arguments: ty.generic_arguments.iter().map(|g| self.erase(g)).collect(),
            tuple_components: ty.tuple_components.iter().map(|t| self.erase(t)).collect(),
            array_dimensions: ty.array_dimensions.clone(),
            nullable: ty.nullable,
        }
    }

    fn is_exempt(&self, ty: &TypeExpr) -> bool {
        self.exempt.iter().any(|t| *t == ty.name)
    }
}
