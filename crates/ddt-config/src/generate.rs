//! Test generation settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the generator treats the nullable marker of parameter and return types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NullabilityMode {
    /// Leave types as declared.
    #[default]
    None,
    /// Remove `?` from non-exempt types.
    Strip,
    /// Mark non-exempt types `?`.
    Add,
}

fn default_indentation() -> String {
    String::from("    ")
}

const fn default_true() -> bool {
    true
}

fn default_namespace() -> String {
    String::from("DevelopmentDrivenTesting")
}

fn default_prefix() -> String {
    String::from("Ddt")
}

fn default_usings_file_name() -> String {
    String::from("Usings.cs")
}

fn default_usings_file_content() -> String {
    String::from("global using Xunit;\n")
}

fn default_warnings_to_disable() -> Vec<String> {
    to_strings(&["CS8632", "IDE0018", "IDE0059", "IDE0090", "xUnit1024"])
}

fn default_reserved_method_names() -> Vec<String> {
    to_strings(&[
        "Equals",
        "GetHashCode",
        "GetType",
        "MemberwiseClone",
        "ToString",
    ])
}

/// Value types (and `void`) that never take a nullable marker.
fn default_nullability_exempt_types() -> Vec<String> {
    to_strings(&[
        "bool",
        "Boolean",
        "byte",
        "Byte",
        "char",
        "Char",
        "decimal",
        "Decimal",
        "double",
        "Double",
        "float",
        "int",
        "Int16",
        "Int32",
        "Int64",
        "IntPtr",
        "long",
        "nint",
        "nuint",
        "sbyte",
        "SByte",
        "short",
        "Single",
        "System.Boolean",
        "System.Byte",
        "System.Char",
        "System.Decimal",
        "System.Double",
        "System.Int16",
        "System.Int32",
        "System.Int64",
        "System.IntPtr",
        "System.SByte",
        "System.Single",
        "System.UInt16",
        "System.UInt32",
        "System.UInt64",
        "System.UIntPtr",
        "uint",
        "UInt16",
        "UInt32",
        "UInt64",
        "UIntPtr",
        "ulong",
        "ushort",
        "void",
    ])
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateSettings {
    /// One indentation level of generated code.
    #[serde(default = "default_indentation")]
    pub indentation: String,

    /// Replace generic type parameters with `object`.
    #[serde(default = "default_true")]
    pub erase_generic_parameters: bool,

    #[serde(default)]
    pub nullability: NullabilityMode,

    #[serde(default = "default_nullability_exempt_types")]
    pub nullability_exempt_types: Vec<String>,

    /// Method names that need the `new` modifier on a test method.
    #[serde(default = "default_reserved_method_names")]
    pub reserved_method_names: Vec<String>,

    /// Prefix for a test class appended to an already existing file.
    #[serde(default = "default_prefix")]
    pub test_class_name_prefix_if_file_exists: String,

    /// Namespace of generated classes when none can be derived.
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Wrap test classes in `#nullable disable` / `#pragma warning disable`.
    #[serde(default)]
    pub disable_compiler_warnings: bool,

    #[serde(default = "default_warnings_to_disable")]
    pub warnings_to_disable: Vec<String>,

    /// Emit `new(...)` instead of `new Type(...)`.
    #[serde(default)]
    pub use_only_new_operator: bool,

    #[serde(default = "default_usings_file_name")]
    pub usings_file_name: String,

    #[serde(default = "default_usings_file_content")]
    pub usings_file_content: String,

    /// Overrides the namespace of generated classes (usually the test
    /// project's root namespace).
    #[serde(default)]
    pub target_project_namespace: Option<String>,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            indentation: default_indentation(),
            erase_generic_parameters: true,
            nullability: NullabilityMode::None,
            nullability_exempt_types: default_nullability_exempt_types(),
            reserved_method_names: default_reserved_method_names(),
            test_class_name_prefix_if_file_exists: default_prefix(),
            default_namespace: default_namespace(),
            disable_compiler_warnings: false,
            warnings_to_disable: default_warnings_to_disable(),
            use_only_new_operator: false,
            usings_file_name: default_usings_file_name(),
            usings_file_content: default_usings_file_content(),
            target_project_namespace: None,
        }
    }
}

impl GenerateSettings {
    /// Indentation for the given nesting level.
    #[must_use]
    pub fn indent(&self, level: usize) -> String {
        self.indentation.repeat(level)
    }

    #[must_use]
    pub fn is_reserved_method_name(&self, name: &str) -> bool {
        self.reserved_method_names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn is_nullability_exempt(&self, type_name: &str) -> bool {
        self.nullability_exempt_types.iter().any(|t| t == type_name)
    }

    /// Reject values that would produce broken C#.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for non-whitespace indentation,
    /// an empty default namespace or a class name prefix that is not an
    /// identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.indentation.chars().all(char::is_whitespace) {
            return Err(invalid(
                "generate.indentation",
                "must contain only whitespace",
            ));
        }
        if self.default_namespace.trim().is_empty() {
            return Err(invalid("generate.default_namespace", "must not be empty"));
        }
        let prefix = &self.test_class_name_prefix_if_file_exists;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(invalid(
                "generate.test_class_name_prefix_if_file_exists",
                "must be a non-empty identifier",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
