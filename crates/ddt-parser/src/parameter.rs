//! Method and constructor parameters.

use serde::{Deserialize, Serialize};

use crate::error::ParserError;
use crate::extract::{remove_attributes, remove_keywords};
use crate::scan::{find_top_level, split_top_level};
use crate::type_expr::{self, TypeExpr};

/// Modifiers that may lead a parameter.
pub const PARAMETER_KEYWORDS: &[&str] = &["in", "out", "params", "ref", "this"];

/// Default value expression of an optional parameter, kept as source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterValue(pub String);

impl ParameterValue {
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == "default"
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == "null"
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// `None` when no modifier was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParameterValue>,
}

impl Parameter {
    /// Parse one segment of a parameter list, e.g. `[NotNull] ref int count = 0`.
    ///
    /// # Errors
    /// Returns [`ParserError::ParameterShape`] when the text left after
    /// attributes, modifiers and default value is not exactly `Type name`.
    pub fn parse(segment: &str) -> Result<Self, ParserError> {
        let (text, attributes) = remove_attributes(segment.trim());
        let (text, keywords) = remove_keywords(&text, PARAMETER_KEYWORDS);
        let (text, default_value) = remove_default_value(&text);

        let split = split_top_level(&text, ' ');
        let [ty, name] = split.as_slice() else {
            return Err(ParserError::ParameterShape {
                text: segment.trim().to_string(),
            });
        };

        Ok(Self {
            name: name.clone(),
            keywords,
            ty: type_expr::parse(ty),
            attributes,
            default_value,
        })
    }

    /// Parse a whole parameter list. Blank text yields no parameters.
    ///
    /// # Errors
    /// Propagates the first [`ParserError::ParameterShape`].
    pub fn parse_list(text: &str) -> Result<Vec<Self>, ParserError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        split_top_level(text, ',')
            .iter()
            .map(|segment| Self::parse(segment))
            .collect()
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.default_value.is_some()
    }

    #[must_use]
    pub fn is_out(&self) -> bool {
        self.has_keyword("out")
    }

    #[must_use]
    pub fn is_ref(&self) -> bool {
        self.has_keyword("ref")
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().flatten().any(|k| k == keyword)
    }

    /// Modifier to repeat at a call site: `out `, `ref ` or nothing.
    #[must_use]
    pub fn out_or_ref(&self) -> &'static str {
        if self.is_out() {
            "out "
        } else if self.is_ref() {
            "ref "
        } else {
            ""
        }
    }

    #[must_use]
    pub fn definition(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keywords = self.keywords.as_deref().unwrap_or_default().join(" ");
        let mut text = format!("{keywords} {} {}", self.ty, self.name);
        if let Some(value) = &self.default_value {
            text.push_str(&format!(" = {value}"));
        }
        f.write_str(text.trim())
    }
}

fn remove_default_value(text: &str) -> (String, Option<ParameterValue>) {
    match find_top_level(text, '=') {
        Some(eq) => (
            text[..eq].trim().to_string(),
            Some(ParameterValue(text[eq + 1..].trim().to_string())),
        ),
        None => (text.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_parameter() {
        let p = Parameter::parse("int count").expect("should parse");
        assert_eq!(p.name, "count");
        assert_eq!(p.ty, TypeExpr::named("int"));
        assert!(p.keywords.is_none());
        assert!(p.attributes.is_none());
        assert!(!p.is_optional());
        assert_eq!(p.to_string(), "int count");
    }

    #[test]
    fn generic_parameter_keeps_inner_space() {
        let p = Parameter::parse("Dictionary<string, List<int>> lookup").expect("should parse");
        assert_eq!(p.name, "lookup");
        assert_eq!(p.ty.to_string(), "Dictionary<string, List<int>>");
    }

    #[test]
    fn modifiers_attributes_and_default() {
        let p = Parameter::parse("[CallerMemberName] ref string name = \"a = b\"")
            .expect("should parse");
        assert_eq!(p.attributes, Some(vec!["CallerMemberName".to_string()]));
        assert_eq!(p.keywords, Some(vec!["ref".to_string()]));
        assert_eq!(p.name, "name");
        assert_eq!(
            p.default_value,
            Some(ParameterValue("\"a = b\"".to_string()))
        );
        assert_eq!(p.out_or_ref(), "ref ");
        assert_eq!(p.to_string(), "ref string name = \"a = b\"");
    }

    #[test]
    fn out_and_params_keywords() {
        let out = Parameter::parse("out int result").expect("should parse");
        assert!(out.is_out());
        assert_eq!(out.out_or_ref(), "out ");

        let params = Parameter::parse("params object[] args").expect("should parse");
        assert_eq!(params.keywords, Some(vec!["params".to_string()]));
        assert!(params.ty.is_array());
        assert_eq!(params.out_or_ref(), "");
    }

    #[test]
    fn extension_receiver() {
        let p = Parameter::parse("this IServiceCollection services").expect("should parse");
        assert_eq!(p.keywords, Some(vec!["this".to_string()]));
        assert_eq!(p.ty.name, "IServiceCollection");
    }

    #[test]
    fn default_value_flags() {
        let p = Parameter::parse("CancellationToken token = default").expect("should parse");
        assert!(p.default_value.as_ref().is_some_and(ParameterValue::is_default));

        let p = Parameter::parse("string? label = null").expect("should parse");
        assert!(p.ty.nullable);
        assert!(p.default_value.as_ref().is_some_and(ParameterValue::is_null));
    }

    #[test]
    fn missing_name_is_a_shape_error() {
        let error = Parameter::parse("int").expect_err("should fail");
        assert!(matches!(error, ParserError::ParameterShape { .. }));

        let error = Parameter::parse("int a b").expect_err("should fail");
        assert!(matches!(error, ParserError::ParameterShape { .. }));
    }

    #[test]
    fn verbatim_string_default_does_not_swallow_next_parameter() {
        let params = Parameter::parse_list(r#"string root = @"C:\", int depth = 1"#)
            .expect("should parse");
        assert_eq!(params.len(), 2);
        assert_eq!(
            params[0].default_value,
            Some(ParameterValue(r#"@"C:\""#.to_string()))
        );
        assert_eq!(params[1].name, "depth");
    }

    #[test]
    fn list_parsing() {
        let params = Parameter::parse_list("int a, (int, int) pair, List<string> names")
            .expect("should parse");
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "pair", "names"]);
        assert!(params[1].ty.is_tuple());

        assert!(Parameter::parse_list("   ").expect("blank").is_empty());
    }
}
