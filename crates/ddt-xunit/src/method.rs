//! One xUnit `[Fact]` skeleton per testable method.

use std::collections::BTreeSet;

use ddt_config::GenerateSettings;
use ddt_parser::{Class, Constructor, Method, Modifiers, Parameter, TypeExpr};

use crate::generics::{TypeRewriter, collect_generic_parameters};

/// Return type name that marks an asynchronous method.
const TASK_TYPE: &str = "Task";

#[derive(Debug, Clone)]
pub struct TestMethod<'a> {
    class: &'a Class,
    method: &'a Method,
    name_override: Option<String>,
}

impl<'a> TestMethod<'a> {
    #[must_use]
    pub const fn new(class: &'a Class, method: &'a Method) -> Self {
        Self {
            class,
            method,
            name_override: None,
        }
    }

    /// Test for one overload, named `name` instead of the method name.
    #[must_use]
    pub fn with_name(class: &'a Class, method: &'a Method, name: impl Into<String>) -> Self {
        Self {
            class,
            method,
            name_override: Some(name.into()),
        }
    }

    /// Name of the generated test method.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name_override.as_deref().unwrap_or(&self.method.name)
    }

    #[must_use]
    pub const fn method(&self) -> &'a Method {
        self.method
    }

    /// Generic parameter names declared by the class or the method.
    #[must_use]
    pub fn generic_parameters(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        collect_generic_parameters(&self.class.generics, &mut found);
        collect_generic_parameters(&self.method.generics, &mut found);
        found
    }

    /// Render the test method, indented one level.
    #[must_use]
    pub fn generate(&self, settings: &GenerateSettings) -> String {
        let rewriter = TypeRewriter::new(settings, self.generic_parameters());
        let constructor = primary_constructor(self.class);

        let class_type = TypeExpr::generic(
            self.class.name.as_str(),
            rewriter.rewrite_all(&self.class.generics),
        );
        let method_call = TypeExpr::generic(
            self.method.name.as_str(),
            rewriter.rewrite_all(&self.method.generics),
        );
        let return_type = rewriter.rewrite(&self.method.return_type);
        let method_parameters = rewrite_parameters(&rewriter, &self.method.parameters);
        let constructor_parameters = rewrite_parameters(&rewriter, &constructor.parameters);

        let (test_return_type, await_keyword, logical_return_type) =
            if return_type.name == TASK_TYPE {
                let logical = if return_type.has_generics() {
                    join_types(&return_type.generic_arguments)
                } else {
                    "void".to_string()
                };
                ("async Task", "await ", logical)
            } else {
                ("void", "", return_type.to_string())
            };
        let returns_void = logical_return_type == "void";

        let new_modifier = if self.name_override.is_none()
            && settings.is_reserved_method_name(&self.method.name)
        {
            "new "
        } else {
            ""
        };

        let instantiation = if settings.use_only_new_operator {
            "new".to_string()
        } else {
            format!("new {class_type}")
        };
        let instantiate_target = format!(
            "{class_type} target = {instantiation}({});",
            call_arguments("target", &constructor_parameters)
        );

        let actual = if returns_void {
            String::new()
        } else {
            format!("{logical_return_type} actual = ")
        };
        let invoke_target = format!(
            "{actual}{await_keyword}target.{method_call}({});",
            call_arguments("method", &method_parameters)
        );

        let i1 = settings.indent(1);
        let i2 = settings.indent(2);

        let mut text = String::new();
        text.push_str(&format!("{i1}[Fact]\n"));
        text.push_str(&format!(
            "{i1}public {new_modifier}{test_return_type} {}()\n",
            self.name()
        ));
        text.push_str(&format!("{i1}{{\n"));
        text.push_str(&format!("{i2}// arrange\n"));
        if !returns_void {
            text.push_str(&format!("{i2}{logical_return_type} expected = default;\n\n"));
        }
        text.push_str(&argument_lines("method", &method_parameters, &i2));
        text.push_str(&argument_lines("target", &constructor_parameters, &i2));
        text.push_str(&format!("{i2}{instantiate_target}\n\n"));
        text.push_str(&format!("{i2}// act\n"));
        text.push_str(&format!("{i2}{invoke_target}\n\n"));
        text.push_str(&format!("{i2}// assert\n"));
        if !returns_void {
            text.push_str(&format!("{i2}Assert.Equal(expected, actual);\n"));
        }
        text.push_str(&format!("{i1}}}"));
        text
    }
}

/// The testable constructor with the most parameters (first one on a tie),
/// or a public default constructor when the class has none.
#[must_use]
pub fn primary_constructor(class: &Class) -> Constructor {
    class
        .constructors
        .iter()
        .filter(|c| c.is_testable())
        .fold(None::<&Constructor>, |best, c| match best {
            Some(b) if b.parameters.len() >= c.parameters.len() => Some(b),
            _ => Some(c),
        })
        .cloned()
        .unwrap_or_else(|| Constructor::create_default(&class.name))
}

fn rewrite_parameters(rewriter: &TypeRewriter<'_>, parameters: &[Parameter]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|p| Parameter {
            ty: rewriter.rewrite(&p.ty),
            ..p.clone()
        })
        .collect()
}

/// `Type prefix_name = default;` per parameter (no initializer for `out`),
/// followed by a blank line. Empty without parameters.
fn argument_lines(prefix: &str, parameters: &[Parameter], indent: &str) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = parameters
        .iter()
        .map(|p| {
            let initializer = if p.is_out() { "" } else { " = default" };
            format!("{indent}{} {prefix}_{}{initializer};", p.ty, p.name)
        })
        .collect();
    format!("{}\n\n", lines.join("\n"))
}

fn call_arguments(prefix: &str, parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{}{prefix}_{}", p.out_or_ref(), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_types(types: &[TypeExpr]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
