//! Test class rendering.

use ddt_config::GenerateSettings;
use ddt_parser::{Class, Method, Modifiers};
use tracing::debug;

use crate::method::TestMethod;

/// The xUnit test class generated for one class under test.
#[derive(Debug, Clone)]
pub struct TestClass<'a> {
    class: &'a Class,
    class_name: String,
    file_name: String,
    test_methods: Vec<TestMethod<'a>>,
}

impl<'a> TestClass<'a> {
    /// Collect one test per testable method; overloads are named `Name`,
    /// `Name2`, `Name3`, ... in declaration order.
    #[must_use]
    pub fn new(class: &'a Class) -> Self {
        let class_name = format!("{}Tests", class.name);
        let file_name = format!("{class_name}.cs");

        let mut test_methods = Vec::new();
        for group in group_by_name(class.methods.iter().filter(|m| m.is_testable())) {
            if let [method] = group.as_slice() {
                test_methods.push(TestMethod::new(class, *method));
                continue;
            }
            for (index, method) in group.into_iter().enumerate() {
                test_methods.push(if index == 0 {
                    TestMethod::new(class, method)
                } else {
                    TestMethod::with_name(class, method, format!("{}{}", method.name, index + 1))
                });
            }
        }

        debug!(class = %class.name, tests = test_methods.len(), "collected test methods");
        Self {
            class,
            class_name,
            file_name,
            test_methods,
        }
    }

    /// Same tests under `<prefix><ClassName>Tests`, for appending to a file
    /// that already exists. The file name is unchanged.
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.class_name = format!("{prefix}{}", self.class_name);
        self
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn test_methods(&self) -> &[TestMethod<'a>] {
        &self.test_methods
    }

    /// Namespace of the generated class.
    #[must_use]
    pub fn namespace(&self, settings: &GenerateSettings) -> String {
        settings
            .target_project_namespace
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.class.namespace.as_ref().map(|n| format!("{n}.Tests")))
            .unwrap_or_else(|| settings.default_namespace.clone())
    }

    /// Class usings plus the class's own namespace.
    #[must_use]
    pub fn usings(&self) -> Vec<String> {
        let mut usings = self.class.usings.clone();
        if let Some(namespace) = &self.class.namespace {
            if !usings.contains(namespace) {
                usings.push(namespace.clone());
            }
        }
        usings
    }

    /// Render the test class. Without usings and namespace the text can be
    /// appended to an existing file.
    #[must_use]
    pub fn render(&self, settings: &GenerateSettings, with_usings_and_namespace: bool) -> String {
        let mut text = String::new();

        if with_usings_and_namespace {
            let usings = self.usings();
            if !usings.is_empty() {
                let lines: Vec<String> = usings.iter().map(|u| format!("using {u};")).collect();
                text.push_str(&lines.join("\n"));
                text.push_str("\n\n");
            }
            text.push_str(&format!("namespace {};\n\n", self.namespace(settings)));
        }

        let warnings = settings.warnings_to_disable.join(", ");
        if settings.disable_compiler_warnings {
            text.push_str("#nullable disable\n");
            if !warnings.is_empty() {
                text.push_str(&format!("#pragma warning disable {warnings}\n"));
            }
        }

        let methods: Vec<String> = self
            .test_methods
            .iter()
            .map(|m| m.generate(settings))
            .collect();
        text.push_str(&format!("public class {}\n{{\n", self.class_name));
        text.push_str(&methods.join("\n\n"));
        text.push_str("\n}");

        if settings.disable_compiler_warnings {
            if !warnings.is_empty() {
                text.push_str(&format!("\n#pragma warning restore {warnings}"));
            }
            text.push_str("\n#nullable restore");
        }

        text
    }
}

/// Group by name, keeping first-seen order of names and declaration order
/// within a group.
fn group_by_name<'a>(methods: impl Iterator<Item = &'a Method>) -> Vec<Vec<&'a Method>> {
    let mut groups: Vec<Vec<&Method>> = Vec::new();
    for method in methods {
        match groups.iter_mut().find(|g| g[0].name == method.name) {
            Some(group) => group.push(method),
            None => groups.push(vec![method]),
        }
    }
    groups
}

/// Test classes for every testable class that has at least one testable
/// method.
#[must_use]
pub fn test_classes_for(classes: &[Class]) -> Vec<TestClass<'_>> {
    classes
        .iter()
        .filter(|class| class.is_testable())
        .map(TestClass::new)
        .filter(|test_class| {
            let keep = !test_class.test_methods.is_empty();
            if !keep {
                debug!(class = %test_class.class.name, "no testable methods");
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(definition: &str, methods: &[(&str, &str)]) -> Class {
        Class {
            methods: methods
                .iter()
                .map(|(prefix, params)| Method::from_parts(prefix, Some(*params)).expect("method"))
                .collect(),
            ..Class::from_definition(definition).expect("class")
        }
    }

    fn test_names(test_class: &TestClass<'_>) -> Vec<String> {
        test_class
            .test_methods()
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    #[test]
    fn overloads_get_numbered_names() {
        let class = class(
            "public class Pipeline",
            &[
                ("public void Process", "int item"),
                ("public void Flush", ""),
                ("public void Process", "string item"),
                ("public static void Process", "long item"),
                ("private void Drain", ""),
            ],
        );
        let test_class = TestClass::new(&class);
        assert_eq!(test_names(&test_class), vec!["Process", "Process2", "Flush"]);
        assert_eq!(test_class.class_name(), "PipelineTests");
        assert_eq!(test_class.file_name(), "PipelineTests.cs");
    }

    #[test]
    fn three_overloads() {
        let class = class(
            "public class Calc",
            &[
                ("public int Sum", "int a"),
                ("public int Sum", "int a, int b"),
                ("public int Sum", "int a, int b, int c"),
            ],
        );
        assert_eq!(
            test_names(&TestClass::new(&class)),
            vec!["Sum", "Sum2", "Sum3"]
        );
    }

    #[test]
    fn renders_usings_namespace_and_methods() {
        let mut class = class(
            "public class Counter",
            &[("public void Reset", ""), ("public void Stop", "")],
        );
        class.namespace = Some("Demo".to_string());
        class.usings = vec!["System".to_string()];

        let expected = "using System;
using Demo;

namespace Demo.Tests;

public class CounterTests
{
    [Fact]
    public void Reset()
    {
        // arrange
        Counter target = new Counter();

        // act
        target.Reset();

        // assert
    }

    [Fact]
    public void Stop()
    {
        // arrange
        Counter target = new Counter();

        // act
        target.Stop();

        // assert
    }
}";
        assert_eq!(
            TestClass::new(&class).render(&GenerateSettings::default(), true),
            expected
        );
    }

    #[test]
    fn namespace_falls_back_to_settings() {
        let class = class("public class Counter", &[("public void Reset", "")]);
        let test_class = TestClass::new(&class);

        let settings = GenerateSettings::default();
        assert_eq!(test_class.namespace(&settings), "DevelopmentDrivenTesting");
        assert!(
            test_class
                .render(&settings, true)
                .starts_with("namespace DevelopmentDrivenTesting;\n\npublic class CounterTests\n{\n")
        );

        let settings = GenerateSettings {
            target_project_namespace: Some("Shop.Tests".to_string()),
            ..GenerateSettings::default()
        };
        assert_eq!(test_class.namespace(&settings), "Shop.Tests");
    }

    #[test]
    fn compiler_warning_pragmas_wrap_the_class() {
        let class = class("public class Counter", &[("public void Reset", "")]);
        let settings = GenerateSettings {
            disable_compiler_warnings: true,
            warnings_to_disable: vec!["CS8632".to_string(), "IDE0059".to_string()],
            ..GenerateSettings::default()
        };
        let text = TestClass::new(&class).with_prefix("Ddt").render(&settings, false);

        assert!(text.starts_with(
            "#nullable disable\n#pragma warning disable CS8632, IDE0059\npublic class DdtCounterTests\n{\n"
        ));
        assert!(text.ends_with("\n}\n#pragma warning restore CS8632, IDE0059\n#nullable restore"));
        assert!(!text.contains("namespace"));
    }

    #[test]
    fn prefix_keeps_file_name() {
        let class = class("public class Counter", &[("public void Reset", "")]);
        let test_class = TestClass::new(&class).with_prefix("Ddt");
        assert_eq!(test_class.class_name(), "DdtCounterTests");
        assert_eq!(test_class.file_name(), "CounterTests.cs");
    }

    #[test]
    fn only_testable_classes_with_testable_methods_are_selected() {
        let classes = vec![
            class("public class Service", &[("public void Run", "")]),
            class("public static class Helpers", &[("public static void Help", "")]),
            class("public abstract class Base", &[("public void Run", "")]),
            class("internal class Hidden", &[("public void Run", "")]),
            class("public class Quiet", &[("private void Run", "")]),
        ];
        let test_classes = test_classes_for(&classes);
        let selected: Vec<&str> = test_classes
            .iter()
            .map(TestClass::class_name)
            .collect();
        assert_eq!(selected, vec!["ServiceTests"]);
    }
}
