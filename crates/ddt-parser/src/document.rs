//! Whole-document intake.
//!
//! A language server reports a tree of [`DocumentSymbol`]s (the LSP
//! `textDocument/documentSymbol` shape). Together with the source text this
//! is enough to rebuild every class with its constructors, methods and
//! file-level usings.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::ParserError;
use crate::extract::{DeclarationKind, extract, qualified_namespace};
use crate::symbols::{Class, Constructor, Method, Namespace};

static USING_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*using\s+(?P<namespace>[a-z0-9_.]+)\s*;\s*$")
        .expect("using directive pattern is valid")
});

/// Zero-based line and character offset. Characters are counted in chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Symbol kinds the parser distinguishes; everything else is `Other`.
///
/// Accepts both the numeric LSP codes and lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Namespace,
    Class,
    Struct,
    Interface,
    Enum,
    Constructor,
    Method,
    Property,
    Field,
    Other,
}

impl SymbolKind {
    const fn from_code(code: u32) -> Self {
        match code {
            3 => Self::Namespace,
            5 => Self::Class,
            6 => Self::Method,
            7 => Self::Property,
            8 => Self::Field,
            9 => Self::Constructor,
            10 => Self::Enum,
            11 => Self::Interface,
            23 => Self::Struct,
            _ => Self::Other,
        }
    }

    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "namespace" => Self::Namespace,
            "class" => Self::Class,
            "struct" => Self::Struct,
            "interface" => Self::Interface,
            "enum" => Self::Enum,
            "constructor" => Self::Constructor,
            "method" => Self::Method,
            "property" => Self::Property,
            "field" => Self::Field,
            _ => Self::Other,
        }
    }

    /// Kinds that are assembled into a [`Class`].
    #[must_use]
    pub const fn is_class_like(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Struct | Self::Interface | Self::Enum
        )
    }
}

impl<'de> Deserialize<'de> for SymbolKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u32),
            Name(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Self::from_code(code),
            Raw::Name(name) => Self::from_name(&name),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSymbol {
    pub name: String,
    /// Display signature, e.g. `Demo.Counter` or `Add<T>(T value)`.
    #[serde(default)]
    pub detail: String,
    pub kind: SymbolKind,
    pub range: Range,
    pub selection_range: Range,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    fn is_constructor(&self) -> bool {
        self.kind == SymbolKind::Constructor || self.name == ".ctor"
    }

    fn is_method(&self) -> bool {
        self.kind == SymbolKind::Method && self.name != ".ctor"
    }

    fn signature(&self) -> &str {
        if self.detail.is_empty() {
            &self.name
        } else {
            &self.detail
        }
    }

    /// Name without generic arguments.
    fn base_name(&self) -> &str {
        self.name.split('<').next().unwrap_or_default()
    }
}

/// Parse the JSON array a language server returns for a document.
///
/// # Errors
/// Returns [`ParserError::Json`] when the text is not a symbol array.
pub fn parse_symbols_json(text: &str) -> Result<Vec<DocumentSymbol>, ParserError> {
    Ok(serde_json::from_str(text)?)
}

/// Line-indexed view over a source document.
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line text without its terminator.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map_or(self.text.len(), |next| next - 1);
        Some(self.text[start..end].trim_end_matches('\r'))
    }

    /// Byte offset of a position. A character past the end of its line
    /// clamps to the line end.
    #[must_use]
    pub fn offset(&self, position: Position) -> Option<usize> {
        let index = position.line as usize;
        let start = *self.line_starts.get(index)?;
        let line = self.line(index)?;
        let within = line
            .char_indices()
            .nth(position.character as usize)
            .map_or(line.len(), |(i, _)| i);
        Some(start + within)
    }

    /// Text between two positions.
    ///
    /// # Errors
    /// Returns [`ParserError::InvalidSymbolInput`] when a position lies
    /// outside the document or `end` precedes `start`.
    pub fn slice(&self, start: Position, end: Position) -> Result<&'a str, ParserError> {
        let (Some(from), Some(to)) = (self.offset(start), self.offset(end)) else {
            return Err(ParserError::InvalidSymbolInput(format!(
                "position {}:{} or {}:{} is outside the document",
                start.line, start.character, end.line, end.character
            )));
        };
        if to < from {
            return Err(ParserError::InvalidSymbolInput(format!(
                "range end {}:{} precedes start {}:{}",
                end.line, end.character, start.line, start.character
            )));
        }
        Ok(&self.text[from..to])
    }
}

/// Namespaces named by `using X.Y;` lines at the top of the document,
/// looking no further than `to_line`. Blank lines are skipped; any other
/// line ends the scan.
#[must_use]
pub fn parse_usings(source: &SourceText<'_>, to_line: usize) -> Vec<String> {
    let mut usings = Vec::new();
    for index in 0..to_line.min(source.line_count()) {
        let Some(line) = source.line(index) else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match USING_DIRECTIVE.captures(line) {
            Some(captures) => usings.push(captures["namespace"].to_string()),
            None => break,
        }
    }
    usings
}

/// A symbol that could not be parsed.
#[derive(Debug)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: ParserError,
}

/// Result of [`parse_document`].
#[derive(Debug, Default)]
pub struct DocumentParse {
    pub classes: Vec<Class>,
    pub failures: Vec<SymbolFailure>,
}

impl DocumentParse {
    /// Classes grouped by namespace in first-seen order. Classes without a
    /// namespace land in the global (empty-named) namespace.
    #[must_use]
    pub fn namespaces(&self) -> Vec<Namespace> {
        let mut namespaces: Vec<Namespace> = Vec::new();
        for class in &self.classes {
            let name = class.namespace.as_deref().unwrap_or_default();
            match namespaces.iter_mut().find(|n| n.name == name) {
                Some(namespace) => namespace.classes.push(class.clone()),
                None => namespaces.push(Namespace::new(name, vec![class.clone()])),
            }
        }
        namespaces
    }
}

/// Build the class model of one document.
///
/// Methods whose name appears in `ignored_methods` are skipped. A symbol
/// that fails to parse is recorded in [`DocumentParse::failures`] and the
/// rest of the document is still processed.
#[must_use]
pub fn parse_document(
    text: &str,
    symbols: &[DocumentSymbol],
    ignored_methods: &[String],
) -> DocumentParse {
    let mut parser = DocumentParser {
        source: SourceText::new(text),
        ignored_methods,
        parse: DocumentParse::default(),
    };

    for symbol in symbols {
        parser.visit(symbol, None);
    }

    debug!(
        classes = parser.parse.classes.len(),
        failures = parser.parse.failures.len(),
        "parsed document"
    );
    parser.parse
}

struct DocumentParser<'a> {
    source: SourceText<'a>,
    ignored_methods: &'a [String],
    parse: DocumentParse,
}

impl DocumentParser<'_> {
    fn visit(&mut self, symbol: &DocumentSymbol, namespace: Option<&str>) {
        if symbol.kind == SymbolKind::Namespace {
            for child in &symbol.children {
                self.visit(child, Some(&symbol.name));
            }
        } else if symbol.kind.is_class_like() {
            match self.class(symbol, namespace) {
                Ok(class) => self.parse.classes.push(class),
                Err(error) => self.fail(symbol, error),
            }
        }
    }

    fn class(
        &mut self,
        symbol: &DocumentSymbol,
        namespace: Option<&str>,
    ) -> Result<Class, ParserError> {
        let extracted = extract(
            self.leading_text(symbol)?,
            symbol.signature(),
            &symbol.name,
            DeclarationKind::Class,
        );
        let mut class = Class::from_definition(&extracted.definition)?;

        class.namespace = namespace
            .or_else(|| qualified_namespace(symbol.signature()))
            .map(ToString::to_string);
        class.usings = parse_usings(&self.source, symbol.range.start.line as usize);

        for child in &symbol.children {
            if child.is_constructor() {
                match self.constructor(child) {
                    Ok(constructor) => class.constructors.push(constructor),
                    Err(error) => self.fail(child, error),
                }
            } else if child.is_method() {
                if self.is_ignored(child) {
                    debug!(method = %child.name, "ignoring method");
                    continue;
                }
                match self.method(child) {
                    Ok(method) => class.methods.push(method),
                    Err(error) => self.fail(child, error),
                }
            }
        }

        Ok(class)
    }

    fn constructor(&self, symbol: &DocumentSymbol) -> Result<Constructor, ParserError> {
        let extracted = extract(
            self.leading_text(symbol)?,
            symbol.signature(),
            &symbol.name,
            DeclarationKind::Constructor,
        );
        Constructor::from_parts(&extracted.definition, extracted.parameters.as_deref())
    }

    fn method(&self, symbol: &DocumentSymbol) -> Result<Method, ParserError> {
        let extracted = extract(
            self.leading_text(symbol)?,
            symbol.signature(),
            &symbol.name,
            DeclarationKind::Method,
        );
        Method::from_parts(&extracted.definition, extracted.parameters.as_deref())
    }

    fn leading_text(&self, symbol: &DocumentSymbol) -> Result<&str, ParserError> {
        self.source
            .slice(symbol.range.start, symbol.selection_range.start)
    }

    fn is_ignored(&self, symbol: &DocumentSymbol) -> bool {
        self.ignored_methods
            .iter()
            .any(|name| name == symbol.base_name())
    }

    fn fail(&mut self, symbol: &DocumentSymbol, error: ParserError) {
        warn!(symbol = %symbol.name, %error, "skipping symbol");
        self.parse.failures.push(SymbolFailure {
            symbol: symbol.name.clone(),
            error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Modifiers;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = include_str!("../tests/fixtures/sample.cs");
    const SYMBOLS: &str = include_str!("../tests/fixtures/sample.symbols.json");

    fn symbols() -> Vec<DocumentSymbol> {
        parse_symbols_json(SYMBOLS).expect("fixture symbols should parse")
    }

    // ── Symbol JSON ────────────────────────────────────────────────

    #[test]
    fn numeric_and_named_kinds_deserialize() {
        let symbols = symbols();
        assert_eq!(symbols[0].kind, SymbolKind::Namespace);
        assert_eq!(symbols[0].children[0].kind, SymbolKind::Class);

        let kind: SymbolKind = serde_json::from_str("\"Method\"").expect("named kind");
        assert_eq!(kind, SymbolKind::Method);
        let kind: SymbolKind = serde_json::from_str("12").expect("numeric kind");
        assert_eq!(kind, SymbolKind::Other);
    }

    #[test]
    fn malformed_symbol_json_is_an_error() {
        let error = parse_symbols_json("{\"name\": 1}").expect_err("should fail");
        assert!(matches!(error, ParserError::Json(_)));
    }

    // ── Source text ────────────────────────────────────────────────

    #[test]
    fn slice_spans_lines() {
        let source = SourceText::new("ab\r\ncdé f\n");
        assert_eq!(source.line(1), Some("cdé f"));
        let text = source
            .slice(Position::new(0, 1), Position::new(1, 4))
            .expect("should slice");
        assert_eq!(text, "b\r\ncdé ");
    }

    #[test]
    fn slice_outside_document_is_an_error() {
        let source = SourceText::new("one line");
        let error = source
            .slice(Position::new(0, 0), Position::new(5, 0))
            .expect_err("should fail");
        assert!(matches!(error, ParserError::InvalidSymbolInput(_)));
    }

    // ── Usings ─────────────────────────────────────────────────────

    #[test]
    fn usings_stop_at_first_other_line() {
        let source = SourceText::new("using System;\n\nusing Demo.Core ;\n// note\nusing Late;\n");
        assert_eq!(parse_usings(&source, 5), vec!["System", "Demo.Core"]);
    }

    #[test]
    fn usings_respect_line_limit() {
        let source = SourceText::new("using A;\nusing B;\n");
        assert_eq!(parse_usings(&source, 1), vec!["A"]);
    }

    #[test]
    fn aliases_and_static_usings_end_the_scan() {
        let source = SourceText::new("using static System.Math;\nusing System;\n");
        assert!(parse_usings(&source, 2).is_empty());
    }

    // ── Document ───────────────────────────────────────────────────

    #[test]
    fn fixture_document_builds_class_model() {
        let parse = parse_document(SOURCE, &symbols(), &[]);
        assert!(parse.failures.is_empty(), "{:?}", parse.failures);
        assert_eq!(parse.classes.len(), 1);

        let class = &parse.classes[0];
        assert_eq!(class.definition(), "public class Counter");
        assert_eq!(class.namespace.as_deref(), Some("Demo.Shapes"));
        assert_eq!(class.usings, vec!["System", "System.Collections.Generic"]);

        let constructors: Vec<String> =
            class.constructors.iter().map(Constructor::definition).collect();
        assert_eq!(
            constructors,
            vec![
                "public Counter()",
                "public Counter(int start, string label, bool enabled)"
            ]
        );

        let methods: Vec<String> = class.methods.iter().map(Method::definition).collect();
        assert_eq!(
            methods,
            vec![
                "public int Add(int amount)",
                "public int Add(int amount, int times)",
                "public async Task<IReadOnlyList<T>> Load<T>(string key)",
                "public override string ToString()",
                "private void Hidden()",
            ]
        );
        assert!(!class.methods[4].is_testable());
    }

    #[test]
    fn ignored_method_names_are_skipped() {
        let ignored = vec!["ToString".to_string(), "Load".to_string()];
        let parse = parse_document(SOURCE, &symbols(), &ignored);
        let names: Vec<&str> = parse.classes[0]
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Add", "Add", "Hidden"]);
    }

    #[test]
    fn failing_member_is_recorded_and_skipped() {
        let mut symbols = symbols();
        let class = &mut symbols[0].children[0];
        // a constructor reported as a method has no return type
        let mut broken = class.children[0].clone();
        broken.kind = SymbolKind::Method;
        broken.name = "Counter".to_string();
        class.children.push(broken);

        let parse = parse_document(SOURCE, &symbols, &[]);
        assert_eq!(parse.classes[0].methods.len(), 5);
        assert_eq!(parse.failures.len(), 1);
        assert_eq!(parse.failures[0].symbol, "Counter");
        assert!(matches!(
            parse.failures[0].error,
            ParserError::ReturnTypeNotFound { .. }
        ));
    }

    #[test]
    fn top_level_class_takes_namespace_from_detail() {
        let mut symbols = symbols();
        let class = symbols[0].children.remove(0);
        let parse = parse_document(SOURCE, &[class], &[]);
        assert_eq!(parse.classes[0].namespace.as_deref(), Some("Demo.Shapes"));

        let namespaces = parse.namespaces();
        assert_eq!(namespaces.len(), 1);
        assert_eq!(namespaces[0].definition(), "namespace Demo.Shapes");
    }
}
