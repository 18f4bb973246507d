//! Symbol text extraction.
//!
//! A collaborator hands over two strings per symbol: the raw text that
//! precedes the symbol's name token (modifiers, return type, attributes,
//! comments) and a one-line display signature such as `Run<T>(T value)`.
//! This module turns that pair into a single normalised declaration and
//! peels the leading pieces (attributes, keywords, constraints) off it.

use std::sync::LazyLock;

use regex::Regex;

use crate::scan::{closing_bracket, find_top_level_open, rfind_top_level};

/// Modifier keywords that may lead a class, constructor or method declaration.
pub const SYMBOL_KEYWORDS: &[&str] = &[
    "abstract", "async", "extern", "file", "internal", "new", "override", "partial", "private",
    "protected", "public", "sealed", "static", "unsafe", "virtual",
];

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("line comment pattern is valid"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

static GENERIC_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^<>()]+(<.+>)\(.*\)$").expect("generic signature pattern is valid")
});

/// Which declaration shape the display signature describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// class, struct, interface, enum or record
    Class,
    Constructor,
    Method,
}

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Full declaration for class-like symbols, keyword+type+name prefix otherwise.
    pub definition: String,
    /// Parameter list text of constructors and methods (without parentheses).
    pub parameters: Option<String>,
}

/// Strip comments and attribute-like bracket groups, then collapse whitespace.
///
/// Each substitution only runs when its marker is present in the text.
#[must_use]
pub fn clean_leading_text(text: &str) -> String {
    let mut cleaned = text.to_string();

    if cleaned.contains("//") {
        cleaned = LINE_COMMENT.replace_all(&cleaned, " ").into_owned();
    }
    if cleaned.contains("/*") && cleaned.contains("*/") {
        cleaned = BLOCK_COMMENT.replace_all(&cleaned, " ").into_owned();
    }
    if cleaned.contains('[') && cleaned.contains(']') {
        cleaned = strip_attribute_groups(&cleaned);
    }

    normalize_whitespace(&cleaned)
}

/// Drop every bracket group that opens with an identifier, through its
/// matching `]`. Array ranks (`[]`, `[,]`) never start with an identifier,
/// attributes always do.
fn strip_attribute_groups(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        let is_attribute = rest[open + 1..]
            .trim_start()
            .starts_with(|c: char| c.is_ascii_alphabetic() || c == '_');
        match closing_bracket(rest, open).filter(|_| is_attribute) {
            Some(close) => {
                stripped.push_str(&rest[..open]);
                stripped.push(' ');
                rest = &rest[close + 1..];
            }
            None => {
                stripped.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }

    stripped.push_str(rest);
    stripped
}

/// Collapse newlines and whitespace runs to single spaces.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the declaration text for one symbol.
///
/// `name` is the symbol's reported name (`.ctor` for constructors is
/// accepted), `signature` its display signature.
#[must_use]
pub fn extract(leading_text: &str, signature: &str, name: &str, kind: DeclarationKind) -> Extracted {
    let leading = clean_leading_text(leading_text);

    if kind == DeclarationKind::Class {
        let definition = join_words(&leading, &class_display_name(signature));
        return Extracted {
            definition,
            parameters: None,
        };
    }

    let definition = join_words(&leading, signature);

    let mut symbol_name = if name == ".ctor" || name.is_empty() {
        signature.to_string()
    } else {
        name.to_string()
    };
    if !symbol_name.contains('<') {
        if let Some(generic) = generic_suffix(signature) {
            symbol_name.push_str(generic);
        }
    }

    let needle = match symbol_name.find('(') {
        Some(open) => normalize_whitespace(&symbol_name[..=open]),
        None => format!("{}(", normalize_whitespace(&symbol_name)),
    };

    let open = definition
        .find(&needle)
        .map(|start| start + needle.len() - 1)
        .or_else(|| find_top_level_open(&definition, '('));

    let Some(open) = open else {
        return Extracted {
            definition,
            parameters: None,
        };
    };

    let close = closing_bracket(&definition, open).unwrap_or(definition.len());
    let inner = definition[open + 1..close].trim();
    let trailing = definition.get(close + 1..).unwrap_or_default().trim();

    let parameters = if trailing.is_empty() {
        inner.to_string()
    } else {
        // keeps the leading space so ` where ` still matches on an empty list
        format!("{inner} {trailing}")
    };

    Extracted {
        definition: definition[..open].trim().to_string(),
        parameters: Some(parameters),
    }
}

fn join_words(leading: &str, tail: &str) -> String {
    if leading.is_empty() {
        normalize_whitespace(tail)
    } else {
        normalize_whitespace(&format!("{leading} {tail}"))
    }
}

/// `<T, U>` of a display signature shaped `Name<T, U>(...)`.
#[must_use]
pub fn generic_suffix(signature: &str) -> Option<&str> {
    GENERIC_SIGNATURE
        .captures(signature.trim())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// End of the leading name token of a class display signature.
fn class_head_end(signature: &str) -> usize {
    signature
        .find(['<', '(', ' ', ':'])
        .unwrap_or(signature.len())
}

/// Namespace qualification of a class display signature, if any.
///
/// `Demo.Shapes.Circle<T>` yields `Demo.Shapes`.
#[must_use]
pub fn qualified_namespace(signature: &str) -> Option<&str> {
    let signature = signature.trim();
    let head = &signature[..class_head_end(signature)];
    rfind_top_level(head, '.').map(|dot| &head[..dot])
}

/// Class display signature without namespace qualification and without a
/// primary constructor parameter list.
#[must_use]
pub fn class_display_name(signature: &str) -> String {
    let mut text = signature.trim();

    let head = &text[..class_head_end(text)];
    if let Some(dot) = rfind_top_level(head, '.') {
        text = &text[dot + 1..];
    }

    match find_top_level_open(text, '(') {
        Some(open) => {
            let close = closing_bracket(text, open).unwrap_or(text.len() - 1);
            let rest = text.get(close + 1..).unwrap_or_default();
            normalize_whitespace(&format!("{} {rest}", &text[..open]))
        }
        None => text.to_string(),
    }
}

/// Remove the contiguous run of leading `[...]` groups.
///
/// Returns `None` for the attributes when the text holds no `[` at all or
/// when no group was found.
#[must_use]
pub fn remove_attributes(text: &str) -> (String, Option<Vec<String>>) {
    if !text.contains('[') {
        return (text.to_string(), None);
    }

    let mut attributes = Vec::new();
    let mut depth = 0i32;
    let mut index = 0usize;

    for (i, c) in text.char_indices() {
        match c {
            '[' => {
                depth += 1;
                if depth == 1 {
                    index = i + 1;
                }
            }
            ']' => {
                depth -= 1;
                if depth == 0 {
                    attributes.push(text[index..i].trim().to_string());
                    index = i + 1;
                }
            }
            _ if depth == 0 && !c.is_whitespace() => break,
            _ => {}
        }
    }

    let remainder = text[index..].trim().to_string();
    (remainder, non_empty(attributes))
}

/// Remove leading keywords drawn from `vocabulary`.
///
/// A keyword only matches when followed by a space.
#[must_use]
pub fn remove_keywords(text: &str, vocabulary: &[&str]) -> (String, Option<Vec<String>>) {
    let mut keywords = Vec::new();
    let mut remainder = text.trim();

    while let Some(found) = vocabulary.iter().find(|word| {
        remainder
            .strip_prefix(**word)
            .is_some_and(|rest| rest.starts_with(' '))
    }) {
        keywords.push((*found).to_string());
        remainder = remainder[found.len() + 1..].trim();
    }

    (remainder.to_string(), non_empty(keywords))
}

/// [`remove_keywords`] with the class/constructor/method modifier vocabulary.
#[must_use]
pub fn remove_symbol_keywords(text: &str) -> (String, Option<Vec<String>>) {
    remove_keywords(text, SYMBOL_KEYWORDS)
}

/// Split off `where` constraint clauses.
///
/// Splitting is purely textual on ` where `: a clause containing that token
/// inside a nested generic is split there too.
#[must_use]
pub fn remove_constraints(text: &str) -> (String, Option<Vec<String>>) {
    match text.split_once(" where ") {
        None => (text.trim().to_string(), None),
        Some((head, tail)) => {
            let tail = tail.trim();
            let constraints = (!tail.is_empty())
                .then(|| tail.split(" where ").map(|c| c.trim().to_string()).collect());
            (head.trim().to_string(), constraints)
        }
    }
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}
