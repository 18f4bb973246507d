//! # ddt-parser
//!
//! Text-scanning parser for C# declarations.
//!
//! Turns the declaration text of classes, constructors and methods (as
//! reported by a language server's document symbols) into a structured
//! model:
//! - [`type_expr`]: type references with generics, arrays, nullability and tuples
//! - [`parameter`]: method and constructor parameters
//! - [`symbols`]: classes, constructors, methods and namespaces
//! - [`document`]: whole-document intake from symbol trees and source text
//!
//! No C# grammar is involved; everything is delimiter-aware string
//! scanning, so malformed input degrades instead of failing wherever a
//! best-effort answer exists.

pub mod document;
pub mod error;
pub mod extract;
pub mod parameter;
pub mod scan;
pub mod symbols;
pub mod type_expr;

pub use document::{DocumentParse, DocumentSymbol, SourceText, parse_document, parse_symbols_json};
pub use error::ParserError;
pub use parameter::{Parameter, ParameterValue};
pub use symbols::{Class, Constructor, Method, Modifiers, Namespace, StructureType, Symbol};
pub use type_expr::{ArrayDimension, TypeExpr};
