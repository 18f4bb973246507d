//! Parser error types for ddt-parser.

/// Errors raised while turning declaration text into a symbol model.
///
/// The structural variants are fatal for the symbol being parsed only;
/// callers decide whether to skip the symbol or abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Data structure object type not found in '{text}'")]
    StructureTypeNotFound { text: String },

    #[error("Method return type not found in '{text}'")]
    ReturnTypeNotFound { text: String },

    #[error("Parameter type and name not found in '{text}'")]
    ParameterShape { text: String },

    #[error("Invalid symbol input: {0}")]
    InvalidSymbolInput(String),

    #[error("Symbol JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
