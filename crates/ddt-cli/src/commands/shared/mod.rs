pub mod document;
pub mod output;
