pub mod dispatch;
pub mod generate;
pub mod parse;
pub mod shared;
pub mod write;
