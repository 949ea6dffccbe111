//! Recursive descent parser producing the AST and populating the symbol
//! table as declarations are encountered.

pub mod ast;
pub mod parse;

mod declarations;
mod expressions;
mod statements;

pub use parse::{ParseError, Parser};
