pub mod ast;
pub mod ast_print;
pub mod config;
pub mod error;
pub mod errors;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod support;
pub mod symtab;
pub mod text;
pub mod token;

/// toolchain version reported by `mtc version`
pub const VERSION: &str = "0.1.0";
