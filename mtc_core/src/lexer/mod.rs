mod grammar;
mod lexer;

use crate::config::Config;
use crate::error::ErrorBuffer;
use crate::session::ModuleID;
use crate::token::TokenList;

pub fn lex(source: &str, module_id: ModuleID, config: Config) -> (TokenList, ErrorBuffer) {
    let mut lex = lexer::Lexer::new(source, module_id, config);
    grammar::source_file(&mut lex);
    lex.finish()
}
