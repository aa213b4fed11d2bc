mod grammar;
mod parser;
pub mod sets;

pub use parser::{ParseState, Parser};

use crate::ast::SyntaxTree;
use crate::config::Config;
use crate::error::{Error, ErrorSink, Warning};
use crate::session::ModuleID;
use crate::support::os;
use crate::symtab::SymbolTable;
use crate::text;
use std::path::PathBuf;

crate::enum_as_str! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub enum SourceKind {
        Any "any",
        Def "def",
        Mod "mod",
    }
}

pub struct ParseResult<'syn> {
    pub tree: SyntaxTree<'syn>,
    pub stats: ParseStats,
    pub symbols: SymbolTable,
    pub errors: Vec<Error>,
    pub warnings: Vec<Warning>,
}

#[derive(Copy, Clone, Default)]
pub struct ParseStats {
    pub warning_count: usize,
    pub error_count: usize,
    pub line_count: usize,
}

/// Front-end entry: lex and parse one source file into a syntax
/// tree plus diagnostics and stats. An unreadable path is the only
/// hard failure, everything past that point recovers.
pub fn parse<'syn>(
    source_kind: SourceKind,
    path: &PathBuf,
    config: Config,
) -> Result<ParseResult<'syn>, Error> {
    let source = os::file_read(path)?;
    let filename = os::filename(path)?.to_string();
    Ok(parse_source(source_kind, &source, &filename, ModuleID::new(0), config))
}

pub fn parse_source<'syn>(
    source_kind: SourceKind,
    source: &str,
    filename: &str,
    module_id: ModuleID,
    config: Config,
) -> ParseResult<'syn> {
    let (tokens, lex_errors) = crate::lexer::lex(source, module_id, config);

    let (mut state, filename_id) = ParseState::new(filename);
    for error in lex_errors.collect() {
        state.errw.error(error);
    }

    let mut p = Parser::new(tokens, module_id, source, config, &mut state);
    let root = grammar::root(&mut p, source_kind, filename_id);

    let line_count = text::find_line_ranges(source).len();
    let symbols = state.symbols;
    let (errors, warnings) = state.errw.collect();
    let stats = ParseStats {
        warning_count: warnings.len(),
        error_count: errors.len(),
        line_count,
    };

    ParseResult {
        tree: SyntaxTree { arena: state.arena, intern: state.intern, root },
        stats,
        symbols,
        errors,
        warnings,
    }
}
