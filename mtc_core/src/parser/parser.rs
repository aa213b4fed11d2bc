use crate::ast::Node;
use crate::config::Config;
use crate::error::{ErrorWarningBuffer, SourceRange};
use crate::errors as err;
use crate::intern::{InternPool, NameID};
use crate::session::ModuleID;
use crate::support::{Arena, TempBuffer};
use crate::symtab::SymbolTable;
use crate::text::TextRange;
use crate::token::{Token, TokenList, TokenSet, T};

pub struct Parser<'syn, 'src, 'state> {
    cursor: usize,
    tokens: TokenList,
    module_id: ModuleID,
    pub source: &'src str,
    pub config: Config,
    pub state: &'state mut ParseState<'syn>,
}

pub struct ParseState<'syn> {
    pub arena: Arena<'syn>,
    pub intern: InternPool<'syn>,
    pub errw: ErrorWarningBuffer,
    pub symbols: SymbolTable,
    pub nodes: TempBuffer<&'syn Node<'syn>>,
    pub names: TempBuffer<NameID>,
    pub ranges: TempBuffer<TextRange>,
}

impl<'syn> ParseState<'syn> {
    /// The interned filename names the table's top-level scope,
    /// so the id is handed back alongside the state.
    pub fn new(filename: &str) -> (ParseState<'syn>, NameID) {
        let mut intern = InternPool::new(512);
        let filename_id = intern.intern(filename);
        let state = ParseState {
            arena: Arena::new(),
            intern,
            errw: ErrorWarningBuffer::default(),
            symbols: SymbolTable::new(filename_id),
            nodes: TempBuffer::new(64),
            names: TempBuffer::new(16),
            ranges: TempBuffer::new(16),
        };
        (state, filename_id)
    }
}

impl<'syn, 'src, 'state> Parser<'syn, 'src, 'state> {
    pub fn new(
        tokens: TokenList,
        module_id: ModuleID,
        source: &'src str,
        config: Config,
        state: &'state mut ParseState<'syn>,
    ) -> Parser<'syn, 'src, 'state> {
        let mut p = Parser { cursor: 0, tokens, module_id, source, config, state };
        p.skip_pragmas();
        p
    }

    pub fn at(&self, t: Token) -> bool {
        self.peek() == t
    }

    pub fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.peek())
    }

    pub fn peek(&self) -> Token {
        self.tokens.token(self.cursor)
    }

    pub fn peek_next(&self) -> Token {
        let mut index = self.cursor + 1;
        while self.tokens.token(index) == T![pragma] {
            index += 1;
        }
        self.tokens.token(index)
    }

    pub fn bump(&mut self) {
        self.cursor += 1;
        self.skip_pragmas();
    }

    pub fn eat(&mut self, t: Token) -> bool {
        if self.at(t) {
            self.bump();
            return true;
        }
        false
    }

    fn skip_pragmas(&mut self) {
        while self.peek() == T![pragma] {
            self.cursor += 1;
        }
    }

    pub fn peek_range(&self) -> TextRange {
        self.tokens.range(self.cursor)
    }

    pub fn prev_range(&self) -> TextRange {
        self.tokens.range(self.cursor.saturating_sub(1))
    }

    pub fn make_src(&self) -> SourceRange {
        SourceRange::new(self.module_id, self.peek_range())
    }

    pub fn prev_src(&self) -> SourceRange {
        SourceRange::new(self.module_id, self.prev_range())
    }

    pub fn src_of(&self, range: TextRange) -> SourceRange {
        SourceRange::new(self.module_id, range)
    }

    pub fn module_id(&self) -> ModuleID {
        self.module_id
    }

    /// Interned lexeme of the lookahead token.
    pub fn lexeme_id(&mut self) -> NameID {
        let range = self.tokens.range(self.cursor);
        self.state.intern.intern(&self.source[range.as_usize()])
    }

    pub fn lexeme_str(&self, range: TextRange) -> &'src str {
        &self.source[range.as_usize()]
    }

    /// Consumes `expected` when it is the lookahead. On a mismatch
    /// emits the expected-token error and skips until the lookahead
    /// joins `resync` (Eof always stops the skip).
    pub fn match_token(&mut self, expected: Token, resync: TokenSet) -> bool {
        if self.at(expected) {
            self.bump();
            return true;
        }
        let src = self.make_src();
        let found = self.peek();
        err::syntax_expected_token(&mut self.state.errw, src, expected, found);
        self.resync(resync);
        false
    }

    /// Accepts any lookahead in `expected` without consuming it.
    /// The mismatch path mirrors `match_token`.
    pub fn match_set(&mut self, expected: TokenSet, resync: TokenSet) -> bool {
        if self.at_set(expected) {
            return true;
        }
        let src = self.make_src();
        let found = self.peek();
        err::syntax_expected_set(&mut self.state.errw, src, expected, found);
        self.resync(resync);
        false
    }

    pub fn resync(&mut self, set: TokenSet) {
        while !self.at_set(set) && !self.at(T![eof]) {
            self.bump();
        }
    }
}
