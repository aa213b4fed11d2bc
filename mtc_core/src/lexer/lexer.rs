use crate::config::Config;
use crate::error::{ErrorBuffer, SourceRange};
use crate::session::ModuleID;
use crate::text::{TextOffset, TextRange};
use crate::token::TokenList;
use std::{iter::Peekable, str::Chars};

pub struct Lexer<'src> {
    cursor: TextOffset,
    chars: Peekable<Chars<'src>>,
    pub tokens: TokenList,
    pub errors: ErrorBuffer,
    pub source: &'src str,
    pub module_id: ModuleID,
    pub config: Config,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, module_id: ModuleID, config: Config) -> Lexer<'src> {
        Lexer {
            cursor: 0.into(),
            chars: source.chars().peekable(),
            tokens: TokenList::new(source.len() / 8),
            errors: ErrorBuffer::default(),
            source,
            module_id,
            config,
        }
    }

    pub fn finish(self) -> (TokenList, ErrorBuffer) {
        (self.tokens, self.errors)
    }

    pub fn start_range(&self) -> TextOffset {
        self.cursor
    }

    pub fn make_range(&self, start: TextOffset) -> TextRange {
        TextRange::new(start, self.cursor)
    }

    pub fn make_src(&self, start: TextOffset) -> SourceRange {
        SourceRange::new(self.module_id, TextRange::new(start, self.cursor))
    }

    pub fn at(&mut self, c: char) -> bool {
        self.peek() == Some(c)
    }

    pub fn at_next(&self, c: char) -> bool {
        self.peek_next() == Some(c)
    }

    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    pub fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.peek().copied()
    }

    pub fn eat(&mut self, c: char) {
        self.cursor += (c.len_utf8() as u32).into();
        self.chars.next();
    }
}
