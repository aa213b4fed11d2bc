use super::Token;
use crate::text::TextRange;

/// Tokens and their source ranges in parallel Vecs.
/// Lexemes are not stored, they are read back out of the
/// source text through the range when needed.
pub struct TokenList {
    tokens: Vec<Token>,
    ranges: Vec<TextRange>,
}

impl TokenList {
    pub fn new(cap: usize) -> TokenList {
        TokenList { tokens: Vec::with_capacity(cap), ranges: Vec::with_capacity(cap) }
    }

    pub fn add_token(&mut self, token: Token, range: TextRange) {
        self.tokens.push(token);
        self.ranges.push(range);
    }

    pub fn token(&self, index: usize) -> Token {
        self.tokens[index]
    }
    pub fn range(&self, index: usize) -> TextRange {
        self.ranges[index]
    }
    pub fn count(&self) -> usize {
        self.tokens.len()
    }
}
