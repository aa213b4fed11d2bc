use super::Token;

/// Immutable set of terminal tokens, used as FIRST/FOLLOW/RESYNC
/// predicates by the parser. Wide enough for the whole `Token` range.
#[derive(Copy, Clone, PartialEq)]
pub struct TokenSet {
    mask: [u64; 2],
}

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet { mask: [0; 2] };

    pub const fn new(tokens: &[Token]) -> TokenSet {
        let mut mask = [0u64; 2];
        let mut i = 0;
        while i < tokens.len() {
            let idx = tokens[i] as usize;
            mask[idx / 64] |= 1u64 << (idx % 64);
            i += 1;
        }
        TokenSet { mask }
    }

    pub const fn union(a: TokenSet, b: TokenSet) -> TokenSet {
        TokenSet { mask: [a.mask[0] | b.mask[0], a.mask[1] | b.mask[1]] }
    }

    pub const fn contains(&self, token: Token) -> bool {
        let idx = token as usize;
        self.mask[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    pub const fn subset_of(&self, other: &TokenSet) -> bool {
        self.mask[0] & !other.mask[0] == 0 && self.mask[1] & !other.mask[1] == 0
    }

    pub const fn disjunct_with(&self, other: &TokenSet) -> bool {
        self.mask[0] & other.mask[0] == 0 && self.mask[1] & other.mask[1] == 0
    }

    pub const fn len(&self) -> u32 {
        self.mask[0].count_ones() + self.mask[1].count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member tokens in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Token> + '_ {
        Token::ALL.iter().copied().filter(|token| self.contains(*token))
    }
}

#[cfg(test)]
mod tests {
    use super::TokenSet;
    use crate::token::{Token, T};

    const REL_OPS: TokenSet =
        TokenSet::new(&[T![=], T![#], T![<], T![<=], T![>], T![>=], T![in]]);
    const ADD_OPS: TokenSet = TokenSet::new(&[T![+], T![-], T![or]]);

    #[test]
    fn membership_matches_construction() {
        for token in [T![=], T![#], T![<], T![<=], T![>], T![>=], T![in]] {
            assert!(REL_OPS.contains(token));
        }
        assert!(!REL_OPS.contains(T![+]));
        assert!(!REL_OPS.contains(Token::Eof));
        assert_eq!(REL_OPS.len(), 7);
    }

    #[test]
    fn union_subset_disjunct() {
        let both = TokenSet::union(REL_OPS, ADD_OPS);
        assert!(REL_OPS.subset_of(&both));
        assert!(ADD_OPS.subset_of(&both));
        assert!(!both.subset_of(&REL_OPS));
        assert!(REL_OPS.disjunct_with(&ADD_OPS));
        assert!(!both.disjunct_with(&ADD_OPS));
        assert_eq!(both.len(), 10);
    }

    #[test]
    fn high_discriminants_fit() {
        let set = TokenSet::new(&[T![:=], T![..]]);
        assert!(set.contains(T![:=]));
        assert!(set.contains(T![..]));
        assert!(!set.contains(T![.]));
        assert_eq!(set.len(), 2);
    }
}
