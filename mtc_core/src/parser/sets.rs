use crate::token::{Token, TokenSet, T};

//==================== FIRST / FOLLOW ====================

pub const FIRST_IMPORT: TokenSet = TokenSet::new(&[T![import], T![from]]);

pub const FIRST_DEFINITION: TokenSet =
    TokenSet::new(&[T![const], T![type], T![var], T![procedure]]);

pub const FIRST_DECLARATION: TokenSet =
    TokenSet::new(&[T![const], T![type], T![var], T![procedure], T![module]]);

pub const FIRST_TYPE: TokenSet = TokenSet::new(&[
    T![ident],
    T!['['],
    T!['('],
    T![set],
    T![array],
    T![record],
    T![pointer],
    T![procedure],
]);

pub const FIRST_FORMAL_TYPE: TokenSet = TokenSet::new(&[T![ident], T![array]]);

pub const FIRST_FIELD: TokenSet = TokenSet::new(&[T![ident]]);

pub const FIRST_STATEMENT: TokenSet = TokenSet::new(&[
    T![ident],
    T![if],
    T![case],
    T![while],
    T![repeat],
    T![loop],
    T![for],
    T![with],
    T![exit],
    T![return],
]);

pub const FOLLOW_STATEMENT: TokenSet =
    TokenSet::new(&[T![;], T![end], T![elsif], T![else], T![until], T![|]]);

pub const FIRST_EXPR: TokenSet = TokenSet::new(&[
    T![ident],
    T![int_lit],
    T![real_lit],
    T![char_lit],
    T![string_lit],
    T!['('],
    T!['{'],
    T![not],
    T![+],
    T![-],
]);

pub const FIRST_UNIT: TokenSet =
    TokenSet::new(&[T![definition], T![implementation], T![module]]);

pub const RELATION_OPS: TokenSet =
    TokenSet::new(&[T![=], T![#], T![<], T![<=], T![>], T![>=], T![in]]);

pub const ADD_OPS: TokenSet = TokenSet::new(&[T![+], T![-], T![or]]);

pub const MUL_OPS: TokenSet = TokenSet::new(&[T![*], T![/], T![div], T![mod], T![and]]);

//==================== RESYNC ====================
// fixed recovery sets, one per distinct recovery situation;
// `Parser::resync` additionally always stops at Eof

pub const IMPORT_OR_DEFINITION_OR_END: TokenSet =
    TokenSet::union(FIRST_IMPORT, TokenSet::union(FIRST_DEFINITION, TokenSet::new(&[T![end]])));

pub const IMPORT_OR_IDENT_OR_SEMICOLON: TokenSet =
    TokenSet::union(FIRST_IMPORT, TokenSet::new(&[T![ident], T![;]]));

pub const IDENT_OR_SEMICOLON: TokenSet = TokenSet::new(&[T![ident], T![;]]);

pub const COMMA_OR_SEMICOLON: TokenSet = TokenSet::new(&[T![,], T![;]]);

pub const DEFINITION_OR_IDENT_OR_SEMICOLON: TokenSet =
    TokenSet::union(FIRST_DEFINITION, TokenSet::new(&[T![ident], T![;]]));

pub const DEFINITION_OR_SEMICOLON: TokenSet =
    TokenSet::union(FIRST_DEFINITION, TokenSet::new(&[T![;]]));

pub const TYPE_OR_COMMA_OR_OF: TokenSet =
    TokenSet::union(FIRST_TYPE, TokenSet::new(&[T![,], T![of]]));

pub const SEMICOLON_OR_END: TokenSet = TokenSet::new(&[T![;], T![end]]);

pub const ELSE_OR_END: TokenSet = TokenSet::new(&[T![else], T![end]]);

pub const COMMA_OR_RIGHT_PAREN: TokenSet = TokenSet::new(&[T![,], T![')']]);

pub const COLON_OR_SEMICOLON: TokenSet = TokenSet::new(&[T![:], T![;]]);

pub const IMPORT_OR_BLOCK: TokenSet = TokenSet::union(
    FIRST_IMPORT,
    TokenSet::union(FIRST_DECLARATION, TokenSet::new(&[T![begin], T![end]])),
);

pub const DECLARATION_OR_IDENT_OR_SEMICOLON: TokenSet =
    TokenSet::union(FIRST_DECLARATION, TokenSet::new(&[T![ident], T![;]]));

pub const DECLARATION_OR_SEMICOLON: TokenSet =
    TokenSet::union(FIRST_DECLARATION, TokenSet::new(&[T![;]]));

pub const FIRST_OR_FOLLOW_OF_STATEMENT: TokenSet =
    TokenSet::union(FIRST_STATEMENT, FOLLOW_STATEMENT);

pub const ELSIF_OR_ELSE_OR_END: TokenSet =
    TokenSet::new(&[T![elsif], T![else], T![end]]);

pub const FOR_LOOP_BODY: TokenSet =
    TokenSet::new(&[T![:=], T![to], T![by], T![do], T![end]]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_classes_are_disjoint() {
        assert!(RELATION_OPS.disjunct_with(&ADD_OPS));
        assert!(RELATION_OPS.disjunct_with(&MUL_OPS));
        assert!(ADD_OPS.disjunct_with(&MUL_OPS));
    }

    #[test]
    fn resync_unions_cover_their_parts() {
        assert!(FIRST_IMPORT.subset_of(&IMPORT_OR_DEFINITION_OR_END));
        assert!(FIRST_DEFINITION.subset_of(&IMPORT_OR_DEFINITION_OR_END));
        assert!(FIRST_DECLARATION.subset_of(&IMPORT_OR_BLOCK));
        assert!(FIRST_STATEMENT.subset_of(&FIRST_OR_FOLLOW_OF_STATEMENT));
        assert!(FOLLOW_STATEMENT.subset_of(&FIRST_OR_FOLLOW_OF_STATEMENT));
        assert!(IMPORT_OR_IDENT_OR_SEMICOLON.contains(T![ident]));
        assert!(TYPE_OR_COMMA_OR_OF.contains(T![of]));
        assert_eq!(COMMA_OR_RIGHT_PAREN.len(), 2);
    }
}
