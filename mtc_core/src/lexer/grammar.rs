use super::lexer::Lexer;
use crate::errors as err;
use crate::text::{TextOffset, TextRange};
use crate::token::{Token, T};

pub const IDENT_MAX_LEN: usize = 64;
pub const NUMBER_MAX_LEN: usize = 32;
pub const STRING_MAX_LEN: usize = 160;
pub const COMMENT_MAX_LEN: usize = 4096;
pub const COMMENT_MAX_DEPTH: u32 = 10;

pub fn source_file(lex: &mut Lexer) {
    while lex.peek().is_some() {
        lex_whitespace(lex);
        if let Some(c) = lex.peek() {
            match c {
                // NUL reads as end of source
                '\0' => break,
                '\'' | '\"' => lex_string(lex, c),
                '<' if lex.at_next('*') => lex_pragma(lex),
                '&' if lex.config.synonyms => {
                    let start = lex.start_range();
                    lex.eat(c);
                    lex.tokens.add_token(T![and], lex.make_range(start));
                }
                '~' if lex.config.synonyms => {
                    let start = lex.start_range();
                    lex.eat(c);
                    lex.tokens.add_token(T![not], lex.make_range(start));
                }
                _ => {
                    if c.is_ascii_digit() {
                        lex_number(lex, c);
                    } else if c.is_ascii_alphabetic() {
                        lex_ident(lex, c);
                    } else {
                        lex_symbol(lex, c);
                    }
                }
            }
        }
    }

    // parser lookahead relies on two trailing Eof tokens
    let eof_range = TextRange::empty_at(lex.start_range());
    lex.tokens.add_token(T![eof], eof_range);
    lex.tokens.add_token(T![eof], eof_range);
}

fn lex_whitespace(lex: &mut Lexer) {
    while let Some(c) = lex.peek() {
        if c.is_ascii_whitespace() {
            lex.eat(c);
        } else if c == '(' && lex.at_next('*') {
            lex_block_comment(lex);
        } else {
            break;
        }
    }
}

/// Block comments nest; the whole comment is discarded.
fn lex_block_comment(lex: &mut Lexer) {
    let start = lex.start_range();
    lex.eat('(');
    lex.eat('*');

    let mut depth: u32 = 1;
    let mut depth_reported = false;
    let mut terminated = false;

    while let Some(c) = lex.peek() {
        if c == '(' && lex.at_next('*') {
            lex.eat(c);
            lex.eat('*');
            depth += 1;
            if depth > COMMENT_MAX_DEPTH && !depth_reported {
                depth_reported = true;
                let src = lex.make_src(start);
                err::lexer_comment_nesting_overflow(&mut lex.errors, src, COMMENT_MAX_DEPTH);
            }
        } else if c == '*' && lex.at_next(')') {
            lex.eat(c);
            lex.eat(')');
            depth -= 1;
            if depth == 0 {
                terminated = true;
                break;
            }
        } else {
            lex.eat(c);
        }
    }

    let range = lex.make_range(start);
    let src = lex.make_src(start);
    if !terminated {
        err::lexer_comment_not_terminated(&mut lex.errors, src);
    }
    if range.len() as usize > COMMENT_MAX_LEN {
        err::lexer_comment_too_long(&mut lex.errors, src, COMMENT_MAX_LEN);
    }
}

/// `<* ... *>` compiler pragma, kept as a single token and
/// skipped by the parser. Pragmas do not nest.
fn lex_pragma(lex: &mut Lexer) {
    let start = lex.start_range();
    lex.eat('<');
    lex.eat('*');

    let mut terminated = false;
    while let Some(c) = lex.peek() {
        if c == '*' && lex.at_next('>') {
            lex.eat(c);
            lex.eat('>');
            terminated = true;
            break;
        }
        lex.eat(c);
    }

    if !terminated {
        let src = lex.make_src(start);
        err::lexer_pragma_not_terminated(&mut lex.errors, src);
    }
    lex.tokens.add_token(T![pragma], lex.make_range(start));
}

fn lex_ident(lex: &mut Lexer, fc: char) {
    let start = lex.start_range();
    lex.eat(fc);

    while let Some(c) = lex.peek() {
        if c.is_ascii_alphanumeric() {
            lex.eat(c);
        } else {
            break;
        }
    }

    let mut range = lex.make_range(start);
    if range.len() as usize > IDENT_MAX_LEN {
        let src = lex.make_src(start);
        err::lexer_ident_too_long(&mut lex.errors, src, IDENT_MAX_LEN);
        // identifiers are ascii here, the cut cannot split a char
        range = TextRange::new(start, start + TextOffset::from(IDENT_MAX_LEN as u32));
    }

    let string = &lex.source[range.as_usize()];
    let token = Token::as_keyword(string).unwrap_or(T![ident]);
    lex.tokens.add_token(token, range);
}

fn lex_number(lex: &mut Lexer, fc: char) {
    let start = lex.start_range();
    lex.eat(fc);

    // scan the maximal digit run first; `A`..`F` only make sense
    // with a trailing `H`, octal suffixes `B` and `C` double as
    // hex digits, so classification happens after the scan
    let mut has_hex_digit = false;
    while let Some(c) = lex.peek() {
        if c.is_ascii_digit() {
            lex.eat(c);
        } else if matches!(c, 'A'..='F') {
            // a final `B`, `C` or `E` with nothing alphanumeric after
            // it is a suffix (or scale factor), not a hex digit
            let continues = lex
                .peek_next()
                .map(|n| n.is_ascii_alphanumeric())
                .unwrap_or(false);
            if !continues && matches!(c, 'B' | 'C' | 'E') {
                break;
            }
            lex.eat(c);
            has_hex_digit = true;
        } else {
            break;
        }
    }

    let mut token = match lex.peek() {
        Some('H') => {
            lex.eat('H');
            T![int_lit]
        }
        Some('B') if lex.config.octal_literals => {
            lex.eat('B');
            lex_octal_digits(lex, start)
        }
        Some('C') if lex.config.octal_literals => {
            lex.eat('C');
            match lex_octal_digits(lex, start) {
                T![int_lit] => T![char_lit],
                malformed => malformed,
            }
        }
        Some('.') if !lex.at_next('.') => {
            lex.eat('.');
            lex_real(lex, start)
        }
        _ if has_hex_digit => {
            let src = lex.make_src(start);
            err::lexer_hex_missing_suffix(&mut lex.errors, src);
            T![malformed_int]
        }
        _ => T![int_lit],
    };

    let range = lex.make_range(start);
    if range.len() as usize > NUMBER_MAX_LEN {
        let src = lex.make_src(start);
        err::lexer_number_too_long(&mut lex.errors, src, NUMBER_MAX_LEN);
        token = match token {
            T![real_lit] | T![malformed_real] => T![malformed_real],
            _ => T![malformed_int],
        };
    }
    lex.tokens.add_token(token, range);
}

/// Validates the already-scanned digit run of a `B` or `C` literal.
fn lex_octal_digits(lex: &mut Lexer, start: TextOffset) -> Token {
    let range = lex.make_range(start);
    let lexeme = &lex.source[range.as_usize()];
    let digits = &lexeme[..lexeme.len() - 1];
    match digits.chars().find(|c| !matches!(c, '0'..='7')) {
        Some(digit) => {
            let src = lex.make_src(start);
            err::lexer_octal_invalid_digit(&mut lex.errors, src, digit);
            T![malformed_int]
        }
        None => T![int_lit],
    }
}

/// Fraction and scale factor, entered after the `.` is consumed.
fn lex_real(lex: &mut Lexer, start: TextOffset) -> Token {
    let mut fraction_digits = 0;
    while let Some(c) = lex.peek() {
        if c.is_ascii_digit() {
            lex.eat(c);
            fraction_digits += 1;
        } else {
            break;
        }
    }
    if fraction_digits == 0 {
        let src = lex.make_src(start);
        err::lexer_real_missing_fraction(&mut lex.errors, src);
        return T![malformed_real];
    }

    if lex.at('E') {
        lex.eat('E');
        if lex.at('+') {
            lex.eat('+');
        } else if lex.at('-') {
            lex.eat('-');
        }
        let mut exp_digits = 0;
        while let Some(c) = lex.peek() {
            if c.is_ascii_digit() {
                lex.eat(c);
                exp_digits += 1;
            } else {
                break;
            }
        }
        if exp_digits == 0 {
            let src = lex.make_src(start);
            err::lexer_real_missing_exponent(&mut lex.errors, src);
            return T![malformed_real];
        }
    }
    T![real_lit]
}

/// Single-line string in `"` or `'` quotes. The closing quote must
/// match the opening one, a newline or end of input malforms it.
fn lex_string(lex: &mut Lexer, quote: char) {
    let start = lex.start_range();
    lex.eat(quote);

    let mut terminated = false;
    while let Some(c) = lex.peek() {
        match c {
            '\n' | '\r' => break,
            '\\' if lex.config.escape_tab_and_newline
                && matches!(lex.peek_next(), Some('t') | Some('n') | Some('\\')) =>
            {
                lex.eat(c);
                if let Some(escaped) = lex.peek() {
                    lex.eat(escaped);
                }
            }
            _ if c == quote => {
                lex.eat(c);
                terminated = true;
                break;
            }
            _ => lex.eat(c),
        }
    }

    let range = lex.make_range(start);
    let src = lex.make_src(start);
    let mut token = T![string_lit];
    if !terminated {
        err::lexer_string_not_terminated(&mut lex.errors, src, quote);
        token = T![malformed_string];
    }
    if range.len() as usize > STRING_MAX_LEN {
        err::lexer_string_too_long(&mut lex.errors, src, STRING_MAX_LEN);
        token = T![malformed_string];
    }
    lex.tokens.add_token(token, range);
}

fn lex_symbol(lex: &mut Lexer, fc: char) {
    let start = lex.start_range();
    lex.eat(fc);

    let mut token = match Token::from_char(fc) {
        Some(sym) => sym,
        None => {
            let src = lex.make_src(start);
            err::lexer_unknown_symbol(&mut lex.errors, src, fc);
            lex.tokens.add_token(T![error], lex.make_range(start));
            return;
        }
    };

    if let Some(c) = lex.peek() {
        if let Some(glued) = Token::glue_double(c, token) {
            // `<>` only reads as `#` with synonyms enabled
            if glued != T![#] || lex.config.synonyms {
                lex.eat(c);
                token = glued;
            }
        }
    }

    lex.tokens.add_token(token, lex.make_range(start));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Dialect};
    use crate::session::ModuleID;
    use crate::token::TokenList;

    fn lex_str(source: &str) -> (TokenList, usize) {
        let config = Config::new(Dialect::Pim4);
        let (tokens, errors) = crate::lexer::lex(source, ModuleID::dummy(), config);
        (tokens, errors.collect().len())
    }

    fn kinds(tokens: &TokenList) -> Vec<Token> {
        (0..tokens.count()).map(|i| tokens.token(i)).collect()
    }

    #[test]
    fn keywords_and_idents() {
        let (tokens, errors) = lex_str("MODULE Buffer; END Buffer.");
        assert_eq!(errors, 0);
        assert_eq!(
            kinds(&tokens),
            vec![
                T![module],
                T![ident],
                T![;],
                T![end],
                T![ident],
                T![.],
                T![eof],
                T![eof]
            ]
        );
    }

    #[test]
    fn number_forms() {
        let (tokens, errors) = lex_str("100 0FFH 377B 15C 3.14 1.0E-9");
        assert_eq!(errors, 0);
        assert_eq!(
            kinds(&tokens),
            vec![
                T![int_lit],
                T![int_lit],
                T![int_lit],
                T![char_lit],
                T![real_lit],
                T![real_lit],
                T![eof],
                T![eof]
            ]
        );
    }

    #[test]
    fn glued_two_char_symbols() {
        let (tokens, errors) = lex_str("a := b <= c >= d");
        assert_eq!(errors, 0);
        assert_eq!(
            kinds(&tokens),
            vec![
                T![ident],
                T![:=],
                T![ident],
                T![<=],
                T![ident],
                T![>=],
                T![ident],
                T![eof],
                T![eof]
            ]
        );
    }

    #[test]
    fn range_is_two_ints_and_dotdot() {
        let (tokens, errors) = lex_str("[3..15]");
        assert_eq!(errors, 0);
        assert_eq!(
            kinds(&tokens),
            vec![T!['['], T![int_lit], T![..], T![int_lit], T![']'], T![eof], T![eof]]
        );
    }

    #[test]
    fn malformed_numbers() {
        let (tokens, errors) = lex_str("0FF 098B 1.0E+");
        assert_eq!(errors, 3);
        assert_eq!(
            kinds(&tokens),
            vec![
                T![malformed_int],
                T![malformed_int],
                T![malformed_real],
                T![eof],
                T![eof]
            ]
        );
    }

    #[test]
    fn synonyms_gating() {
        let (tokens, errors) = lex_str("a & ~b <> c");
        assert_eq!(errors, 0);
        assert_eq!(
            kinds(&tokens),
            vec![
                T![ident],
                T![and],
                T![not],
                T![ident],
                T![#],
                T![ident],
                T![eof],
                T![eof]
            ]
        );

        let mut config = Config::new(Dialect::Pim4);
        config.synonyms = false;
        let (tokens, errors) = crate::lexer::lex("a <> b", ModuleID::dummy(), config);
        assert_eq!(errors.collect().len(), 0);
        assert_eq!(
            kinds(&tokens),
            vec![T![ident], T![<], T![>], T![ident], T![eof], T![eof]]
        );
    }

    #[test]
    fn nested_comment_and_pragma() {
        let (tokens, errors) = lex_str("(* outer (* inner *) still outer *) x <*IF TRUE*> y");
        assert_eq!(errors, 0);
        assert_eq!(
            kinds(&tokens),
            vec![T![ident], T![pragma], T![ident], T![eof], T![eof]]
        );
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let (tokens, errors) = lex_str("\"abc\nx");
        assert_eq!(errors, 1);
        assert_eq!(
            kinds(&tokens),
            vec![T![malformed_string], T![ident], T![eof], T![eof]]
        );
    }

    #[test]
    fn unterminated_comment_reaches_eof() {
        let (tokens, errors) = lex_str("x (* no end");
        assert_eq!(errors, 1);
        assert_eq!(kinds(&tokens), vec![T![ident], T![eof], T![eof]]);
    }

    #[test]
    fn ident_length_limit() {
        let ok = "A".repeat(IDENT_MAX_LEN);
        let (_, errors) = lex_str(&ok);
        assert_eq!(errors, 0);

        let long = "A".repeat(IDENT_MAX_LEN + 1);
        let (tokens, errors) = lex_str(&long);
        assert_eq!(errors, 1);
        assert_eq!(kinds(&tokens), vec![T![ident], T![eof], T![eof]]);
        // the stored lexeme is cut down to the limit
        assert_eq!(tokens.range(0).len() as usize, IDENT_MAX_LEN);
    }

    #[test]
    fn comment_nesting_limit() {
        let source = format!("{}x{}", "(*".repeat(11), "*)".repeat(11));
        let (_, errors) = lex_str(&source);
        assert_eq!(errors, 1);
    }
}
