//! Defines a small DSL-like macro that automates token definition and conversions.
//!
//! `token_gen` generates the `Token` enum itself and various conversions.
//! `token_from_char` maps char to token.
//! `token_glue_extend` defines token glueing rules for two-char symbols.
//!
//! `T` macro is also generated and allows to reference tokens
//! without directly using `Token` enum: `T![;] T![..] T![begin]`

#[rustfmt::skip]
macro_rules! token_gen {
    {
    $(
        [$($token:tt)+] | $string:literal | $name:ident |
        $(KW $mark:tt)?
        $(BIN[$bin_op:expr])?
    )+
    } => {
        macro_rules! T {
            $( [$($token)+] => [Token::$name]; )+
        }
        #[derive(Copy, Clone, PartialEq, Eq, Debug)]
        pub enum Token {
            $( $name, )+
        }
        impl Token {
            pub const ALL: &'static [Token] = &[ $( Token::$name, )+ ];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Token::$name => $string, )+
                }
            }
            pub fn as_keyword(ident: &str) -> Option<Token> {
                match ident {
                    $( $string => self::token_gen::token_gen_arms!(@KW_RES $name $(KW $mark)?), )+
                    _ => None,
                }
            }
            pub const fn as_bin_op(self) -> Option<crate::ast::NodeKind> {
                match self {
                    $( Token::$name => self::token_gen::token_gen_arms!(@BIN_RES $(BIN[$bin_op])?), )+
                }
            }
        }
    };
}

#[rustfmt::skip]
macro_rules! token_gen_arms {
    (@KW_RES $name:ident)             => { None };
    (@BIN_RES)                        => { None };
    (@KW_RES $name:ident KW $mark:tt) => { Some(Token::$name) };
    (@BIN_RES BIN[$bin_op:expr])      => { Some($bin_op) };
}

#[rustfmt::skip]
macro_rules! token_from_char {
    {
    $(
        $ch:literal => $to:expr
    )+
    } => {
        impl Token {
            pub const fn from_char(c: char) -> Option<Token> {
                match c {
                    $(
                        $ch => Some($to),
                    )+
                    _ => None,
                }
            }
        }
    };
}

#[rustfmt::skip]
macro_rules! token_glue_extend {
    {
    $name:ident,
    $(
        $( ($from:pat => $to:expr) )+ if $ch:literal
    )+
    } => {
        impl Token {
            pub const fn $name(c: char, token: Token) -> Option<Token> {
                match c {
                    $(
                        $ch => match token {
                            $( $from => Some($to), )+
                            _ => None,
                        },
                    )+
                    _ => None,
                }
            }
        }
    };
}

pub(super) use token_from_char;
pub(super) use token_gen;
pub(super) use token_gen_arms;
pub(super) use token_glue_extend;
