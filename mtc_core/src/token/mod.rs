mod token_gen;
pub mod token_list;
pub mod token_set;

pub use token_list::TokenList;
pub use token_set::TokenSet;

use crate::ast::NodeKind;

#[rustfmt::skip]
token_gen::token_gen! {
    // special tokens
    [eof]              | "end of file"      | Eof             |
    [error]            | "error token"      | ErrorToken      |
    [ident]            | "identifier"       | Ident           |
    [int_lit]          | "integer literal"  | IntLit          |
    [real_lit]         | "real literal"     | RealLit         |
    [char_lit]         | "char literal"     | CharLit         |
    [string_lit]       | "string literal"   | StringLit       |
    [malformed_int]    | "malformed integer"| MalformedInt    |
    [malformed_real]   | "malformed real"   | MalformedReal   |
    [malformed_string] | "malformed string" | MalformedString |
    [pragma]           | "pragma"           | Pragma          |

    // reserved words
    [and]            | "AND"            | KwAnd            | KW. BIN[NodeKind::And]
    [array]          | "ARRAY"          | KwArray          | KW.
    [begin]          | "BEGIN"          | KwBegin          | KW.
    [by]             | "BY"             | KwBy             | KW.
    [case]           | "CASE"           | KwCase           | KW.
    [const]          | "CONST"          | KwConst          | KW.
    [definition]     | "DEFINITION"     | KwDefinition     | KW.
    [div]            | "DIV"            | KwDiv            | KW. BIN[NodeKind::Div]
    [do]             | "DO"             | KwDo             | KW.
    [else]           | "ELSE"           | KwElse           | KW.
    [elsif]          | "ELSIF"          | KwElsif          | KW.
    [end]            | "END"            | KwEnd            | KW.
    [exit]           | "EXIT"           | KwExit           | KW.
    [export]         | "EXPORT"         | KwExport         | KW.
    [for]            | "FOR"            | KwFor            | KW.
    [from]           | "FROM"           | KwFrom           | KW.
    [if]             | "IF"             | KwIf             | KW.
    [implementation] | "IMPLEMENTATION" | KwImplementation | KW.
    [import]         | "IMPORT"         | KwImport         | KW.
    [in]             | "IN"             | KwIn             | KW. BIN[NodeKind::In]
    [loop]           | "LOOP"           | KwLoop           | KW.
    [mod]            | "MOD"            | KwMod            | KW. BIN[NodeKind::Mod]
    [module]         | "MODULE"         | KwModule         | KW.
    [not]            | "NOT"            | KwNot            | KW.
    [of]             | "OF"             | KwOf             | KW.
    [or]             | "OR"             | KwOr             | KW. BIN[NodeKind::Or]
    [pointer]        | "POINTER"        | KwPointer        | KW.
    [procedure]      | "PROCEDURE"      | KwProcedure      | KW.
    [qualified]      | "QUALIFIED"      | KwQualified      | KW.
    [record]         | "RECORD"         | KwRecord         | KW.
    [repeat]         | "REPEAT"         | KwRepeat         | KW.
    [return]         | "RETURN"         | KwReturn         | KW.
    [set]            | "SET"            | KwSet            | KW.
    [then]           | "THEN"           | KwThen           | KW.
    [to]             | "TO"             | KwTo             | KW.
    [type]           | "TYPE"           | KwType           | KW.
    [until]          | "UNTIL"          | KwUntil          | KW.
    [var]            | "VAR"            | KwVar            | KW.
    [while]          | "WHILE"          | KwWhile          | KW.
    [with]           | "WITH"           | KwWith           | KW.

    // single punctuation
    [,]      | ","      | Comma        |
    [.]      | "."      | Dot          |
    [:]      | ":"      | Colon        |
    [;]      | ";"      | Semicolon    |
    [^]      | "^"      | Caret        |
    [|]      | "|"      | Pipe         |
    ['(']    | "("      | ParenOpen    |
    [')']    | ")"      | ParenClose   |
    ['[']    | "["      | BracketOpen  |
    [']']    | "]"      | BracketClose |
    ['{']    | "{"      | CurlyOpen    |
    ['}']    | "}"      | CurlyClose   |

    // operators
    [=]      | "="      | Equal        | BIN[NodeKind::Eq]
    [#]      | "#"      | NotEqual     | BIN[NodeKind::Neq]
    [<]      | "<"      | Less         | BIN[NodeKind::Lt]
    [<=]     | "<="     | LessEq       | BIN[NodeKind::LtEq]
    [>]      | ">"      | Greater      | BIN[NodeKind::Gt]
    [>=]     | ">="     | GreaterEq    | BIN[NodeKind::GtEq]
    [+]      | "+"      | Plus         | BIN[NodeKind::Plus]
    [-]      | "-"      | Minus        | BIN[NodeKind::Minus]
    [*]      | "*"      | Star         | BIN[NodeKind::Mul]
    [/]      | "/"      | ForwSlash    | BIN[NodeKind::Slash]

    // double punctuation
    [:=]     | ":="     | Assign       |
    [..]     | ".."     | DotDot       |
}

#[rustfmt::skip]
token_gen::token_from_char! {
    ',' => T![,]
    '.' => T![.]
    ':' => T![:]
    ';' => T![;]
    '^' => T![^]
    '|' => T![|]
    '(' => T!['(']
    ')' => T![')']
    '[' => T!['[']
    ']' => T![']']
    '{' => T!['{']
    '}' => T!['}']

    '=' => T![=]
    '#' => T![#]
    '<' => T![<]
    '>' => T![>]
    '+' => T![+]
    '-' => T![-]
    '*' => T![*]
    '/' => T![/]
}

#[rustfmt::skip]
token_gen::token_glue_extend! {
    glue_double,
    (T![.] => T![..]) if '.'
    (T![<] => T![<=])
    (T![>] => T![>=])
    (T![:] => T![:=]) if '='
    (T![<] => T![#])  if '>'
}

pub(crate) use T;

impl Token {
    /// Every malformed literal form the lexer can produce.
    /// The parser treats these like any other mismatch.
    pub fn is_malformed(self) -> bool {
        matches!(self, T![malformed_int] | T![malformed_real] | T![malformed_string])
    }
}
