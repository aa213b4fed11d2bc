use crate::error::{Error, ErrorSink, Info, SourceRange, Warning, WarningSink};
use crate::token::{Token, TokenSet};
use std::path::PathBuf;

//==================== COMMAND ====================

pub fn cmd_name_missing(emit: &mut impl ErrorSink) {
    let msg = "command name is missing, use `mtc help` to learn the usage";
    emit.error(Error::message(msg));
}

pub fn cmd_unknown(emit: &mut impl ErrorSink, cmd: &str) {
    let msg = format!("command `{cmd}` is unknown, use `mtc help` to learn the usage");
    emit.error(Error::message(msg));
}

pub fn cmd_expect_no_args(emit: &mut impl ErrorSink, cmd: &str) {
    let msg = format!("command `{cmd}` does not accept any arguments");
    emit.error(Error::message(msg));
}

pub fn cmd_expect_single_arg(emit: &mut impl ErrorSink, cmd: &str, name: &str) {
    let msg = format!("command `{cmd}` accepts a single `{name}` argument");
    emit.error(Error::message(msg));
}

pub fn cmd_option_unknown(emit: &mut impl ErrorSink, opt: &str) {
    let msg = format!("option `--{opt}` is unknown, use `mtc help` to learn the usage");
    emit.error(Error::message(msg));
}

pub fn cmd_option_expect_no_args(emit: &mut impl ErrorSink, opt: &str) {
    let msg = format!("option `--{opt}` does not accept any arguments");
    emit.error(Error::message(msg));
}

pub fn cmd_option_duplicate(emit: &mut impl ErrorSink, opt: &str) {
    let msg = format!("option `--{opt}` cannot be used multiple times");
    emit.error(Error::message(msg));
}

pub fn cmd_option_conflict(emit: &mut impl ErrorSink, opt: &str, other: &str) {
    let msg = format!("options `--{opt}` and `--{other}` cannot be used together");
    emit.error(Error::message(msg));
}

//==================== OS ====================

pub fn os_file_read(io_error: String, path: &PathBuf) -> Error {
    let path = path.to_string_lossy();
    let msg = format!("failed to read file: {io_error}\npath: `{path}`");
    Error::message(msg)
}

pub fn os_file_create(io_error: String, path: &PathBuf) -> Error {
    let path = path.to_string_lossy();
    let msg = format!("failed to create file: {io_error}\npath: `{path}`");
    Error::message(msg)
}

pub fn os_file_write(io_error: String, path: &PathBuf) -> Error {
    let path = path.to_string_lossy();
    let msg = format!("failed to write file: {io_error}\npath: `{path}`");
    Error::message(msg)
}

pub fn os_filename_missing(path: &PathBuf) -> Error {
    let path = path.to_string_lossy();
    let msg = format!("filename is missing in: `{path}`");
    Error::message(msg)
}

pub fn os_filename_non_utf8(path: &PathBuf) -> Error {
    let path = path.to_string_lossy();
    let msg = format!("filename is not valid utf-8 in: `{path}`");
    Error::message(msg)
}

//==================== MANIFEST ====================

pub fn manifest_parse_failed(reason: String, path: &PathBuf) -> Error {
    let path = path.to_string_lossy();
    let msg = format!("failed to parse `mtc.toml` manifest: {reason}\npath: `{path}`");
    Error::message(msg)
}

//==================== LEXER ====================

pub fn lexer_unknown_symbol(emit: &mut impl ErrorSink, src: SourceRange, c: char) {
    let non_ascii = if !c.is_ascii() { "\nonly ascii symbols are supported" } else { "" };
    let msg = format!("unknown symbol token `{c:?}`{non_ascii}");
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_ident_too_long(emit: &mut impl ErrorSink, src: SourceRange, limit: usize) {
    let msg = format!("identifier exceeds the maximum length of {limit} characters");
    emit.error(Error::new(msg, src, None));
}

//==================== LEXER.NUMBER ====================

pub fn lexer_number_too_long(emit: &mut impl ErrorSink, src: SourceRange, limit: usize) {
    let msg = format!("number literal exceeds the maximum length of {limit} characters");
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_hex_missing_suffix(emit: &mut impl ErrorSink, src: SourceRange) {
    let msg = "hexadecimal literal not terminated, missing `H` suffix";
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_octal_invalid_digit(emit: &mut impl ErrorSink, src: SourceRange, digit: char) {
    let msg = format!("invalid digit `{digit}` for base 8 octal literal");
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_real_missing_exponent(emit: &mut impl ErrorSink, src: SourceRange) {
    let msg = "missing digits after real literal exponent";
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_real_missing_fraction(emit: &mut impl ErrorSink, src: SourceRange) {
    let msg = "missing digits after `.` in real literal";
    emit.error(Error::new(msg, src, None));
}

//==================== LEXER.STRING ====================

pub fn lexer_string_not_terminated(emit: &mut impl ErrorSink, src: SourceRange, quote: char) {
    let msg = format!("string literal not terminated, missing closing {quote}");
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_string_too_long(emit: &mut impl ErrorSink, src: SourceRange, limit: usize) {
    let msg = format!("string literal exceeds the maximum length of {limit} characters");
    emit.error(Error::new(msg, src, None));
}

//==================== LEXER.COMMENT ====================

pub fn lexer_comment_not_terminated(emit: &mut impl ErrorSink, src: SourceRange) {
    let msg = "block comment not terminated, missing closing *)";
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_pragma_not_terminated(emit: &mut impl ErrorSink, src: SourceRange) {
    let msg = "pragma not terminated, missing closing *>";
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_comment_too_long(emit: &mut impl ErrorSink, src: SourceRange, limit: usize) {
    let msg = format!("block comment exceeds the maximum length of {limit} characters");
    emit.error(Error::new(msg, src, None));
}

pub fn lexer_comment_nesting_overflow(emit: &mut impl ErrorSink, src: SourceRange, limit: u32) {
    let msg = format!("block comment exceeds the maximum nesting depth of {limit}");
    emit.error(Error::new(msg, src, None));
}

//==================== SYNTAX ====================

pub fn syntax_expected_token(
    emit: &mut impl ErrorSink,
    src: SourceRange,
    expected: Token,
    found: Token,
) {
    let expected = expected.as_str();
    let found = found.as_str();
    let msg = format!("expected `{expected}`, found `{found}`");
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_expected_set(
    emit: &mut impl ErrorSink,
    src: SourceRange,
    expected: TokenSet,
    found: Token,
) {
    let mut one_of = String::with_capacity(64);
    for (index, token) in expected.iter().enumerate() {
        if index > 0 {
            one_of.push_str(", ");
        }
        one_of.push('`');
        one_of.push_str(token.as_str());
        one_of.push('`');
    }
    let found = found.as_str();
    let msg = format!("expected one of: {one_of}\nfound `{found}`");
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_invalid_start_symbol(emit: &mut impl ErrorSink, src: SourceRange, found: Token) {
    let found = found.as_str();
    let msg =
        format!("expected `DEFINITION`, `IMPLEMENTATION` or `MODULE` to start a compilation unit\nfound `{found}`");
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_wrong_source_kind(
    emit: &mut impl ErrorSink,
    src: SourceRange,
    expected: &'static str,
    found: &'static str,
) {
    let msg = format!("expected a {expected}, found a {found}");
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_symbols_after_unit(emit: &mut impl ErrorSink, src: SourceRange, found: Token) {
    let found = found.as_str();
    let msg = format!("expected end of input after the final `.`\nfound `{found}`");
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_end_ident_mismatch(
    emit: &mut impl ErrorSink,
    end_src: SourceRange,
    head_src: SourceRange,
    head_name: &str,
    end_name: &str,
) {
    let msg = format!("`END {end_name}` does not match `{head_name}`");
    let info = Info::new("declared here", head_src);
    emit.error(Error::new(msg, end_src, info));
}

pub fn syntax_duplicate_ident(
    emit: &mut impl ErrorSink,
    src: SourceRange,
    first_src: SourceRange,
    name: &str,
) {
    let msg = format!("identifier `{name}` appears multiple times in the identifier list");
    let info = Info::new("first occurrence", first_src);
    emit.error(Error::new(msg, src, info));
}

pub fn syntax_name_redefined(
    emit: &mut impl ErrorSink,
    src: SourceRange,
    existing_src: SourceRange,
    name: &str,
) {
    let msg = format!("name `{name}` is declared multiple times in this scope");
    let info = Info::new("existing declaration", existing_src);
    emit.error(Error::new(msg, src, info));
}

pub fn syntax_errant_semicolon(emit: &mut impl WarningSink, src: SourceRange) {
    let msg = "semicolon produces an empty statement";
    emit.warning(Warning::new(msg, src, None));
}

pub fn syntax_errant_semicolon_error(emit: &mut impl ErrorSink, src: SourceRange) {
    let msg = "semicolon produces an empty statement";
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_malformed_construct(emit: &mut impl ErrorSink, src: SourceRange, name: &'static str) {
    let msg = format!("malformed `{name}` construct");
    emit.error(Error::new(msg, src, None));
}

pub fn syntax_empty_stmt_seq(emit: &mut impl WarningSink, src: SourceRange) {
    let msg = "statement sequence is empty";
    emit.warning(Warning::new(msg, src, None));
}

pub fn syntax_empty_field_list_seq(emit: &mut impl WarningSink, src: SourceRange) {
    let msg = "record field list sequence is empty";
    emit.warning(Warning::new(msg, src, None));
}
