use mtc_core::ast_print;
use mtc_core::config::{Config, Dialect};
use mtc_core::parser::{self, ParseResult, SourceKind};
use mtc_core::session::ModuleID;

fn parse(source: &str, filename: &str) -> ParseResult<'static> {
    parse_with(source, filename, Config::new(Dialect::Pim4))
}

fn parse_with(source: &str, filename: &str, config: Config) -> ParseResult<'static> {
    parser::parse_source(SourceKind::Any, source, filename, ModuleID::new(0), config)
}

fn sexpr(result: &ParseResult) -> String {
    ast_print::ast_string(&result.tree)
}

#[test]
fn minimal_definition_module() {
    let result = parse("DEFINITION MODULE Foo; END Foo.\n", "Foo.def");
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(
        sexpr(&result),
        "(ROOT (FILENAME \"Foo.def\") (EMPTY) (DEFMOD (IDENT Foo) (EMPTY) (EMPTY)))\n"
    );
}

#[test]
fn import_with_duplicate_ident() {
    let result = parse("DEFINITION MODULE X; IMPORT a, a; END X.\n", "X.def");
    assert_eq!(result.errors.len(), 1);
    let text = sexpr(&result);
    assert!(text.contains("(IMPLIST (IMPORT (IDENTLIST a)))"), "{text}");
}

#[test]
fn simple_constant() {
    let result = parse("DEFINITION MODULE C; CONST k = 42; END C.\n", "C.def");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(
        text.contains("(DEFMOD (IDENT C) (EMPTY) (DEFLIST (CONSTDEF (IDENT k) (INTVAL 42))))"),
        "{text}"
    );
}

#[test]
fn errant_semicolon_is_one_warning() {
    let result = parse("MODULE M; BEGIN x := 1; ; END M.\n", "M.mod");
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    let text = sexpr(&result);
    assert!(text.contains("(STMTSEQ (ASSIGN (IDENT x) (INTVAL 1)))"), "{text}");
}

#[test]
fn errant_semicolon_as_error_when_configured() {
    let mut config = Config::new(Dialect::Pim4);
    config.errant_semicolon = false;
    let result = parse_with("MODULE M; BEGIN x := 1; ; END M.\n", "M.mod", config);
    assert_eq!(result.errors.len(), 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn empty_statement_sequence() {
    let result = parse("MODULE M; BEGIN END M.\n", "M.mod");
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    let text = sexpr(&result);
    assert!(text.contains("(BLOCK (EMPTY) (EMPTY))"), "{text}");
}

const VARIANT_RECORD: &str = "DEFINITION MODULE R; \
TYPE T = RECORD CASE tag: BOOLEAN OF TRUE: x: INTEGER | FALSE: y: REAL END END; \
END R.\n";

#[test]
fn variant_record_dialect_on() {
    let result = parse(VARIANT_RECORD, "R.def");
    assert!(result.errors.is_empty(), "{:?}", result.errors.len());
    let text = sexpr(&result);
    assert!(text.contains("(VRNTREC (FIELDLISTSEQ (VRNT (IDENT tag) (IDENT BOOLEAN)"), "{text}");
    assert!(text.contains("(VRNTFIELDS (CLABELLIST (IDENT TRUE))"), "{text}");
}

#[test]
fn variant_record_dialect_off() {
    let mut config = Config::new(Dialect::Pim4);
    config.variant_records = false;
    let result = parse_with(VARIANT_RECORD, "R.def", config);
    assert!(!result.errors.is_empty());
    let text = sexpr(&result);
    assert!(!text.contains("VRNTREC"), "{text}");
}

#[test]
fn stats_match_diagnostics() {
    let result = parse("MODULE M;\nBEGIN\nx := 1; ;\nEND M.\n", "M.mod");
    assert_eq!(result.stats.error_count, result.errors.len());
    assert_eq!(result.stats.warning_count, result.warnings.len());
    assert_eq!(result.stats.line_count, 4);
}

#[test]
fn source_kind_mismatch() {
    let source = "DEFINITION MODULE Foo; END Foo.\n";
    let result =
        parser::parse_source(SourceKind::Mod, source, "Foo.def", ModuleID::new(0), Config::default());
    assert_eq!(result.errors.len(), 1);
    // still parses the unit it found
    assert!(sexpr(&result).contains("(DEFMOD (IDENT Foo)"));
}

#[test]
fn invalid_start_symbol() {
    let result = parse("BEGIN END.\n", "junk.mod");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(sexpr(&result), "(ROOT (FILENAME \"junk.mod\") (EMPTY) (EMPTY))\n");
}

#[test]
fn symbols_after_unit() {
    let result = parse("MODULE M; BEGIN x := 1 END M. EXTRA\n", "M.mod");
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn end_ident_mismatch() {
    let result = parse("MODULE M; BEGIN x := 1 END N.\n", "M.mod");
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn designator_and_operator_nesting() {
    let result = parse("MODULE M; BEGIN a.b.c[i]^.d := x * y + z END M.\n", "M.mod");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(
        text.contains(
            "(ASSIGN (FIELD (DEREF (INDEX (QUALIDENT a b c) (EXPRLIST (IDENT i)))) (IDENT d)) \
             (PLUS (MUL (IDENT x) (IDENT y)) (IDENT z)))"
        ),
        "{text}"
    );
}

#[test]
fn literal_value_markers() {
    let source = "DEFINITION MODULE L; \
CONST h = 0FFH; o = 377B; c = 15C; r = 1.5E3; s = \"hi\"; \
END L.\n";
    let result = parse(source, "L.def");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(text.contains("(CONSTDEF (IDENT h) (INTVAL ?0FFH))"), "{text}");
    assert!(text.contains("(CONSTDEF (IDENT o) (INTVAL ?377B))"), "{text}");
    assert!(text.contains("(CONSTDEF (IDENT c) (CHRVAL ?15C))"), "{text}");
    assert!(text.contains("(CONSTDEF (IDENT r) (REALVAL 1.5E3))"), "{text}");
    assert!(text.contains("(CONSTDEF (IDENT s) (QUOTEDVAL \"hi\"))"), "{text}");
}

#[test]
fn if_elsif_else_structure() {
    let source = "MODULE M; BEGIN IF a THEN x := 1 ELSIF b THEN x := 2 ELSE x := 3 END END M.\n";
    let result = parse(source, "M.mod");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(
        text.contains(
            "(IF (IDENT a) (STMTSEQ (ASSIGN (IDENT x) (INTVAL 1))) \
             (ELSIFSEQ (ELSIF (IDENT b) (STMTSEQ (ASSIGN (IDENT x) (INTVAL 2))))) \
             (STMTSEQ (ASSIGN (IDENT x) (INTVAL 3))))"
        ),
        "{text}"
    );
}

#[test]
fn case_statement_with_ranges() {
    let source =
        "MODULE M; BEGIN CASE k OF 1, 2: x := 1 | 3..5: x := 2 ELSE x := 3 END END M.\n";
    let result = parse(source, "M.mod");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(text.contains("(SWITCH (IDENT k) (CASELIST (CASE (CLABELLIST (INTVAL 1) (INTVAL 2))"), "{text}");
    assert!(text.contains("(CASE (CLABELLIST (RANGE (INTVAL 3) (INTVAL 5)))"), "{text}");
}

#[test]
fn for_loop_with_step() {
    let source = "MODULE M; BEGIN FOR i := 1 TO 10 BY 2 DO x := i END END M.\n";
    let result = parse(source, "M.mod");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(
        text.contains(
            "(FORTO (IDENT i) (INTVAL 1) (INTVAL 10) (INTVAL 2) \
             (STMTSEQ (ASSIGN (IDENT x) (IDENT i))))"
        ),
        "{text}"
    );
}

#[test]
fn procedure_definition_with_open_array() {
    let source = "DEFINITION MODULE P; PROCEDURE Len(VAR s: ARRAY OF CHAR): CARDINAL; END P.\n";
    let result = parse(source, "P.def");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(
        text.contains(
            "(PROCDEF (IDENT Len) (FPARAMLIST (VARPARAM (IDENTLIST s) \
             (OPENARRAY (IDENT CHAR)))) (IDENT CARDINAL))"
        ),
        "{text}"
    );
    // module, procedure and parameter are all recorded
    assert!(result.symbols.symbol_count() >= 3);
}

#[test]
fn set_constructor_and_function_call() {
    let source = "MODULE M; BEGIN s := BITSET{0, 2..4}; n := Len(a) END M.\n";
    let result = parse(source, "M.mod");
    assert!(result.errors.is_empty());
    let text = sexpr(&result);
    assert!(
        text.contains(
            "(ASSIGN (IDENT s) (SETVAL (IDENT BITSET) \
             (EXPRLIST (INTVAL 0) (RANGE (INTVAL 2) (INTVAL 4)))))"
        ),
        "{text}"
    );
    assert!(
        text.contains("(ASSIGN (IDENT n) (FCALL (IDENT Len) (EXPRLIST (IDENT a))))"),
        "{text}"
    );
}

#[test]
fn leading_pragma_is_skipped() {
    let result = parse("<* target(all) *> MODULE M; BEGIN x := 1 END M.\n", "M.mod");
    assert!(result.errors.is_empty());
    assert!(sexpr(&result).contains("(PGMMOD (IDENT M)"));
}

#[test]
fn local_procedure_declaration() {
    let source = "MODULE M; \
VAR g: INTEGER; \
PROCEDURE P(n: INTEGER): INTEGER; \
BEGIN RETURN n END P; \
BEGIN g := P(1) END M.\n";
    let result = parse(source, "M.mod");
    assert!(result.errors.is_empty(), "{}", result.errors.len());
    let text = sexpr(&result);
    assert!(
        text.contains(
            "(PROC (IDENT P) (FPARAMLIST (VALPARAM (IDENTLIST n) (IDENT INTEGER))) \
             (IDENT INTEGER) (BLOCK (EMPTY) (STMTSEQ (RETURN (IDENT n)))))"
        ),
        "{text}"
    );
    assert!(text.contains("(DECLLIST (VARDECL (IDENTLIST g) (IDENT INTEGER))"), "{text}");
}

#[test]
fn nondefault_options_terminal() {
    let mut config = Config::new(Dialect::Pim4);
    config.variant_records = false;
    let result = parse_with("MODULE M; BEGIN x := 1 END M.\n", "M.mod", config);
    let text = sexpr(&result);
    assert!(text.contains("(OPTIONS \"variant_records\")"), "{text}");
}

#[test]
fn dot_output_shape() {
    let result = parse("DEFINITION MODULE Foo; END Foo.\n", "Foo.def");
    let dot = ast_print::dot_string(&result.tree);
    assert!(dot.starts_with("digraph AST {\n"), "{dot}");
    assert!(dot.ends_with("}\n"), "{dot}");
    assert!(dot.contains("node_0 [label=\"ROOT\"];"), "{dot}");
    assert!(dot.contains("node_0 -> {"), "{dot}");
    assert!(dot.contains("style=filled"), "{dot}");
    assert!(dot.contains("\\\"Foo.def\\\""), "{dot}");
}
