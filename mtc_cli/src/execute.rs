use crate::command::{Command, CommandCheck, CommandParse, ConfigOverrides};
use crate::error_print;
use mtc_core::ast_print;
use mtc_core::config::{self, Config, Dialect};
use mtc_core::error::Error;
use mtc_core::parser::{self, ParseResult, SourceKind};
use mtc_core::session::Session;
use mtc_core::support::{os, Timer};
use std::path::PathBuf;

/// Runs a parsed command. `Ok(true)` means the compilation
/// succeeded without errors.
pub fn run(command: Command) -> Result<bool, Error> {
    match command {
        Command::Parse(data) => run_parse(data),
        Command::Check(data) => run_check(data),
        Command::Help => {
            print_help();
            Ok(true)
        }
        Command::Version => {
            println!("mtc {}", mtc_core::VERSION);
            Ok(true)
        }
    }
}

fn run_parse(data: CommandParse) -> Result<bool, Error> {
    let config = resolve_config(&data.overrides)?;
    let mut session = Session::new();
    let timer = Timer::start();
    let (result, ok) = run_front_end(&mut session, &data.path, data.source_kind, config)?;
    let parse_ms = timer.measure_ms();

    if config.verbose {
        print!("{}", ast_print::ast_string(&result.tree));
    }
    if data.emit_ast {
        let out_path = data.path.with_extension("ast");
        let written = ast_print::ast_write(&out_path, &result.tree)?;
        println!("wrote `{}` ({written} bytes)", out_path.to_string_lossy());
    }
    if data.emit_dot {
        let out_path = data.path.with_extension("dot");
        let written = ast_print::dot_write(&out_path, &result.tree)?;
        println!("wrote `{}` ({written} bytes)", out_path.to_string_lossy());
    }
    if data.stats {
        print_stats(&data.path, &result, parse_ms);
    }
    Ok(ok)
}

fn run_check(data: CommandCheck) -> Result<bool, Error> {
    let config = resolve_config(&data.overrides)?;
    let mut session = Session::new();
    let timer = Timer::start();
    let (result, ok) = run_front_end(&mut session, &data.path, data.source_kind, config)?;
    let parse_ms = timer.measure_ms();

    if data.stats {
        print_stats(&data.path, &result, parse_ms);
    }
    Ok(ok)
}

fn run_front_end<'syn>(
    session: &mut Session,
    path: &PathBuf,
    source_kind: SourceKind,
    config: Config,
) -> Result<(ParseResult<'syn>, bool), Error> {
    let module_id = session.load_file(path.clone())?;
    let file = session.file(module_id);
    let filename = os::filename(&file.path)?.to_string();

    let result = parser::parse_source(source_kind, &file.source, &filename, module_id, config);
    error_print::print_diagnostics(
        Some(session),
        &result.errors,
        &result.warnings,
        config.verbose,
    );
    let ok = result.errors.is_empty();
    Ok((result, ok))
}

fn print_stats(path: &PathBuf, result: &parser::ParseResult, parse_ms: f64) {
    let stats = result.stats;
    let (ast_used, ast_reserved) = result.tree.arena.mem_usage();
    println!(
        "`{}`: {} lines, {} errors, {} warnings, {} symbols, {parse_ms:.2} ms, ast {ast_used}/{ast_reserved} bytes",
        path.to_string_lossy(),
        stats.line_count,
        stats.error_count,
        stats.warning_count,
        result.symbols.symbol_count(),
    );
}

/// Manifest config if `mtc.toml` exists in the working directory,
/// profile defaults otherwise; command-line flags win last.
fn resolve_config(overrides: &ConfigOverrides) -> Result<Config, Error> {
    let manifest_path = PathBuf::from(config::MANIFEST_FILE);
    let mut resolved = if manifest_path.try_exists().unwrap_or(false) {
        let text = os::file_read(&manifest_path)?;
        let mut manifest = config::manifest_deserialize(&text, &manifest_path)?;
        if let Some(dialect) = overrides.dialect {
            manifest.dialect = Some(dialect);
        }
        manifest.resolve()
    } else {
        Config::new(overrides.dialect.unwrap_or(Dialect::Pim4))
    };
    if overrides.no_variant_records {
        resolved.variant_records = false;
    }
    if overrides.verbose {
        resolved.verbose = true;
    }
    Ok(resolved)
}

fn print_help() {
    println!(
        r#"Usage: mtc <command> [arguments] [options]

Commands:
  p, parse <file>    parse a source file and emit trees
  c, check <file>    parse a source file, diagnostics only
  h, help            print this help text
  v, version         print the compiler version

Options for parse and check:
  --def                  expect a definition module
  --mod                  expect a program or implementation module
  --pim2 --pim3 --pim4   select the dialect profile
  --no-variant-records   parse extensible records instead of variants
  --stats                print line, diagnostic, symbol, timing and memory stats
  --verbose              print source context and the S-expression tree

Options for parse:
  --ast                  write the S-expression tree next to the source
  --dot                  write a Graphviz graph next to the source"#
    );
}
