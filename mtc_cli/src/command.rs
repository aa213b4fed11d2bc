use mtc_core::config::Dialect;
use mtc_core::error::ErrorBuffer;
use mtc_core::errors as err;
use mtc_core::parser::SourceKind;
use mtc_core::support::AsStr;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

pub enum Command {
    Parse(CommandParse),
    Check(CommandCheck),
    Help,
    Version,
}

pub struct CommandParse {
    pub path: PathBuf,
    pub source_kind: SourceKind,
    pub emit_ast: bool,
    pub emit_dot: bool,
    pub stats: bool,
    pub overrides: ConfigOverrides,
}

pub struct CommandCheck {
    pub path: PathBuf,
    pub source_kind: SourceKind,
    pub stats: bool,
    pub overrides: ConfigOverrides,
}

/// Command-line knobs that win over the `mtc.toml` manifest.
pub struct ConfigOverrides {
    pub dialect: Option<Dialect>,
    pub no_variant_records: bool,
    pub verbose: bool,
}

//==================== PARSE COMMAND ====================

pub fn parse() -> Result<Command, ErrorBuffer> {
    let format = format()?;
    let mut p = CommandParser { err: ErrorBuffer::default(), format };

    let command = match p.format.cmd.as_str() {
        "p" | "parse" => command_parse(&mut p),
        "c" | "check" => command_check(&mut p),
        "h" | "help" => command_help(&mut p),
        "v" | "version" => command_version(&mut p),
        _ => {
            err::cmd_unknown(&mut p.err, &p.format.cmd);
            return Err(p.err);
        }
    };

    for (opt, _) in p.format.options {
        err::cmd_option_unknown(&mut p.err, &opt);
    }
    for opt in p.format.duplicates {
        err::cmd_option_duplicate(&mut p.err, &opt);
    }
    p.err.result(command)
}

fn command_parse(p: &mut CommandParser) -> Command {
    let path = parse_args_single(p, "file");
    let source_kind = parse_option_enum(p, SourceKind::Any);
    let emit_ast = parse_option_flag(p, false, "ast");
    let emit_dot = parse_option_flag(p, false, "dot");
    let stats = parse_option_flag(p, false, "stats");
    let overrides = parse_overrides(p);

    let data = CommandParse {
        path: PathBuf::from(path),
        source_kind,
        emit_ast,
        emit_dot,
        stats,
        overrides,
    };
    Command::Parse(data)
}

fn command_check(p: &mut CommandParser) -> Command {
    let path = parse_args_single(p, "file");
    let source_kind = parse_option_enum(p, SourceKind::Any);
    let stats = parse_option_flag(p, false, "stats");
    let overrides = parse_overrides(p);

    let data = CommandCheck { path: PathBuf::from(path), source_kind, stats, overrides };
    Command::Check(data)
}

fn command_help(p: &mut CommandParser) -> Command {
    parse_args_none(p);
    Command::Help
}

fn command_version(p: &mut CommandParser) -> Command {
    parse_args_none(p);
    Command::Version
}

fn parse_overrides(p: &mut CommandParser) -> ConfigOverrides {
    let dialect = parse_option_enum_opt::<Dialect>(p);
    let no_variant_records = parse_option_flag(p, false, "no-variant-records");
    let verbose = parse_option_flag(p, false, "verbose");
    ConfigOverrides { dialect, no_variant_records, verbose }
}

struct CommandFormat {
    cmd: String,
    args: Vec<String>,
    options: HashMap<String, Vec<String>>,
    duplicates: HashSet<String>,
}

//==================== PARSE ARGS ====================

struct FormatParser {
    args: Vec<String>,
}

fn format() -> Result<CommandFormat, ErrorBuffer> {
    let mut p = FormatParser { args: std::env::args().skip(1).rev().collect() };

    let cmd = match format_eat_arg(&mut p) {
        Some(cmd) => cmd,
        None => {
            let mut err = ErrorBuffer::default();
            err::cmd_name_missing(&mut err);
            return Err(err);
        }
    };
    let args = format_args(&mut p);
    let (options, duplicates) = format_options(&mut p);
    Ok(CommandFormat { cmd, args, options, duplicates })
}

fn format_args(p: &mut FormatParser) -> Vec<String> {
    let mut args = Vec::new();

    while let Some(arg) = format_eat_arg(p) {
        args.push(arg);
    }
    args
}

fn format_options(p: &mut FormatParser) -> (HashMap<String, Vec<String>>, HashSet<String>) {
    let mut options = HashMap::new();
    let mut duplicates = HashSet::new();

    while let Some(opt) = format_eat_option(p) {
        let args = format_args(p);

        if options.contains_key(&opt) {
            duplicates.insert(opt);
        } else {
            options.insert(opt, args);
        }
    }
    (options, duplicates)
}

fn format_eat_arg(p: &mut FormatParser) -> Option<String> {
    let next = p.args.last()?;
    if next.starts_with('-') {
        None
    } else {
        p.args.pop()
    }
}

fn format_eat_option(p: &mut FormatParser) -> Option<String> {
    let next = p.args.last()?;
    let opt = next.trim_start_matches('-').to_string();
    p.args.pop();
    Some(opt)
}

//==================== PARSE FORMAT ====================

struct CommandParser {
    err: ErrorBuffer,
    format: CommandFormat,
}

fn parse_args_none(p: &mut CommandParser) {
    if !p.format.args.is_empty() {
        err::cmd_expect_no_args(&mut p.err, &p.format.cmd);
    }
}

fn parse_args_single(p: &mut CommandParser, name: &str) -> String {
    if let Some(arg) = p.format.args.first() {
        if p.format.args.len() > 1 {
            err::cmd_expect_single_arg(&mut p.err, &p.format.cmd, name);
        }
        arg.to_string()
    } else {
        err::cmd_expect_single_arg(&mut p.err, &p.format.cmd, name);
        "error".to_string()
    }
}

fn parse_option_no_args(p: &mut CommandParser, opt: &str) -> bool {
    if let Some(args) = p.format.options.remove(opt) {
        if !args.is_empty() {
            err::cmd_option_expect_no_args(&mut p.err, opt);
        }
        true
    } else {
        false
    }
}

fn parse_option_flag(p: &mut CommandParser, default: bool, name: &'static str) -> bool {
    if parse_option_no_args(p, name) {
        true
    } else {
        default
    }
}

fn parse_option_enum<T: Copy + AsStr>(p: &mut CommandParser, default: T) -> T {
    parse_option_enum_opt(p).unwrap_or(default)
}

fn parse_option_enum_opt<T: Copy + AsStr>(p: &mut CommandParser) -> Option<T> {
    let mut selected = None;
    let mut variants = T::ALL.iter().copied();

    for value in variants.by_ref() {
        if parse_option_no_args(p, value.as_str()) {
            selected = Some(value);
            break;
        }
    }

    if let Some(selected) = selected {
        for other in variants {
            if parse_option_no_args(p, other.as_str()) {
                let opt = selected.as_str();
                let other = other.as_str();
                err::cmd_option_conflict(&mut p.err, opt, other);
            }
        }
    }
    selected
}
